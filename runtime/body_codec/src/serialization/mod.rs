//! Convert request and response bodies between raw bytes and typed values.
//!
//! [`Serializer`] is the seam: the [`CodecAdapter`](crate::CodecAdapter) never
//! touches a wire format directly.
//! [`JsonSerializer`] is the implementation used by default.
use bytes::Bytes;
use mime::Mime;
use serde::{Serialize, de::DeserializeOwned};

pub use json::JsonSerializer;

pub mod errors;
mod json;
pub mod local_datetime;

use errors::{DeserializeError, SerializeError};

/// A wire format for request and response bodies.
///
/// Implementations must be usable from many requests at once, without locking.
pub trait Serializer: Send + Sync {
    /// The canonical media type for payloads in this format.
    fn media_type(&self) -> Mime;

    /// Deserialize `bytes` into an instance of `T`.
    ///
    /// Errors must be classified: input that doesn't follow the grammar of the
    /// format is reported as [`DeserializeError::Syntax`] or
    /// [`DeserializeError::Io`], everything else as [`DeserializeError::Internal`].
    fn deserialize<T>(&self, bytes: &[u8]) -> Result<T, DeserializeError>
    where
        T: DeserializeOwned;

    /// Serialize `value` into a buffer of bytes.
    fn serialize<T>(&self, value: &T) -> Result<Bytes, SerializeError>
    where
        T: Serialize + ?Sized;
}
