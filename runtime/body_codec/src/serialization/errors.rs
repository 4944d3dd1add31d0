//! Errors that can occur while converting bodies to and from their wire format.
use http::StatusCode;
use tracing_log_error::log_error;

use crate::response::{Response, empty_json_response};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`Serializer::deserialize`](super::Serializer::deserialize).
pub enum DeserializeError {
    /// The payload doesn't follow the grammar of the format: it is malformed,
    /// truncated or it doesn't have the expected shape.
    #[error("The payload is not a well-formed document.\n{source}")]
    Syntax {
        #[source]
        source: BoxError,
    },
    /// The payload could not be read as a document in the expected encoding.
    #[error("The payload could not be read.\n{source}")]
    Io {
        #[source]
        source: BoxError,
    },
    /// The serializer failed for reasons unrelated to the payload.
    #[error("The serializer failed unexpectedly.")]
    Internal {
        #[source]
        source: BoxError,
    },
}

impl DeserializeError {
    /// Build a [`DeserializeError::Syntax`] error.
    pub fn syntax<E>(source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Syntax {
            source: source.into(),
        }
    }

    /// Build a [`DeserializeError::Io`] error.
    pub fn io<E>(source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Io {
            source: source.into(),
        }
    }

    /// Build a [`DeserializeError::Internal`] error.
    pub fn internal<E>(source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Internal {
            source: source.into(),
        }
    }

    /// `true` if the caller sent a payload that doesn't follow the grammar of the format.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::Syntax { .. } | Self::Io { .. })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to serialize the response body.")]
/// The error returned by [`Serializer::serialize`](super::Serializer::serialize).
pub struct SerializeError {
    #[source]
    source: BoxError,
}

impl SerializeError {
    /// Wrap the error returned by the underlying serialization library.
    pub fn new<E>(source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            source: source.into(),
        }
    }

    /// Convert a [`SerializeError`] into an opaque `500 Internal Server Error`.
    ///
    /// The error is logged, since the response doesn't carry any detail.
    pub fn into_response(&self) -> Response {
        log_error!(self, "Failed to encode the response body");
        empty_json_response(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
