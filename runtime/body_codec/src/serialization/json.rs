use bytes::Bytes;
use mime::{APPLICATION_JSON, Mime};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::error::Category;

use super::Serializer;
use super::errors::{DeserializeError, SerializeError};

#[derive(Debug, Clone, Copy, Default)]
/// A [`Serializer`] for JSON documents, built on top of `serde_json`.
///
/// Deserialization errors keep track of the path to the offending field
/// (e.g. `notebook.title`), courtesy of `serde_path_to_error`.
///
/// # Example
///
/// ```rust
/// use body_codec::serialization::{JsonSerializer, Serializer};
///
/// #[derive(serde::Deserialize, serde::Serialize, Debug, PartialEq)]
/// struct Tag {
///     name: String,
/// }
///
/// let serializer = JsonSerializer;
/// let tag: Tag = serializer.deserialize(br#"{"name":"rust"}"#).unwrap();
/// assert_eq!(tag, Tag { name: "rust".into() });
///
/// let bytes = serializer.serialize(&tag).unwrap();
/// assert_eq!(&bytes[..], br#"{"name":"rust"}"#);
/// ```
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn media_type(&self) -> Mime {
        APPLICATION_JSON
    }

    fn deserialize<T>(&self, bytes: &[u8]) -> Result<T, DeserializeError>
    where
        T: DeserializeOwned,
    {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
            let category = e.inner().classify();
            classify(category, e)
        })?;
        // Trailing characters after the document are a syntax error.
        deserializer
            .end()
            .map_err(|e| classify(e.classify(), e))?;
        Ok(value)
    }

    fn serialize<T>(&self, value: &T) -> Result<Bytes, SerializeError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value).map_err(SerializeError::new)?;
        Ok(bytes.into())
    }
}

/// Type mismatches (`Category::Data`) are reported as syntax errors: the document
/// is well-formed JSON, but it doesn't have the shape the endpoint expects.
fn classify<E>(category: Category, error: E) -> DeserializeError
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match category {
        Category::Syntax | Category::Eof | Category::Data => DeserializeError::syntax(error),
        Category::Io => DeserializeError::io(error),
    }
}
