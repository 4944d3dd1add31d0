//! Serialize a [`jiff::civil::DateTime`] as `yyyy-MM-dd HH:mm:ss`.
//!
//! Use it with `#[serde(with = "...")]`:
//!
//! ```rust
//! use jiff::civil::DateTime;
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct PageResponse {
//!     title: String,
//!     #[serde(with = "body_codec::serialization::local_datetime")]
//!     updated_at: DateTime,
//!     #[serde(default, with = "body_codec::serialization::local_datetime::option")]
//!     deleted_at: Option<DateTime>,
//! }
//!
//! let page = PageResponse {
//!     title: "Draft".into(),
//!     updated_at: jiff::civil::date(2024, 3, 1).at(9, 5, 30, 0),
//!     deleted_at: None,
//! };
//! let json = serde_json::to_string(&page).unwrap();
//! assert_eq!(json, r#"{"title":"Draft","updated_at":"2024-03-01 09:05:30","deleted_at":null}"#);
//! ```
use jiff::civil::DateTime;
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

/// The `strftime`-style format used on the wire.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn serialize<S>(value: &DateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.strftime(FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
    DateTime::strptime(FORMAT, raw.as_ref()).map_err(D::Error::custom)
}

/// The same wire format, for optional values. `None` is serialized as `null`.
pub mod option {
    use jiff::civil::DateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super")] DateTime);

        let wrapper = Option::<Wrapper>::deserialize(deserializer)?;
        Ok(wrapper.map(|Wrapper(value)| value))
    }
}
