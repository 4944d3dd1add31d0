#![allow(dead_code)]
use std::sync::atomic::{AtomicUsize, Ordering};

use body_codec::RequestContext;
use body_codec::serialization::errors::{DeserializeError, SerializeError};
use body_codec::serialization::{JsonSerializer, Serializer};
use body_codec::validation::{
    Constrained, Constraints, RequestBody, RuleValidator, Validatable, Validator, ValidatorError,
    Violations,
};
use bytes::Bytes;
use mime::Mime;
use serde::{Serialize, de::DeserializeOwned};

pub fn ctx(body: &'static str) -> RequestContext {
    raw_ctx(body.as_bytes())
}

/// A context whose body isn't necessarily valid UTF-8.
pub fn raw_ctx(body: &'static [u8]) -> RequestContext {
    let request = http::Request::post("/")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    RequestContext::from(request)
}

/// Implement [`RequestBody`] for types that can be validated.
macro_rules! validated_request_body {
    ($($t:ty),+) => {
        $(
            impl RequestBody for $t {
                fn validatable(&self) -> Option<&dyn Validatable> {
                    Some(self)
                }
            }
        )+
    };
}

validated_request_body!(
    TagRequest,
    NotebookCreateRequest,
    PageUpdateRequest,
    SectionTagRequest
);

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct TagRequest {
    pub name: String,
}

impl Constrained for TagRequest {
    fn constraints(&self, c: &mut Constraints) {
        c.field("name").not_empty(&self.name, "must not be empty");
    }
}

impl Validatable for TagRequest {}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct NotebookCreateRequest {
    pub title: String,
}

impl Constrained for NotebookCreateRequest {
    fn constraints(&self, c: &mut Constraints) {
        c.field("title")
            .not_empty(&self.title, "is required")
            .length(&self.title, ..=256, "must be at most 256 characters long");
    }
}

impl Validatable for NotebookCreateRequest {}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SectionRequest {
    pub title: String,
}

impl Constrained for SectionRequest {
    fn constraints(&self, c: &mut Constraints) {
        c.field("title").not_blank(&self.title, "must not be blank");
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct PageUpdateRequest {
    pub title: String,
    pub position: i64,
    #[serde(default)]
    pub sections: Vec<SectionRequest>,
}

impl Constrained for PageUpdateRequest {
    fn constraints(&self, c: &mut Constraints) {
        c.field("title").not_empty(&self.title, "is required");
        c.field("position").range(&self.position, 0.., "must not be negative");
        c.each("sections", &self.sections);
    }
}

impl Validatable for PageUpdateRequest {}

/// A request type that picks its own status code and message layout.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SectionTagRequest {
    pub tag_id: i64,
}

impl Constrained for SectionTagRequest {
    fn constraints(&self, c: &mut Constraints) {
        c.field("tag_id").range(&self.tag_id, 1.., "must be positive");
    }
}

impl Validatable for SectionTagRequest {
    fn to_business_error(&self, violations: Violations) -> body_codec::BusinessError {
        let messages: Vec<String> = violations
            .iter()
            .map(|v| format!("{} {}", v.path(), v.message()))
            .collect();
        body_codec::BusinessError::new(http::StatusCode::UNPROCESSABLE_ENTITY)
            .because("section_tag", messages)
    }
}

/// A type without constraints.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct TrashQuery {
    pub notebook_id: i64,
}

impl RequestBody for TrashQuery {}

#[derive(Debug, Default)]
/// A [`Validator`] that counts how many times it's invoked.
pub struct SpyValidator {
    inner: RuleValidator,
    pub calls: AtomicUsize,
}

impl SpyValidator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Validator for SpyValidator {
    fn validate(&self, value: &dyn Constrained) -> Result<Violations, ValidatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.validate(value)
    }
}

#[derive(Debug, Default)]
/// A [`Validator`] that always fails.
pub struct BrokenValidator;

impl Validator for BrokenValidator {
    fn validate(&self, _value: &dyn Constrained) -> Result<Violations, ValidatorError> {
        Err(ValidatorError::new("the constraint registry is unavailable"))
    }
}

#[derive(Debug, Default)]
/// A JSON [`Serializer`] that counts how many times `serialize` is invoked.
pub struct SpySerializer {
    pub serialize_calls: AtomicUsize,
}

impl SpySerializer {
    pub fn serialize_calls(&self) -> usize {
        self.serialize_calls.load(Ordering::SeqCst)
    }
}

impl Serializer for SpySerializer {
    fn media_type(&self) -> Mime {
        JsonSerializer.media_type()
    }

    fn deserialize<T>(&self, bytes: &[u8]) -> Result<T, DeserializeError>
    where
        T: DeserializeOwned,
    {
        JsonSerializer.deserialize(bytes)
    }

    fn serialize<T>(&self, value: &T) -> Result<Bytes, SerializeError>
    where
        T: Serialize + ?Sized,
    {
        self.serialize_calls.fetch_add(1, Ordering::SeqCst);
        JsonSerializer.serialize(value)
    }
}

#[derive(Debug, Default)]
/// A [`Serializer`] whose deserializer fails for reasons unrelated to its input.
pub struct FaultySerializer;

impl Serializer for FaultySerializer {
    fn media_type(&self) -> Mime {
        mime::APPLICATION_JSON
    }

    fn deserialize<T>(&self, _bytes: &[u8]) -> Result<T, DeserializeError>
    where
        T: DeserializeOwned,
    {
        Err(DeserializeError::internal("the type registry is corrupted"))
    }

    fn serialize<T>(&self, value: &T) -> Result<Bytes, SerializeError>
    where
        T: Serialize + ?Sized,
    {
        JsonSerializer.serialize(value)
    }
}
