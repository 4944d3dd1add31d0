//! The [`CodecAdapter`]: decode, validate and encode bodies on behalf of a server.
use std::fmt::Debug;

use bytes::Bytes;
use http::StatusCode;
use serde::{Serialize, de::DeserializeOwned};

use crate::config::{BodyLogging, CodecConfig};
use crate::context::Context;
use crate::error::BusinessError;
use crate::response::{Response, response_with_body};
use crate::serialization::errors::SerializeError;
use crate::serialization::{JsonSerializer, Serializer};
use crate::validation::{RequestBody, RuleValidator, Validatable, Validator};

pub use errors::{DecodeError, UnexpectedDecodeError};

pub mod errors;

/// The field that malformed-body errors are reported under.
pub const BODY_FIELD: &str = "body";

/// Sits between a server's request context, a [`Serializer`] and a [`Validator`].
///
/// Inbound, it turns request bodies into typed values, validating those that
/// implement [`Validatable`].
/// Outbound, it turns typed values (or their absence) into response bodies.
///
/// `CodecAdapter` holds no mutable state: a single instance can be shared
/// across all the requests handled by a server.
///
/// # Example
///
/// ```rust
/// use body_codec::validation::{Constrained, Constraints, RequestBody, Validatable};
/// use body_codec::{CodecAdapter, Context, RequestContext};
///
/// #[derive(serde::Deserialize, Debug)]
/// struct TagRequest {
///     name: String,
/// }
///
/// impl Constrained for TagRequest {
///     fn constraints(&self, c: &mut Constraints) {
///         c.field("name").not_empty(&self.name, "is required");
///     }
/// }
///
/// impl RequestBody for TagRequest {
///     fn validatable(&self) -> Option<&dyn Validatable> {
///         Some(self)
///     }
/// }
///
/// impl Validatable for TagRequest {}
///
/// let adapter = CodecAdapter::default();
///
/// let request = http::Request::post("/tags").body(r#"{"name": "rust"}"#).unwrap();
/// let ctx = RequestContext::from(request);
/// let tag: TagRequest = adapter.decode(&ctx).unwrap();
/// assert_eq!(tag.name, "rust");
///
/// let request = http::Request::post("/tags").body(r#"{"name": ""}"#).unwrap();
/// let ctx = RequestContext::from(request);
/// let error = adapter.decode::<TagRequest, _>(&ctx).unwrap_err();
/// let error = error.business_error().unwrap();
/// assert_eq!(error.status(), http::StatusCode::BAD_REQUEST);
/// assert_eq!(error.messages("name").unwrap(), ["is required"]);
/// ```
#[derive(Debug, Clone)]
pub struct CodecAdapter<S = JsonSerializer, V = RuleValidator> {
    serializer: S,
    validator: V,
    config: CodecConfig,
}

impl Default for CodecAdapter {
    fn default() -> Self {
        Self::from_config(CodecConfig::default())
    }
}

impl CodecAdapter {
    /// An adapter using [`JsonSerializer`] and a [`RuleValidator`] built from `config`.
    pub fn from_config(config: CodecConfig) -> Self {
        let validator = RuleValidator::new(&config.validation);
        Self::new(JsonSerializer, validator, config)
    }
}

impl<S, V> CodecAdapter<S, V>
where
    S: Serializer,
    V: Validator,
{
    pub fn new(serializer: S, validator: V, config: CodecConfig) -> Self {
        Self {
            serializer,
            validator,
            config,
        }
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Deserialize the request body into a `T`.
    ///
    /// If `T` can be validated, as reported by [`RequestBody::validatable`],
    /// its constraints are checked before the value is returned: a value with
    /// violations is never handed back to the caller.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::MalformedBody`] if the body doesn't follow the grammar
    ///   of the serializer's format. The validator is not invoked.
    /// - [`DecodeError::Validation`], carrying the [`BusinessError`] built by the
    ///   value itself, if there are violations.
    /// - [`DecodeError::Unexpected`] if the serializer fails for any other reason
    ///   or if the validator fails.
    pub fn decode<T, C>(&self, ctx: &C) -> Result<T, DecodeError>
    where
        T: DeserializeOwned + Debug + RequestBody,
        C: Context + ?Sized,
    {
        let value: T = self.deserialize(ctx)?;
        if let Some(validatable) = value.validatable() {
            self.validate(validatable)?;
        }
        Ok(value)
    }

    /// Serialize a response body.
    ///
    /// The default response type of `ctx` is set to the serializer's media type.
    /// If `value` is `None` the body is empty and the serializer is not invoked:
    /// an absent value must not turn into a `null` document.
    ///
    /// # Errors
    ///
    /// Serialization failures are returned as they are.
    pub fn encode<T, C>(&self, ctx: &mut C, value: Option<&T>) -> Result<Bytes, SerializeError>
    where
        T: Serialize + ?Sized,
        C: Context + ?Sized,
    {
        ctx.set_default_response_type(self.serializer.media_type());
        match value {
            None => Ok(Bytes::new()),
            Some(value) => self.serializer.serialize(value),
        }
    }

    /// [`encode`](Self::encode) `value` and wrap it in a response with the given status.
    ///
    /// The `Content-Type` header is the response type resolved by `ctx`.
    pub fn render<T, C>(
        &self,
        ctx: &mut C,
        status: StatusCode,
        value: Option<&T>,
    ) -> Result<Response, SerializeError>
    where
        T: Serialize + ?Sized,
        C: Context + ?Sized,
    {
        let body = self.encode(ctx, value)?;
        Ok(response_with_body(status, ctx.response_type(), body))
    }

    fn deserialize<T, C>(&self, ctx: &C) -> Result<T, DecodeError>
    where
        T: DeserializeOwned + Debug,
        C: Context + ?Sized,
    {
        match self.serializer.deserialize::<T>(ctx.body()) {
            Ok(value) => {
                self.log_decoded(&value);
                Ok(value)
            }
            Err(e) if e.is_malformed_input() => {
                let head = ctx.head();
                tracing::debug!(
                    http.request.method = %head.method,
                    url.path = head.target.path(),
                    content_type = ?head.content_type(),
                    "The request body is malformed"
                );
                let error = BusinessError::new(StatusCode::BAD_REQUEST)
                    .because(BODY_FIELD, [self.config.invalid_format_message.as_str()])
                    .with_cause(e);
                Err(DecodeError::MalformedBody(error))
            }
            Err(e) => Err(UnexpectedDecodeError::new(e).into()),
        }
    }

    fn validate(&self, value: &dyn Validatable) -> Result<(), DecodeError> {
        let violations = self
            .validator
            .validate(&value)
            .map_err(UnexpectedDecodeError::new)?;
        if violations.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            n_violations = violations.len(),
            "The request body violates its constraints"
        );
        Err(DecodeError::Validation(value.to_business_error(violations)))
    }

    fn log_decoded<T>(&self, value: &T)
    where
        T: Debug,
    {
        match self.config.body_logging {
            BodyLogging::Full => {
                tracing::debug!(body = ?value, "Decoded the request body");
            }
            BodyLogging::TypeName => {
                tracing::debug!(
                    body.type_name = std::any::type_name::<T>(),
                    "Decoded the request body"
                );
            }
            BodyLogging::Off => {}
        }
    }
}
