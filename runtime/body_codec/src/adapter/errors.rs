//! Errors that can occur while decoding a request body.
use http::StatusCode;
use tracing_log_error::log_error;

use crate::error::BusinessError;
use crate::response::{Response, empty_json_response};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`CodecAdapter::decode`].
///
/// [`CodecAdapter::decode`]: crate::CodecAdapter::decode
pub enum DecodeError {
    /// The body doesn't follow the grammar of the expected format.
    ///
    /// The error is a `400 Bad Request` with a single message under the `body` field.
    /// Its cause is the error returned by the serializer.
    #[error(transparent)]
    MalformedBody(BusinessError),
    /// The body was decoded, but the value violates its own constraints.
    ///
    /// The error was built by the decoded value itself, via
    /// [`Validatable::to_business_error`](crate::validation::Validatable::to_business_error).
    #[error(transparent)]
    Validation(BusinessError),
    /// Something went wrong that has nothing to do with the caller's input.
    #[error(transparent)]
    Unexpected(#[from] UnexpectedDecodeError),
}

impl DecodeError {
    /// The client-facing error, unless the failure was unexpected.
    pub fn business_error(&self) -> Option<&BusinessError> {
        match self {
            DecodeError::MalformedBody(e) | DecodeError::Validation(e) => Some(e),
            DecodeError::Unexpected(_) => None,
        }
    }

    /// Convert a [`DecodeError`] into an HTTP response.
    ///
    /// Malformed bodies and validation failures are rendered with
    /// [`BusinessError::into_response`]. Unexpected failures are logged and
    /// turned into an opaque `500 Internal Server Error`.
    pub fn into_response(&self) -> Response {
        match self {
            DecodeError::MalformedBody(e) | DecodeError::Validation(e) => e.into_response(),
            DecodeError::Unexpected(e) => {
                log_error!(e, "Failed to decode the request body");
                empty_json_response(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Something went wrong while decoding the request body.")]
#[non_exhaustive]
/// A decoding failure that isn't caused by the caller's input, e.g. a faulty
/// serializer or validator.
///
/// The original error is available as [`source`](std::error::Error::source).
pub struct UnexpectedDecodeError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl UnexpectedDecodeError {
    pub(crate) fn new<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use http::StatusCode;
    use http::header::CONTENT_TYPE;

    use super::{DecodeError, UnexpectedDecodeError};
    use crate::error::BusinessError;

    #[test]
    fn validation_errors_are_rendered_as_business_errors() {
        let error = DecodeError::Validation(
            BusinessError::new(StatusCode::BAD_REQUEST).because("name", ["is required"]),
        );
        assert!(error.business_error().is_some());

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = std::str::from_utf8(response.body()).unwrap();
        insta::assert_snapshot!(body, @r#"{"errors":[{"field":"name","descriptions":["is required"]}]}"#);
    }

    #[test]
    fn unexpected_errors_are_opaque() {
        let error: DecodeError =
            UnexpectedDecodeError::new(std::io::Error::other("connection reset")).into();
        assert!(error.business_error().is_none());
        assert_eq!(error.source().unwrap().to_string(), "connection reset");

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert!(response.body().is_empty());
    }
}
