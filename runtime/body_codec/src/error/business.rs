use std::fmt;

use bytes::Bytes;
use http::StatusCode;
use indexmap::IndexMap;

use crate::response::{Response, response_with_body};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A client-facing error: a status code plus, for each offending field,
/// the list of messages explaining what's wrong with it.
///
/// Fields and messages are kept in insertion order, so that clients can
/// display them next to the corresponding form inputs in a stable order.
///
/// # Example
///
/// ```rust
/// use body_codec::BusinessError;
/// use http::StatusCode;
///
/// let error = BusinessError::new(StatusCode::BAD_REQUEST)
///     .because("title", ["must not be empty"])
///     .because("title", ["must be at most 256 characters long"]);
///
/// assert_eq!(error.status(), StatusCode::BAD_REQUEST);
/// assert_eq!(
///     error.messages("title").unwrap(),
///     ["must not be empty", "must be at most 256 characters long"]
/// );
/// ```
#[derive(Debug)]
pub struct BusinessError {
    status: StatusCode,
    fields: IndexMap<String, Vec<String>>,
    cause: Option<BoxError>,
}

impl BusinessError {
    /// Create a new [`BusinessError`] with the given status code and no field errors.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            fields: IndexMap::new(),
            cause: None,
        }
    }

    /// Attach messages to a field.
    ///
    /// Messages are appended if the field already has some.
    pub fn because<F, I, M>(mut self, field: F, messages: I) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.fields
            .entry(field.into())
            .or_default()
            .extend(messages.into_iter().map(Into::into));
        self
    }

    /// Record the error that caused this one.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.cause = Some(cause.into());
        self
    }

    /// The status code of the response this error maps to.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// All field errors, in insertion order.
    pub fn fields(&self) -> &IndexMap<String, Vec<String>> {
        &self.fields
    }

    /// The messages attached to `field`, if any.
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// The error that caused this one, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// The representation sent to clients.
    pub fn entity(&self) -> ErrorsEntity<'_> {
        ErrorsEntity {
            errors: self
                .fields
                .iter()
                .map(|(field, descriptions)| FieldErrorEntity {
                    field,
                    descriptions,
                })
                .collect(),
        }
    }

    /// Convert a [`BusinessError`] into an HTTP response.
    ///
    /// The body is the JSON representation of [`BusinessError::entity`].
    pub fn into_response(&self) -> Response {
        let body = serde_json::to_vec(&self.entity())
            .expect("Failed to serialize a map of strings into a JSON buffer");
        response_with_body(self.status, Some(&mime::APPLICATION_JSON), Bytes::from(body))
    }
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The request was rejected ({})", self.status)?;
        for (field, messages) in &self.fields {
            write!(f, "\n- {field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for BusinessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[derive(serde::Serialize, Debug)]
/// The JSON body of a [`BusinessError`] response:
/// `{"errors":[{"field":"title","descriptions":["..."]}]}`.
pub struct ErrorsEntity<'a> {
    pub errors: Vec<FieldErrorEntity<'a>>,
}

#[derive(serde::Serialize, Debug)]
/// The errors for a single field.
pub struct FieldErrorEntity<'a> {
    pub field: &'a str,
    pub descriptions: &'a [String],
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use http::StatusCode;
    use http::header::CONTENT_TYPE;

    use super::BusinessError;

    #[test]
    fn messages_are_grouped_by_field_in_insertion_order() {
        let error = BusinessError::new(StatusCode::BAD_REQUEST)
            .because("title", ["required"])
            .because("color", ["unknown color"])
            .because("title", ["too long"]);

        let fields: Vec<_> = error.fields().keys().collect();
        assert_eq!(fields, ["title", "color"]);
        assert_eq!(error.messages("title").unwrap(), ["required", "too long"]);
        assert!(error.messages("body").is_none());
    }

    #[test]
    fn cause_is_exposed_as_source() {
        let error = BusinessError::new(StatusCode::BAD_REQUEST)
            .with_cause(std::io::Error::other("unexpected end of input"));
        assert_eq!(
            error.source().unwrap().to_string(),
            "unexpected end of input"
        );
        assert!(error.cause().is_some());
    }

    #[test]
    fn display() {
        let error = BusinessError::new(StatusCode::BAD_REQUEST)
            .because("name", ["must not be empty"])
            .because("tags", ["too many", "duplicated"]);
        insta::assert_snapshot!(error, @r###"
        The request was rejected (400 Bad Request)
        - name: must not be empty
        - tags: too many, duplicated
        "###);
    }

    #[test]
    fn response() {
        let response = BusinessError::new(StatusCode::UNPROCESSABLE_ENTITY)
            .because("body", ["invalid format"])
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body = std::str::from_utf8(response.body()).unwrap();
        insta::assert_snapshot!(body, @r#"{"errors":[{"field":"body","descriptions":["invalid format"]}]}"#);
    }

    #[test]
    fn response_without_field_errors() {
        let response = BusinessError::new(StatusCode::CONFLICT).into_response();
        let body = std::str::from_utf8(response.body()).unwrap();
        insta::assert_snapshot!(body, @r#"{"errors":[]}"#);
    }
}
