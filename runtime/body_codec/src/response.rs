//! Building HTTP responses out of encoded bodies and errors.
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use mime::Mime;

/// The response type produced by this crate: a fully buffered body.
pub type Response = http::Response<Bytes>;

/// Build a response with the given status, `Content-Type` and body.
///
/// The `Content-Type` header is omitted if no media type is provided.
pub fn response_with_body(status: StatusCode, media_type: Option<&Mime>, body: Bytes) -> Response {
    let mut response = http::Response::new(body);
    *response.status_mut() = status;
    if let Some(media_type) = media_type {
        // `Mime`'s textual representation is always a valid header value.
        if let Ok(value) = HeaderValue::from_str(media_type.as_ref()) {
            response.headers_mut().insert(CONTENT_TYPE, value);
        }
    }
    response
}

/// A response with an empty body, declared as `application/json`.
///
/// Used for opaque error responses, whose details are only logged.
pub(crate) fn empty_json_response(status: StatusCode) -> Response {
    response_with_body(status, Some(&mime::APPLICATION_JSON), Bytes::new())
}
