//! The per-request view that codecs read from and write into.
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, Uri, Version};
use mime::Mime;

/// The request-scoped context a [`CodecAdapter`](crate::CodecAdapter) operates on.
///
/// It exposes the incoming request (head and buffered body) and lets the codec
/// declare the media type of the response it is about to produce.
///
/// A context is never shared across requests.
pub trait Context {
    /// The head of the incoming request.
    fn head(&self) -> &RequestHead;

    /// The raw bytes of the incoming request body.
    ///
    /// It may be empty.
    fn body(&self) -> &[u8];

    /// Set the media type used for the response when no explicit one has been set.
    fn set_default_response_type(&mut self, media_type: Mime);

    /// The media type that will be declared for the response, if any.
    ///
    /// An explicitly set response type takes precedence over the default one.
    fn response_type(&self) -> Option<&Mime>;
}

#[derive(Debug)]
/// All the information that is transmitted as part of an HTTP request ahead of the body.
///
/// It includes the [method](Method), the [target](Uri),
/// the [HTTP version](Version), and the [headers](HeaderMap).
pub struct RequestHead {
    /// The HTTP method of the request.
    pub method: Method,
    /// The [target](https://datatracker.ietf.org/doc/html/rfc7230#section-5.3) of the request.
    pub target: Uri,
    /// The HTTP version used by the request.
    pub version: Version,
    /// The headers attached to the request.
    pub headers: HeaderMap,
}

impl RequestHead {
    /// The media type declared by the `Content-Type` header.
    ///
    /// It returns `None` if the header is missing or it isn't a valid media type.
    pub fn content_type(&self) -> Option<Mime> {
        self.headers
            .get(CONTENT_TYPE)?
            .to_str()
            .ok()?
            .parse()
            .ok()
    }
}

impl From<http::request::Parts> for RequestHead {
    fn from(parts: http::request::Parts) -> Self {
        Self {
            method: parts.method,
            target: parts.uri,
            version: parts.version,
            headers: parts.headers,
        }
    }
}

#[derive(Debug)]
/// The [`Context`] implementation for a request whose body has already been
/// buffered in memory.
///
/// # Example
///
/// ```rust
/// use body_codec::{Context, RequestContext};
///
/// let request = http::Request::post("/tags")
///     .header("content-type", "application/json")
///     .body(bytes::Bytes::from_static(br#"{"name":"rust"}"#))
///     .unwrap();
/// let ctx = RequestContext::from(request);
///
/// assert_eq!(ctx.body(), br#"{"name":"rust"}"#);
/// assert!(ctx.response_type().is_none());
/// ```
pub struct RequestContext {
    head: RequestHead,
    body: Bytes,
    response_type: Option<Mime>,
    default_response_type: Option<Mime>,
}

impl RequestContext {
    /// Build a new context from the request head and its buffered body.
    pub fn new(head: RequestHead, body: Bytes) -> Self {
        Self {
            head,
            body,
            response_type: None,
            default_response_type: None,
        }
    }

    /// Set the response media type explicitly.
    ///
    /// It overrides whatever default a codec might set.
    pub fn set_response_type(&mut self, media_type: Mime) {
        self.response_type = Some(media_type);
    }

    /// The default response media type, if one was set.
    pub fn default_response_type(&self) -> Option<&Mime> {
        self.default_response_type.as_ref()
    }
}

impl<B> From<http::Request<B>> for RequestContext
where
    B: Into<Bytes>,
{
    fn from(request: http::Request<B>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.into(), body.into())
    }
}

impl Context for RequestContext {
    fn head(&self) -> &RequestHead {
        &self.head
    }

    fn body(&self) -> &[u8] {
        self.body.as_ref()
    }

    fn set_default_response_type(&mut self, media_type: Mime) {
        self.default_response_type = Some(media_type);
    }

    fn response_type(&self) -> Option<&Mime> {
        self.response_type
            .as_ref()
            .or(self.default_response_type.as_ref())
    }
}
