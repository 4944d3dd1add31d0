//! # body_codec
//!
//! Decode, validate and encode the bodies of HTTP requests and responses.
//!
//! [`CodecAdapter`] sits between a server's request context and two
//! collaborators:
//!
//! - a [`Serializer`](serialization::Serializer), which converts between raw
//!   bytes and typed values ([`JsonSerializer`](serialization::JsonSerializer)
//!   by default);
//! - a [`Validator`](validation::Validator), which checks the constraints
//!   declared by decoded values ([`RuleValidator`](validation::RuleValidator)
//!   by default).
//!
//! Malformed bodies and validation failures surface as a [`BusinessError`]:
//! a status code plus a list of messages for each offending field, ready to be
//! rendered for clients. Everything else is reported as an unexpected failure.
//!
//! Outbound, an absent value is encoded as an empty body rather than a `null`
//! document.
pub use adapter::{CodecAdapter, DecodeError};
pub use config::CodecConfig;
pub use context::{Context, RequestContext, RequestHead};
pub use error::BusinessError;

pub mod adapter;
pub mod config;
mod context;
pub mod error;
pub mod response;
pub mod serialization;
pub mod validation;
