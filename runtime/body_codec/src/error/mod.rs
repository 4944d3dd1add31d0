//! The client-facing error type, [`BusinessError`].
pub use business::{BusinessError, ErrorsEntity, FieldErrorEntity};

mod business;
