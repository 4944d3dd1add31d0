//! Check decoded values against the constraints they declare.
//!
//! # Overview
//!
//! Validation involves three parties:
//!
//! 1. The value, which declares its constraints by implementing [`Constrained`].
//! 2. A [`Validator`], which evaluates those constraints and collects [`Violations`].
//!    [`RuleValidator`] is the implementation used by default.
//! 3. The value again, which turns the violations into a client-facing
//!    [`BusinessError`] via [`Validatable::to_business_error`].
//!
//! Each request type owns the shape of its own validation errors: the
//! [`CodecAdapter`](crate::CodecAdapter) never builds them.
//!
//! Every type decoded by the [`CodecAdapter`](crate::CodecAdapter) implements
//! [`RequestBody`]. Validatable types report it through
//! [`RequestBody::validatable`], and the adapter validates them on every decode.
//!
//! # Example
//!
//! ```rust
//! use body_codec::validation::{
//!     Constrained, Constraints, RequestBody, RuleValidator, Validatable, Validator,
//! };
//!
//! struct TagRequest {
//!     name: String,
//! }
//!
//! impl Constrained for TagRequest {
//!     fn constraints(&self, c: &mut Constraints) {
//!         c.field("name").not_empty(&self.name, "is required");
//!     }
//! }
//!
//! impl RequestBody for TagRequest {
//!     fn validatable(&self) -> Option<&dyn Validatable> {
//!         Some(self)
//!     }
//! }
//!
//! impl Validatable for TagRequest {}
//!
//! let request = TagRequest { name: "".into() };
//! let violations = RuleValidator::default().validate(&request).unwrap();
//! let error = request.to_business_error(violations);
//!
//! assert_eq!(error.status(), http::StatusCode::BAD_REQUEST);
//! assert_eq!(error.messages("name").unwrap(), ["is required"]);
//! ```
use std::borrow::Cow;

use http::StatusCode;

use crate::error::BusinessError;

pub use constraints::{Constraints, FieldConstraints, Measurable, Textual};
pub use rule_validator::RuleValidator;

mod constraints;
mod rule_validator;

/// A type that declares the constraints its values must satisfy.
pub trait Constrained {
    /// Declare the constraints for `self` on `constraints`.
    fn constraints(&self, constraints: &mut Constraints);
}

impl<C> Constrained for Option<C>
where
    C: Constrained,
{
    fn constraints(&self, constraints: &mut Constraints) {
        if let Some(value) = self {
            value.constraints(constraints);
        }
    }
}

impl<C> Constrained for Box<C>
where
    C: Constrained + ?Sized,
{
    fn constraints(&self, constraints: &mut Constraints) {
        (**self).constraints(constraints);
    }
}

impl<C> Constrained for &C
where
    C: Constrained + ?Sized,
{
    fn constraints(&self, constraints: &mut Constraints) {
        (**self).constraints(constraints);
    }
}

/// A type that request bodies can be decoded into.
///
/// The [`CodecAdapter`](crate::CodecAdapter) asks every decoded value whether
/// it can be validated. Types without constraints rely on the provided
/// implementation:
///
/// ```rust
/// use body_codec::validation::RequestBody;
///
/// #[derive(serde::Deserialize, Debug)]
/// struct TrashQuery {
///     notebook_id: u64,
/// }
///
/// impl RequestBody for TrashQuery {}
/// ```
///
/// [`Validatable`] types must return `Some(self)`, otherwise their constraints
/// are never checked.
pub trait RequestBody {
    /// `self` as a [`Validatable`] value, if its type can be validated.
    fn validatable(&self) -> Option<&dyn Validatable> {
        None
    }
}

impl RequestBody for serde_json::Value {}

/// The capability a request type implements to be validated on decode.
///
/// Implementors own the conversion of their violations into a [`BusinessError`].
/// The provided implementation returns a `400 Bad Request` whose field errors are
/// the violation messages grouped by field path, in first-occurrence order.
/// Override it to pick a different status code or message layout.
pub trait Validatable: Constrained + RequestBody {
    /// Convert a non-empty set of violations into a client-facing error.
    fn to_business_error(&self, violations: Violations) -> BusinessError {
        violations
            .into_iter()
            .fold(BusinessError::new(StatusCode::BAD_REQUEST), |error, v| {
                error.because(v.path, [v.message])
            })
    }
}

/// Evaluates the constraints declared by a value.
///
/// Implementations must be usable from many requests at once, without locking.
pub trait Validator: Send + Sync {
    /// Collect all the constraints that `value` violates.
    ///
    /// An empty set means that `value` is valid.
    /// An error means that the validator itself failed.
    fn validate(&self, value: &dyn Constrained) -> Result<Violations, ValidatorError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A single constraint failure.
pub struct Violation {
    path: String,
    message: Cow<'static, str>,
}

impl Violation {
    /// Create a new violation for the field at `path`.
    pub fn new<P, M>(path: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<Cow<'static, str>>,
    {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The path to the offending field, e.g. `sections[1].title`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// A human-readable explanation of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// An ordered set of [`Violation`]s.
///
/// Insertion order is preserved; a violation equal to one already in the set
/// is not recorded twice.
pub struct Violations(Vec<Violation>);

impl Violations {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a violation to the set.
    ///
    /// It returns `false` if an equal violation was already there.
    pub fn insert(&mut self, violation: Violation) -> bool {
        if self.0.contains(&violation) {
            return false;
        }
        self.0.push(violation);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        let mut violations = Self::new();
        for violation in iter {
            violations.insert(violation);
        }
        violations
    }
}

#[derive(Debug, thiserror::Error)]
#[error("The validator failed unexpectedly.")]
/// The error returned by [`Validator::validate`] when the validator itself fails.
pub struct ValidatorError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl ValidatorError {
    pub fn new<E>(source: E) -> Self
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
    use http::StatusCode;

    use super::*;

    struct SectionRequest;

    impl Constrained for SectionRequest {
        fn constraints(&self, _constraints: &mut Constraints) {}
    }

    impl RequestBody for SectionRequest {
        fn validatable(&self) -> Option<&dyn Validatable> {
            Some(self)
        }
    }

    impl Validatable for SectionRequest {}

    #[test]
    fn duplicated_violations_are_recorded_once() {
        let mut violations = Violations::new();
        assert!(violations.insert(Violation::new("title", "is required")));
        assert!(!violations.insert(Violation::new("title", "is required")));
        assert!(violations.insert(Violation::new("title", "is too long")));
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn default_business_error_groups_messages_by_field() {
        let violations: Violations = [
            Violation::new("title", "is required"),
            Violation::new("notebook_id", "must be positive"),
            Violation::new("title", "is too long"),
        ]
        .into_iter()
        .collect();

        let error = SectionRequest.to_business_error(violations);

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        let fields: Vec<_> = error.fields().keys().collect();
        assert_eq!(fields, ["title", "notebook_id"]);
        assert_eq!(error.messages("title").unwrap(), ["is required", "is too long"]);
        assert_eq!(error.messages("notebook_id").unwrap(), ["must be positive"]);
        assert!(error.cause().is_none());
    }
}
