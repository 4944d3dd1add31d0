use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::ops::RangeBounds;

use indexmap::IndexMap;

use super::{Constrained, Violation, Violations};

#[derive(Debug, Default)]
/// Collects the outcome of the constraints declared by a [`Constrained`] value.
///
/// Field paths are relative to the value being checked: nested values are
/// prefixed with `name.`, sequence elements with `name[i].`.
///
/// # Example
///
/// ```rust
/// use body_codec::validation::{Constrained, Constraints};
///
/// struct Section {
///     title: String,
/// }
///
/// struct PageRequest {
///     title: String,
///     sections: Vec<Section>,
/// }
///
/// impl Constrained for Section {
///     fn constraints(&self, c: &mut Constraints) {
///         c.field("title").not_blank(&self.title, "must not be blank");
///     }
/// }
///
/// impl Constrained for PageRequest {
///     fn constraints(&self, c: &mut Constraints) {
///         c.field("title")
///             .not_empty(&self.title, "is required")
///             .length(&self.title, ..=256, "must be at most 256 characters long");
///         c.each("sections", &self.sections);
///     }
/// }
///
/// let page = PageRequest {
///     title: "".into(),
///     sections: vec![Section { title: "Intro".into() }, Section { title: "  ".into() }],
/// };
/// let mut constraints = Constraints::new();
/// page.constraints(&mut constraints);
///
/// let paths: Vec<_> = constraints.violations().iter().map(|v| v.path()).collect();
/// assert_eq!(paths, ["title", "sections[1].title"]);
/// ```
pub struct Constraints {
    prefix: String,
    violations: Violations,
    fail_fast: bool,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop recording violations after the first one.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Start declaring constraints for the field called `name`.
    pub fn field(&mut self, name: &str) -> FieldConstraints<'_> {
        let path = self.path(name);
        FieldConstraints {
            constraints: self,
            path,
        }
    }

    /// Check the constraints declared by a nested value, under `name.`.
    pub fn nested<C>(&mut self, name: &str, value: &C) -> &mut Self
    where
        C: Constrained + ?Sized,
    {
        let prefix = format!("{}.", self.path(name));
        self.scoped(prefix, value)
    }

    /// Check the constraints declared by each element of a sequence, under `name[i].`.
    pub fn each<'v, C, I>(&mut self, name: &str, values: I) -> &mut Self
    where
        C: Constrained + 'v,
        I: IntoIterator<Item = &'v C>,
    {
        for (i, value) in values.into_iter().enumerate() {
            let prefix = format!("{}[{i}].", self.path(name));
            self.scoped(prefix, value);
        }
        self
    }

    /// Record a violation for the field called `name`.
    pub fn violation<M>(&mut self, name: &str, message: M) -> &mut Self
    where
        M: Into<Cow<'static, str>>,
    {
        let path = self.path(name);
        self.record(path, message);
        self
    }

    /// The violations recorded so far.
    pub fn violations(&self) -> &Violations {
        &self.violations
    }

    pub fn into_violations(self) -> Violations {
        self.violations
    }

    fn scoped<C>(&mut self, prefix: String, value: &C) -> &mut Self
    where
        C: Constrained + ?Sized,
    {
        if self.is_done() {
            return self;
        }
        let outer = std::mem::replace(&mut self.prefix, prefix);
        value.constraints(self);
        self.prefix = outer;
        self
    }

    fn path(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    fn is_done(&self) -> bool {
        self.fail_fast && !self.violations.is_empty()
    }

    fn record<M>(&mut self, path: String, message: M)
    where
        M: Into<Cow<'static, str>>,
    {
        if self.is_done() {
            return;
        }
        self.violations.insert(Violation::new(path, message));
    }
}

/// The constraints declared on a single field.
///
/// Returned by [`Constraints::field`]; every rule returns `&mut Self` so that
/// rules can be chained.
pub struct FieldConstraints<'c> {
    constraints: &'c mut Constraints,
    path: String,
}

impl FieldConstraints<'_> {
    /// The value must be present and contain at least one element (or character).
    pub fn not_empty<V, M>(&mut self, value: &V, message: M) -> &mut Self
    where
        V: Measurable + ?Sized,
        M: Into<Cow<'static, str>>,
    {
        let valid = matches!(value.measure(), Some(n) if n > 0);
        self.check(valid, message)
    }

    /// The value must be present and contain at least one non-whitespace character.
    pub fn not_blank<V, M>(&mut self, value: &V, message: M) -> &mut Self
    where
        V: Textual + ?Sized,
        M: Into<Cow<'static, str>>,
    {
        let valid = value.text().is_some_and(|text| !text.trim().is_empty());
        self.check(valid, message)
    }

    /// The size of the value must fall within `bounds`.
    ///
    /// Strings are measured in characters, collections in elements.
    /// Absent values are not checked.
    pub fn length<V, R, M>(&mut self, value: &V, bounds: R, message: M) -> &mut Self
    where
        V: Measurable + ?Sized,
        R: RangeBounds<usize>,
        M: Into<Cow<'static, str>>,
    {
        let valid = value.measure().is_none_or(|n| bounds.contains(&n));
        self.check(valid, message)
    }

    /// The value must fall within `bounds`.
    pub fn range<T, R, M>(&mut self, value: &T, bounds: R, message: M) -> &mut Self
    where
        T: PartialOrd,
        R: RangeBounds<T>,
        M: Into<Cow<'static, str>>,
    {
        self.check(bounds.contains(value), message)
    }

    /// Record a violation unless `valid` holds.
    pub fn check<M>(&mut self, valid: bool, message: M) -> &mut Self
    where
        M: Into<Cow<'static, str>>,
    {
        if !valid {
            self.constraints.record(self.path.clone(), message);
        }
        self
    }
}

/// Values whose size can be checked by [`FieldConstraints::not_empty`]
/// and [`FieldConstraints::length`].
pub trait Measurable {
    /// The size of the value, or `None` if the value is absent.
    fn measure(&self) -> Option<usize>;
}

impl Measurable for str {
    fn measure(&self) -> Option<usize> {
        Some(self.chars().count())
    }
}

impl Measurable for String {
    fn measure(&self) -> Option<usize> {
        self.as_str().measure()
    }
}

impl<T> Measurable for [T] {
    fn measure(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T> Measurable for Vec<T> {
    fn measure(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<K, V, S> Measurable for HashMap<K, V, S> {
    fn measure(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<K, V> Measurable for BTreeMap<K, V> {
    fn measure(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<K, V, S> Measurable for IndexMap<K, V, S> {
    fn measure(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<V> Measurable for Option<V>
where
    V: Measurable,
{
    fn measure(&self) -> Option<usize> {
        self.as_ref().and_then(Measurable::measure)
    }
}

/// Values that can be checked by [`FieldConstraints::not_blank`].
pub trait Textual {
    /// The text, or `None` if the value is absent.
    fn text(&self) -> Option<&str>;
}

impl Textual for str {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl Textual for String {
    fn text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T> Textual for Option<T>
where
    T: Textual,
{
    fn text(&self) -> Option<&str> {
        self.as_ref().and_then(Textual::text)
    }
}
