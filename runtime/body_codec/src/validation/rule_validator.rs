use crate::config::ValidationConfig;

use super::{Constrained, Constraints, Validator, ValidatorError, Violations};

#[derive(Debug, Clone, Copy, Default)]
/// The default [`Validator`]: it evaluates the rules each value declares
/// through [`Constrained`].
///
/// It holds no mutable state, so a single instance can serve every request.
pub struct RuleValidator {
    fail_fast: bool,
}

impl RuleValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            fail_fast: config.fail_fast,
        }
    }

    /// Stop at the first violation instead of collecting all of them.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

impl Validator for RuleValidator {
    fn validate(&self, value: &dyn Constrained) -> Result<Violations, ValidatorError> {
        let mut constraints = Constraints::new().fail_fast(self.fail_fast);
        value.constraints(&mut constraints);
        let violations = constraints.into_violations();
        tracing::trace!(n_violations = violations.len(), "Evaluated constraints");
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::RuleValidator;
    use crate::config::ValidationConfig;
    use crate::validation::{Constrained, Constraints, Validator};

    struct NotebookRequest {
        title: String,
    }

    impl Constrained for NotebookRequest {
        fn constraints(&self, c: &mut Constraints) {
            c.field("title")
                .not_empty(&self.title, "is required")
                .length(&self.title, 1..=256, "must be between 1 and 256 characters long");
        }
    }

    #[test]
    fn valid_value_has_no_violations() {
        let request = NotebookRequest {
            title: "Recipes".into(),
        };
        let violations = RuleValidator::default().validate(&request).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn all_violations_are_collected_by_default() {
        let request = NotebookRequest { title: "".into() };
        let violations = RuleValidator::default().validate(&request).unwrap();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn fail_fast_is_read_from_config() {
        let request = NotebookRequest { title: "".into() };
        let validator = RuleValidator::new(&ValidationConfig { fail_fast: true });
        let violations = validator.validate(&request).unwrap();
        let messages: Vec<_> = violations.iter().map(|v| v.message()).collect();
        assert_eq!(messages, ["is required"]);
    }
}
