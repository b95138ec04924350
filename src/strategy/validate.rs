use log::{debug, trace};
use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::DialectError;
use crate::strategy::rules::{default_rules, StructuralRule};
use crate::strategy::types::ValidationResult;

pub const EMPTY_SOURCE_ERROR: &str = "Strategy code cannot be empty";

/// Checks strategy sources against an ordered, fixed set of structural rules.
///
/// Clones share the rule objects.
#[derive(Clone)]
pub struct Validator {
    rules: Vec<Arc<dyn StructuralRule>>,
}

impl Validator {
    pub fn new(rules: Vec<Box<dyn StructuralRule>>) -> Self {
        Self {
            rules: rules.into_iter().map(Arc::from).collect(),
        }
    }

    /// Namespace, base type and entry method rules for `dialect`.
    pub fn for_dialect(dialect: &Dialect) -> Result<Self, DialectError> {
        Ok(Self::new(default_rules(dialect)?))
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn StructuralRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Empty input yields exactly one error. Otherwise every rule runs and
    /// each failure is reported, in rule order.
    pub fn validate(&self, source: &str) -> ValidationResult {
        if source.trim().is_empty() {
            return ValidationResult::from_errors(vec![EMPTY_SOURCE_ERROR.to_string()]);
        }

        let mut errors = Vec::new();
        for rule in &self.rules {
            match rule.check(source) {
                Some(message) => {
                    trace!("rule {} failed", rule.name());
                    errors.push(message);
                }
                None => trace!("rule {} passed", rule.name()),
            }
        }

        debug!(
            "validated {} bytes against {} rules: {} errors",
            source.len(),
            self.rules.len(),
            errors.len()
        );
        ValidationResult::from_errors(errors)
    }
}

impl Default for Validator {
    fn default() -> Self {
        crate::pipeline::default_engine().validator().clone()
    }
}

/// `validate` for the default dialect.
pub fn validate(source: &str) -> ValidationResult {
    crate::pipeline::default_engine().validate(source)
}
