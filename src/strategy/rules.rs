use regex::Regex;

use crate::dialect::Dialect;
use crate::error::DialectError;

/// A single structural requirement a strategy source must meet.
///
/// Rules only look at the text they are given and hold no mutable state, so
/// one rule set can be shared by any number of concurrent validations.
pub trait StructuralRule: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;
    fn is_satisfied(&self, source: &str) -> bool;
    /// Error reported when the rule is not satisfied
    fn message(&self) -> &str;

    fn check(&self, source: &str) -> Option<String> {
        if self.is_satisfied(source) {
            None
        } else {
            Some(self.message().to_string())
        }
    }
}

/// Rule satisfied when a regex matches anywhere in the source.
///
/// Matching is purely textual: a declaration inside a comment or string
/// literal still counts.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    pattern: Regex,
    message: String,
}

impl PatternRule {
    pub fn new(name: &str, pattern: &str, message: impl Into<String>) -> Result<Self, DialectError> {
        Ok(Self {
            name: name.to_string(),
            pattern: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    /// `namespace PowerLanguage.Strategy`
    pub fn namespace(dialect: &Dialect) -> Result<Self, DialectError> {
        Self::new(
            "namespace",
            &format!(r"\bnamespace\s+{}\b", regex::escape(&dialect.namespace)),
            format!("Strategy must be in {} namespace", dialect.namespace),
        )
    }

    /// `class X : SignalObject`, optionally with the base type qualified
    pub fn base_type(dialect: &Dialect) -> Result<Self, DialectError> {
        Self::new(
            "base_type",
            &format!(r":\s*(?:\w+\s*\.\s*)*{}\b", regex::escape(&dialect.base_type)),
            format!("Strategy must inherit from {}", dialect.base_type),
        )
    }

    /// `void CalcBar(`, i.e. a declaration rather than a call
    pub fn entry_method(dialect: &Dialect) -> Result<Self, DialectError> {
        Self::new(
            "entry_method",
            &format!(r"\bvoid\s+{}\s*\(", regex::escape(&dialect.entry_method)),
            format!("Strategy must implement {}() method", dialect.entry_method),
        )
    }
}

impl StructuralRule for PatternRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_satisfied(&self, source: &str) -> bool {
        self.pattern.is_match(source)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Rules every dialect starts from, in reporting order.
pub fn default_rules(dialect: &Dialect) -> Result<Vec<Box<dyn StructuralRule>>, DialectError> {
    let rules: Vec<Box<dyn StructuralRule>> = vec![
        Box::new(PatternRule::namespace(dialect)?),
        Box::new(PatternRule::base_type(dialect)?),
        Box::new(PatternRule::entry_method(dialect)?),
    ];
    Ok(rules)
}
