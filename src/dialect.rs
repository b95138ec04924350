//! Target dialect configuration.
//!
//! A dialect names the pieces of boilerplate the backtesting engine expects
//! every strategy to carry: the namespace, the base type strategies inherit
//! from, and the method it calls on every bar. Defaults target MultiCharts
//! PowerLanguage .NET; other dialects are loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DialectError;

pub const DEFAULT_NAMESPACE: &str = "PowerLanguage.Strategy";
pub const DEFAULT_BASE_TYPE: &str = "SignalObject";
pub const DEFAULT_ENTRY_METHOD: &str = "CalcBar";
pub const DEFAULT_INPUT_ATTRIBUTE: &str = "Input";
pub const DEFAULT_CLASS_NAME: &str = "ConvertedStrategy";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Namespace every strategy must live in
    pub namespace: String,
    /// Type strategies must inherit from
    pub base_type: String,
    /// Method the engine calls once per bar
    pub entry_method: String,
    /// Attribute marking a tunable input
    pub input_attribute: String,
    /// Class name used when the converter has to generate the class itself
    pub class_name: String,
    /// `using` directives emitted ahead of the namespace
    pub usings: Vec<String>,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            base_type: DEFAULT_BASE_TYPE.to_string(),
            entry_method: DEFAULT_ENTRY_METHOD.to_string(),
            input_attribute: DEFAULT_INPUT_ATTRIBUTE.to_string(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
            usings: vec![
                "System".to_string(),
                "System.Drawing".to_string(),
                "System.Linq".to_string(),
                "PowerLanguage.Function".to_string(),
                "ATCenterProxy.interop".to_string(),
            ],
        }
    }
}

impl Dialect {
    /// Load and check a dialect from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, DialectError> {
        let content = std::fs::read_to_string(path).map_err(|source| DialectError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a dialect from a TOML string. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, DialectError> {
        let dialect: Dialect = toml::from_str(content)?;
        dialect.validate()?;
        Ok(dialect)
    }

    pub fn to_toml(&self) -> Result<String, DialectError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject names that could not appear in a declaration.
    pub fn validate(&self) -> Result<(), DialectError> {
        check_qualified("namespace", &self.namespace)?;
        check_identifier("base_type", &self.base_type)?;
        check_identifier("entry_method", &self.entry_method)?;
        check_identifier("input_attribute", &self.input_attribute)?;
        check_identifier("class_name", &self.class_name)?;
        for using in &self.usings {
            check_qualified("usings", using)?;
        }
        Ok(())
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn check_identifier(field: &'static str, value: &str) -> Result<(), DialectError> {
    if value.is_empty() {
        return Err(DialectError::Empty { field });
    }
    if !is_identifier(value) {
        return Err(DialectError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn check_qualified(field: &'static str, value: &str) -> Result<(), DialectError> {
    if value.is_empty() {
        return Err(DialectError::Empty { field });
    }
    if !value.split('.').all(is_identifier) {
        return Err(DialectError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
