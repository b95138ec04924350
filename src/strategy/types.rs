use serde::{Deserialize, Serialize};

/// One tunable input of a strategy, as declared in its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    pub declared_type: String,
    /// Initial value as written in the source, when one could be found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Verdict of a validation run.
///
/// `is_valid` is derived from `errors`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Errors in the order the checks ran
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// How the converter found the source laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceShape {
    /// Already declares the target namespace; only missing usings are added
    CompleteUnit,
    /// Declares a class but no namespace; wrapped in the namespace
    ClassDeclaration,
    /// Bare members; wrapped in the namespace and a generated class
    Members,
}

/// Output of one conversion. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub generated_code: String,
    pub class_name: String,
    pub shape: SourceShape,
    pub parameters: Vec<ParameterDescriptor>,
}
