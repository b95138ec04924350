pub mod types;
pub mod rules;
pub mod validate;
pub mod params;
pub mod convert;

pub use types::*;
pub use rules::{default_rules, PatternRule, StructuralRule};
pub use validate::{validate, Validator, EMPTY_SOURCE_ERROR};
pub use params::{extract_parameters, ParameterExtractor};
pub use convert::{convert, sanitize_class_name, Converter};
