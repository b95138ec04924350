//! The three strategy components bound to one dialect.
//!
//! `Engine` is immutable once built and holds no per-call state, so a single
//! instance can serve any number of threads.

use log::info;
use serde::Serialize;
use std::sync::OnceLock;

use crate::dialect::Dialect;
use crate::error::DialectError;
use crate::strategy::{
    ConversionResult, Converter, ParameterDescriptor, ParameterExtractor, ValidationResult,
    Validator,
};

/// Whether `Engine::run` converts sources that fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvertPolicy {
    /// Skip conversion when validation reports errors
    #[default]
    RequireValid,
    /// Convert regardless of the verdict
    Always,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub validation: ValidationResult,
    pub parameters: Vec<ParameterDescriptor>,
    /// Absent when the policy blocked conversion
    pub conversion: Option<ConversionResult>,
}

#[derive(Clone)]
pub struct Engine {
    dialect: Dialect,
    validator: Validator,
    converter: Converter,
    extractor: ParameterExtractor,
}

impl Engine {
    pub fn new(dialect: Dialect) -> Result<Self, DialectError> {
        dialect.validate()?;
        Ok(Self {
            validator: Validator::for_dialect(&dialect)?,
            converter: Converter::for_dialect(&dialect)?,
            extractor: ParameterExtractor::for_dialect(&dialect)?,
            dialect,
        })
    }

    /// Swap in a validator with custom rules.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_class_name(mut self, name: &str) -> Result<Self, DialectError> {
        self.converter = self.converter.with_class_name(name)?;
        Ok(self)
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn extractor(&self) -> &ParameterExtractor {
        &self.extractor
    }

    pub fn validate(&self, source: &str) -> ValidationResult {
        self.validator.validate(source)
    }

    pub fn convert(&self, source: &str) -> ConversionResult {
        self.converter.convert(source)
    }

    pub fn extract_parameters(&self, source: &str) -> Vec<ParameterDescriptor> {
        self.extractor.extract(source)
    }

    /// Validate, extract parameters, and convert unless `policy` forbids it.
    pub fn run(&self, source: &str, policy: ConvertPolicy) -> PipelineReport {
        self.run_named(source, policy, None)
    }

    /// `run` with a per-call name for the generated class.
    pub fn run_named(
        &self,
        source: &str,
        policy: ConvertPolicy,
        class_name: Option<&str>,
    ) -> PipelineReport {
        let validation = self.validate(source);
        let parameters = self.extract_parameters(source);

        let conversion = if validation.is_valid() || policy == ConvertPolicy::Always {
            Some(match class_name {
                Some(name) => self.converter.convert_as(source, name),
                None => self.converter.convert(source),
            })
        } else {
            info!(
                "skipping conversion: {} validation errors",
                validation.errors().len()
            );
            None
        };

        PipelineReport {
            validation,
            parameters,
            conversion,
        }
    }
}

/// Engine for the built-in dialect, compiled on first use and shared after.
pub fn default_engine() -> &'static Engine {
    static DEFAULT: OnceLock<Engine> = OnceLock::new();
    // Dialect::default() is fixed at compile time and covered by tests, so
    // building it cannot fail at run time.
    DEFAULT.get_or_init(|| Engine::new(Dialect::default()).expect("built-in dialect compiles"))
}
