pub mod batch;
pub mod cli;
pub mod dialect;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod strategy;

pub use dialect::Dialect;
pub use error::{ConvertError, DialectError};
pub use pipeline::{ConvertPolicy, Engine, PipelineReport};
pub use strategy::{
    convert, extract_parameters, validate, ConversionResult, Converter, ParameterDescriptor,
    ParameterExtractor, SourceShape, StructuralRule, ValidationResult, Validator,
};
