use thiserror::Error;

/// Problems with a dialect definition. Raised when building an engine,
/// never while validating or converting a strategy.
#[derive(Error, Debug)]
pub enum DialectError {
    #[error("Dialect field `{field}` cannot be empty")]
    Empty { field: &'static str },

    #[error("Dialect field `{field}` is not a valid name: {value}")]
    InvalidName { field: &'static str, value: String },

    #[error("Failed to read dialect file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dialect TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize dialect: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to build pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Conversion failures. Text input always converts; only input that is not
/// text at all ends up here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("Strategy source is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}
