use log::debug;
use regex::Regex;

use crate::dialect::{is_identifier, Dialect};
use crate::error::{ConvertError, DialectError};
use crate::strategy::params::ParameterExtractor;
use crate::strategy::rules::{PatternRule, StructuralRule};
use crate::strategy::types::{ConversionResult, SourceShape};

const INDENT: &str = "    ";

/// Wraps strategy sources into a compilable unit of the target dialect.
///
/// The original text is embedded untouched; only boilerplate is added
/// around it, so the output always contains the input verbatim.
#[derive(Debug, Clone)]
pub struct Converter {
    dialect: Dialect,
    class_name: String,
    namespace_rule: PatternRule,
    derived_class: Regex,
    extractor: ParameterExtractor,
}

impl Converter {
    pub fn for_dialect(dialect: &Dialect) -> Result<Self, DialectError> {
        dialect.validate()?;
        let derived_class = Regex::new(&format!(
            r"\bclass\s+(?P<name>[A-Za-z_]\w*)\s*(?:<[^>]*>)?\s*:\s*(?:\w+\s*\.\s*)*{}\b",
            regex::escape(&dialect.base_type)
        ))?;
        Ok(Self {
            dialect: dialect.clone(),
            class_name: dialect.class_name.clone(),
            namespace_rule: PatternRule::namespace(dialect)?,
            derived_class,
            extractor: ParameterExtractor::for_dialect(dialect)?,
        })
    }

    /// Use `name` for the generated class instead of the dialect default.
    pub fn with_class_name(mut self, name: &str) -> Result<Self, DialectError> {
        if !is_identifier(name) {
            return Err(DialectError::InvalidName {
                field: "class_name",
                value: name.to_string(),
            });
        }
        self.class_name = name.to_string();
        Ok(self)
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Decide how much boilerplate `source` still needs. Returns the shape and
    /// the name of a class in the source that already derives from the base
    /// type, if any.
    pub fn detect_shape(&self, source: &str) -> (SourceShape, Option<String>) {
        let existing = self
            .derived_class
            .captures(source)
            .and_then(|caps| caps.name("name"))
            .map(|m| m.as_str().to_string());

        match existing {
            Some(name) if self.namespace_rule.is_satisfied(source) => {
                (SourceShape::CompleteUnit, Some(name))
            }
            Some(name) => (SourceShape::ClassDeclaration, Some(name)),
            None => (SourceShape::Members, None),
        }
    }

    pub fn convert(&self, source: &str) -> ConversionResult {
        self.convert_as(source, &self.class_name)
    }

    /// Like `convert`, naming a generated class `class_name`. Falls back to the
    /// configured name when `class_name` is not an identifier. A class already
    /// present in the source keeps its own name.
    pub fn convert_as(&self, source: &str, class_name: &str) -> ConversionResult {
        let (shape, existing) = self.detect_shape(source);
        let class_name = match existing {
            Some(name) => name,
            None if is_identifier(class_name) => class_name.to_string(),
            None => self.class_name.clone(),
        };

        let mut code = self.missing_usings(source);
        match shape {
            SourceShape::CompleteUnit => {
                code.push_str(source);
            }
            SourceShape::ClassDeclaration => {
                code.push_str(&format!("namespace {}\n{{\n", self.dialect.namespace));
                code.push_str(source);
                ensure_newline(&mut code);
                code.push_str("}\n");
            }
            SourceShape::Members => {
                code.push_str(&format!("namespace {}\n{{\n", self.dialect.namespace));
                code.push_str(&format!(
                    "{INDENT}public class {class_name} : {}\n{INDENT}{{\n",
                    self.dialect.base_type
                ));
                code.push_str(&format!(
                    "{INDENT}{INDENT}public {class_name}(object _ctx) : base(_ctx) {{ }}\n\n"
                ));
                code.push_str(source);
                ensure_newline(&mut code);
                code.push_str(&format!("{INDENT}}}\n}}\n"));
            }
        }

        debug!(
            "converted {} bytes as {:?} into class {}",
            source.len(),
            shape,
            class_name
        );

        ConversionResult {
            generated_code: code,
            class_name,
            shape,
            parameters: self.extractor.extract(source),
        }
    }

    /// Convert raw bytes. Fails only when the bytes are not UTF-8 text.
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<ConversionResult, ConvertError> {
        let source = std::str::from_utf8(bytes).map_err(|e| ConvertError::InvalidUtf8 {
            offset: e.valid_up_to(),
        })?;
        Ok(self.convert(source))
    }

    /// `using` directives from the dialect that the source does not already have.
    fn missing_usings(&self, source: &str) -> String {
        let mut header = String::new();
        for using in &self.dialect.usings {
            let directive = format!("using {using};");
            if !source.lines().any(|line| line.trim() == directive) {
                header.push_str(&directive);
                header.push('\n');
            }
        }
        if !header.is_empty() {
            header.push('\n');
        }
        header
    }
}

impl Default for Converter {
    fn default() -> Self {
        crate::pipeline::default_engine().converter().clone()
    }
}

/// `convert` for the default dialect.
pub fn convert(source: &str) -> ConversionResult {
    crate::pipeline::default_engine().convert(source)
}

/// Turn a file stem like `rsi-reversal v2` into a class name (`RsiReversalV2`).
pub fn sanitize_class_name(raw: &str) -> Option<String> {
    let mut name = String::new();
    for word in raw.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    if name.is_empty() {
        return None;
    }
    if name.starts_with(|c: char| c.is_numeric()) {
        name.insert_str(0, "Strategy");
    }
    Some(name)
}

fn ensure_newline(code: &mut String) {
    if !code.ends_with('\n') {
        code.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_class_name() {
        assert_eq!(sanitize_class_name("rsi-reversal v2").as_deref(), Some("RsiReversalV2"));
        assert_eq!(sanitize_class_name("MyStrategy").as_deref(), Some("MyStrategy"));
        assert_eq!(sanitize_class_name("2ma_cross").as_deref(), Some("Strategy2ma_cross"));
        assert_eq!(sanitize_class_name("--"), None);
    }

    #[test]
    fn test_sanitized_names_are_identifiers() {
        for raw in ["a b c", "x.y", "_hidden", "9lives", "emoji🚀name"] {
            let name = sanitize_class_name(raw).unwrap();
            assert!(is_identifier(&name), "{name}");
        }
    }

    #[test]
    fn test_missing_usings_skips_present_ones() {
        let converter = Converter::default();
        let header = converter.missing_usings("using System;\n  using System.Linq;  \n");
        assert!(!header.contains("using System;"));
        assert!(!header.contains("using System.Linq;"));
        assert!(header.contains("using System.Drawing;"));
        assert!(header.ends_with(";\n\n"));
    }

    #[test]
    fn test_missing_usings_empty_when_all_present() {
        let dialect = Dialect {
            usings: vec!["System".to_string()],
            ..Dialect::default()
        };
        let converter = Converter::for_dialect(&dialect).unwrap();
        assert_eq!(converter.missing_usings("using System;"), "");
    }

    #[test]
    fn test_with_class_name_rejects_non_identifier() {
        assert!(Converter::default().with_class_name("Bad Name").is_err());
        assert!(Converter::default().with_class_name("GoodName").is_ok());
    }
}
