use log::debug;
use regex::Regex;
use std::ops::Range;

use crate::dialect::Dialect;
use crate::error::DialectError;
use crate::strategy::types::ParameterDescriptor;

const MODIFIERS: &str = r"(?:(?:public|private|protected|internal|static|readonly|new|virtual|override)\s+)*";
const TYPE_NAME: &str = r"[A-Za-z_][\w.]*(?:\s*<[^<>;{}]*>)?(?:\s*\[\s*\])?\??";

/// Finds `[Input]`-style declarations and reports them in source order.
#[derive(Debug, Clone)]
pub struct ParameterExtractor {
    declaration: Regex,
    entry_method: Regex,
}

impl ParameterExtractor {
    pub fn for_dialect(dialect: &Dialect) -> Result<Self, DialectError> {
        // [Input] or [Input(...)], further attributes, modifiers, type, name, and
        // the token that starts the member body. Bodies are walked by hand since
        // accessors nest braces.
        let declaration = format!(
            r"\[\s*{attr}\s*(?:\([^\]]*\))?\s*\]\s*(?:\[[^\]]*\]\s*)*{MODIFIERS}(?P<ty>{TYPE_NAME})\s+(?P<name>[A-Za-z_]\w*)\s*(?P<tail>\{{|=>|=|;)",
            attr = regex::escape(&dialect.input_attribute),
        );
        let entry_method = format!(
            r"\bvoid\s+{}\s*\([^)]*\)\s*\{{",
            regex::escape(&dialect.entry_method)
        );
        Ok(Self {
            declaration: Regex::new(&declaration)?,
            entry_method: Regex::new(&entry_method)?,
        })
    }

    /// Best effort: anything that does not look like a declaration is skipped,
    /// so parameter-free or malformed input gives an empty list.
    pub fn extract(&self, source: &str) -> Vec<ParameterDescriptor> {
        let runtime = self.entry_method_bodies(source);

        let parameters: Vec<ParameterDescriptor> = self
            .declaration
            .captures_iter(source)
            .filter_map(|caps| {
                let name = caps.name("name")?.as_str().to_string();
                let declared_type = normalize_type(caps.name("ty")?.as_str());
                let tail = caps.name("tail")?;
                let inline = match tail.as_str() {
                    "{" => balanced_end(source, tail.start())
                        .and_then(|end| initializer(&source[end..])),
                    "=>" | "=" => value_until_semicolon(&source[tail.end()..]),
                    _ => None,
                };
                let default_value = inline.or_else(|| find_assignment(source, &name, &runtime));
                Some(ParameterDescriptor {
                    name,
                    declared_type,
                    default_value,
                })
            })
            .collect();

        debug!("extracted {} parameters", parameters.len());
        parameters
    }

    /// Byte ranges of the per-bar method bodies. Assignments there happen at
    /// run time and are not defaults.
    fn entry_method_bodies(&self, source: &str) -> Vec<Range<usize>> {
        self.entry_method
            .find_iter(source)
            .map(|m| {
                let open = m.end() - 1;
                open..balanced_end(source, open).unwrap_or(source.len())
            })
            .collect()
    }
}

impl Default for ParameterExtractor {
    fn default() -> Self {
        crate::pipeline::default_engine().extractor().clone()
    }
}

/// `extract_parameters` for the default dialect.
pub fn extract_parameters(source: &str) -> Vec<ParameterDescriptor> {
    crate::pipeline::default_engine().extract_parameters(source)
}

/// Index just past the brace that closes the one at `open`.
fn balanced_end(source: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in source[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// `= value;` following a property body.
fn initializer(rest: &str) -> Option<String> {
    let rest = rest.trim_start().strip_prefix('=')?;
    if rest.starts_with('=') || rest.starts_with('>') {
        return None;
    }
    value_until_semicolon(rest)
}

fn value_until_semicolon(rest: &str) -> Option<String> {
    let end = rest.find(';')?;
    let value = rest[..end].trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// First plain `Name = value;` (or `this.Name = value;`) outside `skip`, as
/// MultiCharts strategies assign input defaults in their constructor.
fn find_assignment(source: &str, name: &str, skip: &[Range<usize>]) -> Option<String> {
    for (start, _) in source.match_indices(name) {
        if skip.iter().any(|r| r.contains(&start)) {
            continue;
        }

        let before = &source[..start];
        if before.chars().next_back().is_some_and(is_ident_char) {
            continue;
        }
        if before.ends_with('.') {
            let Some(receiver) = before.strip_suffix("this.") else {
                continue;
            };
            if receiver.chars().next_back().is_some_and(is_ident_char) {
                continue;
            }
        }

        let after = &source[start + name.len()..];
        if after.chars().next().is_some_and(is_ident_char) {
            continue;
        }
        let Some(rest) = after.trim_start().strip_prefix('=') else {
            continue;
        };
        if rest.starts_with('=') || rest.starts_with('>') {
            continue;
        }
        if let Some(value) = value_until_semicolon(rest) {
            return Some(value);
        }
    }
    None
}

fn normalize_type(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    compact.replace(',', ", ")
}
