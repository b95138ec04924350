use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dialect::Dialect;
use crate::error::ConvertError;
use crate::pipeline::{ConvertPolicy, Engine};
use crate::strategy::{sanitize_class_name, ParameterDescriptor, ValidationResult};

/// File extensions picked up by `convert_dir`
pub const STRATEGY_EXTENSIONS: &[&str] = &["cs", "txt", "pls"];

/// Outcome for one strategy file.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub file: PathBuf,
    pub validation: Option<ValidationResult>,
    pub parameters: Vec<ParameterDescriptor>,
    /// Where the generated code was written
    pub output: Option<PathBuf>,
    /// Read/write failure, or non-text input
    pub error: Option<String>,
}

impl BatchEntry {
    fn failed(file: &Path, error: String) -> Self {
        Self {
            file: file.to_path_buf(),
            validation: None,
            parameters: Vec::new(),
            output: None,
            error: Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validation.as_ref().is_some_and(|v| v.is_valid())
    }

    pub fn converted(&self) -> bool {
        self.output.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub dialect: Dialect,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn converted_count(&self) -> usize {
        self.entries.iter().filter(|e| e.converted()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.validation.is_some() && !e.is_valid())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }
}

/// Strategy files directly inside `dir`, sorted by path.
pub fn list_strategy_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory: {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| STRATEGY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Convert every strategy file in `input` into `out`, one `.cs` file each.
///
/// Files are processed in parallel; a failure on one file is recorded in its
/// entry and does not stop the others. `out` must not be `input`.
pub fn convert_dir(engine: &Engine, input: &Path, out: &Path, policy: ConvertPolicy) -> Result<BatchReport> {
    if !input.is_dir() {
        anyhow::bail!("Input directory does not exist: {}", input.display());
    }
    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;

    let same_dir = fs::canonicalize(input)
        .and_then(|i| fs::canonicalize(out).map(|o| i == o))
        .with_context(|| format!("Failed to resolve {} or {}", input.display(), out.display()))?;
    if same_dir {
        anyhow::bail!(
            "Output directory must differ from input directory: {}",
            out.display()
        );
    }

    let files = list_strategy_files(input)?;
    info!("Converting {} strategy files from {}", files.len(), input.display());

    let outputs = plan_outputs(&files, out);
    let entries: Vec<BatchEntry> = files
        .par_iter()
        .zip(outputs.par_iter())
        .map(|(path, output)| convert_file(engine, path, output, policy))
        .collect();

    Ok(BatchReport {
        generated_at: Utc::now(),
        dialect: engine.dialect().clone(),
        entries,
    })
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("strategy")
}

/// Output path per file: `<stem>.cs`, or `<stem>_<ext>.cs` when several
/// inputs share a stem. Names that still clash become per-file errors.
fn plan_outputs(files: &[PathBuf], out: &Path) -> Vec<Result<PathBuf, String>> {
    let mut stems: HashMap<String, usize> = HashMap::new();
    for path in files {
        *stems.entry(file_stem(path).to_lowercase()).or_default() += 1;
    }

    let names: Vec<String> = files
        .iter()
        .map(|path| {
            let stem = file_stem(path);
            if stems.get(&stem.to_lowercase()).copied().unwrap_or(0) > 1 {
                let ext = path.extension().and_then(|s| s.to_str()).unwrap_or_default();
                format!("{stem}_{ext}.cs")
            } else {
                format!("{stem}.cs")
            }
        })
        .collect();

    let mut taken: HashMap<String, usize> = HashMap::new();
    for name in &names {
        *taken.entry(name.to_lowercase()).or_default() += 1;
    }

    names
        .into_iter()
        .zip(files)
        .map(|(name, path)| {
            if taken.get(&name.to_lowercase()).copied().unwrap_or(0) > 1 {
                warn!("Output name {} is not unique for {}", name, path.display());
                Err(format!("Output name {name} collides with another input file"))
            } else {
                Ok(out.join(name))
            }
        })
        .collect()
}

fn convert_file(
    engine: &Engine,
    path: &Path,
    output: &Result<PathBuf, String>,
    policy: ConvertPolicy,
) -> BatchEntry {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return BatchEntry::failed(path, format!("Failed to read file: {e}"));
        }
    };
    let source = match std::str::from_utf8(&bytes) {
        Ok(source) => source,
        Err(e) => {
            let err = ConvertError::InvalidUtf8 {
                offset: e.valid_up_to(),
            };
            warn!("Skipping {}: {}", path.display(), err);
            return BatchEntry::failed(path, err.to_string());
        }
    };

    let class_name = sanitize_class_name(file_stem(path));
    let report = engine.run_named(source, policy, class_name.as_deref());

    let mut entry = BatchEntry {
        file: path.to_path_buf(),
        validation: Some(report.validation),
        parameters: report.parameters,
        output: None,
        error: None,
    };

    if let Some(conversion) = report.conversion {
        match output {
            Ok(output_path) => match fs::write(output_path, &conversion.generated_code) {
                Ok(()) => entry.output = Some(output_path.clone()),
                Err(e) => {
                    warn!("Failed to write {}: {}", output_path.display(), e);
                    entry.error = Some(format!("Failed to write {}: {e}", output_path.display()));
                }
            },
            Err(collision) => entry.error = Some(collision.clone()),
        }
    }

    entry
}
