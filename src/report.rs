use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::batch::BatchReport;

/// Write a batch report as JSON, plus a per-file summary CSV next to it.
/// Returns the CSV path.
pub fn write_report(report: &BatchReport, out_path: &Path) -> Result<PathBuf> {
    let json_str = serde_json::to_string_pretty(report)?;
    std::fs::write(out_path, json_str)
        .with_context(|| format!("Failed to write report: {}", out_path.display()))?;

    let base_path = out_path.parent().unwrap_or(Path::new("."));
    let base_name = out_path.file_stem().and_then(|s| s.to_str()).unwrap_or("report");

    let summary_path = base_path.join(format!("{}_summary.csv", base_name));
    let mut wtr = csv::Writer::from_path(&summary_path)?;
    wtr.write_record(["file", "valid", "errors", "parameters", "converted"])?;
    for entry in &report.entries {
        let errors = match (&entry.validation, &entry.error) {
            (_, Some(error)) => error.clone(),
            (Some(validation), None) => validation.errors().join("; "),
            (None, None) => String::new(),
        };
        wtr.write_record(&[
            entry.file.display().to_string(),
            entry.is_valid().to_string(),
            errors,
            entry.parameters.len().to_string(),
            entry.converted().to_string(),
        ])?;
    }
    wtr.flush()?;

    Ok(summary_path)
}
