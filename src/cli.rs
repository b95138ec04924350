use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use tokio::fs as tokio_fs;

use crate::batch::convert_dir;
use crate::dialect::Dialect;
use crate::error::ConvertError;
use crate::pipeline::{ConvertPolicy, Engine};
use crate::report::write_report;
use crate::strategy::sanitize_class_name;

#[derive(Parser)]
#[command(name = "pl-transpile")]
#[command(about = "Validate and convert strategies for PowerLanguage .NET")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a strategy against the dialect's structural rules
    Validate {
        /// Path to strategy source file
        #[arg(long)]
        strategy: PathBuf,
        /// Dialect TOML file (defaults to PowerLanguage.Strategy / SignalObject / CalcBar)
        #[arg(long)]
        dialect: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert a strategy into a complete dialect unit
    Convert {
        /// Path to strategy source file
        #[arg(long)]
        strategy: PathBuf,
        /// Output file (prints to stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Dialect TOML file
        #[arg(long)]
        dialect: Option<PathBuf>,
        /// Name for a generated class (defaults to the file name)
        #[arg(long)]
        class_name: Option<String>,
        /// Convert even when validation fails
        #[arg(long)]
        force: bool,
        /// Print the full conversion result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the strategy's input parameters as JSON
    Params {
        /// Path to strategy source file
        #[arg(long)]
        strategy: PathBuf,
        /// Dialect TOML file
        #[arg(long)]
        dialect: Option<PathBuf>,
    },
    /// Convert every strategy in a directory
    Batch {
        /// Directory with strategy files (.cs, .txt, .pls)
        #[arg(long)]
        input: PathBuf,
        /// Output directory for generated files
        #[arg(long)]
        out: PathBuf,
        /// Dialect TOML file
        #[arg(long)]
        dialect: Option<PathBuf>,
        /// Convert even when validation fails
        #[arg(long)]
        force: bool,
        /// Report path (JSON); defaults to <out>/report.json
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print the default dialect as TOML
    Dialect,
}

fn load_dialect(path: Option<&Path>) -> Result<Dialect> {
    match path {
        Some(path) => Dialect::from_file(path)
            .with_context(|| format!("Failed to load dialect: {}", path.display())),
        None => Ok(Dialect::default()),
    }
}

async fn read_strategy(path: &Path) -> Result<String> {
    let bytes = tokio_fs::read(path)
        .await
        .with_context(|| format!("Failed to read strategy file: {}", path.display()))?;
    String::from_utf8(bytes)
        .map_err(|e| ConvertError::InvalidUtf8 {
            offset: e.utf8_error().valid_up_to(),
        })
        .with_context(|| format!("Failed to read strategy file: {}", path.display()))
}

fn policy(force: bool) -> ConvertPolicy {
    if force {
        ConvertPolicy::Always
    } else {
        ConvertPolicy::RequireValid
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Validate {
                strategy,
                dialect,
                json,
            } => {
                let engine = Engine::new(load_dialect(dialect.as_deref())?)?;
                let source = read_strategy(&strategy).await?;
                let result = engine.validate(&source);

                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else if result.is_valid() {
                    println!("{} is valid", strategy.display());
                } else {
                    for error in result.errors() {
                        println!("error: {error}");
                    }
                }

                if !result.is_valid() {
                    anyhow::bail!(
                        "{} failed validation with {} errors",
                        strategy.display(),
                        result.errors().len()
                    );
                }
                Ok(())
            }
            Commands::Convert {
                strategy,
                out,
                dialect,
                class_name,
                force,
                json,
            } => {
                let mut engine = Engine::new(load_dialect(dialect.as_deref())?)?;
                if let Some(name) = &class_name {
                    engine = engine.with_class_name(name)?;
                }
                let source = read_strategy(&strategy).await?;

                let derived = class_name.is_none().then(|| {
                    strategy
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .and_then(sanitize_class_name)
                });
                let report = engine.run_named(&source, policy(force), derived.flatten().as_deref());

                let Some(conversion) = report.conversion else {
                    for error in report.validation.errors() {
                        eprintln!("error: {error}");
                    }
                    anyhow::bail!(
                        "{} failed validation; use --force to convert anyway",
                        strategy.display()
                    );
                };

                let rendered = if json {
                    serde_json::to_string_pretty(&conversion)?
                } else {
                    conversion.generated_code.clone()
                };

                match out {
                    Some(out) => {
                        tokio_fs::write(&out, rendered)
                            .await
                            .with_context(|| format!("Failed to write output: {}", out.display()))?;
                        println!(
                            "Converted {} into class {} ({} parameters). Written to {}",
                            strategy.display(),
                            conversion.class_name,
                            conversion.parameters.len(),
                            out.display()
                        );
                    }
                    None => println!("{rendered}"),
                }
                Ok(())
            }
            Commands::Params { strategy, dialect } => {
                let engine = Engine::new(load_dialect(dialect.as_deref())?)?;
                let source = read_strategy(&strategy).await?;
                let parameters = engine.extract_parameters(&source);
                println!("{}", serde_json::to_string_pretty(&parameters)?);
                Ok(())
            }
            Commands::Batch {
                input,
                out,
                dialect,
                force,
                report,
            } => {
                let engine = Engine::new(load_dialect(dialect.as_deref())?)?;
                let report_path = report.unwrap_or_else(|| out.join("report.json"));

                let out_dir = out.clone();
                let batch = tokio::task::spawn_blocking(move || {
                    convert_dir(&engine, &input, &out_dir, policy(force))
                })
                .await
                .context("Batch conversion task failed")??;

                let summary_path = write_report(&batch, &report_path)?;
                info!("Summary written to {}", summary_path.display());
                println!(
                    "Converted {}/{} strategies ({} invalid, {} failed) into {}. Report written to {}",
                    batch.converted_count(),
                    batch.entries.len(),
                    batch.invalid_count(),
                    batch.failed_count(),
                    out.display(),
                    report_path.display()
                );
                Ok(())
            }
            Commands::Dialect => {
                print!("{}", Dialect::default().to_toml()?);
                Ok(())
            }
        }
    }
}
