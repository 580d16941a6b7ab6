//! Report generation module
//!
//! Renders validation verdicts as plain text, JSON or YAML.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::batch::BatchReport;
use crate::validator::ValidationReport;

/// Report-specific errors
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("Failed to serialize report to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize report to YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to write report to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human readable summary
    #[default]
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl ReportFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Yaml => "yaml",
        }
    }

    /// Parse format from a name or file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "yaml" | "yml" => Some(ReportFormat::Yaml),
            _ => None,
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| {
            format!(
                "Unsupported format '{}'. Supported formats: text, json, yaml",
                s
            )
        })
    }
}

/// Serializable reports that also have a plain-text rendering
pub trait Render: Serialize {
    fn to_text(&self) -> String;

    fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn to_yaml(&self) -> Result<String, ReportError> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn render(&self, format: ReportFormat) -> Result<String, ReportError> {
        match format {
            ReportFormat::Text => Ok(self.to_text()),
            ReportFormat::Json => self.to_json(),
            ReportFormat::Yaml => self.to_yaml(),
        }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P, format: ReportFormat) -> Result<(), ReportError> {
        let path = path.as_ref();
        let content = self.render(format)?;
        std::fs::write(path, content).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn status(passed: bool) -> &'static str {
    if passed { "OK" } else { "FAIL" }
}

impl Render for ValidationReport {
    fn to_text(&self) -> String {
        let mut output = format!(
            "{}: max corner error = {:.6e} (tol={:e})\n",
            status(self.passed),
            self.max_error,
            self.tolerance
        );
        if let Some(worst) = &self.worst {
            output.push_str(&format!(
                "worst frame index: {}, corner: {}\n",
                worst.frame,
                worst.corner.key()
            ));
        }
        output
    }
}

impl Render for BatchReport {
    fn to_text(&self) -> String {
        let mut output = String::new();

        for entry in &self.entries {
            output.push_str(&format!("{}\n", entry.log.display()));
            match (&entry.report, &entry.error) {
                (Some(report), _) => {
                    for line in report.to_text().lines() {
                        output.push_str(&format!("  {}\n", line));
                    }
                }
                (None, Some(error)) => output.push_str(&format!("  ERROR: {}\n", error)),
                (None, None) => {}
            }
        }

        output.push_str(&format!(
            "{}: {} logs, {} failed, {} errors\n",
            status(self.passed()),
            self.entries.len(),
            self.failed_count(),
            self.error_count()
        ));
        output
    }
}
