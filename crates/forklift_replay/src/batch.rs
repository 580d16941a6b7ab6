//! Concurrent validation of a directory of trajectory logs
//!
//! Each log is validated on a blocking worker against one shared, immutable
//! [`Validator`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::validator::{ValidationReport, Validator};

/// Batch-specific errors
#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    #[error("Log directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read log directory {}: {source}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Validation worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result for one log of a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchEntry {
    pub log: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ValidationReport>,
    /// Why the log could not be validated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchEntry {
    pub fn passed(&self) -> bool {
        self.report.as_ref().is_some_and(|r| r.passed)
    }
}

/// Results for every log of a batch, sorted by path
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// True when every log was validated and passed
    pub fn passed(&self) -> bool {
        self.entries.iter().all(BatchEntry::passed)
    }

    /// Logs that were validated but exceeded the tolerance
    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.report.as_ref().is_some_and(|r| !r.passed))
            .count()
    }

    /// Logs that could not be validated at all
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }
}

/// Find trajectory logs (`*.csv`) directly inside a directory
pub fn find_log_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, BatchError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(BatchError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut logs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|source| BatchError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            logs.push(path);
        }
    }

    logs.sort();
    Ok(logs)
}

/// Validate every log in `dir` concurrently
pub async fn validate_logs<P: AsRef<Path>>(
    validator: Arc<Validator>,
    dir: P,
) -> Result<BatchReport, BatchError> {
    let logs = find_log_files(dir)?;
    log::info!("Validating {} logs", logs.len());

    let handles: Vec<_> = logs
        .into_iter()
        .map(|path| {
            let validator = Arc::clone(&validator);
            tokio::task::spawn_blocking(move || {
                let outcome = validator.validate_file(&path);
                (path, outcome)
            })
        })
        .collect();

    let mut entries = Vec::with_capacity(handles.len());
    for handle in handles {
        let (log, outcome) = handle.await?;
        let entry = match outcome {
            Ok(report) => BatchEntry {
                log,
                report: Some(report),
                error: None,
            },
            Err(e) => {
                log::warn!("Could not validate {}: {}", log.display(), e);
                BatchEntry {
                    log,
                    report: None,
                    error: Some(e.to_string()),
                }
            }
        };
        entries.push(entry);
    }

    entries.sort_by(|a, b| a.log.cmp(&b.log));
    Ok(BatchReport { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::REQUIRED_COLUMNS;
    use forklift_kinematics::{CargoGeometry, ContainerRamp, ForkliftModel, Pose, Vec2, VehicleGeometry};
    use std::fmt::Write as _;
    use tempfile::TempDir;
    use test_log::test;

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    fn validator() -> Validator {
        let floor = ContainerRamp::new(0.0, 0.0, 8.0, 2.5, 4.0).unwrap();
        let cargo = CargoGeometry::new(2.3, 2.3, Vec2::new(0.2, 0.0)).unwrap();
        Validator::new(ForkliftModel::new(floor, VehicleGeometry::new(0.2, cargo)), 1e-5)
    }

    fn write_log(path: &Path, model: &ForkliftModel, frames: usize, offset: f64) -> std::io::Result<()> {
        let mut text = REQUIRED_COLUMNS.join(",");
        text.push('\n');
        for i in 0..frames {
            let t = i as f64 * 0.1;
            let pose = Pose::new(-2.0 + t, 0.02, 0.01, 0.1);
            let c = model.predict_corners(&pose);
            writeln!(
                text,
                "{t},{},{},{},{},100,0,{},{},{},{},{},{},{},{},0.5,0.2,0,0",
                pose.s,
                pose.pitch,
                pose.lift,
                pose.tilt,
                c.rear_bottom.x,
                c.rear_bottom.z,
                c.rear_top.x,
                c.rear_top.z,
                c.front_bottom.x,
                c.front_bottom.z,
                c.front_top.x,
                c.front_top.z + offset,
            )
            .expect("writing to a String");
        }
        std::fs::write(path, text)
    }

    #[test(tokio::test)]
    async fn test_validate_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let validator = Arc::new(validator());
        let model = validator.model().clone();

        write_log(&temp_dir.path().join("a_good.csv"), &model, 20, 0.0)?;
        write_log(&temp_dir.path().join("b_bad.csv"), &model, 20, 1e-3)?;
        write_log(&temp_dir.path().join("c_empty.csv"), &model, 0, 0.0)?;
        std::fs::write(temp_dir.path().join("notes.txt"), "not a log")?;

        let report = validate_logs(validator, temp_dir.path()).await?;

        assert_eq!(report.entries.len(), 3);
        assert!(report.entries[0].passed());
        assert!(!report.entries[1].passed());
        assert!(report.entries[1].report.is_some());
        assert!(report.entries[2].error.is_some());
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.error_count(), 1);
        assert!(!report.passed());
        Ok(())
    }

    #[test(tokio::test)]
    async fn test_missing_directory() {
        let err = validate_logs(Arc::new(validator()), "/nonexistent/forklift/logs")
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_find_log_files_sorted() -> Result<()> {
        let temp_dir = TempDir::new()?;
        for name in ["z.csv", "a.CSV", "m.csv", "readme.md"] {
            std::fs::write(temp_dir.path().join(name), "")?;
        }
        std::fs::create_dir(temp_dir.path().join("nested.csv"))?;

        let names: Vec<_> = find_log_files(temp_dir.path())?
            .into_iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(names, ["a.CSV", "m.csv", "z.csv"]);
        Ok(())
    }

    #[test]
    fn test_empty_batch_passes() {
        let report = BatchReport::default();
        assert!(report.passed());
        assert_eq!(report.error_count(), 0);
    }
}
