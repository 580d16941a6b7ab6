//! Trajectory log reading
//!
//! Parses the per-frame CSV written by the simulator into [`Sample`]s. The
//! log is read to completion; any malformed row aborts the whole read.

use forklift_kinematics::{Corners, Pose, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Columns every log must provide, in the order the simulator writes them
pub const REQUIRED_COLUMNS: [&str; 19] = [
    "time",
    "s",
    "pitch",
    "lift",
    "tilt",
    "ceiling_z",
    "floor_z",
    "rb_x",
    "rb_z",
    "rt_x",
    "rt_z",
    "fb_x",
    "fb_z",
    "ft_x",
    "ft_z",
    "clearance_top",
    "clearance_bottom",
    "safety_level",
    "terrain_state",
];

/// Log-specific errors
#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error("Failed to open log {}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read log {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: Box<LogError>,
    },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Missing value in line {line}, column {column}")]
    MissingField { line: u64, column: String },

    #[error("Invalid number in line {line}, column {column}: '{value}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Time goes backwards in line {line}: {time} after {previous}")]
    NonMonotonicTime { line: u64, previous: f64, time: f64 },
}

/// Safety classification attached to a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    Ok,
    Warn,
    Stop,
    Degraded,
}

impl SafetyLevel {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(SafetyLevel::Ok),
            1 => Some(SafetyLevel::Warn),
            2 => Some(SafetyLevel::Stop),
            3 => Some(SafetyLevel::Degraded),
            _ => None,
        }
    }
}

/// Where the vehicle is relative to the ramp and container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainState {
    Ground,
    FrontOnRamp,
    OnRamp,
    FrontInContainerRearOnRamp,
    InContainer,
}

impl TerrainState {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(TerrainState::Ground),
            1 => Some(TerrainState::FrontOnRamp),
            2 => Some(TerrainState::OnRamp),
            3 => Some(TerrainState::FrontInContainerRearOnRamp),
            4 => Some(TerrainState::InContainer),
            _ => None,
        }
    }
}

/// One logged frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub s: f64,
    pub pitch: f64,
    pub tilt: f64,
    pub lift: f64,
    pub ceiling_z: f64,
    pub floor_z: f64,
    /// Corners as recorded by the simulator
    pub corners: Corners,
    pub clearance_top: f64,
    pub clearance_bottom: f64,
    pub safety_level: i32,
    pub terrain_state: i32,
}

impl Sample {
    /// Vehicle state of this frame
    pub fn pose(&self) -> Pose {
        Pose::new(self.s, self.pitch, self.tilt, self.lift)
    }

    /// Decoded safety level, `None` for codes this version does not know
    pub fn safety(&self) -> Option<SafetyLevel> {
        SafetyLevel::from_code(self.safety_level)
    }

    /// Decoded terrain state, `None` for codes this version does not know
    pub fn terrain(&self) -> Option<TerrainState> {
        TerrainState::from_code(self.terrain_state)
    }
}

/// Fully loaded trajectory log, in recorded order
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryLog {
    source: Option<PathBuf>,
    samples: Vec<Sample>,
}

impl TrajectoryLog {
    /// Load a log file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| LogError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let mut log = Self::from_reader(file).map_err(|source| LogError::ReadFailed {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        log.source = Some(path.to_path_buf());

        log::debug!("Read {} frames from {}", log.len(), path.display());
        Ok(log)
    }

    /// Parse a log from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LogError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = ColumnIndex::from_headers(reader.headers()?)?;

        let mut samples = Vec::new();
        let mut previous_time: Option<f64> = None;
        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |pos| pos.line());
            let sample = columns.parse_record(&record, line)?;

            if let Some(previous) = previous_time {
                if sample.time < previous {
                    return Err(LogError::NonMonotonicTime {
                        line,
                        previous,
                        time: sample.time,
                    });
                }
            }
            previous_time = Some(sample.time);
            samples.push(sample);
        }

        Ok(Self {
            source: None,
            samples,
        })
    }

    /// Re-read the log from the file it was loaded from
    ///
    /// Returns `None` for logs that were not loaded from a file.
    pub fn reload(&self) -> Option<Result<Self, LogError>> {
        self.source.as_ref().map(Self::load_from_file)
    }

    /// File the log was loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time span covered by the log
    pub fn duration(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }
}

impl<'a> IntoIterator for &'a TrajectoryLog {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Position of each required column in the header
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LogError> {
        let mut positions = HashMap::with_capacity(REQUIRED_COLUMNS.len());
        for column in REQUIRED_COLUMNS {
            let index = headers
                .iter()
                .position(|header| header == column)
                .ok_or_else(|| LogError::MissingColumn(column.to_string()))?;
            positions.insert(column, index);
        }
        Ok(Self { positions })
    }

    fn field<'r>(
        &self,
        record: &'r csv::StringRecord,
        column: &'static str,
        line: u64,
    ) -> Result<&'r str, LogError> {
        self.positions
            .get(column)
            .and_then(|&index| record.get(index))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| LogError::MissingField {
                line,
                column: column.to_string(),
            })
    }

    fn number(
        &self,
        record: &csv::StringRecord,
        column: &'static str,
        line: u64,
    ) -> Result<f64, LogError> {
        let raw = self.field(record, column, line)?;
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| LogError::InvalidNumber {
                line,
                column: column.to_string(),
                value: raw.to_string(),
            })
    }

    fn code(
        &self,
        record: &csv::StringRecord,
        column: &'static str,
        line: u64,
    ) -> Result<i32, LogError> {
        let raw = self.field(record, column, line)?;
        raw.parse::<i32>().map_err(|_| LogError::InvalidNumber {
            line,
            column: column.to_string(),
            value: raw.to_string(),
        })
    }

    fn point(
        &self,
        record: &csv::StringRecord,
        x_column: &'static str,
        z_column: &'static str,
        line: u64,
    ) -> Result<Vec2, LogError> {
        Ok(Vec2::new(
            self.number(record, x_column, line)?,
            self.number(record, z_column, line)?,
        ))
    }

    fn parse_record(&self, record: &csv::StringRecord, line: u64) -> Result<Sample, LogError> {
        let corners = Corners {
            rear_bottom: self.point(record, "rb_x", "rb_z", line)?,
            rear_top: self.point(record, "rt_x", "rt_z", line)?,
            front_bottom: self.point(record, "fb_x", "fb_z", line)?,
            front_top: self.point(record, "ft_x", "ft_z", line)?,
        };

        Ok(Sample {
            time: self.number(record, "time", line)?,
            s: self.number(record, "s", line)?,
            pitch: self.number(record, "pitch", line)?,
            tilt: self.number(record, "tilt", line)?,
            lift: self.number(record, "lift", line)?,
            ceiling_z: self.number(record, "ceiling_z", line)?,
            floor_z: self.number(record, "floor_z", line)?,
            corners,
            clearance_top: self.number(record, "clearance_top", line)?,
            clearance_bottom: self.number(record, "clearance_bottom", line)?,
            safety_level: self.code(record, "safety_level", line)?,
            terrain_state: self.code(record, "terrain_state", line)?,
        })
    }
}
