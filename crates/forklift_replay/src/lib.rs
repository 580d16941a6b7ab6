//! Forklift Replay - trajectory log validation
//!
//! Replays a simulator's per-frame log through the forklift kinematic model
//! and checks that the logged load corners agree with the model to within a
//! configured tolerance.

pub mod batch;
pub mod config;
pub mod report;
pub mod trajectory;
pub mod validator;

pub use batch::{BatchReport, validate_logs};
pub use config::ModelConfig;
pub use report::{Render, ReportFormat};
pub use trajectory::{Sample, TrajectoryLog};
pub use validator::{ValidationReport, Validator};

/// Main error type using thiserror for error handling
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Log(#[from] trajectory::LogError),

    #[error(transparent)]
    Validation(#[from] validator::ValidationError),

    #[error(transparent)]
    Report(#[from] report::ReportError),

    #[error(transparent)]
    Batch(#[from] batch::BatchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Main result type using thiserror for error handling
pub type Result<T> = std::result::Result<T, Error>;
