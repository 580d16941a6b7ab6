//! Model configuration parsing
//!
//! Loads the vehicle/environment document shared with the simulator and
//! viewers. Unknown fields are ignored so one file can serve all of them.

use forklift_kinematics::{CargoGeometry, ContainerRamp, ForkliftModel, Vec2, VehicleGeometry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Validation tolerance used when the document does not set one
pub const DEFAULT_VALIDATION_TOL: f64 = 1e-5;

/// Configuration-specific errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config from {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config from {}: {source}", .path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("Unsupported config format for {} (expected .json, .yaml or .yml)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid YAML in config: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("viewer.validation_tol must be finite and not negative, got {0}")]
    InvalidTolerance(f64),

    #[error("vehicle.mast.pivot_height must be finite, got {0}")]
    InvalidPivotHeight(f64),

    #[error(transparent)]
    Geometry(#[from] forklift_kinematics::Error),
}

/// Full model configuration document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    pub environment: EnvironmentConfig,
    pub vehicle: VehicleConfig,
    pub cargo: CargoConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentConfig {
    pub container: ContainerConfig,
    pub ramp: RampConfig,
}

/// Container placement along the travel axis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerConfig {
    /// x of the near edge, where the ramp meets the container
    pub door_x: f64,
    /// Floor height inside the container
    pub floor_z: f64,
    /// Depth of the container along x
    pub length: f64,
    /// Interior height; no ceiling is modelled when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RampConfig {
    /// Horizontal extent of the ramp
    pub length: f64,
    /// Ramp angle in degrees
    pub slope_deg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleConfig {
    pub mast: MastConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MastConfig {
    /// Mast pivot height above the local floor
    pub pivot_height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CargoConfig {
    pub length: f64,
    pub height: f64,
    #[serde(default)]
    pub mount_offset: MountOffset,
}

/// Carriage pivot to rear-bottom corner, in the unrotated mast frame
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MountOffset {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub z: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerConfig {
    /// Largest accepted per-coordinate corner error
    #[serde(default = "default_validation_tol")]
    pub validation_tol: f64,
}

fn default_validation_tol() -> f64 {
    DEFAULT_VALIDATION_TOL
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            validation_tol: DEFAULT_VALIDATION_TOL,
        }
    }
}

impl ModelConfig {
    /// Load and validate a configuration file (`.json`, `.yaml` or `.yml`)
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_deref() {
            Some("json") => Self::from_json,
            Some("yaml") | Some("yml") => Self::from_yaml,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config = parse(&contents).map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

        log::debug!(
            "Loaded config from {} (tolerance {})",
            path.display(),
            config.tolerance()
        );
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the kinematic model relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tol = self.viewer.validation_tol;
        if !tol.is_finite() || tol < 0.0 {
            return Err(ConfigError::InvalidTolerance(tol));
        }
        self.model().map(|_| ())
    }

    /// Build the kinematic model described by this configuration
    pub fn model(&self) -> Result<ForkliftModel, ConfigError> {
        let container = &self.environment.container;
        let ramp = &self.environment.ramp;

        let mut floor = ContainerRamp::new(
            container.door_x,
            container.floor_z,
            container.length,
            ramp.length,
            ramp.slope_deg,
        )?;
        if let Some(height) = container.height {
            floor = floor.with_container_height(height)?;
        }

        let pivot_height = self.vehicle.mast.pivot_height;
        if !pivot_height.is_finite() {
            return Err(ConfigError::InvalidPivotHeight(pivot_height));
        }

        let mount = self.cargo.mount_offset;
        let cargo = CargoGeometry::new(
            self.cargo.length,
            self.cargo.height,
            Vec2::new(mount.x, mount.z),
        )?;

        Ok(ForkliftModel::new(
            floor,
            VehicleGeometry::new(pivot_height, cargo),
        ))
    }

    /// Maximum accepted corner error
    pub fn tolerance(&self) -> f64 {
        self.viewer.validation_tol
    }
}
