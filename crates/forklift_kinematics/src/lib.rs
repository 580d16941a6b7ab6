//! # Forklift Kinematics
//!
//! Side-view (x-z plane) forward kinematics for a forklift carrying a
//! rectangular load through a ramp and into a container.
//!
//! ## Features
//!
//! - 2D vector and rotation primitives
//! - Floor and ceiling profiles for the ramp/container environment
//! - Load corner prediction from carriage position, pitch, tilt and lift
//! - Top/bottom clearance evaluation against the environment
//!
//! ## Example
//!
//! ```rust
//! use forklift_kinematics::{CargoGeometry, ContainerRamp, Pose, VehicleGeometry, Vec2, predict_corners};
//!
//! let floor = ContainerRamp::new(0.0, 0.0, 8.0, 2.5, 4.0).unwrap();
//! let vehicle = VehicleGeometry::new(0.2, CargoGeometry::new(2.3, 2.3, Vec2::new(0.2, 0.0)).unwrap());
//! let pose = Pose::new(1.0, 0.0, 0.0, 0.15);
//! let corners = predict_corners(&vehicle, &floor, &pose);
//! assert!(corners.front_top.z > corners.rear_bottom.z);
//! ```

pub mod clearance;
pub mod corner;
pub mod floor;
pub mod math;
pub mod predictor;

pub use clearance::{Clearance, compute_clearances};
pub use corner::{CornerId, Corners};
pub use floor::{CeilingProfile, ContainerRamp, FixedSlopeRamp, FloorProfile};
pub use math::{Rot2, Vec2, rotate};
pub use predictor::{
    CargoGeometry, ForkliftModel, Pose, VehicleGeometry, carriage_pivot, predict_corners,
};

/// Common result type for this library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for kinematic model construction
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid geometry or environment configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}
