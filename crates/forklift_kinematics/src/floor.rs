//! Floor and ceiling profiles of the loading environment.
//!
//! The travel axis runs from open ground, up a ramp, through the container
//! door and into the container:
//!
//! ```text
//!                        door_x                 door_x + length
//!                          |======== container ========|
//!            ramp_start_x /
//!   ground ______________/
//! ```

use crate::{Error, Result};

/// Plot ramp slope used by replay viewers, in degrees
pub const DEFAULT_PLOT_RAMP_SLOPE_DEG: f64 = 4.0;

/// Height of the floor under a longitudinal coordinate
pub trait FloorProfile {
    fn floor_height_at(&self, x: f64) -> f64;
}

/// Height of the ceiling above a longitudinal coordinate.
///
/// `f64::INFINITY` means nothing overhead.
pub trait CeilingProfile {
    fn ceiling_height_at(&self, x: f64) -> f64;
}

impl<T: FloorProfile + ?Sized> FloorProfile for &T {
    fn floor_height_at(&self, x: f64) -> f64 {
        (**self).floor_height_at(x)
    }
}

impl<T: CeilingProfile + ?Sized> CeilingProfile for &T {
    fn ceiling_height_at(&self, x: f64) -> f64 {
        (**self).ceiling_height_at(x)
    }
}

/// Container with a straight ramp leading up to its door
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerRamp {
    door_x: f64,
    floor_z: f64,
    container_length: f64,
    container_height: Option<f64>,
    ramp_length: f64,
    slope_deg: f64,
}

impl ContainerRamp {
    /// Create a container/ramp environment
    ///
    /// # Arguments
    /// * `door_x` - x of the container's near edge, where the ramp meets it
    /// * `floor_z` - container floor height
    /// * `container_length` - container depth along x, must be positive
    /// * `ramp_length` - horizontal ramp extent, must not be negative
    /// * `slope_deg` - ramp angle in degrees
    pub fn new(
        door_x: f64,
        floor_z: f64,
        container_length: f64,
        ramp_length: f64,
        slope_deg: f64,
    ) -> Result<Self> {
        for (name, value) in [
            ("door_x", door_x),
            ("floor_z", floor_z),
            ("container length", container_length),
            ("ramp length", ramp_length),
            ("ramp slope_deg", slope_deg),
        ] {
            if !value.is_finite() {
                return Err(Error::invalid(format!("{} must be finite, got {}", name, value)));
            }
        }
        if container_length <= 0.0 {
            return Err(Error::invalid(format!(
                "container length must be positive, got {}",
                container_length
            )));
        }
        if ramp_length < 0.0 {
            return Err(Error::invalid(format!(
                "ramp length must not be negative, got {}",
                ramp_length
            )));
        }

        let env = Self {
            door_x,
            floor_z,
            container_length,
            container_height: None,
            ramp_length,
            slope_deg,
        };
        for (name, value) in [
            ("ramp ground height", env.ground_z()),
            ("ramp start", env.ramp_start_x()),
            ("container end", env.container_end_x()),
        ] {
            if !value.is_finite() {
                return Err(Error::invalid(format!(
                    "{} overflows for this geometry, got {}",
                    name, value
                )));
            }
        }
        Ok(env)
    }

    /// Give the container a ceiling `height` above its floor
    pub fn with_container_height(mut self, height: f64) -> Result<Self> {
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::invalid(format!(
                "container height must be positive, got {}",
                height
            )));
        }
        self.container_height = Some(height);
        Ok(self)
    }

    /// Get the x of the container door
    pub fn door_x(&self) -> f64 {
        self.door_x
    }

    /// Get the container floor height
    pub fn floor_z(&self) -> f64 {
        self.floor_z
    }

    /// Get the container depth along x
    pub fn container_length(&self) -> f64 {
        self.container_length
    }

    /// Get the container ceiling height above its floor, if any
    pub fn container_height(&self) -> Option<f64> {
        self.container_height
    }

    /// Get the horizontal ramp extent
    pub fn ramp_length(&self) -> f64 {
        self.ramp_length
    }

    /// Get the ramp angle in degrees
    pub fn slope_deg(&self) -> f64 {
        self.slope_deg
    }

    /// x where the ramp meets the ground
    pub fn ramp_start_x(&self) -> f64 {
        self.door_x - self.ramp_length
    }

    /// Far end of the container
    pub fn container_end_x(&self) -> f64 {
        self.door_x + self.container_length
    }

    /// Ground height beyond the foot of the ramp
    pub fn ground_z(&self) -> f64 {
        let rise = self.slope_deg.to_radians().tan() * self.ramp_length;
        self.floor_z - rise
    }

    /// True when `x` lies on the container floor span (door and far end included)
    pub fn in_container(&self, x: f64) -> bool {
        self.door_x <= x && x <= self.container_end_x()
    }
}

impl FloorProfile for ContainerRamp {
    fn floor_height_at(&self, x: f64) -> f64 {
        if self.in_container(x) {
            return self.floor_z;
        }

        let ground_z = self.ground_z();
        let ramp_start_x = self.ramp_start_x();
        if x <= ramp_start_x {
            return ground_z;
        }

        // Past the far wall the floor stays level with the container
        if x > self.container_end_x() {
            return self.floor_z;
        }

        // Strictly between ramp start and door, so the ramp has non-zero length here
        let t = (x - ramp_start_x) / (self.door_x - ramp_start_x);
        ground_z + t * (self.floor_z - ground_z)
    }
}

impl CeilingProfile for ContainerRamp {
    fn ceiling_height_at(&self, x: f64) -> f64 {
        match self.container_height {
            Some(height) if self.in_container(x) => self.floor_z + height,
            _ => f64::INFINITY,
        }
    }
}

/// Ramp used when replaying logs for display: ground rises at a fixed slope
/// towards the origin and is flat from there on.
///
/// This is independent of [`ContainerRamp`]; the two models are not expected
/// to agree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedSlopeRamp {
    slope_deg: f64,
}

impl FixedSlopeRamp {
    /// Create a ramp of `slope_deg` degrees ending at x = 0
    pub fn new(slope_deg: f64) -> Result<Self> {
        if !slope_deg.is_finite() {
            return Err(Error::invalid(format!(
                "ramp slope_deg must be finite, got {}",
                slope_deg
            )));
        }
        Ok(Self { slope_deg })
    }

    /// Get the ramp angle in degrees
    pub fn slope_deg(&self) -> f64 {
        self.slope_deg
    }
}

impl Default for FixedSlopeRamp {
    fn default() -> Self {
        Self {
            slope_deg: DEFAULT_PLOT_RAMP_SLOPE_DEG,
        }
    }
}

impl FloorProfile for FixedSlopeRamp {
    fn floor_height_at(&self, x: f64) -> f64 {
        if x < 0.0 {
            self.slope_deg.to_radians().tan() * x
        } else {
            0.0
        }
    }
}
