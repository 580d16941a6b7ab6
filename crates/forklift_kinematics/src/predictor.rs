use crate::corner::Corners;
use crate::floor::{ContainerRamp, FloorProfile};
use crate::math::{Rot2, Vec2};
use crate::{Error, Result};

/// Rectangular load carried on the forks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CargoGeometry {
    /// Extent along the load's local x axis (rear to front)
    length: f64,

    /// Extent along the load's local z axis (bottom to top)
    height: f64,

    /// Vector from the carriage pivot to the rear-bottom corner, in the
    /// unrotated mast frame
    mount_offset: Vec2,
}

impl CargoGeometry {
    /// Create load geometry; `length` and `height` must be positive
    pub fn new(length: f64, height: f64, mount_offset: Vec2) -> Result<Self> {
        if !length.is_finite() || length <= 0.0 {
            return Err(Error::invalid(format!(
                "cargo length must be positive, got {}",
                length
            )));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::invalid(format!(
                "cargo height must be positive, got {}",
                height
            )));
        }
        if !mount_offset.is_finite() {
            return Err(Error::invalid(format!(
                "cargo mount offset must be finite, got {}",
                mount_offset
            )));
        }
        Ok(Self {
            length,
            height,
            mount_offset,
        })
    }

    /// Get the load length
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Get the load height
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Get the pivot to rear-bottom offset
    pub fn mount_offset(&self) -> Vec2 {
        self.mount_offset
    }
}

/// Fixed vehicle dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleGeometry {
    /// Height of the mast pivot above the floor directly under the carriage
    pub mast_pivot_height: f64,

    pub cargo: CargoGeometry,
}

impl VehicleGeometry {
    /// Create vehicle geometry from the mast pivot height and its load
    pub fn new(mast_pivot_height: f64, cargo: CargoGeometry) -> Self {
        Self {
            mast_pivot_height,
            cargo,
        }
    }
}

/// Scalar vehicle state for one instant
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    /// Carriage (mast base) position along the travel axis
    pub s: f64,

    /// Chassis pitch in radians
    pub pitch: f64,

    /// Fork tilt relative to the chassis in radians
    pub tilt: f64,

    /// Carriage travel along the mast axis (not world z)
    pub lift: f64,
}

impl Pose {
    /// Create a pose from carriage position, pitch, tilt and lift
    pub fn new(s: f64, pitch: f64, tilt: f64, lift: f64) -> Self {
        Self {
            s,
            pitch,
            tilt,
            lift,
        }
    }

    /// Combined mast/fork rotation
    pub fn theta(&self) -> f64 {
        self.pitch + self.tilt
    }
}

/// World position of the carriage pivot
///
/// The mast base sits `mast_pivot_height` above the local floor at `s`; the
/// carriage then travels `lift` along the rotated mast axis.
pub fn carriage_pivot<F: FloorProfile + ?Sized>(
    vehicle: &VehicleGeometry,
    floor: &F,
    pose: &Pose,
) -> Vec2 {
    pivot_with(&Rot2::from_rad(pose.theta()), vehicle, floor, pose)
}

fn pivot_with<F: FloorProfile + ?Sized>(
    rotation: &Rot2,
    vehicle: &VehicleGeometry,
    floor: &F,
    pose: &Pose,
) -> Vec2 {
    let floor_at_mast = floor.floor_height_at(pose.s);
    let mast_base = Vec2::new(pose.s, floor_at_mast + vehicle.mast_pivot_height);
    let lift_vec = rotation.apply(Vec2::new(0.0, pose.lift));
    mast_base + lift_vec
}

/// Predict the world-space corners of the load
///
/// Each corner offset is formed in the unrotated mount frame, rotated by
/// `pitch + tilt` and added to the carriage pivot. Do not rewrite this in
/// terms of already rotated edge vectors: the rounding order is what external
/// logs are compared against.
///
/// # Example
/// ```rust
/// use forklift_kinematics::{CargoGeometry, ContainerRamp, Pose, VehicleGeometry, Vec2, predict_corners};
///
/// let floor = ContainerRamp::new(0.0, 0.0, 10.0, 0.0, 0.0).unwrap();
/// let vehicle = VehicleGeometry::new(1.0, CargoGeometry::new(2.0, 1.5, Vec2::zeros()).unwrap());
/// let corners = predict_corners(&vehicle, &floor, &Pose::default());
/// assert_eq!(corners.front_top, Vec2::new(2.0, 2.5));
/// ```
pub fn predict_corners<F: FloorProfile + ?Sized>(
    vehicle: &VehicleGeometry,
    floor: &F,
    pose: &Pose,
) -> Corners {
    let rotation = Rot2::from_rad(pose.theta());
    let pivot = pivot_with(&rotation, vehicle, floor, pose);

    let cargo = &vehicle.cargo;
    let mount = cargo.mount_offset;
    let corner = |x: f64, z: f64| pivot + rotation.apply(Vec2::new(x, z));

    Corners {
        rear_bottom: corner(mount.x, mount.z),
        rear_top: corner(mount.x, mount.z + cargo.height),
        front_bottom: corner(mount.x + cargo.length, mount.z),
        front_top: corner(mount.x + cargo.length, mount.z + cargo.height),
    }
}

/// Validated environment and vehicle, ready for prediction
#[derive(Clone, Debug, PartialEq)]
pub struct ForkliftModel {
    floor: ContainerRamp,
    vehicle: VehicleGeometry,
}

impl ForkliftModel {
    /// Create a model from a validated environment and vehicle
    pub fn new(floor: ContainerRamp, vehicle: VehicleGeometry) -> Self {
        Self { floor, vehicle }
    }

    /// Get the environment floor
    pub fn floor(&self) -> &ContainerRamp {
        &self.floor
    }

    /// Get the vehicle geometry
    pub fn vehicle(&self) -> &VehicleGeometry {
        &self.vehicle
    }

    /// Predict the load corners for a pose
    pub fn predict_corners(&self, pose: &Pose) -> Corners {
        predict_corners(&self.vehicle, &self.floor, pose)
    }

    /// Get the carriage pivot for a pose
    pub fn carriage_pivot(&self, pose: &Pose) -> Vec2 {
        carriage_pivot(&self.vehicle, &self.floor, pose)
    }
}

impl std::fmt::Display for ForkliftModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ForkliftModel (door_x: {}, ramp: {} m @ {} deg, pivot height: {}, cargo: {} x {})",
            self.floor.door_x(),
            self.floor.ramp_length(),
            self.floor.slope_deg(),
            self.vehicle.mast_pivot_height,
            self.vehicle.cargo.length,
            self.vehicle.cargo.height
        )
    }
}
