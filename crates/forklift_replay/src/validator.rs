//! Oracle comparison of logged load corners
//!
//! Every frame of a trajectory log is pushed through the kinematic model and
//! the predicted corners are compared with the logged ones. The report holds
//! the single worst (frame, corner) discrepancy over the whole log.

use forklift_kinematics::{CornerId, Corners, ForkliftModel, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ConfigError, ModelConfig};
use crate::trajectory::{Sample, TrajectoryLog};

/// Validation-specific errors
#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Trajectory log contains no frames")]
    EmptyLog,
}

/// Location and size of the largest corner discrepancy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorstCorner {
    /// Zero-based frame index in log order
    pub frame: usize,
    /// Log time of that frame
    pub time: f64,
    pub corner: CornerId,
    pub predicted: Vec2,
    pub logged: Vec2,
    /// L-infinity distance between predicted and logged position
    pub error: f64,
}

/// Outcome of validating one trajectory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub passed: bool,
    pub max_error: f64,
    pub tolerance: f64,
    pub frame_count: usize,
    /// `None` when every corner matched exactly
    pub worst: Option<WorstCorner>,
}

/// Predicted corners for a logged frame
pub fn predict_sample(model: &ForkliftModel, sample: &Sample) -> Corners {
    model.predict_corners(&sample.pose())
}

/// Per-corner L-infinity error between predicted and logged corners
pub fn corner_errors(predicted: &Corners, logged: &Corners) -> [(CornerId, f64); 4] {
    CornerId::ALL.map(|id| (id, predicted.get(id).chebyshev_distance(&logged.get(id))))
}

/// Running maximum of corner errors over a trajectory
///
/// Only a strictly larger error replaces the current worst case, so ties
/// keep the earliest (frame, corner).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorstCase {
    max_error: f64,
    worst: Option<WorstCorner>,
    frames: usize,
}

impl WorstCase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame into the running maximum
    ///
    /// A NaN error counts as infinite so a non-finite prediction can never pass.
    pub fn observe(&mut self, frame: usize, sample: &Sample, predicted: &Corners) {
        for (corner, error) in corner_errors(predicted, &sample.corners) {
            let error = if error.is_nan() { f64::INFINITY } else { error };
            if error > self.max_error {
                self.max_error = error;
                self.worst = Some(WorstCorner {
                    frame,
                    time: sample.time,
                    corner,
                    predicted: predicted.get(corner),
                    logged: sample.corners.get(corner),
                    error,
                });
            }
        }
        self.frames += 1;
    }

    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    pub fn worst(&self) -> Option<&WorstCorner> {
        self.worst.as_ref()
    }

    /// Produce the verdict; passing is inclusive of the tolerance
    pub fn finish(self, tolerance: f64) -> ValidationReport {
        ValidationReport {
            passed: self.max_error <= tolerance,
            max_error: self.max_error,
            tolerance,
            frame_count: self.frames,
            worst: self.worst,
        }
    }
}

/// Validates trajectories against one kinematic model
#[derive(Debug, Clone, PartialEq)]
pub struct Validator {
    model: ForkliftModel,
    tolerance: f64,
}

impl Validator {
    pub fn new(model: ForkliftModel, tolerance: f64) -> Self {
        Self { model, tolerance }
    }

    /// Build a validator from a configuration document
    pub fn from_config(config: &ModelConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.model()?, config.tolerance()))
    }

    pub fn model(&self) -> &ForkliftModel {
        &self.model
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Validate every frame; the whole trajectory is always scanned
    pub fn validate(&self, samples: &[Sample]) -> Result<ValidationReport, ValidationError> {
        if samples.is_empty() {
            return Err(ValidationError::EmptyLog);
        }

        let mut worst = WorstCase::new();
        for (frame, sample) in samples.iter().enumerate() {
            let predicted = predict_sample(&self.model, sample);
            worst.observe(frame, sample, &predicted);
        }

        let report = worst.finish(self.tolerance);
        match &report.worst {
            Some(w) => log::info!(
                "Validated {} frames: max corner error {:e} at frame {} ({}), tolerance {:e}",
                report.frame_count,
                report.max_error,
                w.frame,
                w.corner.key(),
                report.tolerance
            ),
            None => log::info!(
                "Validated {} frames: all corners match exactly",
                report.frame_count
            ),
        }
        Ok(report)
    }

    /// Load a log file and validate it
    pub fn validate_file<P: AsRef<Path>>(&self, path: P) -> crate::Result<ValidationReport> {
        let path = path.as_ref();
        let log = TrajectoryLog::load_from_file(path)?;
        log::debug!("Validating {} ({:.3} s of log)", path.display(), log.duration());
        Ok(self.validate(log.samples())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::REQUIRED_COLUMNS;
    use forklift_kinematics::{CargoGeometry, ContainerRamp, Pose, VehicleGeometry};
    use test_log::test;

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    const TOL: f64 = 1e-5;

    fn model() -> ForkliftModel {
        let floor = ContainerRamp::new(0.0, 0.0, 8.0, 2.5, 4.0).unwrap();
        let cargo = CargoGeometry::new(2.3, 2.3, Vec2::new(0.2, 0.0)).unwrap();
        ForkliftModel::new(floor, VehicleGeometry::new(0.2, cargo))
    }

    /// Frames whose logged corners come straight from the model
    fn consistent_samples(model: &ForkliftModel, count: usize) -> Vec<Sample> {
        (0..count)
            .map(|i| {
                let t = i as f64 * 0.02;
                let pose = Pose::new(-2.6 + 0.5 * t, 0.03 * (t * 3.0).sin(), -0.01 * t, 0.15 + 0.05 * t);
                Sample {
                    time: t,
                    s: pose.s,
                    pitch: pose.pitch,
                    tilt: pose.tilt,
                    lift: pose.lift,
                    ceiling_z: 100.0,
                    floor_z: model.floor().ground_z(),
                    corners: model.predict_corners(&pose),
                    clearance_top: 1.0,
                    clearance_bottom: 0.2,
                    safety_level: 0,
                    terrain_state: 0,
                }
            })
            .collect()
    }

    #[test]
    fn test_consistent_log_passes() -> Result<()> {
        let model = model();
        let samples = consistent_samples(&model, 200);

        let report = Validator::new(model, TOL).validate(&samples)?;
        assert!(report.passed);
        assert!(report.max_error < 1e-9);
        assert_eq!(report.frame_count, 200);
        Ok(())
    }

    #[test]
    fn test_consistent_log_passes_with_zero_tolerance() -> Result<()> {
        let model = model();
        let samples = consistent_samples(&model, 20);

        let report = Validator::new(model, 0.0).validate(&samples)?;
        assert!(report.passed);
        assert_eq!(report.worst, None);
        Ok(())
    }

    #[test]
    fn test_perturbed_corner_is_reported() -> Result<()> {
        let model = model();
        let mut samples = consistent_samples(&model, 100);
        samples[57].corners.front_top.z += 2.0 * TOL;

        let report = Validator::new(model, TOL).validate(&samples)?;
        assert!(!report.passed);

        let worst = report.worst.expect("a worst case");
        assert_eq!(worst.frame, 57);
        assert_eq!(worst.corner, CornerId::FrontTop);
        assert!((worst.error - 2.0 * TOL).abs() < 1e-9);
        assert_eq!(worst.logged, samples[57].corners.front_top);
        Ok(())
    }

    #[test]
    fn test_every_corner_and_axis_is_checked() -> Result<()> {
        let model = model();
        for id in CornerId::ALL {
            for along_x in [true, false] {
                let mut samples = consistent_samples(&model, 10);
                let mut corners = samples[3].corners;
                let p = match id {
                    CornerId::RearBottom => &mut corners.rear_bottom,
                    CornerId::RearTop => &mut corners.rear_top,
                    CornerId::FrontBottom => &mut corners.front_bottom,
                    CornerId::FrontTop => &mut corners.front_top,
                };
                if along_x {
                    p.x -= 2.0 * TOL;
                } else {
                    p.z += 2.0 * TOL;
                }
                samples[3].corners = corners;

                let report = Validator::new(model.clone(), TOL).validate(&samples)?;
                let worst = report.worst.expect("a worst case");
                assert!(!report.passed);
                assert_eq!((worst.frame, worst.corner), (3, id));
            }
        }
        Ok(())
    }

    #[test]
    fn test_global_maximum_not_first_exceedance() -> Result<()> {
        let model = model();
        let mut samples = consistent_samples(&model, 50);
        samples[5].corners.rear_bottom.x += 3.0 * TOL;
        samples[40].corners.rear_top.z -= 7.0 * TOL;
        samples[45].corners.front_bottom.x += 4.0 * TOL;

        let report = Validator::new(model, TOL).validate(&samples)?;
        let worst = report.worst.expect("a worst case");
        assert_eq!(worst.frame, 40);
        assert_eq!(worst.corner, CornerId::RearTop);
        Ok(())
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        let mut worst = WorstCase::new();
        let model = model();
        let mut sample = consistent_samples(&model, 1)[0];
        let predicted = sample.corners;
        sample.corners.rear_bottom.z = predicted.rear_bottom.z + 0.5;

        worst.observe(0, &sample, &predicted);
        let error = worst.max_error();
        assert!(worst.clone().finish(error).passed);
        assert!(!worst.finish(error * 0.5).passed);
    }

    #[test]
    fn test_non_finite_prediction_fails() {
        let model = model();
        let sample = consistent_samples(&model, 1)[0];
        let mut predicted = sample.corners;
        predicted.front_top.z = f64::NAN;

        let mut worst = WorstCase::new();
        worst.observe(0, &sample, &predicted);
        predicted.rear_bottom.x = f64::INFINITY;
        worst.observe(1, &sample, &predicted);

        let w = worst.worst().expect("a worst case");
        assert_eq!((w.frame, w.corner), (0, CornerId::FrontTop));
        assert_eq!(worst.max_error(), f64::INFINITY);

        let report = worst.finish(f64::MAX);
        assert!(!report.passed);
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let model = model();
        let predicted = Corners {
            rear_bottom: Vec2::new(0.0, 0.0),
            rear_top: Vec2::new(0.0, 1.0),
            front_bottom: Vec2::new(1.0, 0.0),
            front_top: Vec2::new(1.0, 1.0),
        };
        let mut sample = consistent_samples(&model, 1)[0];
        sample.corners = predicted;
        sample.corners.rear_top.x = 0.25;
        sample.corners.front_top.x = 1.25;

        let mut worst = WorstCase::new();
        worst.observe(0, &sample, &predicted);
        worst.observe(1, &sample, &predicted);

        let w = worst.worst().expect("a worst case");
        assert_eq!((w.frame, w.corner), (0, CornerId::RearTop));
        assert_eq!(worst.max_error(), 0.25);
    }

    #[test]
    fn test_corner_errors_use_chebyshev_distance() {
        let a = Corners {
            rear_bottom: Vec2::new(0.0, 0.0),
            rear_top: Vec2::new(0.0, 1.0),
            front_bottom: Vec2::new(1.0, 0.0),
            front_top: Vec2::new(1.0, 1.0),
        };
        let mut b = a;
        b.front_bottom = Vec2::new(1.3, -0.4);

        let errors = corner_errors(&a, &b);
        assert_eq!(errors[0], (CornerId::RearBottom, 0.0));
        assert_eq!(errors[2].0, CornerId::FrontBottom);
        assert!((errors[2].1 - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_empty_log_is_rejected() -> Result<()> {
        let header = format!("{}\n", REQUIRED_COLUMNS.join(","));
        let log = TrajectoryLog::from_reader(header.as_bytes())?;
        assert!(log.is_empty());

        let err = Validator::new(model(), TOL).validate(log.samples()).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyLog));
        Ok(())
    }

    #[test]
    fn test_from_config() -> Result<()> {
        let config = ModelConfig::from_json(
            r#"{
  "environment": {
    "container": { "door_x": 0.0, "floor_z": 0.0, "length": 5.0 },
    "ramp": { "length": 1.0, "slope_deg": 4.0 }
  },
  "vehicle": { "mast": { "pivot_height": 1.0 } },
  "cargo": { "length": 2.0, "height": 1.5 },
  "viewer": { "validation_tol": 0.001 }
}"#,
        )?;
        let validator = Validator::from_config(&config)?;
        assert_eq!(validator.tolerance(), 0.001);

        // Level pose at the door: corners sit on the pivot height
        let corners = validator.model().predict_corners(&Pose::default());
        assert_eq!(corners.rear_bottom, Vec2::new(0.0, 1.0));
        assert_eq!(corners.front_bottom, Vec2::new(2.0, 1.0));
        assert_eq!(corners.rear_top, Vec2::new(0.0, 2.5));
        assert_eq!(corners.front_top, Vec2::new(2.0, 2.5));
        Ok(())
    }
}
