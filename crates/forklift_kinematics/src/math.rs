use nalgebra::{UnitComplex, Vector2};
use std::ops::{Add, Mul, Sub};

/// A point or offset in the vehicle's side-view plane.
///
/// `x` runs along the travel axis (positive into the container) and `z` is
/// vertical.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    /// Longitudinal coordinate
    pub x: f64,

    /// Vertical coordinate
    pub z: f64,
}

impl Vec2 {
    /// Create a new vector
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// The zero vector
    pub const fn zeros() -> Self {
        Self { x: 0.0, z: 0.0 }
    }

    /// Euclidean length
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.z)
    }

    /// Largest absolute per-axis difference to `other` (L-infinity distance)
    pub fn chebyshev_distance(&self, other: &Vec2) -> f64 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// True when both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(rhs * self.x, rhs * self.z)
    }
}

impl Mul<Vec2> for f64 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs * self
    }
}

impl From<Vector2<f64>> for Vec2 {
    fn from(v: Vector2<f64>) -> Self {
        Vec2::new(v.x, v.y)
    }
}

impl From<Vec2> for Vector2<f64> {
    fn from(v: Vec2) -> Self {
        Vector2::new(v.x, v.z)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Rotation in the x-z plane by a fixed angle.
///
/// The cosine and sine are evaluated once on construction. [`Rot2::apply`]
/// always evaluates `c * x - s * z` and `s * x + c * z` in that order so
/// results stay bit-identical to any other implementation of the same
/// formula.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rot2 {
    rotation: UnitComplex<f64>,
}

impl Rot2 {
    /// Create a rotation from an angle in radians
    ///
    /// # Example
    /// ```rust
    /// use forklift_kinematics::{Rot2, Vec2};
    /// use std::f64::consts::FRAC_PI_2;
    ///
    /// let quarter = Rot2::from_rad(FRAC_PI_2);
    /// let v = quarter.apply(Vec2::new(1.0, 0.0));
    /// assert!(v.x.abs() < 1e-12);
    /// assert!((v.z - 1.0).abs() < 1e-12);
    /// ```
    pub fn from_rad(theta: f64) -> Self {
        Self {
            rotation: UnitComplex::new(theta),
        }
    }

    /// The identity rotation
    pub fn identity() -> Self {
        Self {
            rotation: UnitComplex::identity(),
        }
    }

    /// Rotation angle in radians, wrapped to (-pi, pi]
    pub fn angle(&self) -> f64 {
        self.rotation.angle()
    }

    /// Rotate a vector
    pub fn apply(&self, v: Vec2) -> Vec2 {
        let c = self.rotation.cos_angle();
        let s = self.rotation.sin_angle();
        Vec2::new(c * v.x - s * v.z, s * v.x + c * v.z)
    }
}

/// Rotate `(x, z)` by `theta` radians
pub fn rotate(theta: f64, x: f64, z: f64) -> Vec2 {
    Rot2::from_rad(theta).apply(Vec2::new(x, z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};
    use test_log::test;

    const ANGLES: [f64; 9] = [-PI, -2.0, -FRAC_PI_2, -0.3, 0.0, 0.07, 1.0, FRAC_PI_2, 3.0];

    #[test]
    fn test_rotate_fixes_origin() {
        for theta in ANGLES {
            assert_eq!(rotate(theta, 0.0, 0.0), Vec2::zeros());
        }
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        for (x, z) in [(1.0, 2.0), (-3.5, 0.25), (0.0, -7.0)] {
            assert_eq!(rotate(0.0, x, z), Vec2::new(x, z));
        }
    }

    #[test]
    fn test_rotate_preserves_magnitude() {
        let v = Vec2::new(3.0, -4.0);
        for theta in ANGLES {
            let r = rotate(theta, v.x, v.z);
            assert!((r.norm() - 5.0).abs() < 1e-12, "theta {}: {}", theta, r);
        }
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let r = rotate(FRAC_PI_2, 0.0, 1.0);
        assert!((r.x + 1.0).abs() < 1e-12);
        assert!(r.z.abs() < 1e-12);
    }

    #[test]
    fn test_rotate_matches_explicit_formula() {
        let theta: f64 = 0.3141;
        let (x, z) = (1.7, -0.4);
        let expected = Vec2::new(
            theta.cos() * x - theta.sin() * z,
            theta.sin() * x + theta.cos() * z,
        );
        assert_eq!(rotate(theta, x, z), expected);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_rot2_serde() -> Result<(), serde_json::Error> {
        let rotation = Rot2::from_rad(0.25);
        let json = serde_json::to_string(&rotation)?;
        let restored: Rot2 = serde_json::from_str(&json)?;

        assert!((restored.angle() - 0.25).abs() < 1e-12);
        let v = restored.apply(Vec2::new(1.0, -2.0));
        assert!(v.chebyshev_distance(&rotation.apply(Vec2::new(1.0, -2.0))) < 1e-12);
        Ok(())
    }

    #[test]
    fn test_rot2_angle() {
        assert!((Rot2::from_rad(0.5).angle() - 0.5).abs() < 1e-12);
        assert_eq!(Rot2::identity().apply(Vec2::new(2.0, 3.0)), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_vector_ops() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(0.5, -1.0);
        assert_eq!(a + b, Vec2::new(1.5, 1.0));
        assert_eq!(a - b, Vec2::new(0.5, 3.0));
        assert_eq!(2.0 * a, Vec2::new(2.0, 4.0));
        assert_eq!(a * 2.0, 2.0 * a);
        assert_eq!(a.chebyshev_distance(&b), 3.0);
    }

    #[test]
    fn test_nalgebra_conversion() {
        let v = Vec2::new(1.5, -2.5);
        let n: Vector2<f64> = v.into();
        assert_eq!(n, Vector2::new(1.5, -2.5));
        assert_eq!(Vec2::from(n), v);
    }
}
