use crate::corner::{CornerId, Corners};
use crate::floor::{CeilingProfile, FloorProfile};

/// Gap between the load and the environment for one pose
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clearance {
    /// Smallest ceiling gap over the top corners, minus the top margin
    pub top: f64,

    /// Smallest floor gap over the bottom corners, minus the bottom margin
    pub bottom: f64,

    /// Top corner closest to the ceiling
    pub top_worst: CornerId,

    /// Bottom corner closest to the floor
    pub bottom_worst: CornerId,

    /// Whichever of the two has the smaller clearance
    pub worst: CornerId,
}

impl Clearance {
    /// Smaller of the top and bottom clearances
    pub fn min(&self) -> f64 {
        self.top.min(self.bottom)
    }
}

/// Evaluate top and bottom clearance of the load
///
/// Negative values mean the margin (or the obstruction itself) is violated.
pub fn compute_clearances<E>(
    corners: &Corners,
    env: &E,
    margin_top: f64,
    margin_bottom: f64,
) -> Clearance
where
    E: FloorProfile + CeilingProfile + ?Sized,
{
    let (top_worst, top_gap) = min_gap(
        corners,
        [CornerId::RearTop, CornerId::FrontTop],
        |p| env.ceiling_height_at(p.x) - p.z,
    );
    let (bottom_worst, bottom_gap) = min_gap(
        corners,
        [CornerId::RearBottom, CornerId::FrontBottom],
        |p| p.z - env.floor_height_at(p.x),
    );

    let top = top_gap - margin_top;
    let bottom = bottom_gap - margin_bottom;
    let worst = if top < bottom { top_worst } else { bottom_worst };

    Clearance {
        top,
        bottom,
        top_worst,
        bottom_worst,
        worst,
    }
}

fn min_gap(
    corners: &Corners,
    candidates: [CornerId; 2],
    gap: impl Fn(crate::math::Vec2) -> f64,
) -> (CornerId, f64) {
    let mut best = (candidates[0], f64::INFINITY);
    for id in candidates {
        let value = gap(corners.get(id));
        if value < best.1 {
            best = (id, value);
        }
    }
    best
}
