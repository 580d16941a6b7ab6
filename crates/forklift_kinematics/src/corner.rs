use crate::math::Vec2;

/// Identity of one corner of the load's side-view rectangle.
///
/// The declaration order (rear-bottom, rear-top, front-bottom, front-top) is
/// the order used everywhere corners are listed, including log columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CornerId {
    RearBottom,
    RearTop,
    FrontBottom,
    FrontTop,
}

impl CornerId {
    /// All corners in canonical order
    pub const ALL: [CornerId; 4] = [
        CornerId::RearBottom,
        CornerId::RearTop,
        CornerId::FrontBottom,
        CornerId::FrontTop,
    ];

    /// Short key, also the column prefix in trajectory logs (`rb_x`, `rb_z`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            CornerId::RearBottom => "rb",
            CornerId::RearTop => "rt",
            CornerId::FrontBottom => "fb",
            CornerId::FrontTop => "ft",
        }
    }

    /// Look up a corner by its short key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    /// Whether the corner is on the top edge
    pub fn is_top(&self) -> bool {
        matches!(self, CornerId::RearTop | CornerId::FrontTop)
    }

    /// Whether the corner is on the front edge
    pub fn is_front(&self) -> bool {
        matches!(self, CornerId::FrontBottom | CornerId::FrontTop)
    }
}

impl std::fmt::Display for CornerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CornerId::RearBottom => "RearBottom",
            CornerId::RearTop => "RearTop",
            CornerId::FrontBottom => "FrontBottom",
            CornerId::FrontTop => "FrontTop",
        };
        f.write_str(name)
    }
}

/// The four world-space corners of the load, addressed by identity
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Corners {
    pub rear_bottom: Vec2,
    pub rear_top: Vec2,
    pub front_bottom: Vec2,
    pub front_top: Vec2,
}

impl Corners {
    /// Get the position of a corner
    pub fn get(&self, id: CornerId) -> Vec2 {
        match id {
            CornerId::RearBottom => self.rear_bottom,
            CornerId::RearTop => self.rear_top,
            CornerId::FrontBottom => self.front_bottom,
            CornerId::FrontTop => self.front_top,
        }
    }

    /// Iterate corners in canonical order together with their identity
    pub fn iter(&self) -> impl Iterator<Item = (CornerId, Vec2)> + '_ {
        CornerId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }

    /// Corners in polygon order: rear-bottom, front-bottom, front-top, rear-top
    pub fn outline(&self) -> [Vec2; 4] {
        [
            self.rear_bottom,
            self.front_bottom,
            self.front_top,
            self.rear_top,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn sample_corners() -> Corners {
        Corners {
            rear_bottom: Vec2::new(0.0, 0.0),
            rear_top: Vec2::new(0.0, 1.0),
            front_bottom: Vec2::new(2.0, 0.0),
            front_top: Vec2::new(2.0, 1.0),
        }
    }

    #[test]
    fn test_keys_round_trip() {
        for id in CornerId::ALL {
            assert_eq!(CornerId::from_key(id.key()), Some(id));
        }
        assert_eq!(CornerId::from_key("xx"), None);
    }

    #[test]
    fn test_canonical_order() {
        let keys: Vec<_> = CornerId::ALL.iter().map(|id| id.key()).collect();
        assert_eq!(keys, ["rb", "rt", "fb", "ft"]);
    }

    #[test]
    fn test_get_by_identity() {
        let corners = sample_corners();
        assert_eq!(corners.get(CornerId::FrontTop), Vec2::new(2.0, 1.0));
        assert_eq!(corners.get(CornerId::RearTop), Vec2::new(0.0, 1.0));

        let ids: Vec<_> = corners.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, CornerId::ALL);
    }

    #[test]
    fn test_outline_order() {
        let outline = sample_corners().outline();
        assert_eq!(outline[1], Vec2::new(2.0, 0.0));
        assert_eq!(outline[3], Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_classification() {
        assert!(CornerId::RearTop.is_top());
        assert!(!CornerId::FrontBottom.is_top());
        assert!(CornerId::FrontBottom.is_front());
        assert_eq!(format!("{}", CornerId::FrontBottom), "FrontBottom");
    }
}
