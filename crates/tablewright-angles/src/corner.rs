//! Leg corner identities.

use serde::{Deserialize, Serialize};

/// The four leg positions of a rectangular table.
///
/// Front is −Z, left is −X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegCorner {
    /// −X, −Z.
    FrontLeft,
    /// +X, −Z.
    FrontRight,
    /// −X, +Z.
    BackLeft,
    /// +X, +Z.
    BackRight,
}

/// Unit signs pointing from a leg toward the table interior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteriorAxes {
    /// +1 when the interior lies toward +X.
    pub x: f64,
    /// +1 when the interior lies toward +Z.
    pub z: f64,
}

impl LegCorner {
    /// All corners in declaration order.
    pub const ALL: [LegCorner; 4] = [
        LegCorner::FrontLeft,
        LegCorner::FrontRight,
        LegCorner::BackLeft,
        LegCorner::BackRight,
    ];

    /// True for the two −Z corners.
    pub fn is_front(self) -> bool {
        matches!(self, LegCorner::FrontLeft | LegCorner::FrontRight)
    }

    /// True for the two −X corners.
    pub fn is_left(self) -> bool {
        matches!(self, LegCorner::FrontLeft | LegCorner::BackLeft)
    }

    /// Direction of the table interior from this corner.
    pub fn interior_axes(self) -> InteriorAxes {
        match self {
            LegCorner::FrontLeft => InteriorAxes { x: 1.0, z: 1.0 },
            LegCorner::FrontRight => InteriorAxes { x: -1.0, z: 1.0 },
            LegCorner::BackLeft => InteriorAxes { x: 1.0, z: -1.0 },
            LegCorner::BackRight => InteriorAxes { x: -1.0, z: -1.0 },
        }
    }

    /// Short label for part names and logs.
    pub fn label(self) -> &'static str {
        match self {
            LegCorner::FrontLeft => "front-left",
            LegCorner::FrontRight => "front-right",
            LegCorner::BackLeft => "back-left",
            LegCorner::BackRight => "back-right",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_points_at_centre() {
        for corner in LegCorner::ALL {
            let axes = corner.interior_axes();
            let x = if corner.is_left() { -1.0 } else { 1.0 };
            let z = if corner.is_front() { -1.0 } else { 1.0 };
            assert_eq!(axes.x, -x);
            assert_eq!(axes.z, -z);
        }
    }
}
