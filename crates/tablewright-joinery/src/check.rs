//! Advisory joint checks.
//!
//! These never fail a build; they describe proportions a woodworker would
//! want to revisit.

use serde::{Deserialize, Serialize};

use crate::CalculatedJoinery;

/// Tenons wider than this many thicknesses should be split in two.
pub const DOUBLE_TENON_RATIO: f64 = 6.0;
/// Tenons shorter than this many thicknesses are weak.
pub const MIN_LENGTH_RATIO: f64 = 5.0;
/// Absolute minimum tenon length (inches).
pub const MIN_LENGTH: f64 = 1.25;

/// Where a joint sits, for checks that depend on more than its own sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckContext {
    /// Thickness of the receiving leg or post along the tenon.
    pub leg_thickness: f64,
    /// True when the tenon should pass right through.
    pub through: bool,
}

/// A joint proportion worth revisiting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JoineryWarning {
    /// The tenon is wide enough that wood movement favours two tenons.
    DoubleTenonRecommended {
        /// Tenon width.
        width: f64,
        /// Tenon thickness.
        thickness: f64,
    },
    /// The tenon is short for its thickness or in absolute terms.
    TenonTooShort {
        /// Tenon length.
        length: f64,
        /// Length it should reach.
        minimum: f64,
    },
    /// A through tenon does not reach the far face.
    ThroughTenonTooShort {
        /// Tenon length.
        length: f64,
        /// Leg thickness to span.
        leg_thickness: f64,
    },
}

/// Review a joint.
pub fn check(joinery: &CalculatedJoinery, ctx: &CheckContext) -> Vec<JoineryWarning> {
    let mut warnings = Vec::new();
    let t = joinery.tenon_thickness;

    if joinery.tenon_width > DOUBLE_TENON_RATIO * t {
        warnings.push(JoineryWarning::DoubleTenonRecommended {
            width: joinery.tenon_width,
            thickness: t,
        });
    }

    let minimum = (MIN_LENGTH_RATIO * t).max(MIN_LENGTH);
    if joinery.tenon_length < minimum {
        warnings.push(JoineryWarning::TenonTooShort {
            length: joinery.tenon_length,
            minimum,
        });
    }

    if ctx.through && joinery.tenon_length < ctx.leg_thickness {
        warnings.push(JoineryWarning::ThroughTenonTooShort {
            length: joinery.tenon_length,
            leg_thickness: ctx.leg_thickness,
        });
    }
    warnings
}

/// Two tenons replacing one over-wide tenon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoubleTenon {
    /// Width of each tenon.
    pub width: f64,
    /// Solid web left between them.
    pub web: f64,
    /// Offset of each tenon centre from the joint centre.
    pub offset: f64,
}

/// Split a tenon wider than [`DOUBLE_TENON_RATIO`] thicknesses into two,
/// separated by a web one tenon thickness wide.
pub fn double_tenon_split(joinery: &CalculatedJoinery) -> Option<DoubleTenon> {
    let t = joinery.tenon_thickness;
    if joinery.tenon_width <= DOUBLE_TENON_RATIO * t {
        return None;
    }
    let web = t;
    let width = (joinery.tenon_width - web) / 2.0;
    Some(DoubleTenon {
        width,
        web,
        offset: (width + web) / 2.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{calculate, JoineryInput};
    use tablewright_params::JoineryParams;

    fn apron() -> CalculatedJoinery {
        calculate(&JoineryInput::new(0.875, 4.0, 2.5, &JoineryParams::default()))
    }

    #[test]
    fn test_wide_apron_wants_double_tenon() {
        // 3.25 wide, 5/16 thick: over 6x.
        let warnings = check(
            &apron(),
            &CheckContext {
                leg_thickness: 2.5,
                through: false,
            },
        );
        assert_eq!(
            warnings,
            vec![JoineryWarning::DoubleTenonRecommended {
                width: 3.25,
                thickness: 0.3125
            }]
        );
    }

    #[test]
    fn test_short_tenon() {
        let j = calculate(&JoineryInput::new(0.875, 1.5, 1.5, &JoineryParams::default()));
        let warnings = check(
            &j,
            &CheckContext {
                leg_thickness: 1.5,
                through: false,
            },
        );
        assert!(warnings
            .iter()
            .any(|w| matches!(w, JoineryWarning::TenonTooShort { minimum, .. } if *minimum == 1.5625)));
    }

    #[test]
    fn test_through_tenon_must_span_leg() {
        let warnings = check(
            &apron(),
            &CheckContext {
                leg_thickness: 2.5,
                through: true,
            },
        );
        assert!(warnings.contains(&JoineryWarning::ThroughTenonTooShort {
            length: 1.625,
            leg_thickness: 2.5
        }));
    }

    #[test]
    fn test_double_split_geometry() {
        let j = apron();
        let split = double_tenon_split(&j).unwrap();
        assert_eq!(split.web, j.tenon_thickness);
        assert!((2.0 * split.width + split.web - j.tenon_width).abs() < 1e-12);
        // Outer edges of the pair line up with the single tenon's edges.
        assert!((split.offset + split.width / 2.0 - j.tenon_width / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_narrow_tenon_not_split() {
        let j = calculate(&JoineryInput::new(1.5, 2.5, 2.5, &JoineryParams::default()));
        assert!(double_tenon_split(&j).is_none());
    }
}
