#![warn(missing_docs)]

//! Mortise-and-tenon dimensioning.
//!
//! [`calculate`] turns member and leg sizes plus the joinery proportions
//! into tenon, mortise and haunch dimensions. Nothing here builds
//! geometry; the part builder and cutting engine consume the result.
//!
//! # Example
//!
//! ```
//! use tablewright_joinery::{calculate, JoineryInput};
//! use tablewright_params::JoineryParams;
//!
//! let input = JoineryInput::new(0.875, 4.0, 2.5, &JoineryParams::default());
//! let j = calculate(&input);
//! assert_eq!(j.tenon_thickness, 0.3125);
//! assert_eq!(j.tenon_length, 1.625);
//! assert_eq!(j.mortise_depth, 1.6875);
//! ```

mod check;

pub use check::{check, double_tenon_split, CheckContext, DoubleTenon, JoineryWarning};

use serde::{Deserialize, Serialize};
use tablewright_angles::CompoundAngle;
use tablewright_params::{CornerJoint, JoineryParams};

/// Mortise width over tenon thickness.
pub const WIDTH_CLEARANCE: f64 = 1.0 / 64.0;
/// Mortise height over tenon width.
pub const HEIGHT_CLEARANCE: f64 = 1.0 / 32.0;
/// Mortise depth over tenon length.
pub const DEPTH_CLEARANCE: f64 = 1.0 / 16.0;
/// Smallest tenon width produced when shoulders eat the member.
pub const MIN_TENON_WIDTH: f64 = 0.125;

/// Chisel and router widths from 1/8" to 1" in 1/16" steps.
pub const STANDARD_WIDTHS: [f64; 15] = [
    2.0 / 16.0,
    3.0 / 16.0,
    4.0 / 16.0,
    5.0 / 16.0,
    6.0 / 16.0,
    7.0 / 16.0,
    8.0 / 16.0,
    9.0 / 16.0,
    10.0 / 16.0,
    11.0 / 16.0,
    12.0 / 16.0,
    13.0 / 16.0,
    14.0 / 16.0,
    15.0 / 16.0,
    16.0 / 16.0,
];

/// Nearest standard tool width; the smaller width wins a tie.
pub fn snap_to_standard(raw: f64) -> f64 {
    let mut best = STANDARD_WIDTHS[0];
    let mut best_dist = (raw - best).abs();
    for &w in &STANDARD_WIDTHS[1..] {
        let d = (raw - w).abs();
        if d < best_dist {
            best = w;
            best_dist = d;
        }
    }
    best
}

/// Sizes feeding one joint.
#[derive(Debug, Clone, PartialEq)]
pub struct JoineryInput {
    /// Thickness of the tenoned member (apron or stretcher).
    pub member_thickness: f64,
    /// Vertical size of the tenoned member.
    pub member_height: f64,
    /// Size of the receiving leg or post along the tenon.
    pub leg_thickness: f64,
    /// Tenon thickness as a fraction of member thickness.
    pub tenon_thickness_ratio: f64,
    /// Tenon length as a fraction of leg thickness.
    pub tenon_length_ratio: f64,
    /// Shoulder above and below the tenon.
    pub shoulder_width: f64,
    /// Minimum wall outside the mortise.
    pub mortise_setback: f64,
    /// Corner treatment.
    pub corner_joint: CornerJoint,
    /// Whether the tenon carries a haunch.
    pub haunch: bool,
}

impl JoineryInput {
    /// Input for a member of the given size entering a leg, with the
    /// proportions from `params`.
    pub fn new(
        member_thickness: f64,
        member_height: f64,
        leg_thickness: f64,
        params: &JoineryParams,
    ) -> Self {
        Self {
            member_thickness,
            member_height,
            leg_thickness,
            tenon_thickness_ratio: params.tenon_thickness_ratio,
            tenon_length_ratio: params.tenon_length_ratio,
            shoulder_width: params.shoulder_width,
            mortise_setback: params.mortise_setback,
            corner_joint: params.corner_joint,
            haunch: params.haunch,
        }
    }
}

/// Compound cut for the tenon ends meeting inside a splayed leg, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompoundCut {
    /// Saw miter.
    pub miter: f64,
    /// Blade bevel.
    pub bevel: f64,
}

/// Derived joint dimensions (inches; angles in degrees).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedJoinery {
    /// Tenon thickness, a standard tool width.
    pub tenon_thickness: f64,
    /// Tenon width (vertical).
    pub tenon_width: f64,
    /// Tenon length into the leg.
    pub tenon_length: f64,
    /// Mortise width (across the member).
    pub mortise_width: f64,
    /// Mortise height (vertical).
    pub mortise_height: f64,
    /// Mortise depth into the leg.
    pub mortise_depth: f64,
    /// Haunch height, when haunched.
    pub haunch_width: Option<f64>,
    /// Haunch depth, when haunched.
    pub haunch_depth: Option<f64>,
    /// Shoulder above and below the tenon.
    pub shoulder_width: f64,
    /// Minimum wall outside the mortise.
    pub mortise_setback: f64,
    /// Tenon end miter for mitred corners.
    pub miter_angle: Option<f64>,
    /// Compound cut for splayed corners.
    pub compound: Option<CompoundCut>,
}

/// Compute joint dimensions.
pub fn calculate(input: &JoineryInput) -> CalculatedJoinery {
    let tenon_thickness = snap_to_standard(input.member_thickness * input.tenon_thickness_ratio);
    let tenon_width =
        (input.member_height - 2.0 * input.shoulder_width).max(MIN_TENON_WIDTH);
    let tenon_length = input.leg_thickness * input.tenon_length_ratio;

    let (haunch_width, haunch_depth) = if input.haunch {
        (Some(2.0 * input.shoulder_width), Some(0.5 * tenon_length))
    } else {
        (None, None)
    };

    CalculatedJoinery {
        tenon_thickness,
        tenon_width,
        tenon_length,
        mortise_width: tenon_thickness + WIDTH_CLEARANCE,
        mortise_height: tenon_width + HEIGHT_CLEARANCE,
        mortise_depth: tenon_length + DEPTH_CLEARANCE,
        haunch_width,
        haunch_depth,
        shoulder_width: input.shoulder_width,
        mortise_setback: input.mortise_setback,
        miter_angle: (input.corner_joint == CornerJoint::Mitered).then_some(45.0),
        compound: None,
    }
}

/// Joinery for a specific splayed corner: adds the compound miter and bevel.
pub fn for_corner(joinery: &CalculatedJoinery, angle: &CompoundAngle) -> CalculatedJoinery {
    let mut out = joinery.clone();
    if angle.miter_angle != 0.0 || angle.bevel_angle != 0.0 {
        out.compound = Some(CompoundCut {
            miter: angle.miter_angle.to_degrees(),
            bevel: angle.bevel_angle.to_degrees(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tablewright_angles::{solve, LegCorner, LegSection};

    fn input() -> JoineryInput {
        JoineryInput::new(0.875, 4.0, 2.5, &JoineryParams::default())
    }

    #[test]
    fn test_scenario_a_tenon_thickness() {
        assert_relative_eq!(0.875 * 0.333, 0.291375, epsilon = 1e-12);
        assert_eq!(calculate(&input()).tenon_thickness, 5.0 / 16.0);
    }

    #[test]
    fn test_scenario_b_length_and_depth() {
        let j = calculate(&input());
        assert_eq!(j.tenon_length, 1.625);
        assert_eq!(j.mortise_depth, 1.6875);
    }

    #[test]
    fn test_snap_bounds_and_ties() {
        assert_eq!(snap_to_standard(0.0), 0.125);
        assert_eq!(snap_to_standard(3.0), 1.0);
        // Halfway between 1/4 and 5/16 resolves to the smaller width.
        assert_eq!(snap_to_standard(0.28125), 0.25);
    }

    #[test]
    fn test_width_and_clearances() {
        let j = calculate(&input());
        assert_eq!(j.tenon_width, 3.25);
        assert_eq!(j.mortise_height, 3.25 + 1.0 / 32.0);
        assert_eq!(j.mortise_width, 0.3125 + 1.0 / 64.0);
    }

    #[test]
    fn test_haunch_only_when_enabled() {
        let j = calculate(&input());
        assert_eq!((j.haunch_width, j.haunch_depth), (None, None));
        let mut with = input();
        with.haunch = true;
        let j = calculate(&with);
        assert_eq!(j.haunch_width, Some(0.75));
        assert_eq!(j.haunch_depth, Some(0.8125));
    }

    #[test]
    fn test_miter_only_for_mitered() {
        for (joint, expected) in [
            (CornerJoint::Mitered, Some(45.0)),
            (CornerJoint::Shortened, None),
            (CornerJoint::Stacked, None),
        ] {
            let mut i = input();
            i.corner_joint = joint;
            assert_eq!(calculate(&i).miter_angle, expected);
        }
    }

    #[test]
    fn test_shoulders_wider_than_member_clamp() {
        let mut i = input();
        i.member_height = 0.5;
        assert_eq!(calculate(&i).tenon_width, MIN_TENON_WIDTH);
    }

    #[test]
    fn test_for_corner_adds_compound_cut() {
        let base = calculate(&input());
        let section = LegSection {
            top_half: 1.25,
            bottom_half: 0.75,
            height: 28.0,
        };
        let splayed = for_corner(&base, &solve(LegCorner::FrontRight, 10.0, &section));
        let cut = splayed.compound.unwrap();
        assert!(cut.miter > 7.0 && cut.miter < 10.0);
        assert_relative_eq!(cut.miter, cut.bevel, epsilon = 1e-12);
        assert_eq!(splayed.tenon_thickness, base.tenon_thickness);

        let square = for_corner(&base, &solve(LegCorner::FrontRight, 0.0, &section));
        assert_eq!(square.compound, None);
    }
}
