//! Range clamping for parameter trees.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::FurnitureParameters;

/// A parameter that was out of range and has been clamped.
///
/// This is advisory data, not an error: construction continues with the
/// clamped value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Dotted path of the offending field, e.g. `legs.taper.end_size`.
    pub field: String,
    /// What was wrong and what was used instead.
    pub reason: String,
}

impl ConstraintViolation {
    /// Create a violation record.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

struct Clamper {
    violations: Vec<ConstraintViolation>,
}

impl Clamper {
    fn clamp(&mut self, value: &mut f64, field: &str, lo: f64, hi: f64) {
        let hi = hi.max(lo);
        let clamped = if value.is_finite() {
            value.clamp(lo, hi)
        } else {
            lo
        };
        if clamped != *value {
            tracing::warn!(field, from = *value, to = clamped, "parameter clamped");
            self.violations.push(ConstraintViolation::new(
                field,
                format!("{value} outside [{lo}, {hi}], using {clamped}"),
            ));
            *value = clamped;
        }
    }
}

impl FurnitureParameters {
    /// A copy with every out-of-range value clamped, plus what was changed.
    ///
    /// Ranges that depend on other fields are applied after those fields
    /// have themselves been clamped.
    pub fn sanitized(&self) -> (Self, Vec<ConstraintViolation>) {
        let mut p = self.clone();
        let mut c = Clamper {
            violations: Vec::new(),
        };

        c.clamp(&mut p.length, "length", 18.0, 144.0);
        c.clamp(&mut p.width, "width", 12.0, 72.0);
        c.clamp(&mut p.height, "height", 12.0, 48.0);
        let short_side = p.length.min(p.width);

        let top = &mut p.top;
        c.clamp(&mut top.thickness, "top.thickness", 0.5, 4.0);
        c.clamp(&mut top.overhang, "top.overhang", 0.0, 0.25 * short_side);
        c.clamp(&mut top.corner_radius, "top.corner_radius", 0.0, 0.25 * short_side);
        c.clamp(&mut top.chamfer.size, "top.chamfer.size", 0.0, 2.0);
        c.clamp(&mut top.chamfer.angle, "top.chamfer.angle", 10.0, 80.0);
        let leg_height = p.height - p.top.thickness;

        let legs = &mut p.legs;
        c.clamp(&mut legs.thickness, "legs.thickness", 1.0, 6.0);
        c.clamp(&mut legs.foot_chamfer, "legs.foot_chamfer", 0.0, 0.4 * legs.thickness);
        c.clamp(&mut legs.splay_angle, "legs.splay_angle", 0.0, 15.0);
        c.clamp(&mut legs.pommel_length, "legs.pommel_length", 0.0, 0.5 * leg_height);
        c.clamp(&mut legs.taper.end_size, "legs.taper.end_size", 0.25, 6.0);
        c.clamp(
            &mut legs.taper.start_from_top,
            "legs.taper.start_from_top",
            0.0,
            leg_height - 1.0,
        );

        let aprons = &mut p.aprons;
        c.clamp(&mut aprons.height, "aprons.height", 1.0, 0.5 * leg_height);
        c.clamp(&mut aprons.thickness, "aprons.thickness", 0.375, 2.0);
        c.clamp(&mut aprons.setback, "aprons.setback", 0.0, 0.5 * p.legs.thickness);

        let st = &mut p.stretchers;
        c.clamp(&mut st.height, "stretchers.height", 0.5, 6.0);
        c.clamp(&mut st.thickness, "stretchers.thickness", 0.375, 2.0);
        let lowest = 0.5 * st.height;
        c.clamp(&mut st.side_elevation, "stretchers.side_elevation", lowest, 0.6 * leg_height);
        c.clamp(&mut st.front_elevation, "stretchers.front_elevation", lowest, 0.6 * leg_height);

        let j = &mut p.joinery;
        c.clamp(&mut j.tenon_thickness_ratio, "joinery.tenon_thickness_ratio", 0.2, 0.5);
        c.clamp(&mut j.tenon_length_ratio, "joinery.tenon_length_ratio", 0.3, 1.0);
        c.clamp(&mut j.shoulder_width, "joinery.shoulder_width", 0.0625, 1.0);
        c.clamp(&mut j.mortise_setback, "joinery.mortise_setback", 0.0625, 1.0);

        let shelf = &mut p.shelf;
        c.clamp(&mut shelf.thickness, "shelf.thickness", 0.375, 2.0);
        c.clamp(&mut shelf.elevation, "shelf.elevation", 1.0, 0.6 * leg_height);

        let tr = &mut p.trestle;
        for (name, prof) in [("foot", &mut tr.foot), ("shoulder", &mut tr.shoulder)] {
            c.clamp(&mut prof.length, &format!("trestle.{name}.length"), 4.0, p.width);
            c.clamp(&mut prof.height, &format!("trestle.{name}.height"), 0.5, 8.0);
            c.clamp(
                &mut prof.end_height,
                &format!("trestle.{name}.end_height"),
                0.25,
                prof.height,
            );
            c.clamp(
                &mut prof.flat_length,
                &format!("trestle.{name}.flat_length"),
                0.0,
                prof.length,
            );
            c.clamp(&mut prof.thickness, &format!("trestle.{name}.thickness"), 0.5, 6.0);
        }
        c.clamp(&mut tr.end_inset, "trestle.end_inset", 0.0, 0.4 * p.length);
        let post_max = tr.foot.flat_length.min(tr.shoulder.flat_length).min(12.0);
        c.clamp(&mut tr.post_width, "trestle.post_width", 1.0, post_max);
        c.clamp(&mut tr.post_thickness, "trestle.post_thickness", 1.0, 6.0);
        c.clamp(&mut tr.dado_length, "trestle.dado_length", 0.0, 0.9 * tr.foot.length);
        c.clamp(&mut tr.dado_depth, "trestle.dado_depth", 0.0, 0.5 * tr.foot.end_height);
        c.clamp(&mut tr.stretcher_height, "trestle.stretcher_height", 1.0, 8.0);
        c.clamp(&mut tr.stretcher_thickness, "trestle.stretcher_thickness", 0.5, 3.0);
        let half = 0.5 * tr.stretcher_height;
        c.clamp(
            &mut tr.stretcher_elevation,
            "trestle.stretcher_elevation",
            tr.foot.height + half,
            leg_height - tr.shoulder.height - half,
        );

        (p, c.violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Style;

    #[test]
    fn test_default_is_clean() {
        let (p, v) = FurnitureParameters::default().sanitized();
        assert!(v.is_empty(), "{v:?}");
        assert_eq!(p, FurnitureParameters::default());
    }

    #[test]
    fn test_out_of_range_is_clamped_and_reported() {
        let mut p = FurnitureParameters::default();
        p.legs.splay_angle = 40.0;
        p.top.chamfer.angle = 5.0;
        let (s, v) = p.sanitized();
        assert_eq!(s.legs.splay_angle, 15.0);
        assert_eq!(s.top.chamfer.angle, 10.0);
        let fields: Vec<_> = v.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["top.chamfer.angle", "legs.splay_angle"]);
    }

    #[test]
    fn test_nan_is_replaced() {
        let mut p = FurnitureParameters::default();
        p.aprons.height = f64::NAN;
        let (s, v) = p.sanitized();
        assert_eq!(s.aprons.height, 1.0);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].field, "aprons.height");
    }

    #[test]
    fn test_dependent_range_uses_clamped_parent() {
        let mut p = FurnitureParameters::preset(Style::Shaker);
        p.legs.thickness = 10.0;
        p.legs.foot_chamfer = 3.0;
        let (s, v) = p.sanitized();
        assert_eq!(s.legs.thickness, 6.0);
        assert!((s.legs.foot_chamfer - 2.4).abs() < 1e-12);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_sanitized_is_idempotent() {
        let mut p = FurnitureParameters::default();
        p.trestle.foot.end_height = 50.0;
        p.width = 2.0;
        let (once, _) = p.sanitized();
        let (twice, v) = once.sanitized();
        assert_eq!(once, twice);
        assert!(v.is_empty());
    }

    #[test]
    fn test_violation_display() {
        let v = ConstraintViolation::new("legs.thickness", "too thin");
        assert_eq!(v.to_string(), "legs.thickness: too thin");
    }
}
