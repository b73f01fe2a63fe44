//! Property tests for leg cross-sections and leg meshes.

use proptest::prelude::*;
use tablewright_angles::LegCorner;
use tablewright_params::{LegStyle, TaperMode};
use tablewright_parts::{build_leg, Leg, LegSpec};

const TOL: f64 = 1e-9;

fn corner() -> impl Strategy<Value = LegCorner> {
    prop::sample::select(LegCorner::ALL.to_vec())
}

fn tapered() -> impl Strategy<Value = LegSpec> {
    (
        corner(),
        1.0f64..4.0,
        18.0f64..36.0,
        0.3f64..1.0,
        0.0f64..12.0,
        prop::bool::ANY,
    )
        .prop_map(|(corner, t, h, end_ratio, start, all_sides)| LegSpec {
            style: LegStyle::Tapered,
            taper_mode: if all_sides {
                TaperMode::AllSides
            } else {
                TaperMode::InsideOnly
            },
            taper_end: t * end_ratio,
            taper_start: start,
            ..LegSpec::square(corner, t, h)
        })
}

fn any_style() -> impl Strategy<Value = LegSpec> {
    (
        tapered(),
        prop::sample::select(vec![
            LegStyle::Square,
            LegStyle::Tapered,
            LegStyle::Turned,
            LegStyle::Splayed,
        ]),
        0.0f64..12.0,
    )
        .prop_map(|(spec, style, angle)| LegSpec {
            style,
            foot_chamfer: 0.25,
            pommel_length: 5.0,
            splay_angle: angle,
            ..spec
        })
}

proptest! {
    #[test]
    fn sections_never_grow_downward(spec in tapered(), a in 0.0f64..1.0, b in 0.0f64..1.0) {
        let (leg, violations) = Leg::resolve(&spec);
        prop_assert!(violations.is_empty());
        let (upper, lower) = if a < b { (a, b) } else { (b, a) };
        let s0 = leg.section_at(-upper * leg.length());
        let s1 = leg.section_at(-lower * leg.length());
        prop_assert!(s1.width_x() <= s0.width_x() + TOL);
        prop_assert!(s1.width_z() <= s0.width_z() + TOL);
    }

    #[test]
    fn full_size_above_taper_start(spec in tapered(), f in 0.0f64..1.0) {
        let (leg, _) = Leg::resolve(&spec);
        let s = leg.section_at(-f * spec.taper_start);
        prop_assert!((s.width_x() - spec.thickness).abs() < TOL);
        prop_assert!((s.width_z() - spec.thickness).abs() < TOL);
    }

    #[test]
    fn inside_taper_keeps_outer_faces(spec in tapered()) {
        prop_assume!(spec.taper_mode == TaperMode::InsideOnly);
        let (leg, _) = Leg::resolve(&spec);
        let half = spec.thickness / 2.0;
        let axes = spec.corner.interior_axes();
        let foot = leg.section_at(-leg.length());
        let outer_x = if axes.x > 0.0 { foot.min_x } else { -foot.max_x };
        let outer_z = if axes.z > 0.0 { foot.min_z } else { -foot.max_z };
        prop_assert!((outer_x + half).abs() < TOL);
        prop_assert!((outer_z + half).abs() < TOL);
        prop_assert!((foot.width_x() - spec.taper_end).abs() < TOL);
    }

    #[test]
    fn every_style_builds_a_closed_leg(spec in any_style()) {
        let part = build_leg(&spec).unwrap();
        let report = part.mesh.validate().unwrap();
        prop_assert!(report.volume > 0.0);
        // Only splayed tops are bevelled above the leg origin.
        if spec.style != LegStyle::Splayed {
            prop_assert!(part.mesh.bounding_box().max.y <= TOL);
        }
    }
}
