use approx::assert_relative_eq;
use tablewright::{build_table, init_kernel, FurnitureParameters, PartId, PartKind, Style, TableType};
use tablewright_math::deg;
use tablewright_params::{LegStyle, StretcherLayout};

fn square_table() -> FurnitureParameters {
    let mut p = FurnitureParameters::default();
    p.legs.style = LegStyle::Square;
    p
}

#[test]
fn test_scenario_a_and_b_from_a_full_build() {
    init_kernel();
    let model = build_table(&square_table());
    let apron = model.joinery.apron.as_ref().unwrap();
    assert_eq!(apron.tenon_thickness, 5.0 / 16.0);
    assert_eq!(apron.tenon_length, 1.625);
    assert_eq!(apron.mortise_depth, 1.6875);
    assert!(model.joinery.stretcher.is_none());
    assert!(model.joinery.trestle_post.is_none());
}

#[test]
fn test_scenario_c_uncut_square_leg() {
    init_kernel();
    let mut p = square_table();
    p.height = 29.0;
    p.aprons.enabled = false;
    let model = build_table(&p);
    for leg in model.parts_of(PartKind::Leg) {
        assert_eq!(leg.mesh.num_vertices(), 8);
        assert_eq!(leg.mesh.num_triangles(), 12);
        assert_relative_eq!(leg.mesh.volume(), 2.5 * 2.5 * 28.0, epsilon = 1e-9);
    }
}

#[test]
fn test_scenario_d_splayed_placement() {
    init_kernel();
    let model = build_table(&FurnitureParameters::preset(Style::MidCentury));
    let leg = model.part(PartId::new(PartKind::Leg, 0)).unwrap();
    let r = leg.placement.rotation.unwrap();
    assert_relative_eq!(r.x, deg(8.0), epsilon = 1e-15);
    assert_relative_eq!(r.y, 0.0);
    assert_relative_eq!(r.z, -deg(8.0), epsilon = 1e-15);

    for leg in model.parts_of(PartKind::Leg) {
        let bb = leg.world_mesh().bounding_box();
        assert!(bb.min.y.abs() < 0.1, "{}: foot at {}", leg.id, bb.min.y);
    }
    let apron = model.joinery.apron.as_ref().unwrap();
    assert!(apron.compound.is_some());
}

#[test]
fn test_square_leg_loses_two_mortises() {
    init_kernel();
    let model = build_table(&square_table());
    assert!(model.diagnostics.is_clean(), "{:?}", model.diagnostics);
    let j = model.joinery.apron.as_ref().unwrap();
    let pocket = j.mortise_width * j.mortise_height * j.mortise_depth;
    for leg in model.parts_of(PartKind::Leg) {
        leg.mesh.validate().unwrap();
        assert_relative_eq!(leg.mesh.volume(), 2.5 * 2.5 * 29.0 - 2.0 * pocket, epsilon = 1e-6);
    }
}

#[test]
fn test_aprons_span_between_leg_faces() {
    init_kernel();
    let model = build_table(&square_table());
    let front = model.part(PartId::new(PartKind::Apron, 0)).unwrap();
    let bb = front.world_mesh().bounding_box();
    // Legs at x = ±27.25, so their inside faces sit at ±26.
    assert_relative_eq!(bb.min.x, -26.0, epsilon = 1e-9);
    assert_relative_eq!(bb.max.x, 26.0, epsilon = 1e-9);
    assert_relative_eq!(bb.max.y, 29.0, epsilon = 1e-9);
    assert_relative_eq!(bb.min.z, -16.375, epsilon = 1e-9);

    let side = model.part(PartId::new(PartKind::Apron, 3)).unwrap();
    let bb = side.world_mesh().bounding_box();
    assert_relative_eq!(bb.min.z, -14.0, epsilon = 1e-9);
    assert_relative_eq!(bb.max.z, 14.0, epsilon = 1e-9);
    assert_relative_eq!(bb.max.x, 28.375, epsilon = 1e-9);

    let dims = model
        .dimensions
        .iter()
        .find(|d| d.id == front.id)
        .unwrap();
    assert_relative_eq!(dims.length, 52.0, epsilon = 1e-9);
    assert_relative_eq!(dims.width, 4.0, epsilon = 1e-9);
    assert_relative_eq!(dims.thickness, 0.875, epsilon = 1e-9);
}

#[test]
fn test_every_style_builds_clean() {
    init_kernel();
    for style in Style::ALL {
        let p = FurnitureParameters::preset(style);
        let model = build_table(&p);
        assert!(model.diagnostics.is_clean(), "{style:?}: {:?}", model.diagnostics);
        assert!(model.diagnostics.violations.is_empty(), "{style:?}");
        assert_eq!(model.count(PartKind::Top), 1);
        assert_eq!(model.count(PartKind::Leg), 4);
        assert_eq!(model.count(PartKind::Apron), 4);
        let stretchers = match p.stretchers.layout {
            StretcherLayout::None => 0,
            StretcherLayout::Box => 4,
            StretcherLayout::H => 3,
        };
        assert_eq!(model.count(PartKind::Stretcher), stretchers, "{style:?}");
        assert_eq!(model.count(PartKind::Shelf), usize::from(p.shelf.enabled));
        assert_eq!(model.dimensions.len(), model.parts.len());
        for part in &model.parts {
            let report = part.mesh.validate().unwrap();
            assert!(report.volume > 0.0, "{style:?} {}", part.id);
        }
    }
}

#[test]
fn test_haunch_cuts_more_than_plain_mortise() {
    init_kernel();
    let plain = build_table(&square_table());
    let mut p = square_table();
    p.joinery.haunch = true;
    let haunched = build_table(&p);
    assert!(haunched.diagnostics.is_clean(), "{:?}", haunched.diagnostics);
    let id = PartId::new(PartKind::Leg, 0);
    let a = plain.part(id).unwrap().mesh.volume();
    let b = haunched.part(id).unwrap().mesh.volume();
    assert!(b < a - 0.05, "{b} vs {a}");
}

#[test]
fn test_h_stretchers_cut_the_side_stretchers() {
    init_kernel();
    let model = build_table(&FurnitureParameters::preset(Style::Mission));
    let centre = model.joinery.centre_stretcher.as_ref().unwrap();
    let pocket = centre.mortise_width * centre.mortise_height * centre.mortise_depth;
    for index in 0..2 {
        let side = model.part(PartId::new(PartKind::Stretcher, index)).unwrap();
        let dims = model.dimensions.iter().find(|d| d.id == side.id).unwrap();
        let solid = dims.length * dims.width * dims.thickness;
        assert_relative_eq!(side.mesh.volume(), solid - pocket, epsilon = 1e-6);
    }
    let shelf = model.part(PartId::new(PartKind::Shelf, 0)).unwrap();
    let bb = shelf.world_mesh().bounding_box();
    assert_relative_eq!(bb.min.y, 7.0, epsilon = 1e-9);
}

#[test]
fn test_trestle_table() {
    init_kernel();
    let mut p = FurnitureParameters::default();
    p.table_type = TableType::Trestle;
    let model = build_table(&p);
    assert!(model.diagnostics.is_clean(), "{:?}", model.diagnostics);
    assert_eq!(model.count(PartKind::Top), 1);
    assert_eq!(model.count(PartKind::Foot), 2);
    assert_eq!(model.count(PartKind::Post), 2);
    assert_eq!(model.count(PartKind::Shoulder), 2);
    assert_eq!(model.count(PartKind::TrestleStretcher), 1);
    assert_eq!(model.count(PartKind::Leg), 0);

    let tr = &p.trestle;
    let post_height = p.leg_height() - tr.shoulder.height - tr.foot.height;
    let through = model.joinery.trestle_stretcher.as_ref().unwrap();
    assert_eq!(through.tenon_length, tr.post_thickness);
    for post in model.parts_of(PartKind::Post) {
        let solid = tr.post_width * tr.post_thickness * post_height;
        let hole = through.mortise_width * through.mortise_height * tr.post_thickness;
        assert_relative_eq!(post.mesh.volume(), solid - hole, epsilon = 1e-6);
        let bb = post.world_mesh().bounding_box();
        assert_relative_eq!(bb.min.y, tr.foot.height, epsilon = 1e-9);
    }

    let stretcher = model.part(PartId::new(PartKind::TrestleStretcher, 0)).unwrap();
    let bb = stretcher.world_mesh().bounding_box();
    let inner = p.length / 2.0 - tr.end_inset - tr.post_thickness / 2.0;
    assert_relative_eq!(bb.max.x, inner, epsilon = 1e-9);

    for shoulder in model.parts_of(PartKind::Shoulder) {
        let bb = shoulder.world_mesh().bounding_box();
        assert_relative_eq!(bb.max.y, p.leg_height(), epsilon = 1e-9);
    }
}

#[test]
fn test_out_of_range_input_still_builds() {
    init_kernel();
    let mut p = square_table();
    p.length = 500.0;
    p.legs.thickness = -2.0;
    let model = build_table(&p);
    let fields: Vec<_> = model
        .diagnostics
        .violations
        .iter()
        .map(|v| v.field.as_str())
        .collect();
    assert!(fields.contains(&"length"));
    assert!(fields.contains(&"legs.thickness"));
    assert_eq!(model.count(PartKind::Leg), 4);
}
