//! Trestle tables.
//!
//! Two trestles stand inset from the table ends. Each is a foot on the
//! floor, a post, and a shoulder carrying the top; one stretcher passes
//! through both posts. Posts are tenoned into foot and shoulder (split into
//! twin tenons when wide), and the stretcher through-tenons into the posts.

use tablewright_csg::MortiseSpec;
use tablewright_joinery::{
    calculate, check, double_tenon_split, CalculatedJoinery, CheckContext, JoineryInput,
    HEIGHT_CLEARANCE,
};
use tablewright_math::{Placement, Point3, Vec3};
use tablewright_params::FurnitureParameters;
use tablewright_parts::{build_foot, build_member, build_post, build_shoulder, MemberSpec, SpanAxis};
use tracing::{debug, instrument};

use crate::assembly::{plane_at, Assembly};
use crate::model::{PartId, PartKind};

/// Mortises for a post end: one, or two side by side along Z.
fn post_mortises(face: Point3, normal: Vec3, joint: &CalculatedJoinery) -> Vec<MortiseSpec> {
    match double_tenon_split(joint) {
        Some(split) => [-split.offset, split.offset]
            .into_iter()
            .map(|dz| {
                MortiseSpec::into_face(
                    face + Vec3::new(0.0, 0.0, dz),
                    normal,
                    joint.mortise_width,
                    split.width + HEIGHT_CLEARANCE,
                    joint.mortise_depth,
                )
            })
            .collect(),
        None => vec![MortiseSpec::into_face(
            face,
            normal,
            joint.mortise_width,
            joint.mortise_height,
            joint.mortise_depth,
        )],
    }
}

/// Lay out a trestle table from sanitised parameters.
#[instrument(skip_all, fields(style = ?params.style))]
pub(crate) fn build(asm: &mut Assembly, params: &FurnitureParameters) {
    let tr = &params.trestle;
    let top = params.leg_height();
    let foot_h = tr.foot.height;
    let shoulder_h = tr.shoulder.height;
    let end_x = params.length / 2.0 - tr.end_inset;

    let mut post_input =
        JoineryInput::new(tr.post_thickness, tr.post_width, foot_h.min(shoulder_h), &params.joinery);
    post_input.haunch = false;
    let post_joint = calculate(&post_input);

    let mut through_input = JoineryInput::new(
        tr.stretcher_thickness,
        tr.stretcher_height,
        tr.post_thickness,
        &params.joinery,
    );
    through_input.haunch = false;
    through_input.tenon_length_ratio = 1.0;
    let through_joint = calculate(&through_input);

    let warnings = &mut asm.model_mut().diagnostics.warnings;
    warnings.extend(check(
        &post_joint,
        &CheckContext {
            leg_thickness: foot_h.min(shoulder_h),
            through: false,
        },
    ));
    warnings.extend(check(
        &through_joint,
        &CheckContext {
            leg_thickness: tr.post_thickness,
            through: true,
        },
    ));

    let stretcher_id = PartId::new(PartKind::TrestleStretcher, 0);
    let half_post = tr.post_thickness / 2.0;
    let stretcher = build_member(&MemberSpec {
        name: "trestle stretcher",
        axis: SpanAxis::X,
        centre: Point3::new(0.0, tr.stretcher_elevation, 0.0),
        height: tr.stretcher_height,
        thickness: tr.stretcher_thickness,
        start: plane_at(Point3::new(-end_x + half_post, 0.0, 0.0), Vec3::x()),
        end: plane_at(Point3::new(end_x - half_post, 0.0, 0.0), -Vec3::x()),
    });
    let through = match stretcher {
        Ok((part, placement)) => {
            asm.note_violations(part.violations);
            asm.place(stretcher_id, part.mesh, placement);
            true
        }
        Err(error) => {
            asm.fail(stretcher_id, error);
            false
        }
    };

    for (index, side) in [-1.0_f64, 1.0].into_iter().enumerate() {
        let x = side * end_x;
        debug!(index, x, "trestle");

        let id = PartId::new(PartKind::Foot, index);
        if let Some(mesh) = asm.take(id, build_foot(&tr.foot, tr.dado_length, tr.dado_depth)) {
            let pockets = post_mortises(Point3::new(0.0, foot_h, 0.0), Vec3::y(), &post_joint);
            let mesh = asm.cut(id, mesh, &pockets);
            asm.place(id, mesh, Placement::at(Point3::new(x, 0.0, 0.0)));
        }

        let id = PartId::new(PartKind::Shoulder, index);
        if let Some(mesh) = asm.take(id, build_shoulder(&tr.shoulder)) {
            let pockets = post_mortises(Point3::origin(), -Vec3::y(), &post_joint);
            let mesh = asm.cut(id, mesh, &pockets);
            asm.place(id, mesh, Placement::at(Point3::new(x, top - shoulder_h, 0.0)));
        }

        let id = PartId::new(PartKind::Post, index);
        let post = build_post(tr.post_width, tr.post_thickness, top - shoulder_h - foot_h);
        if let Some(mesh) = asm.take(id, post) {
            // The stretcher enters from the table centre and leaves outboard.
            let mesh = if through {
                let face = Point3::new(-side * half_post, tr.stretcher_elevation - foot_h, 0.0);
                let pocket = MortiseSpec::through(
                    face,
                    -side * Vec3::x(),
                    through_joint.mortise_width,
                    through_joint.mortise_height,
                    tr.post_thickness,
                );
                asm.cut(id, mesh, &[pocket])
            } else {
                mesh
            };
            asm.place(id, mesh, Placement::at(Point3::new(x, foot_h, 0.0)));
        }
    }

    let joinery = &mut asm.model_mut().joinery;
    joinery.trestle_post = Some(post_joint);
    joinery.trestle_stretcher = Some(through_joint);
}
