//! Four-leg tables.
//!
//! Legs stand at the corners, inset from the top edge by the overhang.
//! Aprons run flush with the leg tops; stretchers sit on the leg axes lower
//! down. Every member ends on the true face of the leg it meets, and each
//! connection leaves a mortise in that leg (plus a haunch for haunched
//! aprons). Legs are cut once all their members are known.

use tablewright_angles::LegCorner;
use tablewright_csg::MortiseSpec;
use tablewright_joinery::{calculate, check, for_corner, CalculatedJoinery, CheckContext, JoineryInput};
use tablewright_math::{Placement, Plane, Point3, Transform, Vec3};
use tablewright_mesh::SolidMesh;
use tablewright_params::{FurnitureParameters, StretcherLayout, StretcherParams};
use tablewright_parts::{
    build_leg, build_member, build_shelf, BuiltPart, FaceAxis, GeometryError, Leg, LegSpec,
    MemberSpec, ShelfSpec, SpanAxis,
};
use tracing::{debug, instrument};

use crate::assembly::{plane_at, Assembly};
use crate::model::{PartId, PartKind};

const FRONT_LEFT: usize = 0;
const FRONT_RIGHT: usize = 1;
const BACK_LEFT: usize = 2;
const BACK_RIGHT: usize = 3;

/// A leg in place, collecting the cavities its members ask for.
struct PlacedLeg {
    id: PartId,
    corner: LegCorner,
    leg: Leg,
    /// Table height of the leg top.
    top: f64,
    placement: Placement,
    to_world: Transform,
    to_local: Transform,
    mesh: Option<SolidMesh>,
    cavities: Vec<MortiseSpec>,
}

impl PlacedLeg {
    /// Resolve and place the leg at `corner`. A leg whose mesh fails to
    /// build is still placed, so members can find its faces; it is only
    /// left out of the model.
    fn new<F>(
        asm: &mut Assembly,
        params: &FurnitureParameters,
        index: usize,
        corner: LegCorner,
        build_mesh: &F,
    ) -> Self
    where
        F: Fn(&LegSpec) -> Result<BuiltPart, GeometryError>,
    {
        let spec = LegSpec::from_params(params, corner);
        let (leg, _) = Leg::resolve(&spec);
        let id = PartId::new(PartKind::Leg, index);
        let mesh = asm.take(id, build_mesh(&spec));

        let t = leg.spec().thickness;
        let axes = corner.interior_axes();
        let top = params.leg_height();
        let position = Point3::new(
            -axes.x * (params.length / 2.0 - params.top.overhang - t / 2.0),
            top,
            -axes.z * (params.width / 2.0 - params.top.overhang - t / 2.0),
        );
        let placement = match leg.rotation() {
            Some(r) => Placement::rotated(position, r),
            None => Placement::at(position),
        };
        Self {
            id,
            corner,
            leg,
            top,
            placement,
            to_world: placement.to_transform(),
            to_local: placement.inverse_transform(),
            mesh,
            cavities: Vec::new(),
        }
    }

    fn local_y(&self, y: f64) -> f64 {
        -self.leg.local_depth(self.top - y)
    }

    /// The inside face along `axis` at table height `y`, in the leg frame
    /// and in the table frame.
    fn face(&self, axis: FaceAxis, y: f64) -> Result<(Plane, Plane), GeometryError> {
        let local = self.leg.inside_face(axis, self.local_y(y))?;
        let world = local.transformed(&self.to_world);
        Ok((local, world))
    }

    /// Point on the leg's own axis at table height `y`.
    fn axis_point(&self, y: f64) -> Point3 {
        self.to_world
            .apply_point(&Point3::new(0.0, self.local_y(y), 0.0))
    }

    /// Smaller cross-section size at table height `y`.
    fn size_at(&self, y: f64) -> f64 {
        let s = self.leg.section_at(self.local_y(y));
        s.width_x().min(s.width_z())
    }

    /// Queue the mortise where the member centre line `centre + s·dir`
    /// meets `face`, plus its haunch when the joint has one.
    ///
    /// The haunch cavity is centred on the mortise's upper edge: its lower
    /// half overlaps the mortise and its upper half opens the groove the
    /// haunch fills.
    fn mortise(
        &mut self,
        face: &Plane,
        centre: &Point3,
        dir: &Vec3,
        joint: &CalculatedJoinery,
    ) -> Result<(), GeometryError> {
        let c = self.to_local.apply_point(centre);
        let d = self.to_local.apply_vec(dir);
        let hit = face
            .intersect_line(&c, &d)
            .ok_or(GeometryError::ParallelEnd("leg"))?;
        self.cavities.push(MortiseSpec::into_face(
            hit,
            face.normal,
            joint.mortise_width,
            joint.mortise_height,
            joint.mortise_depth,
        ));
        if let (Some(width), Some(depth)) = (joint.haunch_width, joint.haunch_depth) {
            let up = self.to_local.apply_vec(&Vec3::y()).normalize();
            self.cavities.push(MortiseSpec::into_face(
                hit + up * (joint.mortise_height / 2.0),
                face.normal,
                joint.mortise_width,
                width,
                depth,
            ));
        }
        Ok(())
    }
}

/// A member running between two legs.
struct Span {
    name: &'static str,
    id: PartId,
    from: usize,
    to: usize,
    axis: SpanAxis,
    centre: Point3,
    height: f64,
    thickness: f64,
}

fn face_axis(axis: SpanAxis) -> FaceAxis {
    match axis {
        SpanAxis::X => FaceAxis::X,
        SpanAxis::Z => FaceAxis::Z,
    }
}

/// Build the member and queue its mortises in both legs.
fn between(
    legs: &mut [PlacedLeg],
    span: &Span,
    joint: &CalculatedJoinery,
) -> Result<(BuiltPart, Placement), GeometryError> {
    let axis = face_axis(span.axis);
    let (start_local, start) = legs[span.from].face(axis, span.centre.y)?;
    let (end_local, end) = legs[span.to].face(axis, span.centre.y)?;
    let built = build_member(&MemberSpec {
        name: span.name,
        axis: span.axis,
        centre: span.centre,
        height: span.height,
        thickness: span.thickness,
        start,
        end,
    })?;
    let dir = span.axis.direction();
    legs[span.from].mortise(&start_local, &span.centre, &dir, joint)?;
    legs[span.to].mortise(&end_local, &span.centre, &dir, joint)?;
    Ok(built)
}

fn join(asm: &mut Assembly, legs: &mut [PlacedLeg], span: &Span, joint: &CalculatedJoinery) {
    match between(legs, span, joint) {
        Ok((part, placement)) => {
            asm.note_violations(part.violations);
            asm.place(span.id, part.mesh, placement);
        }
        Err(error) => asm.fail(span.id, error),
    }
}

/// Joint proportions for a member entering a leg, adjusted for splay.
fn joint_for(input: &JoineryInput, leg: &PlacedLeg) -> CalculatedJoinery {
    let j = calculate(input);
    match leg.leg.compound_angle() {
        Some(angle) => for_corner(&j, angle),
        None => j,
    }
}

/// Lay out a four-leg table from sanitised parameters.
#[instrument(skip_all, fields(style = ?params.style, legs = ?params.legs.style))]
pub(crate) fn build(asm: &mut Assembly, params: &FurnitureParameters) {
    build_with(asm, params, build_leg);
}

fn build_with<F>(asm: &mut Assembly, params: &FurnitureParameters, build_mesh: F)
where
    F: Fn(&LegSpec) -> Result<BuiltPart, GeometryError>,
{
    let mut legs: Vec<PlacedLeg> = LegCorner::ALL
        .into_iter()
        .enumerate()
        .map(|(index, corner)| PlacedLeg::new(asm, params, index, corner, &build_mesh))
        .collect();

    if params.aprons.enabled {
        aprons(asm, params, &mut legs);
    }
    match params.stretchers.layout {
        StretcherLayout::None => {}
        StretcherLayout::Box => box_stretchers(asm, params, &mut legs),
        StretcherLayout::H => h_stretchers(asm, params, &mut legs),
    }
    if params.shelf.enabled {
        shelf(asm, params, &legs);
    }

    for leg in &mut legs {
        let Some(mesh) = leg.mesh.take() else {
            continue;
        };
        debug!(corner = leg.corner.label(), cavities = leg.cavities.len(), "cutting leg");
        let mesh = asm.cut(leg.id, mesh, &leg.cavities);
        asm.place(leg.id, mesh, leg.placement);
    }
}

fn aprons(asm: &mut Assembly, params: &FurnitureParameters, legs: &mut [PlacedLeg]) {
    let a = &params.aprons;
    let t = legs[FRONT_LEFT].leg.spec().thickness;
    let input = JoineryInput::new(a.thickness, a.height, t, &params.joinery);
    let joint = joint_for(&input, &legs[FRONT_LEFT]);
    asm.model_mut().diagnostics.warnings.extend(check(
        &joint,
        &CheckContext {
            leg_thickness: t,
            through: false,
        },
    ));

    // Keep at least the mortise setback of leg outside the mortise.
    let setback = a
        .setback
        .max(joint.mortise_setback - (a.thickness - joint.mortise_width) / 2.0);
    let inset = setback + a.thickness / 2.0 - t / 2.0;
    let y = params.leg_height() - a.height / 2.0;

    let along = |from: usize, to: usize, axis: SpanAxis, name, index| {
        let leg = &legs[from];
        let axes = leg.corner.interior_axes();
        let p = leg.placement.position;
        let centre = match axis {
            SpanAxis::X => Point3::new(0.0, y, p.z + axes.z * inset),
            SpanAxis::Z => Point3::new(p.x + axes.x * inset, y, 0.0),
        };
        Span {
            name,
            id: PartId::new(PartKind::Apron, index),
            from,
            to,
            axis,
            centre,
            height: a.height,
            thickness: a.thickness,
        }
    };
    let spans = [
        along(FRONT_LEFT, FRONT_RIGHT, SpanAxis::X, "front apron", 0),
        along(BACK_LEFT, BACK_RIGHT, SpanAxis::X, "back apron", 1),
        along(FRONT_LEFT, BACK_LEFT, SpanAxis::Z, "left apron", 2),
        along(FRONT_RIGHT, BACK_RIGHT, SpanAxis::Z, "right apron", 3),
    ];
    for span in &spans {
        join(asm, legs, span, &joint);
    }
    asm.model_mut().joinery.apron = Some(joint);
}

/// Stretcher joint, sized against the leg where it is thinnest.
fn stretcher_joint(
    asm: &mut Assembly,
    params: &FurnitureParameters,
    legs: &[PlacedLeg],
    lowest: f64,
) -> CalculatedJoinery {
    let s = &params.stretchers;
    let size = legs[FRONT_LEFT].size_at(lowest);
    let mut input = JoineryInput::new(s.thickness, s.height, size, &params.joinery);
    input.haunch = false;
    let joint = joint_for(&input, &legs[FRONT_LEFT]);
    asm.model_mut().diagnostics.warnings.extend(check(
        &joint,
        &CheckContext {
            leg_thickness: size,
            through: false,
        },
    ));
    asm.model_mut().joinery.stretcher = Some(joint.clone());
    joint
}

/// A stretcher on the leg axes at height `y`.
fn on_axes(
    legs: &[PlacedLeg],
    s: &StretcherParams,
    (from, to): (usize, usize),
    axis: SpanAxis,
    y: f64,
    name: &'static str,
    index: usize,
) -> Span {
    let p = legs[from].axis_point(y);
    let centre = match axis {
        SpanAxis::X => Point3::new(0.0, y, p.z),
        SpanAxis::Z => Point3::new(p.x, y, 0.0),
    };
    Span {
        name,
        id: PartId::new(PartKind::Stretcher, index),
        from,
        to,
        axis,
        centre,
        height: s.height,
        thickness: s.thickness,
    }
}

fn box_stretchers(asm: &mut Assembly, params: &FurnitureParameters, legs: &mut [PlacedLeg]) {
    let s = &params.stretchers;
    let joint = stretcher_joint(asm, params, legs, s.side_elevation.min(s.front_elevation));
    let spans = [
        on_axes(legs, s, (FRONT_LEFT, FRONT_RIGHT), SpanAxis::X, s.front_elevation, "front stretcher", 0),
        on_axes(legs, s, (BACK_LEFT, BACK_RIGHT), SpanAxis::X, s.front_elevation, "back stretcher", 1),
        on_axes(legs, s, (FRONT_LEFT, BACK_LEFT), SpanAxis::Z, s.side_elevation, "left stretcher", 2),
        on_axes(legs, s, (FRONT_RIGHT, BACK_RIGHT), SpanAxis::Z, s.side_elevation, "right stretcher", 3),
    ];
    for span in &spans {
        join(asm, legs, span, &joint);
    }
}

/// Side stretchers plus a centre stretcher tenoned into them.
fn h_stretchers(asm: &mut Assembly, params: &FurnitureParameters, legs: &mut [PlacedLeg]) {
    let s = &params.stretchers;
    let y = s.side_elevation;
    let joint = stretcher_joint(asm, params, legs, y);
    let sides = [
        on_axes(legs, s, (FRONT_LEFT, BACK_LEFT), SpanAxis::Z, y, "left stretcher", 0),
        on_axes(legs, s, (FRONT_RIGHT, BACK_RIGHT), SpanAxis::Z, y, "right stretcher", 1),
    ];
    let mut built = Vec::with_capacity(2);
    for span in &sides {
        match between(legs, span, &joint) {
            Ok((part, placement)) => {
                asm.note_violations(part.violations);
                built.push((span.id, part.mesh, placement));
            }
            Err(error) => asm.fail(span.id, error),
        }
    }

    // The centre stretcher needs both sides to land on.
    if built.len() == 2 {
        let mut input = JoineryInput::new(s.thickness, s.height, s.thickness, &params.joinery);
        input.haunch = false;
        let centre_joint = calculate(&input);
        asm.model_mut().diagnostics.warnings.extend(check(
            &centre_joint,
            &CheckContext {
                leg_thickness: s.thickness,
                through: false,
            },
        ));

        let half = s.thickness / 2.0;
        let left_face = Point3::new(sides[0].centre.x + half, y, 0.0);
        let right_face = Point3::new(sides[1].centre.x - half, y, 0.0);
        let z = (legs[FRONT_LEFT].axis_point(y).z + legs[BACK_LEFT].axis_point(y).z) / 2.0;
        let id = PartId::new(PartKind::Stretcher, 2);
        let centre = build_member(&MemberSpec {
            name: "centre stretcher",
            axis: SpanAxis::X,
            centre: Point3::new(0.0, y, z),
            height: s.height,
            thickness: s.thickness,
            start: plane_at(left_face, Vec3::x()),
            end: plane_at(right_face, -Vec3::x()),
        });
        match centre {
            Ok((part, placement)) => {
                asm.note_violations(part.violations);
                asm.place(id, part.mesh, placement);
                for ((side_id, mesh, side_placement), (face, normal)) in built
                    .iter_mut()
                    .zip([(left_face, Vec3::x()), (right_face, -Vec3::x())])
                {
                    let to_local = side_placement.inverse_transform();
                    let face = Point3::new(face.x, y, z);
                    let pocket = MortiseSpec::into_face(
                        to_local.apply_point(&face),
                        to_local.apply_vec(&normal),
                        centre_joint.mortise_width,
                        centre_joint.mortise_height,
                        centre_joint.mortise_depth,
                    );
                    *mesh = asm.cut(*side_id, std::mem::take(mesh), &[pocket]);
                }
            }
            Err(error) => asm.fail(id, error),
        }
        asm.model_mut().joinery.centre_stretcher = Some(centre_joint);
    }

    for (id, mesh, placement) in built {
        asm.place(id, mesh, placement);
    }
}

/// Shelf bounded by the inside faces at its mid-thickness.
fn shelf_spec(params: &FurnitureParameters, legs: &[PlacedLeg]) -> Result<ShelfSpec, GeometryError> {
    let s = &params.shelf;
    let y = s.elevation + s.thickness / 2.0;
    Ok(ShelfSpec {
        elevation: s.elevation,
        thickness: s.thickness,
        left: legs[FRONT_LEFT].face(FaceAxis::X, y)?.1,
        right: legs[FRONT_RIGHT].face(FaceAxis::X, y)?.1,
        front: legs[FRONT_LEFT].face(FaceAxis::Z, y)?.1,
        back: legs[BACK_LEFT].face(FaceAxis::Z, y)?.1,
    })
}

fn shelf(asm: &mut Assembly, params: &FurnitureParameters, legs: &[PlacedLeg]) {
    let id = PartId::new(PartKind::Shelf, 0);
    match shelf_spec(params, legs).and_then(|spec| build_shelf(&spec)) {
        Ok((part, placement)) => {
            asm.note_violations(part.violations);
            asm.place(id, part.mesh, placement);
        }
        Err(error) => asm.fail(id, error),
    }
}
