//! What a build produces.

use std::fmt;

use serde::{Deserialize, Serialize};
use tablewright_csg::CsgError;
use tablewright_joinery::{CalculatedJoinery, JoineryWarning};
use tablewright_math::Placement;
use tablewright_mesh::{shade, NormalMode, ShadedMesh, SolidMesh};
use tablewright_params::ConstraintViolation;
use tablewright_parts::GeometryError;

/// Kind of part in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    /// Table top.
    Top,
    /// Leg of a four-leg table.
    Leg,
    /// Apron under the top.
    Apron,
    /// Lower stretcher of a four-leg table.
    Stretcher,
    /// Lower shelf panel.
    Shelf,
    /// Trestle foot.
    Foot,
    /// Trestle post.
    Post,
    /// Trestle shoulder under the top.
    Shoulder,
    /// Stretcher joining the two trestle posts.
    TrestleStretcher,
}

impl PartKind {
    /// Lower-case name for logs and reports.
    pub fn label(self) -> &'static str {
        match self {
            PartKind::Top => "top",
            PartKind::Leg => "leg",
            PartKind::Apron => "apron",
            PartKind::Stretcher => "stretcher",
            PartKind::Shelf => "shelf",
            PartKind::Foot => "foot",
            PartKind::Post => "post",
            PartKind::Shoulder => "shoulder",
            PartKind::TrestleStretcher => "trestle-stretcher",
        }
    }
}

/// Identifies one part: its kind and its position among parts of that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartId {
    /// Kind of part.
    pub kind: PartKind,
    /// Index among parts of the same kind.
    pub index: usize,
}

impl PartId {
    /// Create an id.
    pub const fn new(kind: PartKind, index: usize) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.label(), self.index)
    }
}

/// A finished part: mesh in its own frame plus where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct PartGeometry {
    /// Which part this is.
    pub id: PartId,
    /// Closed mesh in part-local coordinates, mortises cut.
    pub mesh: SolidMesh,
    /// Local-to-table placement.
    pub placement: Placement,
}

impl PartGeometry {
    /// The mesh moved into table coordinates.
    pub fn world_mesh(&self) -> SolidMesh {
        self.mesh.transformed(&self.placement.to_transform())
    }

    /// Render buffers for the placed part.
    pub fn shaded(&self, mode: NormalMode) -> ShadedMesh {
        shade(&self.world_mesh(), mode)
    }
}

/// Rough stock size of a part, for cut lists.
///
/// The three extents of the part's local bounding box, largest first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartDimensions {
    /// Which part this is.
    pub id: PartId,
    /// Longest extent.
    pub length: f64,
    /// Middle extent.
    pub width: f64,
    /// Shortest extent.
    pub thickness: f64,
}

impl PartDimensions {
    /// Stock size of `mesh`.
    pub fn of(id: PartId, mesh: &SolidMesh) -> Self {
        let s = mesh.bounding_box().size();
        let mut e = [s.x, s.y, s.z];
        e.sort_by(|a, b| b.total_cmp(a));
        Self {
            id,
            length: e[0],
            width: e[1],
            thickness: e[2],
        }
    }
}

/// Joint sizes used across the table. Joints the table does not have are
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableJoinery {
    /// Apron into leg.
    pub apron: Option<CalculatedJoinery>,
    /// Stretcher into leg.
    pub stretcher: Option<CalculatedJoinery>,
    /// Centre stretcher into side stretcher (H layout).
    pub centre_stretcher: Option<CalculatedJoinery>,
    /// Post into foot and shoulder.
    pub trestle_post: Option<CalculatedJoinery>,
    /// Stretcher through the posts.
    pub trestle_stretcher: Option<CalculatedJoinery>,
}

/// A part that could not be built and was left out.
#[derive(Debug, Clone, PartialEq)]
pub struct PartFailure {
    /// The missing part.
    pub id: PartId,
    /// Why.
    pub error: GeometryError,
}

/// A part whose joinery was not (fully) cut.
#[derive(Debug, Clone, PartialEq)]
pub struct CutFailure {
    /// The affected part.
    pub id: PartId,
    /// Why.
    pub error: CsgError,
}

/// Everything that went less than perfectly. None of it stops a build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Inputs clamped into range.
    pub violations: Vec<ConstraintViolation>,
    /// Parts left out.
    pub geometry: Vec<PartFailure>,
    /// Parts left with some or all joinery uncut.
    pub cuts: Vec<CutFailure>,
    /// Joint proportions worth a second look.
    pub warnings: Vec<JoineryWarning>,
}

impl Diagnostics {
    /// True when every part was built and cut.
    pub fn is_clean(&self) -> bool {
        self.geometry.is_empty() && self.cuts.is_empty()
    }
}

/// A built table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableModel {
    /// Every part that could be built, in build order.
    pub parts: Vec<PartGeometry>,
    /// Stock sizes, one per part.
    pub dimensions: Vec<PartDimensions>,
    /// Joint sizes.
    pub joinery: TableJoinery,
    /// What went wrong, if anything.
    pub diagnostics: Diagnostics,
}

impl TableModel {
    /// The part with `id`, if it was built.
    pub fn part(&self, id: PartId) -> Option<&PartGeometry> {
        self.parts.iter().find(|p| p.id == id)
    }

    /// Parts of one kind, in index order.
    pub fn parts_of(&self, kind: PartKind) -> impl Iterator<Item = &PartGeometry> {
        self.parts.iter().filter(move |p| p.id.kind == kind)
    }

    /// Count of parts of one kind.
    pub fn count(&self, kind: PartKind) -> usize {
        self.parts_of(kind).count()
    }
}
