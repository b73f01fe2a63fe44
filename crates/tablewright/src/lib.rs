#![warn(missing_docs)]

//! tablewright - parametric tables in Rust
//!
//! Turns a [`FurnitureParameters`] tree into the cut and placed solids of a
//! table: compound angles and joint sizes first, then part meshes, then
//! mortises cut by mesh boolean difference, then placement in the table
//! frame (inches, +Y up, floor at `y = 0`).
//!
//! Building never fails as a whole. Clamped inputs, parts that could not
//! be built and joints that could not be cut are reported in
//! [`Diagnostics`] next to whatever did build.
//!
//! # Example
//!
//! ```rust
//! use tablewright::{build_table, init_kernel, FurnitureParameters, PartKind, Style};
//!
//! init_kernel();
//! let model = build_table(&FurnitureParameters::preset(Style::Shaker));
//! assert_eq!(model.count(PartKind::Leg), 4);
//! assert_eq!(model.count(PartKind::Apron), 4);
//! assert!(model.diagnostics.is_clean());
//! ```

mod assembly;
pub mod export;
mod four_leg;
mod model;
mod trestle;

pub use export::{to_stl_bytes, write_stl, ExportError};
pub use model::{
    CutFailure, Diagnostics, PartDimensions, PartFailure, PartGeometry, PartId, PartKind,
    TableJoinery, TableModel,
};
pub use tablewright_csg::{init_kernel, is_ready, CsgError, MortiseSpec};
pub use tablewright_joinery::{CalculatedJoinery, JoineryWarning};
pub use tablewright_mesh::{NormalMode, ShadedMesh};
pub use tablewright_params::{ConstraintViolation, FurnitureParameters, ParamsError, Style, TableType};
pub use tablewright_parts::GeometryError;

use tablewright_math::{Placement, Point3};
use tablewright_parts::{build_top, TopSpec};
use tracing::{info, instrument};

use assembly::Assembly;

/// Build every part of the table described by `params`.
///
/// Parameters are sanitised first; the copy that was actually built is
/// reflected in the diagnostics' violations. Mortises are only cut once
/// [`init_kernel`] has run; before that each part needing joinery is kept
/// uncut and reported with [`CsgError::NotReady`].
///
/// The same parameters always give the same model.
#[instrument(skip_all, fields(table = ?params.table_type, style = ?params.style))]
pub fn build_table(params: &FurnitureParameters) -> TableModel {
    let (params, violations) = params.sanitized();
    let mut asm = Assembly::new(violations);

    let id = PartId::new(PartKind::Top, 0);
    if let Some(mesh) = asm.take(id, build_top(&TopSpec::from_params(&params))) {
        let placement = Placement::at(Point3::new(0.0, params.leg_height(), 0.0));
        asm.place(id, mesh, placement);
    }

    match params.table_type {
        TableType::FourLeg => four_leg::build(&mut asm, &params),
        TableType::Trestle => trestle::build(&mut asm, &params),
    }

    let model = asm.finish();
    info!(
        parts = model.parts.len(),
        violations = model.diagnostics.violations.len(),
        failed = model.diagnostics.geometry.len() + model.diagnostics.cuts.len(),
        "table built"
    );
    model
}
