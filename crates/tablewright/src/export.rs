//! Fabrication output.

use std::path::Path;

use tablewright_mesh::{stl_bytes, SolidMesh};
use thiserror::Error;
use tracing::info;

use crate::model::TableModel;

const STL_HEADER: &str = "tablewright table";

/// Errors from writing output files.
#[derive(Error, Debug)]
pub enum ExportError {
    /// An I/O error occurred during export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The model has no parts to write.
    #[error("Empty geometry")]
    EmptyGeometry,
}

/// Binary STL of every part, placed in table coordinates.
pub fn to_stl_bytes(model: &TableModel) -> Vec<u8> {
    let meshes: Vec<SolidMesh> = model.parts.iter().map(|p| p.world_mesh()).collect();
    stl_bytes(&meshes, STL_HEADER)
}

/// Write the binary STL of `model` to `path`.
pub fn write_stl(model: &TableModel, path: impl AsRef<Path>) -> Result<(), ExportError> {
    if model.parts.is_empty() {
        return Err(ExportError::EmptyGeometry);
    }
    let bytes = to_stl_bytes(model);
    std::fs::write(path.as_ref(), &bytes)?;
    info!(path = %path.as_ref().display(), bytes = bytes.len(), "wrote STL");
    Ok(())
}
