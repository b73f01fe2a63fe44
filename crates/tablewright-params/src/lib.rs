#![warn(missing_docs)]

//! Declarative parameter tree for tablewright tables.
//!
//! [`FurnitureParameters`] is an immutable value: the geometry pipeline
//! receives a shared reference and never mutates it. Every field carries a
//! default, so a parameter file only needs to name what differs.
//!
//! # Example
//!
//! ```
//! use tablewright_params::{FurnitureParameters, LegStyle};
//!
//! let params = FurnitureParameters::from_toml_str(
//!     r#"
//!     length = 72.0
//!
//!     [legs]
//!     style = "turned"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(params.length, 72.0);
//! assert_eq!(params.legs.style, LegStyle::Turned);
//! assert_eq!(params.width, 36.0);
//! ```

mod preset;
mod sanitize;

pub use sanitize::ConstraintViolation;

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or saving parameter files.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// Reading or writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML document did not match the parameter tree.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The parameter tree could not be written as TOML.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The JSON document did not match the parameter tree.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported parameter file format: {0}")]
    UnknownFormat(String),
}

/// Overall table construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    /// Four legs joined by aprons and optional stretchers.
    #[default]
    FourLeg,
    /// Two end assemblies (foot, post, shoulder) joined by a stretcher.
    Trestle,
}

/// Named design style, used to pick preset defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Slim inside-tapered legs, haunched aprons.
    #[default]
    Shaker,
    /// Turned legs, thick chamfered top, box stretchers.
    Farmhouse,
    /// Heavy square legs, H stretchers, lower shelf.
    Mission,
    /// Splayed legs, rounded top with an undercut edge.
    MidCentury,
}

impl Style {
    /// All styles, in declaration order.
    pub const ALL: [Style; 4] = [
        Style::Shaker,
        Style::Farmhouse,
        Style::Mission,
        Style::MidCentury,
    ];
}

/// Leg construction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegStyle {
    /// Straight square stock, optional foot chamfer.
    Square,
    /// Square stock narrowing below the taper start.
    #[default]
    Tapered,
    /// Lathe-turned round below a square-sized pommel.
    Turned,
    /// Tilted outward at a compound angle.
    Splayed,
}

/// Which faces of a tapered leg narrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaperMode {
    /// Only the two faces toward the table interior taper.
    #[default]
    InsideOnly,
    /// All four faces taper uniformly.
    AllSides,
}

/// Which edges of the top are chamfered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChamferEdge {
    /// Square edges.
    #[default]
    None,
    /// Upper edge only.
    Top,
    /// Lower (under-bevel) edge only.
    Bottom,
    /// Upper and lower edges.
    Both,
}

/// Stretcher arrangement between the legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StretcherLayout {
    /// No stretchers.
    #[default]
    None,
    /// Four stretchers around the perimeter.
    Box,
    /// Two side stretchers and one centre stretcher along the length.
    H,
}

/// How two tenons meeting inside one leg avoid each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerJoint {
    /// Tenon ends mitred at 45 degrees.
    Mitered,
    /// Tenons shortened so they stop short of each other.
    #[default]
    Shortened,
    /// Tenons offset vertically.
    Stacked,
}

/// Complete parameter tree for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FurnitureParameters {
    /// Four-leg or trestle construction.
    pub table_type: TableType,
    /// Design style the tree was derived from.
    pub style: Style,
    /// Overall length along X (inches).
    pub length: f64,
    /// Overall width along Z (inches).
    pub width: f64,
    /// Floor to top surface (inches).
    pub height: f64,
    /// Table top.
    pub top: TopParams,
    /// Legs (four-leg tables).
    pub legs: LegParams,
    /// Aprons under the top (four-leg tables).
    pub aprons: ApronParams,
    /// Lower stretchers (four-leg tables).
    pub stretchers: StretcherParams,
    /// End assemblies (trestle tables).
    pub trestle: TrestleParams,
    /// Mortise-and-tenon proportions.
    pub joinery: JoineryParams,
    /// Optional lower shelf (four-leg tables).
    pub shelf: ShelfParams,
}

impl Default for FurnitureParameters {
    fn default() -> Self {
        Self {
            table_type: TableType::FourLeg,
            style: Style::Shaker,
            length: 60.0,
            width: 36.0,
            height: 30.0,
            top: TopParams::default(),
            legs: LegParams::default(),
            aprons: ApronParams::default(),
            stretchers: StretcherParams::default(),
            trestle: TrestleParams::default(),
            joinery: JoineryParams::default(),
            shelf: ShelfParams::default(),
        }
    }
}

/// Table top slab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopParams {
    /// Slab thickness.
    pub thickness: f64,
    /// Distance from the top edge to the outer faces of the legs.
    pub overhang: f64,
    /// Plan-view corner radius; zero for square corners.
    pub corner_radius: f64,
    /// Edge chamfer.
    pub chamfer: ChamferParams,
}

impl Default for TopParams {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            overhang: 1.5,
            corner_radius: 0.0,
            chamfer: ChamferParams::default(),
        }
    }
}

/// Edge chamfer on the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChamferParams {
    /// Chamfered edges.
    pub edge: ChamferEdge,
    /// Vertical size of each chamfer.
    pub size: f64,
    /// Chamfer angle from horizontal, in degrees.
    pub angle: f64,
}

impl Default for ChamferParams {
    fn default() -> Self {
        Self {
            edge: ChamferEdge::None,
            size: 0.25,
            angle: 45.0,
        }
    }
}

/// Leg parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegParams {
    /// Construction algorithm.
    pub style: LegStyle,
    /// Square stock size at the top.
    pub thickness: f64,
    /// Vertical size of the foot chamfer on square legs; zero for none.
    pub foot_chamfer: f64,
    /// Outward tilt of splayed legs, in degrees.
    pub splay_angle: f64,
    /// Length of the full-size block at the top of a turned leg.
    pub pommel_length: f64,
    /// Taper (tapered legs; `end_size` is also the splayed foot size).
    pub taper: TaperParams,
}

impl Default for LegParams {
    fn default() -> Self {
        Self {
            style: LegStyle::Tapered,
            thickness: 2.5,
            foot_chamfer: 0.0,
            splay_angle: 8.0,
            pommel_length: 5.0,
            taper: TaperParams::default(),
        }
    }
}

/// Leg taper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaperParams {
    /// Which faces taper.
    pub mode: TaperMode,
    /// Cross-section size at the floor.
    pub end_size: f64,
    /// Distance below the leg top where the taper begins.
    pub start_from_top: f64,
}

impl Default for TaperParams {
    fn default() -> Self {
        Self {
            mode: TaperMode::InsideOnly,
            end_size: 1.5,
            start_from_top: 5.0,
        }
    }
}

/// Aprons joining the legs below the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApronParams {
    /// Whether aprons are built.
    pub enabled: bool,
    /// Vertical size.
    pub height: f64,
    /// Horizontal thickness.
    pub thickness: f64,
    /// Inset of the apron's outer face from the leg's outer face.
    pub setback: f64,
}

impl Default for ApronParams {
    fn default() -> Self {
        Self {
            enabled: true,
            height: 4.0,
            thickness: 0.875,
            setback: 0.125,
        }
    }
}

/// Lower stretchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StretcherParams {
    /// Arrangement.
    pub layout: StretcherLayout,
    /// Vertical size.
    pub height: f64,
    /// Horizontal thickness.
    pub thickness: f64,
    /// Floor to centre of the side (Z-spanning) stretchers.
    pub side_elevation: f64,
    /// Floor to centre of the front/back and centre stretchers.
    pub front_elevation: f64,
}

impl Default for StretcherParams {
    fn default() -> Self {
        Self {
            layout: StretcherLayout::None,
            height: 2.0,
            thickness: 0.875,
            side_elevation: 6.0,
            front_elevation: 8.0,
        }
    }
}

/// Side profile of a trestle foot or shoulder.
///
/// Inside a parameter file each profile is read as a patch over its own
/// defaults, so a partial `[trestle.shoulder]` keeps the shoulder values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileParams {
    /// Overall length across the table.
    pub length: f64,
    /// Height of the flat centre section.
    pub height: f64,
    /// Height at the two ends.
    pub end_height: f64,
    /// Length of the flat centre section.
    pub flat_length: f64,
    /// Thickness along the table length.
    pub thickness: f64,
}

impl ProfileParams {
    /// Default foot profile.
    pub fn foot() -> Self {
        Self {
            length: 28.0,
            height: 3.0,
            end_height: 1.5,
            flat_length: 10.0,
            thickness: 2.5,
        }
    }

    /// Default shoulder profile.
    pub fn shoulder() -> Self {
        Self {
            length: 26.0,
            height: 2.5,
            end_height: 1.25,
            flat_length: 10.0,
            thickness: 2.5,
        }
    }
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self::foot()
    }
}

/// Fields given in a profile table; the rest come from a base profile.
#[derive(Deserialize)]
struct ProfilePatch {
    length: Option<f64>,
    height: Option<f64>,
    end_height: Option<f64>,
    flat_length: Option<f64>,
    thickness: Option<f64>,
}

impl ProfilePatch {
    fn over(self, base: ProfileParams) -> ProfileParams {
        ProfileParams {
            length: self.length.unwrap_or(base.length),
            height: self.height.unwrap_or(base.height),
            end_height: self.end_height.unwrap_or(base.end_height),
            flat_length: self.flat_length.unwrap_or(base.flat_length),
            thickness: self.thickness.unwrap_or(base.thickness),
        }
    }
}

fn foot_profile<'de, D: Deserializer<'de>>(d: D) -> Result<ProfileParams, D::Error> {
    Ok(ProfilePatch::deserialize(d)?.over(ProfileParams::foot()))
}

fn shoulder_profile<'de, D: Deserializer<'de>>(d: D) -> Result<ProfileParams, D::Error> {
    Ok(ProfilePatch::deserialize(d)?.over(ProfileParams::shoulder()))
}

/// Trestle end assemblies and their stretcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrestleParams {
    /// Distance from each end of the top to the centre of its assembly.
    pub end_inset: f64,
    /// Post width across the table.
    pub post_width: f64,
    /// Post thickness along the table.
    pub post_thickness: f64,
    /// Length of the floor-relief dado under the foot.
    pub dado_length: f64,
    /// Depth of the floor-relief dado.
    pub dado_depth: f64,
    /// Stretcher vertical size.
    pub stretcher_height: f64,
    /// Stretcher thickness across the table.
    pub stretcher_thickness: f64,
    /// Floor to stretcher centre.
    pub stretcher_elevation: f64,
    /// Foot profile.
    #[serde(deserialize_with = "foot_profile")]
    pub foot: ProfileParams,
    /// Shoulder (top support) profile.
    #[serde(deserialize_with = "shoulder_profile")]
    pub shoulder: ProfileParams,
}

impl Default for TrestleParams {
    fn default() -> Self {
        Self {
            end_inset: 9.0,
            post_width: 5.0,
            post_thickness: 2.5,
            dado_length: 16.0,
            dado_depth: 0.25,
            stretcher_height: 4.0,
            stretcher_thickness: 1.25,
            stretcher_elevation: 12.0,
            foot: ProfileParams::foot(),
            shoulder: ProfileParams::shoulder(),
        }
    }
}

/// Mortise-and-tenon proportions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoineryParams {
    /// Tenon thickness as a fraction of member thickness.
    pub tenon_thickness_ratio: f64,
    /// Tenon length as a fraction of leg thickness.
    pub tenon_length_ratio: f64,
    /// Shoulder above and below the tenon.
    pub shoulder_width: f64,
    /// Minimum wall between a mortise and the leg's outer face.
    pub mortise_setback: f64,
    /// Corner treatment where two tenons meet.
    pub corner_joint: CornerJoint,
    /// Add a haunch above apron tenons.
    pub haunch: bool,
}

impl Default for JoineryParams {
    fn default() -> Self {
        Self {
            tenon_thickness_ratio: 0.333,
            tenon_length_ratio: 0.65,
            shoulder_width: 0.375,
            mortise_setback: 0.25,
            corner_joint: CornerJoint::Shortened,
            haunch: false,
        }
    }
}

/// Lower shelf between the legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfParams {
    /// Whether the shelf is built.
    pub enabled: bool,
    /// Floor to the shelf's underside.
    pub elevation: f64,
    /// Panel thickness.
    pub thickness: f64,
}

impl Default for ShelfParams {
    fn default() -> Self {
        Self {
            enabled: false,
            elevation: 8.0,
            thickness: 0.75,
        }
    }
}

impl FurnitureParameters {
    /// Leg length: floor to the underside of the top.
    pub fn leg_height(&self) -> f64 {
        self.height - self.top.thickness
    }

    /// Parse a TOML parameter document.
    pub fn from_toml_str(s: &str) -> Result<Self, ParamsError> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a JSON parameter document.
    pub fn from_json_str(s: &str) -> Result<Self, ParamsError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Render as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ParamsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Render as pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a parameter file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self, ParamsError> {
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let params = match ext.as_deref() {
            Some("toml") => Self::from_toml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => return Err(ParamsError::UnknownFormat(path.display().to_string())),
        };
        tracing::debug!(path = %path.display(), "loaded parameters");
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let params = FurnitureParameters::from_toml_str("height = 29.0\n").unwrap();
        assert_eq!(params.height, 29.0);
        assert_eq!(params.legs, LegParams::default());
        assert_eq!(params.joinery.tenon_length_ratio, 0.65);
    }

    #[test]
    fn test_nested_tables() {
        let params = FurnitureParameters::from_toml_str(
            r#"
            table_type = "trestle"

            [top.chamfer]
            edge = "both"
            angle = 30.0

            [trestle.foot]
            length = 30.0
            "#,
        )
        .unwrap();
        assert_eq!(params.table_type, TableType::Trestle);
        assert_eq!(params.top.chamfer.edge, ChamferEdge::Both);
        assert_eq!(params.top.chamfer.size, 0.25);
        assert_eq!(params.trestle.foot.length, 30.0);
        assert_eq!(params.trestle.foot.height, 3.0);
    }

    #[test]
    fn test_partial_shoulder_keeps_shoulder_defaults() {
        let params = FurnitureParameters::from_toml_str(
            r#"
            [trestle.shoulder]
            height = 3.5
            "#,
        )
        .unwrap();
        let shoulder = &params.trestle.shoulder;
        assert_eq!(shoulder.height, 3.5);
        assert_eq!(shoulder.length, 26.0);
        assert_eq!(shoulder.end_height, 1.25);
        assert_eq!(params.trestle.foot, ProfileParams::foot());

        let json = FurnitureParameters::from_json_str(
            r#"{ "trestle": { "shoulder": { "length": 24.0 } } }"#,
        )
        .unwrap();
        assert_eq!(json.trestle.shoulder.length, 24.0);
        assert_eq!(json.trestle.shoulder.height, 2.5);
    }

    #[test]
    fn test_toml_roundtrip_preserves_tree() {
        let params = FurnitureParameters::preset(Style::MidCentury);
        let text = params.to_toml_string().unwrap();
        let back = FurnitureParameters::from_toml_str(&text).unwrap();
        assert_eq!(params, back);
    }

    #[test]
    fn test_json_enum_names() {
        let params = FurnitureParameters::from_json_str(
            r#"{ "legs": { "style": "splayed", "taper": { "mode": "all_sides" } } }"#,
        )
        .unwrap();
        assert_eq!(params.legs.style, LegStyle::Splayed);
        assert_eq!(params.legs.taper.mode, TaperMode::AllSides);
    }

    #[test]
    fn test_unknown_variant_is_error() {
        let err = FurnitureParameters::from_toml_str("[legs]\nstyle = \"cabriole\"\n");
        assert!(matches!(err, Err(ParamsError::Toml(_))));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = std::env::temp_dir().join("tablewright-params-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("table.yaml");
        std::fs::write(&path, "length: 60").unwrap();
        assert!(matches!(
            FurnitureParameters::load(&path),
            Err(ParamsError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_load_json_file() {
        let dir = std::env::temp_dir().join("tablewright-params-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("table.json");
        std::fs::write(&path, r#"{ "width": 40.0 }"#).unwrap();
        let params = FurnitureParameters::load(&path).unwrap();
        assert_eq!(params.width, 40.0);
    }

    #[test]
    fn test_leg_height() {
        let params = FurnitureParameters::default();
        assert_eq!(params.leg_height(), 29.0);
    }
}
