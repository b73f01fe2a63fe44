//! Style presets.

use crate::{
    ChamferEdge, CornerJoint, FurnitureParameters, LegStyle, StretcherLayout, Style, TaperMode,
};

impl FurnitureParameters {
    /// Parameter tree with the defaults of a named style.
    pub fn preset(style: Style) -> Self {
        let mut p = FurnitureParameters {
            style,
            ..Default::default()
        };
        match style {
            Style::Shaker => {
                p.length = 60.0;
                p.width = 34.0;
                p.height = 29.0;
                p.top.thickness = 0.875;
                p.top.overhang = 1.25;
                p.legs.style = LegStyle::Tapered;
                p.legs.thickness = 1.75;
                p.legs.taper.mode = TaperMode::InsideOnly;
                p.legs.taper.end_size = 1.0;
                p.legs.taper.start_from_top = 5.5;
                p.aprons.height = 4.5;
                p.aprons.thickness = 0.75;
                p.aprons.setback = 0.125;
                p.joinery.haunch = true;
                p.joinery.corner_joint = CornerJoint::Mitered;
            }
            Style::Farmhouse => {
                p.length = 72.0;
                p.width = 38.0;
                p.height = 30.0;
                p.top.thickness = 1.5;
                p.top.overhang = 2.0;
                p.top.chamfer.edge = ChamferEdge::Bottom;
                p.top.chamfer.size = 0.5;
                p.top.chamfer.angle = 30.0;
                p.legs.style = LegStyle::Turned;
                p.legs.thickness = 3.0;
                p.legs.pommel_length = 6.0;
                p.aprons.height = 5.0;
                p.aprons.thickness = 1.0;
                p.stretchers.layout = StretcherLayout::Box;
                p.stretchers.height = 2.0;
                p.stretchers.thickness = 1.0;
                p.stretchers.side_elevation = 5.0;
                p.stretchers.front_elevation = 5.0;
            }
            Style::Mission => {
                p.length = 54.0;
                p.width = 32.0;
                p.height = 30.0;
                p.top.thickness = 1.25;
                p.top.overhang = 1.0;
                p.legs.style = LegStyle::Square;
                p.legs.thickness = 2.5;
                p.legs.foot_chamfer = 0.25;
                p.aprons.height = 4.0;
                p.aprons.thickness = 1.0;
                p.stretchers.layout = StretcherLayout::H;
                p.stretchers.height = 2.5;
                p.stretchers.thickness = 1.0;
                p.stretchers.side_elevation = 5.0;
                p.stretchers.front_elevation = 5.0;
                p.shelf.enabled = true;
                p.shelf.elevation = 7.0;
                p.joinery.corner_joint = CornerJoint::Stacked;
            }
            Style::MidCentury => {
                p.length = 60.0;
                p.width = 34.0;
                p.height = 29.5;
                p.top.thickness = 1.0;
                p.top.overhang = 3.0;
                p.top.corner_radius = 3.0;
                p.top.chamfer.edge = ChamferEdge::Bottom;
                p.top.chamfer.size = 0.375;
                p.top.chamfer.angle = 25.0;
                p.legs.style = LegStyle::Splayed;
                p.legs.thickness = 2.25;
                p.legs.splay_angle = 8.0;
                p.legs.taper.end_size = 1.0;
                p.aprons.height = 3.0;
                p.aprons.thickness = 0.75;
            }
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_records_style() {
        for style in Style::ALL {
            assert_eq!(FurnitureParameters::preset(style).style, style);
        }
    }

    #[test]
    fn test_presets_are_in_range() {
        for style in Style::ALL {
            let (_, violations) = FurnitureParameters::preset(style).sanitized();
            assert!(violations.is_empty(), "{style:?}: {violations:?}");
        }
    }

    #[test]
    fn test_mission_has_shelf_and_h_stretchers() {
        let p = FurnitureParameters::preset(Style::Mission);
        assert!(p.shelf.enabled);
        assert_eq!(p.stretchers.layout, StretcherLayout::H);
    }
}
