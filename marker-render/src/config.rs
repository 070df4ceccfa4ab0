use marker_placement::placement::{DEFAULT_SPACING, Direction, MultiPolicy};
use serde::{Deserialize, Serialize};

use crate::io::svg::SvgDrawOptions;

/// Configuration of the marker renderer
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MarkerRenderConfig {
    /// Settings for layers which do not specify them
    #[serde(default)]
    pub layer_defaults: LayerDefaults,
    /// Also export the placed markers as an SVG drawing
    #[serde(default = "enabled")]
    pub write_svg: bool,
    /// Optional SVG drawing options
    #[serde(default)]
    pub svg_draw_options: SvgDrawOptions,
}

impl Default for MarkerRenderConfig {
    fn default() -> Self {
        Self {
            layer_defaults: LayerDefaults::default(),
            write_svg: true,
            svg_draw_options: SvgDrawOptions::default(),
        }
    }
}

fn enabled() -> bool {
    true
}

/// Placement settings applied to symbol layers that leave them unspecified
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct LayerDefaults {
    pub spacing: f64,
    /// Fraction of the spacing a marker may deviate from its nominal position
    pub max_error: f64,
    pub allow_overlap: bool,
    pub avoid_edges: bool,
    pub direction: Direction,
    pub multi_policy: MultiPolicy,
}

impl Default for LayerDefaults {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            max_error: 0.2,
            allow_overlap: false,
            avoid_edges: false,
            direction: Direction::Right,
            multi_policy: MultiPolicy::Each,
        }
    }
}
