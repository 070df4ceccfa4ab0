use marker_placement::placement::{Direction, MarkerPlacementKind, MultiPolicy};
use serde::{Deserialize, Serialize};

/// External representation of a scene: a canvas, the features on it and the symbol layers to place on them.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtScene {
    /// Name of the scene
    #[serde(default)]
    pub name: String,
    /// Region in which markers can be placed
    pub canvas: ExtRect,
    /// Maps feature coordinates onto the canvas.
    /// Features are assumed to be in canvas coordinates if not specified
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub view: Option<ExtTransform>,
    pub features: Vec<ExtFeature>,
    /// Layers are placed in order, later layers avoid the markers of earlier ones
    pub layers: Vec<ExtSymbolLayer>,
}

/// Axis-aligned rectangle by its corners
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ExtRect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtFeature {
    /// Unique identifier of the feature
    pub id: u64,
    pub geometry: ExtGeometry,
}

/// Various ways to represent the geometry of a feature
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ExtGeometry {
    Point((f64, f64)),
    /// Open path through the vertices
    Line(Vec<(f64, f64)>),
    /// Exterior ring of a polygon, closing vertex optional
    Polygon(Vec<(f64, f64)>),
    Multi(Vec<ExtGeometry>),
}

/// External representation of a symbol layer: which marker is placed where and how
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSymbolLayer {
    pub name: String,
    #[serde(default)]
    pub placement: MarkerPlacementKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub multi_policy: Option<MultiPolicy>,
    /// Width of the marker before any transformation
    pub width: f64,
    /// Height of the marker before any transformation
    pub height: f64,
    #[serde(default)]
    pub transform: ExtTransform,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_error: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub allow_overlap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avoid_edges: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub direction: Option<Direction>,
    /// Place every candidate without consulting or updating the collision detector
    #[serde(default)]
    pub ignore_placement: bool,
}

/// Affine transformation, either as an explicit matrix or as a scale, followed by a rotation and a translation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtTransform {
    /// Coefficients `[a, b, c, d, e, f]` of the matrix, as in SVG. Takes precedence over the other fields
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub matrix: Option<[f64; 6]>,
    #[serde(default = "unit_scale")]
    pub scale: (f64, f64),
    /// Rotation angle in degrees
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub translation: (f64, f64),
}

fn unit_scale() -> (f64, f64) {
    (1.0, 1.0)
}

impl Default for ExtTransform {
    fn default() -> Self {
        Self {
            matrix: None,
            scale: unit_scale(),
            rotation: 0.0,
            translation: (0.0, 0.0),
        }
    }
}

/// External representation of a placed marker
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtMarker {
    /// Feature the marker was placed on
    pub feature_id: u64,
    pub x: f64,
    pub y: f64,
    /// Rotation in radians
    pub angle: f64,
    /// Bounding box of the rotated marker
    pub bbox: ExtRect,
}

/// Result of placing a single symbol layer
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtLayerResult {
    pub name: String,
    pub markers: Vec<ExtMarker>,
    /// Number of features which did not receive a single marker
    pub n_features_without_markers: usize,
}
