use crate::geometry::Transformation;
use crate::geometry::primitives::{Point, Rect};
use crate::placement::Direction;

/// Spacing used by [`LinePlacement`](crate::placement::LinePlacement) when the configured one is below 1
pub const DEFAULT_SPACING: f64 = 100.0;

/// Describes how the markers of one symbol layer are placed.
///
/// Constructed once per layer and borrowed by every strategy placing markers for that layer.
/// It is never mutated during a placement run and can be shared between threads.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementParams {
    /// Footprint of the marker in marker-local space
    pub size: Rect,
    /// Maps marker-local coordinates into rendering space (layer transform, scale, pre-rotation)
    pub transform: Transformation,
    /// Desired distance between the centers of consecutive markers along a path
    pub spacing: f64,
    /// Allowed deviation from `spacing`, as a fraction of it
    pub max_error: f64,
    /// Accept candidates overlapping previously placed markers
    pub allow_overlap: bool,
    /// Reject candidates whose bounding box is not fully inside the detector's extent
    pub avoid_edges: bool,
    pub direction: Direction,
}

impl PlacementParams {
    /// Parameters for a marker with footprint `size`, all other settings at their defaults
    pub fn new(size: Rect) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Bounding box in rendering space of the marker rotated by `angle` and anchored at `(dx, dy)`.
    ///
    /// The corners of `size` are first mapped by `transform`, then rotated by `angle` around the origin
    /// and finally translated by `(dx, dy)`.
    pub fn perform_transform(&self, angle: f64, dx: f64, dy: f64) -> Rect {
        let t = self.transform.clone().rotate(angle).translate((dx, dy));
        self.size.transformed_envelope(&t)
    }

    /// See [`Direction::resolve`]
    pub fn resolve_direction(&self, angle: f64) -> Option<f64> {
        self.direction.resolve(angle)
    }

    /// Width of the marker's footprint in rendering space, before any rotation along the path
    pub fn marker_width(&self) -> f64 {
        self.size.transformed_envelope(&self.transform).width()
    }
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            size: Rect::from_point(Point(0.0, 0.0)),
            transform: Transformation::identity(),
            spacing: DEFAULT_SPACING,
            max_error: 0.2,
            allow_overlap: false,
            avoid_edges: false,
            direction: Direction::default(),
        }
    }
}
