use log::trace;

use crate::collision::PlacementDetector;
use crate::geometry::geo_enums::GeoRelation;
use crate::geometry::primitives::{Point, Rect};
use crate::placement::PlacementParams;

/// Anchor and rotation of a single marker, in rendering space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerPosition {
    pub x: f64,
    pub y: f64,
    /// Rotation in radians, after direction resolution
    pub angle: f64,
}

impl MarkerPosition {
    pub fn point(&self) -> Point {
        Point(self.x, self.y)
    }
}

/// Stateful traversal producing the successive positions of the markers of a single feature.
///
/// After [`rewind`](MarkerPlacement::rewind), the strategy reproduces exactly the same sequence of positions,
/// provided nothing was committed to the detector in between.
/// This allows a dry-run pass to be followed by a committing pass.
pub trait MarkerPlacement {
    /// Resets the traversal to its initial state
    fn rewind(&mut self);

    /// Returns the next accepted position, or `None` when the traversal is exhausted.
    ///
    /// With `ignore_placement`, the next geometric candidate is returned without testing it against
    /// the detector (overlap and edge avoidance). The direction policy is always applied.
    fn get_point(&mut self, ignore_placement: bool) -> Option<MarkerPosition>;

    /// Drains all remaining positions
    fn collect_points(&mut self, ignore_placement: bool) -> Vec<MarkerPosition> {
        std::iter::from_fn(|| self.get_point(ignore_placement)).collect()
    }
}

/// Runs a candidate through the direction policy and, unless `ignore_placement`, the edge and overlap tests.
/// `emitted` holds the boxes already accepted in the current pass.
/// Returns the resolved position and its bounding box if the candidate is accepted.
pub(crate) fn evaluate_candidate<D: PlacementDetector + ?Sized>(
    params: &PlacementParams,
    detector: &D,
    emitted: &[Rect],
    anchor: Point,
    raw_angle: f64,
    ignore_placement: bool,
) -> Option<(MarkerPosition, Rect)> {
    let Point(x, y) = anchor;
    let Some(angle) = params.resolve_direction(raw_angle) else {
        trace!("[MP] ({x:.3}, {y:.3}) rejected by direction {}", params.direction);
        return None;
    };
    let bbox = params.perform_transform(angle, x, y);

    if !ignore_placement {
        if params.avoid_edges
            && detector.extent().almost_relation_to(bbox) != GeoRelation::Surrounding
        {
            trace!("[MP] ({x:.3}, {y:.3}) rejected, crosses the edge");
            return None;
        }
        if !params.allow_overlap
            && (!detector.has_placement(&bbox) || emitted.iter().any(|e| e.overlaps(&bbox)))
        {
            trace!("[MP] ({x:.3}, {y:.3}) rejected, overlaps another marker");
            return None;
        }
    }

    Some((MarkerPosition { x, y, angle }, bbox))
}
