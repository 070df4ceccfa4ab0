use itertools::Itertools;
use log::{debug, warn};
use ordered_float::OrderedFloat;

use crate::collision::PlacementDetector;
use crate::geometry::Geometry;
use crate::geometry::geo_traits::{CollidesWith, Shape};
use crate::geometry::primitives::{Point, Polygon};
use crate::placement::strategy::evaluate_candidate;
use crate::placement::{MarkerPlacement, MarkerPosition, PlacementParams};

/// Which point of the geometry is used as the anchor of a single marker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointAnchor {
    /// Area centroid for polygons, middle point by length for lines
    Centroid,
    /// Like [`PointAnchor::Centroid`], but inside polygons.
    /// For multi-part geometries the point lies inside one of the polygon parts, if there are any.
    Interior,
}

/// Places a single, unrotated marker at a representative point of the geometry.
pub struct PointPlacement<'a, D: ?Sized> {
    params: &'a PlacementParams,
    detector: &'a D,
    anchor: Option<Point>,
    done: bool,
}

impl<'a, D: PlacementDetector + ?Sized> PointPlacement<'a, D> {
    /// Anchored at the centroid of the geometry
    pub fn new(geometry: &Geometry, params: &'a PlacementParams, detector: &'a D) -> Self {
        Self::with_anchor(geometry, PointAnchor::Centroid, params, detector)
    }

    /// Anchored at a point inside the geometry
    pub fn interior(geometry: &Geometry, params: &'a PlacementParams, detector: &'a D) -> Self {
        Self::with_anchor(geometry, PointAnchor::Interior, params, detector)
    }

    pub fn with_anchor(
        geometry: &Geometry,
        anchor: PointAnchor,
        params: &'a PlacementParams,
        detector: &'a D,
    ) -> Self {
        Self {
            params,
            detector,
            anchor: anchor_point(geometry, anchor),
            done: false,
        }
    }
}

impl<D: PlacementDetector + ?Sized> MarkerPlacement for PointPlacement<'_, D> {
    fn rewind(&mut self) {
        self.done = false;
    }

    fn get_point(&mut self, ignore_placement: bool) -> Option<MarkerPosition> {
        if self.done {
            return None;
        }
        self.done = true;
        let anchor = self.anchor?;
        let (position, _) = evaluate_candidate(
            self.params,
            self.detector,
            &[],
            anchor,
            0.0,
            ignore_placement,
        )?;
        debug!("[PP] marker at ({:.3}, {:.3})", position.x, position.y);
        Some(position)
    }
}

fn anchor_point(geometry: &Geometry, anchor: PointAnchor) -> Option<Point> {
    let point = match geometry {
        Geometry::Point(p) => *p,
        Geometry::LineString(l) => l.middle_point(),
        Geometry::Polygon(p) => polygon_anchor_point(p, anchor),
        Geometry::Multi(_) => multi_anchor_point(geometry, anchor)?,
    };
    match point.0.is_finite() && point.1.is_finite() {
        true => Some(point),
        false => {
            warn!("[PP] no finite anchor for the geometry: {point:?}");
            None
        }
    }
}

fn polygon_anchor_point(p: &Polygon, anchor: PointAnchor) -> Point {
    if p.area <= 0.0 {
        //flattened by a transformation, the centroid is undefined
        return p.bbox.centroid();
    }
    let centroid = p.centroid();
    match anchor {
        PointAnchor::Centroid => centroid,
        PointAnchor::Interior if p.collides_with(&centroid) => centroid,
        PointAnchor::Interior => match p.pole() {
            Ok(pole) => pole.center,
            Err(e) => {
                warn!("[PP] falling back to the centroid: {e}");
                centroid
            }
        },
    }
}

/// The parts as a whole: center of their combined bounding box.
/// For interior anchors, a center outside all polygon parts is replaced by the interior point of
/// the largest one.
fn multi_anchor_point(geometry: &Geometry, anchor: PointAnchor) -> Option<Point> {
    let center = geometry.bbox()?.centroid();
    let polygons = geometry
        .parts()
        .filter_map(|part| match part {
            Geometry::Polygon(p) => Some(p),
            _ => None,
        })
        .collect_vec();
    match anchor {
        PointAnchor::Centroid => Some(center),
        _ if polygons.is_empty() || polygons.iter().any(|p| p.collides_with(&center)) => {
            Some(center)
        }
        PointAnchor::Interior => polygons
            .into_iter()
            .max_by_key(|p| OrderedFloat(p.bbox.area()))
            .map(|p| polygon_anchor_point(p, PointAnchor::Interior)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::LabelCollisionDetector;
    use crate::geometry::Transformation;
    use crate::geometry::geo_traits::Transformable;
    use crate::geometry::primitives::{LineString, Rect};
    use crate::placement::Direction;
    use std::f64::consts::PI;

    fn detector() -> LabelCollisionDetector {
        LabelCollisionDetector::new(Rect::try_new(0.0, 0.0, 100.0, 100.0).unwrap())
    }

    fn params() -> PlacementParams {
        PlacementParams::new(Rect::try_new(-2.0, -2.0, 2.0, 2.0).unwrap())
    }

    fn u_shape() -> Geometry {
        Geometry::Polygon(
            Polygon::try_new(vec![
                Point(0.0, 0.0),
                Point(30.0, 0.0),
                Point(30.0, 30.0),
                Point(20.0, 30.0),
                Point(20.0, 10.0),
                Point(10.0, 10.0),
                Point(10.0, 30.0),
                Point(0.0, 30.0),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn single_marker_then_exhausted() {
        let (det, params) = (detector(), params());
        let geom = Geometry::Point(Point(50.0, 50.0));
        let mut pp = PointPlacement::new(&geom, &params, &det);
        assert_eq!(
            pp.get_point(false),
            Some(MarkerPosition {
                x: 50.0,
                y: 50.0,
                angle: 0.0
            })
        );
        assert_eq!(pp.get_point(false), None);
        assert_eq!(pp.get_point(false), None);

        pp.rewind();
        assert!(pp.get_point(false).is_some());
    }

    #[test]
    fn lines_use_their_middle_point() {
        let (det, params) = (detector(), params());
        let geom = Geometry::LineString(
            LineString::try_new(vec![Point(10.0, 10.0), Point(30.0, 10.0), Point(30.0, 50.0)])
                .unwrap(),
        );
        let pos = PointPlacement::new(&geom, &params, &det)
            .get_point(false)
            .unwrap();
        assert_eq!(pos.point(), Point(30.0, 20.0));
    }

    #[test]
    fn interior_anchor_stays_inside() {
        let (det, params) = (detector(), params());
        let geom = u_shape();
        let Geometry::Polygon(poly) = &geom else {
            unreachable!()
        };

        let centroid = PointPlacement::new(&geom, &params, &det)
            .get_point(false)
            .unwrap();
        assert!(!poly.collides_with(&centroid.point()));

        let interior = PointPlacement::interior(&geom, &params, &det)
            .get_point(false)
            .unwrap();
        assert!(poly.collides_with(&interior.point()));
    }

    #[test]
    fn direction_policy_applies_to_the_zero_angle() {
        let det = detector();
        let geom = Geometry::Point(Point(50.0, 50.0));

        let down = PlacementParams {
            direction: Direction::Down,
            ..params()
        };
        let pos = PointPlacement::new(&geom, &down, &det).get_point(false);
        assert_eq!(pos.map(|p| p.angle), Some(PI));

        let left_only = PlacementParams {
            direction: Direction::LeftOnly,
            ..params()
        };
        let mut pp = PointPlacement::new(&geom, &left_only, &det);
        assert_eq!(pp.get_point(false), None);
        //the filter also applies when placement is ignored
        pp.rewind();
        assert_eq!(pp.get_point(true), None);
    }

    #[test]
    fn edge_and_overlap_checks() {
        let mut det = detector();
        let near_edge = Geometry::Point(Point(1.0, 50.0));
        let avoid = PlacementParams {
            avoid_edges: true,
            ..params()
        };
        assert!(PointPlacement::new(&near_edge, &avoid, &det).get_point(false).is_none());
        assert!(PointPlacement::new(&near_edge, &avoid, &det).get_point(true).is_some());
        assert!(PointPlacement::new(&near_edge, &params(), &det).get_point(false).is_some());

        det.insert(Rect::try_new(48.0, 48.0, 52.0, 52.0).unwrap());
        let center = Geometry::Point(Point(50.0, 50.0));
        assert!(PointPlacement::new(&center, &params(), &det).get_point(false).is_none());
        assert!(PointPlacement::new(&center, &params(), &det).get_point(true).is_some());
        let overlap = PlacementParams {
            allow_overlap: true,
            ..params()
        };
        assert!(PointPlacement::new(&center, &overlap, &det).get_point(false).is_some());
    }

    #[test]
    fn flattened_polygons_get_a_finite_anchor() {
        let (det, params) = (detector(), params());
        let square = Geometry::Polygon(
            Polygon::try_new(vec![
                Point(20.0, 20.0),
                Point(40.0, 20.0),
                Point(40.0, 40.0),
                Point(20.0, 40.0),
            ])
            .unwrap(),
        );
        let flat = square.transform_clone(&Transformation::from_scale((0.0, 1.0)));
        for anchor in [PointAnchor::Centroid, PointAnchor::Interior] {
            let pos = PointPlacement::with_anchor(&flat, anchor, &params, &det)
                .get_point(false)
                .unwrap();
            assert_eq!(pos.point(), Point(0.0, 30.0));
        }
    }

    #[test]
    fn interior_anchor_of_separated_parts() {
        let (det, params) = (detector(), params());
        let square = |x: f64, y: f64| {
            Geometry::Polygon(
                Polygon::try_new(vec![
                    Point(x, y),
                    Point(x + 10.0, y),
                    Point(x + 10.0, y + 10.0),
                    Point(x, y + 10.0),
                ])
                .unwrap(),
            )
        };
        let multi = Geometry::Multi(vec![square(0.0, 0.0), square(60.0, 60.0)]);

        let center = PointPlacement::new(&multi, &params, &det).get_point(false).unwrap();
        assert_eq!(center.point(), Point(35.0, 35.0));

        let interior = PointPlacement::interior(&multi, &params, &det)
            .get_point(false)
            .unwrap();
        let inside_a_part = multi.parts().any(|part| match part {
            Geometry::Polygon(p) => p.collides_with(&interior.point()),
            _ => false,
        });
        assert!(inside_a_part);
    }
}
