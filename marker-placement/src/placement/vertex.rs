use log::debug;

use crate::collision::PlacementDetector;
use crate::geometry::Geometry;
use crate::geometry::primitives::{LineString, Point};
use crate::placement::strategy::evaluate_candidate;
use crate::placement::{MarkerPlacement, MarkerPosition, PlacementParams};

/// End of the path a [`VertexPlacement`] puts its marker on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexEnd {
    First,
    Last,
}

/// Places a single marker on the first or last vertex, oriented along the adjacent segment.
pub struct VertexPlacement<'a, D: ?Sized> {
    params: &'a PlacementParams,
    detector: &'a D,
    candidate: Option<(Point, f64)>,
    done: bool,
}

impl<'a, D: PlacementDetector + ?Sized> VertexPlacement<'a, D> {
    pub fn new(
        geometry: &Geometry,
        end: VertexEnd,
        params: &'a PlacementParams,
        detector: &'a D,
    ) -> Self {
        Self {
            params,
            detector,
            candidate: vertex_candidate(geometry, end),
            done: false,
        }
    }

    pub fn first(geometry: &Geometry, params: &'a PlacementParams, detector: &'a D) -> Self {
        Self::new(geometry, VertexEnd::First, params, detector)
    }

    pub fn last(geometry: &Geometry, params: &'a PlacementParams, detector: &'a D) -> Self {
        Self::new(geometry, VertexEnd::Last, params, detector)
    }
}

impl<D: PlacementDetector + ?Sized> MarkerPlacement for VertexPlacement<'_, D> {
    fn rewind(&mut self) {
        self.done = false;
    }

    fn get_point(&mut self, ignore_placement: bool) -> Option<MarkerPosition> {
        if self.done {
            return None;
        }
        self.done = true;
        let (anchor, raw_angle) = self.candidate?;
        let (position, _) = evaluate_candidate(
            self.params,
            self.detector,
            &[],
            anchor,
            raw_angle,
            ignore_placement,
        )?;
        debug!(
            "[VP] marker at ({:.3}, {:.3}), angle {:.3}",
            position.x, position.y, position.angle
        );
        Some(position)
    }
}

fn vertex_candidate(geometry: &Geometry, end: VertexEnd) -> Option<(Point, f64)> {
    let on_path = |path: &LineString| match end {
        VertexEnd::First => (path.first(), path.first_angle().unwrap_or(0.0)),
        VertexEnd::Last => (path.last(), path.last_angle().unwrap_or(0.0)),
    };
    match geometry {
        Geometry::Point(p) => Some((*p, 0.0)),
        Geometry::LineString(l) => Some(on_path(l)),
        Geometry::Polygon(p) => Some(on_path(&p.exterior_ring())),
        Geometry::Multi(_) => match end {
            VertexEnd::First => geometry
                .parts()
                .find_map(|part| vertex_candidate(part, end)),
            VertexEnd::Last => geometry
                .parts()
                .filter_map(|part| vertex_candidate(part, end))
                .last(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::LabelCollisionDetector;
    use crate::geometry::primitives::Rect;
    use crate::util::FPA;
    use std::f64::consts::FRAC_PI_2;

    fn line() -> Geometry {
        Geometry::LineString(
            LineString::try_new(vec![
                Point(0.0, 0.0),
                Point(0.0, 0.0),
                Point(10.0, 0.0),
                Point(10.0, 10.0),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn first_and_last_vertex() {
        let det = LabelCollisionDetector::new(Rect::try_new(-50.0, -50.0, 50.0, 50.0).unwrap());
        let params = PlacementParams::default();
        let geom = line();

        let first = VertexPlacement::first(&geom, &params, &det)
            .get_point(false)
            .unwrap();
        assert_eq!((first.x, first.y, first.angle), (0.0, 0.0, 0.0));

        let mut vp = VertexPlacement::last(&geom, &params, &det);
        let last = vp.get_point(false).unwrap();
        assert_eq!(last.point(), Point(10.0, 10.0));
        assert!(FPA(last.angle) == FPA(FRAC_PI_2));
        assert!(vp.get_point(false).is_none());
    }

    #[test]
    fn multi_uses_the_outer_parts() {
        let det = LabelCollisionDetector::new(Rect::try_new(-50.0, -50.0, 50.0, 50.0).unwrap());
        let params = PlacementParams::default();
        let geom = Geometry::Multi(vec![Geometry::Point(Point(-5.0, -5.0)), line()]);

        let first = VertexPlacement::first(&geom, &params, &det).get_point(true);
        assert_eq!(first.map(|p| p.point()), Some(Point(-5.0, -5.0)));
        let last = VertexPlacement::last(&geom, &params, &det).get_point(true);
        assert_eq!(last.map(|p| p.point()), Some(Point(10.0, 10.0)));
    }
}
