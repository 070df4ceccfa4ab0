use std::collections::VecDeque;

use anyhow::{Result, anyhow};

use crate::geometry::geo_traits::{CollidesWith, DistanceTo, Shape};
use crate::geometry::primitives::{Point, Polygon, Rect};

/// Interior point of a polygon together with its distance to the polygon's boundary
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pole {
    pub center: Point,
    pub distance: f64,
}

/// Computes the *pole* of `shape`: the interior point which is furthest away from the boundary.
/// Closely related to [Pole of Inaccessibility (PoI)](https://en.wikipedia.org/wiki/Pole_of_inaccessibility),
/// and inspired by Mapbox's [`polylabel`](https://github.com/mapbox/polylabel) algorithm.
pub fn compute_pole(shape: &Polygon) -> Result<Pole> {
    let square_bbox = shape.bbox.inflate_to_square();
    let root = POINode::new(square_bbox, MAX_POI_TREE_DEPTH, shape);
    let mut queue = VecDeque::from([root]);
    let mut best: Option<Pole> = None;
    let distance = |pole: &Option<Pole>| pole.as_ref().map_or(0.0, |p| p.distance);

    while let Some(node) = queue.pop_front() {
        //check if better than current best
        if node.distance > distance(&best) {
            best = Some(Pole {
                center: node.bbox.centroid(),
                distance: node.distance,
            });
        }

        //see if worth it to split
        if node.distance_upperbound() > distance(&best)
            && let Some(children) = node.split(shape)
        {
            queue.extend(children);
        }
    }
    best.ok_or(anyhow!(
        "no pole found with {} levels of recursion. Please check the input shape: {:?}",
        MAX_POI_TREE_DEPTH,
        &shape.vertices
    ))
}

const MAX_POI_TREE_DEPTH: usize = 10;

struct POINode {
    pub level: usize,
    pub bbox: Rect,
    pub radius: f64,
    pub distance: f64,
}

impl POINode {
    fn new(bbox: Rect, level: usize, poly: &Polygon) -> Self {
        let radius = bbox.diameter() / 2.0;
        let center = bbox.centroid();

        let distance = {
            let distance_to_border = poly
                .edge_iter()
                .map(|e| e.distance_to(&center))
                .fold(f64::MAX, f64::min);

            //if the center is outside, distance is counted negative
            match poly.collides_with(&center) {
                true => distance_to_border,
                false => -distance_to_border,
            }
        };

        Self {
            level,
            bbox,
            radius,
            distance,
        }
    }

    fn split(&self, poly: &Polygon) -> Option<[POINode; 4]> {
        match self.level {
            0 => None,
            _ => Some(
                self.bbox
                    .quadrants()
                    .map(|qd| POINode::new(qd, self.level - 1, poly)),
            ),
        }
    }

    fn distance_upperbound(&self) -> f64 {
        self.radius + self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pole_of_a_u_shape_lies_inside() {
        // U-shape: the centroid falls in the gap between both arms
        let u = Polygon::try_new(vec![
            Point(0.0, 0.0),
            Point(30.0, 0.0),
            Point(30.0, 30.0),
            Point(20.0, 30.0),
            Point(20.0, 10.0),
            Point(10.0, 10.0),
            Point(10.0, 30.0),
            Point(0.0, 30.0),
        ])
        .unwrap();
        assert!(!u.collides_with(&u.centroid()));

        let pole = compute_pole(&u).unwrap();
        assert!(u.collides_with(&pole.center));
        assert!(pole.distance > 4.0);
    }

    #[test]
    fn pole_of_a_square_is_its_center() {
        let sq = Polygon::try_new(vec![
            Point(0.0, 0.0),
            Point(8.0, 0.0),
            Point(8.0, 8.0),
            Point(0.0, 8.0),
        ])
        .unwrap();
        let pole = compute_pole(&sq).unwrap();
        assert_eq!(pole.center, Point(4.0, 4.0));
        assert_eq!(pole.distance, 4.0);
    }
}
