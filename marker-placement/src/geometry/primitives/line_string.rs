use anyhow::Result;
use anyhow::ensure;
use itertools::Itertools;

use crate::geometry::Transformation;
use crate::geometry::geo_traits::{DistanceTo, Transformable};
use crate::geometry::primitives::{Edge, Point, Rect};

/// Open polyline through a sequence of vertices, with arc-length lookups.
///
/// Consecutive duplicate vertices are allowed, they form zero-length segments which are skipped
/// whenever a position or a direction along the line is requested.
#[derive(Clone, Debug, PartialEq)]
pub struct LineString {
    vertices: Vec<Point>,
    /// Arc length from the first vertex up to each vertex
    offsets: Vec<f64>,
}

impl LineString {
    pub fn try_new(vertices: Vec<Point>) -> Result<Self> {
        ensure!(!vertices.is_empty(), "line string must have at least 1 vertex");
        let offsets = LineString::calculate_offsets(&vertices);
        Ok(LineString { vertices, offsets })
    }

    fn calculate_offsets(vertices: &[Point]) -> Vec<f64> {
        let mut offsets = Vec::with_capacity(vertices.len());
        let mut acc = 0.0;
        offsets.push(acc);
        for (p1, p2) in vertices.iter().tuple_windows() {
            acc += p1.distance_to(p2);
            offsets.push(acc);
        }
        offsets
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn first(&self) -> Point {
        self.vertices[0]
    }

    pub fn last(&self) -> Point {
        self.vertices[self.vertices.len() - 1]
    }

    /// Total arc length
    pub fn length(&self) -> f64 {
        self.offsets[self.offsets.len() - 1]
    }

    /// A single vertex, or only repeated vertices
    pub fn is_degenerate(&self) -> bool {
        self.length() == 0.0
    }

    /// Iterates over all segments of non-zero length
    pub fn edge_iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices
            .iter()
            .tuple_windows()
            .filter_map(|(p1, p2)| Edge::try_new(*p1, *p2).ok())
    }

    /// Returns the point at arc length `s` from the first vertex, together with the direction of the segment it lies on.
    /// Returns `None` if `s` lies outside of `[0, length]` or the line is degenerate.
    pub fn position_at(&self, s: f64) -> Option<(Point, f64)> {
        if self.is_degenerate() || !(0.0..=self.length()).contains(&s) {
            return None;
        }
        let n = self.vertices.len();
        //last vertex at or before `s`
        let mut j = self
            .offsets
            .partition_point(|&o| o <= s)
            .saturating_sub(1)
            .min(n - 2);
        //only possible at the very end of the line: walk back over trailing zero-length segments
        while j > 0 && self.offsets[j + 1] == self.offsets[j] {
            j -= 1;
        }
        let edge = Edge {
            start: self.vertices[j],
            end: self.vertices[j + 1],
        };
        let point = edge.point_at(s - self.offsets[j]);
        Some((point, edge.angle()))
    }

    /// Point halfway along the line, the first vertex if the line is degenerate
    pub fn middle_point(&self) -> Point {
        self.position_at(self.length() / 2.0)
            .map_or(self.first(), |(p, _)| p)
    }

    /// Direction of the first segment of non-zero length
    pub fn first_angle(&self) -> Option<f64> {
        self.edge_iter().next().map(|e| e.angle())
    }

    /// Direction of the last segment of non-zero length
    pub fn last_angle(&self) -> Option<f64> {
        self.edge_iter().last().map(|e| e.angle())
    }

    pub fn bbox(&self) -> Rect {
        Rect::from_points(self.vertices.iter().copied())
            .expect("line string has at least one vertex")
    }
}

impl Transformable for LineString {
    fn transform(&mut self, t: &Transformation) -> &mut Self {
        let LineString { vertices, offsets } = self;
        vertices.iter_mut().for_each(|p| {
            p.transform(t);
        });
        //lengths are not preserved by non-rigid transformations
        *offsets = LineString::calculate_offsets(vertices);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::FPA;
    use std::f64::consts::FRAC_PI_2;

    fn l_shape() -> LineString {
        LineString::try_new(vec![Point(0.0, 0.0), Point(10.0, 0.0), Point(10.0, 10.0)]).unwrap()
    }

    #[test]
    fn empty_line_string_is_rejected() {
        assert!(LineString::try_new(vec![]).is_err());
    }

    #[test]
    fn length_and_positions() {
        let line = l_shape();
        assert_eq!(line.length(), 20.0);

        let (p, angle) = line.position_at(5.0).unwrap();
        assert_eq!(p, Point(5.0, 0.0));
        assert_eq!(angle, 0.0);

        let (p, angle) = line.position_at(15.0).unwrap();
        assert!(FPA(p.0) == FPA(10.0) && FPA(p.1) == FPA(5.0));
        assert!(FPA(angle) == FPA(FRAC_PI_2));

        assert!(line.position_at(-0.1).is_none());
        assert!(line.position_at(20.1).is_none());
    }

    #[test]
    fn end_of_line_skips_trailing_duplicates() {
        let line = LineString::try_new(vec![
            Point(0.0, 0.0),
            Point(0.0, 0.0),
            Point(4.0, 0.0),
            Point(4.0, 0.0),
        ])
        .unwrap();
        let (p, angle) = line.position_at(4.0).unwrap();
        assert_eq!(p, Point(4.0, 0.0));
        assert_eq!(angle, 0.0);
        let (p, _) = line.position_at(0.0).unwrap();
        assert_eq!(p, Point(0.0, 0.0));
        assert_eq!(line.edge_iter().count(), 1);
    }

    #[test]
    fn degenerate_line_has_no_positions() {
        let line = LineString::try_new(vec![Point(3.0, 3.0), Point(3.0, 3.0)]).unwrap();
        assert!(line.is_degenerate());
        assert!(line.position_at(0.0).is_none());
        assert_eq!(line.middle_point(), Point(3.0, 3.0));
        assert!(line.first_angle().is_none());
    }

    #[test]
    fn scaling_updates_the_length() {
        let line = l_shape().transform_clone(&Transformation::from_scale((2.0, 2.0)));
        assert_eq!(line.length(), 40.0);
        assert_eq!(line.middle_point(), Point(20.0, 0.0));
    }
}
