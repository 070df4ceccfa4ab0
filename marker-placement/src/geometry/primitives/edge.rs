use crate::geometry::geo_traits::DistanceTo;
use crate::geometry::primitives::Point;
use anyhow::Result;
use anyhow::ensure;

/// Line segment between two [`Point`]s
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

impl Edge {
    pub fn try_new(start: Point, end: Point) -> Result<Self> {
        ensure!(start != end, "degenerate edge, {start:?} == {end:?}");
        Ok(Edge { start, end })
    }

    /// Projection of `point` onto the edge, clamped to its endpoints
    pub fn closest_point_on_edge(&self, point: &Point) -> Point {
        let (dx, dy) = (self.end.0 - self.start.0, self.end.1 - self.start.1);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.start;
        }
        let t = ((point.0 - self.start.0) * dx + (point.1 - self.start.1) * dy) / len_sq;
        self.start.lerp(&self.end, t.clamp(0.0, 1.0))
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Direction of the edge in radians, measured counterclockwise from the positive x-axis
    pub fn angle(&self) -> f64 {
        self.start.angle_to(&self.end)
    }

    /// Point at distance `d` from the start, measured along the edge
    pub fn point_at(&self, d: f64) -> Point {
        self.start.lerp(&self.end, d / self.length())
    }
}

impl DistanceTo<Point> for Edge {
    #[inline(always)]
    fn distance_to(&self, point: &Point) -> f64 {
        self.sq_distance_to(point).sqrt()
    }

    #[inline(always)]
    fn sq_distance_to(&self, point: &Point) -> f64 {
        self.closest_point_on_edge(point).sq_distance_to(point)
    }
}
