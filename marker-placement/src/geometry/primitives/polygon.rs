use anyhow::{Context, Result, bail};
use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::geometry::Transformation;
use crate::geometry::geo_traits::{CollidesWith, DistanceTo, Shape, Transformable};
use crate::geometry::primitives::{Edge, LineString, Point, Rect};
use crate::geometry::{Pole, compute_pole};

/// Polygon defined by its exterior ring, without holes.
/// The vertices are always stored in counterclockwise order and the ring is implicitly closed.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    /// Vertices of the exterior ring, without repeating the first one at the end
    pub vertices: Vec<Point>,
    /// Bounding box
    pub bbox: Rect,
    /// Area of its interior
    pub area: f64,
}

impl Polygon {
    pub fn try_new(mut points: Vec<Point>) -> Result<Self> {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            bail!("polygon must have at least 3 distinct vertices: {points:?}");
        }

        let area = match Polygon::calculate_area(&points) {
            0.0 => bail!("polygon has no area: {points:?}"),
            area if area < 0.0 => {
                //vertices should always be ordered counterclockwise (positive area)
                points.reverse();
                -area
            }
            area => area,
        };
        let bbox = Rect::from_points(points.iter().copied()).context("polygon has no vertices")?;

        Ok(Polygon {
            vertices: points,
            bbox,
            area,
        })
    }

    pub fn vertex(&self, i: usize) -> Point {
        self.vertices[i]
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Iterates over all edges of the closed ring with a non-zero length
    pub fn edge_iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices
            .iter()
            .circular_tuple_windows()
            .filter_map(|(p1, p2)| Edge::try_new(*p1, *p2).ok())
    }

    /// The exterior ring as an explicitly closed [`LineString`]
    pub fn exterior_ring(&self) -> LineString {
        let ring = self
            .vertices
            .iter()
            .chain(self.vertices.first())
            .copied()
            .collect_vec();
        LineString::try_new(ring).expect("polygon has at least 3 vertices")
    }

    /// [Pole of inaccessibility](https://en.wikipedia.org/wiki/Pole_of_inaccessibility) of the polygon
    pub fn pole(&self) -> Result<Pole> {
        compute_pole(self)
    }

    //https://en.wikipedia.org/wiki/Shoelace_formula
    //counterclockwise = positive area, clockwise = negative area
    pub fn calculate_area(points: &[Point]) -> f64 {
        let mut sigma = 0.0;
        for i in 0..points.len() {
            //next point
            let j = (i + 1) % points.len();

            let (x_i, y_i) = points[i].into();
            let (x_j, y_j) = points[j].into();

            sigma += (y_i + y_j) * (x_i - x_j)
        }

        0.5 * sigma
    }
}

impl Shape for Polygon {
    fn centroid(&self) -> Point {
        //based on: https://en.wikipedia.org/wiki/Centroid#Of_a_polygon
        let area = self.area;
        let mut c_x = 0.0;
        let mut c_y = 0.0;

        for (Point(x_i, y_i), Point(x_j, y_j)) in self.vertices.iter().circular_tuple_windows() {
            c_x += (x_i + x_j) * (x_i * y_j - x_j * y_i);
            c_y += (y_i + y_j) * (x_i * y_j - x_j * y_i);
        }

        c_x /= 6.0 * area;
        c_y /= 6.0 * area;

        (c_x, c_y).into()
    }

    fn area(&self) -> f64 {
        self.area
    }

    fn bbox(&self) -> Rect {
        self.bbox
    }

    fn diameter(&self) -> f64 {
        self.vertices
            .iter()
            .tuple_combinations()
            .map(|(p1, p2)| OrderedFloat(p1.sq_distance_to(p2)))
            .max()
            .map_or(0.0, |sq_d| sq_d.0.sqrt())
    }
}

impl Transformable for Polygon {
    fn transform(&mut self, t: &Transformation) -> &mut Self {
        //destructuring pattern to ensure that the code is updated when the struct changes
        let Polygon {
            vertices,
            bbox,
            area,
        } = self;

        vertices.iter_mut().for_each(|p| {
            p.transform(t);
        });

        let signed_area = Polygon::calculate_area(vertices);
        if signed_area < 0.0 {
            //mirroring transformations flip the orientation
            vertices.reverse();
        }
        *area = signed_area.abs();
        *bbox = Rect::from_points(vertices.iter().copied()).expect("polygon has vertices");

        self
    }
}

impl CollidesWith<Point> for Polygon {
    fn collides_with(&self, point: &Point) -> bool {
        //even-odd rule: https://wrfranklin.org/Research/Short_Notes/pnpoly.html
        if !self.bbox.collides_with(point) {
            return false;
        }
        let Point(p_x, p_y) = *point;
        let mut inside = false;
        for (Point(x_i, y_i), Point(x_j, y_j)) in self.vertices.iter().circular_tuple_windows() {
            if (*y_i > p_y) != (*y_j > p_y) && p_x < (x_j - x_i) * (p_y - y_i) / (y_j - y_i) + x_i
            {
                inside = !inside;
            }
        }
        inside
    }
}

impl DistanceTo<Point> for Polygon {
    fn distance_to(&self, point: &Point) -> f64 {
        self.sq_distance_to(point).sqrt()
    }

    fn sq_distance_to(&self, point: &Point) -> f64 {
        match self.collides_with(point) {
            true => 0.0,
            false => self
                .edge_iter()
                .map(|edge| OrderedFloat(edge.sq_distance_to(point)))
                .min()
                .map_or(0.0, |d| d.0),
        }
    }
}
