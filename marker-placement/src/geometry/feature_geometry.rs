use crate::geometry::Transformation;
use crate::geometry::geo_traits::Transformable;
use crate::geometry::primitives::{LineString, Point, Polygon, Rect};

/// Geometry of a single map feature, already expressed in rendering space.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    /// Multiple parts, placed one after the other
    Multi(Vec<Geometry>),
}

impl Geometry {
    /// Bounding box of all parts, `None` for an empty [`Geometry::Multi`]
    pub fn bbox(&self) -> Option<Rect> {
        match self {
            Geometry::Point(p) => Some(Rect::from_point(*p)),
            Geometry::LineString(l) => Some(l.bbox()),
            Geometry::Polygon(p) => Some(p.bbox),
            Geometry::Multi(parts) => parts
                .iter()
                .filter_map(|g| g.bbox())
                .reduce(Rect::bounding_rect),
        }
    }

    /// Iterates over all single-part geometries, depth first
    pub fn parts(&self) -> Box<dyn Iterator<Item = &Geometry> + '_> {
        match self {
            Geometry::Multi(parts) => Box::new(parts.iter().flat_map(|g| g.parts())),
            single => Box::new(std::iter::once(single)),
        }
    }
}

impl Transformable for Geometry {
    fn transform(&mut self, t: &Transformation) -> &mut Self {
        match self {
            Geometry::Point(p) => {
                p.transform(t);
            }
            Geometry::LineString(l) => {
                l.transform(t);
            }
            Geometry::Polygon(p) => {
                p.transform(t);
            }
            Geometry::Multi(parts) => parts.iter_mut().for_each(|g| {
                g.transform(t);
            }),
        }
        self
    }
}
