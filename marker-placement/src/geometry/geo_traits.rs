use crate::geometry::Transformation;
use crate::geometry::primitives::{Point, Rect};

/// Exact intersection test between `Self` and `T`, boundaries included.
pub trait CollidesWith<T> {
    fn collides_with(&self, other: &T) -> bool;
}

/// Intersection test between `Self` and `T` that tolerates floating point noise.
///
/// Shapes which are only separated by rounding errors are reported as colliding.
pub trait AlmostCollidesWith<T> {
    fn almost_collides_with(&self, other: &T) -> bool;
}

pub trait DistanceTo<T> {
    /// Shortest distance between `self` and `other`, 0 when they collide
    fn distance_to(&self, other: &T) -> f64;

    fn sq_distance_to(&self, other: &T) -> f64;
}

/// Geometry which can be mapped in place by an affine [`Transformation`].
pub trait Transformable: Clone {
    fn transform(&mut self, t: &Transformation) -> &mut Self;

    fn transform_clone(&self, t: &Transformation) -> Self {
        let mut clone = self.clone();
        clone.transform(t);
        clone
    }
}

/// Properties shared by closed shapes.
pub trait Shape {
    fn centroid(&self) -> Point;

    fn area(&self) -> f64;

    fn bbox(&self) -> Rect;

    /// Largest distance between any two points of the shape
    fn diameter(&self) -> f64;
}
