#[doc(inline)]
pub use feature_geometry::Geometry;
#[doc(inline)]
pub use pole::{Pole, compute_pole};
#[doc(inline)]
pub use transformation::Transformation;

mod feature_geometry;
mod pole;
mod transformation;

/// Enums to encode geometric relations and positions
pub mod geo_enums;
/// Set of traits representing various geometric properties & operations
pub mod geo_traits;
/// Set of geometric primitives
pub mod primitives;
