mod direction;
mod finder;
mod line;
mod params;
mod point;
mod strategy;
mod vertex;

#[doc(inline)]
pub use direction::{Direction, normalize_angle};
#[doc(inline)]
pub use finder::{MarkerPlacementFinder, MarkerPlacementKind, MultiPolicy, create_strategy};
#[doc(inline)]
pub use line::LinePlacement;
#[doc(inline)]
pub use params::{DEFAULT_SPACING, PlacementParams};
#[doc(inline)]
pub use point::{PointAnchor, PointPlacement};
#[doc(inline)]
pub use strategy::{MarkerPlacement, MarkerPosition};
#[doc(inline)]
pub use vertex::{VertexEnd, VertexPlacement};
