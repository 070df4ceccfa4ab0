mod edge;
mod line_string;
mod point;
mod polygon;
mod rect;

#[doc(inline)]
pub use edge::Edge;
#[doc(inline)]
pub use line_string::LineString;
#[doc(inline)]
pub use point::Point;
#[doc(inline)]
pub use polygon::Polygon;
#[doc(inline)]
pub use rect::Rect;
