mod detector;

#[doc(inline)]
pub use detector::LabelCollisionDetector;
#[doc(inline)]
pub use detector::PlacementDetector;
