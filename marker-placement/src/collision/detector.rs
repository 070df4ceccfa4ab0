use log::trace;

use crate::geometry::primitives::Rect;

/// Read-only collision queries a placement strategy performs before accepting a candidate.
///
/// Strategies never record anything in the detector, committing accepted boxes is up to the caller.
pub trait PlacementDetector {
    /// Region in which markers are allowed when edges have to be avoided
    fn extent(&self) -> Rect;

    /// Returns `true` if `bbox` does not overlap any previously committed box
    fn has_placement(&self, bbox: &Rect) -> bool;
}

/// Detector keeping track of the bounding boxes of all committed markers within a fixed extent.
#[derive(Clone, Debug)]
pub struct LabelCollisionDetector {
    extent: Rect,
    boxes: Vec<Rect>,
}

impl LabelCollisionDetector {
    pub fn new(extent: Rect) -> Self {
        Self {
            extent,
            boxes: vec![],
        }
    }

    /// Commits `bbox`, subsequent overlapping candidates will be rejected
    pub fn insert(&mut self, bbox: Rect) {
        trace!("[DET] committed {bbox:?}");
        self.boxes.push(bbox);
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    pub fn boxes(&self) -> &[Rect] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl PlacementDetector for LabelCollisionDetector {
    fn extent(&self) -> Rect {
        self.extent
    }

    fn has_placement(&self, bbox: &Rect) -> bool {
        self.boxes.iter().all(|b| !b.overlaps(bbox))
    }
}
