use log::debug;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::collision::PlacementDetector;
use crate::geometry::Geometry;
use crate::placement::{
    LinePlacement, MarkerPlacement, MarkerPosition, PlacementParams, PointPlacement,
    VertexPlacement,
};

/// Where on a feature's geometry markers are placed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerPlacementKind {
    /// A single marker at the centroid
    #[default]
    Point,
    /// A single marker at a point guaranteed to lie inside polygons
    Interior,
    /// Markers spaced evenly along lines and polygon rings
    Line,
    /// A single marker on the first vertex
    VertexFirst,
    /// A single marker on the last vertex
    VertexLast,
}

/// How the parts of a [`Geometry::Multi`] are treated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MultiPolicy {
    /// Every part is placed on separately, in order
    #[default]
    Each,
    /// All parts are placed on as one geometry
    Whole,
    /// Only the part with the largest bounding box is placed on
    Largest,
}

/// Creates the strategy of `kind` for a single geometry
pub fn create_strategy<'a, D: PlacementDetector + ?Sized + 'a>(
    kind: MarkerPlacementKind,
    geometry: &'a Geometry,
    params: &'a PlacementParams,
    detector: &'a D,
) -> Box<dyn MarkerPlacement + 'a> {
    match kind {
        MarkerPlacementKind::Point => Box::new(PointPlacement::new(geometry, params, detector)),
        MarkerPlacementKind::Interior => {
            Box::new(PointPlacement::interior(geometry, params, detector))
        }
        MarkerPlacementKind::Line => Box::new(LinePlacement::new(geometry, params, detector)),
        MarkerPlacementKind::VertexFirst => {
            Box::new(VertexPlacement::first(geometry, params, detector))
        }
        MarkerPlacementKind::VertexLast => {
            Box::new(VertexPlacement::last(geometry, params, detector))
        }
    }
}

/// Places markers on a complete feature geometry by chaining one strategy per selected part.
pub struct MarkerPlacementFinder<'a> {
    strategies: Vec<Box<dyn MarkerPlacement + 'a>>,
    current: usize,
}

impl<'a> MarkerPlacementFinder<'a> {
    pub fn new<D: PlacementDetector + ?Sized + 'a>(
        kind: MarkerPlacementKind,
        multi_policy: MultiPolicy,
        geometry: &'a Geometry,
        params: &'a PlacementParams,
        detector: &'a D,
    ) -> Self {
        let parts: Vec<&'a Geometry> = match (geometry, multi_policy) {
            (Geometry::Multi(_), MultiPolicy::Each) => geometry.parts().collect(),
            (Geometry::Multi(_), MultiPolicy::Largest) => geometry
                .parts()
                .filter_map(|part| part.bbox().map(|bbox| (part, bbox.width() * bbox.height())))
                .max_by_key(|(_, area)| OrderedFloat(*area))
                .map(|(part, _)| part)
                .into_iter()
                .collect(),
            _ => vec![geometry],
        };
        debug!(
            "[MPF] {kind:?} placement over {} part(s) ({multi_policy:?})",
            parts.len()
        );

        let strategies = parts
            .into_iter()
            .map(|part| create_strategy(kind, part, params, detector))
            .collect();

        Self {
            strategies,
            current: 0,
        }
    }

    pub fn n_strategies(&self) -> usize {
        self.strategies.len()
    }
}

impl MarkerPlacement for MarkerPlacementFinder<'_> {
    fn rewind(&mut self) {
        self.strategies.iter_mut().for_each(|s| s.rewind());
        self.current = 0;
    }

    fn get_point(&mut self, ignore_placement: bool) -> Option<MarkerPosition> {
        while let Some(strategy) = self.strategies.get_mut(self.current) {
            if let Some(position) = strategy.get_point(ignore_placement) {
                return Some(position);
            }
            self.current += 1;
        }
        None
    }
}
