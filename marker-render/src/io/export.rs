use itertools::Itertools;
use marker_placement::geometry::primitives::Rect;

use crate::io::ext_repr::{ExtLayerResult, ExtMarker, ExtRect};
use crate::render::{Feature, PlacedMarker, SymbolLayer};

pub fn export_layer(
    layer: &SymbolLayer,
    features: &[Feature],
    placed: &[PlacedMarker],
) -> ExtLayerResult {
    let markers = placed.iter().map(export_marker).collect_vec();
    let n_features_without_markers = features
        .iter()
        .filter(|f| !placed.iter().any(|m| m.feature_id == f.id))
        .count();

    ExtLayerResult {
        name: layer.name.clone(),
        markers,
        n_features_without_markers,
    }
}

pub fn export_marker(marker: &PlacedMarker) -> ExtMarker {
    let p = &marker.position;
    ExtMarker {
        feature_id: marker.feature_id,
        x: p.x,
        y: p.y,
        angle: p.angle,
        bbox: export_rect(&marker.bbox),
    }
}

pub fn export_rect(rect: &Rect) -> ExtRect {
    ExtRect {
        x_min: rect.x_min,
        y_min: rect.y_min,
        x_max: rect.x_max,
        y_max: rect.y_max,
    }
}
