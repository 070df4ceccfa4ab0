use itertools::Itertools;
use log::{debug, info};
use marker_placement::collision::LabelCollisionDetector;
use marker_placement::geometry::Geometry;
use marker_placement::geometry::primitives::Rect;
use marker_placement::placement::{
    MarkerPlacement, MarkerPlacementFinder, MarkerPlacementKind, MarkerPosition, MultiPolicy,
    PlacementParams,
};

/// A map feature, with its geometry in canvas coordinates
#[derive(Clone, Debug)]
pub struct Feature {
    pub id: u64,
    pub geometry: Geometry,
}

/// A marker symbol together with the rules to place it on features
#[derive(Clone, Debug)]
pub struct SymbolLayer {
    pub name: String,
    pub kind: MarkerPlacementKind,
    pub multi_policy: MultiPolicy,
    /// Place every candidate without consulting or updating the detector
    pub ignore_placement: bool,
    pub params: PlacementParams,
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub canvas: Rect,
    pub features: Vec<Feature>,
    pub layers: Vec<SymbolLayer>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedMarker {
    pub feature_id: u64,
    pub position: MarkerPosition,
    /// Bounding box of the marker at its resolved rotation
    pub bbox: Rect,
}

/// Places the markers of `layer` on every feature, in order.
///
/// Every feature is placed in two passes over the same strategy: a dry run against the current state of the detector,
/// and after rewinding, a committing pass whose accepted boxes are inserted into the detector.
/// A feature that receives no marker in the dry run leaves the detector untouched.
pub fn render_layer(
    features: &[Feature],
    layer: &SymbolLayer,
    detector: &mut LabelCollisionDetector,
) -> Vec<PlacedMarker> {
    let mut placed = vec![];
    for feature in features {
        let positions = {
            let mut finder = MarkerPlacementFinder::new(
                layer.kind,
                layer.multi_policy,
                &feature.geometry,
                &layer.params,
                &*detector,
            );
            let dry_run = finder.collect_points(layer.ignore_placement);
            if dry_run.is_empty() {
                debug!("[RENDER] feature {}: no markers placed", feature.id);
                continue;
            }
            finder.rewind();
            let committed = finder.collect_points(layer.ignore_placement);
            debug_assert!(dry_run == committed, "rewind did not reproduce the dry run");
            committed
        };

        for position in positions {
            let bbox = layer
                .params
                .perform_transform(position.angle, position.x, position.y);
            if !layer.ignore_placement {
                detector.insert(bbox);
            }
            placed.push(PlacedMarker {
                feature_id: feature.id,
                position,
                bbox,
            });
        }
    }
    placed
}

/// Places all layers of the scene in order, sharing a single detector spanning the canvas.
pub fn render_scene(scene: &Scene) -> Vec<Vec<PlacedMarker>> {
    let mut detector = LabelCollisionDetector::new(scene.canvas);
    scene
        .layers
        .iter()
        .map(|layer| {
            let placed = render_layer(&scene.features, layer, &mut detector);
            let n_features = placed.iter().map(|m| m.feature_id).unique().count();
            info!(
                "[RENDER] layer {:?}: {} marker(s) on {}/{} feature(s)",
                layer.name,
                placed.len(),
                n_features,
                scene.features.len()
            );
            placed
        })
        .collect()
}
