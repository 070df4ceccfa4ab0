use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use marker_placement::geometry::geo_traits::Transformable;
use marker_placement::geometry::primitives::{LineString, Point, Polygon, Rect};
use marker_placement::geometry::{Geometry, Transformation};
use marker_placement::placement::PlacementParams;

use crate::config::LayerDefaults;
use crate::io::ext_repr::{ExtFeature, ExtGeometry, ExtRect, ExtScene, ExtSymbolLayer, ExtTransform};
use crate::render::{Feature, Scene, SymbolLayer};

/// Converts external representations of scenes into internal ones.
#[derive(Clone, Debug, Copy)]
pub struct Importer {
    pub layer_defaults: LayerDefaults,
}

impl Importer {
    pub fn new(layer_defaults: LayerDefaults) -> Importer {
        Importer { layer_defaults }
    }

    pub fn import_scene(&self, ext_scene: &ExtScene) -> Result<Scene> {
        let canvas = import_rect(&ext_scene.canvas).context("invalid canvas")?;
        let view = ext_scene
            .view
            .as_ref()
            .map(import_transform)
            .transpose()
            .context("invalid view transform")?;

        let features = ext_scene
            .features
            .iter()
            .map(|ext_feature| {
                let mut feature = import_feature(ext_feature)?;
                if let Some(view) = &view {
                    feature.geometry.transform(view);
                }
                Ok(feature)
            })
            .collect::<Result<Vec<_>>>()?;

        let layers = ext_scene
            .layers
            .iter()
            .map(|ext_layer| {
                self.import_layer(ext_layer)
                    .with_context(|| format!("invalid symbol layer {:?}", ext_layer.name))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Scene {
            canvas,
            features,
            layers,
        })
    }

    pub fn import_layer(&self, ext_layer: &ExtSymbolLayer) -> Result<SymbolLayer> {
        let defaults = &self.layer_defaults;
        let (w, h) = (ext_layer.width, ext_layer.height);
        ensure!(
            w >= 0.0 && h >= 0.0,
            "marker size must not be negative: {w} x {h}"
        );
        let max_error = ext_layer.max_error.unwrap_or(defaults.max_error);
        ensure!(
            (0.0..=1.0).contains(&max_error),
            "max_error must lie within [0, 1]: {max_error}"
        );
        let spacing = ext_layer.spacing.unwrap_or(defaults.spacing);
        ensure!(spacing >= 0.0, "spacing must not be negative: {spacing}");

        let params = PlacementParams {
            size: Rect::try_new(-w / 2.0, -h / 2.0, w / 2.0, h / 2.0)?,
            transform: import_transform(&ext_layer.transform)?,
            spacing,
            max_error,
            allow_overlap: ext_layer.allow_overlap.unwrap_or(defaults.allow_overlap),
            avoid_edges: ext_layer.avoid_edges.unwrap_or(defaults.avoid_edges),
            direction: ext_layer.direction.unwrap_or(defaults.direction),
        };

        Ok(SymbolLayer {
            name: ext_layer.name.clone(),
            kind: ext_layer.placement,
            multi_policy: ext_layer.multi_policy.unwrap_or(defaults.multi_policy),
            ignore_placement: ext_layer.ignore_placement,
            params,
        })
    }
}

pub fn import_feature(ext_feature: &ExtFeature) -> Result<Feature> {
    let geometry = import_geometry(&ext_feature.geometry)
        .with_context(|| format!("invalid geometry for feature {}", ext_feature.id))?;
    Ok(Feature {
        id: ext_feature.id,
        geometry,
    })
}

pub fn import_geometry(ext_geometry: &ExtGeometry) -> Result<Geometry> {
    let points = |coords: &[(f64, f64)]| coords.iter().map(|&c| Point::from(c)).collect_vec();
    let geometry = match ext_geometry {
        ExtGeometry::Point(c) => Geometry::Point(Point::from(*c)),
        ExtGeometry::Line(coords) => Geometry::LineString(LineString::try_new(points(coords))?),
        ExtGeometry::Polygon(coords) => Geometry::Polygon(Polygon::try_new(points(coords))?),
        ExtGeometry::Multi(parts) => {
            Geometry::Multi(parts.iter().map(import_geometry).collect::<Result<_>>()?)
        }
    };
    Ok(geometry)
}

pub fn import_rect(ext_rect: &ExtRect) -> Result<Rect> {
    let ExtRect {
        x_min,
        y_min,
        x_max,
        y_max,
    } = *ext_rect;
    Rect::try_new(x_min, y_min, x_max, y_max)
}

/// Imports a transformation, rejecting singular ones: they would flatten geometries onto a line or a point
pub fn import_transform(ext_transform: &ExtTransform) -> Result<Transformation> {
    let transform = match ext_transform.matrix {
        Some(matrix) => Transformation::from_matrix(matrix)?,
        None => Transformation::from_scale(ext_transform.scale)
            .rotate(ext_transform.rotation.to_radians())
            .translate(ext_transform.translation),
    };
    let determinant = transform.determinant();
    ensure!(
        determinant.is_finite() && determinant != 0.0,
        "transformation is singular (determinant {determinant}): {ext_transform:?}"
    );
    Ok(transform)
}
