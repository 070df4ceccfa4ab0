#[cfg(test)]
mod tests {
    use std::path::Path;

    use itertools::Itertools;
    use test_case::test_case;

    use marker_placement::collision::{LabelCollisionDetector, PlacementDetector};
    use marker_placement::geometry::Geometry;
    use marker_placement::geometry::primitives::{LineString, Point, Rect};
    use marker_placement::placement::{MarkerPlacementKind, MultiPolicy, PlacementParams};
    use marker_render::config::{LayerDefaults, MarkerRenderConfig};
    use marker_render::io;
    use marker_render::io::export::export_layer;
    use marker_render::io::import::Importer;
    use marker_render::io::svg::scene_to_svg;
    use marker_render::io::{RenderOutput, ext_repr::ExtSymbolLayer};
    use marker_render::render::{Feature, Scene, SymbolLayer, render_layer, render_scene};

    const DEMO_SCENE: &str = "../assets/demo_scene.json";

    fn import(path: &str) -> Scene {
        let ext_scene = io::read_scene(Path::new(path)).unwrap();
        Importer::new(LayerDefaults::default())
            .import_scene(&ext_scene)
            .unwrap()
    }

    fn line_layer(ignore_placement: bool) -> SymbolLayer {
        SymbolLayer {
            name: "test".to_string(),
            kind: MarkerPlacementKind::Line,
            multi_policy: MultiPolicy::Each,
            ignore_placement,
            params: PlacementParams {
                spacing: 20.0,
                max_error: 0.0,
                ..PlacementParams::new(Rect::try_new(-2.0, -2.0, 2.0, 2.0).unwrap())
            },
        }
    }

    fn horizontal_line(id: u64, y: f64) -> Feature {
        Feature {
            id,
            geometry: Geometry::LineString(
                LineString::try_new(vec![Point(0.0, y), Point(100.0, y)]).unwrap(),
            ),
        }
    }

    #[test_case(DEMO_SCENE; "demo")]
    fn committed_markers_do_not_overlap(path: &str) {
        let scene = import(path);
        let placed = render_scene(&scene);
        assert_eq!(placed.len(), scene.layers.len());

        let committed = scene
            .layers
            .iter()
            .zip(&placed)
            .filter(|(layer, _)| !layer.ignore_placement && !layer.params.allow_overlap)
            .flat_map(|(_, markers)| markers.iter())
            .collect_vec();
        assert!(!committed.is_empty());
        for (a, b) in committed.iter().tuple_combinations() {
            if a.feature_id != b.feature_id {
                assert!(!a.bbox.overlaps(&b.bbox), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test_case(DEMO_SCENE; "demo")]
    fn edge_avoiding_layers_stay_on_the_canvas(path: &str) {
        let scene = import(path);
        let placed = render_scene(&scene);
        for (layer, markers) in scene.layers.iter().zip(&placed) {
            if !layer.params.avoid_edges {
                continue;
            }
            for m in markers {
                assert!(scene.canvas.x_min <= m.bbox.x_min && m.bbox.x_max <= scene.canvas.x_max);
                assert!(scene.canvas.y_min <= m.bbox.y_min && m.bbox.y_max <= scene.canvas.y_max);
            }
            let result = export_layer(layer, &scene.features, markers);
            //the point on the right edge of the canvas
            assert!(result.n_features_without_markers >= 1);
        }
    }

    #[test]
    fn rejected_features_leave_no_trace() {
        let canvas = Rect::try_new(0.0, 0.0, 100.0, 100.0).unwrap();
        let mut detector = LabelCollisionDetector::new(canvas);
        let blocker = Rect::try_new(-10.0, 40.0, 110.0, 60.0).unwrap();
        detector.insert(blocker);

        let features = [horizontal_line(1, 50.0), horizontal_line(2, 10.0)];
        let placed = render_layer(&features, &line_layer(false), &mut detector);

        assert!(placed.iter().all(|m| m.feature_id == 2));
        assert_eq!(placed.len(), 5);
        assert_eq!(detector.len(), 1 + placed.len());
        assert!(!detector.has_placement(&Rect::try_new(50.0, 8.0, 51.0, 12.0).unwrap()));
    }

    #[test]
    fn ignored_placement_is_not_committed() {
        let canvas = Rect::try_new(0.0, 0.0, 100.0, 100.0).unwrap();
        let mut detector = LabelCollisionDetector::new(canvas);
        let features = [horizontal_line(1, 50.0), horizontal_line(2, 50.0)];

        let placed = render_layer(&features, &line_layer(true), &mut detector);
        assert_eq!(placed.len(), 10);
        assert!(detector.is_empty());

        //the same features without ignoring placement: the second line is fully covered by the first
        let placed = render_layer(&features, &line_layer(false), &mut detector);
        assert_eq!(placed.len(), 5);
        assert_eq!(detector.len(), 5);
    }

    #[test]
    fn layer_json_uses_toolkit_names() {
        let json = r#"{"name": "x", "placement": "vertex-first", "multi_policy": "largest",
            "width": 1.0, "height": 1.0, "direction": "auto-down"}"#;
        let ext_layer: ExtSymbolLayer = serde_json::from_str(json).unwrap();
        let layer = Importer::new(LayerDefaults::default())
            .import_layer(&ext_layer)
            .unwrap();
        assert_eq!(layer.kind, MarkerPlacementKind::VertexFirst);
        assert_eq!(layer.multi_policy, MultiPolicy::Largest);
        assert_eq!(layer.params.direction.as_str(), "auto-down");
    }

    #[test]
    fn outputs_are_written() {
        let ext_scene = io::read_scene(Path::new(DEMO_SCENE)).unwrap();
        let config = MarkerRenderConfig::default();
        let scene = Importer::new(config.layer_defaults)
            .import_scene(&ext_scene)
            .unwrap();
        let placed = render_scene(&scene);

        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("markers.json");
        let svg_path = dir.path().join("markers.svg");

        let output = RenderOutput {
            results: scene
                .layers
                .iter()
                .zip(&placed)
                .map(|(layer, markers)| export_layer(layer, &scene.features, markers))
                .collect_vec(),
            scene: ext_scene,
            config,
        };
        io::write_json(&output, &json_path).unwrap();
        io::write_svg(&scene_to_svg(&scene, &placed, config.svg_draw_options), &svg_path).unwrap();

        let read_back: RenderOutput =
            serde_json::from_reader(std::fs::File::open(&json_path).unwrap()).unwrap();
        assert_eq!(read_back.results.len(), scene.layers.len());
        let n_markers = placed.iter().map(|m| m.len()).sum::<usize>();
        let n_read_back = read_back.results.iter().map(|r| r.markers.len()).sum::<usize>();
        assert_eq!(n_markers, n_read_back);

        let svg = std::fs::read_to_string(&svg_path).unwrap();
        assert!(svg.contains("viewBox"));
        assert_eq!(svg.matches("<title>marker,").count(), n_markers);
    }
}
