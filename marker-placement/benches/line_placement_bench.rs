use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use itertools::Itertools;

use marker_placement::collision::LabelCollisionDetector;
use marker_placement::geometry::Geometry;
use marker_placement::geometry::primitives::{LineString, Point, Rect};
use marker_placement::placement::{LinePlacement, MarkerPlacement, PlacementParams};

criterion_main!(benches);
criterion_group!(benches, line_placement_bench, dry_run_commit_bench);

const SPACINGS: [f64; 4] = [5.0, 10.0, 25.0, 100.0];

/// Zigzag of `n` segments spanning a 1000 x 100 canvas
fn zigzag(n: usize) -> Geometry {
    let vertices = (0..=n)
        .map(|i| {
            let x = 1000.0 * i as f64 / n as f64;
            let y = if i % 2 == 0 { 10.0 } else { 90.0 };
            Point(x, y)
        })
        .collect_vec();
    Geometry::LineString(LineString::try_new(vertices).unwrap())
}

fn params(spacing: f64) -> PlacementParams {
    PlacementParams {
        spacing,
        max_error: 0.2,
        ..PlacementParams::new(Rect::try_new(-2.0, -2.0, 2.0, 2.0).unwrap())
    }
}

/// Drains a line placement for different spacings, without any committed markers
fn line_placement_bench(c: &mut Criterion) {
    let geometry = zigzag(200);
    let detector = LabelCollisionDetector::new(Rect::try_new(0.0, 0.0, 1000.0, 100.0).unwrap());

    let mut group = c.benchmark_group("line_placement");
    for spacing in SPACINGS {
        let params = params(spacing);
        group.bench_function(BenchmarkId::from_parameter(spacing), |b| {
            let mut lp = LinePlacement::new(&geometry, &params, &detector);
            b.iter(|| {
                lp.rewind();
                black_box(lp.collect_points(false))
            })
        });
    }
    group.finish();
}

/// Dry run followed by committing the accepted boxes, as a renderer does for every feature
fn dry_run_commit_bench(c: &mut Criterion) {
    let features = (0..10)
        .map(|i| {
            let y = 5.0 + 9.0 * i as f64;
            Geometry::LineString(
                LineString::try_new(vec![Point(0.0, y), Point(500.0, y + 5.0), Point(1000.0, y)])
                    .unwrap(),
            )
        })
        .collect_vec();
    let params = params(10.0);

    c.bench_function("dry_run_commit", |b| {
        b.iter(|| {
            let mut detector =
                LabelCollisionDetector::new(Rect::try_new(0.0, 0.0, 1000.0, 100.0).unwrap());
            for feature in &features {
                let boxes = {
                    let mut lp = LinePlacement::new(feature, &params, &detector);
                    let dry = lp.collect_points(false);
                    lp.rewind();
                    let committed = lp.collect_points(false);
                    debug_assert_eq!(dry, committed);
                    committed
                        .iter()
                        .map(|p| params.perform_transform(p.angle, p.x, p.y))
                        .collect_vec()
                };
                boxes.into_iter().for_each(|bbox| detector.insert(bbox));
            }
            black_box(detector.len())
        })
    });
}
