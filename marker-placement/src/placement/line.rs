use std::borrow::Cow;

use log::{debug, trace};

use crate::collision::PlacementDetector;
use crate::geometry::Geometry;
use crate::geometry::primitives::{LineString, Rect};
use crate::placement::strategy::evaluate_candidate;
use crate::placement::{
    DEFAULT_SPACING, MarkerPlacement, MarkerPosition, PlacementParams, PointPlacement,
};

/// Upper bound on the number of offsets tried around a single nominal position
const MAX_TOLERANCE_TRIES: usize = 255;

/// Places markers at regular intervals along the paths of a geometry.
///
/// The first marker of every path is centered at half the spacing, every following one a full spacing further.
/// When a candidate is rejected, positions up to `spacing * max_error` away from the nominal one are tried as well.
/// Geometries without any path of non-zero length get a single marker, as [`PointPlacement`] would place it.
pub struct LinePlacement<'a, D: ?Sized> {
    params: &'a PlacementParams,
    detector: &'a D,
    paths: Vec<Cow<'a, LineString>>,
    spacing: f64,
    fallback: Option<PointPlacement<'a, D>>,
    cursor: LineCursor,
}

/// Progress of a [`LinePlacement`] through its paths
#[derive(Clone, Debug)]
struct LineCursor {
    path_idx: usize,
    /// Next nominal arc length on the current path
    nominal: f64,
    /// Arc length of the last marker placed on the current path
    last_accepted: f64,
    /// Boxes of the markers returned during this pass
    emitted: Vec<Rect>,
}

impl LineCursor {
    fn new(spacing: f64) -> Self {
        Self {
            path_idx: 0,
            nominal: spacing / 2.0,
            last_accepted: f64::NEG_INFINITY,
            emitted: vec![],
        }
    }

    fn next_path(&mut self, spacing: f64) {
        self.path_idx += 1;
        self.nominal = spacing / 2.0;
        self.last_accepted = f64::NEG_INFINITY;
    }
}

impl<'a, D: PlacementDetector + ?Sized> LinePlacement<'a, D> {
    pub fn new(geometry: &'a Geometry, params: &'a PlacementParams, detector: &'a D) -> Self {
        let spacing = match params.spacing {
            s if s < 1.0 => DEFAULT_SPACING,
            s => s,
        };
        let paths: Vec<Cow<'a, LineString>> = geometry
            .parts()
            .filter_map(|part| match part {
                Geometry::LineString(l) => Some(Cow::Borrowed(l)),
                Geometry::Polygon(p) => Some(Cow::Owned(p.exterior_ring())),
                _ => None,
            })
            .filter(|l| !l.is_degenerate())
            .collect();

        let fallback = match paths.is_empty() {
            true => {
                debug!("[LP] no path of non-zero length, placing a single marker");
                Some(PointPlacement::new(geometry, params, detector))
            }
            false => None,
        };

        Self {
            params,
            detector,
            paths,
            spacing,
            fallback,
            cursor: LineCursor::new(spacing),
        }
    }

    /// Spacing actually used between consecutive markers
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    fn tolerance(&self) -> f64 {
        self.spacing * self.params.max_error
    }
}

impl<D: PlacementDetector + ?Sized> MarkerPlacement for LinePlacement<'_, D> {
    fn rewind(&mut self) {
        self.cursor = LineCursor::new(self.spacing);
        if let Some(fallback) = &mut self.fallback {
            fallback.rewind();
        }
    }

    fn get_point(&mut self, ignore_placement: bool) -> Option<MarkerPosition> {
        if let Some(fallback) = &mut self.fallback {
            return fallback.get_point(ignore_placement);
        }
        let tolerance = self.tolerance();
        let half_width = self.params.marker_width() / 2.0;

        while let Some(path) = self.paths.get(self.cursor.path_idx) {
            let length = path.length();
            while self.cursor.nominal - tolerance <= length {
                let nominal = self.cursor.nominal;
                self.cursor.nominal += self.spacing;

                for offset in ToleranceOffsets::new(tolerance) {
                    let s = nominal + offset;
                    if s <= self.cursor.last_accepted
                        || s - half_width < 0.0
                        || s + half_width > length
                    {
                        continue;
                    }
                    let Some((anchor, raw_angle)) = path.position_at(s) else {
                        continue;
                    };
                    if let Some((position, bbox)) = evaluate_candidate(
                        self.params,
                        self.detector,
                        &self.cursor.emitted,
                        anchor,
                        raw_angle,
                        ignore_placement,
                    ) {
                        trace!(
                            "[LP] path {}, s = {s:.3} (nominal {nominal:.3})",
                            self.cursor.path_idx
                        );
                        self.cursor.last_accepted = s;
                        self.cursor.emitted.push(bbox);
                        return Some(position);
                    }
                }
            }
            self.cursor.next_path(self.spacing);
        }
        None
    }
}

/// Offsets `0, +δ, −δ, +2δ, −2δ, …` up to `tolerance`, with `δ = max(1, tolerance / 100)`
#[derive(Clone, Debug)]
struct ToleranceOffsets {
    delta: f64,
    tolerance: f64,
    step: usize,
}

impl ToleranceOffsets {
    fn new(tolerance: f64) -> Self {
        Self {
            delta: f64::max(1.0, tolerance / 100.0),
            tolerance,
            step: 0,
        }
    }
}

impl Iterator for ToleranceOffsets {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.step >= MAX_TOLERANCE_TRIES {
            return None;
        }
        let k = self.step.div_ceil(2);
        let magnitude = k as f64 * self.delta;
        if magnitude > self.tolerance {
            return None;
        }
        let offset = match self.step % 2 {
            _ if k == 0 => 0.0,
            1 => magnitude,
            _ => -magnitude,
        };
        self.step += 1;
        Some(offset)
    }
}
