//! Connector routing: a smooth cubic spline through the resolved points.
//!
//! Attached ends leave (and enter) their card along the side's outward
//! normal. Floating ends aim a third of the way toward their neighbour.
//! Interior bends use Catmull-Rom tangents so the curve passes through
//! every bend without a kink. Hit testing and both painters consume this
//! one routing so what you see is what you can click.

use crate::geometry::clamp;
use crate::model::Side;
use kurbo::{BezPath, CubicBez, Point, Vec2};

/// Fraction of a segment's length used as the tangent length at an
/// attached end, clamped to [`MIN_NORMAL_REACH`, `MAX_NORMAL_REACH`].
const NORMAL_REACH_RATIO: f64 = 0.4;
const MIN_NORMAL_REACH: f64 = 16.0;
const MAX_NORMAL_REACH: f64 = 120.0;

fn normal_reach(a: Point, b: Point) -> f64 {
    clamp(a.distance(b) * NORMAL_REACH_RATIO, MIN_NORMAL_REACH, MAX_NORMAL_REACH)
}

/// Outgoing tangent (direction of travel, scaled) at `points[i]`.
fn tangent(points: &[Point], i: usize, source: Option<Side>, target: Option<Side>) -> Vec2 {
    let last = points.len() - 1;
    if i == 0 {
        match source {
            Some(side) => side.normal() * normal_reach(points[0], points[1]),
            None => (points[1] - points[0]) / 3.0,
        }
    } else if i == last {
        match target {
            Some(side) => -side.normal() * normal_reach(points[last - 1], points[last]),
            None => (points[last] - points[last - 1]) / 3.0,
        }
    } else {
        (points[i + 1] - points[i - 1]) / 6.0
    }
}

/// One cubic per consecutive pair of `points` (source, bends…, target).
///
/// `source` / `target` carry the card side for attached ends, `None` for
/// floating ones. Fewer than two points yields no segments.
pub fn route_segments(points: &[Point], source: Option<Side>, target: Option<Side>) -> Vec<CubicBez> {
    if points.len() < 2 {
        return Vec::new();
    }
    let tangents: Vec<Vec2> = (0..points.len())
        .map(|i| tangent(points, i, source, target))
        .collect();

    points
        .windows(2)
        .zip(tangents.windows(2))
        .map(|(p, t)| CubicBez::new(p[0], p[0] + t[0], p[1] - t[1], p[1]))
        .collect()
}

/// The routed connector as a single open path.
pub fn route_path(points: &[Point], source: Option<Side>, target: Option<Side>) -> BezPath {
    let mut path = BezPath::new();
    let segments = route_segments(points, source, target);
    if let Some(first) = segments.first() {
        path.move_to(first.p0);
        for seg in &segments {
            path.curve_to(seg.p1, seg.p2, seg.p3);
        }
    }
    path
}
