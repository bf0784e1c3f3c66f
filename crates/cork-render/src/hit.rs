//! Hit testing: world point → card, resize handle, or connector part.
//!
//! Cards are tested front-to-back (last drawn wins). Handle and curve
//! tolerances are given in screen pixels and divided by the zoom scale so
//! they stay the same on-screen size at every zoom level.

use cork_core::Board;
use cork_core::consts::*;
use cork_core::id::ItemId;
use cork_core::model::*;
use kurbo::{CubicBez, Line, ParamCurve, ParamCurveNearest, Point};

/// Find the topmost card containing `p` (edges inclusive).
pub fn hit_card(board: &Board, p: Point) -> Option<ItemId> {
    board
        .cards()
        .iter()
        .rev()
        .find(|card| card.contains(p))
        .map(|card| card.id)
}

/// Centre of a card's resize handle, inset from the bottom-right corner.
pub fn handle_center(card: &Card) -> Point {
    let inset = HANDLE_MARGIN + HANDLE_RADIUS;
    Point::new(card.x + card.width - inset, card.y + card.height - inset)
}

/// Whether `p` is on the resize handle of `card` at zoom `scale`.
pub fn hit_resize_handle(card: &Card, p: Point, scale: f64) -> bool {
    handle_center(card).distance(p) <= HANDLE_SIZE / scale
}

/// Which part of a connector was hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectorPart {
    Endpoint(ConnectorEnd),
    /// Index into the connector's bend list.
    Bend(usize),
    /// Index of the routed segment (between point `i` and `i + 1`).
    Segment(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorHit {
    pub id: ItemId,
    pub part: ConnectorPart,
}

/// Approximate distance from `p` to a cubic by measuring against the
/// polyline through `CURVE_SAMPLES + 1` evenly spaced samples.
pub fn distance_to_cubic(seg: &CubicBez, p: Point) -> f64 {
    let mut prev = seg.eval(0.0);
    let mut best = f64::INFINITY;
    for i in 1..=CURVE_SAMPLES {
        let next = seg.eval(i as f64 / CURVE_SAMPLES as f64);
        let d = Line::new(prev, next).nearest(p, 1e-6).distance_sq;
        best = best.min(d);
        prev = next;
    }
    best.sqrt()
}

/// Endpoint and bend handles of one connector. Endpoints win over bends.
fn classify_handles(points: &[Point], p: Point, radius: f64) -> Option<ConnectorPart> {
    let last = points.len().checked_sub(1)?;
    if points[0].distance(p) <= radius {
        return Some(ConnectorPart::Endpoint(ConnectorEnd::Source));
    }
    if points[last].distance(p) <= radius {
        return Some(ConnectorPart::Endpoint(ConnectorEnd::Target));
    }
    (1..last)
        .find(|&i| points[i].distance(p) <= radius)
        .map(|i| ConnectorPart::Bend(i - 1))
}

fn classify(board: &Board, conn: &Connector, p: Point, scale: f64, segments: bool) -> Option<ConnectorPart> {
    let points = board.connector_points(conn)?;
    if let Some(part) = classify_handles(&points, p, CONNECTOR_HANDLE_RADIUS / scale) {
        return Some(part);
    }
    if !segments {
        return None;
    }
    let threshold = CONNECTOR_HIT_THRESHOLD / scale;
    board
        .connector_segments(conn)
        .iter()
        .position(|seg| distance_to_cubic(seg, p) <= threshold)
        .map(ConnectorPart::Segment)
}

/// Topmost connector under `p`. Within a connector the precedence is
/// endpoint, then bend, then curve segment.
pub fn hit_connector(board: &Board, p: Point, scale: f64) -> Option<ConnectorHit> {
    let hit = board.connectors().iter().rev().find_map(|conn| {
        classify(board, conn, p, scale, true).map(|part| ConnectorHit { id: conn.id, part })
    });
    if let Some(ref h) = hit {
        log::trace!("connector hit {:?} {:?}", h.id, h.part);
    }
    hit
}

/// Endpoint or bend handle of one of the connectors in `among` under `p`.
/// Segments are ignored.
pub fn hit_connector_handle(board: &Board, p: Point, scale: f64, among: &[ItemId]) -> Option<ConnectorHit> {
    board
        .connectors()
        .iter()
        .rev()
        .filter(|conn| among.contains(&conn.id))
        .find_map(|conn| classify(board, conn, p, scale, false).map(|part| ConnectorHit { id: conn.id, part }))
}

/// Anchor on the edge of `card` nearest to `p`.
pub fn infer_anchor(card: &Card, p: Point) -> Anchor {
    let fx = (p.x - card.x) / card.width;
    let fy = (p.y - card.y) / card.height;
    let edges = [
        (Side::Left, (p.x - card.x).abs()),
        (Side::Right, (card.x + card.width - p.x).abs()),
        (Side::Top, (p.y - card.y).abs()),
        (Side::Bottom, (card.y + card.height - p.y).abs()),
    ];
    let mut side = Side::Left;
    let mut best = f64::INFINITY;
    for (candidate, dist) in edges {
        if dist < best {
            best = dist;
            side = candidate;
        }
    }
    match side {
        Side::Left => Anchor::new(0.0, fy, side),
        Side::Right => Anchor::new(1.0, fy, side),
        Side::Top => Anchor::new(fx, 0.0, side),
        Side::Bottom => Anchor::new(fx, 1.0, side),
    }
}
