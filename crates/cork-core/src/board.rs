//! The board: the single authoritative store for cards, connectors,
//! viewport, and selection.
//!
//! Every mutation goes through a method here so the structural invariants
//! hold after each call: card sizes are clamped, ids are unique, and an
//! attached endpoint always names a card that exists. The board never
//! records history itself; callers snapshot it (a plain `clone`) before
//! mutating when the change should be undoable.

use crate::geometry::Viewport;
use crate::id::ItemId;
use crate::model::*;
use crate::route::route_segments;
use kurbo::{CubicBez, Point};
use serde::Serialize;

/// Which items are selected, active, being edited, or hovered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Primary card; drives the color toolbar.
    pub active: Option<ItemId>,
    /// Selected cards in the order they were selected.
    pub cards: Vec<ItemId>,
    pub connectors: Vec<ItemId>,
    /// Card whose text is being edited.
    pub editing: Option<ItemId>,
    pub hovered_card: Option<ItemId>,
    pub hovered_connector: Option<ItemId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.connectors.is_empty()
    }

    pub fn has_card(&self, id: ItemId) -> bool {
        self.cards.contains(&id)
    }

    pub fn has_connector(&self, id: ItemId) -> bool {
        self.connectors.contains(&id)
    }

    fn forget(&mut self, id: ItemId) {
        self.cards.retain(|c| *c != id);
        self.connectors.retain(|c| *c != id);
        for slot in [
            &mut self.active,
            &mut self.editing,
            &mut self.hovered_card,
            &mut self.hovered_connector,
        ] {
            if *slot == Some(id) {
                *slot = None;
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    cards: Vec<Card>,
    connectors: Vec<Connector>,
    viewport: Viewport,
    selection: Selection,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    /// Cards in z-order (last is topmost).
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Connectors in creation order (last is topmost).
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn card(&self, id: ItemId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn connector(&self, id: ItemId) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }

    fn card_mut(&mut self, id: ItemId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    fn connector_mut(&mut self, id: ItemId) -> Option<&mut Connector> {
        self.connectors.iter_mut().find(|c| c.id == id)
    }

    /// Whether the document content (cards, connectors, viewport) of two
    /// boards is identical. Selection and hover are ignored.
    pub fn same_content(&self, other: &Board) -> bool {
        self.cards == other.cards && self.connectors == other.connectors && self.viewport == other.viewport
    }

    // ─── Cards ───────────────────────────────────────────────────────────

    /// Append a blank default card with its top-left at `origin`.
    pub fn add_card(&mut self, origin: Point) -> ItemId {
        let card = Card::new(ItemId::card(), origin);
        let id = card.id;
        self.cards.push(card);
        log::trace!("add card {id} at {origin:?}");
        id
    }

    /// Append a fully built card. Rejected if its id is already taken.
    pub fn insert_card(&mut self, mut card: Card) -> bool {
        if self.card(card.id).is_some() || self.connector(card.id).is_some() {
            return false;
        }
        card.set_size(card.width, card.height);
        card.is_placeholder = card.text.trim().is_empty();
        self.cards.push(card);
        true
    }

    /// Apply `patch` to a card. Returns `false` if the card does not exist.
    pub fn update_card(&mut self, id: ItemId, patch: &CardPatch) -> bool {
        match self.card_mut(id) {
            Some(card) => {
                patch.apply(card);
                true
            }
            None => false,
        }
    }

    /// Move a card to the top of the z-order.
    pub fn bring_to_front(&mut self, id: ItemId) -> bool {
        let Some(index) = self.cards.iter().position(|c| c.id == id) else {
            return false;
        };
        if index + 1 != self.cards.len() {
            let card = self.cards.remove(index);
            self.cards.push(card);
        }
        true
    }

    /// Remove cards and every connector attached to any of them.
    /// Returns how many cards were removed.
    pub fn remove_cards(&mut self, ids: &[ItemId]) -> usize {
        let before = self.cards.len();
        self.cards.retain(|c| !ids.contains(&c.id));
        let removed = before - self.cards.len();
        if removed == 0 {
            return 0;
        }

        let orphaned: Vec<ItemId> = self
            .connectors
            .iter()
            .filter(|conn| ids.iter().any(|id| conn.touches(*id)))
            .map(|conn| conn.id)
            .collect();
        self.remove_connectors(&orphaned);

        for id in ids {
            self.selection.forget(*id);
        }
        self.resolve_active();
        removed
    }

    // ─── Connectors ──────────────────────────────────────────────────────

    fn endpoint_is_valid(&self, endpoint: &Endpoint) -> bool {
        match endpoint.card() {
            Some(card) => self.card(card).is_some(),
            None => true,
        }
    }

    /// Create a connector. `None` if an attached endpoint names a missing card.
    pub fn add_connector(&mut self, source: Endpoint, target: Endpoint) -> Option<ItemId> {
        let connector = Connector::new(ItemId::connector(), source, target);
        let id = connector.id;
        self.insert_connector(connector).then_some(id)
    }

    /// Append a fully built connector, validating ids and endpoints.
    pub fn insert_connector(&mut self, connector: Connector) -> bool {
        if self.connector(connector.id).is_some()
            || self.card(connector.id).is_some()
            || !self.endpoint_is_valid(&connector.source)
            || !self.endpoint_is_valid(&connector.target)
        {
            return false;
        }
        log::trace!("add connector {}", connector.id);
        self.connectors.push(connector);
        true
    }

    /// Replace one end of a connector. Rejects dangling attachments.
    pub fn update_connector_endpoint(&mut self, id: ItemId, end: ConnectorEnd, endpoint: Endpoint) -> bool {
        if !self.endpoint_is_valid(&endpoint) {
            return false;
        }
        match self.connector_mut(id) {
            Some(conn) => {
                *conn.endpoint_mut(end) = endpoint;
                true
            }
            None => false,
        }
    }

    /// Move bend `index` of a connector to `at`.
    pub fn set_bend(&mut self, id: ItemId, index: usize, at: Point) -> bool {
        match self.connector_mut(id).and_then(|c| c.bends.get_mut(index)) {
            Some(bend) => {
                *bend = at;
                true
            }
            None => false,
        }
    }

    /// Insert a bend before position `index` (`index == len` appends).
    pub fn insert_bend(&mut self, id: ItemId, index: usize, at: Point) -> bool {
        match self.connector_mut(id) {
            Some(conn) if index <= conn.bends.len() => {
                conn.bends.insert(index, at);
                true
            }
            _ => false,
        }
    }

    pub fn remove_bend(&mut self, id: ItemId, index: usize) -> bool {
        match self.connector_mut(id) {
            Some(conn) if index < conn.bends.len() => {
                conn.bends.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Replace the whole bend list of a connector.
    pub fn set_bends(&mut self, id: ItemId, bends: &[Point]) -> bool {
        match self.connector_mut(id) {
            Some(conn) => {
                conn.bends = bends.iter().copied().collect();
                true
            }
            None => false,
        }
    }

    /// Remove connectors by id. Returns how many were removed.
    pub fn remove_connectors(&mut self, ids: &[ItemId]) -> usize {
        let before = self.connectors.len();
        self.connectors.retain(|c| !ids.contains(&c.id));
        for id in ids {
            self.selection.forget(*id);
        }
        before - self.connectors.len()
    }

    // ─── Derived connector geometry ──────────────────────────────────────

    /// World position of an endpoint. `None` if its card is gone.
    pub fn resolve_endpoint(&self, endpoint: &Endpoint) -> Option<Point> {
        match endpoint {
            Endpoint::Attached { card, anchor } => self.card(*card).map(|c| c.anchor_point(anchor)),
            Endpoint::Floating { at } => Some(*at),
        }
    }

    /// Resolved point list: source, bends…, target.
    pub fn connector_points(&self, connector: &Connector) -> Option<Vec<Point>> {
        let source = self.resolve_endpoint(&connector.source)?;
        let target = self.resolve_endpoint(&connector.target)?;
        let mut points = Vec::with_capacity(connector.bends.len() + 2);
        points.push(source);
        points.extend(connector.bends.iter().copied());
        points.push(target);
        Some(points)
    }

    /// Routed cubic segments of a connector (one per consecutive point pair).
    pub fn connector_segments(&self, connector: &Connector) -> Vec<CubicBez> {
        match self.connector_points(connector) {
            Some(points) => route_segments(&points, connector.source.side(), connector.target.side()),
            None => Vec::new(),
        }
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Viewport::new(viewport.pan, viewport.scale);
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select exactly one card and make it active.
    pub fn select_card(&mut self, id: ItemId) {
        self.selection.cards = vec![id];
        self.selection.connectors.clear();
        self.selection.active = Some(id);
    }

    /// Add or remove a card from the selection (shift-click). Adding makes
    /// it active; removing the active card hands that role to the most
    /// recently selected remaining card.
    pub fn toggle_card(&mut self, id: ItemId) {
        if self.selection.has_card(id) {
            self.selection.cards.retain(|c| *c != id);
            self.resolve_active();
        } else {
            self.selection.cards.push(id);
            self.selection.active = Some(id);
        }
    }

    /// Select exactly one connector; clears the card selection.
    pub fn select_connector(&mut self, id: ItemId) {
        self.selection.cards.clear();
        self.selection.active = None;
        self.selection.connectors = vec![id];
    }

    /// Replace the whole selection. The last card becomes active.
    pub fn set_selection(&mut self, cards: Vec<ItemId>, connectors: Vec<ItemId>) {
        self.selection.active = cards.last().copied();
        self.selection.cards = cards;
        self.selection.connectors = connectors;
    }

    /// Clear selection and leave edit mode.
    pub fn clear_selection(&mut self) {
        self.selection.cards.clear();
        self.selection.connectors.clear();
        self.selection.active = None;
        self.selection.editing = None;
    }

    pub fn set_editing(&mut self, id: Option<ItemId>) {
        self.selection.editing = id.filter(|id| self.card(*id).is_some());
    }

    /// Hover a card; clears any hovered connector.
    pub fn set_hovered_card(&mut self, id: Option<ItemId>) {
        self.selection.hovered_card = id;
        if id.is_some() {
            self.selection.hovered_connector = None;
        }
    }

    /// Hover a connector; clears any hovered card.
    pub fn set_hovered_connector(&mut self, id: Option<ItemId>) {
        self.selection.hovered_connector = id;
        if id.is_some() {
            self.selection.hovered_card = None;
        }
    }

    pub fn clear_hover(&mut self) {
        self.selection.hovered_card = None;
        self.selection.hovered_connector = None;
    }

    fn resolve_active(&mut self) {
        let active_still_selected = self.selection.active.is_some_and(|a| self.selection.has_card(a));
        if !active_still_selected {
            self.selection.active = self.selection.cards.last().copied();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use kurbo::Vec2;
    use pretty_assertions::assert_eq;

    fn anchor(side: Side) -> Anchor {
        match side {
            Side::Left => Anchor::new(0.0, 0.5, side),
            Side::Right => Anchor::new(1.0, 0.5, side),
            Side::Top => Anchor::new(0.5, 0.0, side),
            Side::Bottom => Anchor::new(0.5, 1.0, side),
        }
    }

    fn two_linked() -> (Board, ItemId, ItemId, ItemId) {
        let mut board = Board::new();
        let a = board.add_card(Point::new(0.0, 0.0));
        let b = board.add_card(Point::new(500.0, 0.0));
        let link = board
            .add_connector(
                Endpoint::attached(a, anchor(Side::Right)),
                Endpoint::attached(b, anchor(Side::Left)),
            )
            .unwrap();
        (board, a, b, link)
    }

    #[test]
    fn add_card_uses_defaults() {
        let mut board = Board::new();
        let id = board.add_card(Point::new(10.0, 20.0));
        let card = board.card(id).unwrap();
        assert_eq!((card.width, card.height), (DEFAULT_CARD_WIDTH, DEFAULT_CARD_HEIGHT));
        assert_eq!(card.color.to_hex(), "#FFFFFF");
        assert_eq!(card.text_color.to_hex(), "#111827");
        assert!(card.is_placeholder);
    }

    #[test]
    fn update_card_clamps() {
        let mut board = Board::new();
        let id = board.add_card(Point::ORIGIN);
        assert!(board.update_card(id, &CardPatch::size(1.0, 9999.0)));
        let card = board.card(id).unwrap();
        assert_eq!((card.width, card.height), (MIN_CARD_WIDTH, MAX_CARD_HEIGHT));
        assert!(!board.update_card(ItemId::intern("nope"), &CardPatch::default()));
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut board = Board::new();
        let id = board.add_card(Point::ORIGIN);
        let dup = Card::new(id, Point::new(5.0, 5.0));
        assert!(!board.insert_card(dup));
        assert_eq!(board.cards().len(), 1);
    }

    #[test]
    fn add_connector_rejects_dangling_card() {
        let mut board = Board::new();
        let a = board.add_card(Point::ORIGIN);
        let ghost = ItemId::intern("ghost_card");
        let made = board.add_connector(
            Endpoint::attached(a, anchor(Side::Right)),
            Endpoint::attached(ghost, anchor(Side::Left)),
        );
        assert!(made.is_none());
        assert!(board.connectors().is_empty());
    }

    #[test]
    fn update_endpoint_rejects_dangling_card() {
        let (mut board, _, _, link) = two_linked();
        let before = board.clone();
        let ghost = ItemId::intern("ghost_card");
        assert!(!board.update_connector_endpoint(
            link,
            ConnectorEnd::Target,
            Endpoint::attached(ghost, anchor(Side::Top))
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn removing_card_removes_touching_connectors() {
        let (mut board, a, b, link) = two_linked();
        board.select_connector(link);
        assert_eq!(board.remove_cards(&[a]), 1);
        assert!(board.connector(link).is_none());
        assert!(board.selection().connectors.is_empty());
        assert!(board.card(b).is_some());
    }

    #[test]
    fn connector_points_track_card_geometry() {
        let (mut board, a, _, link) = two_linked();
        let conn = board.connector(link).unwrap().clone();
        let before = board.connector_points(&conn).unwrap();
        let card = board.card(a).unwrap().clone();
        board.update_card(a, &CardPatch::position(card.origin() + Vec2::new(50.0, 50.0)));
        let after = board.connector_points(&conn).unwrap();
        assert_eq!(after[0] - before[0], Vec2::new(50.0, 50.0));
        assert_eq!(after[1], before[1]);
    }

    #[test]
    fn bends_insert_move_remove() {
        let (mut board, _, _, link) = two_linked();
        assert!(board.insert_bend(link, 0, Point::new(400.0, 300.0)));
        assert!(board.insert_bend(link, 1, Point::new(450.0, 300.0)));
        assert!(!board.insert_bend(link, 5, Point::ORIGIN));
        assert!(board.set_bend(link, 0, Point::new(380.0, 320.0)));
        assert!(board.remove_bend(link, 1));
        assert!(!board.remove_bend(link, 1));
        let bends: Vec<Point> = board.connector(link).unwrap().bends.to_vec();
        assert_eq!(bends, vec![Point::new(380.0, 320.0)]);
        assert_eq!(board.connector_segments(board.connector(link).unwrap()).len(), 2);
    }

    #[test]
    fn bring_to_front_reorders() {
        let mut board = Board::new();
        let a = board.add_card(Point::ORIGIN);
        let b = board.add_card(Point::ORIGIN);
        assert!(board.bring_to_front(a));
        let order: Vec<ItemId> = board.cards().iter().map(|c| c.id).collect();
        assert_eq!(order, vec![b, a]);
    }

    #[test]
    fn toggle_resolves_active_to_last_selected() {
        let mut board = Board::new();
        let a = board.add_card(Point::ORIGIN);
        let b = board.add_card(Point::ORIGIN);
        let c = board.add_card(Point::ORIGIN);
        board.select_card(a);
        board.toggle_card(b);
        board.toggle_card(c);
        assert_eq!(board.selection().active, Some(c));
        board.toggle_card(c);
        assert_eq!(board.selection().active, Some(b));
        board.toggle_card(a);
        assert_eq!(board.selection().active, Some(b));
        board.toggle_card(b);
        assert_eq!(board.selection().active, None);
    }

    #[test]
    fn hover_is_exclusive() {
        let (mut board, a, _, link) = two_linked();
        board.set_hovered_card(Some(a));
        board.set_hovered_connector(Some(link));
        assert_eq!(board.selection().hovered_card, None);
        board.set_hovered_card(Some(a));
        assert_eq!(board.selection().hovered_connector, None);
    }

    #[test]
    fn viewport_scale_is_clamped() {
        let mut board = Board::new();
        board.set_viewport(Viewport { pan: Vec2::ZERO, scale: 40.0 });
        assert_eq!(board.viewport().scale, MAX_SCALE);
    }
}
