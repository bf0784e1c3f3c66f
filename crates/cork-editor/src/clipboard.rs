//! Copy, paste, and duplicate.
//!
//! A [`Fragment`] is a detached group of cards plus the connectors that run
//! between them. Instantiating it mints fresh ids and remaps the
//! connectors so the copy never links back into the originals.

use cork_core::Board;
use cork_core::id::ItemId;
use cork_core::model::{Card, Connector, Endpoint};
use cork_core::{Point, Vec2};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub cards: Vec<Card>,
    pub connectors: Vec<Connector>,
}

impl Fragment {
    /// Copy the cards named in `ids` (kept in z-order) and every connector
    /// whose two ends are both attached inside that set. `None` if no
    /// card matched.
    pub fn from_selection(board: &Board, ids: &[ItemId]) -> Option<Self> {
        let cards: Vec<Card> = board
            .cards()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect();
        if cards.is_empty() {
            return None;
        }
        let inside = |e: &Endpoint| e.card().is_some_and(|id| ids.contains(&id));
        let connectors = board
            .connectors()
            .iter()
            .filter(|conn| inside(&conn.source) && inside(&conn.target))
            .cloned()
            .collect();
        Some(Self { cards, connectors })
    }

    /// A copy with new ids, shifted by `offset`.
    pub fn instantiate(&self, offset: Vec2) -> Self {
        let mut remap: HashMap<ItemId, ItemId> = HashMap::new();
        let cards = self
            .cards
            .iter()
            .map(|card| {
                let id = ItemId::card();
                remap.insert(card.id, id);
                let mut copy = card.clone();
                copy.id = id;
                copy.x += offset.x;
                copy.y += offset.y;
                copy.is_placeholder = copy.text.trim().is_empty();
                copy
            })
            .collect();

        let rekey = |e: &Endpoint| match *e {
            Endpoint::Attached { card, anchor } => Endpoint::Attached {
                card: remap.get(&card).copied().unwrap_or(card),
                anchor,
            },
            Endpoint::Floating { at } => Endpoint::Floating { at: at + offset },
        };
        let connectors = self
            .connectors
            .iter()
            .map(|conn| Connector {
                id: ItemId::connector(),
                source: rekey(&conn.source),
                target: rekey(&conn.target),
                bends: conn.bends.iter().map(|b: &Point| *b + offset).collect(),
            })
            .collect();

        Self { cards, connectors }
    }

    /// Append everything to `board`. Returns the inserted card ids.
    pub fn insert_into(self, board: &mut Board) -> Vec<ItemId> {
        let mut ids = Vec::with_capacity(self.cards.len());
        for card in self.cards {
            let id = card.id;
            if board.insert_card(card) {
                ids.push(id);
            }
        }
        for conn in self.connectors {
            board.insert_connector(conn);
        }
        ids
    }
}

/// Holds the last copied fragment. Each paste re-stores what it pasted,
/// so repeated pastes step further away from the original.
#[derive(Debug, Default)]
pub struct Clipboard {
    stored: Option<Fragment>,
}

impl Clipboard {
    pub fn copy(&mut self, fragment: Fragment) {
        self.stored = Some(fragment);
    }

    /// A fresh instance of the stored fragment, shifted by `offset`.
    pub fn paste(&mut self, offset: Vec2) -> Option<Fragment> {
        let pasted = self.stored.as_ref()?.instantiate(offset);
        self.stored = Some(pasted.clone());
        Some(pasted)
    }
}
