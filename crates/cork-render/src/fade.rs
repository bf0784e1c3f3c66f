//! Resize-handle opacity animation.
//!
//! Each card's handle opacity eases exponentially toward 1 (active or
//! hovered) or 0 (otherwise). The host calls [`HandleFade::tick`] once per
//! animation frame and keeps scheduling frames only while it returns
//! `true`.

use cork_core::Board;
use cork_core::consts::{HANDLE_FADE_DAMPING, HANDLE_FADE_EPSILON};
use cork_core::id::ItemId;
use std::collections::HashMap;

/// One easing step from `current` toward `target`. Lands exactly on
/// `target` once within `HANDLE_FADE_EPSILON`.
pub fn step(current: f64, target: f64, damping: f64) -> f64 {
    let next = current + (target - current) * damping;
    if (next - target).abs() < HANDLE_FADE_EPSILON {
        target
    } else {
        next
    }
}

fn target_for(board: &Board, id: ItemId) -> f64 {
    let sel = board.selection();
    if sel.active == Some(id) || sel.hovered_card == Some(id) {
        1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct HandleFade {
    alpha: HashMap<ItemId, f64>,
    damping: f64,
}

impl Default for HandleFade {
    fn default() -> Self {
        Self::new(HANDLE_FADE_DAMPING)
    }
}

impl HandleFade {
    pub fn new(damping: f64) -> Self {
        Self {
            alpha: HashMap::new(),
            damping,
        }
    }

    /// Current opacity of a card's handle. Unknown cards are invisible.
    pub fn alpha(&self, id: ItemId) -> f64 {
        self.alpha.get(&id).copied().unwrap_or(0.0)
    }

    /// Advance every card one step. Cards seen for the first time start at
    /// their target; removed cards are forgotten. Returns whether any value
    /// moved, i.e. whether another frame is needed.
    pub fn tick(&mut self, board: &Board) -> bool {
        self.alpha.retain(|id, _| board.card(*id).is_some());

        let mut changed = false;
        for card in board.cards() {
            let target = target_for(board, card.id);
            let current = *self.alpha.entry(card.id).or_insert(target);
            let next = step(current, target, self.damping);
            if next != current {
                self.alpha.insert(card.id, next);
                changed = true;
            }
        }
        changed
    }

    /// Whether any handle is still away from its target.
    pub fn is_settled(&self, board: &Board) -> bool {
        board
            .cards()
            .iter()
            .all(|card| self.alpha.get(&card.id).is_none_or(|a| *a == target_for(board, card.id)))
    }

    /// Drop all animation state (unmount).
    pub fn clear(&mut self) {
        self.alpha.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cork_core::Point;

    #[test]
    fn step_approaches_and_snaps() {
        assert_eq!(step(0.0, 1.0, 0.2), 0.2);
        assert_eq!(step(0.995, 1.0, 0.2), 1.0);
        assert_eq!(step(1.0, 1.0, 0.2), 1.0);
        assert_eq!(step(0.004, 0.0, 0.2), 0.0);
    }

    #[test]
    fn step_is_monotonic() {
        let mut v = 0.0;
        let mut prev = v;
        for _ in 0..100 {
            v = step(v, 1.0, 0.2);
            assert!(v >= prev);
            prev = v;
        }
        assert_eq!(v, 1.0);
    }

    #[test]
    fn tick_runs_until_settled() {
        let mut board = Board::new();
        let a = board.add_card(Point::ORIGIN);
        let mut fade = HandleFade::default();
        // First sighting starts at target (0, not hovered).
        assert!(!fade.tick(&board));
        assert_eq!(fade.alpha(a), 0.0);

        board.set_hovered_card(Some(a));
        let mut frames = 0;
        while fade.tick(&board) {
            frames += 1;
            assert!(frames < 100, "fade never settles");
        }
        assert!(frames > 1);
        assert_eq!(fade.alpha(a), 1.0);
        assert!(fade.is_settled(&board));
    }

    #[test]
    fn removed_cards_are_forgotten() {
        let mut board = Board::new();
        let a = board.add_card(Point::ORIGIN);
        board.select_card(a);
        let mut fade = HandleFade::default();
        fade.tick(&board);
        assert_eq!(fade.alpha(a), 1.0);
        board.remove_cards(&[a]);
        fade.tick(&board);
        assert_eq!(fade.alpha(a), 0.0);
    }
}
