//! Snapshot-based undo/redo.
//!
//! Each entry is a full copy of the [`Board`]. Recording a snapshot clears
//! the redo stack; undo swaps the live board with the newest past entry
//! and keeps the displaced board for redo. A recorded step that turns out
//! to be a no-op can be withdrawn, which puts the redo stack back.

use cork_core::Board;

/// Linear undo history with a bounded past.
pub struct History {
    past: Vec<Board>,
    future: Vec<Board>,
    /// Maximum undo depth.
    max_depth: usize,
    /// What the newest `record` pushed out, until the next history change.
    displaced: Option<Displaced>,
}

struct Displaced {
    future: Vec<Board>,
    evicted: Option<Board>,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_depth,
            displaced: None,
        }
    }

    /// Push the pre-mutation state. Invalidates redo.
    pub fn record(&mut self, snapshot: Board) {
        self.past.push(snapshot);
        let evicted = (self.past.len() > self.max_depth).then(|| self.past.remove(0));
        self.displaced = Some(Displaced {
            future: std::mem::take(&mut self.future),
            evicted,
        });
        log::debug!("history: recorded ({} undo steps)", self.past.len());
    }

    /// Drop the newest entry if `board` ended up with the same content,
    /// i.e. the gesture that recorded it was a no-op. The redo stack and
    /// any step evicted by that record are restored.
    pub fn discard_if_unchanged(&mut self, board: &Board) -> bool {
        match self.past.last() {
            Some(last) if last.same_content(board) => {
                self.past.pop();
                if let Some(displaced) = self.displaced.take() {
                    self.future = displaced.future;
                    if let Some(oldest) = displaced.evicted {
                        self.past.insert(0, oldest);
                    }
                }
                log::debug!("history: discarded no-op step");
                true
            }
            _ => false,
        }
    }

    /// Restore the previous state. Returns `false` if nothing to undo.
    pub fn undo(&mut self, board: &mut Board) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        self.displaced = None;
        self.future.push(std::mem::replace(board, previous));
        log::debug!("history: undo ({} left)", self.past.len());
        true
    }

    /// Re-apply the next state. Returns `false` if nothing to redo.
    pub fn redo(&mut self, board: &mut Board) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        self.displaced = None;
        self.past.push(std::mem::replace(board, next));
        log::debug!("history: redo ({} left)", self.future.len());
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }
}
