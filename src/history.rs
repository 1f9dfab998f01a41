//! Linear undo/redo over full copies of editor state.
//!
//! The store holds a sequence of states and a cursor. [`HistoryStore::checkpoint`]
//! is called *before* an edit: it drops any redo branch and pushes a copy of
//! the current state, which the edit then mutates through
//! [`HistoryStore::current_mut`]. Undo and redo only move the cursor.

/// Undo/redo stack of state copies.
#[derive(Debug, Clone)]
pub struct HistoryStore<S> {
    store: Vec<S>,
    index: usize,
    limit: Option<usize>,
}

impl<S: Clone> HistoryStore<S> {
    /// Unbounded history starting at `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            store: vec![initial],
            index: 0,
            limit: None,
        }
    }

    /// History holding at most `limit` states (at least 2), evicting the oldest.
    ///
    /// With a limit of N, at most N - 1 edits can be undone.
    pub fn with_limit(initial: S, limit: usize) -> Self {
        Self {
            limit: Some(limit.max(2)),
            ..Self::new(initial)
        }
    }

    /// Records the current state so the next edit can be undone.
    pub fn checkpoint(&mut self) {
        self.store.truncate(self.index + 1);
        let copy = self.store[self.index].clone();
        self.store.push(copy);
        self.index += 1;

        if let Some(limit) = self.limit {
            if self.store.len() > limit {
                let excess = self.store.len() - limit;
                self.store.drain(..excess);
                self.index -= excess;
            }
        }
        log::debug!("checkpoint: {} of {}", self.index, self.store.len());
    }

    /// The visible state.
    pub fn current(&self) -> &S {
        &self.store[self.index]
    }

    /// The visible state, for the edit in progress to write into.
    pub fn current_mut(&mut self) -> &mut S {
        &mut self.store[self.index]
    }

    /// Steps back one state. Returns false, changing nothing, at the oldest state.
    pub fn undo(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Steps forward one state. Returns false, changing nothing, at the newest state.
    pub fn redo(&mut self) -> bool {
        if self.index + 1 < self.store.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// True when [`undo`](Self::undo) would move.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// True when [`redo`](Self::redo) would move.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.store.len()
    }

    /// Number of stored states.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Always false; a history holds at least its initial state.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Position of the visible state.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Configured depth cap.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_single_entry() {
        let h = HistoryStore::new(vec![0u32; 4]);
        assert_eq!(h.len(), 1);
        assert_eq!(h.index(), 0);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn checkpoint_then_undo_restores_previous() {
        let mut h = HistoryStore::new(vec![0u32; 4]);
        h.checkpoint();
        h.current_mut()[2] = 5;
        assert!(h.undo());
        assert_eq!(h.current(), &vec![0; 4]);
    }

    #[test]
    fn redo_reapplies_edit() {
        let mut h = HistoryStore::new(vec![0u32; 4]);
        h.checkpoint();
        h.current_mut()[0] = 1;
        let edited = h.current().clone();
        h.undo();
        assert!(h.redo());
        assert_eq!(h.current(), &edited);
    }

    #[test]
    fn boundaries_are_no_ops() {
        let mut h = HistoryStore::new(1u8);
        assert!(!h.undo());
        assert!(!h.redo());
        assert_eq!(*h.current(), 1);

        h.checkpoint();
        *h.current_mut() = 2;
        assert!(!h.redo());
        assert_eq!(*h.current(), 2);
    }

    #[test]
    fn new_edit_after_undo_prunes_redo_branch() {
        let mut h = HistoryStore::new(0u8);
        h.checkpoint();
        *h.current_mut() = 1;
        h.undo();
        h.checkpoint();
        *h.current_mut() = 2;

        assert!(!h.redo());
        assert_eq!(*h.current(), 2);
        assert_eq!(h.len(), 2);
        h.undo();
        assert_eq!(*h.current(), 0);
    }

    #[test]
    fn limit_evicts_oldest() {
        let mut h = HistoryStore::with_limit(0u8, 3);
        for v in 1..=5 {
            h.checkpoint();
            *h.current_mut() = v;
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.index(), 2);
        assert!(h.undo());
        assert!(h.undo());
        assert!(!h.undo());
        assert_eq!(*h.current(), 3);
    }

    #[test]
    fn limit_never_drops_below_two() {
        let h = HistoryStore::with_limit((), 0);
        assert_eq!(h.limit(), Some(2));
    }
}
