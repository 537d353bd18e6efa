use std::collections::VecDeque;

/// Default number of content positions kept for "go back".
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Undo stack of visited content indices.
///
/// Never empty: the bottom entry is the root (index 0) and cannot be popped.
/// When full, the oldest entry above the root is dropped to make room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationHistory {
    entries: VecDeque<usize>,
    capacity: usize,
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl NavigationHistory {
    /// A root-only history. Capacities below 2 are raised to 2.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut entries = VecDeque::with_capacity(capacity.max(2));
        entries.push_back(0);
        Self {
            entries,
            capacity: capacity.max(2),
        }
    }

    pub fn push(&mut self, index: usize) {
        if self.entries.len() == self.capacity {
            self.entries.remove(1);
        }
        self.entries.push_back(index);
    }

    /// Drops the current entry and returns the one below it.
    ///
    /// Returns `None` and leaves the stack untouched when only the root remains.
    pub fn pop(&mut self) -> Option<usize> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop_back();
        self.entries.back().copied()
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.entries.back().copied().unwrap_or(0)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.push_back(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_root() {
        let history = NavigationHistory::default();
        assert_eq!(history.depth(), 1);
        assert_eq!(history.current(), 0);
        assert!(!history.can_go_back());
    }

    #[test]
    fn root_cannot_be_popped() {
        let mut history = NavigationHistory::default();
        assert_eq!(history.pop(), None);
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn pop_returns_previous_entry() {
        let mut history = NavigationHistory::default();
        history.push(1);
        history.push(3);
        assert_eq!(history.pop(), Some(1));
        assert_eq!(history.pop(), Some(0));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn full_history_keeps_root_and_newest() {
        let mut history = NavigationHistory::with_capacity(3);
        history.push(1);
        history.push(2);
        history.push(3);
        assert_eq!(history.depth(), 3);
        assert_eq!(history.pop(), Some(2));
        assert_eq!(history.pop(), Some(0));
    }

    #[test]
    fn reset_returns_to_root_only() {
        let mut history = NavigationHistory::default();
        history.push(4);
        history.reset();
        assert_eq!(history, NavigationHistory::default());
    }
}
