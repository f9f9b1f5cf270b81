use crate::History;
use std::cell::{Cell, RefCell};

/// In-memory session history with browser-like fragment semantics.
///
/// Every change of the current fragment (push, replace, back, forward) queues
/// one location-change notification, the way a browser queues `hashchange`;
/// setting the fragment it already has queues nothing. Drivers drain the queue
/// with [`MemoryHistory::take_change`].
#[derive(Debug)]
pub struct MemoryHistory {
    entries: RefCell<Vec<String>>,
    index: Cell<usize>,
    pending: Cell<usize>,
    scrolls: Cell<usize>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::with_fragment("")
    }

    /// Start at `fragment`, as if the page had been opened with that URL.
    #[must_use]
    pub fn with_fragment(fragment: &str) -> Self {
        Self {
            entries: RefCell::new(vec![fragment.to_string()]),
            index: Cell::new(0),
            pending: Cell::new(0),
            scrolls: Cell::new(0),
        }
    }

    /// Consume one pending location-change notification.
    pub fn take_change(&self) -> bool {
        let pending = self.pending.get();
        if pending == 0 {
            return false;
        }
        self.pending.set(pending - 1);
        true
    }

    /// Step back one entry, like the browser back button.
    pub fn back(&self) -> bool {
        let index = self.index.get();
        if index == 0 {
            return false;
        }
        self.move_to(index - 1);
        true
    }

    pub fn forward(&self) -> bool {
        let index = self.index.get();
        if index + 1 >= self.entries.borrow().len() {
            return false;
        }
        self.move_to(index + 1);
        true
    }

    /// Number of entries in the session history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    #[must_use]
    pub fn scroll_count(&self) -> usize {
        self.scrolls.get()
    }

    fn move_to(&self, index: usize) {
        let changed = {
            let entries = self.entries.borrow();
            entries[index] != entries[self.index.get()]
        };
        self.index.set(index);
        if changed {
            self.queue_change();
        }
    }

    fn queue_change(&self) {
        self.pending.set(self.pending.get() + 1);
    }
}

impl History for MemoryHistory {
    fn fragment(&self) -> String {
        self.entries.borrow()[self.index.get()].clone()
    }

    fn push(&self, fragment: &str) {
        if self.fragment() == fragment {
            return;
        }
        let index = self.index.get();
        {
            let mut entries = self.entries.borrow_mut();
            entries.truncate(index + 1);
            entries.push(fragment.to_string());
        }
        self.index.set(index + 1);
        self.queue_change();
    }

    fn replace(&self, fragment: &str) {
        if self.fragment() == fragment {
            return;
        }
        self.entries.borrow_mut()[self.index.get()] = fragment.to_string();
        self.queue_change();
    }

    fn scroll_to_top(&self) {
        self.scrolls.set(self.scrolls.get() + 1);
    }
}
