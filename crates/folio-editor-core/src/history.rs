//! Snapshot-based undo/redo.
//!
//! Every committed `HistoryItem` is a full copy of the document: plain text,
//! runs and selection. Edits are not committed immediately; the editor
//! schedules a snapshot and a later edit inside the debounce window replaces
//! it. The deadline is plain data, so hosts drive it with whatever timer
//! they have by calling `tick`.

use std::time::Duration;

use web_time::Instant;

use crate::runs::StyledRun;
use crate::selection::Selection;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trait for managing undo/redo operations.
///
/// Implementations perform the undo/redo themselves, not just track state.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Perform undo. Returns true if successful.
    fn undo(&mut self) -> bool;

    /// Perform redo. Returns true if successful.
    fn redo(&mut self) -> bool;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// A document snapshot.
#[derive(Debug, Clone)]
pub struct HistoryItem {
    pub plain_text: String,
    pub runs: Vec<StyledRun>,
    pub selection: Option<Selection>,
    pub timestamp: Instant,
}

impl PartialEq for HistoryItem {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp is metadata, not part of the snapshot.
        self.plain_text == other.plain_text
            && self.runs == other.runs
            && self.selection == other.selection
    }
}

impl Eq for HistoryItem {}

impl HistoryItem {
    pub fn new(plain_text: String, runs: Vec<StyledRun>, selection: Option<Selection>) -> Self {
        Self::at(plain_text, runs, selection, Instant::now())
    }

    pub fn at(
        plain_text: String,
        runs: Vec<StyledRun>,
        selection: Option<Selection>,
        timestamp: Instant,
    ) -> Self {
        Self {
            plain_text,
            runs,
            selection,
            timestamp,
        }
    }

    /// Same document content, ignoring selection.
    pub fn same_content(&self, other: &HistoryItem) -> bool {
        self.plain_text == other.plain_text && self.runs == other.runs
    }
}

#[derive(Debug, Clone)]
struct Pending {
    item: HistoryItem,
    due: Instant,
}

/// Bounded list of snapshots with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    items: Vec<HistoryItem>,
    index: usize,
    limit: usize,
    debounce: Duration,
    pending: Option<Pending>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT, DEFAULT_DEBOUNCE)
    }
}

impl History {
    pub fn new(limit: usize, debounce: Duration) -> Self {
        Self {
            items: Vec::new(),
            index: 0,
            limit: limit.max(1),
            debounce,
            pending: None,
        }
    }

    /// Drop everything and start over from `item`.
    pub fn reset(&mut self, item: HistoryItem) {
        self.items = vec![item];
        self.index = 0;
        self.pending = None;
    }

    /// Schedule a snapshot, replacing any pending one and restarting the
    /// debounce window from `now`.
    pub fn schedule(&mut self, item: HistoryItem, now: Instant) {
        self.pending = Some(Pending {
            item,
            due: now + self.debounce,
        });
    }

    /// Commit the pending snapshot if its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = self.pending.as_ref().is_some_and(|pending| pending.due <= now);
        if due { self.flush() } else { false }
    }

    /// Commit the pending snapshot now, if there is one.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => self.push(pending.item),
            None => false,
        }
    }

    /// Append a snapshot at the cursor.
    ///
    /// Discards the redo tail. A snapshot whose content matches the current
    /// item only refreshes its selection. When the list grows past the limit
    /// the oldest item is evicted.
    pub fn push(&mut self, item: HistoryItem) -> bool {
        if !self.items.is_empty() {
            self.items.truncate(self.index + 1);
        }
        if let Some(current) = self.items.last_mut() {
            if current.same_content(&item) {
                current.selection = item.selection;
                return false;
            }
        }

        self.items.push(item);
        while self.items.len() > self.limit {
            self.items.remove(0);
        }
        self.index = self.items.len() - 1;
        tracing::debug!(target: "folio::history", index = self.index, len = self.items.len(), "commit snapshot");
        true
    }

    /// Store the live selection on the newest state: the pending snapshot
    /// if there is one, otherwise the current item.
    pub fn record_selection(&mut self, selection: Selection) {
        match self.pending.as_mut() {
            Some(pending) => pending.item.selection = Some(selection),
            None => {
                if let Some(current) = self.items.get_mut(self.index) {
                    current.selection = Some(selection);
                }
            }
        }
    }

    /// Step back. Commits a pending snapshot first so the latest edit can be
    /// redone. Returns the item to restore, or `None` at the oldest item.
    pub fn undo(&mut self) -> Option<&HistoryItem> {
        self.flush();
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.items.get(self.index)
    }

    /// Step forward. Returns the item to restore, or `None` at the newest.
    pub fn redo(&mut self) -> Option<&HistoryItem> {
        self.flush();
        if self.index + 1 >= self.items.len() {
            return None;
        }
        self.index += 1;
        self.items.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0 || self.pending.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.pending.is_none() && self.index + 1 < self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn current(&self) -> Option<&HistoryItem> {
        self.items.get(self.index)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending snapshot.
    pub fn pending_due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }
}
