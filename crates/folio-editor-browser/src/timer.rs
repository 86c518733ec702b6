//! History debounce driven by a browser timeout.
//!
//! The core history only commits a pending snapshot when `Editor::tick` is
//! called after the debounce deadline. `HistoryTimer` keeps one
//! `gloo_timers` timeout armed for the current deadline.

use std::cell::RefCell;

use gloo_timers::callback::Timeout;
use web_time::Instant;

use crate::events::SharedEditor;

pub struct HistoryTimer {
    editor: SharedEditor,
    timeout: RefCell<Option<Timeout>>,
}

impl HistoryTimer {
    pub fn new(editor: SharedEditor) -> Self {
        Self {
            editor,
            timeout: RefCell::new(None),
        }
    }

    /// Arm the timeout for the editor's pending deadline, replacing any
    /// earlier one. Cancels the timeout when nothing is pending.
    pub fn reschedule(&self) {
        let due = match self.editor.try_borrow() {
            Ok(editor) => editor.next_tick(),
            Err(_) => return,
        };

        // Dropping a gloo Timeout cancels it.
        let Some(due) = due else {
            self.timeout.borrow_mut().take();
            return;
        };

        let delay = due.saturating_duration_since(Instant::now()).as_millis();
        let delay = u32::try_from(delay).unwrap_or(u32::MAX);
        let editor = self.editor.clone();
        let timeout = Timeout::new(delay, move || {
            if let Ok(mut editor) = editor.try_borrow_mut() {
                let committed = editor.tick(Instant::now());
                tracing::trace!(target: "folio::history", committed, "debounce timer fired");
            }
        });
        *self.timeout.borrow_mut() = Some(timeout);
    }

    /// Whether a debounce timeout is waiting to fire.
    pub fn is_armed(&self) -> bool {
        self.timeout.borrow().is_some()
    }
}
