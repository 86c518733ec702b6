//! Editor configuration and per-instance props.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::history::{DEFAULT_DEBOUNCE, DEFAULT_HISTORY_LIMIT};
use crate::runs::{self, StyledRun};
use crate::style::{Formatting, Style};

/// Engine settings shared by every editor a host creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of history snapshots.
    pub history_limit: usize,
    /// Quiet period before an edit is committed to history.
    pub debounce_ms: u64,
    /// Formatting reported where the text carries no style.
    pub default_formatting: Formatting,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            default_formatting: Formatting::default(),
        }
    }
}

impl EditorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Seed for one editor instance, as the host stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorProps {
    pub plain_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs: Option<Vec<StyledRun>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

impl EditorProps {
    pub fn from_plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            ..Default::default()
        }
    }

    /// Runs to render first: the stored runs with canonical styles, or the
    /// plain text as one unstyled run when none were stored.
    pub fn initial_runs(&self) -> Vec<StyledRun> {
        match &self.runs {
            Some(runs) if !runs.is_empty() => runs
                .iter()
                .map(|run| {
                    let style = run.style.clone().and_then(Style::normalized);
                    StyledRun::new(run.text.clone(), style)
                })
                .collect(),
            _ => runs::runs_from_plain(&self.plain_text),
        }
    }
}
