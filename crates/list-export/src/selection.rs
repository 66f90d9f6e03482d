//! Selection semantics: explicit ids or every record matching the filter

use serde::{Deserialize, Serialize};

/// What the user's selection means for the export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionMode {
    /// Only the explicitly selected records
    Explicit { count: u64 },
    /// Every record matching the active filter
    FullSet { total: u64 },
}

impl SelectionMode {
    /// Decide the selection mode.
    ///
    /// An explicit `signal` from the host always wins. Without one, a
    /// selection that fills the whole page while more records match the
    /// filter is read as "select all". When the total equals the page size
    /// this fallback cannot tell the two apart and reports an explicit
    /// selection.
    pub fn detect(selected: u64, page_size: u64, total: u64, signal: Option<bool>) -> Self {
        let full_set = match signal {
            Some(explicit) => explicit,
            None => selected == page_size && page_size < total,
        };
        if full_set {
            SelectionMode::FullSet { total }
        } else {
            SelectionMode::Explicit { count: selected }
        }
    }

    pub fn is_full_set(&self) -> bool {
        matches!(self, SelectionMode::FullSet { .. })
    }

    /// Number of records the export will contain
    pub fn record_count(&self) -> u64 {
        match self {
            SelectionMode::Explicit { count } => *count,
            SelectionMode::FullSet { total } => *total,
        }
    }
}
