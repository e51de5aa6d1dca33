//! State events and user actions

use crate::data::data_view::SortState;

/// User intents that mutate the table state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Sort(String),
    TogglePin(String),
}

impl Action {
    /// Header click contract: a modified click pins, a plain click sorts.
    /// Exactly one action comes out of every click.
    pub fn from_header_click(column: &str, modified: bool) -> Self {
        if modified {
            Action::TogglePin(column.to_string())
        } else {
            Action::Sort(column.to_string())
        }
    }
}

/// Notifications emitted by every state change
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    /// Load started; loading flag raised
    LoadStarted { source: String },

    /// Dataset replaced by a successful load
    DataLoaded { rows: usize, columns: usize },

    /// Load settled with an error
    LoadFailed { message: String },

    /// Dataset reordered
    Sorted { sort: SortState },

    /// Pinned columns changed
    PinToggled { column: String, pinned: bool },
}
