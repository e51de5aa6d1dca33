use anyhow::Result;
use std::collections::VecDeque;
use tracing::{error, info};

use crate::data::data_view::DataView;
use crate::data::datatable::DataRow;
use crate::state::events::{Action, StateEvent};

/// The only message a failed load ever shows
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load data";

const MAX_EVENT_HISTORY: usize = 100;

/// Everything the renderer needs: the view plus the load status.
///
/// Every mutation bumps `generation` and records a [`StateEvent`], so a single
/// consumer can notice changes by comparing generations.
#[derive(Debug, Clone)]
pub struct AppState {
    view: DataView,
    loading: bool,
    error: Option<String>,
    sort_on_load: bool,
    generation: u64,
    event_history: VecDeque<StateEvent>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DataView::new())
    }
}

impl AppState {
    pub fn new(view: DataView) -> Self {
        Self {
            view,
            loading: false,
            error: None,
            sort_on_load: false,
            generation: 0,
            event_history: VecDeque::with_capacity(MAX_EVENT_HISTORY),
        }
    }

    /// Sort the dataset by the default column as soon as it arrives
    pub fn with_sort_on_load(mut self, sort_on_load: bool) -> Self {
        self.sort_on_load = sort_on_load;
        self
    }

    fn record(&mut self, event: StateEvent) -> StateEvent {
        self.generation += 1;
        if self.event_history.len() >= MAX_EVENT_HISTORY {
            self.event_history.pop_front();
        }
        self.event_history.push_back(event.clone());
        event
    }

    /// Raise the loading flag for the one load of this session
    pub fn begin_load(&mut self, source: &str) -> StateEvent {
        self.loading = true;
        self.error = None;
        self.record(StateEvent::LoadStarted {
            source: source.to_string(),
        })
    }

    /// Settle the load. Any error collapses into [`LOAD_ERROR_MESSAGE`]; the cause
    /// is only logged and the dataset stays as it was.
    pub fn finish_load(&mut self, result: Result<Vec<DataRow>>) -> StateEvent {
        self.loading = false;
        match result {
            Ok(rows) => {
                self.error = None;
                self.view.set_rows(rows);
                if self.sort_on_load {
                    self.view.sort_by_default();
                }
                let event = StateEvent::DataLoaded {
                    rows: self.view.row_count(),
                    columns: self.view.column_names().len(),
                };
                info!(target: "AppState", "Dataset loaded: {:?}", event);
                self.record(event)
            }
            Err(e) => {
                error!(target: "AppState", "Data fetch failed: {:#}", e);
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
                self.record(StateEvent::LoadFailed {
                    message: LOAD_ERROR_MESSAGE.to_string(),
                })
            }
        }
    }

    pub fn sort(&mut self, column: &str) -> StateEvent {
        let sort = self.view.sort(column).clone();
        self.record(StateEvent::Sorted { sort })
    }

    pub fn toggle_pin(&mut self, column: &str) -> StateEvent {
        let pinned = self.view.toggle_pin(column);
        self.record(StateEvent::PinToggled {
            column: column.to_string(),
            pinned,
        })
    }

    pub fn apply(&mut self, action: &Action) -> StateEvent {
        match action {
            Action::Sort(column) => self.sort(column),
            Action::TogglePin(column) => self.toggle_pin(column),
        }
    }

    pub fn view(&self) -> &DataView {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Monotonic change counter
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_event(&self) -> Option<&StateEvent> {
        self.event_history.back()
    }

    pub fn event_history(&self) -> impl Iterator<Item = &StateEvent> {
        self.event_history.iter()
    }
}
