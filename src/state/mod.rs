//! State management components
//!
//! `AppState` owns the dataset view and load status; `events` holds the user
//! actions that drive it and the notifications it emits.

pub mod app_state;
pub mod events;

pub use app_state::{AppState, LOAD_ERROR_MESSAGE};
pub use events::{Action, StateEvent};
