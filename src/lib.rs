pub mod api_client;
pub mod config;
pub mod data;
pub mod help_text;
pub mod services;
pub mod state;
pub mod table_display;
pub mod tui_app;
pub mod ui;
pub mod utils;
