//! Configuration module
//!
//! Settings loaded from `config.toml` in the platform config directory.

pub mod config;
