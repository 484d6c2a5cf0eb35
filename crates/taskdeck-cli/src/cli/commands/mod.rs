//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod tasks;
#[cfg(feature = "tui")]
pub mod tui;
