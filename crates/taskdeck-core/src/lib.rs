//! Core taskdeck library (config, session, task model, API client).

pub mod api;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod logging;
pub mod session;
pub mod task;
