//! Screen features: each owns its state, key handling, and view.

pub mod auth;
pub mod dashboard;
