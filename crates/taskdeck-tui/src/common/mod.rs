//! Shared TUI building blocks.

mod request;
mod text;

pub use request::*;
pub use text::*;
