//! Task dashboard screen.

mod render;
mod state;
mod update;

pub use render::render_dashboard;
pub use state::{DashboardState, DraftField, Focus};
pub use update::{DashboardAction, ResultOutcome, handle_key, handle_paste, handle_result};
