//! Interactive dashboard.

use anyhow::{Context, Result};
use taskdeck_core::api::ApiClient;
use taskdeck_core::session::Session;

pub fn run(api: ApiClient, session: Session) -> Result<()> {
    taskdeck_tui::run_interactive(api, session).context("terminal UI failed")
}
