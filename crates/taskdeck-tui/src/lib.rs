//! Full-screen terminal UI for taskdeck.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
use taskdeck_core::api::ApiClient;
use taskdeck_core::session::Session;

pub use features::{auth, dashboard};
pub use runtime::TuiRuntime;

/// Runs the interactive UI until the user quits.
///
/// Must be called from within a tokio runtime: requests are spawned on it.
///
/// # Errors
/// Returns an error if stdout is not a terminal or the terminal fails.
pub fn run_interactive(api: ApiClient, session: Session) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The task dashboard requires a terminal.\n\
             Use `taskdeck tasks list` for non-interactive use."
        );
    }

    tracing::info!(api = %api.base_url(), "starting terminal UI");
    let mut runtime = TuiRuntime::new(api, session)?;
    runtime.run()?;
    drop(runtime);

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
