//! Top-level view. Pure: reads state, draws a frame.

use ratatui::Frame;

use crate::features::{auth, dashboard};
use crate::state::{AppState, Screen};

pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    match app.screen {
        Screen::Auth => auth::render_auth(frame, &app.auth, app.spinner(), area),
        Screen::Dashboard => {
            dashboard::render_dashboard(frame, &app.dashboard, app.spinner(), area);
        }
    }
}
