//! Application state.
//!
//! Pure data: only the reducer mutates it (plus the runtime's clock refresh).

use chrono::NaiveDate;

use crate::common::{RequestSeq, Requests};
use crate::features::auth::AuthState;
use crate::features::dashboard::DashboardState;

/// Top-level screen. Screens are composed only through navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Auth,
    Dashboard,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub auth: AuthState,
    pub dashboard: DashboardState,
    /// Session token mirror; the runtime persists changes via effects.
    pub token: Option<String>,
    pub requests: Requests,
    pub request_seq: RequestSeq,
    /// Local date used to validate new due dates.
    pub today: NaiveDate,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(token: Option<String>, today: NaiveDate) -> Self {
        Self {
            screen: Screen::Auth,
            auth: AuthState::default(),
            dashboard: DashboardState::default(),
            token,
            requests: Requests::default(),
            request_seq: RequestSeq::default(),
            today,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn spinner(&self) -> &'static str {
        const FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
        FRAMES[(self.spinner_frame / 4) % FRAMES.len()]
    }
}
