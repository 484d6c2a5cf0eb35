//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - Handlers return `UiEvent`s; spawned requests send them to `inbox_tx`
//! - The runtime drains `inbox_rx` each frame to collect results
//!
//! Structure:
//! - `mod.rs`: Core runtime (`TuiRuntime`, event loop, effect dispatch)
//! - `inbox.rs`: Inbox channel types
//! - `handlers/`: API request handlers

mod handlers;
mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use taskdeck_core::api::ApiClient;
use taskdeck_core::session::Session;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::common::{RequestCompleted, RequestId, RequestKind, RequestStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Poll duration while a request is in flight (spinner cadence).
pub const FRAME_DURATION: Duration = Duration::from_millis(50);

/// Poll duration when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

/// Full-screen TUI runtime.
///
/// Owns the terminal, the API client, and the session store.
/// Terminal state is restored on drop or panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    api: ApiClient,
    session: Session,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates a runtime and enters the alternate screen.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(api: ApiClient, session: Session) -> Result<Self> {
        // Panic hook goes in before the alternate screen.
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let state = AppState::new(
            session.token().map(ToString::to_string),
            chrono::Local::now().date_naive(),
        );
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            api,
            session,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal events fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        let effects = update::start(&mut self.state);
        self.execute_effects(effects);

        let result = self.event_loop();

        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }

            let events = self.collect_events()?;
            if events.is_empty() {
                continue;
            }

            self.state.today = chrono::Local::now().date_naive();
            for event in events {
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }
            dirty = true;
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let tick_interval = if self.state.requests.is_any_running() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        self.execute_effects(effects);
    }

    /// Spawns a request with a uniform RequestStarted/RequestCompleted lifecycle.
    fn spawn_request<F, Fut>(&self, kind: RequestKind, id: RequestId, f: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = CancellationToken::new();
        let started = RequestStarted {
            id,
            cancel: cancel.clone(),
        };
        let _ = tx.send(UiEvent::RequestStarted { kind, started });
        tokio::spawn(async move {
            let inner = f(cancel).await;
            let completed = RequestCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::RequestCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::CancelRequest { token } => {
                if let Some(cancel) = token {
                    cancel.cancel();
                }
            }

            // Session effects
            UiEffect::StoreToken { token } => {
                if let Err(err) = self.session.set_token(&token) {
                    tracing::warn!(error = %format!("{err:#}"), "failed to persist session token");
                    self.dispatch_event(UiEvent::TokenPersistFailed {
                        error: format!("{err:#}"),
                    });
                }
            }
            UiEffect::ClearToken => {
                if let Err(err) = self.session.clear() {
                    tracing::warn!(error = %format!("{err:#}"), "failed to clear session token");
                }
            }

            // Request effects
            UiEffect::Login {
                request,
                credentials,
            } => {
                let api = self.api.clone();
                self.spawn_request(RequestKind::Auth, request, move |cancel| {
                    handlers::login(api, credentials, cancel)
                });
            }
            UiEffect::Register {
                request,
                registration,
            } => {
                let api = self.api.clone();
                self.spawn_request(RequestKind::Auth, request, move |cancel| {
                    handlers::register(api, registration, cancel)
                });
            }
            UiEffect::FetchTasks { request, token } => {
                let api = self.api.clone();
                self.spawn_request(RequestKind::Dashboard, request, move |cancel| {
                    handlers::fetch_tasks(api, token, cancel)
                });
            }
            UiEffect::CreateTask {
                request,
                token,
                draft,
            } => {
                let api = self.api.clone();
                self.spawn_request(RequestKind::Dashboard, request, move |cancel| {
                    handlers::create_task(api, token, draft, cancel)
                });
            }
            UiEffect::UpdateTask {
                request,
                token,
                id,
                draft,
            } => {
                let api = self.api.clone();
                self.spawn_request(RequestKind::Dashboard, request, move |cancel| {
                    handlers::update_task(api, token, id, draft, cancel)
                });
            }
            UiEffect::DeleteTask { request, token, id } => {
                let api = self.api.clone();
                self.spawn_request(RequestKind::Dashboard, request, move |cancel| {
                    handlers::delete_task(api, token, id, cancel)
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
