//! Login and registration screens.

mod render;
mod state;
mod update;

pub use render::render_auth;
pub use state::{AuthField, AuthMode, AuthState, LoginForm, RegisterForm};
pub use update::{
    AuthAction, AuthOutcome, LOGGED_IN_NOTICE, REGISTERED_NOTICE, handle_key, handle_paste,
    handle_result,
};
