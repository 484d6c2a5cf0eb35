use taskdeck_core::api::{Credentials, Registration};

use crate::common::TextCursor;

/// Which auth form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn fields(self) -> &'static [AuthField] {
        match self {
            AuthMode::Login => &[AuthField::Username, AuthField::Password],
            AuthMode::Register => &[AuthField::Username, AuthField::Email, AuthField::Password],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Email,
    Password,
}

impl AuthField {
    pub fn label(self) -> &'static str {
        match self {
            AuthField::Username => "Username",
            AuthField::Email => "Email",
            AuthField::Password => "Password",
        }
    }

    pub fn is_secret(self) -> bool {
        self == AuthField::Password
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub mode: AuthMode,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub focus: usize,
    pub cursor: TextCursor,
    pub error: Option<String>,
    /// Informational line, e.g. after a successful registration.
    pub notice: Option<String>,
    /// A login or register request is in flight.
    pub loading: bool,
}

impl AuthState {
    pub fn focused_field(&self) -> AuthField {
        let fields = self.mode.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn field(&self, field: AuthField) -> &str {
        match (self.mode, field) {
            (AuthMode::Login, AuthField::Username) => &self.login.username,
            (AuthMode::Login, AuthField::Password) => &self.login.password,
            (AuthMode::Login, AuthField::Email) => "",
            (AuthMode::Register, AuthField::Username) => &self.register.username,
            (AuthMode::Register, AuthField::Email) => &self.register.email,
            (AuthMode::Register, AuthField::Password) => &self.register.password,
        }
    }

    /// The focused text plus its cursor.
    pub fn focused_text_mut(&mut self) -> (&mut String, &mut TextCursor) {
        let field = self.focused_field();
        let text = match (self.mode, field) {
            (AuthMode::Login, AuthField::Password) => &mut self.login.password,
            (AuthMode::Login, _) => &mut self.login.username,
            (AuthMode::Register, AuthField::Username) => &mut self.register.username,
            (AuthMode::Register, AuthField::Email) => &mut self.register.email,
            (AuthMode::Register, AuthField::Password) => &mut self.register.password,
        };
        (text, &mut self.cursor)
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.mode.fields().len();
        self.reset_cursor();
    }

    pub fn focus_prev(&mut self) {
        let len = self.mode.fields().len();
        self.focus = (self.focus + len - 1) % len;
        self.reset_cursor();
    }

    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.focus = 0;
        self.error = None;
        self.reset_cursor();
    }

    fn reset_cursor(&mut self) {
        self.cursor = TextCursor::at_end(self.field(self.focused_field()));
    }

    /// Validates the login form.
    ///
    /// # Errors
    /// Returns a display message when a field is empty.
    pub fn credentials(&self) -> Result<Credentials, String> {
        if self.login.username.trim().is_empty() || self.login.password.is_empty() {
            return Err("Username and password are required.".to_string());
        }
        Ok(Credentials {
            username: self.login.username.trim().to_string(),
            password: self.login.password.clone(),
        })
    }

    /// Validates the registration form.
    ///
    /// # Errors
    /// Returns a display message when a field is empty.
    pub fn registration(&self) -> Result<Registration, String> {
        let form = &self.register;
        if form.username.trim().is_empty()
            || form.email.trim().is_empty()
            || form.password.is_empty()
        {
            return Err("Username, email and password are required.".to_string());
        }
        Ok(Registration {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        })
    }
}
