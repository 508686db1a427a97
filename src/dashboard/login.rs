use crate::dashboard::{Backend, Error, SERVER_ERROR, Session, signal::Signal};
use crate::model::user::User;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

pub struct AuthService<B> {
    backend: Arc<B>,
    session: Arc<Session>,
}

impl<B: Backend> AuthService<B> {
    /// Hands any token left over from a previous run to the backend.
    pub fn new(backend: Arc<B>, session: Arc<Session>) -> Self {
        backend.authorize(session.token());
        Self { backend, session }
    }

    /// First matching user wins. `Ok(None)` means the credentials matched nobody.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>, Error> {
        let user = self
            .backend
            .find_users(email, password)
            .await?
            .into_iter()
            .next();

        if let Some(user) = &user {
            self.backend.authorize(user.token.clone());
            self.session.set_user(user.clone())?;
            tracing::info!(user_id = user.id, "Logged in");
        }
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), Error> {
        self.backend.authorize(None);
        self.session.clear()?;
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The form itself is incomplete; nothing was sent.
    Invalid(Vec<&'static str>),
    Rejected,
    Failed,
    Navigate(&'static str),
}

#[derive(Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    loading: Signal<bool>,
    error: Signal<Option<String>>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_errors(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();
        let email = self.email.trim();
        if email.is_empty() {
            errors.push("Email is required");
        } else if !EMAIL.is_match(email) {
            errors.push("Enter a valid email");
        }
        if self.password.is_empty() {
            errors.push("Password is required");
        }
        errors
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    pub async fn submit<B: Backend>(&self, auth: &AuthService<B>) -> LoginOutcome {
        let errors = self.field_errors();
        if !errors.is_empty() {
            return LoginOutcome::Invalid(errors);
        }

        self.loading.set(true);
        self.error.set(None);
        let result = auth.login(self.email.trim(), &self.password).await;
        self.loading.set(false);

        match result {
            Ok(Some(_)) => LoginOutcome::Navigate("/"),
            Ok(None) => {
                self.error.set(Some(INVALID_CREDENTIALS.to_string()));
                LoginOutcome::Rejected
            }
            Err(e) => {
                tracing::error!(error = %e, "Login failed");
                self.error.set(Some(SERVER_ERROR.to_string()));
                LoginOutcome::Failed
            }
        }
    }
}
