//! Client-side state for the leave and task dashboard: session, data
//! services over the REST API, forms, route guards and toasts.

pub mod app;
pub mod client;
pub mod guards;
pub mod home;
pub mod leave_form;
pub mod leave_management;
pub mod leaves;
pub mod login;
pub mod router;
pub mod session;
pub mod signal;
pub mod task_board;
pub mod tasks;
pub mod toast;

#[cfg(test)]
pub(crate) mod testing;

use crate::policy::ReviewError;
use thiserror::Error;

pub use app::Dashboard;
pub use client::{Backend, ClientError, HttpBackend};
pub use session::{CookieStore, FileCookieStore, MemoryCookieStore, Session, SessionError};
pub use signal::Signal;
pub use toast::{Toast, ToastKind, ToastService};

/// Generic message shown when the backend cannot be reached or refuses a call.
pub const SERVER_ERROR: &str = "Server error";

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Backend(#[from] ClientError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Review(#[from] ReviewError),
}

impl Error {
    /// Text suitable for an error toast.
    pub fn user_message(&self) -> String {
        match self {
            Error::Review(e) => e.to_string(),
            Error::Backend(_) | Error::Session(_) => SERVER_ERROR.to_string(),
        }
    }
}
