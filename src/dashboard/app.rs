use crate::config::ClientConfig;
use crate::dashboard::{
    Backend, Error, FileCookieStore, HttpBackend, Session, ToastService,
    home::Summary,
    leave_management::LeaveManagementService,
    leaves::LeavesService,
    login::AuthService,
    router::{Resolution, Route, View, app_routes, resolve},
    tasks::TaskService,
};
use std::sync::Arc;

/// Every dashboard service wired over one backend and one session.
pub struct Dashboard<B> {
    pub session: Arc<Session>,
    pub auth: AuthService<B>,
    pub leaves: LeavesService<B>,
    pub leave_management: LeaveManagementService<B>,
    pub tasks: TaskService<B>,
    pub toasts: ToastService,
    routes: Vec<Route>,
}

impl Dashboard<HttpBackend> {
    /// Talks to the configured API and keeps cookies in the configured file.
    pub fn connect(config: &ClientConfig) -> Result<Self, Error> {
        let store = FileCookieStore::open(&config.cookie_path)?;
        tracing::info!(api = %config.api_url, "Dashboard connecting");
        Ok(Self::new(
            Arc::new(HttpBackend::from_config(config)),
            Session::restore(store),
        ))
    }
}

impl<B: Backend> Dashboard<B> {
    pub fn new(backend: Arc<B>, session: Session) -> Self {
        let session = Arc::new(session);
        Self {
            auth: AuthService::new(backend.clone(), session.clone()),
            leaves: LeavesService::new(backend.clone(), session.clone()),
            leave_management: LeaveManagementService::new(backend.clone(), session.clone()),
            tasks: TaskService::new(backend, session.clone()),
            toasts: ToastService::new(),
            routes: app_routes(),
            session,
        }
    }

    pub fn navigate(&self, path: &str) -> Resolution {
        resolve(&self.routes, path, &self.session)
    }

    /// Loads whatever the view shows. Failures are toasted and returned.
    pub async fn enter(&self, view: View) -> Result<(), Error> {
        let result = match view {
            View::Home => match self.tasks.load_tasks().await {
                Ok(()) => self.leaves.load_leaves().await,
                Err(e) => Err(e),
            },
            View::Tasks => self.tasks.load_tasks().await,
            View::Leaves => self.leaves.load_leaves().await,
            View::LeaveManagement => self.leave_management.load_leaves().await,
            View::Login | View::Dashboard | View::NotFound => Ok(()),
        };
        result.inspect_err(|e| {
            tracing::error!(error = %e, ?view, "Failed to load view");
            self.toasts.error(e.user_message());
        })
    }

    pub fn summary(&self) -> Summary {
        Summary::from_services(&self.tasks, &self.leaves)
    }
}
