use crate::{
    config::ClientConfig,
    model::{
        leave::{Leave, LeaveStatusPatch, NewLeave},
        task::{NewTask, Task},
        user::User,
    },
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
}

/// The JSON CRUD API the dashboard reads and writes.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Sets or clears the bearer token sent with every later call.
    fn authorize(&self, token: Option<String>);

    /// `GET /users?email=&password=`
    async fn find_users(&self, email: &str, password: &str) -> Result<Vec<User>, ClientError>;
    async fn users(&self) -> Result<Vec<User>, ClientError>;

    async fn leaves_for_user(&self, user_id: u64) -> Result<Vec<Leave>, ClientError>;
    async fn all_leaves(&self) -> Result<Vec<Leave>, ClientError>;
    async fn create_leave(&self, leave: &NewLeave) -> Result<Leave, ClientError>;
    async fn patch_leave(&self, leave_id: u64, patch: &LeaveStatusPatch) -> Result<Leave, ClientError>;

    async fn tasks_for_user(&self, user_id: u64) -> Result<Vec<Task>, ClientError>;
    async fn create_task(&self, task: &NewTask) -> Result<Task, ClientError>;
    async fn update_task(&self, task: &Task) -> Result<Task, ClientError>;
    async fn delete_task(&self, task_id: u64) -> Result<(), ClientError>;
}

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        let token = self.token.read().ok().and_then(|t| t.clone());
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn checked(builder: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %message, "Backend call failed");
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        Ok(Self::checked(builder).await?.json().await?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    fn authorize(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }

    async fn find_users(&self, email: &str, password: &str) -> Result<Vec<User>, ClientError> {
        Self::json(
            self.request(Method::GET, "/users")
                .query(&[("email", email), ("password", password)]),
        )
        .await
    }

    async fn users(&self) -> Result<Vec<User>, ClientError> {
        Self::json(self.request(Method::GET, "/users")).await
    }

    async fn leaves_for_user(&self, user_id: u64) -> Result<Vec<Leave>, ClientError> {
        Self::json(self.request(Method::GET, "/leaves").query(&[("userId", user_id)])).await
    }

    async fn all_leaves(&self) -> Result<Vec<Leave>, ClientError> {
        Self::json(self.request(Method::GET, "/leaves")).await
    }

    async fn create_leave(&self, leave: &NewLeave) -> Result<Leave, ClientError> {
        Self::json(self.request(Method::POST, "/leaves").json(leave)).await
    }

    async fn patch_leave(&self, leave_id: u64, patch: &LeaveStatusPatch) -> Result<Leave, ClientError> {
        Self::json(
            self.request(Method::PATCH, &format!("/leaves/{leave_id}"))
                .json(patch),
        )
        .await
    }

    async fn tasks_for_user(&self, user_id: u64) -> Result<Vec<Task>, ClientError> {
        Self::json(self.request(Method::GET, "/tasks").query(&[("userId", user_id)])).await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ClientError> {
        Self::json(self.request(Method::POST, "/tasks").json(task)).await
    }

    async fn update_task(&self, task: &Task) -> Result<Task, ClientError> {
        Self::json(
            self.request(Method::PUT, &format!("/tasks/{}", task.id))
                .json(task),
        )
        .await
    }

    async fn delete_task(&self, task_id: u64) -> Result<(), ClientError> {
        Self::checked(self.request(Method::DELETE, &format!("/tasks/{task_id}"))).await?;
        Ok(())
    }
}
