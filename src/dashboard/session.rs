use crate::dashboard::signal::Signal;
use crate::model::{role::Role, user::User};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};
use thiserror::Error;
use tokio::sync::watch;

pub const USER_COOKIE: &str = "user";
pub const TOKEN_COOKIE: &str = "token";
pub const COOKIE_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cookie store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cookie store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Named string values with an expiry, the way a browser keeps cookies.
pub trait CookieStore: Send {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: &str, ttl: Duration) -> Result<(), SessionError>;
    fn delete(&mut self, name: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Cookie {
    value: String,
    expires: DateTime<Utc>,
}

impl Cookie {
    fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires: Utc::now() + ttl,
        }
    }

    fn live_value(&self) -> Option<String> {
        (self.expires > Utc::now()).then(|| self.value.clone())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookies: HashMap<String, Cookie>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name).and_then(Cookie::live_value)
    }

    fn set(&mut self, name: &str, value: &str, ttl: Duration) -> Result<(), SessionError> {
        self.cookies.insert(name.to_string(), Cookie::new(value, ttl));
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), SessionError> {
        self.cookies.remove(name);
        Ok(())
    }
}

/// Cookies persisted as a JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileCookieStore {
    path: PathBuf,
    cookies: HashMap<String, Cookie>,
}

impl FileCookieStore {
    /// A missing file is an empty jar.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let cookies = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, cookies })
    }

    fn flush(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.cookies)?)?;
        Ok(())
    }
}

impl CookieStore for FileCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name).and_then(Cookie::live_value)
    }

    fn set(&mut self, name: &str, value: &str, ttl: Duration) -> Result<(), SessionError> {
        self.cookies.insert(name.to_string(), Cookie::new(value, ttl));
        self.flush()
    }

    fn delete(&mut self, name: &str) -> Result<(), SessionError> {
        if self.cookies.remove(name).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// The signed-in user, mirrored into the `user` and `token` cookies.
pub struct Session {
    store: Mutex<Box<dyn CookieStore>>,
    user: Signal<Option<User>>,
}

impl Session {
    /// Rehydrates the user from the `user` cookie. Unreadable data means
    /// logged out.
    pub fn restore(store: impl CookieStore + 'static) -> Self {
        let user = store
            .get(USER_COOKIE)
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding malformed user cookie");
                    None
                }
            });

        Self {
            store: Mutex::new(Box::new(store)),
            user: Signal::new(user),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.user.get()
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user.with(|u| u.as_ref().map(|u| u.id))
    }

    pub fn role(&self) -> Option<Role> {
        self.user.with(|u| u.as_ref().map(|u| u.role))
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.with(Option::is_some)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    pub fn set_user(&self, user: User) -> Result<(), SessionError> {
        let raw = serde_json::to_string(&user)?;
        let token = user.token.clone();
        self.user.set(Some(user));

        let ttl = Duration::days(COOKIE_LIFETIME_DAYS);
        let mut store = self.store.lock().map_err(|_| SessionError::Poisoned)?;
        store.set(USER_COOKIE, &raw, ttl)?;
        match token {
            Some(token) => store.set(TOKEN_COOKIE, &token, ttl),
            None => store.delete(TOKEN_COOKIE),
        }
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.user.set(None);
        let mut store = self.store.lock().map_err(|_| SessionError::Poisoned)?;
        store.delete(USER_COOKIE)?;
        store.delete(TOKEN_COOKIE)
    }

    pub fn token(&self) -> Option<String> {
        self.store.lock().ok()?.get(TOKEN_COOKIE)
    }
}
