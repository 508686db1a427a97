use crate::dashboard::signal::Signal;
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};
use strum_macros::{AsRefStr, Display};
use tokio::sync::watch;

pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

pub struct ToastService {
    toasts: Signal<Vec<Toast>>,
    counter: AtomicU64,
    lifetime: Duration,
}

impl Default for ToastService {
    fn default() -> Self {
        Self::with_lifetime(DEFAULT_LIFETIME)
    }
}

impl ToastService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            toasts: Signal::default(),
            counter: AtomicU64::new(0),
            lifetime,
        }
    }

    pub fn show(&self, message: impl Into<String>, kind: ToastKind) -> u64 {
        let id = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let toast = Toast {
            id,
            message: message.into(),
            kind,
            expires_at: Instant::now() + self.lifetime,
        };
        self.toasts.update(|toasts| toasts.push(toast));
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Info)
    }

    pub fn remove(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    /// Drops every toast whose lifetime has passed at `now`.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let mut pruned = 0;
        self.toasts.update(|toasts| {
            let before = toasts.len();
            toasts.retain(|t| t.expires_at > now);
            pruned = before - toasts.len();
        });
        pruned
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.toasts.subscribe()
    }

    #[cfg(test)]
    pub(crate) fn messages(&self) -> Vec<(ToastKind, String)> {
        self.toasts
            .with(|toasts| toasts.iter().map(|t| (t.kind, t.message.clone())).collect())
    }
}
