use dotenvy::dotenv;
use std::{env, path::PathBuf, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,
    /// Lifetime of cached id -> email entries used by the review list.
    pub directory_ttl_secs: u64,
    /// Admin account created at startup if its email is not taken yet.
    pub admin: Option<AdminAccount>,
}

#[derive(Clone)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server_addr: required(&lookup, "SERVER_ADDR")?,
            database_url: required(&lookup, "DATABASE_URL")?,
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            access_token_ttl: parsed(&lookup, "ACCESS_TOKEN_TTL", 900)?, // 15 min
            rate_login_per_min: parsed(&lookup, "RATE_LOGIN_PER_MIN", 60)?,
            rate_protected_per_min: parsed(&lookup, "RATE_PROTECTED_PER_MIN", 1000)?,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            directory_ttl_secs: parsed(&lookup, "DIRECTORY_TTL_SECS", 3600)?,
            admin: admin_account(&lookup)?,
        })
    }
}

/// Settings of the dashboard side: where the API lives and where the
/// session cookies are kept between runs.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub cookie_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_url: lookup("LEAVEDESK_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:8080/api".to_string()),
            cookie_path: lookup("LEAVEDESK_COOKIE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".leavedesk/cookies.json")),
        }
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// `ADMIN_EMAIL` and `ADMIN_PASSWORD` come as a pair or not at all.
fn admin_account<F>(lookup: &F) -> Result<Option<AdminAccount>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let email = lookup("ADMIN_EMAIL").filter(|v| !v.trim().is_empty());
    let password = lookup("ADMIN_PASSWORD").filter(|v| !v.is_empty());
    match (email, password) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::Missing("ADMIN_PASSWORD")),
        (None, Some(_)) => Err(ConfigError::Missing("ADMIN_EMAIL")),
        (Some(email), Some(password)) => Ok(Some(AdminAccount {
            email: email.trim().to_string(),
            password,
        })),
    }
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
