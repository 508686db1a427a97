use crate::model::{role::Role, user::User};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::IntoParams;

/// Query of `GET /users`. With both credentials present the call is a login.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UserQuery {
    /// Login email
    pub email: Option<String>,
    /// Login password
    pub password: Option<String>,
}

impl UserQuery {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        }
    }
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: u64, // BIGINT UNSIGNED
    pub email: String,
    pub password: String,
    pub role: String,
}

impl UserSql {
    pub fn into_user(self, token: Option<String>) -> User {
        User {
            id: self.id,
            email: self.email,
            role: Role::from_name(&self.role),
            token,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// account email
    pub sub: String,
    pub role: String,
    pub exp: usize,
    pub jti: String,
}
