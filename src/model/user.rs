use crate::model::{id, role::Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public view of an account. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    #[serde(deserialize_with = "id::deserialize")]
    pub id: u64,
    #[schema(example = "jane@company.com")]
    pub email: String,
    pub role: Role,
    /// Bearer token, present on the record returned by a successful login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
