use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    /// Any role string this system does not know. Never satisfies a role requirement.
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn from_name(name: &str) -> Self {
        name.trim()
            .to_lowercase()
            .parse()
            .unwrap_or(Role::Unknown)
    }

    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!(Role::from_name("admin"), Role::Admin);
        assert_eq!(Role::from_name(" Employee "), Role::Employee);
    }

    #[test]
    fn unknown_and_empty_names_map_to_unknown() {
        assert_eq!(Role::from_name(""), Role::Unknown);
        assert_eq!(Role::from_name("basic"), Role::Unknown);
        let role: Role = serde_json::from_str("\"manager\"").unwrap();
        assert_eq!(role, Role::Unknown);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(Role::Employee.as_ref(), "employee");
    }
}
