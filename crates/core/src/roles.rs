//! The closed set of actor roles.
//!
//! Role is a tagged enumeration rather than a free-form string so the
//! permission table in [`crate::permissions`] can match exhaustively:
//! adding a role is a compile-time-checked change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An actor's role. Exactly one per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System administrator, full access.
    Admin,
    /// Commercial staff: owns clients and services their contracts.
    Commercial,
    /// Support staff: executes the events assigned to them.
    Support,
    /// Management: supervision over all business records.
    Management,
}

/// All roles, in the order they are presented to operators.
pub const ALL_ROLES: &[Role] = &[Role::Admin, Role::Commercial, Role::Support, Role::Management];

impl Role {
    /// The canonical lowercase name stored in the database and session file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Commercial => "commercial",
            Role::Support => "support",
            Role::Management => "management",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "commercial" => Ok(Role::Commercial),
            "support" => Ok(Role::Support),
            "management" => Ok(Role::Management),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: admin, commercial, support, management"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_roles() {
        for role in ALL_ROLES {
            let parsed: Role = role.as_str().parse().expect("canonical name must parse");
            assert_eq!(parsed, *role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = Role::from_str("gestion");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid role"));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Role::Management).unwrap();
        assert_eq!(json, "\"management\"");
        let back: Role = serde_json::from_str("\"support\"").unwrap();
        assert_eq!(back, Role::Support);
    }
}
