//! User roles.

use serde::{Deserialize, Serialize};

/// Account role controlling access to management endpoints.
///
/// Every account starts as a `customer`; `admin` unlocks the catalog
/// management routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    /// Whether this role may use admin-only routes.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_customer() {
        assert_eq!(Role::default(), Role::Customer);
        assert!(!Role::default().is_admin());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Customer).unwrap(), "\"customer\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");

        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(role.is_admin());
    }
}
