/// User domain types
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Account role. Closed set; authorization decisions go through the
/// capability methods rather than string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Whether this role may list, delete, or otherwise administer user
    /// accounts and the album catalog.
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Whether this role may create or modify catalog albums and drive
    /// order status transitions.
    pub fn can_manage_catalog(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// User account
///
/// `password_hash` and the reset-token fields are persistence-side only;
/// HTTP responses use a dedicated view type that omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub profile_image: Option<String>,
    #[serde(skip_serializing)]
    pub credit_card_hash: Option<String>,
    /// Account creation timestamp (unix seconds)
    pub created_at: i64,
}
