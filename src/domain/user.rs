//! Accounts and sessions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Staff => "staff",
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Staff)
    }
}

impl FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Stored as provided; credential handling is deliberately thin here and
    /// hashing belongs to the deployment's identity layer.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password: String, role: Role) -> Self {
        Self {
            id: Uuid::now_v7(),
            username,
            email,
            password,
            role,
            created_at: Utc::now(),
        }
    }
}

/// Server-issued opaque bearer token mapped to a user and role.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn issue(user: &User) -> Self {
        Self {
            token: Uuid::new_v4().simple().to_string(),
            user_id: user.id,
            role: user.role,
            created_at: Utc::now(),
        }
    }
}
