//! User record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, data: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: data.email,
            name: data.name,
            created_at: now,
        }
    }
}

/// Caller-supplied part of a user. No uniqueness is enforced on `email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
}
