use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::model::role::Role;

/// Row of the `users` table.
///
/// `password` is whatever the row holds: a bcrypt/argon2 hash, a legacy
/// plaintext value, or nothing at all. It never leaves the server.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub password: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Rows outside the recognized set are treated as plain employees.
    pub fn role(&self) -> Role {
        Role::from_str(&self.role).unwrap_or_else(|_| {
            tracing::warn!(user_id = self.id, role = %self.role, "Unrecognized role on user row");
            Role::Employee
        })
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Validated input for the registration transaction.
pub struct NewUser {
    pub full_name: String,
    /// Already trimmed and lowercased.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
