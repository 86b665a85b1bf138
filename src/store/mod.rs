use async_trait::async_trait;
use derive_more::Display;

use crate::model::{employee::Employee, user::NewUser, user::User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgCredentialStore;

/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Unique constraint on `users.email`, named in the initial migration.
pub const USERS_EMAIL_KEY: &str = "users_email_key";

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "email already registered")]
    DuplicateEmail,

    #[display(fmt = "insert into {} returned no row", _0)]
    InsertFailed(&'static str),

    #[display(fmt = "transaction timed out")]
    Timeout,

    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            // Other unique violations (e.g. `employees_pkey`) stay database errors.
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(USERS_EMAIL_KEY)
            {
                return StoreError::DuplicateEmail;
            }
        }
        StoreError::Database(e)
    }
}

/// Persistence seam for users and their mirror employee rows.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact match against the stored (already normalized) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Inserts the user and its employee row in one transaction; either both
    /// rows are committed or neither is.
    async fn create_user_with_employee(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn find_employee(&self, emp_id: i32) -> Result<Option<Employee>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
