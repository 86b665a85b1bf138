use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, warn};

use crate::{
    model::{
        employee::Employee,
        user::{NewUser, User},
    },
    store::{CredentialStore, StoreError},
};

const USER_COLUMNS: &str = "id, full_name, email, password, role, created_at";

pub struct PgCredentialStore {
    pool: PgPool,
    tx_timeout: Duration,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool, tx_timeout: Duration) -> Self {
        Self { pool, tx_timeout }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn register_in_tx(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Applies to every statement until COMMIT/ROLLBACK.
        sqlx::query("SELECT set_config('statement_timeout', $1, true)")
            .bind(self.tx_timeout.as_millis().to_string())
            .execute(&mut *tx)
            .await?;

        match insert_user_and_employee(&mut *tx, new_user).await {
            Ok(user) => {
                tx.commit().await?;
                debug!(user_id = user.id, "Registration transaction committed");
                Ok(user)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed; connection will be discarded");
                }
                Err(e)
            }
        }
    }
}

async fn insert_user_and_employee(
    conn: &mut PgConnection,
    new_user: &NewUser,
) -> Result<User, StoreError> {
    let insert_user = format!(
        "INSERT INTO users (full_name, email, password, role) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
    );

    let user = sqlx::query_as::<_, User>(&insert_user)
        .bind(&new_user.full_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_ref())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StoreError::InsertFailed("users"))?;

    sqlx::query_as::<_, Employee>(
        r#"
        INSERT INTO employees (emp_id, emp_name, email)
        VALUES ($1, $2, $3)
        RETURNING emp_id, emp_name, email
        "#,
    )
    .bind(user.id)
    .bind(&user.full_name)
    .bind(&user.email)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(StoreError::InsertFailed("employees"))?;

    Ok(user)
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn create_user_with_employee(&self, new_user: NewUser) -> Result<User, StoreError> {
        // Dropping the in-flight transaction on timeout rolls it back.
        actix_web::rt::time::timeout(self.tx_timeout, self.register_in_tx(&new_user))
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    async fn find_employee(&self, emp_id: i32) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT emp_id, emp_name, email
            FROM employees
            WHERE emp_id = $1
            "#,
        )
        .bind(emp_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
