use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    model::{
        employee::Employee,
        user::{NewUser, User},
    },
    store::{CredentialStore, StoreError},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    employees: Vec<Employee>,
    next_id: i32,
}

/// Test double with the same commit-both-or-neither semantics as Postgres.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    tables: Mutex<Tables>,
    fail_employee_insert: AtomicBool,
    unavailable: AtomicBool,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next employee inserts return no row, as a failing constraint would.
    pub fn fail_employee_insert(&self, fail: bool) {
        self.fail_employee_insert.store(fail, Ordering::SeqCst);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Seeds a row directly, bypassing hashing; used for legacy credential cases.
    pub fn seed_user(&self, full_name: &str, email: &str, password: Option<&str>, role: &str) -> User {
        let mut tables = self.tables.lock().unwrap();
        tables.next_id += 1;
        let user = User {
            id: tables.next_id,
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.map(str::to_string),
            role: role.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        user
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn employee_count(&self) -> usize {
        self.tables.lock().unwrap().employees.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user_with_employee(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.lock().unwrap();

        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        // Stage both rows; nothing is written to `tables` until both succeed.
        let user = User {
            id: tables.next_id + 1,
            full_name: new_user.full_name,
            email: new_user.email,
            password: Some(new_user.password_hash),
            role: new_user.role.as_ref().to_string(),
            created_at: Utc::now(),
        };

        if self.fail_employee_insert.load(Ordering::SeqCst) {
            return Err(StoreError::InsertFailed("employees"));
        }

        let employee = Employee {
            emp_id: user.id,
            emp_name: user.full_name.clone(),
            email: user.email.clone(),
        };

        tables.next_id = user.id;
        tables.users.push(user.clone());
        tables.employees.push(employee);

        Ok(user)
    }

    async fn find_employee(&self, emp_id: i32) -> Result<Option<Employee>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.employees.iter().find(|e| e.emp_id == emp_id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            full_name: "Jane Doe".to_string(),
            email: email.to_string(),
            password_hash: "$2b$10$placeholder".to_string(),
            role: Role::Employee,
        }
    }

    #[actix_web::test]
    async fn creates_user_and_mirror_employee() {
        let store = InMemoryCredentialStore::new();

        let user = store
            .create_user_with_employee(new_user("jane@acme.com"))
            .await
            .unwrap();

        let employee = store.find_employee(user.id).await.unwrap().unwrap();
        assert_eq!(employee.emp_name, "Jane Doe");
        assert_eq!(employee.email, "jane@acme.com");
    }

    #[actix_web::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryCredentialStore::new();
        store
            .create_user_with_employee(new_user("jane@acme.com"))
            .await
            .unwrap();

        let err = store
            .create_user_with_employee(new_user("jane@acme.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.employee_count(), 1);
    }

    #[actix_web::test]
    async fn failed_employee_insert_leaves_no_user() {
        let store = InMemoryCredentialStore::new();
        store.fail_employee_insert(true);

        let err = store
            .create_user_with_employee(new_user("jane@acme.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InsertFailed("employees")));
        assert_eq!(store.user_count(), 0);
        assert!(store.find_by_email("jane@acme.com").await.unwrap().is_none());
    }
}
