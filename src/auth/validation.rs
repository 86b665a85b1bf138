use std::str::FromStr;

use crate::{
    auth::{error::AuthError, password::MAX_PASSWORD_BYTES},
    model::role::Role,
    models::{LoginReqDto, RegisterReq},
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Accepts `local@domain.tld`: no whitespace, a single `@`, and a dot in the
/// domain with something on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

/// Registration input after validation; the password is still plaintext.
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterReq {
    pub fn validate(self) -> Result<Registration, AuthError> {
        let (Some(full_name), Some(email), Some(password)) = (
            present(&self.full_name),
            present(&self.email),
            present(&self.password),
        ) else {
            return Err(AuthError::validation(
                "fullName, email and password are required",
            ));
        };

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::validation(format!(
                "Password must be at most {MAX_PASSWORD_BYTES} bytes"
            )));
        }

        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::validation("Invalid email format"));
        }

        let role = match present(&self.role) {
            Some(r) => Role::from_str(r.trim())
                .map_err(|_| AuthError::validation("Role must be one of: admin, employee"))?,
            None => Role::default(),
        };

        Ok(Registration {
            full_name: full_name.trim().to_string(),
            email,
            password: password.to_string(),
            role,
        })
    }
}

impl LoginReqDto {
    /// Returns the normalized email and the password untouched.
    pub fn credentials(&self) -> Result<(String, &str), AuthError> {
        match (present(&self.email), present(&self.password)) {
            (Some(email), Some(_)) => Ok((
                normalize_email(email),
                self.password.as_deref().unwrap_or_default(),
            )),
            _ => Err(AuthError::validation("Email and password are required")),
        }
    }
}
