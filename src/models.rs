use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{role::Role, user::User};

/// Every field is optional so that missing keys surface as our own 400, not a parse error.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    #[schema(example = "Jane Doe")]
    pub full_name: Option<String>,
    #[schema(example = "jane@acme.com", format = "email")]
    pub email: Option<String>,
    #[schema(example = "secret1", format = "password")]
    pub password: Option<String>,
    #[schema(example = "employee")]
    pub role: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "jane@acme.com", format = "email")]
    pub email: Option<String>,
    #[schema(example = "secret1", format = "password")]
    pub password: Option<String>,
}

// Request bodies carry plaintext passwords; keep them out of any `{:?}` output.
impl std::fmt::Debug for RegisterReq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterReq")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("role", &self.role)
            .finish()
    }
}

impl std::fmt::Debug for LoginReqDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqDto")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "jane@acme.com")]
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "jane@acme.com")]
    pub email: String,
    pub role: Role,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl RegisteredUser {
    /// `role` is passed in so the row's role string is parsed once per request.
    pub fn new(user: &User, role: Role) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub user: SessionUser,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "User registered successfully")]
    pub message: String,
    pub token: String,
    pub role: Role,
    pub user: RegisteredUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub role: Role,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}
