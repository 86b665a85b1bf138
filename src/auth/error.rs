use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Everything an auth endpoint can answer with besides success.
///
/// 500-class variants render a fixed message; the cause is logged where the
/// error is produced and never reaches the client.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum AuthError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    /// Unknown email and wrong password are deliberately indistinguishable.
    #[display(fmt = "Invalid email or password")]
    InvalidCredentials,

    /// Bearer-token failures on protected routes.
    #[display(fmt = "{}", _0)]
    Unauthorized(&'static str),

    #[display(fmt = "User with this email already exists")]
    DuplicateUser,

    #[display(fmt = "Server configuration error")]
    Configuration,

    #[display(fmt = "Registration failed, please try again later")]
    TransactionFailure,

    #[display(fmt = "Internal server error")]
    Internal,
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        AuthError::Validation(message.into())
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::DuplicateUser => StatusCode::CONFLICT,
            AuthError::Configuration | AuthError::TransactionFailure | AuthError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}
