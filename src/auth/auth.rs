use crate::{auth::error::AuthError, auth::jwt::TokenIssuer, config::Config, model::role::Role};
use actix_web::{
    FromRequest, HttpMessage, HttpRequest,
    dev::Payload,
    http::header::{AUTHORIZATION, HeaderMap},
    web::Data,
};
use futures::future::{Ready, ready};
use tracing::debug;

/// Identity of the caller, taken from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

/// Checks `Authorization: Bearer <token>` against the configured secret.
pub fn authenticate(headers: &HeaderMap, config: &Config) -> Result<AuthUser, AuthError> {
    let header_value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::Unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| AuthError::Unauthorized("Invalid Authorization header encoding"))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::Unauthorized("Authorization header must start with Bearer"))?;

    let issuer = TokenIssuer::from_config(config)?;

    let claims = issuer.verify(token).map_err(|e| {
        debug!(error = %e, "Bearer token rejected");
        AuthError::Unauthorized("Invalid or expired token")
    })?;

    Ok(AuthUser {
        id: claims.id,
        email: claims.email,
        role: claims.role,
    })
}

impl FromRequest for AuthUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Already verified by `auth_middleware` on protected scopes.
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => return ready(Err(AuthError::Configuration)),
        };

        ready(authenticate(req.headers(), config))
    }
}
