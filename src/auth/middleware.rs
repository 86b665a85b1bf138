use crate::auth::auth::authenticate;
use crate::auth::error::AuthError;
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};

/// Guards a scope: rejects requests without a valid bearer token and stores
/// the resulting `AuthUser` in the request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = match req.app_data::<Data<Config>>().cloned() {
        Some(c) => c,
        None => {
            let resp = AuthError::Configuration.error_response();
            return Ok(req.into_response(resp));
        }
    };

    match authenticate(req.headers(), &config) {
        Ok(auth_user) => {
            req.extensions_mut().insert(auth_user);
            next.call(req).await
        }
        Err(e) => {
            let resp = e.error_response();
            Ok(req.into_response(resp))
        }
    }
}
