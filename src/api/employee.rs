use crate::{
    auth::{auth::AuthUser, error::AuthError},
    model::employee::Employee,
    store::CredentialStore,
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::error;

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{emp_id}",
    params(
        ("emp_id", Path, description = "Employee ID (same as the owning user's id)")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    _auth: AuthUser,
    store: web::Data<dyn CredentialStore>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AuthError> {
    let emp_id = path.into_inner();

    let employee = store.find_employee(emp_id).await.map_err(|e| {
        error!(error = %e, emp_id, "Failed to fetch employee");
        AuthError::Internal
    })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "error": "Employee not found"
        }))),
    }
}
