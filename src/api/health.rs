use crate::store::CredentialStore;
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

/// Liveness plus database reachability
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database reachable", body = Object, example = json!({
            "status": "up", "database": "connected"
        })),
        (status = 503, description = "Database unreachable", body = Object, example = json!({
            "status": "down", "error": "database_error"
        }))
    ),
    tag = "Health"
)]
#[get("/health")]
pub async fn health_check(store: web::Data<dyn CredentialStore>) -> impl Responder {
    match store.ping().await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "up", "database": "connected" })),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed: database error");
            HttpResponse::ServiceUnavailable()
                .json(json!({ "status": "down", "error": "database_error" }))
        }
    }
}
