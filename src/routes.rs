use crate::{
    api::{employee, health},
    auth::{error::AuthError, handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = 60_000 / requests_per_min as u64;

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("quota is non-zero after clamping");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));

    // Malformed bodies get the same `{"error": ...}` shape as every other 400
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AuthError::validation(format!("Malformed JSON body: {err}")).into()
    }));

    cfg.service(health::health_check);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter)
                    .route(web::post().to(handlers::register)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .service(handlers::me)
            .service(
                web::resource("/employees/{emp_id}")
                    .route(web::get().to(employee::get_employee)),
            ),
    );
}

// LOGIN / REGISTER
//  └─ token (1 hour, no refresh)

// API REQUEST
//  └─ Authorization: Bearer token
