use crate::model::{employee::Employee, role::Role};
use crate::models::{
    LoginReqDto, LoginResponse, RegisterReq, RegisterResponse, RegisteredUser, SessionUser,
};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Management System - Auth API",
        version = "1.0.0",
        description = r#"
## Employee Management System: authentication

Registers users together with their employee record, logs them in and
issues **JWT bearer tokens** valid for one hour.

### 🔐 Security
- `POST /auth/login` and `POST /auth/register` are public and rate limited per IP.
- Everything under `/api` requires `Authorization: Bearer <token>`.
- Login failures never reveal whether the email exists.

---
Built with **Rust**, **Actix Web**, **SQLx** and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::register,
        crate::auth::handlers::me,

        crate::api::employee::get_employee,
        crate::api::health::health_check
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            RegisterReq,
            RegisterResponse,
            RegisteredUser,
            SessionUser,
            Role,
            Employee
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and token identity"),
        (name = "Employee", description = "Employee lookup APIs"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
