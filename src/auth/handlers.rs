use crate::{
    auth::{
        auth::AuthUser,
        error::AuthError,
        jwt::TokenIssuer,
        password::{CredentialScheme, hash_password, verify_against_dummy, verify_password},
    },
    config::Config,
    model::user::NewUser,
    models::{
        LoginReqDto, LoginResponse, RegisterReq, RegisterResponse, RegisteredUser, SessionUser,
    },
    store::{CredentialStore, StoreError},
};
use actix_web::{HttpResponse, get, web};
use tracing::{Span, debug, error, info, instrument, warn};

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Email or password missing", body = Object, example = json!({
            "error": "Email and password are required"
        })),
        (status = 401, description = "Unknown email or wrong password", body = Object, example = json!({
            "error": "Invalid email or password"
        })),
        (status = 500, description = "Server configuration or internal error", body = Object, example = json!({
            "error": "Server configuration error"
        }))
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(payload, store, config),
    fields(email = tracing::field::Empty)
)]
pub async fn login(
    payload: web::Json<LoginReqDto>,
    store: web::Data<dyn CredentialStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AuthError> {
    info!("Login request received");

    // 1️⃣ Basic validation
    let (email, password) = payload.credentials()?;
    Span::current().record("email", email.as_str());

    // 2️⃣ Nothing below is useful without a signing secret
    let issuer = TokenIssuer::from_config(&config)?;

    // 3️⃣ Fetch user
    let user = match store.find_by_email(&email).await {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            // same bcrypt cost as a wrong password, so timing does not reveal the email
            let password = password.to_string();
            let _ = web::block(move || verify_against_dummy(&password)).await;
            info!("Invalid credentials: user not found");
            return Err(AuthError::InvalidCredentials);
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return Err(AuthError::Internal);
        }
    };

    // 4️⃣ Verify password off the worker thread
    let password = password.to_string();
    let stored = user.password.clone();
    let verification = web::block(move || verify_password(&password, stored.as_deref()))
        .await
        .map_err(|e| {
            error!(error = %e, "Password verification task failed");
            AuthError::Internal
        })?;

    if verification.scheme == Some(CredentialScheme::LegacyPlaintext) {
        warn!(
            user_id = user.id,
            credential_scheme = "legacy_plaintext",
            "Plaintext credential in use; row must be migrated to a hash"
        );
    }

    if !verification.matched {
        info!(user_id = user.id, "Invalid credentials: password mismatch");
        return Err(AuthError::InvalidCredentials);
    }

    // 5️⃣ Issue token
    let role = user.role();
    let token = issuer.issue(user.id, role, &user.email).map_err(|e| {
        error!(error = %e, "Failed to sign token");
        AuthError::Internal
    })?;

    info!(user_id = user.id, "Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        role,
        user: SessionUser {
            id: user.id,
            email: user.email,
            role,
        },
    }))
}

/// Register a user and its employee record
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User and employee created", body = RegisterResponse),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "error": "Password must be at least 6 characters"
        })),
        (status = 409, description = "Email already registered", body = Object, example = json!({
            "error": "User with this email already exists"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "error": "Registration failed, please try again later"
        }))
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_register",
    skip(payload, store, config),
    fields(email = tracing::field::Empty)
)]
pub async fn register(
    payload: web::Json<RegisterReq>,
    store: web::Data<dyn CredentialStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AuthError> {
    info!("Registration request received");

    // 1️⃣ Validate and normalize input
    let registration = payload.into_inner().validate()?;
    Span::current().record("email", registration.email.as_str());

    // 2️⃣ Checked before any write so a misconfigured server never creates users it cannot log in
    let issuer = TokenIssuer::from_config(&config)?;

    // 3️⃣ Reject known emails early
    match store.find_by_email(&registration.email).await {
        Ok(Some(_)) => {
            info!("Registration rejected: email already registered");
            return Err(AuthError::DuplicateUser);
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "Database error while checking email");
            return Err(AuthError::Internal);
        }
    }

    // 4️⃣ Hash password off the worker thread
    let password = registration.password;
    let password_hash = web::block(move || hash_password(&password))
        .await
        .map_err(|e| {
            error!(error = %e, "Password hashing task failed");
            AuthError::Internal
        })?
        .map_err(|e| {
            error!(error = %e, "Password hashing failed");
            AuthError::Internal
        })?;

    // 5️⃣ Insert user and employee in one transaction
    let new_user = NewUser {
        full_name: registration.full_name,
        email: registration.email,
        password_hash,
        role: registration.role,
    };

    let user = store
        .create_user_with_employee(new_user)
        .await
        .map_err(|e| match e {
            // lost a race with a concurrent registration
            StoreError::DuplicateEmail => {
                info!("Registration rejected: unique constraint on email");
                AuthError::DuplicateUser
            }
            e => {
                error!(error = %e, "Registration transaction rolled back");
                AuthError::TransactionFailure
            }
        })?;

    // 6️⃣ Issue token
    let role = user.role();
    let token = issuer.issue(user.id, role, &user.email).map_err(|e| {
        error!(error = %e, user_id = user.id, "Failed to sign token after registration");
        AuthError::Internal
    })?;

    info!(user_id = user.id, "User registered");

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_string(),
        token,
        role,
        user: RegisteredUser::new(&user, role),
    }))
}

/// Identity behind the presented bearer token
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Caller identity", body = SessionUser),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    tag = "Auth",
    security(
        ("bearer_auth" = [])
    )
)]
#[get("/me")]
pub async fn me(auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(SessionUser {
        id: auth.id,
        email: auth.email,
        role: auth.role,
    })
}
