use axum::{Json, extract::State, http::StatusCode};
use kinder_core::{AppError, ErrorResponse};
use kinder_models::users::{LoginRequest, LoginResponse, RegisterRequest, User};
use tracing::instrument;

use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new identity
#[utoipa::path(
    post,
    path = "/api/register/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Identity registered", body = User),
        (status = 400, description = "Validation error or username taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = AuthService::register_user(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Current identity
#[utoipa::path(
    get,
    path = "/api/me/",
    responses(
        (status = 200, description = "Calling identity", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Identity no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.db, auth_user.user_id()?).await?;
    Ok(Json(user))
}
