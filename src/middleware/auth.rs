use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use kinder_auth::{Claims, Role, verify_token};
use kinder_core::AppError;
use kinder_models::ids::UserId;

use crate::state::AppState;

/// Extractor that validates the bearer token and provides its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    pub fn role(&self) -> Role {
        self.0.role
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Declares an extractor that only admits tokens carrying one of the listed roles.
#[macro_export]
macro_rules! require_roles {
    ($name:ident, [$($role:ident),+ $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = kinder_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                $crate::middleware::role::check_any_role(
                    &auth_user,
                    &[$(kinder_auth::Role::$role),+],
                )?;

                Ok($name(auth_user))
            }
        }
    };
}

require_roles!(RequireAdmin, [Admin]);
require_roles!(RequireEmployee, [Employee]);
require_roles!(RequireParent, [Parent]);
require_roles!(RequireStaff, [Admin, Employee]);
require_roles!(RequireAnyRole, [Admin, Employee, Parent]);
