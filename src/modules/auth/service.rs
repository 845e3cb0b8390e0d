use anyhow::Context;
use kinder_auth::{Role, create_access_token};
use kinder_config::JwtConfig;
use kinder_core::{AppError, verify_password};
use kinder_models::ids::UserId;
use kinder_models::users::{LoginRequest, LoginResponse, RegisterRequest, User};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::{
    track_identity_registered, track_login_failure, track_login_success, track_token_issued,
};
use crate::modules::users::service::UserService;

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto), fields(username = %dto.username, role = %dto.role))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequest) -> Result<User, AppError> {
        if UserService::username_taken(db, &dto.username).await? {
            return Err(AppError::field(
                "username",
                "A user with that username already exists",
            ));
        }

        let mut conn = db
            .acquire()
            .await
            .context("Failed to acquire connection")
            .map_err(AppError::database)?;
        let user =
            UserService::create_identity(&mut conn, &dto.username, &dto.password, dto.role)
                .await?;

        track_identity_registered(user.role.as_str());
        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: UserId,
            username: String,
            password: String,
            role: Role,
            is_active: bool,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let Some(row) = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, username, password, role, is_active, created_at, updated_at
             FROM users WHERE username = $1",
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await?
        else {
            track_login_failure("unknown_user");
            return Err(AppError::unauthorized(
                "Invalid username or password".to_string(),
            ));
        };

        if !verify_password(&dto.password, &row.password)? {
            track_login_failure("wrong_password");
            return Err(AppError::unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        if !row.is_active {
            track_login_failure("inactive");
            return Err(AppError::unauthorized("Account is disabled".to_string()));
        }

        let token = create_access_token(row.id.into_inner(), &row.username, row.role, jwt_config)?;
        track_token_issued();
        track_login_success(row.role.as_str());

        Ok(LoginResponse {
            token,
            user: User {
                id: row.id,
                username: row.username,
                role: row.role,
                is_active: row.is_active,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        })
    }
}
