use anyhow::Context;
use kinder_auth::Role;
use kinder_core::{AppError, hash_password};
use kinder_db::{is_unique_violation, violated_constraint};
use kinder_models::ids::UserId;
use kinder_models::users::User;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

pub(crate) const USER_COLUMNS: &str = "id, username, role, is_active, created_at, updated_at";

pub struct UserService;

impl UserService {
    /// Inserts an identity with a freshly hashed password.
    ///
    /// Takes a connection so callers can run it inside their own transaction.
    #[instrument(skip(conn, password))]
    pub async fn create_identity(
        conn: &mut PgConnection,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let password_hash = hash_password(password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password, role) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(&password_hash)
        .bind(role)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) && violated_constraint(&e) == Some("users_username_key") {
                return AppError::field("username", "A user with that username already exists");
            }
            AppError::from(e)
        })?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn username_taken(db: &PgPool, username: &str) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(db)
        .await
        .context("Failed to check username")
        .map_err(AppError::database)?;

        Ok(taken)
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", id)))
    }

    #[instrument(skip(db, ids))]
    pub async fn get_users_by_ids(db: &PgPool, ids: &[UserId]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ANY($1)",
            USER_COLUMNS
        ))
        .bind(ids)
        .fetch_all(db)
        .await
        .context("Failed to fetch users")
        .map_err(AppError::database)?;

        Ok(users)
    }
}
