use std::collections::HashMap;

use anyhow::Context;
use kinder_auth::Role;
use kinder_core::AppError;
use kinder_db::{is_unique_violation, violated_constraint};
use kinder_models::directory::{AddParentDto, Parent, ParentProfile, UpdateParentDto};
use kinder_models::ids::{ParentId, UserId};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use crate::metrics::track_identity_registered;
use crate::modules::users::service::UserService;

pub(crate) const PARENT_COLUMNS: &str =
    "id, user_id, fname, lname, patronymic, phone_number, created_at, updated_at";

pub struct ParentService;

impl ParentService {
    /// Creates the identity and its parent profile in one transaction.
    #[instrument(skip(db, dto), fields(username = %dto.user.username))]
    pub async fn add_parent(db: &PgPool, dto: AddParentDto) -> Result<ParentProfile, AppError> {
        if let Some(role) = dto.user.role
            && role != Role::Parent
        {
            return Err(AppError::field(
                "user.role",
                format!("Role must be {} for this endpoint", Role::Parent),
            ));
        }

        let mut tx = db.begin().await?;

        let user = UserService::create_identity(
            &mut tx,
            &dto.user.username,
            &dto.user.password,
            Role::Parent,
        )
        .await?;

        let data = dto.parent;
        let parent = sqlx::query_as::<_, Parent>(&format!(
            "INSERT INTO parents (user_id, fname, lname, patronymic, phone_number)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            PARENT_COLUMNS
        ))
        .bind(user.id)
        .bind(&data.fname)
        .bind(&data.lname)
        .bind(&data.patronymic)
        .bind(data.phone_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(parent_conflict)?;

        tx.commit().await?;

        track_identity_registered(Role::Parent.as_str());
        Ok(ParentProfile { parent, user })
    }

    #[instrument(skip(db))]
    pub async fn list_parents(db: &PgPool) -> Result<Vec<ParentProfile>, AppError> {
        let parents = sqlx::query_as::<_, Parent>(&format!(
            "SELECT {} FROM parents ORDER BY lname, fname",
            PARENT_COLUMNS
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch parents")
        .map_err(AppError::database)?;

        let user_ids: Vec<UserId> = parents.iter().map(|p| p.user_id).collect();
        let mut users: HashMap<UserId, _> = UserService::get_users_by_ids(db, &user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        parents
            .into_iter()
            .map(|parent| {
                let user = users.remove(&parent.user_id).ok_or_else(|| {
                    AppError::internal_error(format!("Parent {} has no identity", parent.id))
                })?;
                Ok(ParentProfile { parent, user })
            })
            .collect()
    }

    #[instrument(skip(db))]
    pub async fn find_by_user_id(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Option<Parent>, AppError> {
        let parent = sqlx::query_as::<_, Parent>(&format!(
            "SELECT {} FROM parents WHERE user_id = $1",
            PARENT_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch parent by user")
        .map_err(AppError::database)?;

        Ok(parent)
    }

    #[instrument(skip(db))]
    pub async fn get_parent_by_user(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<ParentProfile, AppError> {
        let parent = Self::find_by_user_id(db, user_id).await?.ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("No parent profile for user {}", user_id))
        })?;

        let user = UserService::get_user(db, parent.user_id).await?;
        Ok(ParentProfile { parent, user })
    }

    /// Looks a parent up by profile id on the given connection.
    #[instrument(skip(conn))]
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: ParentId,
    ) -> Result<Option<Parent>, AppError> {
        let parent = sqlx::query_as::<_, Parent>(&format!(
            "SELECT {} FROM parents WHERE id = $1",
            PARENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
        .context("Failed to fetch parent")
        .map_err(AppError::database)?;

        Ok(parent)
    }

    #[instrument(skip(db))]
    pub async fn get_parent(db: &PgPool, id: ParentId) -> Result<ParentProfile, AppError> {
        let mut conn = db.acquire().await?;
        let parent = Self::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Parent not found")))?;

        let user = UserService::get_user(db, parent.user_id).await?;
        Ok(ParentProfile { parent, user })
    }

    /// Applies the supplied fields; absent ones keep their stored value.
    #[instrument(skip(db, dto))]
    pub async fn update_parent(
        db: &PgPool,
        id: ParentId,
        dto: UpdateParentDto,
    ) -> Result<ParentProfile, AppError> {
        let parent = sqlx::query_as::<_, Parent>(&format!(
            "UPDATE parents SET
                fname = COALESCE($2, fname),
                lname = COALESCE($3, lname),
                patronymic = CASE WHEN $4 THEN $5 ELSE patronymic END,
                phone_number = COALESCE($6, phone_number),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            PARENT_COLUMNS
        ))
        .bind(id)
        .bind(&dto.fname)
        .bind(&dto.lname)
        .bind(dto.patronymic.is_some())
        .bind(dto.patronymic.clone().flatten())
        .bind(dto.phone_number)
        .fetch_optional(db)
        .await
        .map_err(parent_conflict)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Parent not found")))?;

        let user = UserService::get_user(db, parent.user_id).await?;
        Ok(ParentProfile { parent, user })
    }
}

fn parent_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        match violated_constraint(&e) {
            Some("parents_phone_number_key") => {
                return AppError::field(
                    "phone_number",
                    "A parent with this phone number already exists",
                );
            }
            Some("parents_user_id_key") => {
                return AppError::field("user", "This user already has a parent profile");
            }
            _ => {}
        }
    }
    AppError::from(e)
}
