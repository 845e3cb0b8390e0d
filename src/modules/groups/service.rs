use anyhow::Context;
use kinder_core::AppError;
use kinder_db::is_foreign_key_violation;
use kinder_models::ids::{EmployeeId, GroupId};
use kinder_models::registry::{
    AssignEmployeeDto, Group, GroupAssignment, GroupData, UpdateGroupDto,
};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use crate::modules::programs::service::ProgramService;

const GROUP_COLUMNS: &str =
    "id, name, age_group, count_children, educational_program_id, created_at, updated_at";

const ASSIGNMENT_COLUMNS: &str = "id, group_id, employee_id, role, created_at, updated_at";

/// Result of an assignment upsert.
#[derive(Debug)]
pub struct AssignmentOutcome {
    pub assignment: GroupAssignment,
    /// `false` when an existing assignment had its role replaced
    pub created: bool,
}

pub struct GroupService;

impl GroupService {
    #[instrument(skip(db, dto))]
    pub async fn create_group(db: &PgPool, dto: GroupData) -> Result<Group, AppError> {
        let mut conn = db.acquire().await?;
        ProgramService::ensure_exists(&mut conn, dto.educational_program_id).await?;

        let group = sqlx::query_as::<_, Group>(&format!(
            "INSERT INTO child_groups (name, age_group, educational_program_id)
             VALUES ($1, $2, $3)
             RETURNING {}",
            GROUP_COLUMNS
        ))
        .bind(&dto.name)
        .bind(dto.age_group)
        .bind(dto.educational_program_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(missing_program)?;

        Ok(group)
    }

    #[instrument(skip(db))]
    pub async fn list_groups(db: &PgPool) -> Result<Vec<Group>, AppError> {
        let groups = sqlx::query_as::<_, Group>(&format!(
            "SELECT {} FROM child_groups ORDER BY name",
            GROUP_COLUMNS
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch groups")
        .map_err(AppError::database)?;

        Ok(groups)
    }

    #[instrument(skip(db))]
    pub async fn get_group(db: &PgPool, id: GroupId) -> Result<Group, AppError> {
        let mut conn = db.acquire().await?;
        Self::find_group(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Group not found")))
    }

    pub async fn find_group(
        conn: &mut PgConnection,
        id: GroupId,
    ) -> Result<Option<Group>, AppError> {
        let group = sqlx::query_as::<_, Group>(&format!(
            "SELECT {} FROM child_groups WHERE id = $1",
            GROUP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
        .context("Failed to fetch group")
        .map_err(AppError::database)?;

        Ok(group)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_group(
        db: &PgPool,
        id: GroupId,
        dto: UpdateGroupDto,
    ) -> Result<Group, AppError> {
        let mut conn = db.acquire().await?;

        if let Some(program_id) = dto.educational_program_id {
            ProgramService::ensure_exists(&mut conn, program_id).await?;
        }

        let group = sqlx::query_as::<_, Group>(&format!(
            "UPDATE child_groups SET
                name = COALESCE($2, name),
                age_group = COALESCE($3, age_group),
                educational_program_id = COALESCE($4, educational_program_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            GROUP_COLUMNS
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(dto.age_group)
        .bind(dto.educational_program_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(missing_program)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Group not found")))?;

        Ok(group)
    }

    /// Creates the (group, employee) assignment or replaces its role.
    #[instrument(skip(db))]
    pub async fn assign_employee(
        db: &PgPool,
        dto: AssignEmployeeDto,
    ) -> Result<AssignmentOutcome, AppError> {
        let mut conn = db.acquire().await?;

        if Self::find_group(&mut conn, dto.group_id).await?.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Group not found")));
        }
        ensure_employee_exists(&mut conn, dto.employee_id).await?;

        #[derive(sqlx::FromRow)]
        struct UpsertRow {
            #[sqlx(flatten)]
            assignment: GroupAssignment,
            inserted: bool,
        }

        let row = sqlx::query_as::<_, UpsertRow>(&format!(
            "INSERT INTO group_assignments (group_id, employee_id, role)
             VALUES ($1, $2, $3)
             ON CONFLICT (group_id, employee_id)
             DO UPDATE SET role = EXCLUDED.role, updated_at = NOW()
             RETURNING {}, (xmax = 0) AS inserted",
            ASSIGNMENT_COLUMNS
        ))
        .bind(dto.group_id)
        .bind(dto.employee_id)
        .bind(dto.role)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::not_found(anyhow::anyhow!("Group or employee not found"));
            }
            AppError::from(e)
        })?;

        Ok(AssignmentOutcome {
            assignment: row.assignment,
            created: row.inserted,
        })
    }

    #[instrument(skip(db))]
    pub async fn list_assignments(
        db: &PgPool,
        group_id: GroupId,
    ) -> Result<Vec<GroupAssignment>, AppError> {
        let mut conn = db.acquire().await?;
        if Self::find_group(&mut conn, group_id).await?.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Group not found")));
        }

        let assignments = sqlx::query_as::<_, GroupAssignment>(&format!(
            "SELECT {} FROM group_assignments WHERE group_id = $1 ORDER BY created_at",
            ASSIGNMENT_COLUMNS
        ))
        .bind(group_id)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to fetch group assignments")
        .map_err(AppError::database)?;

        Ok(assignments)
    }
}

async fn ensure_employee_exists(conn: &mut PgConnection, id: EmployeeId) -> Result<(), AppError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM employees WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await
            .context("Failed to check employee")
            .map_err(AppError::database)?;

    if !exists {
        return Err(AppError::not_found(anyhow::anyhow!("Employee not found")));
    }
    Ok(())
}

fn missing_program(e: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&e) {
        return AppError::not_found(anyhow::anyhow!("Educational program not found"));
    }
    AppError::from(e)
}
