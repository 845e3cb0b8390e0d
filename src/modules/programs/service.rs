use anyhow::Context;
use kinder_core::AppError;
use kinder_models::ids::ProgramId;
use kinder_models::registry::{CreateProgramDto, EducationalProgram};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

const PROGRAM_COLUMNS: &str = "id, description, age_category_children, created_at, updated_at";

pub struct ProgramService;

impl ProgramService {
    #[instrument(skip(db, dto))]
    pub async fn create_program(
        db: &PgPool,
        dto: CreateProgramDto,
    ) -> Result<EducationalProgram, AppError> {
        let program = sqlx::query_as::<_, EducationalProgram>(&format!(
            "INSERT INTO educational_programs (description, age_category_children)
             VALUES ($1, $2)
             RETURNING {}",
            PROGRAM_COLUMNS
        ))
        .bind(&dto.description)
        .bind(dto.age_category_children)
        .fetch_one(db)
        .await
        .context("Failed to insert educational program")
        .map_err(AppError::database)?;

        Ok(program)
    }

    #[instrument(skip(db))]
    pub async fn list_programs(db: &PgPool) -> Result<Vec<EducationalProgram>, AppError> {
        let programs = sqlx::query_as::<_, EducationalProgram>(&format!(
            "SELECT {} FROM educational_programs ORDER BY created_at",
            PROGRAM_COLUMNS
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch educational programs")
        .map_err(AppError::database)?;

        Ok(programs)
    }

    #[instrument(skip(db))]
    pub async fn get_program(db: &PgPool, id: ProgramId) -> Result<EducationalProgram, AppError> {
        sqlx::query_as::<_, EducationalProgram>(&format!(
            "SELECT {} FROM educational_programs WHERE id = $1",
            PROGRAM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch educational program")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Educational program not found")))
    }

    /// 404 unless the program exists.
    pub async fn ensure_exists(conn: &mut PgConnection, id: ProgramId) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM educational_programs WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(conn)
        .await
        .context("Failed to check educational program")
        .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Educational program not found"
            )));
        }
        Ok(())
    }
}
