use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use kinder_core::{AppError, ErrorResponse};
use kinder_models::ids::ProgramId;
use kinder_models::registry::{CreateProgramDto, EducationalProgram};
use tracing::instrument;

use super::service::ProgramService;
use crate::middleware::auth::{RequireAnyRole, RequireEmployee, RequireStaff};
use crate::state::AppState;
use crate::validator::{PathParam, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/education_program/create/",
    request_body = CreateProgramDto,
    responses(
        (status = 201, description = "Program created", body = EducationalProgram),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Employee only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Educational Programs"
)]
#[instrument(skip(state, dto))]
pub async fn create_program(
    State(state): State<AppState>,
    RequireEmployee(_auth_user): RequireEmployee,
    ValidatedJson(dto): ValidatedJson<CreateProgramDto>,
) -> Result<(StatusCode, Json<EducationalProgram>), AppError> {
    let program = ProgramService::create_program(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(program)))
}

#[utoipa::path(
    get,
    path = "/api/education_program/list/",
    responses(
        (status = 200, description = "All programs", body = Vec<EducationalProgram>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Educational Programs"
)]
#[instrument(skip(state))]
pub async fn list_programs(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
) -> Result<Json<Vec<EducationalProgram>>, AppError> {
    let programs = ProgramService::list_programs(&state.db).await?;
    Ok(Json(programs))
}

#[utoipa::path(
    get,
    path = "/api/education_program/{id}/",
    params(("id" = String, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Program", body = EducationalProgram),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Program not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Educational Programs"
)]
#[instrument(skip(state))]
pub async fn get_program(
    State(state): State<AppState>,
    RequireAnyRole(_auth_user): RequireAnyRole,
    PathParam(id): PathParam<ProgramId>,
) -> Result<Json<EducationalProgram>, AppError> {
    let program = ProgramService::get_program(&state.db, id).await?;
    Ok(Json(program))
}
