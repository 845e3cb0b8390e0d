use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use kinder_core::{AppError, ErrorResponse};
use kinder_models::ids::GroupId;
use kinder_models::registry::{
    AssignEmployeeDto, Group, GroupAssignment, GroupData, UpdateGroupDto,
};
use tracing::instrument;

use super::service::GroupService;
use crate::middleware::auth::{RequireAdmin, RequireStaff};
use crate::state::AppState;
use crate::validator::{JsonBody, PathParam, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/group/create/",
    request_body = GroupData,
    responses(
        (status = 201, description = "Group created", body = Group),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Educational program not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, dto))]
pub async fn create_group(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<GroupData>,
) -> Result<(StatusCode, Json<Group>), AppError> {
    let group = GroupService::create_group(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/group/list/",
    responses(
        (status = 200, description = "All groups", body = Vec<Group>),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state))]
pub async fn list_groups(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
) -> Result<Json<Vec<Group>>, AppError> {
    let groups = GroupService::list_groups(&state.db).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/group/{id}/",
    params(("id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group", body = Group),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state))]
pub async fn get_group(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    PathParam(id): PathParam<GroupId>,
) -> Result<Json<Group>, AppError> {
    let group = GroupService::get_group(&state.db, id).await?;
    Ok(Json(group))
}

#[utoipa::path(
    get,
    path = "/api/group/edit/{id}/",
    params(("id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group", body = Group),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state))]
pub async fn get_group_for_edit(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<GroupId>,
) -> Result<Json<Group>, AppError> {
    let group = GroupService::get_group(&state.db, id).await?;
    Ok(Json(group))
}

#[utoipa::path(
    put,
    path = "/api/group/edit/{id}/",
    params(("id" = String, Path, description = "Group ID")),
    request_body = GroupData,
    responses(
        (status = 200, description = "Group updated", body = Group),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Group or program not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, dto))]
pub async fn replace_group(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<GroupId>,
    ValidatedJson(dto): ValidatedJson<GroupData>,
) -> Result<Json<Group>, AppError> {
    let group = GroupService::update_group(&state.db, id, dto.into()).await?;
    Ok(Json(group))
}

#[utoipa::path(
    patch,
    path = "/api/group/edit/{id}/",
    params(("id" = String, Path, description = "Group ID")),
    request_body = UpdateGroupDto,
    responses(
        (status = 200, description = "Group updated", body = Group),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Group or program not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, dto))]
pub async fn update_group(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<GroupId>,
    ValidatedJson(dto): ValidatedJson<UpdateGroupDto>,
) -> Result<Json<Group>, AppError> {
    let group = GroupService::update_group(&state.db, id, dto).await?;
    Ok(Json(group))
}

/// Assign an employee to a group, or change the role of an existing assignment
#[utoipa::path(
    post,
    path = "/api/group/role/",
    request_body = AssignEmployeeDto,
    responses(
        (status = 201, description = "Assignment created", body = GroupAssignment),
        (status = 200, description = "Assignment role replaced", body = GroupAssignment),
        (status = 400, description = "Invalid role", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Group or employee not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state))]
pub async fn assign_employee(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    JsonBody(dto): JsonBody<AssignEmployeeDto>,
) -> Result<(StatusCode, Json<GroupAssignment>), AppError> {
    let outcome = GroupService::assign_employee(&state.db, dto).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.assignment)))
}

#[utoipa::path(
    get,
    path = "/api/group/{id}/employees/",
    params(("id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Assignments of the group", body = Vec<GroupAssignment>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state))]
pub async fn list_group_employees(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    PathParam(id): PathParam<GroupId>,
) -> Result<Json<Vec<GroupAssignment>>, AppError> {
    let assignments = GroupService::list_assignments(&state.db, id).await?;
    Ok(Json(assignments))
}
