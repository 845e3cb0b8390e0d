use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use kinder_core::{AppError, ErrorResponse};
use kinder_models::children::{
    AddChildDto, ChildData, ChildDetail, ChildFilterParams, Guardianship, LinkParentDto,
    UpdateChildDto,
};
use kinder_models::ids::ChildId;
use tracing::instrument;

use super::service::ChildService;
use crate::middleware::auth::{RequireAdmin, RequireStaff};
use crate::state::AppState;
use crate::validator::{JsonBody, PathParam, QueryParams, ValidatedJson};

/// Add a child with its first guardian and medical notes
#[utoipa::path(
    post,
    path = "/api/child/add/",
    request_body = AddChildDto,
    responses(
        (status = 201, description = "Child created", body = ChildDetail),
        (status = 400, description = "Validation error or duplicate note code", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Group or parent not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Children"
)]
#[instrument(skip(state, dto))]
pub async fn add_child(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<AddChildDto>,
) -> Result<(StatusCode, Json<ChildDetail>), AppError> {
    let child = ChildService::add_child(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(child)))
}

#[utoipa::path(
    get,
    path = "/api/child/list/",
    params(ChildFilterParams),
    responses(
        (status = 200, description = "Children", body = Vec<ChildDetail>),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Children"
)]
#[instrument(skip(state))]
pub async fn list_children(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    QueryParams(filters): QueryParams<ChildFilterParams>,
) -> Result<Json<Vec<ChildDetail>>, AppError> {
    let children = ChildService::list_children(&state.db, filters).await?;
    Ok(Json(children))
}

#[utoipa::path(
    get,
    path = "/api/child/{id}/",
    params(("id" = String, Path, description = "Child ID")),
    responses(
        (status = 200, description = "Child with group, notes and guardians", body = ChildDetail),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Child not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Children"
)]
#[instrument(skip(state))]
pub async fn get_child(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    PathParam(id): PathParam<ChildId>,
) -> Result<Json<ChildDetail>, AppError> {
    let child = ChildService::get_child(&state.db, id).await?;
    Ok(Json(child))
}

#[utoipa::path(
    get,
    path = "/api/child/edit/{id}/",
    params(("id" = String, Path, description = "Child ID")),
    responses(
        (status = 200, description = "Child", body = ChildDetail),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Child not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Children"
)]
#[instrument(skip(state))]
pub async fn get_child_for_edit(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<ChildId>,
) -> Result<Json<ChildDetail>, AppError> {
    let child = ChildService::get_child(&state.db, id).await?;
    Ok(Json(child))
}

#[utoipa::path(
    put,
    path = "/api/child/edit/{id}/",
    params(("id" = String, Path, description = "Child ID")),
    request_body = ChildData,
    responses(
        (status = 200, description = "Child updated", body = ChildDetail),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Child or group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Children"
)]
#[instrument(skip(state, dto))]
pub async fn replace_child(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<ChildId>,
    ValidatedJson(dto): ValidatedJson<ChildData>,
) -> Result<Json<ChildDetail>, AppError> {
    let child = ChildService::update_child(&state.db, id, dto.into()).await?;
    Ok(Json(child))
}

#[utoipa::path(
    patch,
    path = "/api/child/edit/{id}/",
    params(("id" = String, Path, description = "Child ID")),
    request_body = UpdateChildDto,
    responses(
        (status = 200, description = "Child updated", body = ChildDetail),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Child or group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Children"
)]
#[instrument(skip(state, dto))]
pub async fn update_child(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<ChildId>,
    ValidatedJson(dto): ValidatedJson<UpdateChildDto>,
) -> Result<Json<ChildDetail>, AppError> {
    let child = ChildService::update_child(&state.db, id, dto).await?;
    Ok(Json(child))
}

/// Link another guardian to a child
#[utoipa::path(
    post,
    path = "/api/child/{id}/parents/",
    params(("id" = String, Path, description = "Child ID")),
    request_body = LinkParentDto,
    responses(
        (status = 201, description = "Guardian linked", body = Guardianship),
        (status = 400, description = "Already linked", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Child or parent not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Children"
)]
#[instrument(skip(state))]
pub async fn link_parent(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<ChildId>,
    JsonBody(dto): JsonBody<LinkParentDto>,
) -> Result<(StatusCode, Json<Guardianship>), AppError> {
    let link = ChildService::link_parent(&state.db, id, dto.parent_id).await?;
    Ok((StatusCode::CREATED, Json(link)))
}
