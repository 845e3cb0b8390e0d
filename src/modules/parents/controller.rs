use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use kinder_core::{AppError, ErrorResponse};
use kinder_models::children::ChildDetail;
use kinder_models::directory::{AddParentDto, ParentData, ParentProfile, UpdateParentDto};
use kinder_models::ids::{ParentId, UserId};
use tracing::instrument;

use super::service::ParentService;
use crate::middleware::auth::{RequireAdmin, RequireParent, RequireStaff};
use crate::modules::children::service::ChildService;
use crate::state::AppState;
use crate::validator::{PathParam, ValidatedJson};

/// Create a parent identity together with its profile
#[utoipa::path(
    post,
    path = "/api/parent/add/",
    request_body = AddParentDto,
    responses(
        (status = 201, description = "Parent created", body = ParentProfile),
        (status = 400, description = "Validation error or duplicate value", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state, dto))]
pub async fn add_parent(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<AddParentDto>,
) -> Result<(StatusCode, Json<ParentProfile>), AppError> {
    let profile = ParentService::add_parent(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[utoipa::path(
    get,
    path = "/api/parent/list/",
    responses(
        (status = 200, description = "All parents", body = Vec<ParentProfile>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn list_parents(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
) -> Result<Json<Vec<ParentProfile>>, AppError> {
    let parents = ParentService::list_parents(&state.db).await?;
    Ok(Json(parents))
}

/// Parent profile bound to an identity
#[utoipa::path(
    get,
    path = "/api/parent/list/{user_id}/",
    params(("user_id" = String, Path, description = "Identity ID")),
    responses(
        (status = 200, description = "Parent profile", body = ParentProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "No parent profile for this identity", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_parent_by_user(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    PathParam(user_id): PathParam<UserId>,
) -> Result<Json<ParentProfile>, AppError> {
    let profile = ParentService::get_parent_by_user(&state.db, user_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/parent/edit/{id}/",
    params(("id" = String, Path, description = "Parent ID")),
    responses(
        (status = 200, description = "Parent profile", body = ParentProfile),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_parent(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<ParentId>,
) -> Result<Json<ParentProfile>, AppError> {
    let profile = ParentService::get_parent(&state.db, id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/parent/edit/{id}/",
    params(("id" = String, Path, description = "Parent ID")),
    request_body = ParentData,
    responses(
        (status = 200, description = "Parent updated", body = ParentProfile),
        (status = 400, description = "Validation error or duplicate value", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state, dto))]
pub async fn replace_parent(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<ParentId>,
    ValidatedJson(dto): ValidatedJson<ParentData>,
) -> Result<Json<ParentProfile>, AppError> {
    let profile = ParentService::update_parent(&state.db, id, dto.into()).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    patch,
    path = "/api/parent/edit/{id}/",
    params(("id" = String, Path, description = "Parent ID")),
    request_body = UpdateParentDto,
    responses(
        (status = 200, description = "Parent updated", body = ParentProfile),
        (status = 400, description = "Validation error or duplicate value", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state, dto))]
pub async fn update_parent(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<ParentId>,
    ValidatedJson(dto): ValidatedJson<UpdateParentDto>,
) -> Result<Json<ParentProfile>, AppError> {
    let profile = ParentService::update_parent(&state.db, id, dto).await?;
    Ok(Json(profile))
}

/// The calling parent's own profile
#[utoipa::path(
    get,
    path = "/api/parent/me/",
    responses(
        (status = 200, description = "Own parent profile", body = ParentProfile),
        (status = 403, description = "Forbidden - Parent only", body = ErrorResponse),
        (status = 404, description = "No parent profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_my_profile(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
) -> Result<Json<ParentProfile>, AppError> {
    let profile = ParentService::get_parent_by_user(&state.db, auth_user.user_id()?).await?;
    Ok(Json(profile))
}

/// Children linked to the calling parent
#[utoipa::path(
    get,
    path = "/api/parent/children/",
    responses(
        (status = 200, description = "Own children", body = Vec<ChildDetail>),
        (status = 403, description = "Forbidden - Parent only", body = ErrorResponse),
        (status = 404, description = "No parent profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_my_children(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
) -> Result<Json<Vec<ChildDetail>>, AppError> {
    let parent = ParentService::find_by_user_id(&state.db, auth_user.user_id()?)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No parent profile for this user")))?;

    let children = ChildService::children_of_parent(&state.db, parent.id).await?;
    Ok(Json(children))
}
