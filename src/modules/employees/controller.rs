use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use kinder_core::{AppError, ErrorResponse};
use kinder_models::directory::{AddEmployeeDto, EmployeeData, EmployeeProfile, UpdateEmployeeDto};
use kinder_models::ids::{EmployeeId, UserId};
use tracing::instrument;

use super::service::EmployeeService;
use crate::middleware::auth::{RequireAdmin, RequireStaff};
use crate::state::AppState;
use crate::validator::{PathParam, ValidatedJson};

/// Create an employee identity together with its profile
#[utoipa::path(
    post,
    path = "/api/employee/add/",
    request_body = AddEmployeeDto,
    responses(
        (status = 201, description = "Employee created", body = EmployeeProfile),
        (status = 400, description = "Validation error or duplicate value", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
#[instrument(skip(state, dto))]
pub async fn add_employee(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<AddEmployeeDto>,
) -> Result<(StatusCode, Json<EmployeeProfile>), AppError> {
    let profile = EmployeeService::add_employee(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[utoipa::path(
    get,
    path = "/api/employee/list/",
    responses(
        (status = 200, description = "All employees", body = Vec<EmployeeProfile>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
#[instrument(skip(state))]
pub async fn list_employees(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
) -> Result<Json<Vec<EmployeeProfile>>, AppError> {
    let employees = EmployeeService::list_employees(&state.db).await?;
    Ok(Json(employees))
}

/// Employee profile bound to an identity
#[utoipa::path(
    get,
    path = "/api/employee/list/{user_id}/",
    params(("user_id" = String, Path, description = "Identity ID")),
    responses(
        (status = 200, description = "Employee profile", body = EmployeeProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "No employee profile for this identity", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
#[instrument(skip(state))]
pub async fn get_employee_by_user(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    PathParam(user_id): PathParam<UserId>,
) -> Result<Json<EmployeeProfile>, AppError> {
    let profile = EmployeeService::get_employee_by_user(&state.db, user_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/employee/edit/{id}/",
    params(("id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee profile", body = EmployeeProfile),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
#[instrument(skip(state))]
pub async fn get_employee(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<EmployeeId>,
) -> Result<Json<EmployeeProfile>, AppError> {
    let profile = EmployeeService::get_employee(&state.db, id).await?;
    Ok(Json(profile))
}

/// Replace every profile field
#[utoipa::path(
    put,
    path = "/api/employee/edit/{id}/",
    params(("id" = String, Path, description = "Employee ID")),
    request_body = EmployeeData,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeProfile),
        (status = 400, description = "Validation error or duplicate value", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
#[instrument(skip(state, dto))]
pub async fn replace_employee(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<EmployeeId>,
    ValidatedJson(dto): ValidatedJson<EmployeeData>,
) -> Result<Json<EmployeeProfile>, AppError> {
    let profile = EmployeeService::update_employee(&state.db, id, dto.into()).await?;
    Ok(Json(profile))
}

/// Update only the supplied fields
#[utoipa::path(
    patch,
    path = "/api/employee/edit/{id}/",
    params(("id" = String, Path, description = "Employee ID")),
    request_body = UpdateEmployeeDto,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeProfile),
        (status = 400, description = "Validation error or duplicate value", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
#[instrument(skip(state, dto))]
pub async fn update_employee(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    PathParam(id): PathParam<EmployeeId>,
    ValidatedJson(dto): ValidatedJson<UpdateEmployeeDto>,
) -> Result<Json<EmployeeProfile>, AppError> {
    let profile = EmployeeService::update_employee(&state.db, id, dto).await?;
    Ok(Json(profile))
}
