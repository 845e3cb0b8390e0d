use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use kinder_core::{AppError, ErrorResponse};
use kinder_models::events::{
    CreateEventDto, EnrollChildDto, Event, EventData, EventParticipant, LinkProgramDto,
    ProgramEvent, UpdateEventDto,
};
use kinder_models::ids::{EventId, ProgramId};
use tracing::instrument;

use super::service::EventService;
use crate::middleware::auth::{
    RequireAnyRole, RequireEmployee, RequireParent, RequireStaff,
};
use crate::state::AppState;
use crate::validator::{JsonBody, PathParam, ValidatedJson};

/// Create an event organized by the caller and link it to a program
#[utoipa::path(
    post,
    path = "/api/event/add/",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse),
        (status = 403, description = "Forbidden - caller has no employee profile", body = ErrorResponse),
        (status = 404, description = "Educational program not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state, dto))]
pub async fn create_event(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateEventDto>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let event = EventService::create_event(&state.db, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/api/event/list/{program_id}/",
    params(("program_id" = String, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Events linked to the program", body = Vec<Event>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Educational program not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn list_events_by_program(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    PathParam(program_id): PathParam<ProgramId>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = EventService::list_by_program(&state.db, program_id).await?;
    Ok(Json(events))
}

/// Events available to the calling parent's children
#[utoipa::path(
    get,
    path = "/api/event/my_children/",
    responses(
        (status = 200, description = "Events ordered by date", body = Vec<Event>),
        (status = 403, description = "Forbidden - Parent only", body = ErrorResponse),
        (status = 404, description = "No parent profile, children or events", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn events_for_my_children(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = EventService::events_for_parent(&state.db, auth_user.user_id()?).await?;
    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/api/event/{id}/",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event", body = Event),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    RequireAnyRole(_auth_user): RequireAnyRole,
    PathParam(id): PathParam<EventId>,
) -> Result<Json<Event>, AppError> {
    let event = EventService::get_event(&state.db, id).await?;
    Ok(Json(event))
}

#[utoipa::path(
    get,
    path = "/api/event/edit/{id}/",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event", body = Event),
        (status = 403, description = "Forbidden - Employee only", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn get_event_for_edit(
    State(state): State<AppState>,
    RequireEmployee(_auth_user): RequireEmployee,
    PathParam(id): PathParam<EventId>,
) -> Result<Json<Event>, AppError> {
    let event = EventService::get_event(&state.db, id).await?;
    Ok(Json(event))
}

#[utoipa::path(
    put,
    path = "/api/event/edit/{id}/",
    params(("id" = String, Path, description = "Event ID")),
    request_body = EventData,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse),
        (status = 403, description = "Forbidden - Employee only", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state, dto))]
pub async fn replace_event(
    State(state): State<AppState>,
    RequireEmployee(_auth_user): RequireEmployee,
    PathParam(id): PathParam<EventId>,
    ValidatedJson(dto): ValidatedJson<EventData>,
) -> Result<Json<Event>, AppError> {
    let event = EventService::update_event(&state.db, id, dto.into()).await?;
    Ok(Json(event))
}

#[utoipa::path(
    patch,
    path = "/api/event/edit/{id}/",
    params(("id" = String, Path, description = "Event ID")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse),
        (status = 403, description = "Forbidden - Employee only", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state, dto))]
pub async fn update_event(
    State(state): State<AppState>,
    RequireEmployee(_auth_user): RequireEmployee,
    PathParam(id): PathParam<EventId>,
    ValidatedJson(dto): ValidatedJson<UpdateEventDto>,
) -> Result<Json<Event>, AppError> {
    let event = EventService::update_event(&state.db, id, dto).await?;
    Ok(Json(event))
}

/// Link an event to another educational program
#[utoipa::path(
    post,
    path = "/api/event/{id}/programs/",
    params(("id" = String, Path, description = "Event ID")),
    request_body = LinkProgramDto,
    responses(
        (status = 201, description = "Program linked", body = ProgramEvent),
        (status = 400, description = "Already linked", body = ErrorResponse),
        (status = 403, description = "Forbidden - Employee only", body = ErrorResponse),
        (status = 404, description = "Event or program not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn link_program(
    State(state): State<AppState>,
    RequireEmployee(_auth_user): RequireEmployee,
    PathParam(id): PathParam<EventId>,
    JsonBody(dto): JsonBody<LinkProgramDto>,
) -> Result<(StatusCode, Json<ProgramEvent>), AppError> {
    let link = EventService::link_program(&state.db, id, dto.program_id).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

#[utoipa::path(
    get,
    path = "/api/event/{id}/participants/",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event roster", body = Vec<EventParticipant>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn list_participants(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    PathParam(id): PathParam<EventId>,
) -> Result<Json<Vec<EventParticipant>>, AppError> {
    let participants = EventService::list_participants(&state.db, id).await?;
    Ok(Json(participants))
}

/// Enroll one of the caller's children in an event
#[utoipa::path(
    post,
    path = "/api/event/{id}/participants/",
    params(("id" = String, Path, description = "Event ID")),
    request_body = EnrollChildDto,
    responses(
        (status = 201, description = "Child enrolled", body = EventParticipant),
        (status = 400, description = "Child already enrolled", body = ErrorResponse),
        (status = 403, description = "Child is not linked to the caller", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn enroll_child(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
    PathParam(id): PathParam<EventId>,
    JsonBody(dto): JsonBody<EnrollChildDto>,
) -> Result<(StatusCode, Json<EventParticipant>), AppError> {
    let participant =
        EventService::enroll_child(&state.db, auth_user.user_id()?, id, dto).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}
