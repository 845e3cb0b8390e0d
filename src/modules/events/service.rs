use anyhow::Context;
use kinder_core::AppError;
use kinder_db::{is_foreign_key_violation, is_unique_violation, violated_constraint};
use kinder_models::events::{
    CreateEventDto, EnrollChildDto, Event, EventParticipant, ProgramEvent, UpdateEventDto,
};
use kinder_models::ids::{EventId, ProgramId, UserId};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use crate::metrics::track_child_enrolled;
use crate::modules::children::service::ChildService;
use crate::modules::employees::service::EmployeeService;
use crate::modules::parents::service::ParentService;
use crate::modules::programs::service::ProgramService;

const EVENT_COLUMNS: &str =
    "id, name, date_event, employee_id, count_participants, created_at, updated_at";

pub struct EventService;

impl EventService {
    /// Creates an event organized by the calling employee and links it to
    /// its first program.
    #[instrument(skip(db, dto), fields(name = %dto.name))]
    pub async fn create_event(
        db: &PgPool,
        caller: UserId,
        dto: CreateEventDto,
    ) -> Result<Event, AppError> {
        let employee = EmployeeService::find_by_user_id(db, caller)
            .await?
            .ok_or_else(|| {
                AppError::forbidden("Only users with an employee profile can create events".to_string())
            })?;

        let mut tx = db.begin().await?;

        ProgramService::ensure_exists(&mut tx, dto.program_id).await?;

        let event = sqlx::query_as::<_, Event>(&format!(
            "INSERT INTO events (name, date_event, employee_id)
             VALUES ($1, $2, $3)
             RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(&dto.name)
        .bind(dto.date_event)
        .bind(employee.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(event_conflict)?;

        insert_program_link(&mut tx, dto.program_id, event.id).await?;

        tx.commit().await?;

        Ok(event)
    }

    #[instrument(skip(db))]
    pub async fn list_by_program(
        db: &PgPool,
        program_id: ProgramId,
    ) -> Result<Vec<Event>, AppError> {
        let mut conn = db.acquire().await?;
        ProgramService::ensure_exists(&mut conn, program_id).await?;

        let events = sqlx::query_as::<_, Event>(
            "SELECT e.id, e.name, e.date_event, e.employee_id, e.count_participants,
                    e.created_at, e.updated_at
             FROM events e
             JOIN program_events pe ON pe.event_id = e.id
             WHERE pe.educational_program_id = $1
             ORDER BY e.date_event",
        )
        .bind(program_id)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to fetch events by program")
        .map_err(AppError::database)?;

        Ok(events)
    }

    /// Events reachable from the caller's children through their groups'
    /// programs, without duplicates.
    #[instrument(skip(db))]
    pub async fn events_for_parent(db: &PgPool, caller: UserId) -> Result<Vec<Event>, AppError> {
        let parent = ParentService::find_by_user_id(db, caller)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No parent profile for this user")))?;

        let has_children = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM parent_children WHERE parent_id = $1)",
        )
        .bind(parent.id)
        .fetch_one(db)
        .await
        .context("Failed to check children of parent")
        .map_err(AppError::database)?;

        if !has_children {
            return Err(AppError::not_found(anyhow::anyhow!(
                "No children linked to this parent"
            )));
        }

        let events = sqlx::query_as::<_, Event>(
            "SELECT DISTINCT e.id, e.name, e.date_event, e.employee_id, e.count_participants,
                    e.created_at, e.updated_at
             FROM parent_children pc
             JOIN children c ON c.id = pc.child_id
             JOIN child_groups g ON g.id = c.group_id
             JOIN program_events pe ON pe.educational_program_id = g.educational_program_id
             JOIN events e ON e.id = pe.event_id
             WHERE pc.parent_id = $1
             ORDER BY e.date_event, e.id",
        )
        .bind(parent.id)
        .fetch_all(db)
        .await
        .context("Failed to fetch events for parent")
        .map_err(AppError::database)?;

        if events.is_empty() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "No events found for this parent's children"
            )));
        }

        Ok(events)
    }

    #[instrument(skip(db))]
    pub async fn get_event(db: &PgPool, id: EventId) -> Result<Event, AppError> {
        let mut conn = db.acquire().await?;
        find_event(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Event not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_event(
        db: &PgPool,
        id: EventId,
        dto: UpdateEventDto,
    ) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET
                name = COALESCE($2, name),
                date_event = COALESCE($3, date_event),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(dto.date_event)
        .fetch_optional(db)
        .await
        .map_err(event_conflict)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Event not found")))
    }

    #[instrument(skip(db))]
    pub async fn link_program(
        db: &PgPool,
        event_id: EventId,
        program_id: ProgramId,
    ) -> Result<ProgramEvent, AppError> {
        let mut conn = db.acquire().await?;

        if find_event(&mut conn, event_id).await?.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Event not found")));
        }
        ProgramService::ensure_exists(&mut conn, program_id).await?;

        insert_program_link(&mut conn, program_id, event_id).await
    }

    /// Enrolls one of the caller's children in an event.
    ///
    /// Checks run in order: the child must be the caller's (403), the event
    /// must exist (404), and the child must not already be enrolled (400).
    #[instrument(skip(db))]
    pub async fn enroll_child(
        db: &PgPool,
        caller: UserId,
        event_id: EventId,
        dto: EnrollChildDto,
    ) -> Result<EventParticipant, AppError> {
        let not_yours = || AppError::forbidden("You can only enroll your own children".to_string());

        let parent = ParentService::find_by_user_id(db, caller)
            .await?
            .ok_or_else(not_yours)?;

        let mut tx = db.begin().await?;

        if !ChildService::is_guardian(&mut tx, parent.id, dto.child_id).await? {
            return Err(not_yours());
        }

        if find_event(&mut tx, event_id).await?.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Event not found")));
        }

        let already_enrolled = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM event_participants WHERE event_id = $1 AND child_id = $2)",
        )
        .bind(event_id)
        .bind(dto.child_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_enrolled {
            return Err(already_enrolled_error());
        }

        let participant = sqlx::query_as::<_, EventParticipant>(
            "INSERT INTO event_participants (event_id, child_id)
             VALUES ($1, $2)
             RETURNING id, event_id, child_id, created_at",
        )
        .bind(event_id)
        .bind(dto.child_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return already_enrolled_error();
            }
            AppError::from(e)
        })?;

        sqlx::query(
            "UPDATE events
             SET count_participants = count_participants + 1, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        track_child_enrolled();
        Ok(participant)
    }

    #[instrument(skip(db))]
    pub async fn list_participants(
        db: &PgPool,
        event_id: EventId,
    ) -> Result<Vec<EventParticipant>, AppError> {
        let mut conn = db.acquire().await?;
        if find_event(&mut conn, event_id).await?.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Event not found")));
        }

        let participants = sqlx::query_as::<_, EventParticipant>(
            "SELECT id, event_id, child_id, created_at
             FROM event_participants WHERE event_id = $1 ORDER BY created_at",
        )
        .bind(event_id)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to fetch event participants")
        .map_err(AppError::database)?;

        Ok(participants)
    }
}

async fn find_event(conn: &mut PgConnection, id: EventId) -> Result<Option<Event>, AppError> {
    let event = sqlx::query_as::<_, Event>(&format!(
        "SELECT {} FROM events WHERE id = $1",
        EVENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
    .context("Failed to fetch event")
    .map_err(AppError::database)?;

    Ok(event)
}

async fn insert_program_link(
    conn: &mut PgConnection,
    program_id: ProgramId,
    event_id: EventId,
) -> Result<ProgramEvent, AppError> {
    sqlx::query_as::<_, ProgramEvent>(
        "INSERT INTO program_events (educational_program_id, event_id)
         VALUES ($1, $2)
         RETURNING id, educational_program_id, event_id, created_at",
    )
    .bind(program_id)
    .bind(event_id)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            return AppError::field("program_id", "Event is already linked to this program");
        }
        if is_foreign_key_violation(&e) {
            return AppError::not_found(anyhow::anyhow!("Event or program not found"));
        }
        AppError::from(e)
    })
}

fn already_enrolled_error() -> AppError {
    AppError::field("child_id", "Child is already enrolled in this event")
}

fn event_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) && violated_constraint(&e) == Some("events_name_key") {
        return AppError::field("name", "An event with this name already exists");
    }
    AppError::from(e)
}
