//! Event models: events, their program links and participant rosters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ChildId, EmployeeId, EventId, ParticipantId, ProgramEventId, ProgramId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub date_event: chrono::DateTime<chrono::Utc>,
    /// Organizing employee
    pub employee_id: EmployeeId,
    pub count_participants: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Create an event and link it to its first program.
///
/// The organizer is the calling employee, never taken from the body.
#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
    pub date_event: chrono::DateTime<chrono::Utc>,
    pub program_id: ProgramId,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct EventData {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
    pub date_event: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Default, Validate, ToSchema)]
pub struct UpdateEventDto {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: Option<String>,
    pub date_event: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<EventData> for UpdateEventDto {
    fn from(data: EventData) -> Self {
        Self {
            name: Some(data.name),
            date_event: Some(data.date_event),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LinkProgramDto {
    pub program_id: ProgramId,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ProgramEvent {
    pub id: ProgramEventId,
    pub educational_program_id: ProgramId,
    pub event_id: EventId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct EnrollChildDto {
    pub child_id: ChildId,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct EventParticipant {
    pub id: ParticipantId,
    pub event_id: EventId,
    pub child_id: ChildId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_event_parses_timestamp() {
        let dto: CreateEventDto = serde_json::from_value(json!({
            "name": "Autumn fair",
            "date_event": "2025-10-01T10:00:00Z",
            "program_id": ProgramId::new()
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.date_event.to_rfc3339(), "2025-10-01T10:00:00+00:00");
    }

    #[test]
    fn test_event_name_length() {
        let dto = EventData {
            name: "x".repeat(51),
            date_event: chrono::Utc::now(),
        };
        assert!(dto.validate().is_err());

        let empty = UpdateEventDto {
            name: Some(String::new()),
            date_event: None,
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_enroll_requires_child_id() {
        assert!(serde_json::from_value::<EnrollChildDto>(json!({})).is_err());
    }
}
