//! Educational program and group models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::enums::{AgeGroup, Qualification};
use crate::ids::{AssignmentId, EmployeeId, GroupId, ProgramId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct EducationalProgram {
    pub id: ProgramId,
    pub description: String,
    /// Minimum age (years) of the children the program targets
    pub age_category_children: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct CreateProgramDto {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(range(min = 0, message = "Age category cannot be negative"))]
    pub age_category_children: i32,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub age_group: AgeGroup,
    pub count_children: i32,
    pub educational_program_id: ProgramId,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Full set of group fields. Used for creation and `PUT`.
///
/// `count_children` is maintained by the child registry and is not writable.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct GroupData {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    pub age_group: AgeGroup,
    pub educational_program_id: ProgramId,
}

#[derive(Deserialize, Debug, Default, Validate, ToSchema)]
pub struct UpdateGroupDto {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    pub age_group: Option<AgeGroup>,
    pub educational_program_id: Option<ProgramId>,
}

impl From<GroupData> for UpdateGroupDto {
    fn from(data: GroupData) -> Self {
        Self {
            name: Some(data.name),
            age_group: Some(data.age_group),
            educational_program_id: Some(data.educational_program_id),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct AssignEmployeeDto {
    pub group_id: GroupId,
    pub employee_id: EmployeeId,
    pub role: Qualification,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct GroupAssignment {
    pub id: AssignmentId,
    pub group_id: GroupId,
    pub employee_id: EmployeeId,
    pub role: Qualification,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_program_validation() {
        let valid = CreateProgramDto {
            description: "Early literacy".to_string(),
            age_category_children: 3,
        };
        assert!(valid.validate().is_ok());

        let negative = CreateProgramDto {
            description: "Early literacy".to_string(),
            age_category_children: -1,
        };
        assert!(negative.validate().is_err());

        let empty = CreateProgramDto {
            description: String::new(),
            age_category_children: 3,
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_group_data_rejects_unknown_age_group() {
        let result = serde_json::from_value::<GroupData>(json!({
            "name": "Sunflowers",
            "age_group": "toddler",
            "educational_program_id": ProgramId::new()
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_group_data_ignores_counter() {
        let data: GroupData = serde_json::from_value(json!({
            "name": "Sunflowers",
            "age_group": "Младшая",
            "count_children": 99,
            "educational_program_id": ProgramId::new()
        }))
        .unwrap();
        assert_eq!(data.age_group, AgeGroup::Junior);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_assign_rejects_invalid_role() {
        let result = serde_json::from_value::<AssignEmployeeDto>(json!({
            "group_id": GroupId::new(),
            "employee_id": EmployeeId::new(),
            "role": "janitor"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_group_partial() {
        let dto: UpdateGroupDto = serde_json::from_value(json!({ "name": "" })).unwrap();
        assert!(dto.validate().is_err());
        assert!(dto.age_group.is_none());
    }
}
