//! Child registry models.
//!
//! A child belongs to exactly one group, has one or more guardians linked
//! through `parent_children`, and may carry medical notes.

use kinder_core::serde::deserialize_double_option;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::directory::Parent;
use crate::ids::{ChildId, GroupId, GuardianshipId, MedicalNoteId, ParentId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Child {
    pub id: ChildId,
    pub fname: String,
    pub lname: String,
    pub patronymic: Option<String>,
    /// `true` = male
    pub gender: bool,
    pub birthday: chrono::NaiveDate,
    pub group_id: GroupId,
    /// Date the child joined its current group
    pub transfer_date: chrono::NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct MedicalNote {
    pub id: MedicalNoteId,
    pub code: String,
    pub description: String,
    pub child_id: ChildId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Guardianship {
    pub id: GuardianshipId,
    pub parent_id: ParentId,
    pub child_id: ChildId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Child with its group name, medical notes and guardians resolved.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ChildDetail {
    #[serde(flatten)]
    pub child: Child,
    pub group_name: String,
    pub medical_notes: Vec<MedicalNote>,
    pub parents: Vec<Parent>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ChildData {
    #[validate(length(min = 1, max = 50))]
    pub fname: String,
    #[validate(length(min = 1, max = 50))]
    pub lname: String,
    #[validate(length(max = 50))]
    pub patronymic: Option<String>,
    pub gender: bool,
    pub birthday: chrono::NaiveDate,
    pub group_id: GroupId,
    pub transfer_date: chrono::NaiveDate,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct MedicalNoteData {
    #[validate(length(min = 1, max = 50, message = "Code must be 1-50 characters"))]
    pub code: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct AddChildDto {
    #[validate(nested)]
    pub child: ChildData,
    pub parent_id: ParentId,
    #[serde(default)]
    #[validate(nested)]
    pub medical_notes: Vec<MedicalNoteData>,
}

#[derive(Deserialize, Debug, Default, Validate, ToSchema)]
pub struct UpdateChildDto {
    #[validate(length(min = 1, max = 50))]
    pub fname: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub lname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[validate(length(max = 50))]
    #[schema(value_type = Option<String>)]
    pub patronymic: Option<Option<String>>,
    pub gender: Option<bool>,
    pub birthday: Option<chrono::NaiveDate>,
    pub group_id: Option<GroupId>,
    pub transfer_date: Option<chrono::NaiveDate>,
}

impl From<ChildData> for UpdateChildDto {
    fn from(data: ChildData) -> Self {
        Self {
            fname: Some(data.fname),
            lname: Some(data.lname),
            patronymic: Some(data.patronymic),
            gender: Some(data.gender),
            birthday: Some(data.birthday),
            group_id: Some(data.group_id),
            transfer_date: Some(data.transfer_date),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LinkParentDto {
    pub parent_id: ParentId,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct ChildFilterParams {
    /// Only children of this group
    #[param(value_type = Option<String>, format = "uuid")]
    pub group_id: Option<GroupId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add_child_json(notes: serde_json::Value) -> serde_json::Value {
        json!({
            "child": {
                "fname": "Masha",
                "lname": "Ivanova",
                "gender": false,
                "birthday": "2020-02-01",
                "group_id": GroupId::new(),
                "transfer_date": "2023-09-01"
            },
            "parent_id": ParentId::new(),
            "medical_notes": notes
        })
    }

    #[test]
    fn test_medical_notes_default_to_empty() {
        let mut value = add_child_json(json!([]));
        value.as_object_mut().unwrap().remove("medical_notes");
        let dto: AddChildDto = serde_json::from_value(value).unwrap();
        assert!(dto.medical_notes.is_empty());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_invalid_note_fails_whole_payload() {
        let dto: AddChildDto = serde_json::from_value(add_child_json(json!([
            { "code": "A1", "description": "Nut allergy" },
            { "code": "", "description": "Missing code" }
        ])))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.errors().contains_key("medical_notes"));
    }

    #[test]
    fn test_long_note_code_rejected() {
        let note = MedicalNoteData {
            code: "x".repeat(51),
            description: "too long".to_string(),
        };
        assert!(note.validate().is_err());
    }

    #[test]
    fn test_child_detail_flattens_child() {
        let child = Child {
            id: ChildId::new(),
            fname: "Masha".to_string(),
            lname: "Ivanova".to_string(),
            patronymic: None,
            gender: false,
            birthday: chrono::NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
            group_id: GroupId::new(),
            transfer_date: chrono::NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let detail = ChildDetail {
            child,
            group_name: "Sunflowers".to_string(),
            medical_notes: vec![],
            parents: vec![],
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["fname"], "Masha");
        assert_eq!(value["group_name"], "Sunflowers");
        assert!(value["parents"].as_array().unwrap().is_empty());
    }
}
