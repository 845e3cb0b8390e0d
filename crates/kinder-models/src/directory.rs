//! Employee and parent profile models.
//!
//! A profile is the role-specific attribute set bound 1:1 to an identity.
//! Both profile kinds share the same phone number range.

use kinder_core::serde::deserialize_double_option;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::enums::Qualification;
use crate::ids::{EmployeeId, ParentId, UserId};
use crate::users::{NewIdentityDto, User};

pub const PHONE_MIN: i64 = 80_000_000_000;
pub const PHONE_MAX: i64 = 89_999_999_999;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Employee {
    pub id: EmployeeId,
    pub user_id: UserId,
    pub fname: String,
    pub lname: String,
    pub patronymic: Option<String>,
    /// `true` = male
    pub gender: bool,
    pub birthday: chrono::NaiveDate,
    pub phone_number: i64,
    pub qualification: Qualification,
    /// Years of experience
    pub work_experience: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Employee together with its identity.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct EmployeeProfile {
    #[serde(flatten)]
    pub employee: Employee,
    pub user: User,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Parent {
    pub id: ParentId,
    pub user_id: UserId,
    pub fname: String,
    pub lname: String,
    pub patronymic: Option<String>,
    pub phone_number: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Parent together with its identity.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ParentProfile {
    #[serde(flatten)]
    pub parent: Parent,
    pub user: User,
}

/// Full set of employee profile fields. Used for creation and `PUT`.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct EmployeeData {
    #[validate(length(min = 1, max = 50))]
    pub fname: String,
    #[validate(length(min = 1, max = 50))]
    pub lname: String,
    #[validate(length(max = 50))]
    pub patronymic: Option<String>,
    pub gender: bool,
    pub birthday: chrono::NaiveDate,
    #[validate(range(
        min = PHONE_MIN,
        max = PHONE_MAX,
        message = "Phone number must be an 11-digit number starting with 8"
    ))]
    pub phone_number: i64,
    pub qualification: Qualification,
    #[validate(range(min = 0, message = "Work experience cannot be negative"))]
    pub work_experience: i32,
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct AddEmployeeDto {
    #[validate(nested)]
    pub user: NewIdentityDto,
    #[validate(nested)]
    pub employee: EmployeeData,
}

/// Partial employee update (`PATCH`). Absent fields keep their value.
#[derive(Deserialize, Debug, Default, Validate, ToSchema)]
pub struct UpdateEmployeeDto {
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
    #[validate(range(
        min = PHONE_MIN,
        max = PHONE_MAX,
        message = "Phone number must be an 11-digit number starting with 8"
    ))]
    pub phone_number: Option<i64>,
    pub qualification: Option<Qualification>,
    #[validate(range(min = 0, message = "Work experience cannot be negative"))]
    pub work_experience: Option<i32>,
}

impl From<EmployeeData> for UpdateEmployeeDto {
    fn from(data: EmployeeData) -> Self {
        Self {
            fname: Some(data.fname),
            lname: Some(data.lname),
            patronymic: Some(data.patronymic),
            gender: Some(data.gender),
            birthday: Some(data.birthday),
            phone_number: Some(data.phone_number),
            qualification: Some(data.qualification),
            work_experience: Some(data.work_experience),
        }
    }
}

/// Full set of parent profile fields. Used for creation and `PUT`.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ParentData {
    #[validate(length(min = 1, max = 50))]
    pub fname: String,
    #[validate(length(min = 1, max = 50))]
    pub lname: String,
    #[validate(length(max = 50))]
    pub patronymic: Option<String>,
    #[validate(range(
        min = PHONE_MIN,
        max = PHONE_MAX,
        message = "Phone number must be an 11-digit number starting with 8"
    ))]
    pub phone_number: i64,
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct AddParentDto {
    #[validate(nested)]
    pub user: NewIdentityDto,
    #[validate(nested)]
    pub parent: ParentData,
}

#[derive(Deserialize, Debug, Default, Validate, ToSchema)]
pub struct UpdateParentDto {
    #[validate(length(min = 1, max = 50))]
    pub fname: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub lname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[validate(length(max = 50))]
    #[schema(value_type = Option<String>)]
    pub patronymic: Option<Option<String>>,
    #[validate(range(
        min = PHONE_MIN,
        max = PHONE_MAX,
        message = "Phone number must be an 11-digit number starting with 8"
    ))]
    pub phone_number: Option<i64>,
}

impl From<ParentData> for UpdateParentDto {
    fn from(data: ParentData) -> Self {
        Self {
            fname: Some(data.fname),
            lname: Some(data.lname),
            patronymic: Some(data.patronymic),
            phone_number: Some(data.phone_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn employee_json() -> serde_json::Value {
        json!({
            "fname": "Anna",
            "lname": "Petrova",
            "gender": false,
            "birthday": "1990-04-12",
            "phone_number": 89001234567_i64,
            "qualification": "teacher",
            "work_experience": 5
        })
    }

    #[test]
    fn test_employee_data_valid() {
        let data: EmployeeData = serde_json::from_value(employee_json()).unwrap();
        assert!(data.validate().is_ok());
        assert_eq!(data.patronymic, None);
    }

    #[test]
    fn test_employee_phone_out_of_range() {
        let mut value = employee_json();
        value["phone_number"] = json!(79001234567_i64);
        let data: EmployeeData = serde_json::from_value(value).unwrap();
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone_number"));
    }

    #[test]
    fn test_employee_negative_experience() {
        let mut value = employee_json();
        value["work_experience"] = json!(-1);
        let data: EmployeeData = serde_json::from_value(value).unwrap();
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_add_employee_nested_validation() {
        let dto: AddEmployeeDto = serde_json::from_value(json!({
            "user": { "username": "", "password": "pw" },
            "employee": employee_json()
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_phone_boundaries() {
        let mut parent = ParentData {
            fname: "Ivan".to_string(),
            lname: "Ivanov".to_string(),
            patronymic: None,
            phone_number: PHONE_MIN,
        };
        assert!(parent.validate().is_ok());
        parent.phone_number = PHONE_MAX;
        assert!(parent.validate().is_ok());
        parent.phone_number = PHONE_MAX + 1;
        assert!(parent.validate().is_err());
    }

    #[test]
    fn test_update_parent_distinguishes_null_from_absent() {
        let clear: UpdateParentDto = serde_json::from_value(json!({ "patronymic": null })).unwrap();
        assert_eq!(clear.patronymic, Some(None));

        let keep: UpdateParentDto = serde_json::from_value(json!({ "fname": "Olga" })).unwrap();
        assert_eq!(keep.patronymic, None);
        assert_eq!(keep.fname.as_deref(), Some("Olga"));
    }

    #[test]
    fn test_full_data_converts_to_complete_update() {
        let data: EmployeeData = serde_json::from_value(employee_json()).unwrap();
        let update = UpdateEmployeeDto::from(data);
        assert_eq!(update.fname.as_deref(), Some("Anna"));
        assert_eq!(update.patronymic, Some(None));
        assert_eq!(update.qualification, Some(Qualification::Teacher));
    }
}
