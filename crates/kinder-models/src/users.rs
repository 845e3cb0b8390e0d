//! Identity models and DTOs.
//!
//! An identity is an authenticatable account carrying one [`Role`]. The
//! password hash lives only in the `users` table; [`User`] has no field for
//! it, so no response can ever echo it back.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;
use kinder_auth::Role;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// The `user` half of a nested add-employee / add-parent payload.
///
/// The role is fixed by the endpoint; if supplied it must agree with it.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewIdentityDto {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_never_serializes_password() {
        let user = User {
            id: UserId::new(),
            username: "a1".to_string(),
            role: Role::Admin,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "Admin");
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            username: "a1".to_string(),
            password: "pw".to_string(),
            role: Role::Admin,
        };
        assert!(valid.validate().is_ok());

        let empty_username = RegisterRequest {
            username: String::new(),
            password: "pw".to_string(),
            role: Role::Admin,
        };
        assert!(empty_username.validate().is_err());

        let long_username = RegisterRequest {
            username: "x".repeat(51),
            password: "pw".to_string(),
            role: Role::Parent,
        };
        assert!(long_username.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_unknown_role() {
        let json = r#"{"username":"u","password":"p","role":"Superuser"}"#;
        assert!(serde_json::from_str::<RegisterRequest>(json).is_err());
    }

    #[test]
    fn test_new_identity_role_is_optional() {
        let dto: NewIdentityDto =
            serde_json::from_str(r#"{"username":"e1","password":"pw"}"#).unwrap();
        assert_eq!(dto.role, None);
        assert!(dto.validate().is_ok());
    }
}
