//! Role predicates.
//!
//! Roles travel in the token, so every check here is a pure function of the
//! claims and never touches the database.

use kinder_auth::Role;
use kinder_core::AppError;

use crate::middleware::auth::AuthUser;

/// 403 unless the caller holds one of `allowed`.
pub fn check_any_role(auth_user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&auth_user.role()) {
        return Ok(());
    }

    let allowed = allowed
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    Err(AppError::forbidden(format!(
        "Access denied. Required role: {}",
        allowed
    )))
}
