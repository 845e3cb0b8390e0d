//! Authentication and authorization extractors.
//!
//! - [`auth`]: `AuthUser` (any valid bearer token) and the per-role extractors
//! - [`role`]: role predicates shared by the extractors
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::RequireAdmin;
//!
//! async fn add_employee(RequireAdmin(auth_user): RequireAdmin) -> impl IntoResponse {
//!     // only reached with an Admin token
//! }
//! ```

pub mod auth;
pub mod role;
