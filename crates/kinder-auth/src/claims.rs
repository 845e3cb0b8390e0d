//! JWT claims for bearer tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::role::Role;

/// Claims embedded in every access token.
///
/// The role travels inside the token so role checks need no database lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Identity id (subject claim)
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
}
