//! # Kinder Auth
//!
//! Identity roles, bearer token claims and JWT utilities.
//!
//! - [`role`]: the three identity roles (`Admin`, `Employee`, `Parent`)
//! - [`claims`]: claims embedded in issued tokens
//! - [`jwt`]: token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use kinder_auth::{Role, create_access_token, verify_token};
//! use kinder_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "a1", Role::Admin, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, Role::Admin);
//! ```

pub mod claims;
pub mod jwt;
pub mod role;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use role::Role;
