//! # Kinder Core
//!
//! Core types, errors, and utilities shared by every Kinder crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Custom serde helpers for partial updates
//!
//! # Example
//!
//! ```ignore
//! use kinder_core::errors::AppError;
//! use kinder_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Child not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;
pub mod serde;

pub use errors::{AppError, ErrorResponse, FieldErrors};
pub use password::{hash_password, verify_password};
