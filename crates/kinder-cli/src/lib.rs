//! # Kinder CLI
//!
//! Admin bootstrap and database seeding for Kinder development.
//!
//! This library crate provides the seeding functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use kinder_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(3); // 3 programs with defaults
//! seed_all(&pool, config, "password123").await?;
//! ```

pub mod seeder;
