//! Database layer
//!
//! SQLite via sqlx, for single-binary deployment. Entity access goes
//! through the repository traits in [`repositories`]; migrations are
//! embedded and run at startup.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
