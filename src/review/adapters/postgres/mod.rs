//! `PostgreSQL` adapters for review persistence.

mod migrations;
mod models;
mod repository;
mod schema;

pub use migrations::{MigrationError, run_migrations};
pub use repository::{PostgresReviewRepository, ReviewPgPool};
