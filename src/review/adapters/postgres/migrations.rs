//! Embedded schema migrations for the review tables.

use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::error::Error;
use thiserror::Error;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// A migration could not be applied.
#[derive(Debug, Error)]
#[error("failed to apply migrations: {0}")]
pub struct MigrationError(#[source] Box<dyn Error + Send + Sync>);

/// Applies every pending migration and returns how many ran.
///
/// # Errors
///
/// Returns [`MigrationError`] when a migration fails; earlier migrations in
/// the batch stay applied.
pub fn run_migrations(connection: &mut PgConnection) -> Result<usize, MigrationError> {
    connection
        .run_pending_migrations(MIGRATIONS)
        .map(|applied| applied.len())
        .map_err(MigrationError)
}
