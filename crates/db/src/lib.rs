//! Persistence store for companies.
//!
//! Postgres via sqlx. Every mutation runs in its own transaction and is
//! rolled back explicitly on failure.

pub mod lookup;
pub mod models;
pub mod repositories;

use registry_core::validation::rules::NAME_TAKEN;
use registry_core::validation::{FieldErrors, FORM_KEY};
use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Name of the storage-level unique constraint on `companies.name`.
pub const NAME_CONSTRAINT: &str = "uq_companies_name";

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Whether `err` is a constraint violation (Postgres SQLSTATE class 23).
pub fn is_integrity_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| code.starts_with("23")),
        _ => false,
    }
}

/// Field-level description of a constraint violation, if `err` is one.
///
/// A clash on the name constraint is attributed to `name`; anything else is
/// reported against the payload as a whole.
pub fn integrity_errors(err: &sqlx::Error) -> Option<FieldErrors> {
    if !is_integrity_violation(err) {
        return None;
    }
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    let errors = match db_err.constraint() {
        Some(NAME_CONSTRAINT) => FieldErrors::single("name", NAME_TAKEN),
        _ => FieldErrors::single(
            FORM_KEY,
            format!("Integrity error: {}", db_err.message()),
        ),
    };
    Some(errors)
}
