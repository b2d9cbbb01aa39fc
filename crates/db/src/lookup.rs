//! Store-backed [`CompanyLookup`] for the validation engine.

use async_trait::async_trait;
use registry_core::error::CoreError;
use registry_core::types::DbId;
use registry_core::validation::CompanyLookup;
use sqlx::PgPool;

use crate::repositories::CompanyRepo;

/// Answers validation lookups from the live `companies` table.
pub struct StoreLookup<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreLookup<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> CompanyLookup for StoreLookup<'a> {
    async fn id_for_name(&self, name: &str) -> Result<Option<DbId>, CoreError> {
        CompanyRepo::find_by_name(self.pool, name)
            .await
            .map(|found| found.map(|company| company.id))
            .map_err(storage_failure)
    }

    async fn exists(&self, id: &str) -> Result<bool, CoreError> {
        CompanyRepo::exists(self.pool, id)
            .await
            .map_err(storage_failure)
    }
}

fn storage_failure(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Validation lookup failed");
    CoreError::Internal(format!("Database error: {err}"))
}
