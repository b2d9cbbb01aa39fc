//! Repository for the `companies` table.

use registry_core::company::{CompanyDraft, CompanyPatch};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::company::Company;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, logo_url, parent_id, organization_id, address, \
                       email, phone_number, website, created_at, updated_at, is_active, \
                       registration_number, tax_id, country, city, postal_code, employees_count";

/// Provides CRUD operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company with a fresh id, returning the stored row.
    ///
    /// `created_at` and `updated_at` are both stamped by the database.
    pub async fn create(pool: &PgPool, input: &CompanyDraft) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (
                id, name, description, logo_url, parent_id, organization_id, address,
                email, phone_number, website, is_active, registration_number, tax_id,
                country, city, postal_code, employees_count)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {COLUMNS}"
        );
        let id = Uuid::new_v4().to_string();

        let mut tx = pool.begin().await?;
        let result = sqlx::query_as::<_, Company>(&query)
            .bind(&id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.logo_url)
            .bind(&input.parent_id)
            .bind(&input.organization_id)
            .bind(&input.address)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(&input.website)
            .bind(input.is_active)
            .bind(&input.registration_number)
            .bind(&input.tax_id)
            .bind(&input.country)
            .bind(&input.city)
            .bind(&input.postal_code)
            .bind(input.employees_count)
            .fetch_one(&mut *tx)
            .await;
        finish(tx, result).await
    }

    /// Find a company by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a company by exact (case-sensitive) name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies WHERE name = $1 ORDER BY created_at, id LIMIT 1"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Whether a company with `id` exists.
    pub async fn exists(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM companies WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// List all companies in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies ORDER BY created_at, id");
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }

    /// Apply the supplied fields of `changes` and stamp `updated_at`.
    ///
    /// The row is locked for the duration of the merge. Returns `None` if no
    /// row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        changes: &CompanyPatch,
    ) -> Result<Option<Company>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = Self::update_locked(&mut tx, id, changes).await;
        finish(tx, result).await
    }

    async fn update_locked(
        tx: &mut Transaction<'_, Postgres>,
        id: &str,
        changes: &CompanyPatch,
    ) -> Result<Option<Company>, sqlx::Error> {
        let select = format!("SELECT {COLUMNS} FROM companies WHERE id = $1 FOR UPDATE");
        let Some(mut company) = sqlx::query_as::<_, Company>(&select)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        company.apply(changes);

        let update = format!(
            "UPDATE companies SET
                name = $2,
                description = $3,
                logo_url = $4,
                parent_id = $5,
                organization_id = $6,
                address = $7,
                email = $8,
                phone_number = $9,
                website = $10,
                is_active = $11,
                registration_number = $12,
                tax_id = $13,
                country = $14,
                city = $15,
                postal_code = $16,
                employees_count = $17,
                updated_at = clock_timestamp()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&update)
            .bind(id)
            .bind(&company.name)
            .bind(&company.description)
            .bind(&company.logo_url)
            .bind(&company.parent_id)
            .bind(&company.organization_id)
            .bind(&company.address)
            .bind(&company.email)
            .bind(&company.phone_number)
            .bind(&company.website)
            .bind(company.is_active)
            .bind(&company.registration_number)
            .bind(&company.tax_id)
            .bind(&company.country)
            .bind(&company.city)
            .bind(&company.postal_code)
            .bind(company.employees_count)
            .fetch_one(&mut **tx)
            .await
            .map(Some)
    }

    /// Permanently delete a company by id. Returns `true` if a row was removed.
    ///
    /// Children keep their `parent_id`.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|done| done.rows_affected() > 0);
        finish(tx, result).await
    }
}

/// Commit on success; roll back before handing the error back otherwise.
async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    result: Result<T, sqlx::Error>,
) -> Result<T, sqlx::Error> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Failed to roll back company transaction");
            }
            Err(err)
        }
    }
}
