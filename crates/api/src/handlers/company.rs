//! Handlers for the `/companies` resource.
//!
//! Every write goes through [`CompanyValidator`] before it reaches the store.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use registry_core::company::{CompanyPatch, ENTITY};
use registry_core::error::CoreError;
use registry_core::types::DbId;
use registry_core::validation::CompanyValidator;
use registry_db::lookup::StoreLookup;
use registry_db::models::company::Company;
use registry_db::repositories::CompanyRepo;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /companies
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Company>>> {
    tracing::info!("Listing companies");
    let companies = CompanyRepo::list(&state.pool).await?;
    Ok(Json(companies))
}

/// POST /companies
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Company>)> {
    let payload = json_body(body)?;
    tracing::info!("Creating company");

    let lookup = StoreLookup::new(&state.pool);
    let draft = CompanyValidator::new(&lookup).validate_new(&payload).await?;
    let company = CompanyRepo::create(&state.pool, &draft).await?;

    tracing::info!(id = %company.id, "Company created");
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /companies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Company>> {
    tracing::info!(%id, "Fetching company");
    let company = CompanyRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(company))
}

/// PUT /companies/{id}
///
/// Replaces every client-writable field. Omitted optional fields are cleared
/// and an omitted `is_active` resets to `true`.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Company>> {
    let payload = json_body(body)?;
    tracing::info!(%id, "Replacing company");
    ensure_exists(&state, &id).await?;

    let lookup = StoreLookup::new(&state.pool);
    let draft = CompanyValidator::new(&lookup)
        .validate_replacement(&id, &payload)
        .await?;
    let company = CompanyRepo::update(&state.pool, &id, &CompanyPatch::from(draft))
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(company))
}

/// PATCH /companies/{id}
///
/// Only the supplied fields change; an explicit `null` clears a field.
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Company>> {
    let payload = json_body(body)?;
    tracing::info!(%id, "Patching company");
    ensure_exists(&state, &id).await?;

    let lookup = StoreLookup::new(&state.pool);
    let changes = CompanyValidator::new(&lookup)
        .validate_changes(&id, &payload)
        .await?;
    let company = CompanyRepo::update(&state.pool, &id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(company))
}

/// DELETE /companies/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    tracing::info!(%id, "Deleting company");
    let deleted = CompanyRepo::delete(&state.pool, &id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// A missing id is reported before the payload is looked at.
async fn ensure_exists(state: &AppState, id: &str) -> AppResult<()> {
    if CompanyRepo::exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(not_found(id.to_string()))
    }
}

/// Unwrap a JSON body, turning axum's plain-text rejection into a JSON error.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> AppResult<Value> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}
