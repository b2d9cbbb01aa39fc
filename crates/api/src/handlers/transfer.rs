//! CSV export and bulk JSON / CSV import for companies.
//!
//! Imports treat each row as its own unit of work: a bad row is reported by
//! index and the rest of the batch carries on.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use registry_core::error::CoreError;
use registry_core::import::{ImportOutcome, ImportReport, ImportSummary};
use registry_core::transfer::{self, TransferError};
use registry_core::validation::CompanyValidator;
use registry_db::lookup::StoreLookup;
use registry_db::models::company::Company;
use registry_db::repositories::CompanyRepo;
use registry_db::DbPool;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart part that carries the uploaded file.
const UPLOAD_FIELD: &str = "file";

const NO_FILE_PART: &str = "No file part in the request.";
const NO_SELECTED_FILE: &str = "No selected file.";

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// GET /companies/export.csv
pub async fn export_csv(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    tracing::info!("Exporting companies as CSV");
    let companies = CompanyRepo::list(&state.pool).await?;

    let csv = transfer::write_csv(companies.iter().map(Company::export_record))
        .map_err(|e| AppError::InternalError(format!("CSV export failed: {e}")))?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv"),
            (CONTENT_DISPOSITION, "attachment; filename=\"export.csv\""),
        ],
        csv,
    ))
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// POST /companies/import.json
///
/// The upload must be a JSON array; each element is created as a company.
pub async fn import_json(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ImportSummary>)> {
    let data = read_upload(multipart).await?;
    let rows = transfer::parse_json_rows(&data).map_err(rejected_file)?;
    tracing::info!(rows = rows.len(), "Importing companies from JSON");

    let report = import_rows(&state.pool, &rows).await?;
    Ok(import_response(report))
}

/// POST /companies/import.csv
///
/// The whole file is parsed before any row is written.
pub async fn import_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ImportSummary>)> {
    let data = read_upload(multipart).await?;
    let rows = transfer::parse_csv_rows(&data).map_err(rejected_file)?;
    tracing::info!(rows = rows.len(), "Importing companies from CSV");

    let report = import_rows(&state.pool, &rows).await?;
    Ok(import_response(report))
}

/// Validate and create each row independently.
///
/// Validation failures and constraint violations are recorded against the
/// row. Any other storage failure aborts the batch; rows already created
/// stay committed.
async fn import_rows(pool: &DbPool, rows: &[Value]) -> AppResult<ImportReport> {
    let lookup = StoreLookup::new(pool);
    let validator = CompanyValidator::new(&lookup);
    let mut report = ImportReport::new();

    for (index, row) in rows.iter().enumerate() {
        let draft = match validator.validate_new(row).await {
            Ok(draft) => draft,
            Err(CoreError::Validation(errors)) => {
                report.record_failure(index, errors);
                continue;
            }
            Err(other) => return Err(other.into()),
        };

        match CompanyRepo::create(pool, &draft).await {
            Ok(company) => {
                tracing::debug!(index, id = %company.id, "Imported row");
                report.record_success();
            }
            Err(err) => match registry_db::integrity_errors(&err) {
                Some(errors) => {
                    tracing::warn!(index, error = %err, "Row rejected by store");
                    report.record_failure(index, errors);
                }
                None => return Err(err.into()),
            },
        }
    }

    Ok(report)
}

fn import_response(report: ImportReport) -> (StatusCode, Json<ImportSummary>) {
    let status = match report.outcome() {
        ImportOutcome::Complete => StatusCode::OK,
        ImportOutcome::Partial => StatusCode::MULTI_STATUS,
        ImportOutcome::Failed => StatusCode::BAD_REQUEST,
    };
    tracing::info!(
        imported = report.imported(),
        failed = report.failures().len(),
        %status,
        "Import finished"
    );
    (status, Json(report.into_summary()))
}

/// Pull the bytes of the `file` part out of a multipart body.
async fn read_upload(multipart: Result<Multipart, MultipartRejection>) -> AppResult<Vec<u8>> {
    let Ok(mut multipart) = multipart else {
        return Err(AppError::BadRequest(NO_FILE_PART.into()));
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        match field.file_name() {
            // A part without a filename is a plain form value, not a file.
            None => continue,
            Some("") => return Err(AppError::BadRequest(NO_SELECTED_FILE.into())),
            Some(_) => {}
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        return Ok(data.to_vec());
    }

    Err(AppError::BadRequest(NO_FILE_PART.into()))
}

fn rejected_file(err: TransferError) -> AppError {
    tracing::warn!(error = %err, "Upload rejected");
    AppError::BadRequest(err.to_string())
}
