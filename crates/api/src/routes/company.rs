//! Route definitions for the `/companies` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{company, transfer};
use crate::state::AppState;

/// Routes mounted at `/companies`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /export.csv        -> export_csv
/// POST   /import.json       -> import_json
/// POST   /import.csv        -> import_csv
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// PATCH  /{id}              -> patch
/// DELETE /{id}              -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(company::list).post(company::create))
        .route("/export.csv", get(transfer::export_csv))
        .route("/import.json", post(transfer::import_json))
        .route("/import.csv", post(transfer::import_csv))
        .route(
            "/{id}",
            get(company::get_by_id)
                .put(company::update)
                .patch(company::patch)
                .delete(company::delete),
        )
}
