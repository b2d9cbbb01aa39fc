pub mod company;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /companies                     list, create
/// /companies/export.csv          CSV export of every company
/// /companies/import.json         bulk import from an uploaded JSON array
/// /companies/import.csv          bulk import from an uploaded CSV file
/// /companies/{id}                get, replace, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/companies", company::router())
}
