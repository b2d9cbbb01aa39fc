//! HTTP-level integration tests for CSV export and bulk JSON / CSV import.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, create_company, delete, get, upload, upload_part};
use serde_json::json;
use sqlx::PgPool;

const EXPORT_HEADER: &str = "id,name,description,logo_url,parent_id,organization_id,address,\
email,phone_number,website,created_at,updated_at,is_active,registration_number,tax_id,\
country,city,postal_code,employees_count";

async fn company_count(pool: &PgPool) -> usize {
    let app = common::build_test_app(pool.clone());
    body_json(get(app, "/companies").await)
        .await
        .as_array()
        .map_or(0, Vec::len)
}

// ---------------------------------------------------------------------------
// JSON import
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_import_all_valid_returns_200(pool: PgPool) {
    let file = json!([{"name": "Alpha"}, {"name": "Beta", "employees_count": 3}]);

    let app = common::build_test_app(pool.clone());
    let response = upload(app, "/companies/import.json", "rows.json", file.to_string().as_bytes()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "2 records imported successfully.");
    assert_eq!(json["imported"], 2);
    assert_eq!(json["errors"], json!([]));
    assert_eq!(company_count(&pool).await, 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_import_partial_success_returns_207(pool: PgPool) {
    let file = json!([
        {"name": "Alpha"},
        {"name": "Beta"},
        {"name": "Gamma", "website": "https://gamma.test"},
        {"name": "Delta", "employees_count": -5},
    ]);

    let app = common::build_test_app(pool.clone());
    let response = upload(app, "/companies/import.json", "rows.json", file.to_string().as_bytes()).await;

    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    let json = body_json(response).await;
    assert_eq!(json["message"], "3 records imported, 1 errors.");
    assert_eq!(json["imported"], 3);

    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["index"], 3);
    assert!(errors[0]["errors"]["employees_count"].is_array());
    assert_eq!(company_count(&pool).await, 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_import_duplicate_within_batch_fails_later_row(pool: PgPool) {
    let file = json!([{"name": "Twin"}, {"name": "Twin"}]);

    let app = common::build_test_app(pool);
    let response = upload(app, "/companies/import.json", "rows.json", file.to_string().as_bytes()).await;

    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["index"], 1);
    assert_eq!(json["errors"][0]["errors"]["name"], json!(["Name must be unique."]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_import_all_invalid_returns_400(pool: PgPool) {
    let file = json!([{"city": "Oslo"}, "not an object"]);

    let app = common::build_test_app(pool.clone());
    let response = upload(app, "/companies/import.json", "rows.json", file.to_string().as_bytes()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["imported"], 0);
    assert_eq!(json["errors"].as_array().unwrap().len(), 2);
    assert_eq!(json["errors"][1]["errors"]["_schema"], json!(["Invalid input type."]));
    assert_eq!(company_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_import_empty_array_returns_200(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = upload(app, "/companies/import.json", "rows.json", b"[]").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "0 records imported successfully.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_import_rejects_malformed_files(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = upload(app, "/companies/import.json", "rows.json", b"[{\"name\":").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON file:"));

    let app = common::build_test_app(pool);
    let response = upload(app, "/companies/import.json", "rows.json", b"{\"name\": \"Acme\"}").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "JSON must be a list of objects.");
}

// ---------------------------------------------------------------------------
// Upload envelope
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_without_file_part_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = upload_part(app, "/companies/import.json", "attachment", "rows.json", b"[]").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No file part in the request.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_with_empty_filename_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = upload(app, "/companies/import.csv", "", b"name\nAcme\n").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No selected file.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_without_multipart_body_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::post_json(app, "/companies/import.json", json!([])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No file part in the request.");
}

// ---------------------------------------------------------------------------
// CSV import
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_csv_import_coerces_cells(pool: PgPool) {
    let file = "name,employees_count,is_active,city\n\
                Alpha,10,no,Oslo\n\
                Beta,,yes,\n";

    let app = common::build_test_app(pool.clone());
    let response = upload(app, "/companies/import.csv", "rows.csv", file.as_bytes()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/companies").await).await;
    assert_eq!(json[0]["name"], "Alpha");
    assert_eq!(json[0]["employees_count"], 10);
    assert_eq!(json[0]["is_active"], false);
    assert_eq!(json[0]["city"], "Oslo");
    assert_eq!(json[1]["employees_count"], serde_json::Value::Null);
    assert_eq!(json[1]["is_active"], true);
    assert_eq!(json[1]["city"], serde_json::Value::Null);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_csv_import_reports_rows_by_index(pool: PgPool) {
    let file = "name,employees_count\nAlpha,1\nBeta,many\n";

    let app = common::build_test_app(pool);
    let response = upload(app, "/companies/import.csv", "rows.csv", file.as_bytes()).await;

    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["index"], 1);
    assert_eq!(json["errors"][0]["errors"]["employees_count"], json!(["Not a valid integer."]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_csv_import_malformed_file_writes_nothing(pool: PgPool) {
    // Second data row has an extra column.
    let file = "name,city\nAlpha,Oslo\nBeta,Bergen,Norway\n";

    let app = common::build_test_app(pool.clone());
    let response = upload(app, "/companies/import.csv", "rows.csv", file.as_bytes()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid CSV file:"));
    assert_eq!(company_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_export_csv_headers_and_rows(pool: PgPool) {
    create_company(&pool, json!({"name": "Acme, Inc.", "employees_count": 7})).await;
    create_company(&pool, json!({"name": "Globex", "is_active": false})).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/companies/export.csv").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/csv");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"export.csv\""
    );

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], EXPORT_HEADER);
    assert!(lines[1].contains("\"Acme, Inc.\""));
    assert!(lines[1].ends_with(",true,,,,,,7"));
    assert!(lines[2].ends_with(",false,,,,,,"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_export_empty_store_is_header_only(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/companies/export.csv").await;

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(body.trim_end(), EXPORT_HEADER);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_export_then_import_round_trip(pool: PgPool) {
    let parent = create_company(&pool, json!({"name": "Parent", "city": "Oslo"})).await;
    create_company(
        &pool,
        json!({"name": "Child", "parent_id": parent["id"], "employees_count": 4}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let exported = body_bytes(get(app, "/companies/export.csv").await).await;

    // Re-importing into the same store collides on every name.
    let app = common::build_test_app(pool.clone());
    let response = upload(app, "/companies/import.csv", "export.csv", &exported).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["imported"], 0);
    for failure in json["errors"].as_array().unwrap() {
        assert_eq!(failure["errors"]["name"], json!(["Name must be unique."]));
    }

    // Drop only the child so the parent reference still resolves.
    let app = common::build_test_app(pool.clone());
    let listed = body_json(get(app, "/companies").await).await;
    let child_id = listed[1]["id"].as_str().unwrap().to_string();
    let app = common::build_test_app(pool.clone());
    assert_eq!(
        delete(app, &format!("/companies/{child_id}")).await.status(),
        StatusCode::NO_CONTENT
    );

    let app = common::build_test_app(pool.clone());
    let response = upload(app, "/companies/import.csv", "export.csv", &exported).await;
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    let json = body_json(response).await;
    assert_eq!(json["imported"], 1);
    assert_eq!(json["errors"][0]["index"], 0);

    let app = common::build_test_app(pool);
    let listed = body_json(get(app, "/companies").await).await;
    let child = &listed[1];
    assert_eq!(child["name"], "Child");
    assert_eq!(child["parent_id"], parent["id"]);
    assert_eq!(child["employees_count"], 4);
    assert_ne!(child["id"], json!(child_id));
}
