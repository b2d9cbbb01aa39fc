//! CSV and JSON bulk transfer formats.
//!
//! Parsing turns an uploaded file into candidate payloads for the validation
//! engine; nothing here touches the store.

use serde_json::{Map, Number, Value};

use crate::company::READ_ONLY_FIELDS;

/// Export column order. Matches the data model field order.
pub const EXPORT_COLUMNS: [&str; 19] = [
    "id",
    "name",
    "description",
    "logo_url",
    "parent_id",
    "organization_id",
    "address",
    "email",
    "phone_number",
    "website",
    "created_at",
    "updated_at",
    "is_active",
    "registration_number",
    "tax_id",
    "country",
    "city",
    "postal_code",
    "employees_count",
];

/// A file that could not be read as a batch at all.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Invalid JSON file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON must be a list of objects.")]
    NotAList,

    #[error("Invalid CSV file: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Parse a JSON import file into one payload per array element.
///
/// Elements are not inspected here; a non-object element becomes a row-level
/// validation failure later.
pub fn parse_json_rows(data: &[u8]) -> Result<Vec<Value>, TransferError> {
    match serde_json::from_slice(data)? {
        Value::Array(rows) => Ok(rows),
        _ => Err(TransferError::NotAList),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse a CSV import file into one JSON object per data row.
///
/// The whole file is read before anything is returned, so a malformed file
/// fails as a unit. Read-only columns are dropped, empty cells become null,
/// and numeric / boolean columns are coerced when they parse cleanly. Cells
/// that do not parse stay strings so validation can report them.
pub fn parse_csv_rows(data: &[u8]) -> Result<Vec<Value>, TransferError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let mut row = Map::new();
        for (column, cell) in headers.iter().zip(record.iter()) {
            if READ_ONLY_FIELDS.contains(&column) {
                continue;
            }
            row.insert(column.to_string(), coerce_cell(column, cell));
        }
        rows.push(Value::Object(row));
    }

    Ok(rows)
}

fn coerce_cell(column: &str, cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match column {
        "employees_count" => cell
            .trim()
            .parse::<i64>()
            .map(|n| Value::Number(Number::from(n)))
            .unwrap_or_else(|_| Value::String(cell.to_string())),
        "is_active" => parse_bool(cell)
            .map(Value::Bool)
            .unwrap_or_else(|| Value::String(cell.to_string())),
        _ => Value::String(cell.to_string()),
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Serialize export rows (already in [`EXPORT_COLUMNS`] order) with a header.
pub fn write_csv<I>(rows: I) -> Result<Vec<u8>, csv::Error>
where
    I: IntoIterator<Item = [String; EXPORT_COLUMNS.len()]>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
