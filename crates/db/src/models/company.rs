//! Company row model.

use registry_core::company::CompanyPatch;
use registry_core::transfer::EXPORT_COLUMNS;
use registry_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `companies` table.
///
/// Field order matches the data model and the CSV export columns.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub parent_id: Option<DbId>,
    pub organization_id: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_active: bool,
    pub registration_number: Option<String>,
    pub tax_id: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub employees_count: Option<i32>,
}

impl Company {
    /// Merge the supplied fields of `changes` into this row.
    pub fn apply(&mut self, changes: &CompanyPatch) {
        fn merge<T: Clone>(field: &mut T, change: &Option<T>) {
            if let Some(value) = change {
                *field = value.clone();
            }
        }

        merge(&mut self.name, &changes.name);
        merge(&mut self.description, &changes.description);
        merge(&mut self.logo_url, &changes.logo_url);
        merge(&mut self.parent_id, &changes.parent_id);
        merge(&mut self.organization_id, &changes.organization_id);
        merge(&mut self.address, &changes.address);
        merge(&mut self.email, &changes.email);
        merge(&mut self.phone_number, &changes.phone_number);
        merge(&mut self.website, &changes.website);
        merge(&mut self.is_active, &changes.is_active);
        merge(&mut self.registration_number, &changes.registration_number);
        merge(&mut self.tax_id, &changes.tax_id);
        merge(&mut self.country, &changes.country);
        merge(&mut self.city, &changes.city);
        merge(&mut self.postal_code, &changes.postal_code);
        merge(&mut self.employees_count, &changes.employees_count);
    }

    /// Cells for one CSV export row, in export column order.
    ///
    /// Nulls are empty cells and timestamps are RFC 3339.
    pub fn export_record(&self) -> [String; EXPORT_COLUMNS.len()] {
        fn text(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }

        [
            self.id.clone(),
            self.name.clone(),
            text(&self.description),
            text(&self.logo_url),
            text(&self.parent_id),
            text(&self.organization_id),
            text(&self.address),
            text(&self.email),
            text(&self.phone_number),
            text(&self.website),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
            self.is_active.to_string(),
            text(&self.registration_number),
            text(&self.tax_id),
            text(&self.country),
            text(&self.city),
            text(&self.postal_code),
            self.employees_count.map(|n| n.to_string()).unwrap_or_default(),
        ]
    }
}
