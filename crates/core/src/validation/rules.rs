//! Length and format rules for company fields.
//!
//! Rules operate on [`RuleInput`], a flattened view of the supplied values:
//! absent and null fields are `None` and are skipped, which gives the
//! "only supplied fields are checked" behaviour of partial updates for free.
//! Lengths are counted in characters.

use std::borrow::Cow;

use validator::{Validate, ValidationError};

use crate::company::CompanyPatch;

// ---------------------------------------------------------------------------
// Messages shared with the decode stage
// ---------------------------------------------------------------------------

pub const MISSING_REQUIRED: &str = "Missing data for required field.";
pub const NOT_NULL: &str = "Field may not be null.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_AN_INTEGER: &str = "Not a valid integer.";
pub const NOT_A_BOOLEAN: &str = "Not a valid boolean.";
pub const UNKNOWN_FIELD: &str = "Unknown field.";
pub const INVALID_INPUT: &str = "Invalid input type.";
pub const NAME_TAKEN: &str = "Name must be unique.";
pub const PARENT_NOT_STRING: &str = "Parent ID must be a valid string or None.";
pub const PARENT_MISSING: &str = "Parent company does not exist.";
pub const NEGATIVE_COUNT: &str = "Employees count must be a non-negative integer.";
pub const COUNT_TOO_LARGE: &str = "Employees count cannot exceed 2147483647.";

// ---------------------------------------------------------------------------
// Rule set
// ---------------------------------------------------------------------------

/// Values subject to length / format / range rules.
#[derive(Debug, Default, Validate)]
pub struct RuleInput {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Name cannot exceed 100 characters.")
    )]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters."))]
    pub description: Option<String>,

    #[validate(
        custom(function = "http_url", message = "Logo URL must be a valid URL."),
        length(max = 255, message = "Logo URL cannot exceed 255 characters.")
    )]
    pub logo_url: Option<String>,

    #[validate(length(max = 100, message = "Organization ID cannot exceed 100 characters."))]
    pub organization_id: Option<String>,

    #[validate(length(max = 255, message = "Address cannot exceed 255 characters."))]
    pub address: Option<String>,

    #[validate(
        length(max = 100, message = "Email cannot exceed 100 characters."),
        custom(function = "has_at_sign", message = "Email must be a valid email address.")
    )]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "Phone number cannot exceed 20 characters."))]
    pub phone_number: Option<String>,

    #[validate(
        custom(function = "http_url", message = "Website must be a valid URL."),
        length(max = 100, message = "Website cannot exceed 100 characters.")
    )]
    pub website: Option<String>,

    #[validate(length(max = 100, message = "Registration number cannot exceed 100 characters."))]
    pub registration_number: Option<String>,

    #[validate(length(max = 50, message = "Tax ID cannot exceed 50 characters."))]
    pub tax_id: Option<String>,

    #[validate(length(max = 100, message = "Country cannot exceed 100 characters."))]
    pub country: Option<String>,

    #[validate(length(max = 100, message = "City cannot exceed 100 characters."))]
    pub city: Option<String>,

    #[validate(length(max = 20, message = "Postal code cannot exceed 20 characters."))]
    pub postal_code: Option<String>,

    #[validate(range(min = 0, message = "Employees count must be a non-negative integer."))]
    pub employees_count: Option<i32>,
}

impl From<&CompanyPatch> for RuleInput {
    fn from(patch: &CompanyPatch) -> Self {
        Self {
            name: patch.name.clone(),
            description: patch.description.clone().flatten(),
            logo_url: patch.logo_url.clone().flatten(),
            organization_id: patch.organization_id.clone().flatten(),
            address: patch.address.clone().flatten(),
            email: patch.email.clone().flatten(),
            phone_number: patch.phone_number.clone().flatten(),
            website: patch.website.clone().flatten(),
            registration_number: patch.registration_number.clone().flatten(),
            tax_id: patch.tax_id.clone().flatten(),
            country: patch.country.clone().flatten(),
            city: patch.city.clone().flatten(),
            postal_code: patch.postal_code.clone().flatten(),
            employees_count: patch.employees_count.flatten(),
        }
    }
}

// ---------------------------------------------------------------------------
// Custom rules
// ---------------------------------------------------------------------------

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("empty").with_message(Cow::Borrowed("Name cannot be empty.")));
    }
    Ok(())
}

/// Empty strings carry no URL and are not format-checked.
fn http_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("url"))
    }
}

/// Empty strings carry no address and are not format-checked.
fn has_at_sign(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.contains('@') {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}
