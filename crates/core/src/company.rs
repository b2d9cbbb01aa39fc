//! Client-facing company field sets.
//!
//! [`CompanyDraft`] is a fully validated record ready to be inserted or to
//! replace an existing row. [`CompanyPatch`] carries the changes of a partial
//! update, distinguishing "leave untouched" from "clear".

/// Entity name used in not-found errors and logs.
pub const ENTITY: &str = "Company";

/// Server-managed fields. Ignored when they appear in a payload.
pub const READ_ONLY_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Default for `is_active` when a full payload omits it.
pub const DEFAULT_IS_ACTIVE: bool = true;

/// A validated, complete set of client-settable company fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDraft {
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub parent_id: Option<String>,
    pub organization_id: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub registration_number: Option<String>,
    pub tax_id: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub employees_count: Option<i32>,
}

impl CompanyDraft {
    /// A draft with only a name set and every other field at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            logo_url: None,
            parent_id: None,
            organization_id: None,
            address: None,
            email: None,
            phone_number: None,
            website: None,
            is_active: DEFAULT_IS_ACTIVE,
            registration_number: None,
            tax_id: None,
            country: None,
            city: None,
            postal_code: None,
            employees_count: None,
        }
    }
}

/// Changes for a partial update.
///
/// For nullable fields the outer `Option` says whether the field was supplied
/// and the inner one carries the new value, so `Some(None)` clears the field.
/// `name` and `is_active` are not nullable and can only be replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub logo_url: Option<Option<String>>,
    pub parent_id: Option<Option<String>>,
    pub organization_id: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone_number: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub registration_number: Option<Option<String>>,
    pub tax_id: Option<Option<String>>,
    pub country: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub postal_code: Option<Option<String>>,
    pub employees_count: Option<Option<i32>>,
}

impl CompanyPatch {
    /// Mutable access to a nullable free-text field by its wire name.
    ///
    /// Returns `None` for `name`, `parent_id`, non-text fields and unknown
    /// names; those are decoded separately.
    pub fn text_field_mut(&mut self, field: &str) -> Option<&mut Option<Option<String>>> {
        let slot = match field {
            "description" => &mut self.description,
            "logo_url" => &mut self.logo_url,
            "organization_id" => &mut self.organization_id,
            "address" => &mut self.address,
            "email" => &mut self.email,
            "phone_number" => &mut self.phone_number,
            "website" => &mut self.website,
            "registration_number" => &mut self.registration_number,
            "tax_id" => &mut self.tax_id,
            "country" => &mut self.country,
            "city" => &mut self.city,
            "postal_code" => &mut self.postal_code,
            _ => return None,
        };
        Some(slot)
    }

    /// Collapse the patch into a full record.
    ///
    /// Unsupplied and cleared fields become `None`; an unsupplied `is_active`
    /// takes its default. Returns `None` when no name was supplied.
    pub fn into_draft(self) -> Option<CompanyDraft> {
        Some(CompanyDraft {
            name: self.name?,
            description: self.description.flatten(),
            logo_url: self.logo_url.flatten(),
            parent_id: self.parent_id.flatten(),
            organization_id: self.organization_id.flatten(),
            address: self.address.flatten(),
            email: self.email.flatten(),
            phone_number: self.phone_number.flatten(),
            website: self.website.flatten(),
            is_active: self.is_active.unwrap_or(DEFAULT_IS_ACTIVE),
            registration_number: self.registration_number.flatten(),
            tax_id: self.tax_id.flatten(),
            country: self.country.flatten(),
            city: self.city.flatten(),
            postal_code: self.postal_code.flatten(),
            employees_count: self.employees_count.flatten(),
        })
    }
}

/// A full record expressed as a patch that overwrites every field.
impl From<CompanyDraft> for CompanyPatch {
    fn from(draft: CompanyDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            logo_url: Some(draft.logo_url),
            parent_id: Some(draft.parent_id),
            organization_id: Some(draft.organization_id),
            address: Some(draft.address),
            email: Some(draft.email),
            phone_number: Some(draft.phone_number),
            website: Some(draft.website),
            is_active: Some(draft.is_active),
            registration_number: Some(draft.registration_number),
            tax_id: Some(draft.tax_id),
            country: Some(draft.country),
            city: Some(draft.city),
            postal_code: Some(draft.postal_code),
            employees_count: Some(draft.employees_count),
        }
    }
}
