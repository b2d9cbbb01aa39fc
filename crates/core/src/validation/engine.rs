//! Payload decoding and the [`CompanyValidator`] entry points.

use serde_json::{Map, Value};
use validator::Validate;

use crate::company::{CompanyDraft, CompanyPatch, READ_ONLY_FIELDS};
use crate::error::CoreError;
use crate::validation::rules::{
    RuleInput, COUNT_TOO_LARGE, INVALID_INPUT, MISSING_REQUIRED, NAME_TAKEN, NEGATIVE_COUNT,
    NOT_AN_INTEGER, NOT_A_BOOLEAN, NOT_A_STRING, NOT_NULL, PARENT_MISSING, PARENT_NOT_STRING,
    UNKNOWN_FIELD,
};
use crate::validation::{CompanyLookup, FieldErrors, FORM_KEY};

/// Whether the payload must describe a whole record or only changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create / full update: `name` is required, nulls mean "no value".
    Full,
    /// Partial update: only supplied fields are checked and applied.
    Partial,
}

/// Validates candidate company payloads against the field rules and the
/// current store state.
pub struct CompanyValidator<'a, L: ?Sized> {
    lookup: &'a L,
}

impl<'a, L> CompanyValidator<'a, L>
where
    L: CompanyLookup + ?Sized,
{
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Validate a payload for a new company.
    pub async fn validate_new(&self, payload: &Value) -> Result<CompanyDraft, CoreError> {
        let patch = self.validate(payload, Mode::Full, None).await?;
        into_draft(patch)
    }

    /// Validate a payload that replaces every field of company `id`.
    ///
    /// The company may keep its own name.
    pub async fn validate_replacement(
        &self,
        id: &str,
        payload: &Value,
    ) -> Result<CompanyDraft, CoreError> {
        let patch = self.validate(payload, Mode::Full, Some(id)).await?;
        into_draft(patch)
    }

    /// Validate the supplied subset of fields for company `id`.
    pub async fn validate_changes(
        &self,
        id: &str,
        payload: &Value,
    ) -> Result<CompanyPatch, CoreError> {
        self.validate(payload, Mode::Partial, Some(id)).await
    }

    /// Run all three stages and collect every violation.
    ///
    /// `current_id` identifies the record being updated, if any; its own name
    /// does not count as a collision.
    pub async fn validate(
        &self,
        payload: &Value,
        mode: Mode,
        current_id: Option<&str>,
    ) -> Result<CompanyPatch, CoreError> {
        let mut errors = FieldErrors::new();

        let Some(fields) = payload.as_object() else {
            errors.add(FORM_KEY, INVALID_INPUT);
            return Err(CoreError::Validation(errors));
        };

        let patch = decode(fields, mode, &mut errors);
        if mode == Mode::Full && !fields.contains_key("name") {
            errors.add("name", MISSING_REQUIRED);
        }

        if let Err(violations) = RuleInput::from(&patch).validate() {
            errors.absorb(violations);
        }

        self.check_store(&patch, current_id, &mut errors).await?;

        if !errors.is_empty() {
            let fields: Vec<&str> = errors.fields().collect();
            tracing::warn!(?mode, ?fields, "Company payload rejected");
        }
        errors.into_result(patch)
    }

    /// Uniqueness and parent existence. Skipped for fields that already
    /// failed, so an invalid value never reaches the store.
    async fn check_store(
        &self,
        patch: &CompanyPatch,
        current_id: Option<&str>,
        errors: &mut FieldErrors,
    ) -> Result<(), CoreError> {
        if let Some(name) = patch.name.as_deref().filter(|_| !errors.contains("name")) {
            if let Some(holder) = self.lookup.id_for_name(name).await? {
                if current_id != Some(holder.as_str()) {
                    errors.add("name", NAME_TAKEN);
                }
            }
        }

        if let Some(Some(parent_id)) = patch.parent_id.as_ref().filter(|_| !errors.contains("parent_id")) {
            if !self.lookup.exists(parent_id).await? {
                errors.add("parent_id", PARENT_MISSING);
            }
        }

        Ok(())
    }
}

fn into_draft(patch: CompanyPatch) -> Result<CompanyDraft, CoreError> {
    patch
        .into_draft()
        .ok_or_else(|| CoreError::Validation(FieldErrors::single("name", MISSING_REQUIRED)))
}

// ---------------------------------------------------------------------------
// Decode stage
// ---------------------------------------------------------------------------

/// Type-check each supplied key and copy it into a patch.
///
/// Read-only keys are skipped; keys outside the data model are reported.
fn decode(fields: &Map<String, Value>, mode: Mode, errors: &mut FieldErrors) -> CompanyPatch {
    let mut patch = CompanyPatch::default();

    for (key, value) in fields {
        let key = key.as_str();
        if READ_ONLY_FIELDS.contains(&key) {
            continue;
        }

        match key {
            "name" => match value {
                Value::String(s) => patch.name = Some(s.clone()),
                Value::Null => errors.add(key, NOT_NULL),
                _ => errors.add(key, NOT_A_STRING),
            },
            "is_active" => match value {
                Value::Bool(b) => patch.is_active = Some(*b),
                // Full mode: null falls back to the default.
                Value::Null if mode == Mode::Full => {}
                Value::Null => errors.add(key, NOT_NULL),
                _ => errors.add(key, NOT_A_BOOLEAN),
            },
            "parent_id" => match value {
                Value::String(s) => patch.parent_id = Some(Some(s.clone())),
                Value::Null => patch.parent_id = Some(None),
                _ => errors.add(key, PARENT_NOT_STRING),
            },
            "employees_count" => match decode_count(value) {
                Ok(count) => patch.employees_count = Some(count),
                Err(message) => errors.add(key, message),
            },
            _ => match patch.text_field_mut(key) {
                Some(slot) => match value {
                    Value::String(s) => *slot = Some(Some(s.clone())),
                    Value::Null => *slot = Some(None),
                    _ => errors.add(key, NOT_A_STRING),
                },
                None => errors.add(key, UNKNOWN_FIELD),
            },
        }
    }

    patch
}

/// Integers only; booleans and fractional numbers are rejected. Whole-valued
/// numbers such as `5.0` or `1e3` count as integers.
///
/// Negative values that fit in `i32` pass through so the range rule reports
/// them alongside everything else.
fn decode_count(value: &Value) -> Result<Option<i32>, &'static str> {
    let Value::Number(n) = value else {
        return match value {
            Value::Null => Ok(None),
            _ => Err(NOT_AN_INTEGER),
        };
    };

    let whole = match (n.as_i64(), n.as_f64()) {
        (Some(v), _) => v as f64,
        (None, _) if n.is_u64() => return Err(COUNT_TOO_LARGE),
        (None, Some(f)) if f.is_finite() && f.fract() == 0.0 => f,
        _ => return Err(NOT_AN_INTEGER),
    };

    if whole < f64::from(i32::MIN) {
        Err(NEGATIVE_COUNT)
    } else if whole > f64::from(i32::MAX) {
        Err(COUNT_TOO_LARGE)
    } else {
        Ok(Some(whole as i32))
    }
}
