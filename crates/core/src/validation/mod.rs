//! Company validation engine.
//!
//! Validation runs in three stages:
//!
//! 1. **Decode** -- the JSON object is type-checked field by field into a
//!    [`CompanyPatch`](crate::company::CompanyPatch) (see [`engine`]).
//! 2. **Rules** -- length and format constraints are checked with `validator`
//!    (see [`rules`]).
//! 3. **Store checks** -- name uniqueness and parent existence are resolved
//!    through a [`CompanyLookup`].
//!
//! Every violation from every stage is collected into one [`FieldErrors`].

pub mod engine;
pub mod rules;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

pub use engine::{CompanyValidator, Mode};

/// Key used for errors that concern the payload as a whole.
pub const FORM_KEY: &str = "_schema";

/// Read access to the current store state needed by the store checks.
#[async_trait]
pub trait CompanyLookup: Send + Sync {
    /// Id of the company currently holding `name` (exact match), if any.
    async fn id_for_name(&self, name: &str) -> Result<Option<DbId>, CoreError>;

    /// Whether a company with `id` currently exists.
    async fn exists(&self, id: &str) -> Result<bool, CoreError>;
}

/// Field name to one or more human-readable messages.
///
/// Serializes as a plain JSON object, e.g.
/// `{"name": ["Name must be unique."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection holding exactly one message.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Merge the violations reported by a `validator` run.
    pub fn absorb(&mut self, errors: validator::ValidationErrors) {
        for (field, violations) in errors.field_errors() {
            for violation in violations {
                let message = violation
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| violation.code.to_string());
                self.add(field.to_string(), message);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of the offending fields, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(value)` when nothing was collected, otherwise a validation error.
    pub fn into_result<T>(self, value: T) -> Result<T, CoreError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("website", "Website must be a valid URL.");
        errors.add("website", "Website cannot exceed 100 characters.");
        errors.add("email", "Email must be a valid email address.");

        assert_eq!(errors.get("website").map(<[String]>::len), Some(2));
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["email", "website"]);
    }

    #[test]
    fn serializes_as_plain_object() {
        let errors = FieldErrors::single("name", "Name must be unique.");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"name": ["Name must be unique."]}));
    }

    #[test]
    fn display_joins_all_messages() {
        let mut errors = FieldErrors::new();
        errors.add("tax_id", "Tax ID cannot exceed 50 characters.");
        errors.add("city", "City cannot exceed 100 characters.");
        assert_eq!(
            errors.to_string(),
            "city: City cannot exceed 100 characters.; tax_id: Tax ID cannot exceed 50 characters."
        );
    }

    #[test]
    fn into_result_passes_value_through_when_empty() {
        assert_eq!(FieldErrors::new().into_result(7).unwrap(), 7);
        assert!(FieldErrors::single("name", "x").into_result(7).is_err());
    }
}
