//! Field-level validation results.
//!
//! Validation functions collect every failing field instead of stopping at
//! the first one, so a client can fix a form in a single round trip.

use std::collections::BTreeMap;

use serde::Serialize;

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// The field was missing or blank.
    Required,
    /// The field was shorter than allowed.
    MinLength,
    /// The field was present but malformed.
    Invalid,
    /// The value collides with an existing record.
    Unique,
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub message: String,
    pub kind: FieldErrorKind,
}

/// All rejected fields of one request, keyed by field name.
///
/// Serializes as `{ "<field>": { "message": ..., "kind": ... } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, FieldError>);

impl ValidationErrors {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error set holding one field error.
    #[must_use]
    pub fn single(field: &str, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, kind, message);
        errors
    }

    /// Record an error for `field`. The first error recorded for a field wins.
    pub fn add(&mut self, field: &str, kind: FieldErrorKind, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_insert_with(|| FieldError {
                message: message.into(),
                kind,
            });
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The error recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    /// Validate a required text field with a minimum length in characters.
    ///
    /// Returns the trimmed value when it passes; records an error otherwise.
    pub fn require_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        min_chars: usize,
    ) -> Option<String> {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            self.add(field, FieldErrorKind::Required, format!("{field} is required"));
            return None;
        }
        if trimmed.chars().count() < min_chars {
            self.add(
                field,
                FieldErrorKind::MinLength,
                format!("{field} must be at least {min_chars} characters"),
            );
            return None;
        }
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_trims_and_accepts() {
        let mut errors = ValidationErrors::new();
        let value = errors.require_text("name", Some("  Emma "), 1);
        assert_eq!(value.as_deref(), Some("Emma"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_require_text_missing_and_blank() {
        let mut errors = ValidationErrors::new();
        assert!(errors.require_text("a", None, 1).is_none());
        assert!(errors.require_text("b", Some("   "), 1).is_none());
        assert_eq!(errors.get("a").unwrap().kind, FieldErrorKind::Required);
        assert_eq!(errors.get("b").unwrap().kind, FieldErrorKind::Required);
    }

    #[test]
    fn test_require_text_counts_chars_not_bytes() {
        let mut errors = ValidationErrors::new();
        // Four two-byte characters
        assert!(errors.require_text("cakeName", Some("åäöü"), 5).is_none());
        assert_eq!(
            errors.get("cakeName").unwrap().kind,
            FieldErrorKind::MinLength
        );
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("email", FieldErrorKind::Invalid, "first");
        errors.add("email", FieldErrorKind::Unique, "second");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email").unwrap().message, "first");
    }

    #[test]
    fn test_serializes_as_field_map() {
        let errors = ValidationErrors::single("email", FieldErrorKind::Unique, "taken");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["email"]["message"], "taken");
        assert_eq!(json["email"]["kind"], "unique");
    }
}
