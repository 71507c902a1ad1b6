//! Field-level validation shared by the record types.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// One rejected field, reported back to the data-entry screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub(crate) fn required(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "this field is required"));
    }
}

/// Lengths are counted in characters, not bytes.
pub(crate) fn max_chars(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.push(FieldError::new(
            field,
            format!("at most {max} characters allowed (got {len})"),
        ));
    }
}

pub(crate) fn in_range(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<i32>,
    min: i32,
    max: i32,
) {
    if let Some(v) = value
        && !(min..=max).contains(&v)
    {
        errors.push(FieldError::new(
            field,
            format!("{v} is outside range [{min}, {max}]"),
        ));
    }
}

/// A loose address check: one `@`, something before it, and a dotted domain.
pub(crate) fn email(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.push(FieldError::new(field, "enter a valid email address"));
    }
}
