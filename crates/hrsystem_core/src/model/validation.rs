//! Field validation errors and shared normalization helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Reasons caller-supplied (or persisted) fields are rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required field is absent or blank after trim.
    MissingField(&'static str),
    /// Salary text is not a finite number.
    InvalidSalary(String),
    /// Salary parsed but is below zero.
    NegativeSalary(f64),
    /// Join date text is not `YYYY-MM-DD`.
    InvalidDate(String),
    /// Policy text is neither `Yearly` nor `Half-Yearly`.
    UnknownPolicy(String),
    /// A stored row holds a value no write path could have produced.
    InvalidStoredValue { column: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidSalary(value) => write!(f, "salary `{value}` is not a valid amount"),
            Self::NegativeSalary(value) => write!(f, "salary must be >= 0, got {value}"),
            Self::InvalidDate(value) => {
                write!(f, "join date `{value}` must use YYYY-MM-DD format")
            }
            Self::UnknownPolicy(value) => write!(
                f,
                "increment policy `{value}` is not recognized; expected Yearly|Half-Yearly"
            ),
            Self::InvalidStoredValue { column, value } => {
                write!(f, "invalid persisted value `{value}` in {column}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and collapses internal whitespace runs.
///
/// Returns `MissingField(field)` when nothing is left.
pub fn normalize_name(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(collapsed.into_owned())
}
