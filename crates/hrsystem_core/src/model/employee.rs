//! Employee record and raw field input.
//!
//! # Invariants
//! - `salary` is finite and non-negative.
//! - `name` and `department` are non-blank with collapsed whitespace.
//! - `department` is a name reference, not a foreign key; it can go stale when
//!   a department is renamed.

use crate::model::policy::IncrementPolicy;
use crate::model::validation::{normalize_name, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned employee identifier.
pub type EmployeeId = i64;

const JOIN_DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted employee as read back from the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Name of the department this employee belongs to.
    pub department: String,
    pub salary: f64,
    /// `None` excludes the employee from increment-due evaluation.
    pub join_date: Option<NaiveDate>,
    /// `None` means the caller's fallback policy applies.
    pub increment_policy: Option<IncrementPolicy>,
}

/// Raw, unvalidated employee fields as supplied by a presentation layer.
///
/// Every value is text; conversion happens in [`EmployeeFields::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFields {
    pub name: Option<String>,
    pub department: Option<String>,
    pub salary: Option<String>,
    /// `YYYY-MM-DD`; blank is treated as absent.
    pub join_date: Option<String>,
    /// `Yearly` or `Half-Yearly`; blank is treated as absent.
    pub increment_policy: Option<String>,
}

/// Validated employee fields ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    pub name: String,
    pub department: String,
    pub salary: f64,
    pub join_date: Option<NaiveDate>,
    pub increment_policy: Option<IncrementPolicy>,
}

impl EmployeeFields {
    /// Creates input with the three required fields set.
    pub fn new(
        name: impl Into<String>,
        department: impl Into<String>,
        salary: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            department: Some(department.into()),
            salary: Some(salary.into()),
            join_date: None,
            increment_policy: None,
        }
    }

    pub fn with_join_date(mut self, join_date: impl Into<String>) -> Self {
        self.join_date = Some(join_date.into());
        self
    }

    pub fn with_increment_policy(mut self, policy: impl Into<String>) -> Self {
        self.increment_policy = Some(policy.into());
        self
    }

    /// Converts raw text into a typed draft.
    ///
    /// # Errors
    /// - `MissingField` when name, department or salary is absent/blank.
    /// - `InvalidSalary` / `NegativeSalary` for unusable amounts.
    /// - `InvalidDate` for a join date not in `YYYY-MM-DD` form.
    /// - `UnknownPolicy` for policy text other than `Yearly|Half-Yearly`.
    pub fn validate(&self) -> Result<EmployeeDraft, ValidationError> {
        let name = normalize_name("name", required(&self.name, "name")?)?;
        let department = normalize_name("department", required(&self.department, "department")?)?;
        let salary = parse_salary(required(&self.salary, "salary")?)?;

        let join_date = match non_blank(&self.join_date) {
            Some(value) => Some(
                NaiveDate::parse_from_str(value, JOIN_DATE_FORMAT)
                    .map_err(|_| ValidationError::InvalidDate(value.to_string()))?,
            ),
            None => None,
        };
        let increment_policy = match non_blank(&self.increment_policy) {
            Some(value) => Some(value.parse::<IncrementPolicy>()?),
            None => None,
        };

        Ok(EmployeeDraft {
            name,
            department,
            salary,
            join_date,
            increment_policy,
        })
    }
}

impl From<&Employee> for EmployeeFields {
    /// Pre-fills an edit form from a stored employee.
    fn from(employee: &Employee) -> Self {
        Self {
            name: Some(employee.name.clone()),
            department: Some(employee.department.clone()),
            salary: Some(employee.salary.to_string()),
            join_date: employee
                .join_date
                .map(|date| date.format(JOIN_DATE_FORMAT).to_string()),
            increment_policy: employee
                .increment_policy
                .map(|policy| policy.as_str().to_string()),
        }
    }
}

/// Checks a persisted salary the same way the write path does.
pub(crate) fn check_salary(salary: f64) -> Result<f64, ValidationError> {
    if !salary.is_finite() {
        return Err(ValidationError::InvalidSalary(salary.to_string()));
    }
    if salary < 0.0 {
        return Err(ValidationError::NegativeSalary(salary));
    }
    Ok(salary)
}

fn parse_salary(value: &str) -> Result<f64, ValidationError> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidSalary(value.to_string()))?;
    check_salary(parsed)
}

fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    non_blank(value).ok_or(ValidationError::MissingField(field))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
