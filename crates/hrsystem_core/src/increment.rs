//! Increment-due evaluation over a roster of employees.
//!
//! Pure computation: no I/O, no clock reads. The reference date is always an
//! explicit input.

use crate::model::employee::Employee;
use crate::model::policy::{IncrementPolicy, IncrementRule};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One employee that currently qualifies for an increment review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueEmployee {
    pub employee: Employee,
    /// Policy that decided the threshold for this employee.
    pub policy: IncrementPolicy,
    pub months_elapsed: u32,
}

impl DueEmployee {
    /// One-line notification text for dashboards and logs shown to HR staff.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) is due for a {} increment: {} months since joining",
            self.employee.name, self.employee.department, self.policy, self.months_elapsed
        )
    }
}

/// Returns the employees due for an increment on `reference_date`, in roster
/// order.
///
/// Employees without a join date are skipped.
pub fn employees_due(
    roster: &[Employee],
    reference_date: NaiveDate,
    rule: IncrementRule,
) -> Vec<DueEmployee> {
    roster
        .iter()
        .filter_map(|employee| evaluate(employee, reference_date, rule))
        .collect()
}

/// Evaluates a single employee; `None` when not due or no join date.
pub fn evaluate(
    employee: &Employee,
    reference_date: NaiveDate,
    rule: IncrementRule,
) -> Option<DueEmployee> {
    let join_date = employee.join_date?;
    let policy = rule.effective_policy(employee.increment_policy);
    let months_elapsed = u32::try_from(months_between(join_date, reference_date)).ok()?;
    if months_elapsed < policy.threshold_months() {
        return None;
    }

    Some(DueEmployee {
        employee: employee.clone(),
        policy,
        months_elapsed,
    })
}

/// Whole calendar months from `start` to `end`.
///
/// A month only counts once the day-of-month is reached again, so
/// 2024-01-15 → 2024-02-14 is 0 and 2024-01-31 → 2024-02-29 is 0.
/// Negative when `end` precedes `start`, truncated toward zero.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let mut months = month_index(end) - month_index(start);
    if months > 0 && end.day() < start.day() {
        months -= 1;
    } else if months < 0 && end.day() > start.day() {
        months += 1;
    }
    months
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

#[cfg(test)]
mod tests {
    use super::months_between;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn partial_months_do_not_count() {
        assert_eq!(months_between(date(2024, 1, 15), date(2024, 2, 10)), 0);
        assert_eq!(months_between(date(2024, 1, 15), date(2024, 2, 15)), 1);
        assert_eq!(months_between(date(2023, 1, 15), date(2024, 1, 14)), 11);
    }

    #[test]
    fn month_end_joins_wait_for_the_same_day_number() {
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 2, 29)), 0);
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 3, 31)), 2);
    }

    #[test]
    fn reversed_range_is_negative_and_truncated() {
        assert_eq!(months_between(date(2024, 3, 10), date(2024, 1, 15)), -1);
        assert_eq!(months_between(date(2024, 3, 10), date(2024, 3, 1)), 0);
    }
}
