//! Salary increment policies and the rule that picks one per employee.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Cadence at which an employee becomes due for an increment review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncrementPolicy {
    #[serde(rename = "Yearly")]
    Yearly,
    #[serde(rename = "Half-Yearly")]
    HalfYearly,
}

impl IncrementPolicy {
    /// Canonical storage/display text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "Yearly",
            Self::HalfYearly => "Half-Yearly",
        }
    }

    /// Whole months that must elapse since joining.
    pub fn threshold_months(self) -> u32 {
        match self {
            Self::Yearly => 12,
            Self::HalfYearly => 6,
        }
    }
}

impl Display for IncrementPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncrementPolicy {
    type Err = ValidationError;

    /// Accepts the canonical names case-insensitively, surrounding
    /// whitespace ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yearly" => Ok(Self::Yearly),
            "half-yearly" => Ok(Self::HalfYearly),
            _ => Err(ValidationError::UnknownPolicy(value.to_string())),
        }
    }
}

/// How the evaluator chooses a policy for each employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementRule {
    /// Use the employee's stored policy, or `fallback` when none is stored.
    PerEmployee { fallback: IncrementPolicy },
    /// Apply one policy to everyone, ignoring stored policies.
    Global(IncrementPolicy),
}

impl IncrementRule {
    /// Resolves the policy in force for an employee with `own` stored policy.
    pub fn effective_policy(self, own: Option<IncrementPolicy>) -> IncrementPolicy {
        match self {
            Self::PerEmployee { fallback } => own.unwrap_or(fallback),
            Self::Global(policy) => policy,
        }
    }
}

impl Default for IncrementRule {
    fn default() -> Self {
        Self::PerEmployee {
            fallback: IncrementPolicy::Yearly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IncrementPolicy, IncrementRule};
    use crate::model::validation::ValidationError;

    #[test]
    fn parse_accepts_canonical_names_loosely() {
        assert_eq!(
            " half-YEARLY ".parse::<IncrementPolicy>().unwrap(),
            IncrementPolicy::HalfYearly
        );
        assert_eq!(
            "Yearly".parse::<IncrementPolicy>().unwrap(),
            IncrementPolicy::Yearly
        );
    }

    #[test]
    fn parse_rejects_unknown_policy_instead_of_defaulting() {
        let err = "Quarterly".parse::<IncrementPolicy>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownPolicy("Quarterly".to_string()));
    }

    #[test]
    fn global_rule_overrides_stored_policy() {
        let rule = IncrementRule::Global(IncrementPolicy::HalfYearly);
        assert_eq!(
            rule.effective_policy(Some(IncrementPolicy::Yearly)),
            IncrementPolicy::HalfYearly
        );
    }

    #[test]
    fn per_employee_rule_falls_back_only_when_absent() {
        let rule = IncrementRule::PerEmployee {
            fallback: IncrementPolicy::HalfYearly,
        };
        assert_eq!(rule.effective_policy(None), IncrementPolicy::HalfYearly);
        assert_eq!(
            rule.effective_policy(Some(IncrementPolicy::Yearly)),
            IncrementPolicy::Yearly
        );
    }
}
