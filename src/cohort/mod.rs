//! Cohort definition rules and the audience size estimate.
//!
//! The estimate is the dashboard's mock: a fixed base audience shrunk by a
//! constant factor per valid rule. It exists to give the builder immediate
//! feedback while editing, not to query a real player base.

use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Player attributes a cohort rule can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum RuleField {
    TotalSessions,
    TotalIapSpend,
    Platform,
    Region,
    UserType,
    FeatureUsage,
    EngagementPattern,
    PurchaseHistory,
}

impl RuleField {
    pub fn display_name(self) -> &'static str {
        match self {
            RuleField::TotalSessions => "Total Sessions",
            RuleField::TotalIapSpend => "Total IAP Spend",
            RuleField::Platform => "Platform",
            RuleField::Region => "Region",
            RuleField::UserType => "User Type",
            RuleField::FeatureUsage => "Feature Usage",
            RuleField::EngagementPattern => "Engagement Pattern",
            RuleField::PurchaseHistory => "Purchase History",
        }
    }

    /// Numeric fields require a parseable value before a rule counts.
    pub fn is_numeric(self) -> bool {
        matches!(self, RuleField::TotalSessions | RuleField::TotalIapSpend)
    }
}

/// Comparison operators offered by the rule builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RuleOp {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Ne,
    Contains,
    In,
}

impl RuleOp {
    pub fn display_name(self) -> &'static str {
        match self {
            RuleOp::Gt => "Greater than",
            RuleOp::Gte => "Greater than or equal",
            RuleOp::Lt => "Less than",
            RuleOp::Lte => "Less than or equal",
            RuleOp::Eq => "Equals",
            RuleOp::Ne => "Not equals",
            RuleOp::Contains => "Contains",
            RuleOp::In => "In list",
        }
    }
}

/// One attribute/behavior predicate of a cohort definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortRule {
    pub field: RuleField,
    pub op: RuleOp,
    pub value: String,
}

impl CohortRule {
    /// A rule only counts toward the estimate once fully filled in.
    pub fn is_valid(&self) -> bool {
        let value = self.value.trim();
        if value.is_empty() {
            return false;
        }
        if self.field.is_numeric() {
            return value.parse::<f64>().is_ok();
        }
        true
    }
}

impl FromStr for CohortRule {
    type Err = AppError;

    /// Parse the CLI form `field:op:value` (the value may contain colons).
    fn from_str(s: &str) -> Result<Self, AppError> {
        let mut parts = s.splitn(3, ':');
        let field = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::input(format!("Rule '{s}' is missing a field.")))?;
        let op = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::input(format!("Rule '{s}' is missing an operator.")))?;
        let value = parts
            .next()
            .ok_or_else(|| AppError::input(format!("Rule '{s}' is missing a value.")))?;

        let field = <RuleField as ValueEnum>::from_str(field, true)
            .map_err(|_| AppError::input(format!("Unknown rule field '{field}'.")))?;
        let op = <RuleOp as ValueEnum>::from_str(op, true)
            .map_err(|_| AppError::input(format!("Unknown rule operator '{op}'.")))?;

        Ok(Self {
            field,
            op,
            value: value.to_string(),
        })
    }
}

/// A full cohort definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortSpec {
    pub name: String,
    pub rules: Vec<CohortRule>,
    pub exclude_test_users: bool,
}

/// Base audience before any rule narrows it.
const BASE_AUDIENCE: f64 = 5000.0;
/// Multiplicative shrink applied per valid rule.
const RULE_MULTIPLIER: f64 = 0.8;

/// Estimate the audience size for a cohort spec.
///
/// `None` until at least one rule is fully specified (the builder shows a
/// dash rather than a zero-size cohort).
pub fn estimate_size(spec: &CohortSpec) -> Option<u64> {
    let valid = spec.rules.iter().filter(|r| r.is_valid()).count();
    if valid == 0 {
        return None;
    }
    Some((BASE_AUDIENCE * RULE_MULTIPLIER.powi(valid as i32)).floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(field: RuleField, op: RuleOp, value: &str) -> CohortRule {
        CohortRule {
            field,
            op,
            value: value.to_string(),
        }
    }

    fn spec(rules: Vec<CohortRule>) -> CohortSpec {
        CohortSpec {
            name: "Test cohort".to_string(),
            rules,
            exclude_test_users: true,
        }
    }

    #[test]
    fn estimate_shrinks_per_valid_rule() {
        let one = spec(vec![rule(RuleField::TotalSessions, RuleOp::Gte, "5")]);
        assert_eq!(estimate_size(&one), Some(4000));

        let three = spec(vec![
            rule(RuleField::TotalSessions, RuleOp::Gte, "5"),
            rule(RuleField::Platform, RuleOp::Eq, "ios"),
            rule(RuleField::TotalIapSpend, RuleOp::Gt, "9.99"),
        ]);
        // 5000 * 0.8^3 = 2560
        assert_eq!(estimate_size(&three), Some(2560));
    }

    #[test]
    fn invalid_rules_do_not_count() {
        let mixed = spec(vec![
            rule(RuleField::TotalSessions, RuleOp::Gte, "not-a-number"),
            rule(RuleField::Region, RuleOp::Eq, "  "),
            rule(RuleField::Platform, RuleOp::Eq, "android"),
        ]);
        assert_eq!(estimate_size(&mixed), Some(4000), "only the platform rule is valid");

        let none = spec(vec![rule(RuleField::TotalSessions, RuleOp::Gt, "")]);
        assert_eq!(estimate_size(&none), None);
        assert_eq!(estimate_size(&spec(Vec::new())), None);
    }

    #[test]
    fn parses_cli_rule_syntax() {
        let parsed: CohortRule = "total_sessions:gte:5".parse().unwrap();
        assert_eq!(parsed, rule(RuleField::TotalSessions, RuleOp::Gte, "5"));

        // The value keeps any further colons.
        let listed: CohortRule = "region:in:na:eu".parse().unwrap();
        assert_eq!(listed.value, "na:eu");

        assert!("total_sessions:gte".parse::<CohortRule>().is_err());
        assert!("sessions:gte:5".parse::<CohortRule>().is_err());
        assert!("total_sessions:near:5".parse::<CohortRule>().is_err());
    }
}
