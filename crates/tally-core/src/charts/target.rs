//! Progress against month targets and save-money targets

use chrono::NaiveDate;
use serde::Serialize;

use super::PeriodTotals;
use crate::models::{Category, MonthTarget, SaveMoneyTarget};

/// What is left to reach `target`, never below zero
pub fn remaining(target: i64, achieved: i64) -> i64 {
    (target - achieved).max(0)
}

/// Month target chart; each series is `[achieved, remaining]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetProgress {
    pub year: i32,
    pub month: u32,
    pub target_income: i64,
    pub target_outcome: i64,
    pub income: [i64; 2],
    pub outcome: [i64; 2],
}

/// Compare a month's achieved sums with its target (a missing target counts as 0)
pub fn evaluate_month(
    year: i32,
    month: u32,
    target: Option<&MonthTarget>,
    achieved: PeriodTotals,
) -> TargetProgress {
    let target_income = target.map(|t| t.income_target).unwrap_or(0);
    let target_outcome = target.map(|t| t.outcome_target).unwrap_or(0);

    TargetProgress {
        year,
        month,
        target_income,
        target_outcome,
        income: [achieved.income, remaining(target_income, achieved.income)],
        outcome: [achieved.outcome, remaining(target_outcome, achieved.outcome)],
    }
}

/// Save-money target chart; `spent` is `[spent, remaining]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingsProgress {
    pub category_id: i64,
    pub category: String,
    pub target: i64,
    pub from: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub spent: [i64; 2],
}

pub fn evaluate_savings(target: &SaveMoneyTarget, category: &Category, spent: i64) -> SavingsProgress {
    SavingsProgress {
        category_id: category.id,
        category: category.name.clone(),
        target: target.target_amount,
        from: target.from_date,
        end: target.end_date,
        spent: [spent, remaining(target.target_amount, spent)],
    }
}
