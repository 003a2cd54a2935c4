//! Chart aggregation
//!
//! Every function here is pure: it receives already-queried totals and a
//! date range and shapes the chart payload. The queries live in `db::charts`.
//!
//! - `range` - dense per-day income/outcome series
//! - `allocation` - category percentages reconciled to exactly 100
//! - `compare` - current vs. preceding period with percentage change
//! - `target` - monthly and save-money target progress

use serde::Serialize;

pub mod allocation;
pub mod compare;
pub mod range;
pub mod target;

pub use allocation::{allocate, Allocation, CategoryShare, CategoryTotal, TypeCost, TypeCostEntry};
pub use compare::{calculate_percentage_change, Comparison, ZERO_BASELINE_SENTINEL};
pub use range::{
    build_range_chart, chart_range, DailyTotal, RangeChart, MAX_CHART_DAYS,
};
pub use target::{evaluate_month, evaluate_savings, remaining, SavingsProgress, TargetProgress};

/// Income and outcome sums over some span
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub income: i64,
    pub outcome: i64,
}

impl PeriodTotals {
    pub fn new(income: i64, outcome: i64) -> Self {
        Self { income, outcome }
    }

    /// Income minus outcome
    pub fn net(&self) -> i64 {
        self.income - self.outcome
    }
}
