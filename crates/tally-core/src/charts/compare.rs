//! Current period vs. the equally long period before it

use chrono::NaiveDate;
use serde::Serialize;

use super::PeriodTotals;
use crate::period::DateRange;

/// Reported instead of a percentage when the previous value was zero
pub const ZERO_BASELINE_SENTINEL: f64 = -101.0;

/// `(new - old) / old * 100` rounded to two decimals
///
/// Returns [`ZERO_BASELINE_SENTINEL`] when `old` is zero.
pub fn calculate_percentage_change(old: i64, new: i64) -> f64 {
    if old == 0 {
        return ZERO_BASELINE_SENTINEL;
    }
    let change = (new - old) as f64 / old as f64 * 100.0;
    (change * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub from: NaiveDate,
    pub end: NaiveDate,
    pub prev_from: NaiveDate,
    pub prev_end: NaiveDate,
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub income_diff: i64,
    pub outcome_diff: i64,
    pub income_change: f64,
    pub outcome_change: f64,
}

impl Comparison {
    /// `previous_range` is normally `current_range.preceding()`
    pub fn new(
        current_range: DateRange,
        previous_range: DateRange,
        current: PeriodTotals,
        previous: PeriodTotals,
    ) -> Self {
        Self {
            from: current_range.from,
            end: current_range.end,
            prev_from: previous_range.from,
            prev_end: previous_range.end,
            current,
            previous,
            income_diff: current.income - previous.income,
            outcome_diff: current.outcome - previous.outcome,
            income_change: calculate_percentage_change(previous.income, current.income),
            outcome_change: calculate_percentage_change(previous.outcome, current.outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_change() {
        assert_eq!(calculate_percentage_change(100, 150), 50.0);
        assert_eq!(calculate_percentage_change(200, 100), -50.0);
        assert_eq!(calculate_percentage_change(3, 4), 33.33);
        assert_eq!(calculate_percentage_change(100, 100), 0.0);
    }

    #[test]
    fn test_zero_baseline_is_sentinel() {
        assert_eq!(calculate_percentage_change(0, 500), -101.0);
        assert_eq!(calculate_percentage_change(0, 0), ZERO_BASELINE_SENTINEL);
    }

    #[test]
    fn test_comparison_fields() {
        let current_range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
        )
        .unwrap();
        let previous_range = current_range.preceding().unwrap();

        let cmp = Comparison::new(
            current_range,
            previous_range,
            PeriodTotals::new(150, 0),
            PeriodTotals::new(100, 40),
        );

        assert_eq!(cmp.prev_end, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(cmp.prev_from, NaiveDate::from_ymd_opt(2024, 1, 22).unwrap());
        assert_eq!(cmp.income_diff, 50);
        assert_eq!(cmp.outcome_diff, -40);
        assert_eq!(cmp.income_change, 50.0);
        assert_eq!(cmp.outcome_change, -100.0);
    }
}
