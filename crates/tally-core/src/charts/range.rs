//! Per-day income/outcome series

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::EntryKind;
use crate::period::{DateRange, DATE_FORMAT};

/// Sum of one kind of transaction on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub kind: EntryKind,
    pub amount: i64,
}

/// Day-indexed chart covering every day of the requested range
#[derive(Debug, Clone, Serialize)]
pub struct RangeChart {
    pub from: NaiveDate,
    pub end: NaiveDate,
    pub labels: Vec<String>,
    pub income: Vec<i64>,
    pub outcome: Vec<i64>,
}

impl RangeChart {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Longest range a dense chart will lay out, roughly ten years
pub const MAX_CHART_DAYS: i64 = 3660;

/// Validate chart bounds and build the range
///
/// A range chart needs at least two days (`end >= from + 1 day`) and at most
/// `MAX_CHART_DAYS`. An `end` before `from` is as short as a single day and
/// reports the same error.
pub fn chart_range(from: NaiveDate, end: NaiveDate) -> Result<DateRange> {
    if end <= from {
        return Err(Error::RangeTooShort(format!(
            "{} to {} is too short, a chart needs at least two days",
            from, end
        )));
    }
    let days = end.signed_duration_since(from).num_days() + 1;
    if days > MAX_CHART_DAYS {
        return Err(Error::InvalidInput(format!(
            "{} to {} spans {} days, a chart covers at most {}",
            from, end, days, MAX_CHART_DAYS
        )));
    }
    DateRange::new(from, end)
}

/// Lay `totals` out over every day of `range`, filling gaps with zero
///
/// Totals outside the range are ignored; several totals for the same day and
/// kind are summed.
pub fn build_range_chart(range: DateRange, totals: &[DailyTotal]) -> RangeChart {
    let mut by_day: HashMap<NaiveDate, (i64, i64)> = HashMap::new();
    for total in totals.iter().filter(|t| range.contains(t.day)) {
        let entry = by_day.entry(total.day).or_default();
        match total.kind {
            EntryKind::Income => entry.0 += total.amount,
            EntryKind::Outcome => entry.1 += total.amount,
        }
    }

    let capacity = range.day_count().max(0) as usize;
    let mut chart = RangeChart {
        from: range.from,
        end: range.end,
        labels: Vec::with_capacity(capacity),
        income: Vec::with_capacity(capacity),
        outcome: Vec::with_capacity(capacity),
    };

    for day in range.days() {
        let (income, outcome) = by_day.get(&day).copied().unwrap_or_default();
        chart.labels.push(day.format(DATE_FORMAT).to_string());
        chart.income.push(income);
        chart.outcome.push(outcome);
    }

    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn total(day: NaiveDate, kind: EntryKind, amount: i64) -> DailyTotal {
        DailyTotal { day, kind, amount }
    }

    #[test]
    fn test_single_day_range_is_too_short() {
        assert!(matches!(
            chart_range(date(2024, 1, 1), date(2024, 1, 1)),
            Err(Error::RangeTooShort(_))
        ));

        let two_days = chart_range(date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        assert_eq!(two_days.day_count(), 2);
    }

    #[test]
    fn test_span_check_at_calendar_edges() {
        assert!(matches!(
            chart_range(NaiveDate::MAX, NaiveDate::MAX),
            Err(Error::RangeTooShort(_))
        ));
        assert!(matches!(
            chart_range(NaiveDate::MIN, NaiveDate::MIN),
            Err(Error::RangeTooShort(_))
        ));
        assert!(matches!(
            chart_range(NaiveDate::MAX, NaiveDate::MIN),
            Err(Error::RangeTooShort(_))
        ));
        assert!(matches!(
            chart_range(NaiveDate::MIN, NaiveDate::MAX),
            Err(Error::InvalidInput(_))
        ));

        let tail = chart_range(NaiveDate::MAX - Duration::days(1), NaiveDate::MAX).unwrap();
        assert_eq!(tail.day_count(), 2);
    }

    #[test]
    fn test_chart_range_end_before_from_is_too_short() {
        assert!(matches!(
            chart_range(date(2024, 3, 5), date(2024, 3, 1)),
            Err(Error::RangeTooShort(_))
        ));
        assert!(matches!(
            chart_range(date(2024, 3, 5), date(2024, 3, 5)),
            Err(Error::RangeTooShort(_))
        ));

        let range = chart_range(date(2024, 3, 1), date(2024, 3, 5)).unwrap();
        assert_eq!(range.day_count(), 5);
    }

    #[test]
    fn test_chart_span_upper_limit() {
        let from = date(2020, 1, 1);
        let at_limit = from + Duration::days(MAX_CHART_DAYS - 1);
        assert_eq!(chart_range(from, at_limit).unwrap().day_count(), MAX_CHART_DAYS);

        let past_limit = from + Duration::days(MAX_CHART_DAYS);
        assert!(matches!(
            chart_range(from, past_limit),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_dense_output_fills_gaps() {
        let start = date(2024, 5, 1);
        let range = DateRange::new(start, date(2024, 5, 7)).unwrap();
        let totals = vec![
            total(start, EntryKind::Income, 10000),
            total(start, EntryKind::Outcome, 20000),
            total(date(2024, 5, 2), EntryKind::Income, 10000),
            total(date(2024, 5, 2), EntryKind::Outcome, 20000),
            total(date(2024, 5, 6), EntryKind::Outcome, 80000),
        ];

        let chart = build_range_chart(range, &totals);

        assert_eq!(chart.len(), 7);
        assert_eq!(chart.labels[0], "2024-05-01");
        assert_eq!(chart.labels[6], "2024-05-07");
        assert_eq!(chart.income, vec![10000, 10000, 0, 0, 0, 0, 0]);
        assert_eq!(chart.outcome, vec![20000, 20000, 0, 0, 0, 80000, 0]);
    }

    #[test]
    fn test_no_data_yields_zeroes() {
        let range = DateRange::new(date(2024, 1, 30), date(2024, 2, 2)).unwrap();
        let chart = build_range_chart(range, &[]);
        assert_eq!(chart.len(), 4);
        assert!(chart.income.iter().all(|&v| v == 0));
        assert!(chart.outcome.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_out_of_range_totals_ignored_and_duplicates_summed() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        let totals = vec![
            total(date(2023, 12, 31), EntryKind::Income, 999),
            total(date(2024, 1, 2), EntryKind::Income, 5),
            total(date(2024, 1, 2), EntryKind::Income, 7),
        ];
        let chart = build_range_chart(range, &totals);
        assert_eq!(chart.income, vec![0, 12]);
    }
}
