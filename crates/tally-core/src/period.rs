//! Calendar date ranges and month boundaries

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};

/// Wire format for every date the API accepts or returns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string, naming the offending field in the error
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        Error::InvalidInput(format!(
            "Invalid {} date '{}' (use YYYY-MM-DD)",
            field, value
        ))
    })
}

/// Parse a required `from`/`end` pair without checking their order
pub fn parse_bounds(from: Option<&str>, end: Option<&str>) -> Result<(NaiveDate, NaiveDate)> {
    let from = from.ok_or_else(|| Error::InvalidInput("Missing 'from' date".to_string()))?;
    let end = end.ok_or_else(|| Error::InvalidInput("Missing 'end' date".to_string()))?;
    Ok((parse_date(from, "from")?, parse_date(end, "end")?))
}

/// An inclusive `[from, end]` span of calendar days with `from <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < from {
            return Err(Error::InvalidInput(format!(
                "end date {} is before from date {}",
                end, from
            )));
        }
        Ok(Self { from, end })
    }

    /// Parse both bounds from query strings; a missing bound is invalid input
    pub fn parse(from: Option<&str>, end: Option<&str>) -> Result<Self> {
        let (from, end) = parse_bounds(from, end)?;
        Self::new(from, end)
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        // Day 1 and the month's last day always exist for a valid date
        let from = date.with_day(1).unwrap_or(date);
        let end = last_day_of_month(date.year(), date.month()).unwrap_or(date);
        Self { from, end }
    }

    /// The calendar month `year-month`, rolling December into the next January
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let from = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid month {}-{}", year, month)))?;
        let end = last_day_of_month(year, month)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid month {}-{}", year, month)))?;
        Ok(Self { from, end })
    }

    /// January 1st through December 31st of `year`
    pub fn year(year: i32) -> Result<Self> {
        let from = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid year {}", year)))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid year {}", year)))?;
        Ok(Self { from, end })
    }

    /// Number of calendar days covered, counting both ends
    pub fn day_count(&self) -> i64 {
        (self.end - self.from).num_days() + 1
    }

    /// `end - from` as a duration (zero for a single-day range)
    pub fn span(&self) -> Duration {
        self.end - self.from
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.end
    }

    /// Every day in the range, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let from = self.from;
        (0..self.day_count()).map(move |offset| from + Duration::days(offset))
    }

    /// The equally long range ending the day before this one starts
    pub fn preceding(&self) -> Result<Self> {
        let bounds = self
            .from
            .checked_sub_signed(Duration::days(1))
            .and_then(|end| end.checked_sub_signed(self.span()).map(|from| (from, end)));
        match bounds {
            Some((from, end)) => Ok(Self { from, end }),
            None => Err(Error::InvalidInput(format!(
                "No range of {} days precedes {}",
                self.day_count(),
                self.from
            ))),
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_range() {
        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-07")).unwrap();
        assert_eq!(range.from, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 1, 7));
        assert_eq!(range.day_count(), 7);
    }

    #[test]
    fn test_parse_rejects_garbage_and_missing() {
        assert!(matches!(
            DateRange::parse(Some("2024/01/01"), Some("2024-01-07")),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            DateRange::parse(None, Some("2024-01-07")),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            DateRange::parse(Some("2024-02-30"), Some("2024-03-01")),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_end_before_from_is_invalid() {
        let result = DateRange::new(date(2024, 1, 5), date(2024, 1, 4));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_month_bounds_handle_december_and_leap_years() {
        let dec = DateRange::month(2023, 12).unwrap();
        assert_eq!(dec.from, date(2023, 12, 1));
        assert_eq!(dec.end, date(2023, 12, 31));

        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.end, date(2024, 2, 29));

        assert!(DateRange::month(2024, 13).is_err());
        assert!(DateRange::month(2024, 0).is_err());
    }

    #[test]
    fn test_preceding_range_has_same_span() {
        let current = DateRange::new(date(2024, 3, 11), date(2024, 3, 20)).unwrap();
        let previous = current.preceding().unwrap();
        assert_eq!(previous.end, date(2024, 3, 10));
        assert_eq!(previous.from, date(2024, 3, 1));
        assert_eq!(previous.day_count(), current.day_count());
    }

    #[test]
    fn test_preceding_range_at_calendar_start_is_invalid() {
        let first = DateRange::new(NaiveDate::MIN, NaiveDate::MIN).unwrap();
        assert!(matches!(first.preceding(), Err(Error::InvalidInput(_))));

        let near_start = DateRange::new(
            NaiveDate::MIN + Duration::days(3),
            NaiveDate::MIN + Duration::days(10),
        )
        .unwrap();
        assert!(matches!(near_start.preceding(), Err(Error::InvalidInput(_))));

        let last = DateRange::new(NaiveDate::MAX, NaiveDate::MAX).unwrap();
        let previous = last.preceding().unwrap();
        assert_eq!(previous.end, NaiveDate::MAX - Duration::days(1));
        assert_eq!(previous.day_count(), 1);
    }

    #[test]
    fn test_days_iterates_inclusively() {
        let range = DateRange::new(date(2024, 2, 27), date(2024, 3, 1)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(
            days,
            vec![
                date(2024, 2, 27),
                date(2024, 2, 28),
                date(2024, 2, 29),
                date(2024, 3, 1)
            ]
        );
    }
}
