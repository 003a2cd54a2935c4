//! Aggregation queries behind the chart endpoints
//!
//! Each query is scoped to one owner; the shaping math lives in `crate::charts`.

use chrono::NaiveDate;
use rusqlite::params;
use tracing::debug;

use super::{date_param, parse_stored_date, Database};
use crate::charts::{
    allocate, build_range_chart, chart_range, evaluate_month, evaluate_savings,
    CategoryTotal, Comparison, DailyTotal, PeriodTotals, RangeChart, SavingsProgress,
    TargetProgress, TypeCost,
};
use crate::error::{Error, Result};
use crate::models::{EntryKind, Owner};
use crate::period::DateRange;

impl Database {
    // ========== Raw aggregates ==========

    /// Per-day, per-kind sums inside `range` (days without data are absent)
    pub fn daily_totals(&self, owner: Owner, range: DateRange) -> Result<Vec<DailyTotal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT date, kind, SUM(amount)
            FROM transactions
            WHERE owner_id = ? AND date BETWEEN ? AND ?
            GROUP BY date, kind
            ORDER BY date
            "#,
        )?;

        let totals = stmt
            .query_map(
                params![owner.id(), date_param(range.from), date_param(range.end)],
                |row| {
                    let day: String = row.get(0)?;
                    let kind: String = row.get(1)?;
                    Ok(DailyTotal {
                        day: parse_stored_date(0, &day)?,
                        kind: kind.parse().map_err(|e: String| {
                            rusqlite::Error::FromSqlConversionFailure(
                                1,
                                rusqlite::types::Type::Text,
                                e.into(),
                            )
                        })?,
                        amount: row.get(2)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Income and outcome sums inside `range`
    pub fn period_totals(&self, owner: Owner, range: DateRange) -> Result<PeriodTotals> {
        let conn = self.conn()?;
        let totals = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN kind = 'income' THEN amount ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN kind = 'outcome' THEN amount ELSE 0 END), 0)
            FROM transactions
            WHERE owner_id = ? AND date BETWEEN ? AND ?
            "#,
            params![owner.id(), date_param(range.from), date_param(range.end)],
            |row| Ok(PeriodTotals::new(row.get(0)?, row.get(1)?)),
        )?;
        Ok(totals)
    }

    /// Outcome per category inside `range`
    ///
    /// Uncategorized outcome forms one bucket with no category id. A
    /// transaction linked to several categories counts fully in each.
    pub fn category_outcome_totals(
        &self,
        owner: Owner,
        range: DateRange,
    ) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT c.id, c.name, SUM(t.amount) AS total
            FROM transactions t
            LEFT JOIN transaction_categories tc ON tc.transaction_id = t.id
            LEFT JOIN categories c ON c.id = tc.category_id
            WHERE t.owner_id = ?1
              AND t.kind = ?2
              AND t.date BETWEEN ?3 AND ?4
            GROUP BY c.id
            ORDER BY total DESC, c.id IS NULL, c.id
            "#,
        )?;

        let totals = stmt
            .query_map(
                params![
                    owner.id(),
                    EntryKind::Outcome.as_str(),
                    date_param(range.from),
                    date_param(range.end)
                ],
                |row| {
                    let category_id: Option<i64> = row.get(0)?;
                    let name: Option<String> = row.get(1)?;
                    let total: i64 = row.get(2)?;
                    Ok(match (category_id, name) {
                        (Some(id), Some(name)) => CategoryTotal::new(id, name, total),
                        _ => CategoryTotal::uncategorized(total),
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Outcome linked to one category, optionally bounded on either side
    pub fn category_outcome_sum(
        &self,
        owner: Owner,
        category_id: i64,
        from: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        let sum = conn.query_row(
            r#"
            SELECT COALESCE(SUM(t.amount), 0)
            FROM transactions t
            JOIN transaction_categories tc ON tc.transaction_id = t.id
            WHERE t.owner_id = ?1
              AND tc.category_id = ?2
              AND t.kind = 'outcome'
              AND (?3 IS NULL OR t.date >= ?3)
              AND (?4 IS NULL OR t.date <= ?4)
            "#,
            params![owner.id(), category_id, from.map(date_param), end.map(date_param)],
            |row| row.get(0),
        )?;
        Ok(sum)
    }

    // ========== Charts ==========

    /// Dense per-day income/outcome chart from `from` through `end`
    ///
    /// The span must cover at least two days and at most `MAX_CHART_DAYS`.
    pub fn range_chart(
        &self,
        owner: Owner,
        from: NaiveDate,
        end: NaiveDate,
    ) -> Result<RangeChart> {
        let range = chart_range(from, end)?;
        let totals = self.daily_totals(owner, range)?;
        Ok(build_range_chart(range, &totals))
    }

    /// Category breakdown of outcome with percentages summing to 100
    pub fn type_cost(&self, owner: Owner, range: DateRange) -> Result<TypeCost> {
        let totals = self.category_outcome_totals(owner, range)?;
        let allocation = allocate(&totals);
        if allocation.residual != 0 {
            debug!(
                %owner,
                residual = allocation.residual,
                categories = allocation.shares.len(),
                "Category percentages could not be fully reconciled"
            );
        }
        Ok(TypeCost::new(range, &allocation))
    }

    /// Totals for `range` against the equally long period right before it
    pub fn compare_cost(&self, owner: Owner, range: DateRange) -> Result<Comparison> {
        let previous_range = range.preceding()?;
        let current = self.period_totals(owner, range)?;
        let previous = self.period_totals(owner, previous_range)?;
        Ok(Comparison::new(range, previous_range, current, previous))
    }

    /// Achieved sums for a calendar month against its target
    pub fn month_target_progress(
        &self,
        owner: Owner,
        year: i32,
        month: u32,
    ) -> Result<TargetProgress> {
        let range = DateRange::month(year, month)?;
        let target = self.find_month_target(owner, year, month)?;
        let achieved = self.period_totals(owner, range)?;
        Ok(evaluate_month(year, month, target.as_ref(), achieved))
    }

    /// Outcome in a category against its save-money target
    pub fn savings_progress(&self, owner: Owner, category_id: i64) -> Result<SavingsProgress> {
        let category = self.get_category(owner, category_id)?;
        let target = self
            .find_save_target_for_category(owner, category_id)?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Save-money target for category {} not found",
                    category_id
                ))
            })?;

        let spent =
            self.category_outcome_sum(owner, category_id, target.from_date, target.end_date)?;
        Ok(evaluate_savings(&target, &category, spent))
    }
}
