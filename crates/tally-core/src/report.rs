//! Ledger reports: chronological rows with a running balance, as CSV or JSON

use chrono::Datelike;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{EntryKind, Transaction};
use crate::period::DateRange;

/// Byte-order mark so spreadsheet apps detect UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const HEADERS: [&str; 9] = [
    "year",
    "month",
    "day",
    "categories",
    "kind",
    "title",
    "income",
    "outcome",
    "balance",
];

/// A whole year or a single month of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    pub year: i32,
    pub month: Option<u32>,
}

impl ReportPeriod {
    pub fn year(year: i32) -> Self {
        Self { year, month: None }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }

    pub fn range(&self) -> Result<DateRange> {
        match self.month {
            Some(month) => DateRange::month(self.year, month),
            None => DateRange::year(self.year),
        }
    }

    /// `tally-2024.csv` or `tally-2024-03.csv`
    pub fn file_name(&self) -> String {
        match self.month {
            Some(month) => format!("tally-{}-{:02}.csv", self.year, month),
            None => format!("tally-{}.csv", self.year),
        }
    }
}

/// One report line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRow {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Category names joined with `", "`
    pub categories: String,
    pub kind: EntryKind,
    pub title: String,
    pub income: Option<i64>,
    pub outcome: Option<i64>,
    /// Income minus outcome up to and including this row
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerReport {
    pub period: ReportPeriod,
    pub total_income: i64,
    pub total_outcome: i64,
    pub balance: i64,
    pub rows: Vec<LedgerRow>,
}

impl LedgerReport {
    /// Build a report from an unordered set of transactions
    pub fn new(period: ReportPeriod, mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by_key(|tx| (tx.date, tx.id));

        let mut balance = 0i64;
        let mut total_income = 0i64;
        let mut total_outcome = 0i64;
        let rows = transactions
            .iter()
            .map(|tx| {
                balance += tx.kind.signed(tx.amount);
                let (income, outcome) = match tx.kind {
                    EntryKind::Income => {
                        total_income += tx.amount;
                        (Some(tx.amount), None)
                    }
                    EntryKind::Outcome => {
                        total_outcome += tx.amount;
                        (None, Some(tx.amount))
                    }
                };
                LedgerRow {
                    year: tx.date.year(),
                    month: tx.date.month(),
                    day: tx.date.day(),
                    categories: tx
                        .categories
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    kind: tx.kind,
                    title: tx.title.clone(),
                    income,
                    outcome,
                    balance,
                }
            })
            .collect();

        Self {
            period,
            total_income,
            total_outcome,
            balance,
            rows,
        }
    }

    pub fn file_name(&self) -> String {
        self.period.file_name()
    }

    /// Render as UTF-8 CSV with a leading BOM
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
        writer.write_record(HEADERS)?;

        for row in &self.rows {
            writer.write_record([
                row.year.to_string(),
                row.month.to_string(),
                row.day.to_string(),
                row.categories.clone(),
                row.kind.to_string(),
                row.title.clone(),
                row.income.map(|v| v.to_string()).unwrap_or_default(),
                row.outcome.map(|v| v.to_string()).unwrap_or_default(),
                row.balance.to_string(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::models::Category;

    fn tx(id: i64, date: (i32, u32, u32), kind: EntryKind, amount: i64, cats: &[&str]) -> Transaction {
        Transaction {
            id,
            owner_id: 1,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            kind,
            amount,
            categories: cats
                .iter()
                .enumerate()
                .map(|(i, name)| Category {
                    id: i as i64 + 1,
                    owner_id: 1,
                    name: name.to_string(),
                })
                .collect(),
            title: format!("tx {}", id),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(ReportPeriod::year(2024).file_name(), "tally-2024.csv");
        assert_eq!(ReportPeriod::month(2024, 3).file_name(), "tally-2024-03.csv");
    }

    #[test]
    fn test_rows_are_chronological_with_running_balance() {
        let transactions = vec![
            tx(3, (2024, 3, 5), EntryKind::Outcome, 400, &["Food"]),
            tx(1, (2024, 3, 1), EntryKind::Income, 1000, &[]),
            tx(2, (2024, 3, 5), EntryKind::Outcome, 100, &["Food", "Fun"]),
        ];

        let report = LedgerReport::new(ReportPeriod::month(2024, 3), transactions);

        let balances: Vec<_> = report.rows.iter().map(|r| r.balance).collect();
        assert_eq!(balances, vec![1000, 900, 500]);
        assert_eq!(report.rows[1].categories, "Food, Fun");
        assert_eq!(report.rows[0].outcome, None);
        assert_eq!(report.rows[2].outcome, Some(400));
        assert_eq!(report.total_income, 1000);
        assert_eq!(report.total_outcome, 500);
        assert_eq!(report.balance, report.total_income - report.total_outcome);
        assert_eq!(report.rows.last().unwrap().balance, report.balance);
    }

    #[test]
    fn test_csv_has_bom_and_blank_amount_cells() {
        let transactions = vec![
            tx(1, (2024, 1, 2), EntryKind::Income, 250, &[]),
            tx(2, (2024, 1, 3), EntryKind::Outcome, 50, &["Café, bar"]),
        ];
        let report = LedgerReport::new(ReportPeriod::year(2024), transactions);

        let bytes = report.to_csv().unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "year,month,day,categories,kind,title,income,outcome,balance");
        assert_eq!(lines[1], "2024,1,2,,income,tx 1,250,,250");
        assert_eq!(lines[2], "2024,1,3,\"Café, bar\",outcome,tx 2,,50,200");
    }

    #[test]
    fn test_empty_report() {
        let report = LedgerReport::new(ReportPeriod::year(2023), Vec::new());
        assert!(report.rows.is_empty());
        assert_eq!(report.balance, 0);

        let bytes = report.to_csv().unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
