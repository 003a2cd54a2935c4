//! Ledger report queries

use tracing::debug;

use super::Database;
use crate::error::Result;
use crate::models::Owner;
use crate::report::{LedgerReport, ReportPeriod};

impl Database {
    /// Chronological ledger of the owner's transactions for a year or month
    pub fn ledger_report(&self, owner: Owner, period: ReportPeriod) -> Result<LedgerReport> {
        let range = period.range()?;
        let transactions = self.transactions_in_range(owner, range)?;
        debug!(%owner, rows = transactions.len(), file = %period.file_name(), "Building ledger report");
        Ok(LedgerReport::new(period, transactions))
    }
}
