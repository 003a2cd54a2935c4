//! Tally Core Library
//!
//! Shared functionality for the Tally personal finance tracker:
//! - Database access and migrations
//! - Ownership checks for user-scoped records
//! - Chart aggregation (daily series, category shares, period comparison, targets)
//! - Ledger reports with running balances

pub mod access;
pub mod charts;
pub mod db;
pub mod error;
pub mod models;
pub mod period;
pub mod report;

/// Fixture builders for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use charts::{
    calculate_percentage_change, Allocation, Comparison, RangeChart, SavingsProgress,
    TargetProgress, TypeCost,
};
pub use db::{Database, NewUser, TransactionFilter};
pub use error::{Error, Result};
pub use models::{
    AuditEntry, Category, EntryKind, MonthTarget, NewMonthTarget, NewSaveMoneyTarget,
    NewTransaction, Owner, SaveMoneyTarget, Transaction, User,
};
pub use period::DateRange;
pub use report::{LedgerReport, LedgerRow, ReportPeriod};
