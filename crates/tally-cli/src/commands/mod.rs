//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database initialization and shared utilities (open_db, resolve_owner)
//! - `users` - User registration and listing
//! - `categories` - Category commands (list, add)
//! - `transactions` - Transaction commands (list, add, delete)
//! - `targets` - Month and save-money targets
//! - `charts` - Chart data as JSON
//! - `reports` - Ledger report files
//! - `serve` - Web server command

pub mod categories;
pub mod charts;
pub mod core;
pub mod reports;
pub mod serve;
pub mod targets;
pub mod transactions;
pub mod users;

// Re-export command functions for main.rs
pub use categories::*;
pub use charts::*;
pub use core::*;
pub use reports::*;
pub use serve::*;
pub use targets::*;
pub use transactions::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format minor units as a signed amount with two decimals
pub fn format_amount(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
