//! Report command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tally_core::db::Database;
use tally_core::models::Owner;
use tally_core::ReportPeriod;
use tracing::info;

use super::format_amount;

/// Where a report lands: a given file, a file inside a given directory, or the
/// default file name in the current directory
pub fn report_path(output: Option<&Path>, file_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

/// Write the ledger for a month (or a whole year) and return the file path
pub fn cmd_report(
    db: &Database,
    owner: Owner,
    year: i32,
    month: Option<u32>,
    format: &str,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let period = match month {
        Some(month) => ReportPeriod::month(year, month),
        None => ReportPeriod::year(year),
    };

    let report = db.ledger_report(owner, period)?;

    let (bytes, file_name) = match format {
        "csv" => (report.to_csv()?, report.file_name()),
        "json" => (
            serde_json::to_vec_pretty(&report)?,
            report.file_name().replace(".csv", ".json"),
        ),
        other => anyhow::bail!("Unknown format: {}. Available: csv, json", other),
    };

    let path = report_path(output, &file_name);
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    info!(rows = report.rows.len(), path = %path.display(), "Wrote ledger report");

    println!("📄 Report written to {}", path.display());
    println!("   Rows:    {}", report.rows.len());
    println!("   Income:  {}", format_amount(report.total_income));
    println!("   Outcome: {}", format_amount(report.total_outcome));
    println!("   Balance: {}", format_amount(report.balance));

    Ok(path)
}
