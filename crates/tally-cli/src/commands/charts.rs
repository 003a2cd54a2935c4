//! Chart command implementations
//!
//! Each chart is printed as pretty JSON, in the same shape the API returns.

use anyhow::Result;
use serde::Serialize;
use tally_core::db::Database;
use tally_core::models::Owner;
use tally_core::period::parse_bounds;
use tally_core::DateRange;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn cmd_chart_range(db: &Database, owner: Owner, from: &str, end: &str) -> Result<()> {
    let (from, end) = parse_bounds(Some(from), Some(end))?;
    print_json(&db.range_chart(owner, from, end)?)
}

pub fn cmd_chart_categories(db: &Database, owner: Owner, from: &str, end: &str) -> Result<()> {
    let range = DateRange::parse(Some(from), Some(end))?;
    print_json(&db.type_cost(owner, range)?)
}

pub fn cmd_chart_compare(db: &Database, owner: Owner, from: &str, end: &str) -> Result<()> {
    let range = DateRange::parse(Some(from), Some(end))?;
    print_json(&db.compare_cost(owner, range)?)
}

pub fn cmd_chart_target(db: &Database, owner: Owner, year: i32, month: u32) -> Result<()> {
    print_json(&db.month_target_progress(owner, year, month)?)
}

pub fn cmd_chart_save(db: &Database, owner: Owner, category_id: i64) -> Result<()> {
    print_json(&db.savings_progress(owner, category_id)?)
}
