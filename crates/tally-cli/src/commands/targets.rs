//! Target command implementations

use anyhow::Result;
use tally_core::db::Database;
use tally_core::models::{NewMonthTarget, NewSaveMoneyTarget, Owner};
use tally_core::period::parse_date;

use super::format_amount;

pub fn cmd_targets_month(
    db: &Database,
    owner: Owner,
    year: i32,
    month: u32,
    income: i64,
    outcome: i64,
) -> Result<()> {
    let target = db.create_month_target(
        owner,
        &NewMonthTarget {
            year,
            month,
            income_target: income,
            outcome_target: outcome,
        },
    )?;

    println!(
        "✅ Target for {}-{:02}: income {}, outcome {}",
        target.year,
        target.month,
        format_amount(target.income_target),
        format_amount(target.outcome_target)
    );

    Ok(())
}

pub fn cmd_targets_save(
    db: &Database,
    owner: Owner,
    category_id: i64,
    amount: i64,
    from: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    let from_date = from.map(|d| parse_date(d, "from")).transpose()?;
    let end_date = end.map(|d| parse_date(d, "end")).transpose()?;

    let target = db.create_save_target(
        owner,
        &NewSaveMoneyTarget {
            category_id,
            target_amount: amount,
            from_date,
            end_date,
        },
    )?;

    let window = match (target.from_date, target.end_date) {
        (None, None) => "all time".to_string(),
        (from, end) => format!(
            "{} to {}",
            from.map(|d| d.to_string()).unwrap_or_else(|| "open".to_string()),
            end.map(|d| d.to_string()).unwrap_or_else(|| "open".to_string())
        ),
    };
    println!(
        "✅ Save-money target {} for category {}: {} ({})",
        target.id,
        target.category_id,
        format_amount(target.target_amount),
        window
    );

    Ok(())
}
