//! Transaction command implementations

use anyhow::Result;
use chrono::Utc;
use tally_core::db::{Database, TransactionFilter};
use tally_core::models::{EntryKind, NewTransaction, Owner};
use tally_core::period::parse_date;
use tally_core::DateRange;

use super::{format_amount, truncate};

pub fn cmd_transactions_list(
    db: &Database,
    owner: Owner,
    from: Option<&str>,
    end: Option<&str>,
    kind: Option<&str>,
    categories: Vec<i64>,
) -> Result<()> {
    let range = match (from, end) {
        (None, None) => DateRange::month_of(Utc::now().date_naive()),
        _ => DateRange::parse(from, end)?,
    };
    let kind = kind
        .map(|k| k.parse::<EntryKind>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let filter = TransactionFilter::new(range)
        .with_categories(categories)
        .with_kind(kind);
    let transactions = db.list_transactions(owner, &filter)?;

    if transactions.is_empty() {
        println!("No transactions between {} and {}.", range.from, range.end);
        return Ok(());
    }

    println!();
    println!("📝 Transactions {} to {}", range.from, range.end);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.kind {
            EntryKind::Outcome => format!("\x1b[31m-{}\x1b[0m", format_amount(tx.amount)),
            EntryKind::Income => format!("\x1b[32m+{}\x1b[0m", format_amount(tx.amount)),
        };
        let categories = tx
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "   [{}] {} │ {:>12} │ {} │ {}",
            tx.id,
            tx.date,
            amount_str,
            truncate(&tx.title, 30),
            categories
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_transactions_add(
    db: &Database,
    owner: Owner,
    date: &str,
    kind: &str,
    amount: i64,
    categories: Vec<i64>,
    title: String,
    description: String,
) -> Result<()> {
    let date = parse_date(date, "transaction")?;
    let kind: EntryKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let mut new = NewTransaction::new(date, kind, amount)
        .with_categories(categories)
        .with_title(title);
    new.description = description;

    let tx = db.create_transaction(owner, &new)?;

    println!(
        "✅ Recorded {} of {} on {} (id {})",
        tx.kind,
        format_amount(tx.amount),
        tx.date,
        tx.id
    );

    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, owner: Owner, id: i64) -> Result<()> {
    let tx = db.get_transaction(owner, id)?;
    db.delete_transaction(owner, id)?;

    println!("✅ Deleted transaction {}:", id);
    println!(
        "   {} │ {} │ {}",
        tx.date,
        format_amount(tx.amount),
        truncate(&tx.title, 40)
    );

    Ok(())
}
