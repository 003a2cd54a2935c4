//! Category command implementations

use anyhow::Result;
use tally_core::db::Database;
use tally_core::models::Owner;

pub fn cmd_categories_list(db: &Database, owner: Owner, assigned_only: bool) -> Result<()> {
    let categories = db.list_categories(owner, assigned_only)?;

    if categories.is_empty() {
        println!("No categories found. Add one with:");
        println!("  tally categories add <NAME>");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────");

    for category in categories {
        println!("   [{}] {}", category.id, category.name);
    }

    Ok(())
}

pub fn cmd_categories_add(db: &Database, owner: Owner, name: &str) -> Result<()> {
    let category = db.create_category(owner, name)?;
    println!("✅ Added category '{}' (id {})", category.name, category.id);
    Ok(())
}
