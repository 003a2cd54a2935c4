//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `resolve_owner` - Map the `--user` account to an owner
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{db::Database, models::Owner};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// The owner behind `--user ACCOUNT`
pub fn resolve_owner(db: &Database, account: Option<&str>) -> Result<Owner> {
    let account = account.context("This command needs --user <ACCOUNT>")?;
    let user = db
        .get_user_by_account(account)?
        .ok_or_else(|| anyhow::anyhow!("User '{}' not found. Add one with 'tally users add'", account))?;
    Ok(user.owner())
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let users = db.list_users()?;
    println!("   Users: {}", users.len());

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a user: tally users add --account me --api-key <KEY>");
    println!("  2. Start the API: tally serve");

    Ok(())
}
