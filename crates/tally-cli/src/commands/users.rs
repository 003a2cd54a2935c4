//! User command implementations

use anyhow::{Context, Result};
use tally_core::db::{Database, NewUser};

pub fn cmd_users_add(
    db: &Database,
    account: &str,
    name: Option<String>,
    email: Option<String>,
    api_key: &str,
) -> Result<()> {
    let user = db
        .create_user(&NewUser {
            account: account.to_string(),
            name: name.unwrap_or_else(|| account.to_string()),
            email,
            api_key: api_key.to_string(),
        })
        .context("Failed to add user")?;

    println!("✅ Added user {} ({})", user.account, user.id);
    println!("   Use 'Authorization: Bearer <KEY>' to call the API as this user.");

    Ok(())
}

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Add one with:");
        println!("  tally users add --account me --api-key <KEY>");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────────────");

    for user in users {
        println!(
            "   [{}] {} │ {} │ {}",
            user.id,
            user.account,
            user.name,
            user.email.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
