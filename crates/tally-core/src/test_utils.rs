//! Test utilities for tally-core
//!
//! Fixture builders shared by the core, server and CLI test suites.

use chrono::NaiveDate;

use crate::db::{Database, NewUser};
use crate::models::{Category, EntryKind, NewTransaction, Owner, Transaction};

/// API key used by [`create_user`]; the account name is appended so keys stay unique
pub const TEST_API_KEY_PREFIX: &str = "test-api-key-";

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// The bearer key [`create_user`] registers for `account`
pub fn api_key_for(account: &str) -> String {
    format!("{}{}", TEST_API_KEY_PREFIX, account)
}

/// Register a user named after `account` and return its owner handle
pub fn create_user(db: &Database, account: &str) -> Owner {
    db.create_user(&NewUser {
        account: account.to_string(),
        name: account.to_string(),
        email: Some(format!("{}@example.com", account)),
        api_key: api_key_for(account),
    })
    .expect("create test user")
    .owner()
}

pub fn create_category(db: &Database, owner: Owner, name: &str) -> Category {
    db.create_category(owner, name).expect("create test category")
}

/// Insert a transaction with the given category links
pub fn add_transaction(
    db: &Database,
    owner: Owner,
    on: NaiveDate,
    kind: EntryKind,
    amount: i64,
    category_ids: &[i64],
) -> Transaction {
    let new = NewTransaction::new(on, kind, amount)
        .with_categories(category_ids.to_vec())
        .with_title(format!("{} {}", kind, amount));
    db.create_transaction(owner, &new)
        .expect("create test transaction")
}
