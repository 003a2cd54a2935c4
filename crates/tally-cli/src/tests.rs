//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use tally_core::db::Database;
use tally_core::models::{EntryKind, Owner};
use tally_core::test_utils::{add_transaction, create_category, create_user, date};
use tally_core::DateRange;

use crate::commands::{self, format_amount, truncate};

fn setup_test_db() -> (Database, Owner) {
    let db = Database::in_memory().unwrap();
    let owner = create_user(&db, "alice");
    (db, owner)
}

// ========== Core Command Tests ==========

#[test]
fn test_open_db_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cli.db");

    let db = commands::open_db(&path, true).unwrap();
    assert!(db.list_users().unwrap().is_empty());
    assert!(path.exists());
}

#[test]
fn test_resolve_owner() {
    let (db, owner) = setup_test_db();

    assert_eq!(commands::resolve_owner(&db, Some("alice")).unwrap(), owner);
    assert!(commands::resolve_owner(&db, Some("nobody")).is_err());
    assert!(commands::resolve_owner(&db, None).is_err());
}

// ========== User Command Tests ==========

#[test]
fn test_cmd_users_add() {
    let db = Database::in_memory().unwrap();

    commands::cmd_users_add(&db, "carol", None, None, "carol-secret-key-0001").unwrap();

    let user = db.get_user_by_account("carol").unwrap().unwrap();
    assert_eq!(user.name, "carol");
    let found = db.find_user_by_api_key("carol-secret-key-0001").unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
    assert!(commands::cmd_users_list(&db).is_ok());
}

#[test]
fn test_cmd_users_add_short_key() {
    let db = Database::in_memory().unwrap();
    assert!(commands::cmd_users_add(&db, "carol", None, None, "short").is_err());
}

// ========== Category Command Tests ==========

#[test]
fn test_cmd_categories_add_and_list() {
    let (db, owner) = setup_test_db();

    commands::cmd_categories_add(&db, owner, "Groceries").unwrap();
    assert!(commands::cmd_categories_list(&db, owner, false).is_ok());

    let categories = db.list_categories(owner, false).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Groceries");
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_transactions_add() {
    let (db, owner) = setup_test_db();
    let food = create_category(&db, owner, "Food");

    commands::cmd_transactions_add(
        &db,
        owner,
        "2024-03-05",
        "outcome",
        1250,
        vec![food.id],
        "Lunch".to_string(),
        String::new(),
    )
    .unwrap();

    let march = DateRange::month(2024, 3).unwrap();
    let listed = db
        .list_transactions(owner, &tally_core::TransactionFilter::new(march))
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Lunch");
    assert_eq!(listed[0].categories[0].id, food.id);

    assert!(commands::cmd_transactions_list(
        &db,
        owner,
        Some("2024-03-01"),
        Some("2024-03-31"),
        Some("outcome"),
        vec![food.id],
    )
    .is_ok());
}

#[test]
fn test_cmd_transactions_add_rejects_bad_input() {
    let (db, owner) = setup_test_db();

    let bad_date = commands::cmd_transactions_add(
        &db,
        owner,
        "05/03/2024",
        "outcome",
        100,
        vec![],
        String::new(),
        String::new(),
    );
    assert!(bad_date.is_err());

    let bad_kind = commands::cmd_transactions_add(
        &db,
        owner,
        "2024-03-05",
        "refund",
        100,
        vec![],
        String::new(),
        String::new(),
    );
    assert!(bad_kind.is_err());
}

#[test]
fn test_cmd_transactions_delete() {
    let (db, owner) = setup_test_db();
    let tx = add_transaction(&db, owner, date(2024, 3, 1), EntryKind::Income, 500, &[]);

    commands::cmd_transactions_delete(&db, owner, tx.id).unwrap();
    assert!(db.get_transaction(owner, tx.id).is_err());
}

#[test]
fn test_cmd_transactions_delete_other_user() {
    let (db, owner) = setup_test_db();
    let bob = create_user(&db, "bob");
    let tx = add_transaction(&db, owner, date(2024, 3, 1), EntryKind::Income, 500, &[]);

    assert!(commands::cmd_transactions_delete(&db, bob, tx.id).is_err());
    assert!(db.get_transaction(owner, tx.id).is_ok());
}

// ========== Target Command Tests ==========

#[test]
fn test_cmd_targets_month_conflict() {
    let (db, owner) = setup_test_db();

    commands::cmd_targets_month(&db, owner, 2024, 3, 1000, 500).unwrap();
    assert!(commands::cmd_targets_month(&db, owner, 2024, 3, 2000, 500).is_err());
}

#[test]
fn test_cmd_targets_save() {
    let (db, owner) = setup_test_db();
    let food = create_category(&db, owner, "Food");

    commands::cmd_targets_save(&db, owner, food.id, 5000, Some("2024-01-01"), None).unwrap();

    let target = db
        .find_save_target_for_category(owner, food.id)
        .unwrap()
        .unwrap();
    assert_eq!(target.target_amount, 5000);
    assert_eq!(target.from_date, Some(date(2024, 1, 1)));
    assert_eq!(target.end_date, None);
}

// ========== Chart Command Tests ==========

#[test]
fn test_cmd_chart_commands() {
    let (db, owner) = setup_test_db();
    let food = create_category(&db, owner, "Food");
    add_transaction(&db, owner, date(2024, 3, 2), EntryKind::Outcome, 700, &[food.id]);
    db.create_save_target(
        owner,
        &tally_core::models::NewSaveMoneyTarget {
            category_id: food.id,
            target_amount: 1000,
            from_date: None,
            end_date: None,
        },
    )
    .unwrap();

    assert!(commands::cmd_chart_range(&db, owner, "2024-03-01", "2024-03-31").is_ok());
    assert!(commands::cmd_chart_categories(&db, owner, "2024-03-01", "2024-03-31").is_ok());
    assert!(commands::cmd_chart_compare(&db, owner, "2024-03-01", "2024-03-31").is_ok());
    assert!(commands::cmd_chart_target(&db, owner, 2024, 3).is_ok());
    assert!(commands::cmd_chart_save(&db, owner, food.id).is_ok());
}

#[test]
fn test_cmd_chart_range_single_day_fails() {
    let (db, owner) = setup_test_db();
    assert!(commands::cmd_chart_range(&db, owner, "2024-03-01", "2024-03-01").is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_report_monthly_csv() {
    let (db, owner) = setup_test_db();
    add_transaction(&db, owner, date(2024, 3, 1), EntryKind::Income, 1000, &[]);
    add_transaction(&db, owner, date(2024, 3, 2), EntryKind::Outcome, 400, &[]);
    let dir = tempfile::tempdir().unwrap();

    let path = commands::cmd_report(&db, owner, 2024, Some(3), "csv", Some(dir.path())).unwrap();

    assert_eq!(path, dir.path().join("tally-2024-03.csv"));
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn test_cmd_report_yearly_json_to_file() {
    let (db, owner) = setup_test_db();
    add_transaction(&db, owner, date(2024, 6, 1), EntryKind::Income, 1000, &[]);
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ledger.json");

    let path = commands::cmd_report(&db, owner, 2024, None, "json", Some(&target)).unwrap();

    assert_eq!(path, target);
    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(json["balance"], 1000);
}

#[test]
fn test_cmd_report_unknown_format() {
    let (db, owner) = setup_test_db();
    let dir = tempfile::tempdir().unwrap();
    assert!(commands::cmd_report(&db, owner, 2024, None, "xlsx", Some(dir.path())).is_err());
}

#[test]
fn test_report_path() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        commands::report_path(Some(dir.path()), "tally-2024.csv"),
        dir.path().join("tally-2024.csv")
    );
    assert_eq!(
        commands::report_path(None, "tally-2024.csv"),
        std::path::PathBuf::from("tally-2024.csv")
    );
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer title", 8), "a lon...");
}

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(123456), "1234.56");
    assert_eq!(format_amount(5), "0.05");
    assert_eq!(format_amount(-250), "-2.50");
}
