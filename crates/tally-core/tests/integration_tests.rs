//! Integration tests for tally-core
//!
//! These tests exercise the record → chart → report workflow against an
//! on-disk database.

use chrono::NaiveDate;
use tally_core::{
    db::{Database, NewUser},
    models::{EntryKind, NewMonthTarget, NewSaveMoneyTarget, NewTransaction, Owner},
    DateRange, Error, ReportPeriod,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn register(db: &Database, account: &str) -> Owner {
    db.create_user(&NewUser {
        account: account.to_string(),
        name: account.to_string(),
        email: None,
        api_key: format!("integration-key-{}", account),
    })
    .expect("Failed to create user")
    .owner()
}

fn record(db: &Database, owner: Owner, on: NaiveDate, kind: EntryKind, amount: i64, cats: &[i64]) {
    db.create_transaction(
        owner,
        &NewTransaction::new(on, kind, amount).with_categories(cats.to_vec()),
    )
    .expect("Failed to create transaction");
}

#[test]
fn test_month_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.db");
    let db = Database::new_unencrypted(path.to_str().unwrap()).expect("Failed to open database");

    let owner = register(&db, "alice");
    let rent = db.create_category(owner, "Rent").unwrap();
    let food = db.create_category(owner, "Food").unwrap();

    record(&db, owner, date(2024, 3, 1), EntryKind::Income, 300000, &[]);
    record(&db, owner, date(2024, 3, 2), EntryKind::Outcome, 120000, &[rent.id]);
    record(&db, owner, date(2024, 3, 9), EntryKind::Outcome, 30000, &[food.id]);
    record(&db, owner, date(2024, 3, 23), EntryKind::Outcome, 30000, &[food.id]);

    db.create_month_target(
        owner,
        &NewMonthTarget {
            year: 2024,
            month: 3,
            income_target: 250000,
            outcome_target: 200000,
        },
    )
    .unwrap();
    db.create_save_target(
        owner,
        &NewSaveMoneyTarget {
            category_id: food.id,
            target_amount: 50000,
            from_date: Some(date(2024, 3, 1)),
            end_date: Some(date(2024, 3, 31)),
        },
    )
    .unwrap();

    let march = DateRange::month(2024, 3).unwrap();

    let daily = db.range_chart(owner, march.from, march.end).unwrap();
    assert_eq!(daily.labels.len(), 31);
    assert_eq!(daily.income.iter().sum::<i64>(), 300000);
    assert_eq!(daily.outcome.iter().sum::<i64>(), 180000);

    let shares = db.type_cost(owner, march).unwrap();
    let percents: Vec<_> = shares.data.iter().map(|e| e.data[0]).collect();
    assert_eq!(percents, vec![67, 33]);

    let target = db.month_target_progress(owner, 2024, 3).unwrap();
    assert_eq!(target.income, [300000, 0]);
    assert_eq!(target.outcome, [180000, 20000]);

    let savings = db.savings_progress(owner, food.id).unwrap();
    assert_eq!(savings.spent, [60000, 0]);

    let report = db
        .ledger_report(owner, ReportPeriod::month(2024, 3))
        .unwrap();
    assert_eq!(report.rows.len(), 4);
    assert_eq!(report.balance, 120000);

    let csv_path = dir.path().join(report.file_name());
    std::fs::write(&csv_path, report.to_csv().unwrap()).unwrap();
    let written = std::fs::read(&csv_path).unwrap();
    assert!(written.starts_with(b"\xEF\xBB\xBF"));
    assert_eq!(csv_path.file_name().unwrap(), "tally-2024-03.csv");
}

#[test]
fn test_users_are_isolated() {
    let db = Database::in_memory().unwrap();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    let category = db.create_category(alice, "Private").unwrap();
    record(&db, alice, date(2024, 6, 1), EntryKind::Outcome, 500, &[category.id]);

    assert!(matches!(
        db.get_category(bob, category.id),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        db.savings_progress(bob, category.id),
        Err(Error::NotFound(_))
    ));

    let june = DateRange::month(2024, 6).unwrap();
    assert!(db.type_cost(bob, june).unwrap().data.is_empty());
    assert_eq!(db.compare_cost(bob, june).unwrap().current.outcome, 0);
    assert!(db
        .ledger_report(bob, ReportPeriod::year(2024))
        .unwrap()
        .rows
        .is_empty());
}

#[test]
fn test_api_key_resolves_owner() {
    let db = Database::in_memory().unwrap();
    let alice = register(&db, "alice");

    let user = db
        .find_user_by_api_key("integration-key-alice")
        .unwrap()
        .expect("key should resolve");
    assert_eq!(user.owner(), alice);
    assert_eq!(user.account, "alice");
}
