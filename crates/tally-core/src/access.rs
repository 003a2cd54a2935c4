//! Ownership checks
//!
//! Records are fetched by id and then passed through [`authorize`] before
//! anything reads or mutates them. A record owned by someone else is reported
//! exactly like a missing one so that ids never leak across users.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, MonthTarget, Owner, SaveMoneyTarget, Transaction};

/// A record scoped to a single user
pub trait Owned {
    fn owner_id(&self) -> i64;
}

impl Owned for Transaction {
    fn owner_id(&self) -> i64 {
        self.owner_id
    }
}

impl Owned for Category {
    fn owner_id(&self) -> i64 {
        self.owner_id
    }
}

impl Owned for MonthTarget {
    fn owner_id(&self) -> i64 {
        self.owner_id
    }
}

impl Owned for SaveMoneyTarget {
    fn owner_id(&self) -> i64 {
        self.owner_id
    }
}

/// Whether `owner` may see `record`
pub fn can_access<T: Owned>(owner: Owner, record: &T) -> bool {
    record.owner_id() == owner.id()
}

/// Resolve a looked-up record for `owner`, or `NotFound`
pub fn authorize<T: Owned>(owner: Owner, record: Option<T>, what: &str, id: i64) -> Result<T> {
    match record {
        Some(record) if can_access(owner, &record) => Ok(record),
        Some(record) => {
            debug!(
                %owner,
                record_owner = record.owner_id(),
                what,
                id,
                "Denied cross-user access"
            );
            Err(not_found(what, id))
        }
        None => Err(not_found(what, id)),
    }
}

fn not_found(what: &str, id: i64) -> Error {
    Error::NotFound(format!("{} {} not found", what, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(owner_id: i64) -> Category {
        Category {
            id: 7,
            owner_id,
            name: "Food".to_string(),
        }
    }

    #[test]
    fn test_owner_gets_record() {
        let cat = authorize(Owner(1), Some(category(1)), "Category", 7).unwrap();
        assert_eq!(cat.name, "Food");
    }

    #[test]
    fn test_foreign_record_looks_missing() {
        let foreign = authorize(Owner(2), Some(category(1)), "Category", 7).unwrap_err();
        let missing = authorize::<Category>(Owner(2), None, "Category", 7).unwrap_err();
        assert_eq!(foreign.to_string(), missing.to_string());
        assert!(matches!(foreign, Error::NotFound(_)));
    }
}
