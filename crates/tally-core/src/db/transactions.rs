//! Transaction operations

use std::collections::HashMap;

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{date_param, parse_datetime, parse_stored_date, require_non_negative, Database};
use crate::access::authorize;
use crate::error::Result;
use crate::models::{
    Category, EntryKind, NewTransaction, Owner, Transaction, TransactionPatch,
};
use crate::period::DateRange;

/// Which of an owner's transactions to list
#[derive(Debug, Clone)]
pub struct TransactionFilter {
    pub range: DateRange,
    /// Keep transactions linked to any of these categories (all when empty)
    pub category_ids: Vec<i64>,
    pub kind: Option<EntryKind>,
}

impl TransactionFilter {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            category_ids: Vec::new(),
            kind: None,
        }
    }

    pub fn with_categories(mut self, ids: Vec<i64>) -> Self {
        self.category_ids = ids;
        self
    }

    pub fn with_kind(mut self, kind: Option<EntryKind>) -> Self {
        self.kind = kind;
        self
    }
}

const TRANSACTION_COLUMNS: &str =
    "t.id, t.owner_id, t.date, t.kind, t.amount, t.title, t.description, t.created_at";

fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let date: String = row.get(2)?;
    let kind: String = row.get(3)?;
    let created_at: String = row.get(7)?;
    Ok(Transaction {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        date: parse_stored_date(2, &date)?,
        kind: kind.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
        })?,
        amount: row.get(4)?,
        categories: Vec::new(),
        title: row.get(5)?,
        description: row.get(6)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Insert a transaction for `owner`
    ///
    /// Every category id must belong to `owner`; a foreign or unknown id is
    /// reported as not found and nothing is written.
    pub fn create_transaction(&self, owner: Owner, new: &NewTransaction) -> Result<Transaction> {
        require_non_negative("amount", new.amount)?;
        let categories = self.resolve_categories(owner, &new.category_ids)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO transactions (owner_id, date, kind, amount, title, description)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                owner.id(),
                date_param(new.date),
                new.kind.as_str(),
                new.amount,
                new.title,
                new.description
            ],
        )?;
        let id = tx.last_insert_rowid();
        for category in &categories {
            tx.execute(
                "INSERT INTO transaction_categories (transaction_id, category_id) VALUES (?, ?)",
                params![id, category.id],
            )?;
        }
        tx.commit()?;

        debug!(%owner, id, amount = new.amount, kind = %new.kind, "Created transaction");
        self.get_transaction(owner, id)
    }

    /// Look up a transaction by id regardless of owner
    fn find_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM transactions t WHERE t.id = ?", TRANSACTION_COLUMNS);
        let transaction = conn
            .query_row(&sql, params![id], row_to_transaction)
            .optional()?;

        match transaction {
            Some(mut transaction) => {
                transaction.categories = self.categories_for(&conn, id)?;
                Ok(Some(transaction))
            }
            None => Ok(None),
        }
    }

    pub fn get_transaction(&self, owner: Owner, id: i64) -> Result<Transaction> {
        authorize(owner, self.find_transaction(id)?, "Transaction", id)
    }

    /// List the owner's transactions matching `filter`, newest first
    pub fn list_transactions(
        &self,
        owner: Owner,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut sql = format!(
            "SELECT {} FROM transactions t WHERE t.owner_id = ?1 AND t.date BETWEEN ?2 AND ?3",
            TRANSACTION_COLUMNS
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![
            Box::new(owner.id()),
            Box::new(date_param(filter.range.from)),
            Box::new(date_param(filter.range.end)),
        ];

        if let Some(kind) = filter.kind {
            sql.push_str(&format!(" AND t.kind = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(kind.as_str()));
        }

        if !filter.category_ids.is_empty() {
            let placeholders: Vec<String> = filter
                .category_ids
                .iter()
                .map(|id| {
                    params_vec.push(Box::new(*id));
                    format!("?{}", params_vec.len())
                })
                .collect();
            sql.push_str(&format!(
                " AND t.id IN (SELECT transaction_id FROM transaction_categories WHERE category_id IN ({}))",
                placeholders.join(", ")
            ));
        }

        sql.push_str(" ORDER BY t.date DESC, t.id DESC");

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let mut transactions = stmt
            .query_map(params_refs.as_slice(), row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.attach_categories(&conn, owner, &mut transactions)?;
        Ok(transactions)
    }

    /// Apply `patch` to one of the owner's transactions
    ///
    /// A full update is a patch with every field set.
    pub fn update_transaction(
        &self,
        owner: Owner,
        id: i64,
        patch: &TransactionPatch,
    ) -> Result<Transaction> {
        let current = self.get_transaction(owner, id)?;

        let amount = patch.amount.unwrap_or(current.amount);
        require_non_negative("amount", amount)?;
        let categories = match &patch.category_ids {
            Some(ids) => Some(self.resolve_categories(owner, ids)?),
            None => None,
        };

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            UPDATE transactions
            SET date = ?, kind = ?, amount = ?, title = ?, description = ?
            WHERE id = ? AND owner_id = ?
            "#,
            params![
                date_param(patch.date.unwrap_or(current.date)),
                patch.kind.unwrap_or(current.kind).as_str(),
                amount,
                patch.title.as_deref().unwrap_or(&current.title),
                patch.description.as_deref().unwrap_or(&current.description),
                id,
                owner.id()
            ],
        )?;

        if let Some(categories) = categories {
            tx.execute(
                "DELETE FROM transaction_categories WHERE transaction_id = ?",
                params![id],
            )?;
            for category in &categories {
                tx.execute(
                    "INSERT INTO transaction_categories (transaction_id, category_id) VALUES (?, ?)",
                    params![id, category.id],
                )?;
            }
        }
        tx.commit()?;

        self.get_transaction(owner, id)
    }

    pub fn delete_transaction(&self, owner: Owner, id: i64) -> Result<()> {
        self.get_transaction(owner, id)?;
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM transactions WHERE id = ? AND owner_id = ?",
            params![id, owner.id()],
        )?;
        Ok(())
    }

    /// Every transaction of the owner inside `range`, oldest first
    pub(crate) fn transactions_in_range(
        &self,
        owner: Owner,
        range: DateRange,
    ) -> Result<Vec<Transaction>> {
        let mut transactions = self.list_transactions(owner, &TransactionFilter::new(range))?;
        transactions.reverse();
        Ok(transactions)
    }

    fn categories_for(&self, conn: &rusqlite::Connection, transaction_id: i64) -> Result<Vec<Category>> {
        let mut stmt = conn.prepare_cached(
            r#"
            SELECT c.id, c.owner_id, c.name
            FROM transaction_categories tc
            JOIN categories c ON c.id = tc.category_id
            WHERE tc.transaction_id = ?
            ORDER BY c.id
            "#,
        )?;
        let categories = stmt
            .query_map(params![transaction_id], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    owner_id: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    /// Fill `categories` on a batch of transactions with one query
    fn attach_categories(
        &self,
        conn: &rusqlite::Connection,
        owner: Owner,
        transactions: &mut [Transaction],
    ) -> Result<()> {
        if transactions.is_empty() {
            return Ok(());
        }

        let mut stmt = conn.prepare_cached(
            r#"
            SELECT tc.transaction_id, c.id, c.owner_id, c.name
            FROM transaction_categories tc
            JOIN categories c ON c.id = tc.category_id
            WHERE c.owner_id = ?
            ORDER BY c.id
            "#,
        )?;
        let mut by_transaction: HashMap<i64, Vec<Category>> = HashMap::new();
        let rows = stmt.query_map(params![owner.id()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Category {
                    id: row.get(1)?,
                    owner_id: row.get(2)?,
                    name: row.get(3)?,
                },
            ))
        })?;
        for row in rows {
            let (transaction_id, category) = row?;
            by_transaction.entry(transaction_id).or_default().push(category);
        }

        for transaction in transactions.iter_mut() {
            if let Some(categories) = by_transaction.remove(&transaction.id) {
                transaction.categories = categories;
            }
        }
        Ok(())
    }
}
