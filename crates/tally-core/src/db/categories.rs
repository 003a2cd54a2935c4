//! Category operations

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::access::authorize;
use crate::error::{Error, Result};
use crate::models::{Category, Owner};

fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
    })
}

fn clean_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Category name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

impl Database {
    pub fn create_category(&self, owner: Owner, name: &str) -> Result<Category> {
        let name = clean_name(name)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO categories (owner_id, name) VALUES (?, ?)",
            params![owner.id(), name],
        )?;
        Ok(Category {
            id: conn.last_insert_rowid(),
            owner_id: owner.id(),
            name,
        })
    }

    /// Look up a category by id regardless of owner
    pub(crate) fn find_category(&self, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, owner_id, name FROM categories WHERE id = ?",
                params![id],
                row_to_category,
            )
            .optional()?;
        Ok(category)
    }

    pub fn get_category(&self, owner: Owner, id: i64) -> Result<Category> {
        authorize(owner, self.find_category(id)?, "Category", id)
    }

    /// List the owner's categories, newest name first
    ///
    /// With `assigned_only` set, categories not linked to any transaction are
    /// left out.
    pub fn list_categories(&self, owner: Owner, assigned_only: bool) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let sql = if assigned_only {
            r#"
            SELECT c.id, c.owner_id, c.name
            FROM categories c
            WHERE c.owner_id = ?
              AND EXISTS (SELECT 1 FROM transaction_categories tc WHERE tc.category_id = c.id)
            ORDER BY c.name DESC, c.id
            "#
        } else {
            "SELECT id, owner_id, name FROM categories WHERE owner_id = ? ORDER BY name DESC, id"
        };

        let mut stmt = conn.prepare(sql)?;
        let categories = stmt
            .query_map(params![owner.id()], row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    pub fn rename_category(&self, owner: Owner, id: i64, name: &str) -> Result<Category> {
        let mut category = self.get_category(owner, id)?;
        let name = clean_name(name)?;

        let conn = self.conn()?;
        conn.execute(
            "UPDATE categories SET name = ? WHERE id = ? AND owner_id = ?",
            params![name, id, owner.id()],
        )?;

        category.name = name;
        Ok(category)
    }

    /// Delete a category; linked transactions keep existing without it
    pub fn delete_category(&self, owner: Owner, id: i64) -> Result<()> {
        self.get_category(owner, id)?;
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM categories WHERE id = ? AND owner_id = ?",
            params![id, owner.id()],
        )?;
        Ok(())
    }

    /// Resolve category ids for `owner`, failing with `NotFound` on any foreign id
    pub(crate) fn resolve_categories(&self, owner: Owner, ids: &[i64]) -> Result<Vec<Category>> {
        let mut categories = Vec::with_capacity(ids.len());
        for &id in ids {
            if categories.iter().any(|c: &Category| c.id == id) {
                continue;
            }
            categories.push(self.get_category(owner, id)?);
        }
        Ok(categories)
    }
}
