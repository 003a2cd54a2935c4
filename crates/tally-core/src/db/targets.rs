//! Month targets and save-money targets

use rusqlite::{params, OptionalExtension};

use super::{date_param, parse_stored_date, require_non_negative, Database};
use crate::access::authorize;
use crate::error::{Error, Result};
use crate::models::{
    MonthTarget, MonthTargetPatch, NewMonthTarget, NewSaveMoneyTarget, Owner, SaveMoneyTarget,
    SaveMoneyTargetPatch,
};

const MONTH_TARGET_COLUMNS: &str = "id, owner_id, year, month, income_target, outcome_target";
const SAVE_TARGET_COLUMNS: &str = "id, owner_id, category_id, target_amount, from_date, end_date";

fn row_to_month_target(row: &rusqlite::Row) -> rusqlite::Result<MonthTarget> {
    Ok(MonthTarget {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        income_target: row.get(4)?,
        outcome_target: row.get(5)?,
    })
}

fn row_to_save_target(row: &rusqlite::Row) -> rusqlite::Result<SaveMoneyTarget> {
    let from_date: Option<String> = row.get(4)?;
    let end_date: Option<String> = row.get(5)?;
    Ok(SaveMoneyTarget {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        category_id: row.get(2)?,
        target_amount: row.get(3)?,
        from_date: from_date.map(|d| parse_stored_date(4, &d)).transpose()?,
        end_date: end_date.map(|d| parse_stored_date(5, &d)).transpose()?,
    })
}

fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(Error::InvalidInput(format!(
            "month must be between 1 and 12 (got {})",
            month
        )));
    }
    Ok(())
}

fn validate_window(target: &SaveMoneyTarget) -> Result<()> {
    if let (Some(from), Some(end)) = (target.from_date, target.end_date) {
        if end < from {
            return Err(Error::InvalidInput(format!(
                "end_date {} is before from_date {}",
                end, from
            )));
        }
    }
    Ok(())
}

impl Database {
    // ========== Month targets ==========

    /// Create the month target for `(year, month)`; one per owner and period
    pub fn create_month_target(&self, owner: Owner, new: &NewMonthTarget) -> Result<MonthTarget> {
        validate_month(new.month)?;
        require_non_negative("income_target", new.income_target)?;
        require_non_negative("outcome_target", new.outcome_target)?;

        if self.find_month_target(owner, new.year, new.month)?.is_some() {
            return Err(Error::Conflict(format!(
                "A target for {}-{:02} already exists",
                new.year, new.month
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO month_targets (owner_id, year, month, income_target, outcome_target)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                owner.id(),
                new.year,
                new.month,
                new.income_target,
                new.outcome_target
            ],
        )?;

        Ok(MonthTarget {
            id: conn.last_insert_rowid(),
            owner_id: owner.id(),
            year: new.year,
            month: new.month,
            income_target: new.income_target,
            outcome_target: new.outcome_target,
        })
    }

    /// The owner's month targets, most recent period first
    pub fn list_month_targets(&self, owner: Owner) -> Result<Vec<MonthTarget>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM month_targets WHERE owner_id = ? ORDER BY year DESC, month DESC",
            MONTH_TARGET_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let targets = stmt
            .query_map(params![owner.id()], row_to_month_target)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(targets)
    }

    /// The target for a period, if one was set
    pub fn find_month_target(
        &self,
        owner: Owner,
        year: i32,
        month: u32,
    ) -> Result<Option<MonthTarget>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM month_targets WHERE owner_id = ? AND year = ? AND month = ?",
            MONTH_TARGET_COLUMNS
        );
        let target = conn
            .query_row(&sql, params![owner.id(), year, month], row_to_month_target)
            .optional()?;
        Ok(target)
    }

    pub fn get_month_target_for(&self, owner: Owner, year: i32, month: u32) -> Result<MonthTarget> {
        self.find_month_target(owner, year, month)?.ok_or_else(|| {
            Error::NotFound(format!("Month target {}-{:02} not found", year, month))
        })
    }

    pub fn get_month_target(&self, owner: Owner, id: i64) -> Result<MonthTarget> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM month_targets WHERE id = ?", MONTH_TARGET_COLUMNS);
        let target = conn
            .query_row(&sql, params![id], row_to_month_target)
            .optional()?;
        authorize(owner, target, "Month target", id)
    }

    pub fn update_month_target(
        &self,
        owner: Owner,
        id: i64,
        patch: &MonthTargetPatch,
    ) -> Result<MonthTarget> {
        let current = self.get_month_target(owner, id)?;
        let updated = MonthTarget {
            year: patch.year.unwrap_or(current.year),
            month: patch.month.unwrap_or(current.month),
            income_target: patch.income_target.unwrap_or(current.income_target),
            outcome_target: patch.outcome_target.unwrap_or(current.outcome_target),
            ..current
        };

        validate_month(updated.month)?;
        require_non_negative("income_target", updated.income_target)?;
        require_non_negative("outcome_target", updated.outcome_target)?;

        if let Some(existing) = self.find_month_target(owner, updated.year, updated.month)? {
            if existing.id != id {
                return Err(Error::Conflict(format!(
                    "A target for {}-{:02} already exists",
                    updated.year, updated.month
                )));
            }
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE month_targets
            SET year = ?, month = ?, income_target = ?, outcome_target = ?
            WHERE id = ? AND owner_id = ?
            "#,
            params![
                updated.year,
                updated.month,
                updated.income_target,
                updated.outcome_target,
                id,
                owner.id()
            ],
        )?;

        Ok(updated)
    }

    pub fn delete_month_target(&self, owner: Owner, id: i64) -> Result<()> {
        self.get_month_target(owner, id)?;
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM month_targets WHERE id = ? AND owner_id = ?",
            params![id, owner.id()],
        )?;
        Ok(())
    }

    // ========== Save-money targets ==========

    pub fn create_save_target(
        &self,
        owner: Owner,
        new: &NewSaveMoneyTarget,
    ) -> Result<SaveMoneyTarget> {
        self.get_category(owner, new.category_id)?;
        require_non_negative("target_amount", new.target_amount)?;

        let mut target = SaveMoneyTarget {
            id: 0,
            owner_id: owner.id(),
            category_id: new.category_id,
            target_amount: new.target_amount,
            from_date: new.from_date,
            end_date: new.end_date,
        };
        validate_window(&target)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO save_money_targets (owner_id, category_id, target_amount, from_date, end_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                owner.id(),
                target.category_id,
                target.target_amount,
                target.from_date.map(date_param),
                target.end_date.map(date_param)
            ],
        )?;
        target.id = conn.last_insert_rowid();

        Ok(target)
    }

    pub fn list_save_targets(&self, owner: Owner) -> Result<Vec<SaveMoneyTarget>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM save_money_targets WHERE owner_id = ? ORDER BY id",
            SAVE_TARGET_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let targets = stmt
            .query_map(params![owner.id()], row_to_save_target)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(targets)
    }

    pub fn get_save_target(&self, owner: Owner, id: i64) -> Result<SaveMoneyTarget> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM save_money_targets WHERE id = ?", SAVE_TARGET_COLUMNS);
        let target = conn
            .query_row(&sql, params![id], row_to_save_target)
            .optional()?;
        authorize(owner, target, "Save-money target", id)
    }

    /// The most recently created target for a category
    pub fn find_save_target_for_category(
        &self,
        owner: Owner,
        category_id: i64,
    ) -> Result<Option<SaveMoneyTarget>> {
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT {} FROM save_money_targets
            WHERE owner_id = ? AND category_id = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
            SAVE_TARGET_COLUMNS
        );
        let target = conn
            .query_row(&sql, params![owner.id(), category_id], row_to_save_target)
            .optional()?;
        Ok(target)
    }

    pub fn update_save_target(
        &self,
        owner: Owner,
        id: i64,
        patch: &SaveMoneyTargetPatch,
    ) -> Result<SaveMoneyTarget> {
        let current = self.get_save_target(owner, id)?;
        if let Some(category_id) = patch.category_id {
            self.get_category(owner, category_id)?;
        }

        let updated = SaveMoneyTarget {
            category_id: patch.category_id.unwrap_or(current.category_id),
            target_amount: patch.target_amount.unwrap_or(current.target_amount),
            from_date: patch.from_date.unwrap_or(current.from_date),
            end_date: patch.end_date.unwrap_or(current.end_date),
            ..current
        };
        require_non_negative("target_amount", updated.target_amount)?;
        validate_window(&updated)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE save_money_targets
            SET category_id = ?, target_amount = ?, from_date = ?, end_date = ?
            WHERE id = ? AND owner_id = ?
            "#,
            params![
                updated.category_id,
                updated.target_amount,
                updated.from_date.map(date_param),
                updated.end_date.map(date_param),
                id,
                owner.id()
            ],
        )?;

        Ok(updated)
    }

    pub fn delete_save_target(&self, owner: Owner, id: i64) -> Result<()> {
        self.get_save_target(owner, id)?;
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM save_money_targets WHERE id = ? AND owner_id = ?",
            params![id, owner.id()],
        )?;
        Ok(())
    }
}
