//! Audit log

use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{AuditEntry, Owner};

impl Database {
    /// Log an audit event
    pub fn log_audit(
        &self,
        owner: Owner,
        action: &str,
        entity_type: Option<&str>,
        entity_id: Option<i64>,
        details: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO audit_log (owner_id, action, entity_type, entity_id, details)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![owner.id(), action, entity_type, entity_id, details],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// The owner's audit entries, newest first
    pub fn list_audit_log(&self, owner: Owner, limit: i64) -> Result<Vec<AuditEntry>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, timestamp, owner_id, action, entity_type, entity_id, details
            FROM audit_log
            WHERE owner_id = ?
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )?;

        let entries = stmt
            .query_map(params![owner.id(), limit], |row| {
                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp: row.get(1)?,
                    owner_id: row.get(2)?,
                    action: row.get(3)?,
                    entity_type: row.get(4)?,
                    entity_id: row.get(5)?,
                    details: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}
