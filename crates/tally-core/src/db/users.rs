//! User operations and API key lookup

use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

/// Shortest API key accepted when registering a user
pub const MIN_API_KEY_LEN: usize = 16;

/// A user to be registered
#[derive(Debug, Clone)]
pub struct NewUser {
    pub account: String,
    pub name: String,
    pub email: Option<String>,
    /// Plaintext bearer key; only its digest is stored
    pub api_key: String,
}

/// Hex SHA-256 of an API key
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        account: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Register a user; the account handle must be unique
    pub fn create_user(&self, user: &NewUser) -> Result<User> {
        let account = user.account.trim();
        if account.is_empty() {
            return Err(Error::InvalidInput("Account must not be empty".to_string()));
        }
        if user.api_key.len() < MIN_API_KEY_LEN {
            return Err(Error::InvalidInput(format!(
                "API key must be at least {} characters",
                MIN_API_KEY_LEN
            )));
        }

        let conn = self.conn()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE account = ?)",
            params![account],
            |row| row.get(0),
        )?;
        if exists {
            return Err(Error::Conflict(format!("Account '{}' already exists", account)));
        }

        conn.execute(
            "INSERT INTO users (account, name, email, api_key_hash) VALUES (?, ?, ?, ?)",
            params![account, user.name, user.email, hash_api_key(&user.api_key)],
        )?;
        let id = conn.last_insert_rowid();

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, account, name, email, created_at FROM users WHERE id = ?",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_user_by_account(&self, account: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, account, name, email, created_at FROM users WHERE account = ?",
                params![account],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, account, name, email, created_at FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Resolve a bearer API key to its user
    ///
    /// Digests are compared in constant time against every stored user.
    pub fn find_user_by_api_key(&self, api_key: &str) -> Result<Option<User>> {
        let provided = hash_api_key(api_key);

        let matched_id = {
            let conn = self.conn()?;
            let mut stmt = conn.prepare("SELECT id, api_key_hash FROM users")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut matched = None;
            for (id, stored) in rows {
                if stored.len() == provided.len()
                    && bool::from(stored.as_bytes().ct_eq(provided.as_bytes()))
                {
                    matched = Some(id);
                }
            }
            matched
        };

        match matched_id {
            Some(id) => self.get_user(id),
            None => Ok(None),
        }
    }
}
