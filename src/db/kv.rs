// src/db/kv.rs
use rusqlite::{params, OptionalExtension};

use crate::db::connection::Database;
use crate::errors::ServerError;
use crate::search::PersistentStore;

/// One visitor's slice of `kv_entries`.
pub struct VisitorStore<'a> {
    db: &'a Database,
    owner_hash: [u8; 32],
}

impl<'a> VisitorStore<'a> {
    pub fn new(db: &'a Database, owner_hash: [u8; 32]) -> Self {
        Self { db, owner_hash }
    }
}

impl PersistentStore for VisitorStore<'_> {
    fn read(&self, key: &str) -> Result<Option<String>, ServerError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "select value from kv_entries where owner_hash = ? and key = ?",
                params![self.owner_hash.as_slice(), key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ServerError::DbError(format!("kv read failed: {e}")))
        })
    }

    fn write(&self, key: &str, value: &str) -> Result<(), ServerError> {
        let now = chrono::Utc::now().timestamp();
        self.db.with_conn(|conn| {
            conn.execute(
                r#"
                insert into kv_entries (owner_hash, key, value, updated_at)
                values (?, ?, ?, ?)
                on conflict (owner_hash, key)
                do update set value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![self.owner_hash.as_slice(), key, value, now],
            )
            .map_err(|e| ServerError::DbError(format!("kv write failed: {e}")))?;
            Ok(())
        })
    }
}
