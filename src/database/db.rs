//! Document storage for the flashcard application
//!
//! A key -> JSON text store. The SQLite table keeps one row per document;
//! the in-memory store backs tests and sessions where the disk is unavailable.
//! Nothing here validates document structure.

use crate::error::StoreError;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;

/// Deck document key
pub const DECK_KEY: &str = "flashcards";
/// Quiz orientation preference key
pub const ORIENTATION_KEY: &str = "startWithSpanish";
/// Quiz progress records key
pub const PROGRESS_KEY: &str = "quizProgress";
/// Cards already answered in running quizzes
pub const ANSWERS_KEY: &str = "quizAnswers";

pub trait DocumentStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, text: &str) -> Result<(), StoreError>;

    /// False for stores that lose their content when the process exits
    fn is_durable(&self) -> bool {
        true
    }
}

/// Loads and parses the document under `key`.
///
/// Unreadable storage and unparsable text both come back as `None`, so the
/// caller falls back to its default.
pub fn load_document<T: DeserializeOwned>(store: &dyn DocumentStore, key: &str) -> Option<T> {
    let text = match store.read(key) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, "could not read document: {e}");
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!(key, "stored document is not valid, ignoring it: {e}");
            None
        }
    }
}

pub fn save_document<T: Serialize + ?Sized>(
    store: &mut dyn DocumentStore,
    key: &str,
    doc: &T,
) -> Result<(), StoreError> {
    let text = serde_json::to_string(doc)?;
    store.write(key, &text)
}

/// SQLite backed store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and its documents table
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )?;
        Ok(Self { conn })
    }

    /// RFC 3339 time of the last write of `key`
    #[cfg(test)]
    fn updated_at(&self, key: &str) -> Result<Option<String>, StoreError> {
        let updated = self
            .conn
            .query_row(
                "SELECT updated_at FROM documents WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(updated)
    }
}

impl DocumentStore for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, text: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, text, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

/// Volatile store
#[derive(Default)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
}

impl DocumentStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.documents.get(key).cloned())
    }

    fn write(&mut self, key: &str, text: &str) -> Result<(), StoreError> {
        self.documents.insert(key.to_string(), text.to_string());
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }
}
