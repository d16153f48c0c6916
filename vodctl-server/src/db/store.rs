//! Metadata store - typed CRUD and search over catalog entries

use std::sync::Arc;

use rusqlite::{params, Row};
use tracing::debug;

use super::connection::{ConnectionManager, DatabaseLocation};
use crate::error::{StoreError, StoreResult};
use crate::models::{Entry, EntryUpdate, NewEntry};

const INSERT_ENTRY: &str =
    "INSERT INTO videos (name, description, video_path, image_path) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_ENTRY: &str = "UPDATE videos SET name = ?1, description = ?2 WHERE id = ?3";
const DELETE_ENTRY: &str = "DELETE FROM videos WHERE id = ?1";
const SELECT_ONE: &str =
    "SELECT id, name, description, video_path, image_path FROM videos WHERE id = ?1";
const SELECT_ALL: &str = "SELECT id, name, description, video_path, image_path FROM videos";
const SELECT_LIKE: &str = r"SELECT id, name, description, video_path, image_path FROM videos WHERE name LIKE ?1 ESCAPE '\'";
const COUNT_ENTRIES: &str = "SELECT COUNT(*) FROM videos";

/// Catalog store shared by every request handler.
///
/// Cloning is cheap; all clones share one [`ConnectionManager`].
#[derive(Debug, Clone)]
pub struct MetadataStore {
    conn: Arc<ConnectionManager>,
}

impl MetadataStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn: Arc::new(conn),
        }
    }

    /// Open the session at `location` and wrap it in a store.
    pub fn open(location: DatabaseLocation) -> StoreResult<Self> {
        ConnectionManager::init(location).map(Self::new)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(DatabaseLocation::Memory)
    }

    pub fn location(&self) -> &DatabaseLocation {
        self.conn.location()
    }

    /// Create an entry. The id is assigned by the database and not returned.
    ///
    /// An empty name is rejected before the database is touched.
    pub fn insert(&self, entry: &NewEntry) -> StoreResult<()> {
        entry.validate()?;

        self.conn.execute(
            INSERT_ENTRY,
            params![
                entry.name,
                entry.description,
                entry.video_path,
                entry.image_path
            ],
        )?;

        debug!(name = %entry.name, "entry inserted");
        Ok(())
    }

    /// Rewrite name and description of entry `id`.
    ///
    /// Succeeds even when no row has that id.
    pub fn update(&self, id: i64, update: &EntryUpdate) -> StoreResult<()> {
        update.validate()?;

        let affected = self
            .conn
            .execute(UPDATE_ENTRY, params![update.name, update.description, id])?;

        debug!(id, affected, "entry updated");
        Ok(())
    }

    /// Remove entry `id`. Succeeds even when no row has that id.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let affected = self.conn.execute(DELETE_ENTRY, params![id])?;

        debug!(id, affected, "entry deleted");
        Ok(())
    }

    /// Fetch entry `id`; anything but exactly one matching row is `NotFound`.
    pub fn get_one(&self, id: i64) -> StoreResult<Entry> {
        let mut rows = self.conn.query(SELECT_ONE, params![id], entry_from_row)?;

        match rows.pop() {
            Some(entry) if rows.is_empty() => Ok(entry),
            _ => Err(StoreError::NotFound { id }),
        }
    }

    /// Every entry, in whatever order the database returns them.
    pub fn get_all(&self) -> StoreResult<Vec<Entry>> {
        self.conn.query(SELECT_ALL, [], entry_from_row)
    }

    /// Entries whose name contains `substring`. Empty matches everything.
    pub fn search(&self, substring: &str) -> StoreResult<Vec<Entry>> {
        self.conn
            .query(SELECT_LIKE, params![like_pattern(substring)], entry_from_row)
    }

    pub fn count(&self) -> StoreResult<i64> {
        let counts = self.conn.query(COUNT_ENTRIES, [], |row| row.get::<_, i64>(0))?;
        Ok(counts.into_iter().next().unwrap_or(0))
    }

    /// Close the shared session. Later operations fail with `Closed`.
    pub fn shutdown(&self) {
        self.conn.shutdown();
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        video_path: row.get(3)?,
        image_path: row.get(4)?,
    })
}

/// `%needle%` with LIKE metacharacters escaped so they match literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
