//! Connection manager - the single database session for the process
//!
//! One rusqlite `Connection` behind one mutex. Callers never see the raw
//! session: they submit a statement through [`ConnectionManager::execute`]
//! or [`ConnectionManager::query`] and get owned results back. Both hold the
//! lock from submission until the last row has been copied out, so one
//! caller's result set can never interleave with another's.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, Params, Row};
use tracing::{debug, info, warn};

use super::SCHEMA;
use crate::error::{ConnectError, StoreError, StoreResult};

const MEMORY: &str = ":memory:";

/// Where the session lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// Private in-memory database, gone when the session closes
    Memory,
    /// Database file; parent directories are created on open
    File(PathBuf),
}

impl From<&Path> for DatabaseLocation {
    fn from(path: &Path) -> Self {
        match path.to_str() {
            Some(MEMORY) => Self::Memory,
            _ => Self::File(path.to_path_buf()),
        }
    }
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str(MEMORY),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Owner of the process-wide database session
pub struct ConnectionManager {
    session: Mutex<Option<Connection>>,
    location: DatabaseLocation,
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("location", &self.location)
            .field("open", &self.is_open())
            .finish()
    }
}

impl ConnectionManager {
    /// Establish the session, fix its encoding to UTF-8 and apply the schema.
    pub fn init(location: DatabaseLocation) -> StoreResult<Self> {
        let conn = open_session(&location).map_err(|source| StoreError::Connection {
            location: location.to_string(),
            source,
        })?;

        info!(location = %location, "database session established");

        Ok(Self {
            session: Mutex::new(Some(conn)),
            location,
        })
    }

    pub fn location(&self) -> &DatabaseLocation {
        &self.location
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    /// Submit one statement that returns no rows. Returns the affected row count.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> StoreResult<usize> {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;

        debug!(statement = sql, "execute");
        conn.execute(sql, params)
            .map_err(|err| statement_failed(sql, err))
    }

    /// Submit one statement and drain every row through `map`.
    ///
    /// The lock is released only after the whole result set has been
    /// materialized into owned values.
    pub fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> StoreResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;

        debug!(statement = sql, "query");
        let rows = collect_rows(conn, sql, params, map)
            .map_err(|err| statement_failed(sql, err))?;
        drop(guard);

        Ok(rows)
    }

    /// Release the session. Safe to call more than once.
    pub fn shutdown(&self) {
        let Some(conn) = self.lock().take() else {
            return;
        };

        match conn.close() {
            Ok(()) => info!(location = %self.location, "database session closed"),
            Err((_, err)) => warn!(location = %self.location, error = %err, "database session closed with error"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        // A panic while holding the lock leaves the connection itself intact.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn open_session(location: &DatabaseLocation) -> Result<Connection, ConnectError> {
    let conn = match location {
        DatabaseLocation::Memory => Connection::open_in_memory()?,
        DatabaseLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Connection::open(path)?
        }
    };

    conn.execute_batch("PRAGMA encoding = 'UTF-8';")?;
    conn.execute_batch(SCHEMA)?;

    Ok(conn)
}

fn collect_rows<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> rusqlite::Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?.collect::<rusqlite::Result<Vec<T>>>();
    rows
}

fn statement_failed(sql: &str, err: rusqlite::Error) -> StoreError {
    warn!(statement = sql, error = %err, "statement failed");
    StoreError::Statement(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_from_path() {
        assert_eq!(
            DatabaseLocation::from(Path::new(":memory:")),
            DatabaseLocation::Memory
        );
        assert_eq!(
            DatabaseLocation::from(Path::new("data/vod.db")),
            DatabaseLocation::File(PathBuf::from("data/vod.db"))
        );
        assert_eq!(DatabaseLocation::Memory.to_string(), ":memory:");
    }

    #[test]
    fn session_uses_utf8() {
        let manager = ConnectionManager::init(DatabaseLocation::Memory).unwrap();
        let encoding = manager
            .query("PRAGMA encoding", [], |row| row.get::<_, String>(0))
            .unwrap();
        assert_eq!(encoding, vec!["UTF-8".to_string()]);
    }

    #[test]
    fn file_database_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vod.db");
        let manager = ConnectionManager::init(DatabaseLocation::File(path.clone())).unwrap();
        assert!(path.exists());
        manager.shutdown();
    }

    #[test]
    fn unopenable_location_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file.
        let err = ConnectionManager::init(DatabaseLocation::File(dir.path().to_path_buf()))
            .unwrap_err();
        assert!(matches!(err, StoreError::Connection { .. }));
    }

    #[test]
    fn failed_statement_reports_driver_text() {
        let manager = ConnectionManager::init(DatabaseLocation::Memory).unwrap();
        let err = manager.execute("INSERT INTO nowhere VALUES (1)", []).unwrap_err();
        match err {
            StoreError::Statement(e) => assert!(e.to_string().contains("nowhere")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn shutdown_is_idempotent() {
        let manager = ConnectionManager::init(DatabaseLocation::Memory).unwrap();
        assert!(manager.is_open());
        manager.shutdown();
        manager.shutdown();
        assert!(!manager.is_open());
        assert!(matches!(
            manager.execute("SELECT 1", []),
            Err(StoreError::Closed)
        ));
    }
}
