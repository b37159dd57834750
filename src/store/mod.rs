mod migrations;

use std::{path::Path, sync::Arc, time::Duration};

use log::info;
use rusqlite::Connection;
use tokio::sync::{Mutex, MutexGuard};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite failure: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {found} is newer than supported {supported}")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

/// Handle to the embedded SQLite store. Cloning is cheap and all clones
/// share one connection: rusqlite is synchronous, so the async resolvers
/// serialize their units of work through the lock.
#[derive(Clone)]
pub struct Storage {
    conn: Arc<Mutex<Connection>>,
}

impl Storage {
    /// Opens (creating if needed) the database file and brings its schema
    /// up to date.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let mut conn = Connection::open(&path)?;
        bootstrap(&mut conn)?;
        info!(
            "Opened the database at {} (schema version {})",
            path.as_ref().display(),
            migrations::latest_version()
        );
        Ok(Self::wrap(conn))
    }

    /// In-memory database with the full schema applied. The data lives only
    /// as long as this handle and its clones.
    pub fn open_in_memory() -> StoreResult<Self> {
        let mut conn = Connection::open_in_memory()?;
        bootstrap(&mut conn)?;
        Ok(Self::wrap(conn))
    }

    fn wrap(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}

fn bootstrap(conn: &mut Connection) -> StoreResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    migrations::apply(conn)
}
