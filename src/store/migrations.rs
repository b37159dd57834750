use rusqlite::Connection;

use super::{StoreError, StoreResult};

struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: "CREATE TABLE author (
              id         INTEGER PRIMARY KEY AUTOINCREMENT,
              first_name TEXT NOT NULL,
              last_name  TEXT NOT NULL
          );
          CREATE TABLE book (
              id        INTEGER PRIMARY KEY AUTOINCREMENT,
              title     TEXT NOT NULL,
              -- Deleting an author detaches its books instead of cascading.
              author_id INTEGER REFERENCES author(id) ON DELETE SET NULL
          );
          CREATE INDEX book_author_id ON book(author_id);",
}];

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations in one transaction. The current schema
/// version is mirrored to `PRAGMA user_version`.
pub fn apply(conn: &mut Connection) -> StoreResult<()> {
    let current = user_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(StoreError::UnsupportedSchemaVersion {
            found: current,
            supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version > current {
            tx.execute_batch(migration.sql)?;
            tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        }
    }
    tx.commit().map_err(Into::into)
}

fn user_version(conn: &Connection) -> StoreResult<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(Into::into)
}
