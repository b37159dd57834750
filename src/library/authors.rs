use rusqlite::{params, Connection, OptionalExtension, Row};

use super::Author;
use crate::store::StoreResult;

/// Persistence contract for authors. Implementations work against a single
/// connection and perform one unit of work per call.
pub trait AuthorRepository {
    fn find_by_id(&self, id: i64) -> StoreResult<Option<Author>>;
    /// All authors in store order.
    fn find_all(&self) -> StoreResult<Vec<Author>>;
    /// Inserts a new row and returns it with the generated id.
    fn insert(&self, first_name: &str, last_name: &str) -> StoreResult<Author>;
    /// Overwrites an existing row. Returns `false` if the id is unknown.
    fn update(&self, author: &Author) -> StoreResult<bool>;
    /// Returns whether a row was removed. Missing ids are a no-op.
    fn delete_by_id(&self, id: i64) -> StoreResult<bool>;
}

pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn find_by_id(&self, id: i64) -> StoreResult<Option<Author>> {
        self.conn
            .query_row(
                "SELECT id, first_name, last_name FROM author WHERE id = ?1;",
                [id],
                map_author,
            )
            .optional()
            .map_err(Into::into)
    }

    fn find_all(&self) -> StoreResult<Vec<Author>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, first_name, last_name FROM author;")?;
        let authors = stmt
            .query_map([], map_author)?
            .collect::<Result<_, _>>()?;
        Ok(authors)
    }

    fn insert(&self, first_name: &str, last_name: &str) -> StoreResult<Author> {
        self.conn.execute(
            "INSERT INTO author (first_name, last_name) VALUES (?1, ?2);",
            params![first_name, last_name],
        )?;
        Ok(Author {
            id: self.conn.last_insert_rowid(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        })
    }

    fn update(&self, author: &Author) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE author SET first_name = ?2, last_name = ?3 WHERE id = ?1;",
            params![author.id, author.first_name, author.last_name],
        )?;
        Ok(changed > 0)
    }

    fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        let removed = self.conn.execute("DELETE FROM author WHERE id = ?1;", [id])?;
        Ok(removed > 0)
    }
}

fn map_author(row: &Row) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
    })
}
