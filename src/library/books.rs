use rusqlite::{params, Connection, OptionalExtension, Row};

use super::Book;
use crate::store::StoreResult;

/// Persistence contract for books, mirroring [super::authors::AuthorRepository].
pub trait BookRepository {
    fn find_by_id(&self, id: i64) -> StoreResult<Option<Book>>;
    fn find_all(&self) -> StoreResult<Vec<Book>>;
    /// Books owned by the given author, backing the lazy `Author.books` field.
    fn find_by_author(&self, author_id: i64) -> StoreResult<Vec<Book>>;
    fn insert(&self, title: &str, author_id: Option<i64>) -> StoreResult<Book>;
    fn update(&self, book: &Book) -> StoreResult<bool>;
    fn delete_by_id(&self, id: i64) -> StoreResult<bool>;
}

pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn find_by_id(&self, id: i64) -> StoreResult<Option<Book>> {
        self.conn
            .query_row(
                "SELECT id, title, author_id FROM book WHERE id = ?1;",
                [id],
                map_book,
            )
            .optional()
            .map_err(Into::into)
    }

    fn find_all(&self) -> StoreResult<Vec<Book>> {
        let mut stmt = self.conn.prepare("SELECT id, title, author_id FROM book;")?;
        let books = stmt.query_map([], map_book)?.collect::<Result<_, _>>()?;
        Ok(books)
    }

    fn find_by_author(&self, author_id: i64) -> StoreResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, author_id FROM book WHERE author_id = ?1;")?;
        let books = stmt
            .query_map([author_id], map_book)?
            .collect::<Result<_, _>>()?;
        Ok(books)
    }

    fn insert(&self, title: &str, author_id: Option<i64>) -> StoreResult<Book> {
        self.conn.execute(
            "INSERT INTO book (title, author_id) VALUES (?1, ?2);",
            params![title, author_id],
        )?;
        Ok(Book {
            id: self.conn.last_insert_rowid(),
            title: title.to_owned(),
            author_id,
        })
    }

    fn update(&self, book: &Book) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE book SET title = ?2, author_id = ?3 WHERE id = ?1;",
            params![book.id, book.title, book.author_id],
        )?;
        Ok(changed > 0)
    }

    fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        let removed = self.conn.execute("DELETE FROM book WHERE id = ?1;", [id])?;
        Ok(removed > 0)
    }
}

fn map_book(row: &Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author_id: row.get("author_id")?,
    })
}
