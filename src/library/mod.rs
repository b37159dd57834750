pub mod authors;
pub mod books;

use async_graphql::{ComplexObject, Context, SimpleObject};
use log::debug;

use crate::{
    graphql::GraphQLError,
    store::{Storage, StoreError},
};
use authors::{AuthorRepository, SqliteAuthorRepository};
use books::{BookRepository, SqliteBookRepository};

pub type LibraryResult<T> = Result<T, LibraryError>;

#[derive(Debug, strum::AsRefStr, thiserror::Error)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LibraryError {
    #[error("Invalid ID")]
    InvalidId,
    #[error("author with id {0} does not exist")]
    AuthorNotFound(i64),
    #[error("book with id {0} does not exist")]
    BookNotFound(i64),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl GraphQLError for LibraryError {
    fn status(&self) -> u16 {
        match self {
            Self::InvalidId => 400,
            Self::AuthorNotFound(_) | Self::BookNotFound(_) => 404,
            Self::Storage(_) => 500,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

#[ComplexObject]
impl Author {
    /// Books owned by this author, fetched on field selection.
    async fn books(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Book>> {
        ctx.data::<Library>()?
            .books_of(self.id)
            .await
            .map_err(GraphQLError::extend)
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[graphql(skip)]
    pub author_id: Option<i64>,
}

#[ComplexObject]
impl Book {
    /// Owning author. Null for a book whose author was deleted
    /// or never assigned.
    async fn author(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<Author>> {
        let Some(author_id) = self.author_id else {
            return Ok(None);
        };
        ctx.data::<Library>()?
            .author_by_id(author_id)
            .await
            .map_err(GraphQLError::extend)
    }
}

/// Façade over both repositories, implementing the whole operation surface
/// of the API. Each method is one unit of work against the store.
#[derive(Clone)]
pub struct Library {
    storage: Storage,
}

impl Library {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn author_by_id(&self, id: i64) -> LibraryResult<Option<Author>> {
        let conn = self.storage.lock().await;
        SqliteAuthorRepository::new(&conn)
            .find_by_id(checked_id(id)?)
            .map_err(Into::into)
    }

    pub async fn all_authors(&self) -> LibraryResult<Vec<Author>> {
        let conn = self.storage.lock().await;
        SqliteAuthorRepository::new(&conn)
            .find_all()
            .map_err(Into::into)
    }

    pub async fn create_author(&self, first_name: &str, last_name: &str) -> LibraryResult<Author> {
        let conn = self.storage.lock().await;
        let author = SqliteAuthorRepository::new(&conn).insert(first_name, last_name)?;
        debug!("Created author {}", author.id);
        Ok(author)
    }

    pub async fn update_author(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
    ) -> LibraryResult<Author> {
        let conn = self.storage.lock().await;
        let repository = SqliteAuthorRepository::new(&conn);
        let mut author = repository
            .find_by_id(checked_id(id)?)?
            .ok_or(LibraryError::AuthorNotFound(id))?;
        author.first_name = first_name.to_owned();
        author.last_name = last_name.to_owned();
        repository.update(&author)?;
        Ok(author)
    }

    /// Unconditional and idempotent: a missing id is a no-op.
    pub async fn delete_author(&self, id: i64) -> LibraryResult<bool> {
        let conn = self.storage.lock().await;
        if SqliteAuthorRepository::new(&conn).delete_by_id(checked_id(id)?)? {
            debug!("Deleted author {id}");
        }
        Ok(true)
    }

    pub async fn book_by_id(&self, id: i64) -> LibraryResult<Option<Book>> {
        let conn = self.storage.lock().await;
        SqliteBookRepository::new(&conn)
            .find_by_id(checked_id(id)?)
            .map_err(Into::into)
    }

    pub async fn all_books(&self) -> LibraryResult<Vec<Book>> {
        let conn = self.storage.lock().await;
        SqliteBookRepository::new(&conn)
            .find_all()
            .map_err(Into::into)
    }

    /// A referenced author must exist; without a reference the book
    /// is created authorless.
    pub async fn create_book(&self, title: &str, author_id: Option<i64>) -> LibraryResult<Book> {
        let conn = self.storage.lock().await;
        if let Some(author_id) = author_id {
            SqliteAuthorRepository::new(&conn)
                .find_by_id(checked_id(author_id)?)?
                .ok_or(LibraryError::AuthorNotFound(author_id))?;
        }
        let book = SqliteBookRepository::new(&conn).insert(title, author_id)?;
        debug!("Created book {}", book.id);
        Ok(book)
    }

    pub async fn update_book(&self, id: i64, title: &str) -> LibraryResult<Book> {
        let conn = self.storage.lock().await;
        let repository = SqliteBookRepository::new(&conn);
        let mut book = repository
            .find_by_id(checked_id(id)?)?
            .ok_or(LibraryError::BookNotFound(id))?;
        book.title = title.to_owned();
        repository.update(&book)?;
        Ok(book)
    }

    /// Unconditional and idempotent: a missing id is a no-op.
    pub async fn delete_book(&self, id: i64) -> LibraryResult<bool> {
        let conn = self.storage.lock().await;
        if SqliteBookRepository::new(&conn).delete_by_id(checked_id(id)?)? {
            debug!("Deleted book {id}");
        }
        Ok(true)
    }

    pub(crate) async fn books_of(&self, author_id: i64) -> LibraryResult<Vec<Book>> {
        let conn = self.storage.lock().await;
        SqliteBookRepository::new(&conn)
            .find_by_author(author_id)
            .map_err(Into::into)
    }
}

fn checked_id(id: i64) -> LibraryResult<i64> {
    if id < 1 {
        Err(LibraryError::InvalidId)
    } else {
        Ok(id)
    }
}
