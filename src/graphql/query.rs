use std::ops::Deref;

use async_graphql::{Object, Result};

use super::GraphQLError;
use crate::library::{Author, Book, Library};

pub struct QueryRoot(pub(super) Library);

#[Object]
impl QueryRoot {
    /// Resolves to null when the id is unknown.
    async fn get_author_by_id(&self, id: i64) -> Result<Option<Author>> {
        self.author_by_id(id).await.map_err(GraphQLError::extend)
    }

    /// All authors in store order.
    async fn get_all_authors(&self) -> Result<Vec<Author>> {
        self.all_authors().await.map_err(GraphQLError::extend)
    }

    /// Resolves to null when the id is unknown.
    async fn get_book_by_id(&self, id: i64) -> Result<Option<Book>> {
        self.book_by_id(id).await.map_err(GraphQLError::extend)
    }

    async fn get_all_books(&self) -> Result<Vec<Book>> {
        self.all_books().await.map_err(GraphQLError::extend)
    }
}

impl Deref for QueryRoot {
    type Target = Library;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
