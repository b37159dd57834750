use std::ops::Deref;

use async_graphql::{Object, Result};

use super::GraphQLError;
use crate::library::{Author, Book, Library};

pub struct MutationRoot(pub(super) Library);

#[Object]
impl MutationRoot {
    /// Name contents are not validated: empty strings are stored as given.
    async fn create_author(&self, first_name: String, last_name: String) -> Result<Author> {
        self.0
            .create_author(&first_name, &last_name)
            .await
            .map_err(GraphQLError::extend)
    }

    /// Overwrites both names. Fails with NOT_FOUND for an unknown id.
    async fn update_author(
        &self,
        id: i64,
        first_name: String,
        last_name: String,
    ) -> Result<Author> {
        self.0
            .update_author(id, &first_name, &last_name)
            .await
            .map_err(GraphQLError::extend)
    }

    /// Always reports `true`, whether or not the author existed.
    async fn delete_author(&self, id: i64) -> Result<bool> {
        self.0.delete_author(id).await.map_err(GraphQLError::extend)
    }

    /// Without `authorId` the book is created authorless. A given
    /// `authorId` must refer to an existing author.
    async fn create_book(&self, title: String, author_id: Option<i64>) -> Result<Book> {
        self.0
            .create_book(&title, author_id)
            .await
            .map_err(GraphQLError::extend)
    }

    /// Fails with NOT_FOUND for an unknown id.
    async fn update_book(&self, id: i64, title: String) -> Result<Book> {
        self.0
            .update_book(id, &title)
            .await
            .map_err(GraphQLError::extend)
    }

    /// Always reports `true`, whether or not the book existed.
    async fn delete_book(&self, id: i64) -> Result<bool> {
        self.0.delete_book(id).await.map_err(GraphQLError::extend)
    }
}

impl Deref for MutationRoot {
    type Target = Library;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
