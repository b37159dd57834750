mod mutation;
mod query;

use std::{collections::HashMap, fmt::Display};

use actix_web::http::header::HeaderMap;
use async_graphql::{http::GraphiQLSource, EmptySubscription, Error, ErrorExtensions, Schema};
use log::error;

use crate::library::Library;
use mutation::MutationRoot;
use query::QueryRoot;

pub type GraphQLSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;
pub type GraphQLPlayground = String;

pub fn build_schema(library: Library) -> GraphQLSchema {
    Schema::build(
        QueryRoot(library.clone()),
        MutationRoot(library.clone()),
        EmptySubscription,
    )
    // The lazy relation fields (Author.books, Book.author) resolve through it.
    .data(library)
    .finish()
}

pub fn build_playground() -> GraphQLPlayground {
    GraphiQLSource::build()
        .endpoint("/api/graphql")
        .title("Bookshelf GraphQL")
        .finish()
}

/// Coarse wire-level error category, derived from the HTTP-like status
/// an error carries.
#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClassification {
    BadRequest,
    NotFound,
}

impl ErrorClassification {
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            400 => Some(Self::BadRequest),
            404 => Some(Self::NotFound),
            _ => None,
        }
    }
}

/// Conversion of a typed failure into the GraphQL error contract.
/// The executor attaches the field path and source location itself.
pub trait GraphQLError: AsRef<str> + Display {
    /// HTTP-like status that drives the classification.
    fn status(&self) -> u16;

    fn extend(self) -> Error
    where
        Self: Sized,
    {
        let status = self.status();
        match ErrorClassification::from_status(status) {
            Some(classification) => Error::new(self.to_string()).extend_with(|_, extensions| {
                extensions.set("classification", classification.as_ref());
                extensions.set("code", self.as_ref());
            }),
            // Anything unclassified crosses the wire without internal detail.
            None => {
                error!("Unclassified failure (status {status}): {self}");
                Error::new("internal error")
            }
        }
    }
}

/// Snapshot of the inbound transport headers, injected into the execution
/// data of every request so that any resolver can reach them through
/// the context. Capturing never alters or rejects a request.
#[derive(Debug, Default, Clone)]
pub struct RequestHeaders(HashMap<String, Vec<String>>);

impl RequestHeaders {
    /// Values of a header, looked up case-insensitively.
    /// Non-UTF-8 values are captured lossily.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(&name.to_lowercase()).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&HeaderMap> for RequestHeaders {
    fn from(headers: &HeaderMap) -> Self {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            map.entry(name.as_str().to_owned())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use async_graphql::Pos;

    use super::*;
    use crate::library::LibraryError;

    fn to_wire(error: Error) -> serde_json::Value {
        serde_json::to_value(error.into_server_error(Pos::default())).unwrap()
    }

    #[test]
    fn status_400_maps_to_bad_request() {
        let error = to_wire(LibraryError::InvalidId.extend());
        assert_eq!(error["message"], "Invalid ID");
        assert_eq!(error["extensions"]["classification"], "BAD_REQUEST");
        assert_eq!(error["extensions"]["code"], "INVALID_ID");
    }

    #[test]
    fn status_404_maps_to_not_found() {
        let error = to_wire(LibraryError::AuthorNotFound(7).extend());
        assert_eq!(error["message"], "author with id 7 does not exist");
        assert_eq!(error["extensions"]["classification"], "NOT_FOUND");
    }

    #[test]
    fn other_statuses_stay_unclassified() {
        let error = LibraryError::Storage(crate::store::StoreError::UnsupportedSchemaVersion {
            found: 9,
            supported: 1,
        })
        .extend();
        assert!(error.extensions.is_none());
        assert_eq!(to_wire(error)["message"], "internal error");
    }

    #[test]
    fn headers_are_case_insensitive_and_multi_value() {
        let mut headers = HeaderMap::new();
        headers.append(
            actix_web::http::header::ACCEPT,
            "application/json".parse().unwrap(),
        );
        headers.append(actix_web::http::header::ACCEPT, "text/html".parse().unwrap());

        let captured = RequestHeaders::from(&headers);
        assert_eq!(
            captured.get("Accept"),
            Some(&["application/json".to_owned(), "text/html".to_owned()][..])
        );
        assert!(captured.get("authorization").is_none());
    }
}
