use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Schema};
use serde_json::{json, Value};

use bookshelf_server::{
    graphql::{self, GraphQLSchema, RequestHeaders},
    library::Library,
    store::Storage,
};

fn schema() -> GraphQLSchema {
    graphql::build_schema(Library::new(Storage::open_in_memory().unwrap()))
}

async fn execute(schema: &GraphQLSchema, source: &str) -> Value {
    let response = schema.execute(source).await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    serde_json::to_value(&response.data).unwrap()
}

async fn execute_expecting_error(schema: &GraphQLSchema, source: &str) -> Value {
    let response = schema.execute(source).await;
    assert_eq!(response.errors.len(), 1, "expected exactly one error");
    serde_json::to_value(&response.errors[0]).unwrap()
}

#[tokio::test]
async fn author_crud_through_the_schema() {
    let schema = schema();

    let created = execute(
        &schema,
        r#"mutation { createAuthor(firstName: "Ada", lastName: "Lovelace") { id firstName lastName } }"#,
    )
    .await;
    assert_eq!(created["createAuthor"]["firstName"], "Ada");
    assert_eq!(created["createAuthor"]["lastName"], "Lovelace");
    let id = created["createAuthor"]["id"].as_i64().unwrap();

    let fetched = execute(
        &schema,
        &format!("{{ getAuthorById(id: {id}) {{ firstName lastName }} }}"),
    )
    .await;
    assert_eq!(fetched["getAuthorById"]["lastName"], "Lovelace");

    let updated = execute(
        &schema,
        &format!(
            r#"mutation {{ updateAuthor(id: {id}, firstName: "Augusta", lastName: "King") {{ firstName }} }}"#
        ),
    )
    .await;
    assert_eq!(updated["updateAuthor"]["firstName"], "Augusta");

    let deleted = execute(&schema, &format!("mutation {{ deleteAuthor(id: {id}) }}")).await;
    assert_eq!(deleted["deleteAuthor"], json!(true));

    let absent = execute(
        &schema,
        &format!("{{ getAuthorById(id: {id}) {{ firstName }} }}"),
    )
    .await;
    assert_eq!(absent["getAuthorById"], Value::Null);
}

#[tokio::test]
async fn relation_fields_resolve_lazily_in_both_directions() {
    let schema = schema();

    let author = execute(
        &schema,
        r#"mutation { createAuthor(firstName: "Mary", lastName: "Shelley") { id } }"#,
    )
    .await;
    let author_id = author["createAuthor"]["id"].as_i64().unwrap();

    for title in ["Frankenstein", "The Last Man"] {
        execute(
            &schema,
            &format!(r#"mutation {{ createBook(title: "{title}", authorId: {author_id}) {{ id }} }}"#),
        )
        .await;
    }

    let with_books = execute(
        &schema,
        &format!("{{ getAuthorById(id: {author_id}) {{ books {{ title }} }} }}"),
    )
    .await;
    let titles: Vec<_> = with_books["getAuthorById"]["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"Frankenstein".to_owned()));

    let books = execute(&schema, "{ getAllBooks { title author { firstName } } }").await;
    for book in books["getAllBooks"].as_array().unwrap() {
        assert_eq!(book["author"]["firstName"], "Mary");
    }
}

#[tokio::test]
async fn authorless_book_resolves_a_null_author() {
    let schema = schema();

    execute(
        &schema,
        r#"mutation { createBook(title: "Beowulf") { id } }"#,
    )
    .await;

    let books = execute(&schema, "{ getAllBooks { title author { firstName } } }").await;
    assert_eq!(books["getAllBooks"][0]["author"], Value::Null);
}

#[tokio::test]
async fn missing_update_target_yields_a_not_found_error() {
    let schema = schema();

    let error = execute_expecting_error(
        &schema,
        r#"mutation { updateAuthor(id: 42, firstName: "A", lastName: "B") { id } }"#,
    )
    .await;

    assert_eq!(error["message"], "author with id 42 does not exist");
    assert_eq!(error["extensions"]["classification"], "NOT_FOUND");
    assert_eq!(error["extensions"]["code"], "AUTHOR_NOT_FOUND");
    // Positional metadata of the failing field.
    assert_eq!(error["path"][0], "updateAuthor");
    assert!(!error["locations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_author_reference_on_create_book_is_rejected() {
    let schema = schema();

    let error = execute_expecting_error(
        &schema,
        r#"mutation { createBook(title: "Orphaned", authorId: 42) { id } }"#,
    )
    .await;
    assert_eq!(error["extensions"]["classification"], "NOT_FOUND");

    let books = execute(&schema, "{ getAllBooks { id } }").await;
    assert_eq!(books["getAllBooks"], json!([]));
}

#[tokio::test]
async fn non_positive_id_yields_a_bad_request_error() {
    let schema = schema();

    let error =
        execute_expecting_error(&schema, "{ getAuthorById(id: 0) { firstName } }").await;
    assert_eq!(error["message"], "Invalid ID");
    assert_eq!(error["extensions"]["classification"], "BAD_REQUEST");
    assert_eq!(error["path"][0], "getAuthorById");
}

#[tokio::test]
async fn delete_of_a_missing_id_still_reports_true() {
    let schema = schema();

    let deleted = execute(&schema, "mutation { deleteBook(id: 1234) }").await;
    assert_eq!(deleted["deleteBook"], json!(true));
}

struct HeaderProbe;

#[Object]
impl HeaderProbe {
    async fn header(&self, ctx: &Context<'_>, name: String) -> Option<Vec<String>> {
        ctx.data_opt::<RequestHeaders>()
            .and_then(|headers| headers.get(&name).map(<[String]>::to_vec))
    }
}

#[tokio::test]
async fn captured_headers_are_readable_from_the_context() {
    let mut header_map = actix_web::http::header::HeaderMap::new();
    header_map.append(
        actix_web::http::header::USER_AGENT,
        "integration-test".parse().unwrap(),
    );
    let headers = RequestHeaders::from(&header_map);

    let schema = Schema::new(HeaderProbe, EmptyMutation, EmptySubscription);
    let request = async_graphql::Request::new(r#"{ header(name: "User-Agent") }"#).data(headers);
    let response = schema.execute(request).await;

    assert!(response.errors.is_empty());
    let data = serde_json::to_value(&response.data).unwrap();
    assert_eq!(data["header"], json!(["integration-test"]));
}
