use actix_web::{get, post, web, web::ServiceConfig, HttpRequest, HttpResponse, Responder};
use async_graphql_actix_web::GraphQLRequest;

use crate::graphql::{GraphQLPlayground, GraphQLSchema, RequestHeaders};

pub fn configure_service(config: &mut ServiceConfig) {
    config
        .service(live)
        .service(graphql_playground)
        .service(graphql);
}

#[get("/api/live")]
async fn live() -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[get("/api/graphql")]
async fn graphql_playground(playground: web::Data<GraphQLPlayground>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=UTF-8")
        .body(playground.to_string())
}

#[post("/api/graphql")]
async fn graphql(
    request: HttpRequest,
    graphql_request: GraphQLRequest,
    schema: web::Data<GraphQLSchema>,
) -> impl Responder {
    // Expose the transport headers to the resolvers of this request.
    let headers = RequestHeaders::from(request.headers());
    web::Json(
        schema
            .execute(graphql_request.into_inner().data(headers))
            .await,
    )
}
