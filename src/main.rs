use actix_web::{web, App, HttpServer};
use anyhow::Context;
use env_logger::Env;
use log::info;

use bookshelf_server::{config::Config, graphql, library::Library, rest, store::Storage};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::new().with_context(|| "Failed to obtain the server configuration")?;

    env_logger::builder()
        .format_timestamp(None)
        .parse_env(Env::new().default_filter_or(&config.log_filter))
        .init();

    let storage = Storage::open(&config.database_path)
        .with_context(|| "Failed to open the catalog database")?;
    let schema = graphql::build_schema(Library::new(storage));
    let playground = graphql::build_playground();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(web::Data::new(schema.clone()))
            .app_data(web::Data::new(playground.clone()))
            .configure(rest::configure_service)
    })
    .bind((config.server_address.clone(), config.server_port))
    .map(|server| {
        info!("Listening {}:{}", config.server_address, config.server_port);
        server
    })?
    .run()
    .await
    .map_err(Into::into)
}
