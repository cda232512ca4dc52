use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::io;

use sikkim_itinerary_api::config::AppConfig;
use sikkim_itinerary_api::routes;
use sikkim_itinerary_api::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    let config = AppConfig::from_env();
    let default_filter = if config.debug { "debug" } else { "info" };
    env_logger::init_from_env(Env::default().default_filter_or(default_filter));

    config
        .validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    if config.validate_api_keys() {
        log::info!("All API keys configured");
    }

    let host = config.host.clone();
    let port = config.port;

    let state = AppState::from_config(config).map_err(|e| io::Error::other(e.to_string()))?;
    let state = web::Data::new(state);

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
