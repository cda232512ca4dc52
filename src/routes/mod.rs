use crate::error::ItineraryError;
use actix_web::{error::JsonPayloadError, web, HttpRequest};

pub mod health;
pub mod itinerary;

/// Body deserialization failures are reported in the same envelope as
/// validation errors.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected request body: {}", err);
    ItineraryError::validation(format!("Invalid request body: {}", err)).into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/", web::get().to(health::root))
        .route("/health", web::get().to(health::health_check))
        .route("/debug/api-keys", web::get().to(health::debug_api_keys))
        .route(
            "/generate-itinerary",
            web::post().to(itinerary::generate_itinerary),
        )
        .route("/graph/generate", web::post().to(itinerary::graph_generate))
        .route("/test-agent", web::post().to(itinerary::test_agent))
        .route("/test-ai", web::post().to(itinerary::test_ai));
}
