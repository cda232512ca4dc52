#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use async_trait::async_trait;
use std::sync::Arc;

use sikkim_itinerary_api::config::AppConfig;
use sikkim_itinerary_api::routes;
use sikkim_itinerary_api::services::geocoding_service::{GeoPoint, GeocodeError, Geocoder};
use sikkim_itinerary_api::services::llm_service::{
    CompletionRequest, CompletionResponse, LlmClient, LlmError,
};
use sikkim_itinerary_api::services::search_service::{SearchClient, SearchError, SearchHit};
use sikkim_itinerary_api::state::AppState;

/// LLM that is always unreachable.
pub struct FailingLlm;

#[async_trait]
impl LlmClient for FailingLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}

/// LLM that answers every request with the same text.
pub struct FixedLlm(pub String);

#[async_trait]
impl LlmClient for FixedLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse::text(self.0.clone()))
    }
}

pub struct FailingSearch;

#[async_trait]
impl SearchClient for FailingSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
        Err(SearchError::Response("status 502".to_string()))
    }
}

pub struct HotelSearch;

#[async_trait]
impl SearchClient for HotelSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
        Ok(vec![
            SearchHit::new("Hotel Norbu Ghang | Booking", "https://example.com/norbu"),
            SearchHit::new("hotel norbu ghang - Pelling", "https://example.com/dup"),
            SearchHit::new("Elgin Mount Pandim", "https://example.com/elgin"),
        ])
    }
}

pub struct FixedGeocoder;

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _query: &str) -> Result<GeoPoint, GeocodeError> {
        Ok(GeoPoint {
            lat: 27.3,
            lon: 88.2,
        })
    }
}

pub fn config_with_keys(groq: bool, tavily: bool) -> AppConfig {
    AppConfig {
        groq_api_key: groq.then(|| "gsk_test_key".to_string()),
        tavily_api_key: tavily.then(|| "tvly-test".to_string()),
        ..AppConfig::default()
    }
}

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new(
        config: AppConfig,
        llm: Option<Arc<dyn LlmClient>>,
        search: Option<Arc<dyn SearchClient>>,
        geocoder: Option<Arc<dyn Geocoder>>,
    ) -> Self {
        Self {
            state: web::Data::new(AppState::new(config, llm, search, geocoder)),
        }
    }

    /// Keys configured, every upstream call fails.
    pub fn failing_upstreams() -> Self {
        Self::new(
            config_with_keys(true, true),
            Some(Arc::new(FailingLlm)),
            Some(Arc::new(FailingSearch)),
            Some(Arc::new(FixedGeocoder)),
        )
    }

    /// No keys and no clients.
    pub fn unconfigured() -> Self {
        Self::new(config_with_keys(false, false), None, None, None)
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    }
}
