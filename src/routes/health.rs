use crate::models::itinerary_response::{
    ApiKeyStatus, HealthResponse, RootResponse, AGENT_FRAMEWORK,
};
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};

fn key_status(key: &Option<String>) -> (String, usize) {
    match key {
        Some(value) => ("configured".to_string(), value.len()),
        None => ("missing".to_string(), 0),
    }
}

/*
    GET /
*/
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(RootResponse {
        message: "Sikkim Itinerary API".to_string(),
        status: "running".to_string(),
        framework: AGENT_FRAMEWORK.to_string(),
    })
}

/*
    GET /health
*/
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        api_keys_configured: state.config.api_keys_configured(),
    })
}

/*
    GET /debug/api-keys (presence and length only, never the value)
*/
pub async fn debug_api_keys(state: web::Data<AppState>) -> impl Responder {
    let (groq_api_key, groq_key_length) = key_status(&state.config.groq_api_key);
    let (tavily_api_key, tavily_key_length) = key_status(&state.config.tavily_api_key);

    HttpResponse::Ok().json(ApiKeyStatus {
        groq_api_key,
        tavily_api_key,
        groq_key_length,
        tavily_key_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_status() {
        assert_eq!(
            key_status(&Some("gsk_123".to_string())),
            ("configured".to_string(), 7)
        );
        assert_eq!(key_status(&None), ("missing".to_string(), 0));
    }
}
