use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItineraryError {
    /// A required API key or setting is absent
    #[error("Configuration error: {0}")]
    ConfigMissing(String),

    /// Model output that could not be repaired into a valid itinerary
    #[error("Invalid JSON format: {reason}")]
    MalformedOutput { reason: String, raw: String },

    /// A search, geocode or completion call failed
    #[error("{service} unavailable: {message}")]
    UpstreamUnavailable { service: String, message: String },

    /// Request input out of bounds
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ItineraryError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        ItineraryError::ConfigMissing(message.into())
    }

    pub fn malformed<R: Into<String>, S: Into<String>>(reason: R, raw: S) -> Self {
        ItineraryError::MalformedOutput {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    pub fn upstream<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        ItineraryError::UpstreamUnavailable {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        ItineraryError::Validation(message.into())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ResponseError for ItineraryError {
    fn status_code(&self) -> StatusCode {
        match self {
            ItineraryError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ItineraryError::ConfigMissing(_) => "configuration_missing",
            ItineraryError::MalformedOutput { .. } => "malformed_output",
            ItineraryError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ItineraryError::Validation(_) => "validation_error",
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            error: error.to_string(),
            detail: Some(self.to_string()),
        })
    }
}
