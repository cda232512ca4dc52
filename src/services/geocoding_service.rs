//! Place-name geocoding through OpenStreetMap Nominatim.
//!
//! Lookups are best effort: every failure mode (timeout, non-2xx status,
//! empty result, unparsable coordinates) surfaces as an error the caller
//! turns into null coordinates.

use crate::config::AppConfig;
use crate::error::ItineraryError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "sikkim-itinerary-api/0.1";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoding request failed with status {0}")]
    Status(u16),

    #[error("No result for '{0}'")]
    NotFound(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<GeoPoint, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

fn parse_place(query: &str, places: Vec<NominatimPlace>) -> Result<GeoPoint, GeocodeError> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;

    let lat = place
        .lat
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidCoordinates(place.lat.clone()))?;
    let lon = place
        .lon
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidCoordinates(place.lon.clone()))?;

    Ok(GeoPoint { lat, lon })
}

pub struct NominatimClient {
    http_client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: &AppConfig) -> Result<Self, ItineraryError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.geocode_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ItineraryError::config(format!("Failed to build geocoding HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.nominatim_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<GeoPoint, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        parse_place(query, places)
    }
}
