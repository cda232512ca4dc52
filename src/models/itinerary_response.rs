use crate::models::itinerary::{AccommodationCandidate, DayPlan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const AGENT_FRAMEWORK: &str = "Tool-calling agent";
pub const PIPELINE_FRAMEWORK: &str = "Staged pipeline";

/// Response of `POST /generate-itinerary`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItineraryResponse {
    pub success: bool,
    pub itinerary: Vec<DayPlan>,
    pub preference: String,
    pub days: u32,
    pub framework: String,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub total_activities: usize,
    pub locations: Vec<String>,
}

/// Response of `POST /graph/generate`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PipelineResponse {
    pub success: bool,
    pub preference: String,
    pub days: u32,
    pub itinerary: Vec<DayPlan>,
    pub accommodations: BTreeMap<String, Vec<AccommodationCandidate>>,
    pub combined: Vec<DayPlan>,
    pub framework: String,
    pub degraded: bool,
    pub total_activities: usize,
    pub locations: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub framework: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub api_keys_configured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiKeyStatus {
    pub groq_api_key: String,
    pub tavily_api_key: String,
    pub groq_key_length: usize,
    pub tavily_key_length: usize,
}

/// Response of `POST /test-ai`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AiTestResponse {
    pub success: bool,
    pub ai_response: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentTestResponse {
    pub success: bool,
    pub agent_test: ItineraryResponse,
    pub message: String,
}
