//! Staged itinerary pipeline.
//!
//! generate -> search accommodations -> geocode -> combine. Generation is a
//! single attempt; anything short of a valid itinerary switches the run to
//! the offline fallback and marks it degraded. Later stages never fail the
//! run.

use crate::config::RegionConfig;
use crate::error::ItineraryError;
use crate::models::itinerary::{AccommodationCandidate, DayPlan, Itinerary};
use crate::services::accommodation_service::AccommodationService;
use crate::services::fallback_service::{generate_fallback, normalize_itinerary};
use crate::services::json_repair_service::extract_itinerary_json;
use crate::services::llm_service::{CompletionRequest, LlmClient};
use crate::services::prompt_service::pipeline_itinerary_prompt;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

const GENERATION_TEMPERATURE: f32 = 0.5;

/// Per-request record threaded through the stages.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub run_id: Uuid,
    pub preference: String,
    pub days: u32,
    pub itinerary: Option<Itinerary>,
    pub accommodations: BTreeMap<String, Vec<AccommodationCandidate>>,
    pub combined: Vec<DayPlan>,
    pub degraded: bool,
}

impl PipelineState {
    pub fn new(preference: &str, days: u32) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            preference: preference.to_string(),
            days,
            itinerary: None,
            accommodations: BTreeMap::new(),
            combined: Vec::new(),
            degraded: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub preference: String,
    pub days: u32,
    pub itinerary: Itinerary,
    pub accommodations: BTreeMap<String, Vec<AccommodationCandidate>>,
    pub combined: Vec<DayPlan>,
    pub degraded: bool,
}

impl From<PipelineState> for PipelineOutcome {
    fn from(state: PipelineState) -> Self {
        Self {
            preference: state.preference,
            days: state.days,
            itinerary: state.itinerary.unwrap_or_default(),
            accommodations: state.accommodations,
            combined: state.combined,
            degraded: state.degraded,
        }
    }
}

pub struct ItineraryPipeline {
    llm: Option<Arc<dyn LlmClient>>,
    accommodation_service: AccommodationService,
    region: RegionConfig,
}

impl ItineraryPipeline {
    pub fn new(
        llm: Option<Arc<dyn LlmClient>>,
        accommodation_service: AccommodationService,
        region: RegionConfig,
    ) -> Self {
        Self {
            llm,
            accommodation_service,
            region,
        }
    }

    /// Live generation: one completion call, then extraction and repair.
    pub async fn generate_live(&self, preference: &str, days: u32) -> Result<Itinerary, ItineraryError> {
        let llm = self
            .llm
            .as_ref()
            .ok_or_else(|| ItineraryError::config("GROQ API key not configured"))?;

        let prompt = pipeline_itinerary_prompt(&self.region, preference, days);
        let response = llm
            .complete(CompletionRequest::prompt(prompt, GENERATION_TEMPERATURE))
            .await?;

        let content = response.content.unwrap_or_default();
        let itinerary = extract_itinerary_json(content.trim())?;
        Ok(normalize_itinerary(itinerary, preference, days))
    }

    pub async fn generate(&self, mut state: PipelineState) -> PipelineState {
        match self.generate_live(&state.preference, state.days).await {
            Ok(itinerary) => {
                log::info!("[{}] Generated {}-day itinerary", state.run_id, itinerary.len());
                state.itinerary = Some(itinerary);
            }
            Err(e) => {
                match &e {
                    ItineraryError::MalformedOutput { raw, .. } => {
                        log::warn!("[{}] Model returned invalid JSON; falling back: {} | Raw: {}", state.run_id, e, raw)
                    }
                    _ => log::error!("[{}] Itinerary generation failed; falling back: {}", state.run_id, e),
                }
                state.itinerary = Some(generate_fallback(&state.preference, state.days));
                state.degraded = true;
            }
        }
        state
    }

    pub async fn fetch_accommodations(&self, mut state: PipelineState) -> PipelineState {
        let itinerary = state.itinerary.as_deref().unwrap_or_default();
        state.accommodations = self.accommodation_service.fetch_for_itinerary(itinerary).await;
        state
    }

    pub fn combine(&self, mut state: PipelineState) -> PipelineState {
        let itinerary = state.itinerary.as_deref().unwrap_or_default();
        state.combined = self
            .accommodation_service
            .combine(itinerary, &state.accommodations);
        state
    }

    pub async fn run(&self, preference: &str, days: u32) -> PipelineOutcome {
        let state = PipelineState::new(preference, days);
        log::info!(
            "[{}] Pipeline run started: {} days, preference '{}'",
            state.run_id,
            days,
            preference
        );

        let state = self.generate(state).await;
        let state = self.fetch_accommodations(state).await;
        let state = self.combine(state);

        log::info!(
            "[{}] Pipeline run finished (degraded: {})",
            state.run_id,
            state.degraded
        );
        state.into()
    }
}
