use crate::config::AppConfig;
use crate::error::ItineraryError;
use crate::services::accommodation_service::AccommodationService;
use crate::services::agent_service::TravelAgent;
use crate::services::geocoding_service::{Geocoder, NominatimClient};
use crate::services::llm_service::{GroqClient, LlmClient};
use crate::services::pipeline_service::ItineraryPipeline;
use crate::services::search_service::{SearchClient, TavilyClient};
use std::sync::Arc;

/// Services shared by every request. Built once at startup and handed to
/// the handlers through `web::Data`.
pub struct AppState {
    pub config: AppConfig,
    pub llm: Option<Arc<dyn LlmClient>>,
    pub pipeline: ItineraryPipeline,
    pub agent: Option<TravelAgent>,
}

impl AppState {
    /// Wire the orchestrators from already constructed clients. The agent is
    /// only available when an LLM client is present.
    pub fn new(
        config: AppConfig,
        llm: Option<Arc<dyn LlmClient>>,
        search: Option<Arc<dyn SearchClient>>,
        geocoder: Option<Arc<dyn Geocoder>>,
    ) -> Self {
        let agent = match TravelAgent::new(
            llm.clone(),
            search.clone(),
            config.region.clone(),
            config.agent_max_turns,
        ) {
            Ok(agent) => Some(agent),
            Err(e) => {
                log::warn!("Agent orchestrator unavailable: {}", e);
                None
            }
        };

        let accommodation_service = AccommodationService::new(
            search,
            geocoder,
            config.region.clone(),
            config.accommodation_limit,
        );
        let pipeline = ItineraryPipeline::new(
            llm.clone(),
            accommodation_service,
            config.region.clone(),
        );

        Self {
            config,
            llm,
            pipeline,
            agent,
        }
    }

    /// Build the real Groq, Tavily and Nominatim clients for whichever keys
    /// are configured.
    pub fn from_config(config: AppConfig) -> Result<Self, ItineraryError> {
        let llm: Option<Arc<dyn LlmClient>> = if config.has_llm_key() {
            Some(Arc::new(GroqClient::new(&config)?))
        } else {
            None
        };
        let search: Option<Arc<dyn SearchClient>> = if config.has_search_key() {
            Some(Arc::new(TavilyClient::new(&config)?))
        } else {
            None
        };
        let geocoder: Option<Arc<dyn Geocoder>> = Some(Arc::new(NominatimClient::new(&config)?));

        Ok(Self::new(config, llm, search, geocoder))
    }

    /// The agent, or the configuration error explaining why it is missing.
    pub fn agent(&self) -> Result<&TravelAgent, ItineraryError> {
        self.agent
            .as_ref()
            .ok_or_else(|| ItineraryError::config("GROQ API key not configured"))
    }

    /// The raw LLM client, required by the direct model check.
    pub fn llm(&self) -> Result<&Arc<dyn LlmClient>, ItineraryError> {
        self.llm
            .as_ref()
            .ok_or_else(|| ItineraryError::config("GROQ API key not configured"))
    }

    pub fn require_api_keys(&self) -> Result<(), ItineraryError> {
        let missing = self.config.missing_api_keys();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ItineraryError::config(format!(
                "API keys not configured: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn require_search_key(&self) -> Result<(), ItineraryError> {
        if self.config.has_search_key() {
            Ok(())
        } else {
            Err(ItineraryError::config("TAVILY_API_KEY not configured"))
        }
    }
}
