use crate::error::ItineraryError;
use crate::models::itinerary::{distinct_locations, total_activities};
use crate::models::itinerary_request::ItineraryRequest;
use crate::models::itinerary_response::{
    AgentTestResponse, AiTestResponse, ItineraryResponse, PipelineResponse, AGENT_FRAMEWORK,
    PIPELINE_FRAMEWORK,
};
use crate::services::agent_service::AgentOutcome;
use crate::services::llm_service::CompletionRequest;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

const TEST_AGENT_PREFERENCE: &str = "culture";
const TEST_AGENT_DAYS: u32 = 2;
const TEST_AI_PROMPT: &str =
    "Create a simple 2-day itinerary for Sikkim focusing on culture. Return only valid JSON.";
const TEST_AI_TEMPERATURE: f32 = 0.7;

fn agent_response(preference: String, days: u32, outcome: AgentOutcome) -> ItineraryResponse {
    ItineraryResponse {
        success: true,
        total_activities: total_activities(&outcome.itinerary),
        locations: distinct_locations(&outcome.itinerary),
        itinerary: outcome.itinerary,
        preference,
        days,
        framework: AGENT_FRAMEWORK.to_string(),
        degraded: outcome.degraded,
        note: outcome.note,
    }
}

/*
    POST /generate-itinerary
*/
pub async fn generate_itinerary(
    state: web::Data<AppState>,
    body: web::Json<ItineraryRequest>,
) -> Result<HttpResponse, ItineraryError> {
    let request = body.into_inner().validate()?;
    state.require_api_keys()?;
    let agent = state.agent()?;

    log::info!(
        "Generating {}-day itinerary for preference: {}",
        request.days,
        request.preference
    );
    let outcome = agent
        .generate_itinerary(&request.preference, request.days)
        .await;

    Ok(HttpResponse::Ok().json(agent_response(request.preference, request.days, outcome)))
}

/*
    POST /graph/generate
*/
pub async fn graph_generate(
    state: web::Data<AppState>,
    body: web::Json<ItineraryRequest>,
) -> Result<HttpResponse, ItineraryError> {
    let request = body.into_inner().validate()?;
    state.require_search_key()?;

    let outcome = state.pipeline.run(&request.preference, request.days).await;

    Ok(HttpResponse::Ok().json(PipelineResponse {
        success: true,
        total_activities: total_activities(&outcome.itinerary),
        locations: distinct_locations(&outcome.itinerary),
        preference: outcome.preference,
        days: outcome.days,
        itinerary: outcome.itinerary,
        accommodations: outcome.accommodations,
        combined: outcome.combined,
        framework: PIPELINE_FRAMEWORK.to_string(),
        degraded: outcome.degraded,
    }))
}

/*
    POST /test-agent (fixed request, for smoke testing a deployment)
*/
pub async fn test_agent(state: web::Data<AppState>) -> Result<HttpResponse, ItineraryError> {
    state.require_api_keys()?;
    let agent = state.agent()?;

    let outcome = agent
        .generate_itinerary(TEST_AGENT_PREFERENCE, TEST_AGENT_DAYS)
        .await;

    Ok(HttpResponse::Ok().json(AgentTestResponse {
        success: true,
        agent_test: agent_response(TEST_AGENT_PREFERENCE.to_string(), TEST_AGENT_DAYS, outcome),
        message: "Agent test completed successfully".to_string(),
    }))
}

/*
    POST /test-ai (one direct completion, bypassing both orchestrators)
*/
pub async fn test_ai(state: web::Data<AppState>) -> Result<HttpResponse, ItineraryError> {
    let llm = state.llm()?;

    let response = llm
        .complete(CompletionRequest::prompt(TEST_AI_PROMPT, TEST_AI_TEMPERATURE))
        .await
        .map_err(|e| {
            log::error!("AI test failed: {}", e);
            ItineraryError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(AiTestResponse {
        success: true,
        ai_response: response.content.unwrap_or_default(),
        model: state.config.groq_model.clone(),
    }))
}
