//! Tool-calling travel agent.
//!
//! The model decides per turn whether to search, draft an itinerary with the
//! generation tool, or answer. The loop is an explicit state machine with a
//! hard turn budget; once the budget is spent the model is asked for its
//! final answer without tools.

use crate::config::RegionConfig;
use crate::error::ItineraryError;
use crate::models::itinerary::Itinerary;
use crate::services::fallback_service::{generate_fallback, normalize_itinerary, title_case};
use crate::services::json_repair_service::extract_itinerary_json;
use crate::services::llm_service::{
    ChatMessage, CompletionRequest, LlmClient, ToolCall, ToolDefinition,
};
use crate::services::prompt_service::{
    agent_system_prompt, agent_task_prompt, detailed_itinerary_prompt, FINAL_ANSWER_PROMPT,
};
use crate::services::search_service::SearchClient;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

pub const SEARCH_TOOL: &str = "search_sikkim_attractions";
pub const GENERATE_TOOL: &str = "generate_detailed_itinerary";

const AGENT_TEMPERATURE: f32 = 0.7;
const SNIPPET_CHARS: usize = 200;

pub const FALLBACK_NOTE_AGENT_ERROR: &str = "Generated using fallback due to agent error";
pub const FALLBACK_NOTE_INVALID_JSON: &str = "Generated using fallback due to invalid JSON";

#[derive(Debug, Clone, PartialEq)]
enum AgentState {
    AwaitingToolCall,
    ToolExecuting(Vec<ToolCall>),
    ProducingFinalAnswer(String),
}

#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub itinerary: Itinerary,
    pub degraded: bool,
    pub note: Option<String>,
}

pub struct TravelAgent {
    llm: Arc<dyn LlmClient>,
    search: Option<Arc<dyn SearchClient>>,
    region: RegionConfig,
    max_turns: usize,
}

fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: SEARCH_TOOL.to_string(),
            description: "Search for attractions and information about Sikkim travel destinations."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query" }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: GENERATE_TOOL.to_string(),
            description: "Generate a detailed travel itinerary for Sikkim based on preferences and search data."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "preference": { "type": "string" },
                    "days": { "type": "integer" },
                    "search_data": { "type": "string" }
                },
                "required": ["preference", "days", "search_data"]
            }),
        },
    ]
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

fn string_arg<'a>(arguments: &'a Value, key: &str) -> Option<&'a str> {
    arguments.get(key).and_then(Value::as_str)
}

fn days_arg(arguments: &Value) -> Option<u32> {
    let days = match arguments.get("days")? {
        Value::Number(n) => n.as_u64().and_then(|d| u32::try_from(d).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    days.filter(|d| *d >= 1)
}

/// Canned single day returned by the generation tool when the model's
/// draft is not valid JSON.
fn single_day_stub(preference: &str) -> String {
    json!([{
        "day": 1,
        "title": format!("Day 1 - {} Experience", title_case(preference)),
        "activities": [
            "9:00 AM - Arrive in Gangtok",
            "10:00 AM - Visit MG Marg and local markets",
            "2:00 PM - Explore Rumtek Monastery",
            "6:00 PM - Dinner at local restaurant"
        ],
        "location": "Gangtok",
        "description": format!("Start your {} journey in Sikkim's capital", preference),
        "accommodation": "Hotel in Gangtok"
    }])
    .to_string()
}

impl TravelAgent {
    /// Requires an LLM client; without one the agent cannot run at all.
    pub fn new(
        llm: Option<Arc<dyn LlmClient>>,
        search: Option<Arc<dyn SearchClient>>,
        region: RegionConfig,
        max_turns: usize,
    ) -> Result<Self, ItineraryError> {
        let llm = llm.ok_or_else(|| ItineraryError::config("GROQ API key not configured"))?;
        Ok(Self {
            llm,
            search,
            region,
            max_turns: max_turns.max(1),
        })
    }

    pub async fn search_attractions(&self, query: &str) -> String {
        let Some(search) = &self.search else {
            return "Tavily API key not configured. Using fallback information.".to_string();
        };

        match search.search(query).await {
            Ok(hits) => {
                let formatted: Vec<String> = hits
                    .iter()
                    .filter(|hit| !hit.title.is_empty() && !hit.content.is_empty())
                    .map(|hit| format!("{}: {}...", hit.title, truncate_chars(&hit.content, SNIPPET_CHARS)))
                    .collect();
                if formatted.is_empty() {
                    "No search results found.".to_string()
                } else {
                    formatted.join("\n")
                }
            }
            Err(e) => {
                log::error!("Search error: {}", e);
                format!("Search failed: {}", e)
            }
        }
    }

    pub async fn generate_detailed_itinerary(&self, preference: &str, days: u32, search_data: &str) -> String {
        let prompt = detailed_itinerary_prompt(&self.region, preference, days, search_data);
        match self
            .llm
            .complete(CompletionRequest::prompt(prompt, AGENT_TEMPERATURE))
            .await
        {
            Ok(response) => {
                let content = response.content.unwrap_or_default().trim().to_string();
                if serde_json::from_str::<Value>(&content).is_ok() {
                    content
                } else {
                    log::warn!("Invalid JSON generated, using fallback");
                    single_day_stub(preference)
                }
            }
            Err(e) => {
                log::error!("Itinerary generation error: {}", e);
                json!({ "error": format!("Itinerary generation failed: {}", e) }).to_string()
            }
        }
    }

    async fn execute_tool(&self, call: &ToolCall, preference: &str, days: u32) -> String {
        match call.name.as_str() {
            SEARCH_TOOL => {
                let query = string_arg(&call.arguments, "query").unwrap_or(preference);
                self.search_attractions(query).await
            }
            GENERATE_TOOL => {
                let tool_preference = string_arg(&call.arguments, "preference").unwrap_or(preference);
                let tool_days = days_arg(&call.arguments).unwrap_or(days);
                let search_data = string_arg(&call.arguments, "search_data").unwrap_or_default();
                self.generate_detailed_itinerary(tool_preference, tool_days, search_data)
                    .await
            }
            other => format!("Unknown tool: {}", other),
        }
    }

    /// Drive the tool loop until the model produces its final text.
    async fn run_tool_loop(&self, run_id: Uuid, preference: &str, days: u32) -> Result<String, ItineraryError> {
        let mut messages = vec![
            ChatMessage::system(agent_system_prompt(&self.region)),
            ChatMessage::user(agent_task_prompt(&self.region, preference, days)),
        ];
        let tools = tool_definitions();
        let mut turns = 0;
        let mut state = AgentState::AwaitingToolCall;

        loop {
            state = match state {
                AgentState::AwaitingToolCall if turns >= self.max_turns => {
                    log::info!("[{}] Tool budget of {} turns spent; requesting final answer", run_id, self.max_turns);
                    messages.push(ChatMessage::user(FINAL_ANSWER_PROMPT));
                    let response = self
                        .llm
                        .complete(CompletionRequest {
                            messages: messages.clone(),
                            tools: Vec::new(),
                            temperature: AGENT_TEMPERATURE,
                        })
                        .await?;
                    AgentState::ProducingFinalAnswer(response.content.unwrap_or_default())
                }
                AgentState::AwaitingToolCall => {
                    turns += 1;
                    let response = self
                        .llm
                        .complete(CompletionRequest {
                            messages: messages.clone(),
                            tools: tools.clone(),
                            temperature: AGENT_TEMPERATURE,
                        })
                        .await?;

                    if response.tool_calls.is_empty() {
                        AgentState::ProducingFinalAnswer(response.content.unwrap_or_default())
                    } else {
                        messages.push(ChatMessage::assistant_tool_calls(
                            response.content,
                            response.tool_calls.clone(),
                        ));
                        AgentState::ToolExecuting(response.tool_calls)
                    }
                }
                AgentState::ToolExecuting(calls) => {
                    for call in &calls {
                        log::info!("[{}] Turn {}: calling tool {}", run_id, turns, call.name);
                        let result = self.execute_tool(call, preference, days).await;
                        messages.push(ChatMessage::tool_result(call.id.clone(), result));
                    }
                    AgentState::AwaitingToolCall
                }
                AgentState::ProducingFinalAnswer(text) => return Ok(text),
            };
        }
    }

    /// Produce an itinerary, falling back to the offline table on any agent
    /// error or unusable final answer.
    pub async fn generate_itinerary(&self, preference: &str, days: u32) -> AgentOutcome {
        let run_id = Uuid::new_v4();
        log::info!("[{}] Agent run started: {} days, preference '{}'", run_id, days, preference);

        let final_text = match self.run_tool_loop(run_id, preference, days).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("[{}] Agent execution error: {}", run_id, e);
                return AgentOutcome {
                    itinerary: generate_fallback(preference, days),
                    degraded: true,
                    note: Some(FALLBACK_NOTE_AGENT_ERROR.to_string()),
                };
            }
        };

        match extract_itinerary_json(&final_text) {
            Ok(itinerary) => AgentOutcome {
                itinerary: normalize_itinerary(itinerary, preference, days),
                degraded: false,
                note: None,
            },
            Err(e) => {
                log::error!("[{}] JSON parsing error: {} | Raw: {}", run_id, e, final_text);
                AgentOutcome {
                    itinerary: generate_fallback(preference, days),
                    degraded: true,
                    note: Some(FALLBACK_NOTE_INVALID_JSON.to_string()),
                }
            }
        }
    }
}
