pub mod accommodation_service;
pub mod agent_service;
pub mod fallback_service;
pub mod geocoding_service;
pub mod json_repair_service;
pub mod llm_service;
pub mod pipeline_service;
pub mod prompt_service;
pub mod search_service;
