use crate::error::ItineraryError;
use std::env;
use url::Url;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_GROQ_MODEL: &str = "llama3-70b-8192";
const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai";
const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";
const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 20;
const DEFAULT_GEOCODE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_AGENT_MAX_TURNS: usize = 4;
pub const DEFAULT_ACCOMMODATION_LIMIT: usize = 8;

/// Region the itineraries are planned for. Used in prompts, search queries
/// and geocoding lookups.
#[derive(Debug, Clone)]
pub struct RegionConfig {
    pub name: String,
    pub country: String,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: "Sikkim".to_string(),
            country: "India".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_base_url: String,
    pub tavily_api_key: Option<String>,
    pub tavily_base_url: String,
    pub nominatim_base_url: String,
    pub llm_timeout_secs: u64,
    pub search_timeout_secs: u64,
    pub geocode_timeout_secs: u64,
    pub agent_max_turns: usize,
    pub accommodation_limit: usize,
    pub region: RegionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            debug: false,
            groq_api_key: None,
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            groq_base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            tavily_api_key: None,
            tavily_base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            nominatim_base_url: DEFAULT_NOMINATIM_BASE_URL.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            search_timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
            geocode_timeout_secs: DEFAULT_GEOCODE_TIMEOUT_SECS,
            agent_max_turns: DEFAULT_AGENT_MAX_TURNS,
            accommodation_limit: DEFAULT_ACCOMMODATION_LIMIT,
            region: RegionConfig::default(),
        }
    }
}

/// Reads a variable, treating blank values as unset.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: non_empty_var("HOST").unwrap_or(defaults.host),
            port: parsed_var("PORT", defaults.port),
            debug: env::var("DEBUG")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            groq_api_key: non_empty_var("GROQ_API_KEY"),
            groq_model: non_empty_var("GROQ_MODEL").unwrap_or(defaults.groq_model),
            groq_base_url: non_empty_var("GROQ_BASE_URL").unwrap_or(defaults.groq_base_url),
            tavily_api_key: non_empty_var("TAVILY_API_KEY"),
            tavily_base_url: non_empty_var("TAVILY_BASE_URL").unwrap_or(defaults.tavily_base_url),
            nominatim_base_url: non_empty_var("NOMINATIM_BASE_URL")
                .unwrap_or(defaults.nominatim_base_url),
            llm_timeout_secs: parsed_var("LLM_TIMEOUT_SECS", defaults.llm_timeout_secs),
            search_timeout_secs: parsed_var("SEARCH_TIMEOUT_SECS", defaults.search_timeout_secs),
            geocode_timeout_secs: parsed_var("GEOCODE_TIMEOUT_SECS", defaults.geocode_timeout_secs),
            agent_max_turns: parsed_var("AGENT_MAX_TURNS", defaults.agent_max_turns).max(1),
            accommodation_limit: parsed_var("ACCOMMODATION_LIMIT", defaults.accommodation_limit)
                .max(1),
            region: defaults.region,
        }
    }

    pub fn has_llm_key(&self) -> bool {
        self.groq_api_key.is_some()
    }

    pub fn has_search_key(&self) -> bool {
        self.tavily_api_key.is_some()
    }

    /// Both the LLM and the search provider are configured.
    pub fn api_keys_configured(&self) -> bool {
        self.has_llm_key() && self.has_search_key()
    }

    /// Names of the required API keys that are not set.
    pub fn missing_api_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.has_search_key() {
            missing.push("TAVILY_API_KEY");
        }
        if !self.has_llm_key() {
            missing.push("GROQ_API_KEY");
        }
        missing
    }

    /// Returns `false` and logs a warning when keys are missing. Missing keys
    /// degrade the service, they never stop it from starting.
    pub fn validate_api_keys(&self) -> bool {
        let missing = self.missing_api_keys();
        if missing.is_empty() {
            return true;
        }
        log::warn!("Missing API keys: {}", missing.join(", "));
        false
    }

    /// Check the base URLs. A malformed URL is a startup error.
    pub fn validate(&self) -> Result<(), ItineraryError> {
        for (name, value) in [
            ("GROQ_BASE_URL", &self.groq_base_url),
            ("TAVILY_BASE_URL", &self.tavily_base_url),
            ("NOMINATIM_BASE_URL", &self.nominatim_base_url),
        ] {
            let parsed = Url::parse(value).map_err(|e| {
                ItineraryError::config(format!("{} is not a valid URL: {}", name, e))
            })?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(ItineraryError::config(format!(
                    "{} must use http or https",
                    name
                )));
            }
        }
        Ok(())
    }
}
