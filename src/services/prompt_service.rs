use crate::config::RegionConfig;

const KEY_DESTINATIONS: &str = "Gangtok, Pelling, Lachung, Tsomgo Lake, Rumtek Monastery";

/// Prompt for the staged pipeline's single generation call.
pub fn pipeline_itinerary_prompt(region: &RegionConfig, preference: &str, days: u32) -> String {
    format!(
        "You are an expert {region} travel planner. Create a detailed {days}-day itinerary for preference: {preference}.\n\
         Return ONLY a JSON array with items having fields: day (number), title (string), activities (array of strings), \
         location (string), description (string), accommodation (string).\n\
         Ensure location is a real place name in {region} for each day.\n\
         Include popular destinations such as {destinations}, consider travel time between locations \
         and keep the daily pace realistic.",
        region = region.name,
        days = days,
        preference = preference,
        destinations = KEY_DESTINATIONS,
    )
}

/// Prompt used by the agent's `generate_detailed_itinerary` tool.
pub fn detailed_itinerary_prompt(
    region: &RegionConfig,
    preference: &str,
    days: u32,
    search_data: &str,
) -> String {
    format!(
        r#"You are an expert {region} travel planner. Create a detailed {days}-day itinerary based on the preference: {preference}.

Available information about {region}: {search_data}

Create a JSON itinerary with this exact structure:
[
  {{
    "day": 1,
    "title": "Day 1 - [Theme/Area]",
    "activities": [
      "Activity 1 with timing (e.g., 9:00 AM - Visit Gangtok Mall Road)",
      "Activity 2 with timing",
      "Activity 3 with timing"
    ],
    "location": "Primary location name",
    "description": "Brief description of the day's highlights",
    "accommodation": "Suggested accommodation type"
  }}
]

Guidelines:
- Focus on {preference} activities
- Include popular {region} destinations: {destinations}
- Consider travel time between locations
- Include cultural, adventure, and nature activities
- Provide realistic daily schedules
- Return ONLY valid JSON, no additional text or explanations"#,
        region = region.name,
        days = days,
        preference = preference,
        search_data = search_data,
        destinations = KEY_DESTINATIONS,
    )
}

/// System prompt for the tool-calling agent.
pub fn agent_system_prompt(region: &RegionConfig) -> String {
    format!(
        r#"You are an expert travel agent specializing in {region} tourism. Your goal is to create personalized, detailed travel itineraries based on user preferences.

You may call search_sikkim_attractions to research destinations and generate_detailed_itinerary to draft the plan.
When you are done, answer with ONLY a JSON array shaped like this:
[
    {{
        "day": 1,
        "title": "Day 1 - Arrival in Gangtok",
        "activities": [
            "9:00 AM - Arrive in Gangtok and check into hotel",
            "11:00 AM - Visit MG Marg and explore local markets",
            "2:00 PM - Visit Rumtek Monastery",
            "6:00 PM - Dinner at local restaurant"
        ],
        "location": "Gangtok",
        "description": "Begin your {region} adventure in the capital city.",
        "accommodations": [
            {{ "name": "Mayfair Spa Resort & Casino", "url": "https://www.mayfairhotels.com/mayfair-gangtok/" }},
            {{ "name": "Hotel Sonam Delek", "url": "https://www.sonamdelek.com/" }}
        ]
    }}
]"#,
        region = region.name,
    )
}

/// First user turn of an agent run.
pub fn agent_task_prompt(region: &RegionConfig, preference: &str, days: u32) -> String {
    format!(
        "Create a {days}-day travel itinerary for {region} based on this preference: {preference}\n\n\
         Please:\n\
         1. Search for relevant attractions and information about {region}\n\
         2. Generate a detailed itinerary with daily activities, locations, and descriptions\n\
         3. Return the final itinerary as JSON",
        days = days,
        region = region.name,
        preference = preference,
    )
}

/// Sent when the tool budget is spent and a final answer is required.
pub const FINAL_ANSWER_PROMPT: &str =
    "Tool budget exhausted. Reply now with ONLY the final itinerary as a JSON array.";
