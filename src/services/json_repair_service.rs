//! Recovers an itinerary from free-form model output.
//!
//! Models wrap JSON in prose, emit single-quoted strings and leave trailing
//! commas behind. Extraction takes the widest `[...]` span, tries it as-is,
//! then with progressively more aggressive repairs, and finally checks the
//! day-plan shape before accepting anything.

use crate::error::ItineraryError;
use crate::models::itinerary::{AccommodationCandidate, DayPlan, Itinerary};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

const REQUIRED_FIELDS: [&str; 4] = ["day", "title", "activities", "location"];

fn array_span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("array span pattern is valid"))
}

fn trailing_comma_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern is valid"))
}

/// Widest span from the first `[` to the last `]`, or the trimmed text.
pub fn find_array_candidate(raw_text: &str) -> &str {
    match array_span_regex().find(raw_text) {
        Some(m) => m.as_str(),
        None => raw_text.trim(),
    }
}

pub fn strip_trailing_commas(candidate: &str) -> String {
    trailing_comma_regex().replace_all(candidate, "$1").into_owned()
}

pub fn normalize_quotes(candidate: &str) -> String {
    candidate.replace('\'', "\"")
}

/// Parse the candidate, applying repairs only when the previous attempt
/// failed. Valid JSON containing apostrophes survives untouched.
fn parse_with_repairs(candidate: &str) -> Result<Value, serde_json::Error> {
    if let Ok(value) = serde_json::from_str(candidate) {
        return Ok(value);
    }
    let without_commas = strip_trailing_commas(candidate);
    if let Ok(value) = serde_json::from_str(&without_commas) {
        return Ok(value);
    }
    serde_json::from_str(&strip_trailing_commas(&normalize_quotes(candidate)))
}

/// Extract and validate an itinerary from raw model text.
pub fn extract_itinerary_json(raw_text: &str) -> Result<Itinerary, ItineraryError> {
    let candidate = find_array_candidate(raw_text);
    let value = parse_with_repairs(candidate)
        .map_err(|e| ItineraryError::malformed(e.to_string(), raw_text))?;

    let items = value
        .as_array()
        .ok_or_else(|| ItineraryError::malformed("expected a JSON array of day plans", raw_text))?;

    if items.is_empty() {
        return Err(ItineraryError::malformed("itinerary array is empty", raw_text));
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            day_plan_from_value(item)
                .map_err(|reason| ItineraryError::malformed(format!("item {}: {}", index, reason), raw_text))
        })
        .collect()
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_day_number(value: &Value) -> Option<u32> {
    let day = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(day).ok().filter(|d| *d >= 1)
}

fn parse_accommodations(value: &Value) -> Option<Vec<AccommodationCandidate>> {
    let entries = value.as_array()?;
    Some(
        entries
            .iter()
            .filter_map(|entry| {
                let obj = entry.as_object()?;
                let name = obj.get("name").map(value_to_text)?;
                Some(AccommodationCandidate {
                    name,
                    url: obj.get("url").map(value_to_text).unwrap_or_default(),
                    lat: obj.get("lat").and_then(Value::as_f64),
                    lon: obj.get("lon").and_then(Value::as_f64),
                })
            })
            .collect(),
    )
}

fn day_plan_from_object(obj: &Map<String, Value>) -> Result<DayPlan, String> {
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !obj.contains_key(**f)) {
        return Err(format!("missing field '{}'", missing));
    }

    let day = parse_day_number(&obj["day"]).ok_or("'day' must be a positive integer")?;

    let activities = obj["activities"]
        .as_array()
        .ok_or("'activities' must be an array")?;
    if activities.is_empty() {
        return Err("'activities' must not be empty".to_string());
    }

    Ok(DayPlan {
        day,
        title: value_to_text(&obj["title"]),
        activities: activities.iter().map(value_to_text).collect(),
        location: value_to_text(&obj["location"]),
        description: obj.get("description").map(value_to_text).unwrap_or_default(),
        accommodation: obj
            .get("accommodation")
            .and_then(Value::as_str)
            .map(str::to_string),
        accommodations: obj.get("accommodations").and_then(parse_accommodations),
    })
}

fn day_plan_from_value(value: &Value) -> Result<DayPlan, String> {
    let obj = value.as_object().ok_or("expected an object")?;
    day_plan_from_object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fallback_service::generate_fallback;

    #[test]
    fn test_well_formed_array_round_trips() {
        let itinerary = generate_fallback("nature", 3);
        let text = serde_json::to_string_pretty(&itinerary).unwrap();
        assert_eq!(extract_itinerary_json(&text).unwrap(), itinerary);
    }

    #[test]
    fn test_array_wrapped_in_prose() {
        let itinerary = generate_fallback("culture", 2);
        let text = format!(
            "Here is your itinerary for Sikkim:\n```json\n{}\n```\nEnjoy the trip!",
            serde_json::to_string(&itinerary).unwrap()
        );
        assert_eq!(extract_itinerary_json(&text).unwrap(), itinerary);
    }

    #[test]
    fn test_single_quotes_and_trailing_commas() {
        let text = "[{'day': 1, 'title': 'Day 1 - Gangtok', 'activities': ['MG Marg', 'Rumtek',], \
                    'location': 'Gangtok', 'description': 'Capital city',},]";
        let itinerary = extract_itinerary_json(text).unwrap();
        assert_eq!(itinerary.len(), 1);
        assert_eq!(itinerary[0].activities, vec!["MG Marg", "Rumtek"]);
        assert_eq!(itinerary[0].location, "Gangtok");
    }

    #[test]
    fn test_apostrophes_in_valid_json_are_kept() {
        let text = r#"[{"day": 1, "title": "Sikkim's capital", "activities": ["Tsomgo Lake",], "location": "Gangtok"}]"#;
        let itinerary = extract_itinerary_json(text).unwrap();
        assert_eq!(itinerary[0].title, "Sikkim's capital");
        assert_eq!(itinerary[0].description, "");
    }

    #[test]
    fn test_non_json_text_is_malformed() {
        let result = extract_itinerary_json("Sorry, I cannot help with that request.");
        match result {
            Err(ItineraryError::MalformedOutput { raw, .. }) => {
                assert!(raw.contains("cannot help"));
            }
            other => panic!("expected MalformedOutput, got {:?}", other),
        }
    }

    #[test]
    fn test_shape_validation() {
        let missing_location = r#"[{"day": 1, "title": "t", "activities": ["a"]}]"#;
        assert!(matches!(
            extract_itinerary_json(missing_location),
            Err(ItineraryError::MalformedOutput { .. })
        ));

        let empty_activities = r#"[{"day": 1, "title": "t", "activities": [], "location": "Gangtok"}]"#;
        assert!(extract_itinerary_json(empty_activities).is_err());

        let activities_not_list = r#"[{"day": 1, "title": "t", "activities": "hike", "location": "Gangtok"}]"#;
        assert!(extract_itinerary_json(activities_not_list).is_err());

        let object_not_array = r#"{"day": 1, "title": "t", "activities": ["a"], "location": "x"}"#;
        assert!(extract_itinerary_json(object_not_array).is_err());

        assert!(extract_itinerary_json("[]").is_err());
    }

    #[test]
    fn test_lenient_field_types() {
        let text = r#"[{"day": "2", "title": "Pelling", "activities": ["Skywalk", 3], "location": "Pelling",
            "accommodations": [{"name": "Hotel Norbu Ghang", "url": "https://norbughang.example"}, {"url": "no name"}]}]"#;
        let itinerary = extract_itinerary_json(text).unwrap();
        assert_eq!(itinerary[0].day, 2);
        assert_eq!(itinerary[0].activities, vec!["Skywalk", "3"]);
        let accommodations = itinerary[0].accommodations.as_ref().unwrap();
        assert_eq!(accommodations.len(), 1);
        assert_eq!(accommodations[0].lat, None);
    }

    #[test]
    fn test_find_array_candidate_is_greedy() {
        assert_eq!(find_array_candidate("a [1] b [2] c"), "[1] b [2]");
        assert_eq!(find_array_candidate("  no brackets  "), "no brackets");
        assert_eq!(strip_trailing_commas("[1, 2, ]"), "[1, 2]");
    }
}
