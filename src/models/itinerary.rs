use serde::{Deserialize, Serialize};

/// A hotel or homestay found near a day's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationCandidate {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl AccommodationCandidate {
    pub fn new<N: Into<String>, U: Into<String>>(name: N, url: U) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            lat: None,
            lon: None,
        }
    }
}

/// One day of an itinerary.
///
/// Plans produced by the model or the fallback carry a free-text
/// `accommodation`; the combine stage fills `accommodations` with the
/// candidates found for the day's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    pub title: String,
    pub activities: Vec<String>,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodations: Option<Vec<AccommodationCandidate>>,
}

impl DayPlan {
    /// Copy of this plan with the given accommodation list attached.
    pub fn with_accommodations(&self, accommodations: Vec<AccommodationCandidate>) -> Self {
        Self {
            accommodations: Some(accommodations),
            ..self.clone()
        }
    }
}

pub type Itinerary = Vec<DayPlan>;

/// Total number of activities across all days.
pub fn total_activities(itinerary: &[DayPlan]) -> usize {
    itinerary.iter().map(|d| d.activities.len()).sum()
}

/// Distinct non-empty locations in first-visited order.
pub fn distinct_locations(itinerary: &[DayPlan]) -> Vec<String> {
    let mut locations: Vec<String> = Vec::new();
    for day in itinerary {
        let location = day.location.trim();
        if !location.is_empty() && !locations.iter().any(|l| l == location) {
            locations.push(location.to_string());
        }
    }
    locations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(day: u32, location: &str, activities: &[&str]) -> DayPlan {
        DayPlan {
            day,
            title: format!("Day {}", day),
            activities: activities.iter().map(|a| a.to_string()).collect(),
            location: location.to_string(),
            description: String::new(),
            accommodation: None,
            accommodations: None,
        }
    }

    #[test]
    fn test_optional_fields_are_skipped() {
        let value = serde_json::to_value(plan(1, "Gangtok", &["Visit MG Marg"])).unwrap();
        assert!(value.get("accommodation").is_none());
        assert!(value.get("accommodations").is_none());
        assert_eq!(value["description"], "");
    }

    #[test]
    fn test_with_accommodations_keeps_plan() {
        let day = plan(2, "Pelling", &["Skywalk"]);
        let combined = day.with_accommodations(vec![AccommodationCandidate::new(
            "Hotel Norbu Ghang",
            "https://example.com",
        )]);
        assert_eq!(combined.title, day.title);
        assert_eq!(combined.accommodations.as_ref().map(|a| a.len()), Some(1));

        let value = serde_json::to_value(&combined).unwrap();
        assert!(value["accommodations"][0]["lat"].is_null());
    }

    #[test]
    fn test_summaries() {
        let itinerary = vec![
            plan(1, "Gangtok", &["a", "b"]),
            plan(2, "Gangtok", &["c"]),
            plan(3, "Pelling", &["d"]),
        ];
        assert_eq!(total_activities(&itinerary), 4);
        assert_eq!(distinct_locations(&itinerary), vec!["Gangtok", "Pelling"]);
    }
}
