//! Offline itinerary builder.
//!
//! Used whenever live generation cannot produce a usable itinerary. The output
//! depends only on the preference and the day count.

use crate::models::itinerary::{DayPlan, Itinerary};

const ACTIVITIES_PER_DAY: usize = 4;
const TIME_SLOTS: [&str; ACTIVITIES_PER_DAY] = ["9:00 AM", "11:00 AM", "2:00 PM", "4:00 PM"];
const EVENING_ACTIVITIES: [&str; 2] = [
    "6:00 PM - Dinner at local restaurant",
    "8:00 PM - Rest and prepare for next day",
];
const LOCATIONS: [&str; 5] = ["Gangtok", "Pelling", "Lachung", "Namchi", "Ravangla"];

pub const KNOWN_PREFERENCES: [&str; 4] = ["culture", "adventure", "nature", "spiritual"];

const CULTURE: [&str; 5] = [
    "Visit Rumtek Monastery - Buddhist architecture and culture",
    "Explore MG Marg - Local markets and street food",
    "Tour Enchey Monastery - Traditional Sikkimese culture",
    "Visit Namgyal Institute of Tibetology - Tibetan artifacts",
    "Experience local tea ceremony",
];

const ADVENTURE: [&str; 5] = [
    "Trek to Dzongri - Mountain hiking",
    "River rafting on Teesta River",
    "Paragliding at Gangtok",
    "Mountain biking in Pelling",
    "Rock climbing at various locations",
];

const NATURE: [&str; 5] = [
    "Visit Tsomgo Lake - High altitude lake",
    "Explore Yumthang Valley - Flower valley",
    "Trek to Kanchenjunga Base Camp",
    "Visit Gurudongmar Lake",
    "Explore Rhododendron Sanctuary",
];

const SPIRITUAL: [&str; 5] = [
    "Meditation at Rumtek Monastery",
    "Visit Pemayangtse Monastery",
    "Attend prayer ceremonies",
    "Visit Tashiding Monastery",
    "Experience spiritual retreat",
];

/// Activity table for a preference. Unknown preferences get the culture table.
pub fn activities_for(preference: &str) -> &'static [&'static str] {
    match preference.trim().to_lowercase().as_str() {
        "culture" => &CULTURE,
        "adventure" => &ADVENTURE,
        "nature" => &NATURE,
        "spiritual" => &SPIRITUAL,
        _ => &CULTURE,
    }
}

/// Uppercase the first letter of every word, lowercase the rest. A word
/// starts after any non-alphabetic character.
pub(crate) fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut word_start = true;
    for c in value.chars() {
        if word_start {
            result.extend(c.to_uppercase());
        } else {
            result.extend(c.to_lowercase());
        }
        word_start = !c.is_alphabetic();
    }
    result
}

/// Build the plan for a single 1-indexed day.
pub fn fallback_day(preference: &str, day: u32) -> DayPlan {
    let activities = activities_for(preference);
    let offset = (day.max(1) - 1) as usize;

    let mut day_activities: Vec<String> = TIME_SLOTS
        .iter()
        .enumerate()
        .map(|(i, slot)| format!("{} - {}", slot, activities[(offset + i) % activities.len()]))
        .collect();
    day_activities.extend(EVENING_ACTIVITIES.iter().map(|a| a.to_string()));

    let location = LOCATIONS[offset % LOCATIONS.len()];

    DayPlan {
        day,
        title: format!(
            "Day {} - {} Experience in {}",
            day,
            title_case(preference),
            location
        ),
        activities: day_activities,
        location: location.to_string(),
        description: format!(
            "Explore {} with focus on {} activities and experiences.",
            location, preference
        ),
        accommodation: Some(format!("Hotel in {}", location)),
        accommodations: None,
    }
}

/// Generate a complete itinerary of exactly `days` days.
pub fn generate_fallback(preference: &str, days: u32) -> Itinerary {
    (1..=days).map(|day| fallback_day(preference, day)).collect()
}

/// Force an itinerary to exactly `days` entries numbered 1..=days.
///
/// Extra days are dropped; missing days are filled from the fallback table.
pub fn normalize_itinerary(mut itinerary: Itinerary, preference: &str, days: u32) -> Itinerary {
    itinerary.truncate(days as usize);
    while itinerary.len() < days as usize {
        let next_day = itinerary.len() as u32 + 1;
        itinerary.push(fallback_day(preference, next_day));
    }
    for (index, day) in itinerary.iter_mut().enumerate() {
        day.day = index as u32 + 1;
    }
    itinerary
}
