use crate::error::ItineraryError;
use serde::{Deserialize, Serialize};

pub const MIN_DAYS: i64 = 1;
pub const MAX_DAYS: i64 = 30;
pub const MAX_PREFERENCE_LEN: usize = 500;

/// Body of `POST /generate-itinerary` and `POST /graph/generate`.
///
/// `days` is read as a signed integer so that out-of-range values reach
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryRequest {
    pub preference: String,
    pub days: i64,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub preference: String,
    pub days: u32,
}

impl ItineraryRequest {
    pub fn validate(&self) -> Result<ValidatedRequest, ItineraryError> {
        if self.days < MIN_DAYS || self.days > MAX_DAYS {
            return Err(ItineraryError::validation(format!(
                "Days must be between {} and {}",
                MIN_DAYS, MAX_DAYS
            )));
        }

        let preference = self.preference.trim();
        if preference.is_empty() {
            return Err(ItineraryError::validation("Preference cannot be empty"));
        }
        if preference.chars().count() > MAX_PREFERENCE_LEN {
            return Err(ItineraryError::validation(format!(
                "Preference must be at most {} characters",
                MAX_PREFERENCE_LEN
            )));
        }

        Ok(ValidatedRequest {
            preference: preference.to_string(),
            days: self.days as u32,
        })
    }
}
