//! Accommodation lookup for the locations of an itinerary.
//!
//! Search hits are turned into candidate names, deduplicated, capped and then
//! geocoded one at a time across all locations. Nothing in here fails the
//! request: a missing or broken search provider yields an empty list, a
//! failed geocode yields null coordinates.

use crate::config::RegionConfig;
use crate::models::itinerary::{AccommodationCandidate, DayPlan};
use crate::services::geocoding_service::Geocoder;
use crate::services::search_service::{SearchClient, SearchHit};
use futures::future::join_all;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

const MIN_NAME_LEN: usize = 3;

/// Cut a search title down to a property name: everything before the first
/// `|`, then before the first `-`, trimmed. Names under 3 characters are
/// rejected.
pub fn normalize_candidate_name(title: &str) -> Option<String> {
    let name = title
        .split('|')
        .next()
        .unwrap_or_default()
        .split('-')
        .next()
        .unwrap_or_default()
        .trim();

    if name.chars().count() < MIN_NAME_LEN {
        return None;
    }
    Some(name.to_string())
}

/// Normalize hits into candidates, drop case-insensitive duplicates keeping
/// the first occurrence, and cap the list at `limit`.
pub fn dedupe_candidates(hits: &[SearchHit], limit: usize) -> Vec<AccommodationCandidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for hit in hits.iter().take(limit * 2) {
        let Some(name) = normalize_candidate_name(&hit.title) else {
            continue;
        };
        if !seen.insert(name.to_lowercase()) {
            continue;
        }
        candidates.push(AccommodationCandidate::new(name, hit.url.trim()));
        if candidates.len() >= limit {
            break;
        }
    }

    candidates
}

pub struct AccommodationService {
    search: Option<Arc<dyn SearchClient>>,
    geocoder: Option<Arc<dyn Geocoder>>,
    region: RegionConfig,
    limit: usize,
}

impl AccommodationService {
    pub fn new(
        search: Option<Arc<dyn SearchClient>>,
        geocoder: Option<Arc<dyn Geocoder>>,
        region: RegionConfig,
        limit: usize,
    ) -> Self {
        Self {
            search,
            geocoder,
            region,
            limit: limit.max(1),
        }
    }

    /// Key a day plan is grouped under. Plans without a location fall back
    /// to the region name.
    pub fn location_key(&self, day: &DayPlan) -> String {
        let location = day.location.trim();
        if location.is_empty() {
            self.region.name.clone()
        } else {
            location.to_string()
        }
    }

    pub fn search_query(&self, location: &str) -> String {
        format!(
            "best hotels and homestays near {} {} {}",
            location, self.region.name, self.region.country
        )
    }

    pub fn geocode_query(&self, name: &str, location: &str) -> String {
        format!(
            "{}, {}, {}, {}",
            name, location, self.region.name, self.region.country
        )
    }

    /// Deduplicated candidates near one location, without coordinates.
    async fn search_candidates(&self, location: &str) -> Vec<AccommodationCandidate> {
        let Some(search) = &self.search else {
            log::debug!("Search client not configured; no accommodations for {}", location);
            return Vec::new();
        };

        match search.search(&self.search_query(location)).await {
            Ok(hits) => dedupe_candidates(&hits, self.limit),
            Err(e) => {
                log::error!("Accommodation search failed for {}: {}", location, e);
                Vec::new()
            }
        }
    }

    /// Candidates near one location, geocoded where possible.
    pub async fn search_accommodations_near(&self, location: &str) -> Vec<AccommodationCandidate> {
        let mut candidates = self.search_candidates(location).await;
        self.geocode_candidates(location, &mut candidates).await;
        log::info!(
            "Found {} accommodation candidates near {}",
            candidates.len(),
            location
        );
        candidates
    }

    async fn geocode_candidates(&self, location: &str, candidates: &mut [AccommodationCandidate]) {
        let Some(geocoder) = &self.geocoder else {
            return;
        };

        for candidate in candidates.iter_mut() {
            let query = self.geocode_query(&candidate.name, location);
            match geocoder.geocode(&query).await {
                Ok(point) => {
                    candidate.lat = Some(point.lat);
                    candidate.lon = Some(point.lon);
                }
                Err(e) => {
                    log::debug!("Geocoding failed for '{}': {}", query, e);
                    candidate.lat = None;
                    candidate.lon = None;
                }
            }
        }
    }

    /// Look up every distinct location of the itinerary. Searches run
    /// concurrently; geocoding runs one request at a time for the whole
    /// itinerary. Results are keyed by location name.
    pub async fn fetch_for_itinerary(
        &self,
        itinerary: &[DayPlan],
    ) -> BTreeMap<String, Vec<AccommodationCandidate>> {
        let mut locations: Vec<String> = Vec::new();
        for day in itinerary {
            let key = self.location_key(day);
            if !locations.contains(&key) {
                locations.push(key);
            }
        }

        let searches = locations
            .iter()
            .map(|location| self.search_candidates(location));
        let results = join_all(searches).await;

        let mut accommodations = BTreeMap::new();
        for (location, mut candidates) in locations.into_iter().zip(results) {
            self.geocode_candidates(&location, &mut candidates).await;
            log::info!(
                "Found {} accommodation candidates near {}",
                candidates.len(),
                location
            );
            accommodations.insert(location, candidates);
        }
        accommodations
    }

    /// Attach each day's accommodation list, empty when none was found.
    pub fn combine(
        &self,
        itinerary: &[DayPlan],
        accommodations: &BTreeMap<String, Vec<AccommodationCandidate>>,
    ) -> Vec<DayPlan> {
        itinerary
            .iter()
            .map(|day| {
                let found = accommodations
                    .get(&self.location_key(day))
                    .cloned()
                    .unwrap_or_default();
                day.with_accommodations(found)
            })
            .collect()
    }
}
