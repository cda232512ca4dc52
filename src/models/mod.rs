pub mod itinerary;
pub mod itinerary_request;
pub mod itinerary_response;
