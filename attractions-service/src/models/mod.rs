pub mod attraction;

pub use attraction::{normalize_document, normalize_id, Attraction, ATTRACTION_COLLECTION};
