//! Successor generation: fan-out windows, similar places and relocalization.

mod manager;
mod similar_places;

pub use manager::SuccessorManager;
pub use similar_places::SimilarPlaces;
