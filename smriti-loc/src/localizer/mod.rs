//! Online localization over the query × reference grid.
//!
//! ```text
//! CostOracle ──► SuccessorManager ──► OnlineLocalizer ──► path / observer
//!                      ▲
//!                Relocalizer (when lost)
//! ```

mod config;
mod observer;
mod online;

pub use config::LocalizerConfig;
pub use observer::LocalizationObserver;
pub use online::{OnlineLocalizer, TrackingState};
