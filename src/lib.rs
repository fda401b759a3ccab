//! pump-listener - streaming ingestion and decision pipeline for the pump.fun feed
//!
//! Reads token-creation and trade events from the frontend socket, filters new
//! listings and forwards the promising ones to a sniper service, and keeps a
//! leaderboard of tokens ranked by net buy pressure.

pub mod config;
pub mod error;
pub mod feed;
pub mod leaderboard;
pub mod pipeline;
pub mod sniper;
pub mod types;

// Re-export main types for convenience
pub use config::{PipelineBuilder, PipelineConfig};
pub use error::{DecodeError, ForwardError, TransportError};
pub use pipeline::{FrameOutcome, Pipeline, PipelineStats};
pub use types::{FeedEvent, LeaderboardEntry, NewListingEvent, PumpBuyRequest, TradeEvent};
