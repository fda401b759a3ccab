//! Pipeline configuration with defaults and a builder.

use crate::feed::PUMP_WEBSOCKET_URL;
use crate::leaderboard::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

/// Everything the pipeline needs to run one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Feed socket URL
    pub feed_url: String,
    /// Base URL of the sniper service; nothing is forwarded without it
    pub sniper_url: Option<String>,
    /// Process `newCoinCreated` frames
    pub handle_listings: bool,
    /// Process `tradeCreated` frames
    pub handle_trades: bool,
    /// Run listings through the filter and forward the accepted ones
    pub filter_listings: bool,
    /// Aggregate trades into the leaderboard and redraw it, instead of logging each trade
    pub display_leaderboard: bool,
    /// Rows shown in the leaderboard view
    pub leaderboard_size: usize,
    /// Mints tracked before eviction; `None` for unbounded
    pub leaderboard_capacity: Option<usize>,
    /// Minimum time between two leaderboard redraws
    pub render_interval_ms: u64,
    /// Timeout for calls to the sniper service
    pub request_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feed_url: PUMP_WEBSOCKET_URL.to_string(),
            sniper_url: None,
            handle_listings: true,
            handle_trades: true,
            filter_listings: true,
            display_leaderboard: false,
            leaderboard_size: 20,
            leaderboard_capacity: Some(DEFAULT_CAPACITY),
            render_interval_ms: 1000,
            request_timeout_secs: 10,
        }
    }
}

/// Builder for convenient construction with sensible defaults.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the feed socket URL.
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.config.feed_url = url.into();
        self
    }

    /// Set the sniper service base URL.
    pub fn with_sniper_url(mut self, url: impl Into<String>) -> Self {
        self.config.sniper_url = Some(url.into());
        self
    }

    /// Only handle new listings (the `listen` mode).
    pub fn listings_only(mut self) -> Self {
        self.config.handle_listings = true;
        self.config.handle_trades = false;
        self
    }

    /// Only handle trades (the `listen-trades` mode).
    pub fn trades_only(mut self) -> Self {
        self.config.handle_listings = false;
        self.config.handle_trades = true;
        self
    }

    pub fn with_filtering(mut self, enabled: bool) -> Self {
        self.config.filter_listings = enabled;
        self
    }

    pub fn with_leaderboard_display(mut self, enabled: bool) -> Self {
        self.config.display_leaderboard = enabled;
        self
    }

    pub fn with_leaderboard_size(mut self, size: usize) -> Self {
        self.config.leaderboard_size = size;
        self
    }

    pub fn with_leaderboard_capacity(mut self, capacity: Option<usize>) -> Self {
        self.config.leaderboard_capacity = capacity;
        self
    }

    pub fn with_render_interval_ms(mut self, interval_ms: u64) -> Self {
        self.config.render_interval_ms = interval_ms;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}
