//! The ingestion and decision pipeline.
//!
//! Frames are handled strictly one at a time on the task that reads the
//! session: decode, then either filter and forward a listing or fold a trade
//! into the leaderboard. Only forwarding calls run concurrently, as spawned
//! tasks whose ordering is not tracked.

use crate::config::PipelineConfig;
use crate::error::{ForwardError, TransportError};
use crate::feed::{decode, FeedSession};
use crate::leaderboard::{display, Leaderboard};
use crate::sniper::{dispatch, evaluate, FilterDecision, HttpForwarder, ListingSink};
use crate::types::{FeedEvent, NewListingEvent, TradeEvent};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Per-session counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames_received: u64,
    pub heartbeats_answered: u64,
    pub decode_errors: u64,
    pub listings_seen: u64,
    pub listings_accepted: u64,
    pub listings_rejected: u64,
    pub listings_late: u64,
    pub forwards_dispatched: u64,
    pub trades_seen: u64,
    pub trades_ignored: u64,
}

/// What happened to a single frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Heartbeat, unrecognized envelope, or an event kind this pipeline skips
    Ignored,
    /// Matched an event prefix but failed validation
    DecodeFailed,
    /// A listing went through the filter (`None` when filtering is off)
    Listing(Option<FilterDecision>),
    /// A trade was seen; `counted` is false when it lacked a market cap or
    /// the leaderboard is off
    Trade { counted: bool },
}

/// Drives frames from a session through the decision logic.
pub struct Pipeline {
    config: PipelineConfig,
    leaderboard: Leaderboard,
    sink: Option<Arc<dyn ListingSink>>,
    stats: PipelineStats,
    last_render: Option<Instant>,
}

impl Pipeline {
    /// Create a pipeline forwarding to an explicit sink.
    pub fn new(config: PipelineConfig, sink: Option<Arc<dyn ListingSink>>) -> Self {
        let leaderboard = Leaderboard::with_capacity(config.leaderboard_capacity);
        Self {
            config,
            leaderboard,
            sink,
            stats: PipelineStats::default(),
            last_render: None,
        }
    }

    /// Create a pipeline forwarding over HTTP to `config.sniper_url`, if set.
    pub fn from_config(config: PipelineConfig) -> Result<Self, ForwardError> {
        let sink: Option<Arc<dyn ListingSink>> = match &config.sniper_url {
            Some(url) => Some(Arc::new(HttpForwarder::new(
                url.clone(),
                Duration::from_secs(config.request_timeout_secs),
            )?)),
            None => None,
        };
        Ok(Self::new(config, sink))
    }

    /// Pump frames until the session closes or fails.
    pub async fn run(&mut self, mut session: FeedSession) -> Result<(), TransportError> {
        info!("Listening on {}", session.url());
        let result = loop {
            match session.next_frame().await {
                Ok(Some(frame)) => {
                    self.handle_frame(&frame);
                    if self.config.display_leaderboard {
                        self.render_if_due();
                    }
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        self.stats.heartbeats_answered = session.heartbeats_answered();
        info!("Session ended: {:?}", self.stats);
        result
    }

    /// Handle one raw frame using the current wall clock.
    pub fn handle_frame(&mut self, frame: &str) -> FrameOutcome {
        self.handle_frame_at(frame, Utc::now())
    }

    /// Handle one raw frame as if observed at `now`.
    pub fn handle_frame_at(&mut self, frame: &str, now: DateTime<Utc>) -> FrameOutcome {
        self.stats.frames_received += 1;

        let event = match decode(frame) {
            Ok(Some(event)) => event,
            Ok(None) => return FrameOutcome::Ignored,
            Err(e) => {
                self.stats.decode_errors += 1;
                warn!("Skipping frame: {}", e);
                return FrameOutcome::DecodeFailed;
            }
        };

        match event {
            FeedEvent::NewListing(coin) if self.config.handle_listings => {
                FrameOutcome::Listing(self.handle_listing(&coin, now))
            }
            FeedEvent::Trade(trade) if self.config.handle_trades => FrameOutcome::Trade {
                counted: self.handle_trade(&trade),
            },
            _ => FrameOutcome::Ignored,
        }
    }

    fn handle_listing(&mut self, coin: &NewListingEvent, now: DateTime<Utc>) -> Option<FilterDecision> {
        self.stats.listings_seen += 1;
        let created_at = Utc
            .timestamp_millis_opt(coin.created_timestamp)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        debug!(
            "mint={} x={:?} website={:?} telegram={:?} at={} current={}",
            coin.mint,
            coin.twitter,
            coin.website,
            coin.telegram,
            created_at,
            now.format("%Y-%m-%d %H:%M:%S")
        );

        if !self.config.filter_listings {
            info!("New listing {} ({})", coin.mint, coin.symbol.as_deref().unwrap_or("?"));
            return None;
        }

        let decision = evaluate(coin, now);
        if decision.is_late() {
            self.stats.listings_late += 1;
        }

        match &decision {
            FilterDecision::Accept { request, .. } => {
                self.stats.listings_accepted += 1;
                info!("Token {} has telegram, twitter and website", coin.mint);
                match &self.sink {
                    Some(sink) => {
                        dispatch(Arc::clone(sink), request.clone());
                        self.stats.forwards_dispatched += 1;
                    }
                    None => debug!("No sniper configured, not forwarding {}", coin.mint),
                }
            }
            FilterDecision::Reject { reason, .. } => {
                self.stats.listings_rejected += 1;
                debug!("{}, skipping {}", reason, coin.mint);
            }
        }
        Some(decision)
    }

    fn handle_trade(&mut self, trade: &TradeEvent) -> bool {
        self.stats.trades_seen += 1;

        if !self.config.display_leaderboard {
            info!(
                "trade signature={} sol_amount={} token_amount={} is_buy={} timestamp={} name={} symbol={} usd_market_cap={:?}",
                trade.signature,
                trade.sol_amount,
                trade.token_amount,
                trade.is_buy,
                trade.timestamp,
                trade.name,
                trade.symbol,
                trade.usd_market_cap
            );
            return false;
        }

        let counted = self.leaderboard.update(trade);
        if !counted {
            self.stats.trades_ignored += 1;
        }
        counted
    }

    fn render_if_due(&mut self) {
        let interval = Duration::from_millis(self.config.render_interval_ms);
        if self.last_render.is_some_and(|at| at.elapsed() < interval) {
            return;
        }
        self.last_render = Some(Instant::now());

        let snapshot = self.leaderboard.snapshot(self.config.leaderboard_size);
        if let Err(e) = display::redraw(&snapshot) {
            warn!("Failed to draw leaderboard: {}", e);
        }
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
