//! Per-mint running statistics built from the trade stream.
//!
//! The aggregator owns its entries; callers only ever receive copies.
//! With a capacity set, inserting a new mint into a full board evicts the
//! entry that was updated least recently.

use crate::types::{LeaderboardEntry, Pubkey, TradeEvent};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Default number of mints tracked before eviction kicks in.
pub const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Debug, Clone)]
struct Slot {
    entry: LeaderboardEntry,
    /// Update sequence number, used for least-recently-updated eviction
    touched: u64,
}

/// Ranked net-buy leaderboard.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: HashMap<Pubkey, Slot>,
    /// Update sequence -> mint, oldest first
    recency: BTreeMap<u64, Pubkey>,
    capacity: Option<usize>,
    sequence: u64,
    evictions: u64,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::with_capacity(Some(DEFAULT_CAPACITY))
    }
}

impl Leaderboard {
    /// Create a leaderboard; `None` keeps every mint for the life of the process.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            capacity: capacity.map(|c| c.max(1)),
            sequence: 0,
            evictions: 0,
        }
    }

    /// Fold one trade into the board.
    ///
    /// Trades without a market cap are ignored entirely. Returns whether the
    /// trade was counted.
    pub fn update(&mut self, trade: &TradeEvent) -> bool {
        let Some(market_cap) = trade.usd_market_cap else {
            return false;
        };

        if !self.entries.contains_key(&trade.mint) {
            self.make_room();
        }

        self.sequence += 1;
        let touched = self.sequence;
        let slot = self.entries.entry(trade.mint.clone()).or_insert_with(|| Slot {
            entry: LeaderboardEntry {
                mint: trade.mint.clone(),
                symbol: trade.symbol.clone(),
                name: trade.name.clone(),
                market_cap,
                net_buy_volume: 0.0,
                last_updated: trade.timestamp,
            },
            touched,
        });

        let entry = &mut slot.entry;
        entry.symbol.clone_from(&trade.symbol);
        entry.name.clone_from(&trade.name);
        entry.market_cap = market_cap;
        entry.last_updated = trade.timestamp;
        entry.net_buy_volume += trade.signed_sol();

        if slot.touched != touched {
            self.recency.remove(&slot.touched);
            slot.touched = touched;
        }
        self.recency.insert(touched, trade.mint.clone());
        true
    }

    /// Top `n` entries by descending net buy volume.
    pub fn snapshot(&self, n: usize) -> Vec<LeaderboardEntry> {
        let mut ranked: Vec<&Slot> = self.entries.values().collect();
        // Ties fall back to update order so the ranking does not flicker
        ranked.sort_by(|a, b| {
            b.entry
                .net_buy_volume
                .total_cmp(&a.entry.net_buy_volume)
                .then_with(|| a.touched.cmp(&b.touched))
        });
        ranked
            .into_iter()
            .take(n)
            .map(|slot| slot.entry.clone())
            .collect()
    }

    /// Copy of the entry for `mint`, if tracked.
    pub fn get(&self, mint: &str) -> Option<LeaderboardEntry> {
        self.entries.get(mint).map(|slot| slot.entry.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Entries dropped to respect the capacity so far.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    fn make_room(&mut self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        while self.entries.len() >= capacity {
            let Some((_, mint)) = self.recency.pop_first() else {
                break;
            };
            self.entries.remove(&mint);
            self.evictions += 1;
            debug!("Evicted {} from leaderboard", mint);
        }
    }
}
