//! Core types and data structures for the pump feed listener.

use serde::{Deserialize, Serialize};

/// A simple public key representation (base58 string as delivered by the feed)
pub type Pubkey = String;

/// Lamports per SOL.
pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// A newly created token announced by the feed (`newCoinCreated`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListingEvent {
    /// The mint address of the token
    pub mint: Pubkey,
    /// The bonding curve account governing the token's pricing
    pub bonding_curve: Pubkey,
    /// Token account owned by the bonding curve
    pub associated_bonding_curve: Pubkey,
    pub virtual_token_reserves: u64,
    pub virtual_sol_reserves: u64,
    pub real_token_reserves: u64,
    pub real_sol_reserves: u64,
    pub website: Option<String>,
    pub telegram: Option<String>,
    pub twitter: Option<String>,
    /// Creation time in milliseconds since epoch
    pub created_timestamp: i64,
    /// Informational only
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub creator: Option<Pubkey>,
}

/// A single trade on a bonding curve (`tradeCreated`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub mint: Pubkey,
    /// Transaction signature, unique per trade
    pub signature: String,
    /// SOL side of the trade, in lamports
    pub sol_amount: u64,
    pub token_amount: u64,
    pub is_buy: bool,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    pub symbol: String,
    pub name: String,
    pub usd_market_cap: Option<f64>,
}

impl TradeEvent {
    /// Signed SOL amount: positive for buys, negative for sells.
    pub fn signed_sol(&self) -> f64 {
        let sol = self.sol_amount as f64 / LAMPORTS_PER_SOL;
        if self.is_buy {
            sol
        } else {
            -sol
        }
    }
}

/// A decoded, validated feed event.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    NewListing(NewListingEvent),
    Trade(TradeEvent),
}

/// Body of the `POST {base}/pump-buy` request sent to the sniper service.
///
/// Reserves travel as decimal strings so no precision is lost on the other side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpBuyRequest {
    pub mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub associated_bonding_curve: Pubkey,
    pub virtual_token_reserves: String,
    pub virtual_sol_reserves: String,
    pub real_token_reserves: String,
    pub real_sol_reserves: String,
}

impl From<&NewListingEvent> for PumpBuyRequest {
    fn from(coin: &NewListingEvent) -> Self {
        Self {
            mint: coin.mint.clone(),
            bonding_curve: coin.bonding_curve.clone(),
            associated_bonding_curve: coin.associated_bonding_curve.clone(),
            virtual_token_reserves: coin.virtual_token_reserves.to_string(),
            virtual_sol_reserves: coin.virtual_sol_reserves.to_string(),
            real_token_reserves: coin.real_token_reserves.to_string(),
            real_sol_reserves: coin.real_sol_reserves.to_string(),
        }
    }
}

/// Ranked leaderboard row, handed out as a copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub mint: Pubkey,
    pub symbol: String,
    pub name: String,
    /// Latest USD market cap seen
    pub market_cap: f64,
    /// Cumulative signed SOL volume (buys minus sells)
    pub net_buy_volume: f64,
    /// Timestamp of the last counted trade, seconds since epoch
    pub last_updated: i64,
}
