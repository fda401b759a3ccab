//! Leaderboard of tokens ranked by net buy pressure.

pub mod aggregator;
pub mod display;

pub use aggregator::{Leaderboard, DEFAULT_CAPACITY};
