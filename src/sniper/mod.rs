//! Sniper path - listing filter and forwarding to the execution service.

pub mod filter;
pub mod forwarder;

pub use filter::{evaluate, FilterDecision, RejectReason};
pub use forwarder::{dispatch, HttpForwarder, ListingSink};
