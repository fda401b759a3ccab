//! Listing filter - decides which new coins are worth forwarding.
//!
//! Checks run in order: freshness (informational), completeness of the three
//! social links, then diversity of those links. The first failing hard check
//! rejects the listing.

use crate::types::{NewListingEvent, PumpBuyRequest};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, instrument};

/// Why a listing was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// One of website, telegram or twitter is missing
    Incomplete,
    /// All three links carry the same value
    DuplicateLinks,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Incomplete => write!(f, "No telegram or twitter or website"),
            RejectReason::DuplicateLinks => write!(f, "Website, telegram and twitter are the same"),
        }
    }
}

/// Outcome of running a listing through the filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterDecision {
    Accept {
        request: PumpBuyRequest,
        /// Seen in a later second than it was created
        late: bool,
    },
    Reject {
        reason: RejectReason,
        late: bool,
    },
}

impl FilterDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FilterDecision::Accept { .. })
    }

    pub fn is_late(&self) -> bool {
        match self {
            FilterDecision::Accept { late, .. } | FilterDecision::Reject { late, .. } => *late,
        }
    }
}

/// Run the listing through every check, using `now` as the wall clock.
#[instrument(skip(coin, now), fields(mint = %coin.mint))]
pub fn evaluate(coin: &NewListingEvent, now: DateTime<Utc>) -> FilterDecision {
    let late = is_late(coin.created_timestamp, now);
    debug!(
        "got info {} ms after creation",
        now.timestamp_millis().saturating_sub(coin.created_timestamp)
    );
    if late {
        debug!("Too late");
    }

    let (website, telegram, twitter) = match (
        present(&coin.website),
        present(&coin.telegram),
        present(&coin.twitter),
    ) {
        (Some(website), Some(telegram), Some(twitter)) => (website, telegram, twitter),
        _ => {
            return FilterDecision::Reject {
                reason: RejectReason::Incomplete,
                late,
            }
        }
    };

    let distinct: HashSet<&str> = [website, telegram, twitter].into_iter().collect();
    if distinct.len() == 1 {
        return FilterDecision::Reject {
            reason: RejectReason::DuplicateLinks,
            late,
        };
    }

    FilterDecision::Accept {
        request: PumpBuyRequest::from(coin),
        late,
    }
}

/// A link counts only when it carries something besides whitespace.
fn present(link: &Option<String>) -> Option<&str> {
    link.as_deref().filter(|value| !value.trim().is_empty())
}

/// Compare creation and observation time at whole-second granularity.
fn is_late(created_timestamp_ms: i64, now: DateTime<Utc>) -> bool {
    created_timestamp_ms.div_euclid(1000) != now.timestamp_millis().div_euclid(1000)
}
