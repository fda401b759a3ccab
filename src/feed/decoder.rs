//! Frame classification and event decoding.
//!
//! Event frames arrive in a socket.io envelope, `42["<eventName>",<json>]`.
//! Classification is a literal prefix match; the payload is then parsed into
//! the typed event and rejected on any schema mismatch.

use crate::error::DecodeError;
use crate::types::{FeedEvent, NewListingEvent, TradeEvent};
use serde::de::DeserializeOwned;

/// Heartbeat ping sent by the server.
pub const PING_FRAME: &str = "2";
/// Heartbeat pong sent back to the server.
pub const PONG_FRAME: &str = "3";
/// Handshake acknowledgment sent right after the socket opens.
pub const CONNECT_FRAME: &str = "40";

const NEW_COIN_EVENT: &str = "newCoinCreated";
const TRADE_EVENT: &str = "tradeCreated";
const NEW_COIN_PREFIX: &str = r#"42["newCoinCreated""#;
const TRADE_PREFIX: &str = r#"42["tradeCreated""#;

/// What a raw frame looks like before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Heartbeat,
    NewListing,
    Trade,
    Unrecognized,
}

/// Classify a raw frame by its literal prefix.
pub fn classify(frame: &str) -> FrameKind {
    if frame == PING_FRAME {
        FrameKind::Heartbeat
    } else if frame.starts_with(NEW_COIN_PREFIX) {
        FrameKind::NewListing
    } else if frame.starts_with(TRADE_PREFIX) {
        FrameKind::Trade
    } else {
        FrameKind::Unrecognized
    }
}

/// Decode a raw frame into at most one event.
///
/// Heartbeats and unrecognized frames yield `Ok(None)`. A frame that carries a
/// known event prefix but a bad payload yields a `DecodeError`.
pub fn decode(frame: &str) -> Result<Option<FeedEvent>, DecodeError> {
    match classify(frame) {
        FrameKind::NewListing => {
            let coin: NewListingEvent = decode_payload(frame, NEW_COIN_PREFIX, NEW_COIN_EVENT)?;
            Ok(Some(FeedEvent::NewListing(coin)))
        }
        FrameKind::Trade => {
            let trade: TradeEvent = decode_payload(frame, TRADE_PREFIX, TRADE_EVENT)?;
            Ok(Some(FeedEvent::Trade(trade)))
        }
        FrameKind::Heartbeat | FrameKind::Unrecognized => Ok(None),
    }
}

fn decode_payload<T: DeserializeOwned>(
    frame: &str,
    prefix: &str,
    event: &'static str,
) -> Result<T, DecodeError> {
    let payload = frame
        .strip_prefix(prefix)
        .and_then(|rest| rest.trim_start().strip_prefix(','))
        .and_then(|rest| rest.trim_end().strip_suffix(']'))
        .ok_or(DecodeError::MissingEnvelope { event })?;

    serde_json::from_str(payload).map_err(|source| DecodeError::InvalidPayload { event, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin_frame(virtual_token_reserves: &str) -> String {
        format!(
            r#"42["newCoinCreated",{{"mint":"M1","bonding_curve":"BC1","associated_bonding_curve":"ABC1","virtual_token_reserves":{},"virtual_sol_reserves":30000000000,"real_token_reserves":793100000000000,"real_sol_reserves":0,"website":"https://w.io","telegram":"https://t.me/x","twitter":"https://x.com/x","created_timestamp":1718000000123,"name":"Coin","symbol":"CN","description":"[tags] inside"}}]"#,
            virtual_token_reserves
        )
    }

    #[test]
    fn test_classify_frames() {
        assert_eq!(classify("2"), FrameKind::Heartbeat);
        assert_eq!(classify("3"), FrameKind::Unrecognized);
        assert_eq!(classify("40"), FrameKind::Unrecognized);
        assert_eq!(classify(r#"42["tradeCreated",{}]"#), FrameKind::Trade);
        assert_eq!(classify(r#"42["newCoinCreated",{}]"#), FrameKind::NewListing);
        assert_eq!(classify(r#"42["somethingElse",{}]"#), FrameKind::Unrecognized);
    }

    #[test]
    fn test_decode_new_listing() {
        let event = decode(&coin_frame("1073000000000000")).unwrap();
        match event {
            Some(FeedEvent::NewListing(coin)) => {
                assert_eq!(coin.mint, "M1");
                assert_eq!(coin.bonding_curve, "BC1");
                assert_eq!(coin.virtual_token_reserves, 1_073_000_000_000_000);
                assert_eq!(coin.website.as_deref(), Some("https://w.io"));
                assert_eq!(coin.created_timestamp, 1_718_000_000_123);
                assert_eq!(coin.symbol.as_deref(), Some("CN"));
            }
            other => panic!("expected listing, got {:?}", other),
        }
    }

    #[test]
    fn test_reserves_keep_full_precision() {
        // 2^53 + 1 cannot be represented exactly as an f64
        let event = decode(&coin_frame("9007199254740993")).unwrap();
        let Some(FeedEvent::NewListing(coin)) = event else {
            panic!("expected listing");
        };
        assert_eq!(coin.virtual_token_reserves, 9_007_199_254_740_993);
        assert_eq!(coin.virtual_token_reserves.to_string(), "9007199254740993");
    }

    #[test]
    fn test_float_reserve_is_rejected() {
        let err = decode(&coin_frame("1.5")).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload { event: "newCoinCreated", .. }));
    }

    #[test]
    fn test_decode_trade() {
        let frame = r#"42["tradeCreated",{"mint":"A","signature":"S1","sol_amount":2000000000,"token_amount":5000,"is_buy":true,"timestamp":1718000000,"symbol":"AAA","name":"Alpha","usd_market_cap":100.5}]"#;
        let Some(FeedEvent::Trade(trade)) = decode(frame).unwrap() else {
            panic!("expected trade");
        };
        assert_eq!(trade.signature, "S1");
        assert_eq!(trade.sol_amount, 2_000_000_000);
        assert!(trade.is_buy);
        assert_eq!(trade.usd_market_cap, Some(100.5));
    }

    #[test]
    fn test_trade_with_null_market_cap() {
        let frame = r#"42["tradeCreated",{"mint":"A","signature":"S1","sol_amount":1,"token_amount":1,"is_buy":false,"timestamp":1,"symbol":"AAA","name":"Alpha","usd_market_cap":null}]"#;
        let Some(FeedEvent::Trade(trade)) = decode(frame).unwrap() else {
            panic!("expected trade");
        };
        assert_eq!(trade.usd_market_cap, None);
    }

    #[test]
    fn test_missing_required_field() {
        let frame = r#"42["tradeCreated",{"mint":"A","sol_amount":1,"token_amount":1,"is_buy":true,"timestamp":1,"symbol":"AAA","name":"Alpha"}]"#;
        assert!(matches!(
            decode(frame),
            Err(DecodeError::InvalidPayload { event: "tradeCreated", .. })
        ));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let frame = r#"42["tradeCreated",{"mint":"A","signature":"S1","sol_amount":"1","token_amount":1,"is_buy":true,"timestamp":1,"symbol":"AAA","name":"Alpha"}]"#;
        assert!(decode(frame).is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(decode(r#"42["tradeCreated",{"mint":]"#).is_err());
    }

    #[test]
    fn test_missing_closing_bracket() {
        assert!(matches!(
            decode(r#"42["tradeCreated",{"mint":"A"}"#),
            Err(DecodeError::MissingEnvelope { event: "tradeCreated" })
        ));
    }

    #[test]
    fn test_spacing_around_separator_is_accepted() {
        let frame = r#"42["tradeCreated" , {"mint":"A","signature":"S1","sol_amount":1,"token_amount":1,"is_buy":true,"timestamp":1,"symbol":"AAA","name":"Alpha","usd_market_cap":1.0} ]"#;
        assert_eq!(classify(frame), FrameKind::Trade);
        assert!(matches!(decode(frame), Ok(Some(FeedEvent::Trade(_)))));
    }

    #[test]
    fn test_missing_separator_is_an_error() {
        let frame = r#"42["newCoinCreated"{"mint":"M1"}]"#;
        assert_eq!(classify(frame), FrameKind::NewListing);
        assert!(matches!(
            decode(frame),
            Err(DecodeError::MissingEnvelope { event: "newCoinCreated" })
        ));
    }

    #[test]
    fn test_unrecognized_frames_yield_nothing() {
        assert!(decode(r#"42["otherEvent",{"a":1}]"#).unwrap().is_none());
        assert!(decode(r#"0{"sid":"abc","pingInterval":25000}"#).unwrap().is_none());
        assert!(decode("2").unwrap().is_none());
        assert!(decode("").unwrap().is_none());
    }
}
