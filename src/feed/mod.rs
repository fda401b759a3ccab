//! Feed ingestion - transport session and frame decoding.

pub mod decoder;
pub mod session;

pub use decoder::{classify, decode, FrameKind};
pub use session::FeedSession;

/// Default pump.fun frontend socket.
pub const PUMP_WEBSOCKET_URL: &str =
    "wss://frontend-api.pump.fun/socket.io/?EIO=4&transport=websocket";
