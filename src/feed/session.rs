//! Transport session for the pump.fun frontend socket.
//!
//! Owns one WebSocket connection, speaks the socket.io handshake and heartbeat
//! protocol, and hands every other text frame to the caller verbatim.
//! The session does not reconnect; once it ends the caller decides what next.

use crate::error::TransportError;
use crate::feed::decoder::{CONNECT_FRAME, PING_FRAME, PONG_FRAME};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, instrument};

type FeedStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A live connection to the feed.
pub struct FeedSession {
    url: String,
    ws: FeedStream,
    heartbeats_answered: u64,
}

impl FeedSession {
    /// Open the socket and acknowledge the handshake.
    ///
    /// `"40"` is the first frame written, before anything is read.
    #[instrument]
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (ws, _response) = connect_async(url).await.map_err(|source| {
            error!("Failed to connect to {}: {}", url, source);
            TransportError::Connect {
                url: url.to_string(),
                source,
            }
        })?;
        info!("Connection established: {}", url);

        let mut session = Self {
            url: url.to_string(),
            ws,
            heartbeats_answered: 0,
        };
        session.send(CONNECT_FRAME).await?;
        Ok(session)
    }

    /// Wait for the next application frame.
    ///
    /// Heartbeat pings are answered here and never returned. `Ok(None)` means
    /// the server closed the connection.
    pub async fn next_frame(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    if text == PING_FRAME {
                        self.send(PONG_FRAME).await?;
                        self.heartbeats_answered += 1;
                        debug!("Heartbeat sent");
                        continue;
                    }
                    return Ok(Some(text.to_string()));
                }
                Some(Ok(Message::Close(frame))) => {
                    info!("Connection closed by {}: {:?}", self.url, frame);
                    return Ok(None);
                }
                // Protocol-level pings are answered by tungstenite itself
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!("Error on {}: {}", self.url, e);
                    return Err(TransportError::Stream(e));
                }
                None => {
                    info!("Connection closed: {}", self.url);
                    return Ok(None);
                }
            }
        }
    }

    /// Number of `"2"` pings answered with `"3"` so far.
    pub fn heartbeats_answered(&self) -> u64 {
        self.heartbeats_answered
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Close the socket politely.
    pub async fn close(mut self) -> Result<(), TransportError> {
        self.ws.close(None).await.map_err(TransportError::Stream)?;
        info!("Connection closed: {}", self.url);
        Ok(())
    }

    async fn send(&mut self, frame: &'static str) -> Result<(), TransportError> {
        self.ws
            .send(Message::Text(frame.into()))
            .await
            .map_err(|source| TransportError::Send { frame, source })
    }
}
