//! Local stand-ins for the feed socket and the sniper service.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::{accept_async, tungstenite::Message};

pub const WAIT: Duration = Duration::from_secs(5);

/// Accept one feed client, push `frames` to it, wait for `expected_replies`
/// text frames from the client, then close. Resolves to every text frame the
/// client sent, in order.
pub async fn spawn_feed_server(
    frames: Vec<String>,
    expected_replies: usize,
) -> Result<(String, JoinHandle<Result<Vec<String>>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("ws://{}", listener.local_addr()?);

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await?;
        let mut ws = accept_async(stream).await?;

        for frame in frames {
            ws.send(Message::Text(frame.into())).await?;
        }

        let mut received = Vec::new();
        while received.len() < expected_replies {
            match timeout(WAIT, ws.next()).await {
                Ok(Some(Ok(Message::Text(text)))) => received.push(text.to_string()),
                Ok(Some(Ok(_))) => {}
                Ok(Some(Err(e))) => return Err(e.into()),
                Ok(None) => break,
                Err(_) => return Err(anyhow!("timed out waiting for client frames")),
            }
        }

        // The client may already be gone
        let _ = ws.close(None).await;
        // Anything the client still sends before hanging up
        while let Ok(Some(Ok(message))) = timeout(Duration::from_millis(200), ws.next()).await {
            if let Message::Text(text) = message {
                received.push(text.to_string());
            }
        }
        Ok::<_, anyhow::Error>(received)
    });

    Ok((url, handle))
}

/// A single HTTP request as seen by the stub server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub body: String,
}

/// Accept one HTTP connection, capture the request, and answer with
/// `status_line` and `body`.
pub async fn spawn_http_server(
    status_line: &'static str,
    body: &'static str,
) -> Result<(String, JoinHandle<Result<CapturedRequest>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await?;

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(anyhow!("connection closed before headers"));
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find_header_end(&buf) {
                break pos;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = header_end + 4;
        while buf.len() < body_start + content_length {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await?;
        stream.flush().await?;

        let request_line = head.lines().next().unwrap_or_default().to_string();
        let end = (body_start + content_length).min(buf.len());
        let body = String::from_utf8_lossy(&buf[body_start..end]).to_string();
        Ok::<_, anyhow::Error>(CapturedRequest { request_line, body })
    });

    Ok((base_url, handle))
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// A `newCoinCreated` frame for mint `M1` with the given link values
/// (pass JSON literals, e.g. `"\"w\""` or `"null"`).
pub fn coin_frame(website: &str, telegram: &str, twitter: &str) -> String {
    let created = chrono::Utc::now().timestamp_millis();
    format!(
        r#"42["newCoinCreated",{{"mint":"M1","bonding_curve":"BC1","associated_bonding_curve":"ABC1","virtual_token_reserves":1073000000000000,"virtual_sol_reserves":30000000000,"real_token_reserves":793100000000000,"real_sol_reserves":0,"website":{},"telegram":{},"twitter":{},"created_timestamp":{},"name":"Coin","symbol":"CN"}}]"#,
        website, telegram, twitter, created
    )
}
