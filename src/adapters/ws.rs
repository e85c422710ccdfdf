//! Exchange WebSocket Transport - tokio-tungstenite Adapter
//!
//! Implements the `FeedTransport` / `FeedConnection` ports over a WebSocket
//! stream: connect, ship the configured subscription payload verbatim, yield
//! text frames, answer pings. The payload and its schema are opaque here;
//! only the decoder knows what the frames mean.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use crate::config::FeedConfig;
use crate::ports::{FeedConnection, FeedTransport, RawMessage, TransportError};

/// WebSocket transport for one exchange endpoint.
pub struct ExchangeWsTransport {
    ws_url: String,
    subscription: Option<String>,
}

impl ExchangeWsTransport {
    /// Build a transport from the feed configuration.
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            ws_url: config.ws_url.clone(),
            subscription: config.subscription.clone(),
        }
    }
}

/// An established WebSocket session.
pub struct WsConnection {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FeedTransport for ExchangeWsTransport {
    type Conn = WsConnection;

    async fn connect(&self) -> Result<WsConnection, TransportError> {
        let (mut ws, _) = connect_async(&self.ws_url)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        // Subscribing is part of establishing the connection: a session that
        // cannot subscribe is as dead as one that never opened.
        if let Some(subscription) = &self.subscription {
            ws.send(Message::Text(subscription.clone().into()))
                .await
                .map_err(|e| TransportError::Connect(format!("subscribe failed: {e}")))?;
        }

        info!(url = %self.ws_url, "Exchange WebSocket connected");
        Ok(WsConnection { ws })
    }
}

#[async_trait]
impl FeedConnection for WsConnection {
    async fn next_message(&mut self, timeout: Duration) -> Result<RawMessage, TransportError> {
        loop {
            let frame = tokio::time::timeout(timeout, self.ws.next())
                .await
                .map_err(|_| TransportError::Timeout(timeout))?;

            match frame {
                Some(Ok(Message::Text(text))) => return Ok(RawMessage(text.to_string())),
                Some(Ok(Message::Ping(payload))) => {
                    debug!(len = payload.len(), "Ping received");
                    if let Err(e) = self.ws.send(Message::Pong(payload)).await {
                        return Err(TransportError::StreamClosed(format!("pong failed: {e}")));
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    return Err(TransportError::StreamClosed(
                        "server closed the stream".to_string(),
                    ));
                }
                // Binary/Pong/raw frames are not part of this feed.
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(TransportError::StreamClosed(e.to_string())),
                None => return Err(TransportError::StreamClosed("stream ended".to_string())),
            }
        }
    }

    async fn close(&mut self) {
        let _ = self.ws.close(None).await;
    }
}
