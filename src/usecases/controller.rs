//! Reconnect Controller - Connection Lifecycle State Machine
//!
//! Owns the connection for the client's lifetime: connect, consume, detect
//! failure, back off, retry, forever until stopped. Every transport error is
//! absorbed here and surfaced as events/counters; the loop never exits on
//! error. Uses tokio::select! with a biased shutdown arm around every
//! suspension point so stop() interrupts blocked I/O promptly.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::domain::{Backoff, FeedEvent, FeedState, FeedStats, PriceUpdate};
use crate::ports::{Decoded, FeedConnection, FeedTransport, MessageDecoder, TransportError};
use crate::usecases::price_store::PriceStore;

/// Why a connected session ended.
enum SessionEnd {
    /// stop() was requested; the loop terminates.
    Shutdown,
    /// The connection died; the loop backs off and retries.
    Failed(TransportError),
}

/// The connect / consume / backoff loop.
///
/// Single writer to the [`PriceStore`]; publishes [`FeedState`] through a
/// watch channel and failures through the event broadcast.
pub struct ReconnectController<T: FeedTransport, D: MessageDecoder> {
    transport: T,
    decoder: D,
    store: Arc<PriceStore>,
    read_timeout: Duration,
    backoff: Backoff,
    state_tx: watch::Sender<FeedState>,
    events: broadcast::Sender<FeedEvent>,
    stats: Arc<FeedStats>,
}

impl<T: FeedTransport, D: MessageDecoder> ReconnectController<T, D> {
    /// Wire up a controller. Channels and store are owned by the facade;
    /// the controller holds the sending/writing ends.
    pub fn new(
        transport: T,
        decoder: D,
        store: Arc<PriceStore>,
        config: &FeedConfig,
        state_tx: watch::Sender<FeedState>,
        events: broadcast::Sender<FeedEvent>,
        stats: Arc<FeedStats>,
    ) -> Self {
        Self {
            transport,
            decoder,
            store,
            read_timeout: config.read_timeout(),
            backoff: Backoff::new(config.backoff_min(), config.backoff_max()),
            state_tx,
            events,
            stats,
        }
    }

    /// Run until the shutdown channel fires. Consumes the controller.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        info!(
            read_timeout_ms = self.read_timeout.as_millis() as u64,
            "Feed reconnect loop started"
        );

        'reconnect: loop {
            self.set_state(FeedState::Connecting);

            let connected = tokio::select! {
                biased;
                _ = shutdown.recv() => break 'reconnect,
                result = self.transport.connect() => result,
            };

            let retry_in = match connected {
                Ok(mut conn) => {
                    self.set_state(FeedState::Connected);
                    self.stats.connected.store(true, Ordering::Relaxed);
                    let _ = self.events.send(FeedEvent::Connected);
                    info!("Feed connected");

                    let ended = self.consume(&mut conn, &mut shutdown).await;
                    conn.close().await;
                    self.stats.connected.store(false, Ordering::Relaxed);

                    match ended {
                        SessionEnd::Shutdown => break 'reconnect,
                        SessionEnd::Failed(error) => {
                            let retry_in = self.backoff.next_delay();
                            warn!(
                                error = %error,
                                retry_in_ms = retry_in.as_millis() as u64,
                                "Feed connection lost"
                            );
                            let _ = self.events.send(FeedEvent::Disconnected {
                                error: error.to_string(),
                                retry_in,
                            });
                            retry_in
                        }
                    }
                }
                Err(error) => {
                    let retry_in = self.backoff.next_delay();
                    warn!(
                        error = %error,
                        retry_in_ms = retry_in.as_millis() as u64,
                        "Feed connect failed"
                    );
                    let _ = self.events.send(FeedEvent::ConnectFailed {
                        error: error.to_string(),
                        retry_in,
                    });
                    retry_in
                }
            };

            self.set_state(FeedState::Backoff);
            self.stats.reconnects.fetch_add(1, Ordering::Relaxed);

            tokio::select! {
                biased;
                _ = shutdown.recv() => break 'reconnect,
                _ = tokio::time::sleep(retry_in) => {}
            }
        }

        self.set_state(FeedState::Stopped);
        info!("Feed reconnect loop stopped");
    }

    /// Consume one connected session until it dies or shutdown fires.
    async fn consume(
        &mut self,
        conn: &mut T::Conn,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> SessionEnd {
        let mut received_any = false;

        loop {
            let message = tokio::select! {
                biased;
                _ = shutdown.recv() => return SessionEnd::Shutdown,
                result = conn.next_message(self.read_timeout) => result,
            };

            let raw = match message {
                Ok(raw) => raw,
                // Timeout means a silent/half-open connection: same teardown
                // as an explicit close.
                Err(error) => return SessionEnd::Failed(error),
            };

            self.stats.messages.fetch_add(1, Ordering::Relaxed);

            // Connection has proven itself: next failure starts the backoff
            // schedule from the minimum again.
            if !received_any {
                received_any = true;
                self.backoff.reset();
            }

            match self.decoder.decode(&raw) {
                Ok(Decoded::Price(value)) => {
                    let update = PriceUpdate {
                        value,
                        received_at: Instant::now(),
                    };
                    if self.store.update(update) {
                        debug!(price = %value, "Price update accepted");
                    }
                }
                Ok(Decoded::Heartbeat) => {
                    self.store.touch(Instant::now());
                }
                Ok(Decoded::Ignored) => {}
                Err(error) => {
                    // Malformed messages are skipped, never fatal.
                    self.stats.decode_failures.fetch_add(1, Ordering::Relaxed);
                    debug!(error = %error, "Skipping undecodable message");
                }
            }
        }
    }

    fn set_state(&self, state: FeedState) {
        self.state_tx.send_replace(state);
    }
}
