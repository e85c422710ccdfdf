//! Feed Client - Public Facade
//!
//! Composes the price store, reconnect controller, and expiry watcher into
//! the public API: `start()`, `stop()`, `price()`. The client owns the
//! shutdown broadcast and the background task; callers only ever see
//! freshness-qualified price results, never transport errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::{loader::validate_config, FeedConfig};
use crate::domain::{freshness, FeedEvent, FeedState, FeedStats, FeedStatsSnapshot, PriceResult};
use crate::ports::{FeedTransport, MessageDecoder};
use crate::usecases::controller::ReconnectController;
use crate::usecases::expiry::ExpiryWatcher;
use crate::usecases::price_store::PriceStore;

/// How long `stop()` waits for the background task before aborting it.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Event channel depth. Slow subscribers lag rather than block the feed.
const EVENT_BUFFER: usize = 64;

/// The client was already stopped; `stop()` is terminal.
#[derive(Debug, Clone, Copy, Error)]
#[error("feed client has been stopped")]
pub struct StoppedError;

/// Lifecycle slot for the background task.
enum Runner {
    /// Built but not yet spawned.
    Idle(BoxFuture<'static, ()>),
    /// Spawned; handle available for graceful join.
    Running(JoinHandle<()>),
    /// Taken by `stop()` (or never started before stop).
    Finished,
}

/// Resilient streaming price client.
///
/// Construct with a transport and decoder, `start()` it, then query
/// `price()` from any task. The background loop keeps the stored price as
/// current as the network allows; queries degrade to `Expired` /
/// `NeverReceived` instead of failing.
pub struct FeedClient {
    store: Arc<PriceStore>,
    stats: Arc<FeedStats>,
    expiry: Duration,
    shutdown_tx: broadcast::Sender<()>,
    events_tx: broadcast::Sender<FeedEvent>,
    state_rx: watch::Receiver<FeedState>,
    runner: Mutex<Runner>,
    stopped: AtomicBool,
}

impl FeedClient {
    /// Validate `config` and wire up a client over the given collaborators.
    ///
    /// Nothing runs until [`start()`](Self::start).
    pub fn new<T, D>(config: FeedConfig, transport: T, decoder: D) -> Result<Self>
    where
        T: FeedTransport,
        D: MessageDecoder,
    {
        validate_config(&config)?;

        let store = Arc::new(PriceStore::new());
        let stats = Arc::new(FeedStats::default());
        let (shutdown_tx, _) = broadcast::channel(1);
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
        let (state_tx, state_rx) = watch::channel(FeedState::Disconnected);

        let controller = ReconnectController::new(
            transport,
            decoder,
            Arc::clone(&store),
            &config,
            state_tx,
            events_tx.clone(),
            Arc::clone(&stats),
        );
        let watcher = ExpiryWatcher::new(store.subscribe(), config.expiry(), events_tx.clone());

        let controller_shutdown = shutdown_tx.subscribe();
        let watcher_shutdown = shutdown_tx.subscribe();
        let run: BoxFuture<'static, ()> = Box::pin(async move {
            tokio::join!(
                controller.run(controller_shutdown),
                watcher.run(watcher_shutdown),
            );
        });

        Ok(Self {
            store,
            stats,
            expiry: config.expiry(),
            shutdown_tx,
            events_tx,
            state_rx,
            runner: Mutex::new(Runner::Idle(run)),
            stopped: AtomicBool::new(false),
        })
    }

    /// Spawn the reconnect loop. Idempotent while running.
    ///
    /// Must be called from within a tokio runtime. Fails only after
    /// [`stop()`](Self::stop).
    pub fn start(&self) -> Result<(), StoppedError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(StoppedError);
        }

        let mut slot = self.runner.lock().expect("runner mutex poisoned");
        match std::mem::replace(&mut *slot, Runner::Finished) {
            Runner::Idle(run) => {
                *slot = Runner::Running(tokio::spawn(run));
                info!("Feed client started");
                Ok(())
            }
            running @ Runner::Running(_) => {
                *slot = running;
                Ok(())
            }
            Runner::Finished => Err(StoppedError),
        }
    }

    /// Stop the feed. Terminal; idempotent.
    ///
    /// Signals shutdown, which interrupts a blocked connect/read at its
    /// select point, then waits up to the grace period for the task to
    /// finish before aborting it. The last known price stays queryable and
    /// keeps aging toward expiry.
    pub async fn stop(&self) {
        let handle = {
            let mut slot = self.runner.lock().expect("runner mutex poisoned");
            match std::mem::replace(&mut *slot, Runner::Finished) {
                Runner::Running(handle) => Some(handle),
                _ => None,
            }
        };

        let _ = self.shutdown_tx.send(());

        if let Some(mut handle) = handle {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut handle)
                .await
                .is_err()
            {
                warn!(
                    grace_secs = SHUTDOWN_GRACE.as_secs(),
                    "Feed task exceeded shutdown grace period, aborting"
                );
                handle.abort();
            }
        }

        self.stopped.store(true, Ordering::SeqCst);
        info!("Feed client stopped");
    }

    /// The current price, qualified by freshness, computed at call time.
    ///
    /// Never blocks and never fails; combines the store read with the
    /// expiry evaluation on every call so freshness cannot drift.
    pub fn price(&self) -> PriceResult {
        freshness(self.store.latest(), Instant::now(), self.expiry)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FeedState {
        if self.stopped.load(Ordering::SeqCst) {
            FeedState::Stopped
        } else {
            *self.state_rx.borrow()
        }
    }

    /// True while a connection is established.
    pub fn is_connected(&self) -> bool {
        self.stats.connected.load(Ordering::Relaxed)
    }

    /// Subscribe to lifecycle and freshness events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<FeedEvent> {
        self.events_tx.subscribe()
    }

    /// Snapshot of the feed counters.
    pub fn stats(&self) -> FeedStatsSnapshot {
        self.stats.snapshot()
    }
}
