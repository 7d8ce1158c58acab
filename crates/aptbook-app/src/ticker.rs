//! Periodic tick loop driving alarm evaluation.
//!
//! The ticker calls a tick function immediately on start and then on a
//! fixed interval. A handle lets other tasks force an off-schedule tick
//! (e.g. right after a mutation) or stop the loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, warn};

/// Ticker configuration.
#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// Interval between ticks.
    pub tick_interval: Duration,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(30),
        }
    }
}

impl TickerConfig {
    /// Creates a config with the given tick interval.
    pub fn new(tick_interval: Duration) -> Self {
        Self { tick_interval }
    }
}

/// Commands that can be sent to a running ticker.
#[derive(Debug, Clone)]
pub enum TickerCommand {
    /// Run a tick immediately, without resetting the schedule.
    TickNow,
    /// Stop the ticker loop.
    Stop,
}

/// Observable ticker state.
#[derive(Debug, Clone, Default)]
pub struct TickerState {
    /// Total ticks executed.
    pub ticks: u64,
    /// Ticks whose tick function reported an error.
    pub failed_ticks: u64,
    /// When the last tick ran.
    pub last_tick: Option<DateTime<Utc>>,
    /// Error message from the most recent failed tick.
    pub last_error: Option<String>,
}

impl TickerState {
    fn record(&mut self, result: &Result<(), String>) {
        self.ticks += 1;
        self.last_tick = Some(Utc::now());
        match result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                self.failed_ticks += 1;
                self.last_error = Some(e.clone());
            }
        }
    }
}

/// Shared ticker state.
pub type SharedTickerState = Arc<RwLock<TickerState>>;

/// The tick loop. Constructed once, consumed by [`run`].
///
/// [`run`]: Self::run
pub struct Ticker {
    config: TickerConfig,
    state: SharedTickerState,
    command_tx: mpsc::Sender<TickerCommand>,
    command_rx: Option<mpsc::Receiver<TickerCommand>>,
}

impl Ticker {
    /// Creates a new ticker with the given configuration.
    pub fn new(config: TickerConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        Self {
            config,
            state: Arc::new(RwLock::new(TickerState::default())),
            command_tx,
            command_rx: Some(command_rx),
        }
    }

    /// Returns a handle for sending commands to the ticker.
    pub fn handle(&self) -> TickerHandle {
        TickerHandle {
            command_tx: self.command_tx.clone(),
            state: self.state.clone(),
        }
    }

    /// Returns the shared state.
    pub fn state(&self) -> SharedTickerState {
        self.state.clone()
    }

    /// Runs the tick loop with the given tick function.
    ///
    /// Ticks once immediately, then on every interval. A failing tick is
    /// logged and counted; the loop keeps running.
    pub async fn run<F, Fut>(mut self, tick_fn: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send,
    {
        let Some(mut command_rx) = self.command_rx.take() else {
            warn!("ticker run called twice, ignoring");
            return;
        };

        info!(
            interval_secs = self.config.tick_interval.as_secs(),
            "ticker started"
        );

        self.do_tick(&tick_fn).await;

        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first interval tick fires immediately; consume it so the
        // initial tick above is not doubled.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.do_tick(&tick_fn).await;
                }
                cmd = command_rx.recv() => {
                    match cmd {
                        Some(TickerCommand::TickNow) => {
                            debug!("received TickNow command");
                            self.do_tick(&tick_fn).await;
                        }
                        Some(TickerCommand::Stop) | None => {
                            info!("ticker stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn do_tick<F, Fut>(&self, tick_fn: &F)
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<(), String>>,
    {
        debug!("tick");
        let result = tick_fn().await;
        if let Err(e) = &result {
            warn!(error = %e, "tick failed");
        }
        self.state.write().await.record(&result);
    }
}

/// Handle for sending commands to a running ticker.
#[derive(Clone, Debug)]
pub struct TickerHandle {
    command_tx: mpsc::Sender<TickerCommand>,
    state: SharedTickerState,
}

impl TickerHandle {
    /// Runs a tick immediately.
    pub async fn tick_now(&self) -> Result<(), mpsc::error::SendError<TickerCommand>> {
        self.command_tx.send(TickerCommand::TickNow).await
    }

    /// Stops the ticker.
    pub async fn stop(&self) -> Result<(), mpsc::error::SendError<TickerCommand>> {
        self.command_tx.send(TickerCommand::Stop).await
    }

    /// Returns a snapshot of the ticker state.
    pub async fn state(&self) -> TickerState {
        self.state.read().await.clone()
    }
}
