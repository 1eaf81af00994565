//! Dispatcher - periodic publication of one message list
//!
//! `Idle → Running → Drained`. Each tick hands exactly one message to the
//! wire codec for an encode/decode round trip and advances the cursor,
//! whatever the outcome. The timer stops itself once the cursor reaches
//! the end of the list.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use contracts::{ContractError, MessageFamily, PublisherConfig, WireCodec};
use observability::{RunningStats, StatsSummary};
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, instrument};

use crate::error::DispatcherError;
use crate::handle::DispatchHandle;
use crate::metrics::DispatchMetrics;

/// Dispatcher configuration
#[derive(Debug, Clone, Copy)]
pub struct DispatcherConfig {
    pub family: MessageFamily,
    /// Tick period
    pub interval: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            family: MessageFamily::Alert,
            interval: Duration::from_millis(1000),
        }
    }
}

impl From<&PublisherConfig> for DispatcherConfig {
    fn from(config: &PublisherConfig) -> Self {
        Self {
            family: config.family,
            interval: Duration::from_millis(config.interval_ms),
        }
    }
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Message list not built yet
    Idle,
    /// Timer active, messages remaining
    Running,
    /// Every message handed to the codec (terminal)
    Drained,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Drained => "drained",
        })
    }
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not started, nothing done
    Idle,
    /// Round trip succeeded for the message at `index`
    Sent { index: usize },
    /// Round trip failed for the message at `index`; the cursor still moved
    Failed { index: usize },
    /// Nothing left to send
    Drained,
}

/// Final state of a dispatch run
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub family: MessageFamily,
    pub state: DispatchState,
    pub total: usize,
    pub cursor: usize,
    pub sent: u64,
    pub failures: u64,
    pub codec_latency_ms: StatsSummary,
}

/// Periodic publisher owning its codec
pub struct Dispatcher<C> {
    config: DispatcherConfig,
    codec: C,
    state: DispatchState,
    messages: Vec<String>,
    cursor: usize,
    metrics: Arc<DispatchMetrics>,
    latency: RunningStats,
}

impl<C: WireCodec> Dispatcher<C> {
    pub fn new(config: DispatcherConfig, codec: C) -> Self {
        Self {
            config,
            codec,
            state: DispatchState::Idle,
            messages: Vec::new(),
            cursor: 0,
            metrics: Arc::new(DispatchMetrics::new()),
            latency: RunningStats::default(),
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Index of the next message to send
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Messages in the built list
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn report(&self) -> DispatchReport {
        DispatchReport {
            family: self.config.family,
            state: self.state,
            total: self.messages.len(),
            cursor: self.cursor,
            sent: self.metrics.sent_count(),
            failures: self.metrics.failure_count(),
            codec_latency_ms: StatsSummary::from(&self.latency),
        }
    }

    /// Build the message list once and enter `Running`
    ///
    /// A build error or a zero interval leaves the dispatcher `Idle`. An
    /// empty list goes straight to `Drained`.
    #[instrument(
        name = "dispatcher_start",
        skip(self, build),
        fields(family = %self.config.family)
    )]
    pub fn start<F>(&mut self, build: F) -> Result<usize, DispatcherError>
    where
        F: FnOnce() -> Result<Vec<String>, ContractError>,
    {
        if self.state != DispatchState::Idle {
            return Err(DispatcherError::AlreadyStarted {
                state: self.state.to_string(),
            });
        }
        if self.config.interval.is_zero() {
            return Err(DispatcherError::ZeroInterval);
        }

        let messages = build()?;
        let total = messages.len();
        self.messages = messages;
        self.metrics.set_total(total);

        if total == 0 {
            self.state = DispatchState::Drained;
            info!("Empty message list, nothing to dispatch");
        } else {
            self.state = DispatchState::Running;
            let interval_ms = self.config.interval.as_millis() as u64;
            info!(total, interval_ms, "Dispatcher started");
        }
        Ok(total)
    }

    /// Start with an already built list
    pub fn start_with(&mut self, messages: Vec<String>) -> Result<usize, DispatcherError> {
        self.start(move || Ok(messages))
    }

    /// One dispatch step
    pub fn tick(&mut self) -> TickOutcome {
        match self.state {
            DispatchState::Idle => return TickOutcome::Idle,
            DispatchState::Drained => return TickOutcome::Drained,
            DispatchState::Running => {}
        }

        let index = self.cursor;
        let family = self.config.family;
        info!(index, family = %family, "Sending message");

        let started = std::time::Instant::now();
        let message = std::mem::take(&mut self.messages[index]);
        let result = self.round_trip(&message);
        self.messages[index] = message;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        self.latency.push(latency_ms);
        observability::record_codec_latency_ms(self.codec.name(), latency_ms);

        let outcome = match result {
            Ok(()) => {
                self.metrics.inc_sent_count();
                TickOutcome::Sent { index }
            }
            Err(err) => {
                self.metrics.inc_failure_count();
                error!(index, codec = self.codec.name(), error = %err, "Codec round trip failed");
                TickOutcome::Failed { index }
            }
        };
        observability::record_message_dispatched(
            family.as_str(),
            matches!(outcome, TickOutcome::Sent { .. }),
        );

        self.cursor += 1;
        self.metrics.set_cursor(self.cursor);
        observability::record_dispatch_cursor(family.as_str(), self.cursor, self.messages.len());

        if self.cursor >= self.messages.len() {
            self.state = DispatchState::Drained;
            info!(
                sent = self.metrics.sent_count(),
                failures = self.metrics.failure_count(),
                "All messages sent, stopping timer"
            );
        }
        outcome
    }

    /// Envelope, encode, decode, compare
    fn round_trip(&mut self, message: &str) -> Result<(), ContractError> {
        let codec_name = self.codec.name().to_string();
        let value: Value = serde_json::from_str(message)
            .map_err(|e| ContractError::codec(&codec_name, format!("message is not JSON: {e}")))?;
        let envelope = json!({
            "messageId": self.config.family.message_id(),
            "value": value,
        });
        let envelope_text = serde_json::to_string(&envelope)
            .map_err(|e| ContractError::codec(&codec_name, e.to_string()))?;

        let wire = self.codec.encode(&envelope_text)?;
        debug!(codec = %codec_name, wire_len = wire.len(), "Encoded");
        let decoded = self.codec.decode(&wire)?;
        debug!(codec = %codec_name, decoded = %decoded, "Decoded");

        let echoed: Value = serde_json::from_str(&decoded).map_err(|e| {
            ContractError::codec(&codec_name, format!("decoded text is not JSON: {e}"))
        })?;
        if echoed != envelope {
            return Err(ContractError::codec(&codec_name, "round trip changed the message"));
        }
        Ok(())
    }

    /// Tick on the configured interval until `Drained`
    pub async fn run(&mut self) -> Result<DispatchReport, DispatcherError> {
        self.run_until(std::future::pending()).await
    }

    /// Like [`run`](Self::run), returning early once `stop` resolves
    ///
    /// The first tick fires one interval after the call. A slow codec
    /// delays later ticks but never skips them.
    #[instrument(
        name = "dispatcher_run",
        skip(self, stop),
        fields(family = %self.config.family, total = self.messages.len())
    )]
    pub async fn run_until<F>(&mut self, stop: F) -> Result<DispatchReport, DispatcherError>
    where
        F: Future<Output = ()>,
    {
        match self.state {
            DispatchState::Idle => return Err(DispatcherError::NotStarted),
            DispatchState::Drained => return Ok(self.report()),
            DispatchState::Running => {}
        }

        let period = self.config.interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(stop);

        while self.state == DispatchState::Running {
            tokio::select! {
                _ = &mut stop => {
                    info!(cursor = self.cursor, "Dispatch stopped before drain");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }

        Ok(self.report())
    }
}

impl<C: WireCodec + 'static> Dispatcher<C> {
    /// Run on a background task
    pub fn spawn(mut self) -> DispatchHandle {
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let metrics = Arc::clone(&self.metrics);

        let task = tokio::spawn(async move {
            let stop = async move {
                // a dropped handle never stops the run
                if stop_rx.await.is_err() {
                    std::future::pending::<()>().await;
                }
            };
            self.run_until(stop).await
        });

        DispatchHandle::new(stop_tx, task, metrics)
    }
}
