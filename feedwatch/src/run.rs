//! The polling run loop.
//!
//! ```text
//! Starting ──▶ Waiting ◀──▶ Processing
//!                 │
//!                 ▼
//!              Stopped   (interrupt or fatal error)
//! ```
//!
//! `Starting` is opening the [`TailReader`]: it fails with `FileMissing` before
//! any state exists. Everything after that is driven one transition at a time by
//! [`RunLoop::step`], so tests can script lines and wake-ups.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    aggregate::{Aggregator, Hour},
    config::Config,
    error::FeedError,
    record,
    tail::{LineSource, TailReader},
    ui::{events::TerminalWaiter, LogSink, RefreshSink, TerminalSink, Throttle},
};

/// Why a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The poll interval passed.
    Elapsed,
    /// The screen needs repainting (e.g. terminal resized).
    Redraw,
    /// Shutdown was requested.
    Interrupted,
}

/// The loop's only suspension point.
#[allow(async_fn_in_trait)]
pub trait Waiter {
    /// Suspends for at most `interval`.
    async fn wait(&mut self, interval: Duration) -> Wake;

    /// Non-blocking check for a shutdown request, made between iterations.
    fn interrupted(&mut self) -> bool;
}

/// Timed sleep that also ends on cancellation. Used without a terminal.
pub struct SignalWaiter {
    cancel: CancellationToken,
}

impl SignalWaiter {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }
}

impl Waiter for SignalWaiter {
    async fn wait(&mut self, interval: Duration) -> Wake {
        tokio::select! {
            _ = tokio::time::sleep(interval) => Wake::Elapsed,
            _ = self.cancel.cancelled() => Wake::Interrupted,
        }
    }

    fn interrupted(&mut self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Counters shown in the status bar and logged at shutdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub lines_read: u64,
    pub aggregated: u64,
    pub dropped: u64,
    pub last: Option<(Hour, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Waiting,
    Processing(String),
    Stopped,
}

/// Timing knobs for the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    pub poll_interval: Duration,
    pub min_redraw: Duration,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            min_redraw: Duration::from_millis(100),
        }
    }
}

pub struct RunLoop<S, K, W> {
    source: S,
    aggregator: Aggregator,
    sink: Throttle<K>,
    waiter: W,
    settings: LoopSettings,
    state: RunState,
    stats: FeedStats,
}

impl<S: LineSource, K: RefreshSink, W: Waiter> RunLoop<S, K, W> {
    pub fn new(source: S, sink: K, waiter: W, settings: LoopSettings) -> Self {
        Self {
            source,
            aggregator: Aggregator::new(),
            sink: Throttle::new(sink, settings.min_redraw),
            waiter,
            settings,
            state: RunState::Waiting,
            stats: FeedStats::default(),
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn stats(&self) -> &FeedStats {
        &self.stats
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn sink(&self) -> &K {
        self.sink.inner()
    }

    /// Advances one transition. An error leaves the loop `Stopped`.
    pub async fn step(&mut self) -> Result<(), FeedError> {
        match std::mem::replace(&mut self.state, RunState::Stopped) {
            RunState::Waiting => {
                if self.waiter.interrupted() {
                    info!("consumer interrupted by user");
                    return Ok(());
                }
                if let Some(line) = self.source.next_line()? {
                    self.stats.lines_read += 1;
                    self.state = RunState::Processing(line);
                    return Ok(());
                }

                self.sink.flush(Instant::now())?;
                debug!("no new messages, waiting");
                match self.waiter.wait(self.settings.poll_interval).await {
                    Wake::Elapsed => self.state = RunState::Waiting,
                    Wake::Redraw => {
                        self.sink.force(
                            self.aggregator.generation(),
                            self.aggregator.table(),
                            &self.stats,
                            Instant::now(),
                        )?;
                        self.state = RunState::Waiting;
                    }
                    Wake::Interrupted => info!("consumer interrupted by user"),
                }
            }
            RunState::Processing(line) => {
                self.process(&line)?;
                self.state = RunState::Waiting;
                // Lets the signal and terminal tasks run while the feed is busy.
                tokio::task::yield_now().await;
            }
            RunState::Stopped => {}
        }
        Ok(())
    }

    /// Handles one line. Only sink failures escape.
    fn process(&mut self, line: &str) -> Result<(), FeedError> {
        if line.trim().is_empty() {
            debug!("skipping blank line");
            return Ok(());
        }
        debug!(raw = %line, "raw message");

        let record = match record::parse(line) {
            Ok(record) => record,
            Err(e) => {
                self.stats.dropped += 1;
                warn!(error = %e, line = %line, "dropping message");
                return Ok(());
            }
        };

        self.aggregator.apply(record.hour, &record.category);
        self.stats.aggregated += 1;
        info!(
            hour = record.hour.get(),
            category = %record.category,
            author = record.author.as_deref().unwrap_or("-"),
            "message received"
        );
        info!(
            hour = record.hour.get(),
            counts = ?self.aggregator.table().hour(record.hour),
            "updated hourly category counts"
        );
        self.stats.last = Some((record.hour, record.category));

        self.sink.offer(
            self.aggregator.generation(),
            self.aggregator.snapshot(),
            &self.stats,
            Instant::now(),
        )?;
        Ok(())
    }

    /// Steps until `Stopped`, then flushes and closes the sink.
    pub async fn run(&mut self) -> Result<FeedStats, FeedError> {
        let outcome = loop {
            if let Err(e) = self.step().await {
                break Err(e);
            }
            if self.state == RunState::Stopped {
                break Ok(());
            }
        };

        let closed = self.sink.finish();
        match (outcome, closed) {
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    error!(error = %close_err, "failed to close display");
                }
                Err(e)
            }
            (Ok(()), closed) => {
                closed?;
                info!(
                    lines = self.stats.lines_read,
                    aggregated = self.stats.aggregated,
                    dropped = self.stats.dropped,
                    "consumer closed"
                );
                Ok(self.stats.clone())
            }
        }
    }
}

/// Runs the consumer described by `config` until interrupted.
pub async fn run_feed(config: Config) -> Result<FeedStats, FeedError> {
    info!("START consumer");
    info!(file = %config.file.display(), "data file");

    let palette = config.palette()?;
    let settings = config.settings();
    info!(
        poll_ms = settings.poll_interval.as_millis() as u64,
        redraw_ms = settings.min_redraw.as_millis() as u64,
        categories = palette.len(),
        headless = config.headless,
        "settings"
    );

    // Checked before the terminal is taken over.
    let tail = match TailReader::open(&config.file) {
        Ok(tail) => tail,
        Err(e) => {
            error!(error = %e, "cannot open data file, exiting");
            return Err(e);
        }
    };

    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal.cancel();
        }
    });

    info!("consumer is ready and waiting for new JSON messages");
    if config.headless {
        let sink = LogSink::new(palette);
        RunLoop::new(tail, sink, SignalWaiter::new(cancel), settings)
            .run()
            .await
    } else {
        let sink = TerminalSink::stdout(palette, config.file.clone())?;
        RunLoop::new(tail, sink, TerminalWaiter::new(cancel), settings)
            .run()
            .await
    }
}
