//! Redraw rate limiting for any [`RefreshSink`].
//!
//! A request is drawn at once when the last draw is at least `min_interval`
//! old, otherwise it is parked and drawn by a later `flush` or by `finish`.
//! A generation that was already drawn is never drawn again unless forced.

use std::time::{Duration, Instant};

use crate::{aggregate::AggregateTable, error::FeedError, run::FeedStats, ui::RefreshSink};

struct Pending {
    generation: u64,
    snapshot: AggregateTable,
    stats: FeedStats,
}

pub struct Throttle<S> {
    sink: S,
    min_interval: Duration,
    last_draw: Option<Instant>,
    drawn: Option<u64>,
    pending: Option<Pending>,
    finished: bool,
}

impl<S: RefreshSink> Throttle<S> {
    pub fn new(sink: S, min_interval: Duration) -> Self {
        Self {
            sink,
            min_interval,
            last_draw: None,
            drawn: None,
            pending: None,
            finished: false,
        }
    }

    pub fn inner(&self) -> &S {
        &self.sink
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn is_due(&self, now: Instant) -> bool {
        self.last_draw
            .map_or(true, |last| now.saturating_duration_since(last) >= self.min_interval)
    }

    fn draw(
        &mut self,
        generation: u64,
        snapshot: &AggregateTable,
        stats: &FeedStats,
        now: Instant,
    ) -> Result<(), FeedError> {
        self.sink.render(snapshot, stats)?;
        self.last_draw = Some(now);
        self.drawn = Some(generation);
        Ok(())
    }

    /// Requests a draw of `snapshot`. Returns whether it was drawn now.
    pub fn offer(
        &mut self,
        generation: u64,
        snapshot: AggregateTable,
        stats: &FeedStats,
        now: Instant,
    ) -> Result<bool, FeedError> {
        if self.drawn == Some(generation) {
            return Ok(false);
        }
        if self.is_due(now) {
            self.pending = None;
            self.draw(generation, &snapshot, stats, now)?;
            return Ok(true);
        }
        self.pending = Some(Pending {
            generation,
            snapshot,
            stats: stats.clone(),
        });
        Ok(false)
    }

    /// Draws the parked request if the interval has passed.
    pub fn flush(&mut self, now: Instant) -> Result<bool, FeedError> {
        if !self.is_due(now) {
            return Ok(false);
        }
        match self.pending.take() {
            Some(p) => {
                self.draw(p.generation, &p.snapshot, &p.stats, now)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Draws regardless of interval and generation, e.g. after a resize.
    pub fn force(
        &mut self,
        generation: u64,
        snapshot: &AggregateTable,
        stats: &FeedStats,
        now: Instant,
    ) -> Result<(), FeedError> {
        self.pending = None;
        self.draw(generation, snapshot, stats, now)
    }

    /// Draws anything parked, then closes the sink. Only the first call acts.
    pub fn finish(&mut self) -> Result<(), FeedError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let drawn = match self.pending.take() {
            Some(p) => self.sink.render(&p.snapshot, &p.stats),
            None => Ok(()),
        };
        let closed = self.sink.close();
        drawn.and(closed)
    }
}
