//! Hour × category message counts.
//!
//! The [`Aggregator`] owns the live table and only ever increments it.
//! [`AggregateTable`] is also the snapshot type handed to the refresh sink.

use std::collections::BTreeMap;

/// Number of hour buckets in a day.
pub const HOURS: usize = 24;

/// Hour of day, always in `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hour(u8);

impl Hour {
    /// Returns `None` for values outside `0..=23`.
    pub fn new(hour: u8) -> Option<Self> {
        (usize::from(hour) < HOURS).then_some(Self(hour))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every hour of the day, in order.
    pub fn all() -> impl Iterator<Item = Hour> {
        (0..HOURS as u8).map(Hour)
    }

    fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Counts keyed by (hour, category).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTable {
    hours: [BTreeMap<String, u64>; HOURS],
    total: u64,
}

impl AggregateTable {
    /// Adds one to the cell, creating it at zero first if needed.
    fn increment(&mut self, hour: Hour, category: &str) {
        let counts = &mut self.hours[hour.index()];
        if let Some(cell) = counts.get_mut(category) {
            *cell += 1;
        } else {
            counts.insert(category.to_string(), 1);
        }
        self.total += 1;
    }

    pub fn count(&self, hour: Hour, category: &str) -> u64 {
        self.hours[hour.index()]
            .get(category)
            .copied()
            .unwrap_or(0)
    }

    /// Number of records aggregated so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn category_total(&self, category: &str) -> u64 {
        self.hours
            .iter()
            .filter_map(|counts| counts.get(category))
            .sum()
    }

    /// Counts for one category across all 24 hours, zeros included.
    pub fn series(&self, category: &str) -> [u64; HOURS] {
        let mut out = [0; HOURS];
        for (slot, counts) in out.iter_mut().zip(self.hours.iter()) {
            *slot = counts.get(category).copied().unwrap_or(0);
        }
        out
    }

    /// Largest single cell.
    pub fn max_count(&self) -> u64 {
        self.hours
            .iter()
            .flat_map(|counts| counts.values())
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// All categories seen in any hour, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .hours
            .iter()
            .flat_map(|counts| counts.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Counts for a single hour.
    pub fn hour(&self, hour: Hour) -> &BTreeMap<String, u64> {
        &self.hours[hour.index()]
    }
}

/// Owner of the live table.
#[derive(Debug, Default)]
pub struct Aggregator {
    table: AggregateTable,
    generation: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one message. Never fails.
    pub fn apply(&mut self, hour: Hour, category: &str) {
        self.table.increment(hour, category);
        self.generation += 1;
    }

    /// Owned copy of the current counts.
    pub fn snapshot(&self) -> AggregateTable {
        self.table.clone()
    }

    /// Borrowed view of the current counts.
    pub fn table(&self) -> &AggregateTable {
        &self.table
    }

    /// Increases by one on every `apply`; sinks use it to skip unchanged redraws.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
