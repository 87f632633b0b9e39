//! Headless sink: reports per-category totals through `tracing`.

use tracing::info;

use crate::{
    aggregate::AggregateTable, error::FeedError, palette::Palette, run::FeedStats,
    ui::RefreshSink,
};

pub struct LogSink {
    palette: Palette,
    renders: u64,
}

impl LogSink {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            renders: 0,
        }
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// `Label=total` for each drawn category, palette order.
    pub fn summary(&self, snapshot: &AggregateTable) -> String {
        self.palette
            .iter()
            .filter_map(|style| {
                let total = snapshot.category_total(&style.name);
                (total > 0).then(|| format!("{}={}", style.label, total))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl RefreshSink for LogSink {
    fn render(&mut self, snapshot: &AggregateTable, stats: &FeedStats) -> Result<(), FeedError> {
        self.renders += 1;
        let unlisted: u64 = snapshot
            .categories()
            .into_iter()
            .filter(|name| !self.palette.contains(name))
            .map(|name| snapshot.category_total(name))
            .sum();

        info!(
            total = snapshot.total(),
            dropped = stats.dropped,
            unlisted,
            "counts by category: {}",
            self.summary(snapshot)
        );
        Ok(())
    }

    fn close(&mut self) -> Result<(), FeedError> {
        info!(renders = self.renders, "log sink closed");
        Ok(())
    }
}
