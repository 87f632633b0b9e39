//! Refresh sinks for the live chart.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        throttle.rs                           │
//! │  Throttle ── rate-limits and coalesces render requests       │
//! └───────────────────────────────┬──────────────────────────────┘
//!                                 │ RefreshSink
//!                 ┌───────────────┴───────────────┐
//!                 ▼                               ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │         terminal.rs           │ │        log_sink.rs        │
//! │  TerminalSink ── ratatui      │ │  LogSink ── tracing       │
//! │  chart.rs + components/       │ │  (headless)               │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `chart` - Series building and the hour × category chart widget
//! - `components` - Status bar
//! - `events` - Quit keys and the terminal waiter
//! - `layout` - Screen split
//! - `terminal` - Crossterm-backed sink
//! - `log_sink` - Headless sink
//! - `throttle` - Redraw rate limiting

pub mod chart;
pub mod components;
pub mod events;
pub mod layout;
pub mod log_sink;
pub mod terminal;
pub mod throttle;

use crate::{aggregate::AggregateTable, error::FeedError, run::FeedStats};

pub use log_sink::LogSink;
pub use terminal::TerminalSink;
pub use throttle::Throttle;

/// Something that can show the current counts.
///
/// Each `render` fully replaces what the previous call showed.
pub trait RefreshSink {
    fn render(&mut self, snapshot: &AggregateTable, stats: &FeedStats) -> Result<(), FeedError>;

    /// Releases the visual surface. Called once, at shutdown.
    fn close(&mut self) -> Result<(), FeedError>;
}
