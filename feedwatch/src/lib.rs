//! Follows a JSON-lines message feed and charts message counts by hour of day
//! and category, refreshing as new lines are appended.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod log;
pub mod palette;
pub mod record;
pub mod run;
pub mod tail;
pub mod ui;

pub use config::Config;
pub use error::FeedError;
pub use run::{run_feed, FeedStats};
