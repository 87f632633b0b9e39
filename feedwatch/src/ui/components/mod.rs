//! Reusable UI components.

mod status_bar;

pub use status_bar::{draw_status_bar, feed_hints};
