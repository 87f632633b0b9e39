//! Layout utilities for the dashboard.

use ratatui::layout::{Constraint, Layout, Rect};

/// Height of the status bar under the chart.
pub const STATUS_HEIGHT: u16 = 1;

/// Splits the screen into `[chart, status]`.
pub fn dashboard_split(area: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)]).areas(area)
}
