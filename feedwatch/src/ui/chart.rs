//! Hour × category line chart.
//!
//! One line per palette category with data, x fixed to hours 0–23.
//! Everything is rebuilt from the snapshot on each call.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{palette::tailwind, Modifier, Style, Stylize},
    symbols::Marker,
    text::Line,
    widgets::{Axis, Block, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame,
};

use crate::{
    aggregate::{AggregateTable, HOURS},
    palette::{CategoryStyle, Palette},
};

pub const CHART_TITLE: &str = "Messages by Hour and Category";
pub const X_TITLE: &str = "Hour of Day (0-23)";
pub const Y_TITLE: &str = "Number of Messages";
pub const EMPTY_TEXT: &str = "Waiting for new messages...";

/// Points of one drawn category.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<'p> {
    pub style: &'p CategoryStyle,
    pub points: Vec<(f64, f64)>,
}

impl Series<'_> {
    pub fn max(&self) -> f64 {
        self.points.iter().map(|(_, y)| *y).fold(0.0, f64::max)
    }
}

/// Series for every palette category with a non-zero total, in palette order.
///
/// Categories missing from the palette are counted in the table but never
/// produce a series.
pub fn build_series<'p>(snapshot: &AggregateTable, palette: &'p Palette) -> Vec<Series<'p>> {
    palette
        .iter()
        .filter(|style| snapshot.category_total(&style.name) > 0)
        .map(|style| Series {
            style,
            points: snapshot
                .series(&style.name)
                .iter()
                .enumerate()
                .map(|(hour, count)| (hour as f64, *count as f64))
                .collect(),
        })
        .collect()
}

/// Top of the y-axis for a given tallest point.
pub fn y_upper_bound(max: f64) -> f64 {
    if max <= 0.0 {
        return 1.0;
    }
    let max = max.ceil() as u64;
    (max + (max / 10).max(1)) as f64
}

/// One label slot per hour, text on every second hour.
pub fn hour_labels() -> Vec<String> {
    (0..HOURS)
        .map(|h| if h % 2 == 0 { h.to_string() } else { String::new() })
        .collect()
}

pub fn draw_chart(f: &mut Frame, area: Rect, snapshot: &AggregateTable, palette: &Palette) {
    let block = Block::bordered()
        .border_style(Style::default().fg(tailwind::GRAY.c600))
        .title(Line::from(CHART_TITLE).bold().centered());

    let series = build_series(snapshot, palette);
    if series.is_empty() {
        f.render_widget(
            Paragraph::new(EMPTY_TEXT)
                .alignment(Alignment::Center)
                .style(Style::default().fg(tailwind::GRAY.c400))
                .block(block),
            area,
        );
        return;
    }

    let top = y_upper_bound(series.iter().map(Series::max).fold(0.0, f64::max));

    // Named lines make up the legend; the unnamed scatter layer only marks points.
    let mut datasets = Vec::with_capacity(series.len() * 2);
    for s in &series {
        let style = Style::default().fg(s.style.color);
        datasets.push(
            Dataset::default()
                .name(s.style.label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style)
                .data(&s.points),
        );
        datasets.push(
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(style.add_modifier(Modifier::BOLD))
                .data(&s.points),
        );
    }

    let axis_style = Style::default().fg(tailwind::GRAY.c400);
    let x_axis = Axis::default()
        .title(X_TITLE)
        .style(axis_style)
        .bounds([0.0, (HOURS - 1) as f64])
        .labels(hour_labels());
    let y_axis = Axis::default()
        .title(Y_TITLE)
        .style(axis_style)
        .bounds([0.0, top])
        .labels([
            "0".to_string(),
            format!("{}", (top / 2.0).round() as u64),
            format!("{}", top as u64),
        ]);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    f.render_widget(chart, area);
}
