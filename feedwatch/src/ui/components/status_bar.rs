//! Inline status bar: key hints followed by feed counters.

use std::path::Path;

use ratatui::{
    prelude::*,
    style::{palette::tailwind, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::run::FeedStats;

/// Key hints shown on the left of the bar.
pub fn feed_hints() -> Vec<(&'static str, &'static str)> {
    vec![("q", "quit")]
}

/// Draws the bar as `key:desc │ 12 messages │ last 14h tech │ 1 dropped │ path`.
pub fn draw_status_bar(
    f: &mut Frame,
    area: Rect,
    hints: &[(&str, &str)],
    stats: &FeedStats,
    source: &Path,
) {
    let mut spans = Vec::new();
    let separator = Span::styled(" │ ", Style::default().fg(tailwind::GRAY.c600));

    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(separator.clone());
        }
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(tailwind::YELLOW.c400)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(":{}", desc),
            Style::default().fg(tailwind::GRAY.c400),
        ));
    }

    spans.push(separator.clone());
    spans.push(Span::styled(
        format!("{} messages", stats.aggregated),
        Style::default().fg(tailwind::CYAN.c400),
    ));

    if let Some((hour, category)) = &stats.last {
        spans.push(separator.clone());
        spans.push(Span::styled(
            format!("last {}h {}", hour.get(), category),
            Style::default().fg(tailwind::GRAY.c300),
        ));
    }

    if stats.dropped > 0 {
        spans.push(separator.clone());
        spans.push(Span::styled(
            format!("{} dropped", stats.dropped),
            Style::default().fg(tailwind::RED.c400),
        ));
    }

    spans.push(separator);
    spans.push(Span::styled(
        source.display().to_string(),
        Style::default().fg(tailwind::GRAY.c500),
    ));

    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Left),
        area,
    );
}
