//! Crossterm-backed chart sink.

use std::{
    io::{self, Stdout},
    path::{Path, PathBuf},
};

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use tracing::warn;

use crate::{
    aggregate::AggregateTable,
    error::FeedError,
    palette::Palette,
    run::FeedStats,
    ui::{
        chart::draw_chart,
        components::{draw_status_bar, feed_hints},
        layout::dashboard_split,
        RefreshSink,
    },
};

/// Draws the chart and status bar into a ratatui terminal.
pub struct TerminalSink<B: Backend> {
    terminal: Terminal<B>,
    palette: Palette,
    source: PathBuf,
    /// Raw mode and the alternate screen were entered by us.
    owns_tty: bool,
    closed: bool,
}

impl TerminalSink<CrosstermBackend<Stdout>> {
    /// Takes over stdout: raw mode, alternate screen, hidden cursor.
    pub fn stdout(palette: Palette, source: impl Into<PathBuf>) -> Result<Self, FeedError> {
        enable_raw_mode().map_err(FeedError::Terminal)?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
            restore_tty();
            return Err(FeedError::Terminal(e));
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                restore_tty();
                return Err(FeedError::Terminal(e));
            }
        };

        let mut sink = Self {
            terminal,
            palette,
            source: source.into(),
            owns_tty: true,
            closed: false,
        };
        sink.terminal.clear().map_err(FeedError::Terminal)?;
        Ok(sink)
    }
}

impl<B: Backend> TerminalSink<B> {
    /// Uses an existing backend and leaves the tty alone.
    pub fn with_backend(
        backend: B,
        palette: Palette,
        source: impl Into<PathBuf>,
    ) -> Result<Self, FeedError> {
        Ok(Self {
            terminal: Terminal::new(backend).map_err(FeedError::Terminal)?,
            palette,
            source: source.into(),
            owns_tty: false,
            closed: false,
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> RefreshSink for TerminalSink<B> {
    fn render(&mut self, snapshot: &AggregateTable, stats: &FeedStats) -> Result<(), FeedError> {
        let palette = &self.palette;
        let source = self.source.as_path();
        self.terminal
            .draw(|f| draw_dashboard(f, snapshot, stats, palette, source))
            .map_err(FeedError::Terminal)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), FeedError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if self.owns_tty {
            disable_raw_mode().map_err(FeedError::Terminal)?;
            execute!(io::stdout(), LeaveAlternateScreen).map_err(FeedError::Terminal)?;
        }
        self.terminal.show_cursor().map_err(FeedError::Terminal)
    }
}

impl<B: Backend> Drop for TerminalSink<B> {
    fn drop(&mut self) {
        if self.owns_tty && !self.closed {
            warn!("terminal sink dropped without close, restoring tty");
            restore_tty();
        }
    }
}

/// Full dashboard frame: chart above, status bar below.
pub fn draw_dashboard(
    f: &mut Frame,
    snapshot: &AggregateTable,
    stats: &FeedStats,
    palette: &Palette,
    source: &Path,
) {
    let [chart_area, status_area] = dashboard_split(f.area());
    draw_chart(f, chart_area, snapshot, palette);
    draw_status_bar(f, status_area, &feed_hints(), stats, source);
}

fn restore_tty() {
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show).ok();
}
