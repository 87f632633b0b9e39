//! Terminal input handling.
//!
//! A spawned task reads the crossterm event stream. Quit keys cancel the run,
//! resizes are queued for [`TerminalWaiter`], the terminal [`Waiter`].

use std::{io, time::Duration};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::run::{Wake, Waiter};

/// Checks if the event is a quit command: `q`, `Esc` or `Ctrl-C`.
pub fn is_quit_event(event: &Event) -> bool {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) if *kind != KeyEventKind::Release => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
            KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        },
        _ => false,
    }
}

/// What a terminal event means for the run loop, if anything.
pub fn wake_for(event: &Event) -> Option<Wake> {
    if is_quit_event(event) {
        return Some(Wake::Interrupted);
    }
    match event {
        Event::Resize(_, _) => Some(Wake::Redraw),
        _ => None,
    }
}

/// Reads terminal events until cancelled, forwarding redraw requests and
/// turning a quit key into cancellation.
async fn forward_events<S>(events: S, wakes: UnboundedSender<Wake>, cancel: CancellationToken)
where
    S: Stream<Item = io::Result<Event>>,
{
    let mut events = std::pin::pin!(events);
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => return,
            event = events.next() => event,
        };
        match event {
            Some(Ok(event)) => match wake_for(&event) {
                Some(Wake::Interrupted) => {
                    debug!(?event, "quit key");
                    cancel.cancel();
                    return;
                }
                Some(wake) => {
                    if wakes.send(wake).is_err() {
                        return;
                    }
                }
                None => {}
            },
            Some(Err(e)) => {
                warn!(error = %e, "failed to read terminal event, input disabled");
                return;
            }
            None => return,
        }
    }
}

/// Sleeps for the poll interval while watching keys, resizes and the
/// cancellation token.
pub struct TerminalWaiter {
    wakes: UnboundedReceiver<Wake>,
    cancel: CancellationToken,
}

impl TerminalWaiter {
    /// Spawns the event reader, so it must be called inside a runtime.
    pub fn new(cancel: CancellationToken) -> Self {
        let (tx, wakes) = mpsc::unbounded_channel();
        tokio::spawn(forward_events(EventStream::new(), tx, cancel.clone()));
        Self { wakes, cancel }
    }
}

impl Waiter for TerminalWaiter {
    async fn wait(&mut self, interval: Duration) -> Wake {
        tokio::select! {
            _ = tokio::time::sleep(interval) => Wake::Elapsed,
            _ = self.cancel.cancelled() => Wake::Interrupted,
            Some(wake) = self.wakes.recv() => wake,
        }
    }

    fn interrupted(&mut self) -> bool {
        self.cancel.is_cancelled()
    }
}
