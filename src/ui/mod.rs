//! Terminal front-end
//!
//! A single blocking loop owns the [`App`] and consumes [`AppEvent`]s from
//! one queue. A dedicated thread reads the terminal and the refresh task
//! posts catalogs into the same queue.

pub mod app;
mod event;
pub mod input;
pub mod view;

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    event::{self as term_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{debug, info};

pub use app::App;
pub use event::AppEvent;
pub use input::{Action, KeyBinding, KeyCombo};
pub use view::PaneLayout;

use crate::error::TuiError;
use crate::selection::ListKind;

const INPUT_POLL: Duration = Duration::from_millis(100);

/// Redraw interval when no event arrives, so new log lines show up
const TICK_RATE: Duration = Duration::from_millis(250);

/// Raw mode and alternate screen, restored on drop
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Terminal reader thread, stopped on drop
struct InputThread {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputThread {
    fn spawn(events: Sender<AppEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                match term_event::poll(INPUT_POLL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        debug!(error = %e, "Terminal poll failed");
                        break;
                    }
                }
                let event = match term_event::read() {
                    Ok(Event::Key(key)) => AppEvent::Key(key),
                    Ok(Event::Resize(_, _)) => AppEvent::Resize,
                    Ok(_) => continue,
                    Err(e) => {
                        debug!(error = %e, "Terminal read failed");
                        break;
                    }
                };
                if events.send(event).is_err() {
                    break;
                }
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for InputThread {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Run the interactive session until the operator quits
///
/// `sender` is the producer side of `events`; a clone of it feeds the
/// input thread. Blocks the calling thread.
///
/// # Errors
///
/// Returns `TuiError` if the terminal cannot be set up or drawn, or if every
/// producer disconnects.
pub fn run(
    mut app: App,
    events: Receiver<AppEvent>,
    sender: Sender<AppEvent>,
) -> Result<App, TuiError> {
    let mut guard = TerminalGuard::enter()?;
    let _input = InputThread::spawn(sender);
    info!("Terminal UI started");

    loop {
        let size = guard.terminal.size()?;
        let layout = PaneLayout::compute(Rect::new(0, 0, size.width, size.height));
        for list in ListKind::ALL {
            app.set_viewport(list, layout.rows(list));
        }

        guard.terminal.draw(|f| view::draw(f, &app))?;

        match events.recv_timeout(TICK_RATE) {
            Ok(event) => app.handle(event),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return Err(TuiError::ChannelClosed),
        }

        // Apply whatever queued up while drawing before the next frame.
        while !app.should_quit() {
            match events.try_recv() {
                Ok(event) => app.handle(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Err(TuiError::ChannelClosed),
            }
        }

        if app.should_quit() {
            info!("Terminal UI stopped");
            return Ok(app);
        }
    }
}
