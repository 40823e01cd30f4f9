//! # TUI Runtime
//!
//! The ratatui-specific layer: owns the terminal, runs the render loop,
//! and translates keyboard events into editor/scrollback mutations.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Loop Shape
//!
//! Each iteration does exactly two things while the running flag is set:
//!
//! - **poll**: fetch at most one pending event without blocking and route
//!   it (resize → layout rebuild, keys → editor/scrollback).
//! - **draw**: paint the whole frame through one `terminal.draw` call —
//!   ratatui stages every surface update and flushes atomically, so a
//!   frame is never torn across multiple terminal writes.
//!
//! A fixed ~20 ms sleep paces the loop. It is not a precision timer; it
//! bounds CPU while keeping input latency under the tick. Stopping is
//! cooperative: the flag is checked at the top of each iteration, so a
//! signal takes effect within one tick.

mod component;
mod editor;
mod event;
mod layout;
mod ui;

pub use component::{Component, EventHandler};
pub use editor::{EditorEvent, LineEditor};
pub use event::TuiEvent;
pub use layout::{INPUT_HEIGHT, Layout, LayoutState, MIN_HEIGHT, MIN_WIDTH, Surfaces};
pub use ui::draw_ui;

use log::{debug, info, warn};
use std::fmt;
use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossterm::execute;
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::core::command::{self, CommandProcessor, Directive};
use crate::core::config::ResolvedConfig;
use crate::core::scrollback::Scrollback;
use crate::signal::{SignalKind, SignalRegistry};

const WELCOME_NOTICE: &str = "Console UI Ready. Type 'help' or 'exit'.";
const RESIZED_NOTICE: &str = "Terminal resized to usable dimensions.";

/// Startup failures. All are fatal to initialization; the terminal is
/// restored to its original mode before any of these reaches the caller.
#[derive(Debug)]
pub enum InitError {
    /// Raw mode, terminal backend or size query failed.
    Terminal(io::Error),
    /// The terminal reports no color capability (`TERM` unset or `dumb`).
    NoColorSupport,
    /// The color attributes used by the UI could not be established.
    CannotSetColor(io::Error),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Terminal(e) => write!(f, "terminal init failed: {e}"),
            InitError::NoColorSupport => write!(f, "terminal has no color support"),
            InitError::CannotSetColor(e) => write!(f, "cannot set terminal colors: {e}"),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::Terminal(e) | InitError::CannotSetColor(e) => Some(e),
            InitError::NoColorSupport => None,
        }
    }
}

/// Scoped terminal-mode holder. Records which modes it actually entered
/// and restores exactly those, once, on every exit path — including
/// early-return failures during initialization.
struct TerminalGuard {
    raw: bool,
    alternate: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self, InitError> {
        enable_raw_mode().map_err(InitError::Terminal)?;
        let mut guard = Self {
            raw: true,
            alternate: false,
        };
        execute!(io::stdout(), EnterAlternateScreen).map_err(InitError::Terminal)?;
        guard.alternate = true;
        info!("entered raw mode and alternate screen");
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.alternate {
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
        }
        if self.raw {
            let _ = disable_raw_mode();
        }
    }
}

/// `TERM=dumb` (or no `TERM` at all) means no color, which the original
/// console treats as unusable.
fn color_support() -> bool {
    match std::env::var("TERM") {
        Ok(term) => term != "dumb",
        Err(_) => false,
    }
}

/// Audible alert for input rejected while the layout is unusable.
fn bell() {
    let mut out = io::stdout();
    let _ = out.write_all(b"\x07");
    let _ = out.flush();
}

/// The console runtime: terminal, layout, scrollback, line editor and the
/// command processor behind its trait boundary.
pub struct Console {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    layout: Layout,
    scrollback: Scrollback,
    editor: LineEditor,
    processor: Box<dyn CommandProcessor>,
    registry: Arc<SignalRegistry>,
    running: Arc<AtomicBool>,
    tick: Duration,
    // Declared last: restores the terminal after the ratatui handle is gone.
    _guard: TerminalGuard,
}

impl Console {
    /// Initialize the terminal and wire the stop signals.
    ///
    /// Order matters: raw mode first (held by the guard so failure paths
    /// restore it), then the color checks, then geometry, then signal
    /// registration. Any error here leaves the terminal as we found it.
    pub fn new(
        config: &ResolvedConfig,
        processor: Box<dyn CommandProcessor>,
        registry: Arc<SignalRegistry>,
    ) -> Result<Self, InitError> {
        let guard = TerminalGuard::enter()?;

        if !color_support() {
            return Err(InitError::NoColorSupport);
        }
        // Prove we can write color attributes before the first frame needs them.
        execute!(io::stdout(), SetForegroundColor(Color::White), ResetColor)
            .map_err(InitError::CannotSetColor)?;

        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend).map_err(InitError::Terminal)?;

        let (width, height) = crossterm::terminal::size().map_err(InitError::Terminal)?;
        let layout = Layout::new(width, height);

        let running = Arc::new(AtomicBool::new(false));
        for kind in [SignalKind::Interrupt, SignalKind::Terminate] {
            let flag = Arc::clone(&running);
            registry.register(kind, move || flag.store(false, Ordering::Relaxed));
        }

        info!(
            "console initialized: {width}x{height}, layout ready: {}",
            layout.is_ready()
        );

        Ok(Self {
            terminal,
            layout,
            scrollback: Scrollback::new(config.scrollback_lines),
            editor: LineEditor::new(),
            processor,
            registry,
            running,
            tick: Duration::from_millis(config.tick_ms),
            _guard: guard,
        })
    }

    /// The flag the signal callbacks clear; safe to observe from any thread.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Request a cooperative stop at the next iteration boundary.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Drive the poll/draw loop until stopped by `exit` or a signal.
    pub fn run(&mut self) -> io::Result<()> {
        self.running.store(true, Ordering::Relaxed);
        if self.layout.is_ready() {
            self.scrollback.push(WELCOME_NOTICE);
        }

        while self.running.load(Ordering::Relaxed) {
            if let Some(event) = event::poll_event()? {
                self.route_event(event)?;
            }
            self.draw()?;
            thread::sleep(self.tick);
        }

        info!("render loop stopped");
        // Late signals become no-ops once the console is out of the loop.
        self.registry.unregister(SignalKind::Interrupt);
        self.registry.unregister(SignalKind::Terminate);
        Ok(())
    }

    fn route_event(&mut self, event: TuiEvent) -> io::Result<()> {
        match event {
            TuiEvent::Resize(width, height) => self.handle_resize(width, height)?,
            // Interrupt takes the same path as an out-of-band SIGINT.
            TuiEvent::Interrupt => {
                debug!("Ctrl+C received, dispatching interrupt");
                self.registry.dispatch(SignalKind::Interrupt);
            }
            // Everything else is rejected while the layout is unusable.
            _ if !self.layout.is_ready() => bell(),
            TuiEvent::ScrollPageUp => {
                let page = self.page_height();
                self.scrollback.scroll_back(page, page);
            }
            TuiEvent::ScrollPageDown => {
                let page = self.page_height();
                self.scrollback.scroll_forward(page);
            }
            other => {
                if let Some(EditorEvent::Submit(text)) = self.editor.handle_event(&other) {
                    self.submit(text);
                }
            }
        }
        Ok(())
    }

    /// Viewport height of the output content surface, used as the page
    /// size for PgUp/PgDn.
    fn page_height(&self) -> usize {
        self.layout
            .surfaces()
            .map(|s| s.output.height as usize)
            .unwrap_or(0)
    }

    fn handle_resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        let was_too_small = !self.layout.is_ready();
        self.layout.resize(width, height);
        // Full-screen clear before the rebuilt surfaces are drawn, so no
        // cell of the old geometry survives.
        self.terminal.clear()?;
        if was_too_small && self.layout.is_ready() {
            info!("layout recovered at {width}x{height}");
            self.scrollback.push(RESIZED_NOTICE);
        } else {
            debug!("resized to {width}x{height}, ready: {}", self.layout.is_ready());
        }
        Ok(())
    }

    fn submit(&mut self, text: String) {
        self.scrollback.push(format!("> {text}"));
        self.scrollback.reset_scroll();
        match command::dispatch(&text, self.processor.as_mut()) {
            Directive::Stop => {
                info!("exit command received");
                self.stop();
            }
            Directive::Clear => self.scrollback.clear(),
            Directive::Reply(message) => self.scrollback.push(message),
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let Self {
            terminal,
            layout,
            scrollback,
            editor,
            ..
        } = self;
        terminal.draw(|frame| ui::draw_ui(frame, layout, scrollback, editor))?;
        Ok(())
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        // Idempotent when run() already did this; covers early-exit paths.
        self.registry.unregister(SignalKind::Interrupt);
        self.registry.unregister(SignalKind::Terminate);
        if self.running.swap(false, Ordering::Relaxed) {
            warn!("console dropped while still running");
        }
    }
}
