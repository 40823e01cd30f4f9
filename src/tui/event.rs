use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

/// TUI-specific input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    // Line editor events
    Input(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    HistoryPrev,
    HistoryNext,
    Submit,

    // Scrollback events
    ScrollPageUp,
    ScrollPageDown,

    // Loop-level events
    Resize(u16, u16),
    Interrupt, // Ctrl+C — raw mode swallows the kernel's SIGINT
}

/// Fetch at most one pending event without blocking. The render loop calls
/// this once per iteration, so pacing stays bounded by the tick sleep.
pub fn poll_event() -> io::Result<Option<TuiEvent>> {
    if !event::poll(Duration::ZERO)? {
        return Ok(None);
    }
    let mapped = match event::read()? {
        // Release events would double every keystroke on kitty-protocol terminals
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            match (key.modifiers, key.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::Interrupt),
                (_, KeyCode::Char(c)) => Some(TuiEvent::Input(c)),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Delete) => Some(TuiEvent::Delete),
                (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
                (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
                (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
                (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
                (_, KeyCode::Up) => Some(TuiEvent::HistoryPrev),
                (_, KeyCode::Down) => Some(TuiEvent::HistoryNext),
                (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
                (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
                _ => None,
            }
        }
        Event::Resize(cols, rows) => Some(TuiEvent::Resize(cols, rows)),
        _ => None,
    };
    Ok(mapped)
}
