//! # Line Editor
//!
//! Single-line text buffer with cursor movement and command history.
//!
//! ## Responsibilities
//!
//! - Capture printable input (ASCII 32–126) at the cursor
//! - Handle editing (backspace, delete, cursor movement, home/end)
//! - Browse previously submitted commands with up/down
//! - Handle submission (Enter)
//!
//! ## State Management
//!
//! The buffer holds ASCII only, so the cursor is simultaneously a byte
//! index, a char index and a screen column. History browsing is
//! `Option<usize>`: `None` means "not browsing"; submitting always leaves
//! browsing mode.

use log::debug;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// User submitted a non-empty line (Enter pressed).
    Submit(String),
}

pub struct LineEditor {
    buffer: String,
    cursor: usize,
    history: Vec<String>,
    history_index: Option<usize>,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEditor {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            history: Vec::new(),
            history_index: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Replace the buffer with a history entry, cursor at the end.
    fn load_history_entry(&mut self, index: usize) {
        self.buffer = self.history[index].clone();
        self.cursor = self.buffer.len();
        self.history_index = Some(index);
    }

    fn browse_older(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_index {
            None => self.history.len() - 1,
            Some(0) => 0, // already at the oldest entry
            Some(i) => i - 1,
        };
        self.load_history_entry(index);
    }

    fn browse_newer(&mut self) {
        let Some(index) = self.history_index else {
            return; // not browsing
        };
        if index + 1 < self.history.len() {
            self.load_history_entry(index + 1);
        } else {
            // Past the newest entry: leave browsing mode with an empty line.
            self.history_index = None;
            self.buffer.clear();
            self.cursor = 0;
        }
    }

    /// Take the buffer for submission, recording it in history unless it is
    /// the literal `exit` or a duplicate of the previous entry.
    fn submit(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.buffer);
        if text != "exit" && self.history.last() != Some(&text) {
            self.history.push(text.clone());
        }
        self.cursor = 0;
        self.history_index = None;
        debug!("line submitted ({} history entries)", self.history.len());
        Some(text)
    }
}

impl EventHandler for LineEditor {
    type Event = EditorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Input(c) if (' '..='~').contains(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += 1;
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buffer.remove(self.cursor);
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
            }
            TuiEvent::CursorLeft => self.cursor = self.cursor.saturating_sub(1),
            TuiEvent::CursorRight => {
                if self.cursor < self.buffer.len() {
                    self.cursor += 1;
                }
            }
            TuiEvent::CursorHome => self.cursor = 0,
            TuiEvent::CursorEnd => self.cursor = self.buffer.len(),
            TuiEvent::HistoryPrev => self.browse_older(),
            TuiEvent::HistoryNext => self.browse_newer(),
            TuiEvent::Submit => return self.submit().map(EditorEvent::Submit),
            // Non-printable input and events owned by other components.
            _ => {}
        }
        None
    }
}

impl Component for LineEditor {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let visible: String = self.buffer.chars().take(area.width as usize).collect();
        let input = Paragraph::new(visible).style(Style::default().fg(Color::Yellow));
        frame.render_widget(input, area);

        let col = self.cursor.min((area.width - 1) as usize) as u16;
        frame.set_cursor_position((area.x + col, area.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_str(editor: &mut LineEditor, text: &str) {
        for c in text.chars() {
            editor.handle_event(&TuiEvent::Input(c));
        }
    }

    fn submit(editor: &mut LineEditor, text: &str) -> Option<EditorEvent> {
        type_str(editor, text);
        editor.handle_event(&TuiEvent::Submit)
    }

    #[test]
    fn test_insert_and_edit_at_cursor() {
        let mut editor = LineEditor::new();
        type_str(&mut editor, "lok");
        editor.handle_event(&TuiEvent::CursorLeft);
        editor.handle_event(&TuiEvent::Input('o'));
        assert_eq!(editor.text(), "look");
        assert_eq!(editor.cursor(), 3);

        editor.handle_event(&TuiEvent::Backspace);
        assert_eq!(editor.text(), "lok");
        editor.handle_event(&TuiEvent::CursorHome);
        editor.handle_event(&TuiEvent::Delete);
        assert_eq!(editor.text(), "ok");
        editor.handle_event(&TuiEvent::CursorEnd);
        assert_eq!(editor.cursor(), 2);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut editor = LineEditor::new();
        editor.handle_event(&TuiEvent::CursorLeft);
        editor.handle_event(&TuiEvent::Backspace);
        assert_eq!(editor.cursor(), 0);

        type_str(&mut editor, "ab");
        editor.handle_event(&TuiEvent::CursorRight);
        assert_eq!(editor.cursor(), 2);
        editor.handle_event(&TuiEvent::Delete);
        assert_eq!(editor.text(), "ab");
    }

    #[test]
    fn test_unprintable_input_is_ignored() {
        let mut editor = LineEditor::new();
        editor.handle_event(&TuiEvent::Input('\t'));
        editor.handle_event(&TuiEvent::Input('\u{1b}'));
        editor.handle_event(&TuiEvent::Input('é'));
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn test_submit_emits_and_clears() {
        let mut editor = LineEditor::new();
        let event = submit(&mut editor, "look");
        assert_eq!(event, Some(EditorEvent::Submit("look".to_string())));
        assert_eq!(editor.text(), "");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_submit_empty_line_is_noop() {
        let mut editor = LineEditor::new();
        assert_eq!(editor.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_history_suppresses_consecutive_duplicates() {
        let mut editor = LineEditor::new();
        submit(&mut editor, "look");
        submit(&mut editor, "look");
        assert_eq!(editor.history(), ["look"]);

        submit(&mut editor, "north");
        submit(&mut editor, "look");
        assert_eq!(editor.history(), ["look", "north", "look"]);
    }

    #[test]
    fn test_exit_is_never_recorded() {
        let mut editor = LineEditor::new();
        submit(&mut editor, "look");
        submit(&mut editor, "exit");
        assert_eq!(editor.history(), ["look"]);
    }

    #[test]
    fn test_history_navigation() {
        let mut editor = LineEditor::new();
        for cmd in ["a", "b", "c"] {
            submit(&mut editor, cmd);
        }

        // Up three times, then down once: lands on "b".
        for _ in 0..3 {
            editor.handle_event(&TuiEvent::HistoryPrev);
        }
        editor.handle_event(&TuiEvent::HistoryNext);
        assert_eq!(editor.text(), "b");
        assert_eq!(editor.cursor(), 1);
    }

    #[test]
    fn test_history_up_stops_at_oldest() {
        let mut editor = LineEditor::new();
        for cmd in ["a", "b", "c"] {
            submit(&mut editor, cmd);
        }
        for _ in 0..10 {
            editor.handle_event(&TuiEvent::HistoryPrev);
        }
        assert_eq!(editor.text(), "a");
    }

    #[test]
    fn test_history_down_past_newest_clears_line() {
        let mut editor = LineEditor::new();
        submit(&mut editor, "a");
        editor.handle_event(&TuiEvent::HistoryPrev);
        assert_eq!(editor.text(), "a");
        editor.handle_event(&TuiEvent::HistoryNext);
        assert_eq!(editor.text(), "");

        // No longer browsing: down is a no-op now.
        editor.handle_event(&TuiEvent::HistoryNext);
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn test_history_down_without_browsing_is_noop() {
        let mut editor = LineEditor::new();
        submit(&mut editor, "a");
        type_str(&mut editor, "draft");
        editor.handle_event(&TuiEvent::HistoryNext);
        assert_eq!(editor.text(), "draft");
    }

    #[test]
    fn test_render_clamps_cursor_to_width() {
        let backend = TestBackend::new(4, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut editor = LineEditor::new();
        type_str(&mut editor, "abcdefgh");

        terminal
            .draw(|f| {
                let area = f.area();
                editor.render(f, area);
            })
            .unwrap();

        let (x, _y) = terminal.get_cursor_position().map(|p| (p.x, p.y)).unwrap();
        assert_eq!(x, 3, "cursor must clamp to the last input column");
    }
}
