use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::core::scrollback::Scrollback;
use crate::tui::component::Component;
use crate::tui::editor::LineEditor;
use crate::tui::layout::{Layout, LayoutState, MIN_HEIGHT, MIN_WIDTH};

/// Paint one complete frame: borders and titles, the visible scrollback
/// slice, the input line with its cursor — or the too-small diagnostic.
/// Everything lands in ratatui's staging buffer; the caller's
/// `terminal.draw` flushes it to the terminal in one update.
pub fn draw_ui(frame: &mut Frame, layout: &Layout, scrollback: &Scrollback, editor: &mut LineEditor) {
    match layout.state() {
        LayoutState::TooSmall => draw_too_small(frame, layout),
        LayoutState::Ready(surfaces) => {
            let border_style = Style::default().fg(Color::Cyan);
            frame.render_widget(
                Block::bordered().border_style(border_style).title(" Output "),
                surfaces.output_border,
            );
            frame.render_widget(
                Block::bordered().border_style(border_style).title(" Input "),
                surfaces.input_border,
            );
            draw_output(frame, surfaces.output, scrollback);
            editor.render(frame, surfaces.input);
        }
    }
}

fn draw_output(frame: &mut Frame, area: Rect, scrollback: &Scrollback) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let text = scrollback
        .visible_slice(area.height as usize)
        .iter()
        .map(|line| truncate_to_width(line, area.width as usize))
        .collect::<Vec<_>>()
        .join("\n");
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::White)),
        area,
    );
}

/// Fixed diagnostic screen shown while the terminal is below minimum.
/// No cursor position is set here, which leaves the cursor hidden.
fn draw_too_small(frame: &mut Frame, layout: &Layout) {
    let text = format!(
        "Terminal too small!\nRequired: {MIN_WIDTH} x {MIN_HEIGHT}, Current: {} x {}",
        layout.width(),
        layout.height()
    );
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::White)),
        frame.area(),
    );
}

/// Truncate a line to the given display width. Editor input is ASCII, but
/// processor replies can be anything, so measure real column widths.
fn truncate_to_width(line: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::layout::Layout;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ready_frame_shows_titles_and_lines() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        let layout = Layout::new(80, 24);
        let scrollback = Scrollback::default();
        scrollback.push("hello there");
        let mut editor = LineEditor::new();

        terminal
            .draw(|f| draw_ui(f, &layout, &scrollback, &mut editor))
            .unwrap();

        let text = rendered_text(&terminal);
        assert!(text.contains(" Output "));
        assert!(text.contains(" Input "));
        assert!(text.contains("hello there"));
    }

    #[test]
    fn test_draw_too_small_frame_shows_diagnostic() {
        let backend = TestBackend::new(20, 5);
        let mut terminal = Terminal::new(backend).unwrap();

        let layout = Layout::new(20, 5);
        let scrollback = Scrollback::default();
        scrollback.push("should not appear");
        let mut editor = LineEditor::new();

        terminal
            .draw(|f| draw_ui(f, &layout, &scrollback, &mut editor))
            .unwrap();

        let text = rendered_text(&terminal);
        assert!(text.contains("Terminal too small!"));
        assert!(!text.contains("should not appear"));
    }

    #[test]
    fn test_truncate_to_width_ascii() {
        assert_eq!(truncate_to_width("abcdef", 4), "abcd");
        assert_eq!(truncate_to_width("ab", 4), "ab");
        assert_eq!(truncate_to_width("ab", 0), "");
    }

    #[test]
    fn test_truncate_to_width_wide_chars() {
        // Each CJK glyph is two columns; a third column can't fit one.
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("日本語", 6), "日本語");
    }
}
