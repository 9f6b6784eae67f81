//! Message input line and status line

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::InputState;
use crate::theme::Theme;

const PROMPT: &str = "› ";

/// Draw the input line
pub fn draw(frame: &mut Frame, area: Rect, state: &InputState, busy: bool, theme: &Theme) {
    let prompt_style = if busy {
        Style::default().fg(theme.fg_muted)
    } else {
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
    };

    let mut spans = vec![Span::styled(PROMPT, prompt_style)];
    if state.input.is_empty() {
        spans.push(cursor_span(' ', theme));
        spans.push(Span::styled(
            " Type a message, Tab picks an action, Ctrl-b shows chapters",
            Style::default().fg(theme.fg_muted),
        ));
    } else {
        let base_style = Style::default().fg(theme.fg_secondary);
        let line = build_line_with_cursor(&state.input, state.cursor, base_style, theme);
        spans.extend(line.spans);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status line: the last message, or the in-progress indicator
pub fn draw_status(
    frame: &mut Frame,
    area: Rect,
    state: &InputState,
    loading: bool,
    theme: &Theme,
) {
    let line = match &state.message {
        Some(msg) => {
            let style = if state.is_error {
                Style::default().fg(theme.error)
            } else {
                Style::default().fg(theme.warning)
            };
            Line::from(Span::styled(msg.clone(), style))
        }
        None if loading => {
            Line::from(Span::styled("● Working…", Style::default().fg(theme.info)))
        }
        None => Line::from(Span::styled(
            "Enter send · Alt-1..9 action · Ctrl-n/p/o chapters · Ctrl-t contents · Esc quit",
            Style::default().fg(theme.fg_muted),
        )),
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn cursor_span(c: char, theme: &Theme) -> Span<'static> {
    let cursor_style =
        Style::default().fg(theme.bg_primary).bg(theme.cursor).add_modifier(Modifier::BOLD);
    Span::styled(c.to_string(), cursor_style)
}

/// Build a line with a visible cursor
fn build_line_with_cursor(
    text: &str,
    cursor_pos: usize,
    base_style: Style,
    theme: &Theme,
) -> Line<'static> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();

    // Text before cursor
    if cursor_pos > 0 {
        let before: String = chars.iter().take(cursor_pos).collect();
        spans.push(Span::styled(before, base_style));
    }

    // Cursor character (or space if at end)
    let cursor_char = chars.get(cursor_pos).copied().unwrap_or(' ');
    spans.push(cursor_span(cursor_char, theme));

    // Text after cursor
    if cursor_pos + 1 < chars.len() {
        let after: String = chars.iter().skip(cursor_pos + 1).collect();
        spans.push(Span::styled(after, base_style));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_cursor_at_start() {
        let theme = Theme::default();
        let line = build_line_with_cursor("test", 0, Style::default(), &theme);
        assert_eq!(line.spans.len(), 2); // cursor + rest
    }

    #[test]
    fn build_cursor_at_end() {
        let theme = Theme::default();
        let line = build_line_with_cursor("test", 4, Style::default(), &theme);
        assert_eq!(line.spans.len(), 2); // before + cursor (space)
        assert_eq!(line.spans[1].content, " ");
    }

    #[test]
    fn build_cursor_in_middle_of_multibyte_text() {
        let theme = Theme::default();
        let line = build_line_with_cursor("café", 3, Style::default(), &theme);
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[1].content, "é");
    }
}
