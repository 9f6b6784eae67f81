//! Quick-action buttons under the transcript

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::bot::QuickActions;
use crate::theme::Theme;

/// Gap between buttons
const GAP: usize = 2;

/// Button text for the action at `index`
fn button_label(index: usize, action: &str) -> String {
    format!(" {} {} ", index + 1, action)
}

/// Group button indices into rows that fit `width`
pub fn button_rows(actions: &[String], width: usize) -> Vec<Vec<usize>> {
    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut row: Vec<usize> = Vec::new();
    let mut used = 0;

    for (i, action) in actions.iter().enumerate() {
        let len = button_label(i, action).chars().count();
        let needed = if row.is_empty() { len } else { used + GAP + len };
        if !row.is_empty() && needed > width {
            rows.push(std::mem::take(&mut row));
            used = len;
        } else {
            used = needed;
        }
        row.push(i);
    }

    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

/// Lines needed to draw the buttons, including the separator
pub fn height(actions: &QuickActions, width: u16) -> u16 {
    if actions.actions().is_empty() {
        return 0;
    }
    1 + button_rows(actions.actions(), width as usize).len() as u16
}

/// Draw the separator and the buttons
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    actions: &QuickActions,
    selected: Option<usize>,
    theme: &Theme,
) {
    if area.height == 0 || actions.actions().is_empty() {
        return;
    }

    let separator = Line::from(Span::styled(
        "\u{2500}".repeat(area.width as usize), // ─ horizontal line
        Style::default().fg(theme.border),
    ));
    let mut lines = vec![separator];

    for row in button_rows(actions.actions(), area.width as usize) {
        let mut spans = Vec::new();
        for (n, i) in row.into_iter().enumerate() {
            if n > 0 {
                spans.push(Span::raw(" ".repeat(GAP)));
            }
            let label = button_label(i, &actions.actions()[i]);
            spans.push(create_button(label, actions.is_enabled(), selected == Some(i), theme));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Create a styled button
fn create_button(text: String, enabled: bool, focused: bool, theme: &Theme) -> Span<'static> {
    let style = if !enabled {
        Style::default().fg(theme.fg_muted).add_modifier(Modifier::DIM)
    } else if focused {
        Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg_secondary).bg(theme.bg_tertiary)
    };

    Span::styled(text, style)
}
