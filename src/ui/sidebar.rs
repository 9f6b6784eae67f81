//! Chapter list panel

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::state::SidebarState;
use crate::bot::Bot;
use crate::chat::View;
use crate::theme::Theme;

/// Status indicators for chapters
const STATUS_COMPLETED: &str = "✓";
const STATUS_CURRENT: &str = "●";
const STATUS_TOC: &str = "☰";

/// One row of the chapter list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    pub icon: String,
    pub title: String,
    /// Percentage, for unlocked chapters
    pub progress: Option<u8>,
    pub locked: bool,
    /// Row of the displayed view
    pub current: bool,
}

/// Rows in display order: the table of contents, then every chapter
pub fn sidebar_rows(bot: &Bot) -> Vec<SidebarRow> {
    let navigator = bot.navigator();
    let view = bot.views().current_view();

    let mut rows = vec![SidebarRow {
        icon: STATUS_TOC.to_string(),
        title: "Table of Contents".to_string(),
        progress: None,
        locked: false,
        current: *view == View::Toc,
    }];

    for chapter in navigator.chapters() {
        let current = view.chapter_title() == Some(chapter.title.as_str());
        let completed = navigator.is_completed(&chapter.title);
        let locked = !navigator.is_unlocked(&chapter.title);

        let icon = if completed {
            STATUS_COMPLETED.to_string()
        } else if current {
            STATUS_CURRENT.to_string()
        } else {
            chapter.number.to_string()
        };

        rows.push(SidebarRow {
            icon,
            title: chapter.title.clone(),
            progress: (!locked).then(|| bot.chapter_progress(&chapter.title)),
            locked,
            current,
        });
    }

    rows
}

/// Draw the chapter list
pub fn draw(frame: &mut Frame, area: Rect, bot: &Bot, state: &mut SidebarState, theme: &Theme) {
    let block = Block::default()
        .title(" Chapters ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Update visible height for scroll calculations
    state.visible_height = inner.height as usize;

    let rows = sidebar_rows(bot);
    state.selected_index = state.selected_index.min(rows.len().saturating_sub(1));
    state.ensure_selection_visible();

    let width = inner.width as usize;
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(state.scroll_offset)
        .take(inner.height as usize)
        .map(|(i, row)| render_row(row, i == state.selected_index, width, theme))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_row(row: &SidebarRow, selected: bool, width: usize, theme: &Theme) -> Line<'static> {
    let style = if selected {
        Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD)
    } else if row.locked {
        Style::default().fg(theme.fg_muted)
    } else if row.current {
        Style::default().fg(theme.accent_secondary)
    } else {
        Style::default().fg(theme.fg_primary)
    };

    let progress = row.progress.map(|p| format!(" {:>3}%", p)).unwrap_or_default();
    let head = format!("{} ", row.icon);
    let room = width.saturating_sub(head.chars().count() + progress.chars().count());
    let mut title: String = row.title.chars().take(room).collect();
    if title.chars().count() < row.title.chars().count() && room > 0 {
        title.pop();
        title.push('…');
    }
    let padding = " ".repeat(room.saturating_sub(title.chars().count()));

    let icon_style = if row.icon == STATUS_COMPLETED && !selected {
        Style::default().fg(theme.success)
    } else {
        style
    };

    Line::from(vec![
        Span::styled(head, icon_style),
        Span::styled(format!("{}{}", title, padding), style),
        Span::styled(progress, style),
    ])
}
