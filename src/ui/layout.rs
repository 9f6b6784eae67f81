//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Paragraph,
};

use crate::theme::Theme;

/// Minimum width for the chapter list panel
const SIDEBAR_MIN_WIDTH: u16 = 24;

/// Areas of the chat screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub header: Rect,
    pub sidebar: Option<Rect>,
    pub chat: Rect,
    pub quick_actions: Rect,
    pub input: Rect,
    pub status: Rect,
}

/// Split the screen into header, panels, quick actions, input and status
pub fn screen_areas(area: Rect, show_sidebar: bool, quick_action_height: u16) -> ScreenAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(quick_action_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let (sidebar, chat) = if show_sidebar {
        let sidebar_width = (rows[1].width / 4).max(SIDEBAR_MIN_WIDTH);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(20)])
            .split(rows[1]);
        (Some(columns[0]), columns[1])
    } else {
        (None, rows[1])
    };

    ScreenAreas {
        header: rows[0],
        sidebar,
        chat,
        quick_actions: rows[2],
        input: rows[3],
        status: rows[4],
    }
}

/// Draw a full-screen placeholder message
pub fn draw_placeholder(frame: &mut Frame, message: &str, theme: &Theme) {
    let area = frame.area();

    let style = Style::default().fg(theme.fg_muted).bg(theme.bg_primary);

    let placeholder = Paragraph::new(message).style(style).alignment(Alignment::Center);

    frame.render_widget(placeholder, area);
}
