//! UI rendering components

pub mod chat;
pub mod input_line;
pub mod layout;
pub mod markdown;
pub mod quick_actions;
pub mod sidebar;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::state::AppState;
use crate::bot::{Bot, BotState};
use crate::theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, bot: &Bot, state: &mut AppState, theme: &Theme) {
    if bot.state() == BotState::Loading && bot.is_loading() {
        layout::draw_placeholder(frame, "Loading course…", theme);
        return;
    }

    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let actions = bot.quick_actions();
    let areas = layout::screen_areas(
        area,
        state.panel_visibility.sidebar,
        quick_actions::height(actions, area.width),
    );

    draw_header(frame, areas.header, bot, theme);
    if let Some(sidebar_area) = areas.sidebar {
        sidebar::draw(frame, sidebar_area, bot, &mut state.sidebar, theme);
    }
    chat::draw(frame, areas.chat, bot, &mut state.chat, theme);
    quick_actions::draw(frame, areas.quick_actions, actions, state.selected_action, theme);
    input_line::draw(frame, areas.input, &state.input, bot.is_busy(), theme);
    input_line::draw_status(frame, areas.status, &state.input, bot.is_loading(), theme);
}

/// Title on the left, course progress on the right
fn draw_header(frame: &mut Frame, area: Rect, bot: &Bot, theme: &Theme) {
    let navigator = bot.navigator();
    let progress = format!(
        "{}/{} chapters complete ",
        navigator.completed_count(),
        navigator.chapters().len()
    );
    let title = format!(" {}", bot.views().header_title());
    let gap = (area.width as usize)
        .saturating_sub(title.chars().count() + progress.chars().count());

    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(gap)),
        Span::styled(progress, Style::default().fg(theme.fg_muted)),
    ]);

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg_secondary)), area);
}
