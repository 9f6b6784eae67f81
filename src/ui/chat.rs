//! Transcript pane

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use textwrap::{Options, wrap};

use super::markdown::render_markdown;
use crate::app::state::ChatViewState;
use crate::bot::Bot;
use crate::chat::{ChatMessage, MessageKind, Sender};
use crate::theme::Theme;

/// Draw the displayed transcript under the view banner
pub fn draw(frame: &mut Frame, area: Rect, bot: &Bot, state: &mut ChatViewState, theme: &Theme) {
    let views = bot.views();
    let block = Block::default()
        .title(format!(" {} ", views.banner()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Reserve 1 column for the scrollbar
    let width = inner.width.saturating_sub(2) as usize;
    let mut lines = transcript_lines(views.displayed(), theme, width);
    if bot.is_loading() {
        lines.push(Line::from(Span::styled(
            "Mentor is typing…",
            Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
        )));
    }

    let visible_height = inner.height as usize;
    state.update(views.generation(), lines.len(), visible_height);
    let top = state.top_line();
    let total_lines = lines.len();
    let visible: Vec<Line> = lines.into_iter().skip(top).take(visible_height).collect();

    let content_area =
        Rect { x: inner.x, y: inner.y, width: inner.width.saturating_sub(1), height: inner.height };
    frame.render_widget(Paragraph::new(visible), content_area);

    let scrollbar_x = inner.x + inner.width.saturating_sub(1);
    draw_scrollbar(frame, scrollbar_x, inner.y, inner.height, top, total_lines, theme);
}

/// Styled lines for a transcript, one labelled block per message
pub fn transcript_lines(
    messages: &[ChatMessage],
    theme: &Theme,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for message in messages {
        if !lines.is_empty() {
            lines.push(Line::default());
        }

        let label_style = Style::default()
            .fg(theme.bubble(message.sender, message.kind))
            .add_modifier(Modifier::BOLD);
        lines.push(Line::from(Span::styled(label(message), label_style)));

        match message.sender {
            Sender::User => {
                let style = Style::default().fg(theme.fg_secondary);
                for row in wrap(&message.text, Options::new(width.max(1))) {
                    lines.push(Line::from(Span::styled(row.into_owned(), style)));
                }
            }
            Sender::Bot => lines.extend(render_markdown(&message.text, theme, width)),
        }
    }

    lines
}

fn label(message: &ChatMessage) -> &'static str {
    match (message.sender, message.kind) {
        (Sender::User, _) => "You",
        (Sender::Bot, MessageKind::Default) => "Mentor",
        (Sender::Bot, MessageKind::Notion) => "Mentor · course",
        (Sender::Bot, MessageKind::Ai) => "Mentor · tutor",
    }
}

/// Draw a scrollbar indicator
fn draw_scrollbar(
    frame: &mut Frame,
    x: u16,
    y: u16,
    height: u16,
    top: usize,
    total_lines: usize,
    theme: &Theme,
) {
    let height = height as usize;
    if total_lines <= height || height == 0 {
        return;
    }

    let thumb_height = ((height * height) / total_lines).max(1);
    let max_top = total_lines - height;
    let thumb_top = ((height - thumb_height) * top) / max_top.max(1);

    for i in 0..height {
        let in_thumb = i >= thumb_top && i < thumb_top + thumb_height;
        let (ch, style) = if in_thumb {
            ("█", Style::default().fg(theme.accent_secondary))
        } else {
            ("░", Style::default().fg(theme.bg_tertiary))
        };

        frame.render_widget(
            Paragraph::new(ch).style(style),
            Rect { x, y: y.saturating_add(i as u16), width: 1, height: 1 },
        );
    }
}
