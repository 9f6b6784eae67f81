//! Theming system for Mentor

mod tokyo_night;

pub use tokyo_night::TOKYO_NIGHT;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::chat::{MessageKind, Sender};

/// A color theme for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Chat bubbles (label colors)
    pub bubble_user: Color,
    pub bubble_bot: Color,
    pub bubble_notion: Color,
    pub bubble_ai: Color,

    // Markdown
    pub md_heading: Color,
    pub md_code: Color,
    pub md_link: Color,
    pub md_quote: Color,

    // UI elements
    pub border: Color,
    pub cursor: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}

impl Theme {
    /// Label color for a transcript message
    pub fn bubble(&self, sender: Sender, kind: MessageKind) -> Color {
        match (sender, kind) {
            (Sender::User, _) => self.bubble_user,
            (Sender::Bot, MessageKind::Default) => self.bubble_bot,
            (Sender::Bot, MessageKind::Notion) => self.bubble_notion,
            (Sender::Bot, MessageKind::Ai) => self.bubble_ai,
        }
    }
}
