//! Application state definitions

/// Panel visibility settings
#[derive(Debug, Clone)]
pub struct PanelVisibility {
    /// Show the chapter list (left) panel
    pub sidebar: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self { sidebar: true }
    }
}

/// State for the chapter list panel
#[derive(Debug, Clone, Default)]
pub struct SidebarState {
    /// Selected row. Row 0 is the table of contents, chapters follow.
    pub selected_index: usize,
    /// Scroll offset for long chapter lists
    pub scroll_offset: usize,
    /// Visible height in rows (updated on render)
    pub visible_height: usize,
}

impl SidebarState {
    /// Move the selection down, stopping at the last of `rows`
    pub fn select_next(&mut self, rows: usize) {
        if self.selected_index + 1 < rows {
            self.selected_index += 1;
        }
        self.ensure_selection_visible();
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
        self.ensure_selection_visible();
    }

    /// Ensure the selected item is visible by adjusting scroll offset
    pub fn ensure_selection_visible(&mut self) {
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        }
        let visible = self.visible_height.saturating_sub(2);
        if visible > 0 && self.selected_index >= self.scroll_offset + visible {
            self.scroll_offset = self.selected_index.saturating_sub(visible) + 1;
        }
    }
}

/// Scroll state of the transcript pane
#[derive(Debug, Clone)]
pub struct ChatViewState {
    /// Lines scrolled up from the bottom
    pub scroll_back: usize,
    /// Total rendered lines (updated on render)
    pub total_lines: usize,
    /// Visible height in lines (updated on render)
    pub visible_height: usize,
    /// View generation seen on the last render
    pub generation: u64,
}

impl Default for ChatViewState {
    fn default() -> Self {
        Self { scroll_back: 0, total_lines: 0, visible_height: 0, generation: u64::MAX }
    }
}

impl ChatViewState {
    /// Get the maximum allowed scroll-back
    pub fn max_scroll_back(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_height)
    }

    pub fn page_up(&mut self) {
        let page = self.visible_height.max(1);
        self.scroll_back = (self.scroll_back + page).min(self.max_scroll_back());
    }

    pub fn page_down(&mut self) {
        let page = self.visible_height.max(1);
        self.scroll_back = self.scroll_back.saturating_sub(page);
    }

    /// Whether the newest line is on screen
    pub fn is_following(&self) -> bool {
        self.scroll_back == 0
    }

    /// Record the layout of a render. Switching views jumps back to the bottom.
    pub fn update(&mut self, generation: u64, total_lines: usize, visible_height: usize) {
        if generation != self.generation {
            self.generation = generation;
            self.scroll_back = 0;
        }
        self.total_lines = total_lines;
        self.visible_height = visible_height;
        self.scroll_back = self.scroll_back.min(self.max_scroll_back());
    }

    /// First line to draw
    pub fn top_line(&self) -> usize {
        self.max_scroll_back() - self.scroll_back
    }
}

/// State for the message input line
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Input buffer
    pub input: String,
    /// Cursor position in input (characters)
    pub cursor: usize,
    /// Status/error message shown next to the input
    pub message: Option<String>,
    /// Whether message is an error
    pub is_error: bool,
    /// Sent messages
    pub history: Vec<String>,
    /// Current history index when navigating
    pub history_index: Option<usize>,
}

impl InputState {
    /// Set a status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Convert character index to byte index
    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.input.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.input.len())
    }

    fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at cursor
    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.char_to_byte_index(self.cursor);
        self.input.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.input.remove(byte_idx);
        }
    }

    /// Delete character at cursor
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_count() {
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.input.remove(byte_idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Take the input for sending, leaving the line empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        self.history_index = None;
        std::mem::take(&mut self.input)
    }

    /// Put text back after it was rejected
    pub fn restore(&mut self, text: String) {
        self.input = text;
        self.move_end();
    }

    /// Maximum number of history entries to keep
    const MAX_HISTORY: usize = 200;

    pub fn add_to_history(&mut self, text: String) {
        if !text.is_empty() && self.history.last() != Some(&text) {
            if self.history.len() >= Self::MAX_HISTORY {
                self.history.remove(0);
            }
            self.history.push(text);
        }
    }

    /// Navigate history up
    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        match self.history_index {
            None => self.history_index = Some(self.history.len() - 1),
            Some(i) if i > 0 => self.history_index = Some(i - 1),
            _ => {}
        }
        if let Some(i) = self.history_index {
            self.input = self.history[i].clone();
            self.move_end();
        }
    }

    /// Navigate history down
    pub fn history_down(&mut self) {
        if let Some(i) = self.history_index {
            if i + 1 < self.history.len() {
                self.history_index = Some(i + 1);
                self.input = self.history[i + 1].clone();
                self.move_end();
            } else {
                self.history_index = None;
                self.input.clear();
                self.cursor = 0;
            }
        }
    }
}

/// Full application state around the bot
#[derive(Debug, Default)]
pub struct AppState {
    /// Panel visibility settings
    pub panel_visibility: PanelVisibility,
    /// Chapter list state
    pub sidebar: SidebarState,
    /// Transcript scroll state
    pub chat: ChatViewState,
    /// Input line state
    pub input: InputState,
    /// Highlighted quick action
    pub selected_action: Option<usize>,
}

impl AppState {
    /// Cycle the highlighted quick action forwards or backwards
    pub fn cycle_action(&mut self, count: usize, forward: bool) {
        if count == 0 {
            self.selected_action = None;
            return;
        }
        self.selected_action = Some(match (self.selected_action, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_delete_multibyte() {
        let mut input = InputState::default();
        for c in "café".chars() {
            input.insert_char(c);
        }
        input.move_left();
        input.delete_char();
        assert_eq!(input.input, "caé");
        input.delete_char_forward();
        assert_eq!(input.input, "ca");
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn take_clears_line() {
        let mut input = InputState::default();
        input.insert_char('h');
        input.insert_char('i');
        assert_eq!(input.take(), "hi");
        assert!(input.input.is_empty());
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn history_navigation() {
        let mut input = InputState::default();
        input.add_to_history("one".into());
        input.add_to_history("two".into());
        input.add_to_history("two".into());
        assert_eq!(input.history.len(), 2);

        input.history_up();
        assert_eq!(input.input, "two");
        input.history_up();
        assert_eq!(input.input, "one");
        input.history_down();
        assert_eq!(input.input, "two");
        input.history_down();
        assert!(input.input.is_empty());
    }

    #[test]
    fn chat_scroll_is_clamped_and_reset_on_view_switch() {
        let mut chat = ChatViewState::default();
        chat.update(0, 100, 20);
        assert_eq!(chat.top_line(), 80);

        chat.page_up();
        assert_eq!(chat.scroll_back, 20);
        assert_eq!(chat.top_line(), 60);
        for _ in 0..10 {
            chat.page_up();
        }
        assert_eq!(chat.scroll_back, 80);

        chat.update(0, 100, 20);
        assert_eq!(chat.scroll_back, 80);
        chat.update(1, 10, 20);
        assert!(chat.is_following());
        assert_eq!(chat.top_line(), 0);
    }

    #[test]
    fn sidebar_selection_scrolls() {
        let mut sidebar = SidebarState { visible_height: 5, ..Default::default() };
        for _ in 0..6 {
            sidebar.select_next(10);
        }
        assert_eq!(sidebar.selected_index, 6);
        assert_eq!(sidebar.scroll_offset, 4);
        sidebar.select_next(7);
        assert_eq!(sidebar.selected_index, 6);
        for _ in 0..6 {
            sidebar.select_previous();
        }
        assert_eq!(sidebar.scroll_offset, 0);
    }

    #[test]
    fn action_cycling_wraps() {
        let mut state = AppState::default();
        state.cycle_action(3, false);
        assert_eq!(state.selected_action, Some(2));
        state.cycle_action(3, true);
        assert_eq!(state.selected_action, Some(0));
        state.cycle_action(0, true);
        assert_eq!(state.selected_action, None);
    }
}
