//! Per-view chat transcripts
//!
//! Every view (the table of contents and each chapter) has its own
//! transcript. Exactly one is displayed at a time; the others are kept in
//! stored slots and swapped in when their view becomes current.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info};

/// Banner text for the table of contents view
pub const TOC_BANNER: &str = "Table of Contents";

/// A transcript key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum View {
    /// Table of contents
    Toc,
    /// A chapter, keyed by its title
    Chapter(String),
}

impl View {
    pub fn chapter(title: impl Into<String>) -> Self {
        View::Chapter(title.into())
    }

    /// Chapter title, if this is a chapter view
    pub fn chapter_title(&self) -> Option<&str> {
        match self {
            View::Toc => None,
            View::Chapter(title) => Some(title),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Toc => write!(f, "toc"),
            View::Chapter(title) => write!(f, "chapter '{}'", title),
        }
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// How a bot message is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Plain bot or user text
    Default,
    /// Course content
    Notion,
    /// Tutor answer
    Ai,
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub kind: MessageKind,
    /// Markdown source
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, kind: MessageKind::Default, text: text.into() }
    }

    pub fn bot(kind: MessageKind, text: impl Into<String>) -> Self {
        Self { sender: Sender::Bot, kind, text: text.into() }
    }
}

/// Address of a message that a reveal or stream is still writing to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle {
    pub view: View,
    pub index: usize,
}

/// Owns every transcript and the current view pointer
#[derive(Debug, Clone)]
pub struct ViewManager {
    /// View whose transcript is displayed
    current: View,
    /// Transcript currently displayed
    displayed: Vec<ChatMessage>,
    /// Stored transcripts, one slot per visited view
    stored: HashMap<View, Vec<ChatMessage>>,
    /// Banner above the transcript
    banner: String,
    /// Header title
    header_title: String,
    /// Course title shown in the header for the table of contents
    course_title: String,
    /// Bumped on every reload of the displayed transcript
    generation: u64,
}

impl ViewManager {
    /// Start on the table of contents with an empty transcript
    pub fn new(course_title: impl Into<String>) -> Self {
        let course_title = course_title.into();
        let mut stored = HashMap::new();
        stored.insert(View::Toc, Vec::new());

        Self {
            current: View::Toc,
            displayed: Vec::new(),
            stored,
            banner: TOC_BANNER.to_string(),
            header_title: course_title.clone(),
            course_title,
            generation: 0,
        }
    }

    pub fn current_view(&self) -> &View {
        &self.current
    }

    pub fn displayed(&self) -> &[ChatMessage] {
        &self.displayed
    }

    pub fn banner(&self) -> &str {
        &self.banner
    }

    pub fn header_title(&self) -> &str {
        &self.header_title
    }

    /// Changes whenever a different transcript is swapped in
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Transcript for any view, displayed or stored
    pub fn transcript(&self, view: &View) -> &[ChatMessage] {
        if *view == self.current {
            &self.displayed
        } else {
            self.stored.get(view).map(Vec::as_slice).unwrap_or(&[])
        }
    }

    /// Whether a view has any messages yet
    pub fn has_messages(&self, view: &View) -> bool {
        !self.transcript(view).is_empty()
    }

    /// Make `view` the displayed view
    ///
    /// The outgoing transcript is snapshotted when non-empty and the
    /// destination slot is created if missing. Switching to the view that is
    /// already displayed does not reload anything.
    pub fn switch_to_view(&mut self, view: View) {
        if !self.displayed.is_empty() {
            self.stored.insert(self.current.clone(), self.displayed.clone());
        }
        self.stored.entry(view.clone()).or_default();

        if view != self.current {
            info!("Switching view from {} to {}", self.current, view);
            self.displayed = self.stored.get(&view).cloned().unwrap_or_default();
            self.current = view;
            self.generation += 1;
        } else {
            debug!("Already on {}", view);
        }

        match &self.current {
            View::Toc => {
                self.banner = TOC_BANNER.to_string();
                self.header_title = self.course_title.clone();
            }
            View::Chapter(title) => {
                self.banner = title.clone();
                self.header_title = title.clone();
            }
        }
    }

    /// Append to the displayed transcript
    pub fn push(&mut self, message: ChatMessage) -> MessageHandle {
        let view = self.current.clone();
        self.push_to(view, message)
    }

    /// Append to the transcript of `view`
    pub fn push_to(&mut self, view: View, message: ChatMessage) -> MessageHandle {
        let messages = self.slot_mut(&view);
        messages.push(message);
        let index = messages.len() - 1;
        MessageHandle { view, index }
    }

    pub fn message(&self, handle: &MessageHandle) -> Option<&ChatMessage> {
        self.transcript(&handle.view).get(handle.index)
    }

    /// Replace the text of the addressed message
    pub fn set_text(&mut self, handle: &MessageHandle, text: &str) {
        if let Some(message) = self.slot_mut(&handle.view).get_mut(handle.index) {
            message.text.clear();
            message.text.push_str(text);
        }
    }

    /// Append to the text of the addressed message
    pub fn append_text(&mut self, handle: &MessageHandle, text: &str) {
        if let Some(message) = self.slot_mut(&handle.view).get_mut(handle.index) {
            message.text.push_str(text);
        }
    }

    /// Displayed transcript if `view` is current, otherwise its stored slot
    fn slot_mut(&mut self, view: &View) -> &mut Vec<ChatMessage> {
        if *view == self.current {
            &mut self.displayed
        } else {
            self.stored.entry(view.clone()).or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COURSE: &str = "Hylee's Intro to Multifamily";

    #[test]
    fn starts_on_toc() {
        let views = ViewManager::new(COURSE);
        assert_eq!(views.current_view(), &View::Toc);
        assert_eq!(views.banner(), "Table of Contents");
        assert_eq!(views.header_title(), COURSE);
        assert!(views.displayed().is_empty());
    }

    #[test]
    fn switching_keeps_transcripts_apart() {
        let mut views = ViewManager::new(COURSE);
        views.push(ChatMessage::bot(MessageKind::Default, "contents"));

        views.switch_to_view(View::chapter("Basics"));
        assert!(views.displayed().is_empty());
        assert_eq!(views.banner(), "Basics");
        assert_eq!(views.header_title(), "Basics");
        views.push(ChatMessage::user("hi"));

        views.switch_to_view(View::Toc);
        assert_eq!(views.displayed(), &[ChatMessage::bot(MessageKind::Default, "contents")]);
        assert_eq!(views.header_title(), COURSE);
        assert_eq!(views.transcript(&View::chapter("Basics")), &[ChatMessage::user("hi")]);
    }

    #[test]
    fn same_view_switch_does_not_reload() {
        let mut views = ViewManager::new(COURSE);
        views.switch_to_view(View::chapter("Basics"));
        views.push(ChatMessage::user("one"));
        let generation = views.generation();

        views.switch_to_view(View::chapter("Basics"));
        views.switch_to_view(View::chapter("Basics"));
        assert_eq!(views.generation(), generation);
        assert_eq!(views.displayed().len(), 1);
    }

    #[test]
    fn handle_writes_follow_their_view() {
        let mut views = ViewManager::new(COURSE);
        views.switch_to_view(View::chapter("Basics"));
        let handle = views.push(ChatMessage::bot(MessageKind::Notion, "# Intro"));

        views.switch_to_view(View::Toc);
        views.append_text(&handle, "\nmore");
        assert!(views.displayed().is_empty());

        views.switch_to_view(View::chapter("Basics"));
        assert_eq!(views.displayed()[0].text, "# Intro\nmore");

        views.set_text(&handle, "replaced");
        assert_eq!(views.message(&handle).map(|m| m.text.as_str()), Some("replaced"));
    }

    #[test]
    fn push_to_stored_view() {
        let mut views = ViewManager::new(COURSE);
        let handle = views.push_to(View::chapter("Later"), ChatMessage::user("queued"));
        assert_eq!(handle.index, 0);
        assert!(views.has_messages(&View::chapter("Later")));
        assert!(!views.has_messages(&View::Toc));
    }
}
