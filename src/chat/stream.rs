//! Accumulating a streamed tutor answer into one transcript message

use super::transcript::{ChatMessage, MessageHandle, MessageKind, View, ViewManager};

/// What a stream event changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamProgress {
    /// The answer message was created by this delta
    Started,
    /// Text was added to the existing message
    Updated,
    /// The answer was already finished; the event was ignored
    Ignored,
}

/// A tutor answer being streamed into the transcript
#[derive(Debug, Clone)]
pub struct StreamingAnswer {
    /// View the question was asked from
    view: View,
    /// Answer message, created on the first delta
    message: Option<MessageHandle>,
    /// Full text received so far
    accumulated: String,
    /// Set once completion has been handled
    finished: bool,
}

impl StreamingAnswer {
    pub fn new(view: View) -> Self {
        Self { view, message: None, accumulated: String::new(), finished: false }
    }

    /// View the answer is written to
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Whether any text has arrived
    pub fn has_text(&self) -> bool {
        self.message.is_some()
    }

    pub fn text(&self) -> &str {
        &self.accumulated
    }

    /// Add a delta and rewrite the answer message with the full text
    pub fn push_delta(&mut self, views: &mut ViewManager, delta: &str) -> StreamProgress {
        if self.finished {
            return StreamProgress::Ignored;
        }

        self.accumulated.push_str(delta);
        match &self.message {
            Some(handle) => {
                views.set_text(handle, &self.accumulated);
                StreamProgress::Updated
            }
            None => {
                let message = ChatMessage::bot(MessageKind::Ai, self.accumulated.clone());
                self.message = Some(views.push_to(self.view.clone(), message));
                StreamProgress::Started
            }
        }
    }

    /// Mark the answer finished. Returns `true` only the first time.
    pub fn finish(&mut self) -> bool {
        !std::mem::replace(&mut self.finished, true)
    }
}
