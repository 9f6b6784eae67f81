//! What the bot asks the application to do, and what comes back

use crate::api::{ApiError, CompleteChapterResponse, CourseContent, StreamEvent};
use crate::chat::Intent;

/// Work the bot cannot do by itself
///
/// Network effects are run by the application and answered with a
/// [`BotEvent`]. The rest change the shell around the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the table of contents and chapter list
    FetchCourse,
    /// Load a chapter's markdown. Silent fetches only refresh sections.
    FetchChapter { title: String, silent: bool },
    /// Generate follow-up questions for a section
    GenerateQuickActions { section_content: String },
    /// Ask the remote classifier about undecided input
    ClassifyIntent {
        user_input: String,
        current_section_title: String,
        next_section_title: String,
    },
    /// Stream a tutor answer
    AskStream { question: String, context: String, current_chapter_title: String },
    /// Record the chapter as completed
    CompleteChapter { chapter_title: String },
    /// Reveal the chapter list panel
    ShowChapterList,
    /// Throw the session away and start over
    Reload,
}

impl Effect {
    /// Whether running this effect needs the backend
    pub fn is_remote(&self) -> bool {
        !matches!(self, Effect::ShowChapterList | Effect::Reload)
    }
}

/// Results fed back into the bot
#[derive(Debug)]
pub enum BotEvent {
    CourseLoaded(Result<CourseContent, ApiError>),
    ChapterLoaded { title: String, silent: bool, result: Result<String, ApiError> },
    QuickActionsGenerated(Result<Vec<String>, ApiError>),
    IntentClassified { input: String, intent: Intent },
    /// One decoded frame of a streamed answer
    Stream(StreamEvent),
    /// The answer stream ended without a transport error
    StreamClosed,
    StreamFailed(ApiError),
    ChapterCompleted(Result<CompleteChapterResponse, ApiError>),
    /// Time for the next line of the active reveal
    RevealTick,
}

/// How the bot treated a piece of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Input was taken; run these effects
    Accepted(Vec<Effect>),
    /// Empty input, or nothing to do
    Ignored,
    /// A sequence is still running
    Busy,
    /// The chapter is locked
    Locked,
}

impl InputOutcome {
    /// Effects to run, if accepted
    pub fn into_effects(self) -> Vec<Effect> {
        match self {
            InputOutcome::Accepted(effects) => effects,
            _ => Vec::new(),
        }
    }
}
