//! Bot states, quick-action sets and the navigation cursor

use std::fmt;

/// Offered on the table of contents before the course has been started
pub const START_ACTIONS: &[&str] =
    &["Yes, start the course", "How long will it take to complete this chapter?"];

/// Offered on the table of contents once the course has been started
pub const TOC_ACTIONS: &[&str] = &["Continue where I left off", "Restart from beginning"];

/// Offered in the end-of-chapter holding state
pub const END_OF_CHAPTER_ACTIONS: &[&str] = &["Move to next Chapter", "Restart the course"];

/// Always first among the contextual actions of a section
pub const NEXT_SECTION_ACTION: &str = "Move to next section";

/// Contextual actions used when generation fails
pub const FALLBACK_ACTIONS: &[&str] =
    &["What does this mean?", "Give me examples", "How is this used?"];

/// Offered after an answer when no section is active
pub const ANSWER_DEFAULT_ACTIONS: &[&str] = &["Move to next section", "What does this mean?"];

/// Offered once the whole course is complete
pub const COURSE_COMPLETE_ACTIONS: &[&str] =
    &["Restart course", "View certificate", "Course summary"];

/// Offered when recording a completion failed
pub const COMPLETION_FAILED_ACTIONS: &[&str] = &["Continue learning", "Review chapter"];

/// Words that start the course from the table of contents
pub const START_KEYWORDS: &[&str] = &["yes", "start", "begin", "continue", "proceed", "ok", "sure"];

/// Owned copies of a constant action set
pub fn actions(set: &[&str]) -> Vec<String> {
    set.iter().map(|s| s.to_string()).collect()
}

/// Where the conversation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotState {
    /// Course not loaded yet; input is ignored
    #[default]
    Loading,
    /// Table of contents shown, course never started
    AwaitingCourseStart,
    /// Table of contents shown, course started before
    TocNavigation,
    /// A section has been shown
    AwaitingNextSection,
    /// A chapter was completed and another is unlocked
    AwaitingNextChapter,
    /// End-of-course holding state
    AwaitingEndOfChapter,
    /// Completion in flight, or the whole course is done
    ChapterCompleted,
}

impl fmt::Display for BotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BotState::Loading => "loading",
            BotState::AwaitingCourseStart => "awaiting course start",
            BotState::TocNavigation => "table of contents",
            BotState::AwaitingNextSection => "awaiting next section",
            BotState::AwaitingNextChapter => "awaiting next chapter",
            BotState::AwaitingEndOfChapter => "end of chapter",
            BotState::ChapterCompleted => "chapter completed",
        };
        write!(f, "{}", name)
    }
}

/// Quick-action buttons under the transcript
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickActions {
    actions: Vec<String>,
    enabled: bool,
}

impl QuickActions {
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.actions.get(index).map(String::as_str)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replace the set and make it usable
    pub fn set(&mut self, actions: Vec<String>) {
        self.actions = actions;
        self.enabled = true;
    }

    /// Remove every action and block input until the next `set`
    pub fn clear(&mut self) {
        self.actions.clear();
        self.enabled = false;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }
}

/// Position in the course
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Chapter last started
    pub chapter_title: Option<String>,
    /// Index into that chapter's sections
    pub section_index: usize,
}

/// Where a chapter was left when the learner navigated away
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkedChapter {
    pub section_index: usize,
    pub state: BotState,
    pub actions: Vec<String>,
}

impl Default for ParkedChapter {
    fn default() -> Self {
        Self {
            section_index: 0,
            state: BotState::AwaitingNextSection,
            actions: vec![NEXT_SECTION_ACTION.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_actions_lifecycle() {
        let mut quick = QuickActions::default();
        assert!(!quick.is_enabled());

        quick.set(actions(START_ACTIONS));
        assert!(quick.is_enabled());
        assert_eq!(quick.get(0), Some("Yes, start the course"));

        quick.disable();
        assert!(!quick.is_enabled());
        assert_eq!(quick.actions().len(), 2);

        quick.clear();
        assert!(quick.actions().is_empty());
        assert!(!quick.is_enabled());
    }

    #[test]
    fn default_park_resumes_at_first_section() {
        let parked = ParkedChapter::default();
        assert_eq!(parked.section_index, 0);
        assert_eq!(parked.state, BotState::AwaitingNextSection);
        assert_eq!(parked.actions, vec!["Move to next section"]);
    }
}
