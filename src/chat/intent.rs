//! Deciding whether learner input means "continue" or "question"
//!
//! Keyword fast paths resolve most inputs locally. Anything they cannot
//! decide goes to the remote classifier, whose answer is authoritative.

use tracing::{debug, warn};

use crate::api::{ClassifyIntentRequest, CourseBackend};

/// Phrases that mean the learner wants to move on
pub const CONTINUE_KEYWORDS: &[&str] = &[
    "next",
    "continue",
    "proceed",
    "move on",
    "go ahead",
    "keep going",
    "yes",
    "ok",
    "sure",
    "got it",
    "understood",
    "clear",
    "makes sense",
    "let's go",
    "lets go",
    "let's continue",
    "lets continue",
    "move to next",
    "next section",
    "go on",
    "carry on",
    "move forward",
    "progress",
    "alright",
    "right",
    "good",
    "fine",
    "yep",
    "yeah",
    "perfect",
];

/// Substrings that mark a question
pub const QUESTION_KEYWORDS: &[&str] = &[
    "what",
    "how",
    "why",
    "when",
    "where",
    "who",
    "which",
    "explain",
    "clarify",
    "elaborate",
    "more details",
    "more info",
    "don't understand",
    "dont understand",
    "confused",
    "unclear",
    "can you",
    "could you",
    "would you",
    "help me",
    "tell me",
    "example",
    "meaning",
    "definition",
    "what does",
    "how does",
];

/// What the learner meant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Move on to the next section
    Continue,
    /// Ask the tutor
    Question,
}

impl Intent {
    /// Parse a remote classifier label. Anything but CONTINUE is a question.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("continue") {
            Intent::Continue
        } else {
            Intent::Question
        }
    }
}

/// Lower-case, turn punctuation other than `'` and `?` into spaces and
/// collapse whitespace
fn normalize(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_punctuation() && c != '\'' && c != '?' { ' ' } else { c })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether the text holds a continuation phrase as a whole word or phrase
pub fn matches_continue(text: &str) -> bool {
    let text = normalize(text);
    CONTINUE_KEYWORDS.iter().any(|keyword| {
        text == *keyword
            || text.contains(&format!(" {} ", keyword))
            || text.starts_with(&format!("{} ", keyword))
            || text.ends_with(&format!(" {}", keyword))
    })
}

/// Whether the text looks like a question
pub fn matches_question(text: &str) -> bool {
    if text.contains('?') {
        return true;
    }
    let lower = text.to_lowercase();
    QUESTION_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Classify using the keyword tables only. `None` means undecided.
pub fn classify_local(text: &str) -> Option<Intent> {
    if matches_continue(text) {
        debug!(input = text, "Keyword match: continue");
        return Some(Intent::Continue);
    }
    if matches_question(text) {
        debug!(input = text, "Keyword match: question");
        return Some(Intent::Question);
    }
    None
}

/// Ask the remote classifier. Transport failures count as a question.
pub async fn classify_remote(
    backend: &dyn CourseBackend,
    request: &ClassifyIntentRequest,
) -> Intent {
    match backend.classify_intent(request).await {
        Ok(label) => {
            debug!(input = %request.user_input, label = %label, "Remote intent");
            Intent::from_label(&label)
        }
        Err(e) => {
            warn!("Intent classification failed: {}", e);
            Intent::Question
        }
    }
}
