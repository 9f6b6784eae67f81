//! Request and response bodies for the course backend

use serde::{Deserialize, Serialize};

/// Chapter entry as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterInfo {
    /// Chapter title, unique within the course
    pub title: String,
    /// Chapter number (1-indexed)
    #[serde(default)]
    pub number: u32,
    /// Whether the learner may open this chapter yet
    #[serde(default)]
    pub locked: bool,
}

/// Response of `GET get-course-content`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseContent {
    /// Table of contents as markdown
    pub content: String,
    /// Title of the first chapter
    #[serde(default)]
    pub first_chapter_title: Option<String>,
    /// First chapter markdown, preloaded to save a round trip
    #[serde(default)]
    pub first_chapter_content: Option<String>,
    /// Every chapter in course order
    #[serde(default)]
    pub all_chapters: Vec<ChapterInfo>,
}

/// Body of `POST get-chapter-content`
#[derive(Debug, Clone, Serialize)]
pub struct ChapterContentRequest {
    pub title: String,
}

/// Response of `POST get-chapter-content`
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterContent {
    pub content: String,
}

/// Body of `POST generate-quick-actions`
#[derive(Debug, Clone, Serialize)]
pub struct QuickActionsRequest {
    pub section_content: String,
}

/// Response of `POST generate-quick-actions`
#[derive(Debug, Clone, Deserialize)]
pub struct QuickActionsResponse {
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Body of `POST classify-intent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifyIntentRequest {
    pub user_input: String,
    pub current_section_title: String,
    pub next_section_title: String,
}

/// Response of `POST classify-intent`
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyIntentResponse {
    /// Either `CONTINUE` or `QUESTION`
    pub intent: String,
}

/// Body of `POST ask-question-stream`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    /// The learner's question
    pub question: String,
    /// Markdown the answer should be grounded in
    pub context: String,
    /// Chapter the learner is in (empty on the table of contents)
    pub current_chapter_title: String,
}

/// Body of `POST complete-chapter`
#[derive(Debug, Clone, Serialize)]
pub struct CompleteChapterRequest {
    pub chapter_title: String,
}

/// Response of `POST complete-chapter`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteChapterResponse {
    /// The full chapter list with updated lock flags
    pub unlocked_chapters: Vec<ChapterInfo>,
    /// The chapter unlocked by this completion, absent after the last one
    #[serde(default)]
    pub next_chapter: Option<ChapterInfo>,
}

/// Events decoded from the `ask-question-stream` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental answer text
    Delta(String),
    /// The server reported a failure inside the stream
    Error(String),
    /// The `[DONE]` sentinel
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_content_deserializes_camel_case() {
        let json = r##"{
            "content": "# Contents",
            "firstChapterTitle": "Chapter 1: Basics",
            "firstChapterContent": "# Intro\nHello",
            "allChapters": [
                {"title": "Chapter 1: Basics", "number": 1, "locked": false},
                {"title": "Chapter 2: Deals", "number": 2, "locked": true}
            ]
        }"##;
        let course: CourseContent = serde_json::from_str(json).unwrap();
        assert_eq!(course.first_chapter_title.as_deref(), Some("Chapter 1: Basics"));
        assert_eq!(course.all_chapters.len(), 2);
        assert!(course.all_chapters[1].locked);
    }

    #[test]
    fn course_content_tolerates_missing_preload() {
        let json = r#"{"content": "toc", "firstChapterTitle": null, "allChapters": []}"#;
        let course: CourseContent = serde_json::from_str(json).unwrap();
        assert!(course.first_chapter_content.is_none());
        assert!(course.first_chapter_title.is_none());
    }

    #[test]
    fn complete_chapter_without_next() {
        let json = r#"{"unlockedChapters": [{"title": "A", "number": 1, "locked": false}]}"#;
        let response: CompleteChapterResponse = serde_json::from_str(json).unwrap();
        assert!(response.next_chapter.is_none());
        assert_eq!(response.unlocked_chapters[0].title, "A");
    }

    #[test]
    fn classify_request_uses_snake_case() {
        let request = ClassifyIntentRequest {
            user_input: "hmm".into(),
            current_section_title: "Intro".into(),
            next_section_title: "Cap rates".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["user_input"], "hmm");
        assert_eq!(json["next_section_title"], "Cap rates");
    }
}
