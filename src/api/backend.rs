//! The course backend seam
//!
//! Everything the bot needs from the outside world goes through
//! [`CourseBackend`]. The HTTP implementation lives in [`super::client`];
//! tests substitute scripted implementations.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::ApiError;
use super::models::{
    AskRequest, ClassifyIntentRequest, CompleteChapterResponse, CourseContent, StreamEvent,
};

/// Remote collaborator that supplies course content and tutor answers
#[async_trait]
pub trait CourseBackend: Send + Sync {
    /// Fetch the table of contents, the chapter list and the first chapter preload
    async fn get_course_content(&self) -> Result<CourseContent, ApiError>;

    /// Fetch the markdown of a single chapter
    async fn get_chapter_content(&self, title: &str) -> Result<String, ApiError>;

    /// Generate follow-up questions for a section
    async fn generate_quick_actions(&self, section_content: &str)
    -> Result<Vec<String>, ApiError>;

    /// Ask the remote classifier whether input means "continue" or "question".
    /// Returns the raw label.
    async fn classify_intent(&self, request: &ClassifyIntentRequest) -> Result<String, ApiError>;

    /// Stream an answer, sending decoded events through `tx`
    async fn ask_question_stream(
        &self,
        request: &AskRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<(), ApiError>;

    /// Record a chapter as completed and receive the new unlock state
    async fn complete_chapter(&self, chapter_title: &str)
    -> Result<CompleteChapterResponse, ApiError>;
}
