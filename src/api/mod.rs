//! Course backend integration
//!
//! Provides the backend trait, the HTTP client and SSE stream parsing for
//! the endpoints that serve course content and tutor answers.

pub mod backend;
pub mod client;
pub mod error;
pub mod models;
pub mod streaming;

// Re-export commonly used types
pub use backend::CourseBackend;
pub use client::ApiClient;
pub use error::ApiError;
pub use models::{
    AskRequest, ChapterInfo, ClassifyIntentRequest, CompleteChapterResponse, CourseContent,
    StreamEvent,
};
