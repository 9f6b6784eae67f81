//! HTTP client for the course backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::backend::CourseBackend;
use super::error::ApiError;
use super::models::{
    AskRequest, ChapterContent, ChapterContentRequest, ClassifyIntentRequest,
    ClassifyIntentResponse, CompleteChapterRequest, CompleteChapterResponse, CourseContent,
    QuickActionsRequest, QuickActionsResponse, StreamEvent,
};
use super::streaming;

/// Course backend client
pub struct ApiClient {
    /// HTTP client
    client: Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Cancelled when the application shuts down
    shutdown: CancellationToken,
}

impl ApiClient {
    /// Create a new client for the backend at `base_url`
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().connect_timeout(connect_timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url, shutdown: CancellationToken::new() })
    }

    /// Abort streamed answers when `token` is cancelled
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn post_json<Req, Resp>(&self, endpoint: &str, body: &Req) -> Result<Resp, ApiError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self.client.post(self.url(endpoint)).json(body).send().await?;
        let response = check_status(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Turn non-success responses into [`ApiError::ServerError`]
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ApiError::ServerError { status: status.as_u16(), message })
}

#[async_trait]
impl CourseBackend for ApiClient {
    async fn get_course_content(&self) -> Result<CourseContent, ApiError> {
        let response = self.client.get(self.url("get-course-content")).send().await?;
        let response = check_status(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_chapter_content(&self, title: &str) -> Result<String, ApiError> {
        let request = ChapterContentRequest { title: title.to_string() };
        let chapter: ChapterContent = self.post_json("get-chapter-content", &request).await?;
        Ok(chapter.content)
    }

    async fn generate_quick_actions(
        &self,
        section_content: &str,
    ) -> Result<Vec<String>, ApiError> {
        let request = QuickActionsRequest { section_content: section_content.to_string() };
        let response: QuickActionsResponse =
            self.post_json("generate-quick-actions", &request).await?;
        Ok(response.actions)
    }

    async fn classify_intent(&self, request: &ClassifyIntentRequest) -> Result<String, ApiError> {
        let response: ClassifyIntentResponse = self.post_json("classify-intent", request).await?;
        Ok(response.intent)
    }

    async fn ask_question_stream(
        &self,
        request: &AskRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("ask-question-stream"))
            .header("accept", "text/event-stream")
            .json(request)
            .send()
            .await?;
        let response = check_status(response).await?;

        let body = Box::pin(response.bytes_stream());
        streaming::process_stream(body, tx, self.shutdown.clone()).await
    }

    async fn complete_chapter(
        &self,
        chapter_title: &str,
    ) -> Result<CompleteChapterResponse, ApiError> {
        let request = CompleteChapterRequest { chapter_title: chapter_title.to_string() };
        self.post_json("complete-chapter", &request).await
    }
}
