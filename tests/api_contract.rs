//! Course backend contract tests
//!
//! These verify the HTTP requests the client sends and how it reads the
//! responses, including the streamed answer format.

use std::time::Duration;

use mentor::api::{
    ApiClient, ApiError, AskRequest, ClassifyIntentRequest, CourseBackend, StreamEvent,
};
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri(), Duration::from_secs(5)).expect("client")
}

async fn collect_answer(
    client: &ApiClient,
    request: &AskRequest,
) -> (Vec<StreamEvent>, Result<(), ApiError>) {
    let (tx, mut rx) = mpsc::channel(32);
    let result = client.ask_question_stream(request, tx).await;
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    (events, result)
}

fn ask() -> AskRequest {
    AskRequest {
        question: "What is a cap rate?".into(),
        context: "# Cap Rates".into(),
        current_chapter_title: "Basics".into(),
    }
}

#[tokio::test]
async fn course_content_is_read_from_camel_case_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-course-content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": "# Contents",
            "firstChapterTitle": "Basics",
            "firstChapterContent": "# One\na",
            "allChapters": [
                {"title": "Basics", "number": 1, "locked": false},
                {"title": "Financing", "number": 2, "locked": true}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let course = client(&server).get_course_content().await.expect("course");
    assert_eq!(course.content, "# Contents");
    assert_eq!(course.first_chapter_title.as_deref(), Some("Basics"));
    assert_eq!(course.first_chapter_content.as_deref(), Some("# One\na"));
    assert_eq!(course.all_chapters.len(), 2);
    assert!(course.all_chapters[1].locked);
}

#[tokio::test]
async fn chapter_content_posts_title() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get-chapter-content"))
        .and(body_json(json!({"title": "Basics"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": "# One\na"})))
        .expect(1)
        .mount(&server)
        .await;

    let content = client(&server).get_chapter_content("Basics").await.expect("chapter");
    assert_eq!(content, "# One\na");
}

#[tokio::test]
async fn quick_actions_post_section_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate-quick-actions"))
        .and(body_json(json!({"section_content": "# One\na"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"actions": ["What is NOI?", "Give me an example"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let actions = client(&server).generate_quick_actions("# One\na").await.expect("actions");
    assert_eq!(actions, vec!["What is NOI?", "Give me an example"]);
}

#[tokio::test]
async fn classify_intent_uses_snake_case_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify-intent"))
        .and(body_json(json!({
            "user_input": "cap rates in texas",
            "current_section_title": "One",
            "next_section_title": "Two"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"intent": "CONTINUE"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = ClassifyIntentRequest {
        user_input: "cap rates in texas".into(),
        current_section_title: "One".into(),
        next_section_title: "Two".into(),
    };
    let label = client(&server).classify_intent(&request).await.expect("intent");
    assert_eq!(label, "CONTINUE");
}

#[tokio::test]
async fn complete_chapter_reads_unlock_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/complete-chapter"))
        .and(body_json(json!({"chapter_title": "Basics"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "unlockedChapters": [
                {"title": "Basics", "number": 1, "locked": false},
                {"title": "Financing", "number": 2, "locked": false}
            ],
            "nextChapter": {"title": "Financing", "number": 2, "locked": false}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).complete_chapter("Basics").await.expect("completion");
    assert_eq!(response.unlocked_chapters.len(), 2);
    assert_eq!(response.next_chapter.map(|c| c.title).as_deref(), Some("Financing"));
}

#[tokio::test]
async fn streamed_answer_is_decoded() {
    let server = MockServer::start().await;
    let body = "data: {\"content\": \"He\"}\n\ndata: {\"content\": \"llo\"}\n\ndata: [DONE]\n\n";
    Mock::given(method("POST"))
        .and(path("/ask-question-stream"))
        .and(header("accept", "text/event-stream"))
        .and(body_json(json!({
            "question": "What is a cap rate?",
            "context": "# Cap Rates",
            "current_chapter_title": "Basics"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let (events, result) = collect_answer(&client(&server), &ask()).await;
    assert!(result.is_ok());
    assert_eq!(
        events,
        vec![
            StreamEvent::Delta("He".into()),
            StreamEvent::Delta("llo".into()),
            StreamEvent::Done
        ]
    );
}

#[tokio::test]
async fn stream_error_frame_is_forwarded() {
    let server = MockServer::start().await;
    let body = "data: {\"error\": \"model unavailable\"}\n\ndata: [DONE]\n\n";
    Mock::given(method("POST"))
        .and(path("/ask-question-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let (events, result) = collect_answer(&client(&server), &ask()).await;
    assert!(result.is_ok());
    assert_eq!(events[0], StreamEvent::Error("model unavailable".into()));
}

#[tokio::test]
async fn error_status_becomes_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get-chapter-content"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let err = client(&server).get_chapter_content("Basics").await.unwrap_err();
    match err {
        ApiError::ServerError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "busy");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn failed_stream_request_sends_no_events() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask-question-stream"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (events, result) = collect_answer(&client(&server), &ask()).await;
    assert!(events.is_empty());
    assert!(matches!(result, Err(ApiError::ServerError { status: 500, .. })));
}
