//! Full course flows driven through the effect executor with a scripted backend

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mentor::api::{
    ApiError, AskRequest, ChapterInfo, ClassifyIntentRequest, CompleteChapterResponse,
    CourseBackend, CourseContent, StreamEvent,
};
use mentor::app::run_effect;
use mentor::bot::messages;
use mentor::bot::{Bot, BotEvent, BotState, Effect, InputOutcome};
use mentor::chat::{ChatMessage, Intent, MessageKind, View};
use mentor::config::RevealSpeeds;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

const TOC: &str = "# Multifamily 101\n1. Basics\n2. Financing";
const BASICS: &str = "# 1.1 Rent Rolls\nA rent roll lists every unit.\n## 1.2 Factoid: Class A\nNewest buildings.\n## 1.3 Cap Rates\nNOI over price.";
const FINANCING: &str = "# 2.1 Loans\nAgency debt.";

/// In-memory backend with canned answers that records what it was asked
struct ScriptedBackend {
    chapters: HashMap<String, String>,
    /// Classifier label, or `None` when the classifier is unreachable
    intent: Option<String>,
    answer: Vec<StreamEvent>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new() -> Self {
        let chapters = HashMap::from([
            ("Basics".to_string(), BASICS.to_string()),
            ("Financing".to_string(), FINANCING.to_string()),
        ]);
        Self {
            chapters,
            intent: Some("QUESTION".into()),
            answer: vec![
                StreamEvent::Delta("He".into()),
                StreamEvent::Delta("llo".into()),
                StreamEvent::Done,
            ],
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.as_str() == call).count()
    }
}

fn chapter(title: &str, number: u32, locked: bool) -> ChapterInfo {
    ChapterInfo { title: title.into(), number, locked }
}

#[async_trait]
impl CourseBackend for ScriptedBackend {
    async fn get_course_content(&self) -> Result<CourseContent, ApiError> {
        self.record("course");
        Ok(CourseContent {
            content: TOC.into(),
            first_chapter_title: Some("Basics".into()),
            first_chapter_content: None,
            all_chapters: vec![chapter("Basics", 1, false), chapter("Financing", 2, true)],
        })
    }

    async fn get_chapter_content(&self, title: &str) -> Result<String, ApiError> {
        self.record(format!("chapter:{}", title));
        self.chapters
            .get(title)
            .cloned()
            .ok_or_else(|| ApiError::ServerError { status: 404, message: title.to_string() })
    }

    async fn generate_quick_actions(
        &self,
        _section_content: &str,
    ) -> Result<Vec<String>, ApiError> {
        self.record("quick_actions");
        Ok(vec!["What is NOI?".into()])
    }

    async fn classify_intent(&self, _request: &ClassifyIntentRequest) -> Result<String, ApiError> {
        self.record("classify");
        self.intent.clone().ok_or_else(|| ApiError::ServerError {
            status: 503,
            message: "classifier down".into(),
        })
    }

    async fn ask_question_stream(
        &self,
        _request: &AskRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<(), ApiError> {
        self.record("ask");
        for event in &self.answer {
            if tx.send(event.clone()).await.is_err() {
                break;
            }
        }
        Ok(())
    }

    async fn complete_chapter(
        &self,
        chapter_title: &str,
    ) -> Result<CompleteChapterResponse, ApiError> {
        self.record(format!("complete:{}", chapter_title));
        let unlocked_chapters = vec![chapter("Basics", 1, false), chapter("Financing", 2, false)];
        let next_chapter = (chapter_title == "Basics").then(|| chapter("Financing", 2, false));
        Ok(CompleteChapterResponse { unlocked_chapters, next_chapter })
    }
}

/// Run effects and reveal ticks until the bot is idle. Returns the effects
/// that are not backend calls.
async fn settle(
    bot: &mut Bot,
    backend: &Arc<ScriptedBackend>,
    effects: Vec<Effect>,
) -> Vec<Effect> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut pending = effects;
    let mut local = Vec::new();

    for _ in 0..100_000 {
        for effect in std::mem::take(&mut pending) {
            if effect.is_remote() {
                let backend: Arc<dyn CourseBackend> = backend.clone();
                run_effect(backend, effect, tx.clone()).await;
            } else {
                local.push(effect);
            }
        }

        let mut progressed = false;
        while let Ok(event) = rx.try_recv() {
            pending.extend(bot.handle_event(event));
            progressed = true;
        }
        if bot.reveal_interval().is_some() {
            pending.extend(bot.handle_event(BotEvent::RevealTick));
            progressed = true;
        }
        if !progressed && pending.is_empty() {
            return local;
        }
    }
    panic!("bot never settled");
}

async fn input(bot: &mut Bot, backend: &Arc<ScriptedBackend>, text: &str) -> Vec<Effect> {
    match bot.handle_input(text) {
        InputOutcome::Accepted(effects) => settle(bot, backend, effects).await,
        other => panic!("input {:?} was not accepted: {:?}", text, other),
    }
}

async fn action(bot: &mut Bot, backend: &Arc<ScriptedBackend>, index: usize) -> Vec<Effect> {
    match bot.activate_quick_action(index) {
        InputOutcome::Accepted(effects) => settle(bot, backend, effects).await,
        other => panic!("action {} was not accepted: {:?}", index, other),
    }
}

async fn started(backend: &Arc<ScriptedBackend>) -> Bot {
    let speeds = RevealSpeeds { content_ms: 1, message_ms: 1 };
    let mut bot = Bot::new("Multifamily 101", speeds);
    let effects = bot.start();
    assert!(settle(&mut bot, backend, effects).await.is_empty());
    bot
}

fn texts(bot: &Bot, view: &View) -> Vec<String> {
    bot.views().transcript(view).iter().map(|m| m.text.clone()).collect()
}

#[tokio::test]
async fn startup_offers_first_chapter() {
    let backend = Arc::new(ScriptedBackend::new());
    let bot = started(&backend).await;

    assert_eq!(bot.state(), BotState::AwaitingCourseStart);
    assert_eq!(
        texts(&bot, &View::Toc),
        vec![TOC.to_string(), messages::ready_to_start("Basics")]
    );
    assert_eq!(backend.count("course"), 1);
}

#[tokio::test]
async fn factoid_is_chained_into_the_first_section() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut bot = started(&backend).await;

    input(&mut bot, &backend, "yes").await;

    let basics = View::chapter("Basics");
    assert_eq!(
        texts(&bot, &basics),
        vec![
            "# 1.1 Rent Rolls\nA rent roll lists every unit.".to_string(),
            "## 1.2 Factoid: Class A\nNewest buildings.".to_string(),
            messages::section_transition("1.2 Factoid: Class A", "1.3 Cap Rates"),
        ]
    );
    assert_eq!(bot.cursor().section_index, 1);
    assert_eq!(bot.quick_actions().actions(), ["Move to next section", "What is NOI?"]);
    assert_eq!(backend.count("chapter:Basics"), 1);
    assert_eq!(backend.count("quick_actions"), 1);
}

#[tokio::test]
async fn whole_course_can_be_completed_and_restarted() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut bot = started(&backend).await;

    input(&mut bot, &backend, "yes").await;
    input(&mut bot, &backend, "next").await;

    assert_eq!(bot.state(), BotState::AwaitingNextChapter);
    assert_eq!(backend.count("complete:Basics"), 1);
    assert!(bot.navigator().is_unlocked("Financing"));
    assert_eq!(
        bot.quick_actions().actions(),
        ["Start Financing", "Review this chapter", "View all chapters"]
    );

    // single-section chapter completes as soon as it is shown
    action(&mut bot, &backend, 0).await;
    assert_eq!(bot.views().current_view(), &View::chapter("Financing"));
    assert_eq!(backend.count("complete:Financing"), 1);
    assert_eq!(bot.state(), BotState::ChapterCompleted);
    let last = texts(&bot, &View::chapter("Financing")).pop().unwrap_or_default();
    assert!(last.ends_with(messages::COURSE_COMPLETE));
    assert_eq!(
        bot.quick_actions().actions(),
        ["Restart course", "View certificate", "Course summary"]
    );
    assert_eq!(bot.navigator().completed_count(), 2);

    action(&mut bot, &backend, 0).await;
    assert_eq!(bot.navigator().completed_count(), 0);
    assert_eq!(bot.views().current_view(), &View::chapter("Basics"));
    assert_eq!(bot.cursor().section_index, 0);
    assert_eq!(bot.state(), BotState::AwaitingNextSection);
}

#[tokio::test]
async fn restart_from_contents_clears_progress() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut bot = started(&backend).await;
    input(&mut bot, &backend, "yes").await;
    input(&mut bot, &backend, "next").await;
    assert_eq!(bot.navigator().completed_count(), 1);

    assert_eq!(bot.open_table_of_contents(), InputOutcome::Accepted(vec![]));
    assert_eq!(bot.state(), BotState::TocNavigation);
    input(&mut bot, &backend, "Restart from beginning").await;

    assert_eq!(bot.navigator().completed_count(), 0);
    assert_eq!(bot.cursor().chapter_title.as_deref(), Some("Basics"));
    assert_eq!(bot.cursor().section_index, 0);
    assert!(bot.has_started());
}

#[tokio::test]
async fn streamed_answer_is_rendered_once() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut bot = started(&backend).await;
    input(&mut bot, &backend, "yes").await;
    let generated = backend.count("quick_actions");

    input(&mut bot, &backend, "what does this mean").await;

    assert_eq!(backend.count("ask"), 1);
    assert_eq!(
        bot.views().displayed().last(),
        Some(&ChatMessage::bot(MessageKind::Ai, "Hello"))
    );
    assert_eq!(backend.count("quick_actions"), generated + 1);
    assert!(!bot.is_busy());
    assert!(!bot.is_loading());
}

#[tokio::test]
async fn stream_without_done_still_finishes() {
    let mut scripted = ScriptedBackend::new();
    scripted.answer = vec![StreamEvent::Delta("Partial".into())];
    let backend = Arc::new(scripted);
    let mut bot = started(&backend).await;

    input(&mut bot, &backend, "tell me about the course").await;

    assert_eq!(
        bot.views().displayed().last(),
        Some(&ChatMessage::bot(MessageKind::Ai, "Partial"))
    );
    assert_eq!(bot.state(), BotState::AwaitingCourseStart);
    assert!(!bot.is_busy());
}

#[tokio::test]
async fn remote_classifier_can_continue() {
    let mut scripted = ScriptedBackend::new();
    scripted.intent = Some("CONTINUE".into());
    let backend = Arc::new(scripted);
    let mut bot = started(&backend).await;
    input(&mut bot, &backend, "yes").await;

    input(&mut bot, &backend, "cap rates in texas").await;

    assert_eq!(backend.count("classify"), 1);
    assert_eq!(backend.count("ask"), 0);
    assert_eq!(backend.count("complete:Basics"), 1);
}

#[tokio::test]
async fn unreachable_classifier_falls_back_to_an_answer() {
    let mut scripted = ScriptedBackend::new();
    scripted.intent = None;
    let backend = Arc::new(scripted);
    let mut bot = started(&backend).await;
    input(&mut bot, &backend, "yes").await;

    let effects = bot.handle_input("cap rates in texas").into_effects();
    assert!(matches!(&effects[..], [Effect::ClassifyIntent { .. }]));

    let (tx, mut rx) = mpsc::unbounded_channel();
    for effect in effects {
        let shared: Arc<dyn CourseBackend> = backend.clone();
        run_effect(shared, effect, tx.clone()).await;
    }
    let event = rx.try_recv().expect("classification result");
    assert!(matches!(&event, BotEvent::IntentClassified { intent: Intent::Question, .. }));

    let effects = bot.handle_event(event);
    assert!(matches!(
        &effects[..],
        [Effect::AskStream { question, .. }] if question == "cap rates in texas"
    ));
    settle(&mut bot, &backend, effects).await;

    assert_eq!(backend.count("classify"), 1);
    assert_eq!(backend.count("ask"), 1);
    assert_eq!(backend.count("complete:Basics"), 0);
    assert_eq!(
        bot.views().displayed().last(),
        Some(&ChatMessage::bot(MessageKind::Ai, "Hello"))
    );
}

#[tokio::test]
async fn view_all_chapters_is_left_to_the_shell() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut bot = started(&backend).await;
    input(&mut bot, &backend, "yes").await;
    input(&mut bot, &backend, "next").await;

    let local = action(&mut bot, &backend, 2).await;
    assert_eq!(local, vec![Effect::ShowChapterList]);
    assert!(!bot.is_busy());
    assert_eq!(bot.open_chapter("Nowhere"), InputOutcome::Locked);
}
