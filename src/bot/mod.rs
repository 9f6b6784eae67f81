//! The conversational course bot
//!
//! [`Bot`] is a state machine over the course. Learner input and backend
//! results go in; transcript changes happen in place and the work that needs
//! the outside world comes back out as [`Effect`]s for the application to
//! run. The bot never waits on anything, so it can be driven step by step in
//! tests.

pub mod effect;
pub mod messages;
pub mod state;

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::{ApiError, CompleteChapterResponse, CourseContent, StreamEvent};
use crate::chat::{
    ChatMessage, Intent, MessageKind, Reveal, StreamProgress, StreamingAnswer, View, ViewManager,
    classify_local,
};
use crate::config::RevealSpeeds;
use crate::course::{Course, CourseNavigator, Section, is_factoid, parse_content_into_sections};

pub use effect::{BotEvent, Effect, InputOutcome};
pub use state::{BotState, Cursor, ParkedChapter, QuickActions};

use state::{
    ANSWER_DEFAULT_ACTIONS, COMPLETION_FAILED_ACTIONS, COURSE_COMPLETE_ACTIONS,
    END_OF_CHAPTER_ACTIONS, FALLBACK_ACTIONS, NEXT_SECTION_ACTION, START_ACTIONS, START_KEYWORDS,
    TOC_ACTIONS, actions,
};

/// What to do once a reveal has shown its last line
#[derive(Debug, Clone, PartialEq, Eq)]
enum AfterReveal {
    /// Table of contents shown; ask whether to start
    AskReadyToStart,
    /// Start question shown; wait for the learner
    AwaitCourseStart,
    /// Section shown; chain a factoid, prompt, or complete the chapter
    ProceedToNextStep,
    /// Transition prompt shown; offer actions for this section
    OfferContextualActions { section_content: String },
    /// Offer a fixed set of actions
    ShowActions(Vec<String>),
}

/// The course bot
pub struct Bot {
    /// Current state
    state: BotState,
    /// Transcripts and the current view
    views: ViewManager,
    /// Chapters, locks and completion
    navigator: CourseNavigator,
    /// Chapter and section position
    cursor: Cursor,
    /// Sections of the loaded chapter
    sections: Vec<Section>,
    /// Markdown of the loaded chapter, used as answer context
    chapter_content: String,
    /// Chapter that `sections` belong to
    loaded_chapter: Option<String>,
    /// Positions of chapters the learner navigated away from
    parked: HashMap<String, ParkedChapter>,
    /// Chapters whose content has been displayed
    entered: HashSet<String>,
    /// Buttons under the transcript
    quick_actions: QuickActions,
    /// In-progress indicator
    loading: bool,
    /// Answer being streamed
    answer: Option<StreamingAnswer>,
    /// Reveals waiting to run, front first
    reveals: VecDeque<Reveal<AfterReveal>>,
    /// Whether any chapter has been started
    started: bool,
    /// Chapters whose last completion request failed
    completion_failed: HashSet<String>,
    /// Advance once the current chapter's sections are fetched again
    advance_after_load: bool,
    /// Reveal pacing
    speeds: RevealSpeeds,
}

impl Bot {
    /// Create a bot that has not loaded its course yet
    pub fn new(course_title: impl Into<String>, speeds: RevealSpeeds) -> Self {
        Self {
            state: BotState::Loading,
            views: ViewManager::new(course_title),
            navigator: CourseNavigator::default(),
            cursor: Cursor::default(),
            sections: Vec::new(),
            chapter_content: String::new(),
            loaded_chapter: None,
            parked: HashMap::new(),
            entered: HashSet::new(),
            quick_actions: QuickActions::default(),
            loading: false,
            answer: None,
            reveals: VecDeque::new(),
            started: false,
            completion_failed: HashSet::new(),
            advance_after_load: false,
            speeds,
        }
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    pub fn views(&self) -> &ViewManager {
        &self.views
    }

    pub fn navigator(&self) -> &CourseNavigator {
        &self.navigator
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn quick_actions(&self) -> &QuickActions {
        &self.quick_actions
    }

    /// Whether the in-progress indicator should show
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a sequence is running and input would be rejected
    pub fn is_busy(&self) -> bool {
        !self.quick_actions.is_enabled()
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Interval until the next reveal tick, if a reveal is running
    pub fn reveal_interval(&self) -> Option<Duration> {
        self.reveals.front().map(Reveal::interval)
    }

    /// Progress through `title` as a percentage
    pub fn chapter_progress(&self, title: &str) -> u8 {
        let active = match (&self.cursor.chapter_title, &self.loaded_chapter) {
            (Some(current), Some(loaded)) if current == loaded => {
                Some((current.as_str(), self.cursor.section_index, self.sections.len()))
            }
            _ => None,
        };
        self.navigator.chapter_progress(title, active)
    }

    /// Begin loading the course
    pub fn start(&mut self) -> Vec<Effect> {
        self.state = BotState::Loading;
        self.loading = true;
        vec![Effect::FetchCourse]
    }

    /// Handle typed text or a quick-action label
    pub fn handle_input(&mut self, text: &str) -> InputOutcome {
        let text = text.trim();
        if text.is_empty() || self.state == BotState::Loading {
            return InputOutcome::Ignored;
        }
        if self.is_busy() {
            return InputOutcome::Busy;
        }

        debug!(state = %self.state, input = text, "Handling input");
        self.views.push(ChatMessage::user(text));
        self.quick_actions.disable();

        InputOutcome::Accepted(self.dispatch(text))
    }

    /// Handle a click on the quick action at `index`
    pub fn activate_quick_action(&mut self, index: usize) -> InputOutcome {
        if self.is_busy() {
            return InputOutcome::Busy;
        }
        match self.quick_actions.get(index).map(str::to_string) {
            Some(label) => self.handle_input(&label),
            None => InputOutcome::Ignored,
        }
    }

    /// Open a chapter from the chapter list
    pub fn open_chapter(&mut self, title: &str) -> InputOutcome {
        if self.state == BotState::Loading {
            return InputOutcome::Ignored;
        }
        if self.is_busy() {
            return InputOutcome::Busy;
        }
        if !self.navigator.is_unlocked(title) {
            return InputOutcome::Locked;
        }
        if *self.views.current_view() == View::chapter(title) && self.entered.contains(title) {
            return InputOutcome::Ignored;
        }
        InputOutcome::Accepted(self.start_chapter(title))
    }

    /// Go back to the table of contents
    pub fn open_table_of_contents(&mut self) -> InputOutcome {
        if self.state == BotState::Loading {
            return InputOutcome::Ignored;
        }
        if self.is_busy() {
            return InputOutcome::Busy;
        }
        if *self.views.current_view() == View::Toc {
            return InputOutcome::Ignored;
        }

        self.park_current();
        self.views.switch_to_view(View::Toc);
        if self.started {
            self.state = BotState::TocNavigation;
            self.finish(actions(TOC_ACTIONS));
        } else {
            self.state = BotState::AwaitingCourseStart;
            self.finish(actions(START_ACTIONS));
        }
        InputOutcome::Accepted(Vec::new())
    }

    /// Feed a backend result or a reveal tick into the bot
    pub fn handle_event(&mut self, event: BotEvent) -> Vec<Effect> {
        match event {
            BotEvent::CourseLoaded(result) => self.on_course_loaded(result),
            BotEvent::ChapterLoaded { title, silent, result } => match result {
                Ok(content) => self.on_chapter_loaded(&title, silent, content),
                Err(e) if silent => {
                    warn!(
                        recoverable = e.is_recoverable(),
                        "Failed to reload chapter '{}': {}",
                        title,
                        e
                    );
                    if std::mem::take(&mut self.advance_after_load) {
                        let message =
                            ChatMessage::bot(MessageKind::Default, messages::CHAPTER_LOAD_FAILED);
                        self.views.push_to(View::chapter(&title), message);
                    }
                    self.loading = false;
                    self.quick_actions.enable();
                    Vec::new()
                }
                Err(e) => {
                    warn!(
                        recoverable = e.is_recoverable(),
                        "Failed to load chapter '{}': {}",
                        title,
                        e
                    );
                    let message =
                        ChatMessage::bot(MessageKind::Default, messages::CHAPTER_LOAD_FAILED);
                    self.views.push_to(View::chapter(&title), message);
                    self.finish(Vec::new());
                    Vec::new()
                }
            },
            BotEvent::QuickActionsGenerated(result) => {
                let generated = result.unwrap_or_else(|e| {
                    warn!(
                        recoverable = e.is_recoverable(),
                        "Quick action generation failed: {}",
                        e
                    );
                    actions(FALLBACK_ACTIONS)
                });
                let mut offered = vec![NEXT_SECTION_ACTION.to_string()];
                offered.extend(generated);
                self.finish(offered);
                Vec::new()
            }
            BotEvent::IntentClassified { input, intent } => {
                self.loading = false;
                match intent {
                    Intent::Continue => self.advance_section(),
                    Intent::Question => self.ask(&input),
                }
            }
            BotEvent::Stream(event) => self.on_stream_event(event),
            BotEvent::StreamClosed => self.finish_answer(),
            BotEvent::StreamFailed(e) => {
                warn!(recoverable = e.is_recoverable(), "Answer stream failed: {}", e);
                if let Some(answer) = self.answer.take() {
                    let message = ChatMessage::bot(MessageKind::Ai, messages::ANSWER_FAILED);
                    self.views.push_to(answer.view().clone(), message);
                    self.loading = false;
                    self.quick_actions.enable();
                }
                Vec::new()
            }
            BotEvent::ChapterCompleted(result) => self.on_chapter_completed(result),
            BotEvent::RevealTick => self.on_reveal_tick(),
        }
    }

    fn dispatch(&mut self, text: &str) -> Vec<Effect> {
        let lower = text.to_lowercase();

        match self.state {
            BotState::AwaitingCourseStart => {
                if START_KEYWORDS.iter().any(|k| lower.contains(k)) {
                    self.start_first_chapter()
                } else {
                    self.ask(text)
                }
            }
            BotState::TocNavigation => {
                if lower.contains("continue") && lower.contains("left off") {
                    match self.cursor.chapter_title.clone() {
                        Some(title) if self.views.has_messages(&View::chapter(&title)) => {
                            self.start_chapter(&title)
                        }
                        _ => self.start_first_chapter(),
                    }
                } else if lower.contains("restart") && lower.contains("beginning") {
                    self.restart_course()
                } else {
                    self.ask(text)
                }
            }
            BotState::AwaitingNextChapter => {
                let next = self
                    .navigator
                    .next_unlocked_after(self.cursor.chapter_title.as_deref())
                    .map(|c| c.title.clone());
                let names_next =
                    next.as_ref().is_some_and(|title| lower.contains(&title.to_lowercase()));

                if lower.contains("start") && (lower.contains("chapter") || names_next) {
                    match next {
                        Some(title) => self.start_chapter(&title),
                        None => self.ask(text),
                    }
                } else if lower.contains("view") && lower.contains("chapters") {
                    self.quick_actions.enable();
                    vec![Effect::ShowChapterList]
                } else {
                    self.ask(text)
                }
            }
            BotState::AwaitingEndOfChapter => {
                if lower.contains("next chapter") {
                    self.reveal(
                        MessageKind::Default,
                        messages::NEXT_CHAPTER_UNAVAILABLE,
                        self.speeds.message(),
                        AfterReveal::ShowActions(actions(END_OF_CHAPTER_ACTIONS)),
                    );
                    Vec::new()
                } else if lower.contains("restart") {
                    vec![Effect::Reload]
                } else {
                    self.ask(text)
                }
            }
            BotState::AwaitingNextSection => {
                let current = self.sections.get(self.cursor.section_index);
                let next = self.sections.get(self.cursor.section_index + 1);
                let current_title =
                    current.map_or_else(|| "Current Section".to_string(), |s| s.title.clone());
                let next_title =
                    next.map_or_else(|| "Next Section".to_string(), |s| s.title.clone());

                match classify_local(text) {
                    Some(Intent::Continue) => self.advance_section(),
                    Some(Intent::Question) => self.ask(text),
                    None => {
                        self.loading = true;
                        vec![Effect::ClassifyIntent {
                            user_input: text.to_string(),
                            current_section_title: current_title,
                            next_section_title: next_title,
                        }]
                    }
                }
            }
            BotState::ChapterCompleted => {
                let failed = self
                    .cursor
                    .chapter_title
                    .as_ref()
                    .is_some_and(|title| self.completion_failed.contains(title));
                if failed && lower.contains("continue") {
                    self.complete_current_chapter()
                } else if lower.contains("restart") {
                    self.restart_course()
                } else {
                    self.ask(text)
                }
            }
            BotState::Loading => Vec::new(),
        }
    }

    fn on_course_loaded(
        &mut self,
        result: Result<CourseContent, ApiError>,
    ) -> Vec<Effect> {
        self.loading = false;
        match result {
            Ok(content) => {
                let course = Course::from(content);
                info!(chapters = course.chapters.len(), "Course loaded");
                self.navigator = CourseNavigator::new(course);
                let toc = self.navigator.table_of_contents().to_string();
                self.reveal(
                    MessageKind::Notion,
                    &toc,
                    self.speeds.content(),
                    AfterReveal::AskReadyToStart,
                );
            }
            Err(e) => {
                warn!(recoverable = e.is_recoverable(), "Failed to load course: {}", e);
                let message = ChatMessage::bot(MessageKind::Default, messages::COURSE_LOAD_FAILED);
                self.views.push(message);
            }
        }
        Vec::new()
    }

    fn on_chapter_loaded(&mut self, title: &str, silent: bool, content: String) -> Vec<Effect> {
        self.navigator.cache_content(title, content.clone());
        let is_current = self.cursor.chapter_title.as_deref() == Some(title);

        if silent {
            self.loading = false;
            let advance = std::mem::take(&mut self.advance_after_load);
            if is_current {
                self.load_sections(title, content);
                if advance {
                    return self.advance_section();
                }
            }
            self.quick_actions.enable();
            return Vec::new();
        }

        self.loading = false;
        if is_current {
            self.enter_chapter(title, content)
        } else {
            self.finish(Vec::new());
            Vec::new()
        }
    }

    fn on_stream_event(&mut self, event: StreamEvent) -> Vec<Effect> {
        let Some(answer) = self.answer.as_mut() else {
            return Vec::new();
        };

        match event {
            StreamEvent::Delta(delta) => {
                if answer.push_delta(&mut self.views, &delta) == StreamProgress::Started {
                    self.loading = false;
                }
                Vec::new()
            }
            StreamEvent::Error(message) => {
                warn!("Answer stream reported an error: {}", message);
                if !answer.has_text() {
                    answer.push_delta(&mut self.views, &message);
                }
                Vec::new()
            }
            StreamEvent::Done => self.finish_answer(),
        }
    }

    /// Pick the next actions after an answer. Runs once per answer.
    fn finish_answer(&mut self) -> Vec<Effect> {
        let Some(mut answer) = self.answer.take() else {
            return Vec::new();
        };
        if !answer.finish() {
            return Vec::new();
        }
        self.loading = false;

        match self.state {
            BotState::AwaitingCourseStart => {
                self.finish(actions(START_ACTIONS));
                Vec::new()
            }
            BotState::TocNavigation => {
                self.finish(actions(TOC_ACTIONS));
                Vec::new()
            }
            BotState::AwaitingNextSection => {
                match self.sections.get(self.cursor.section_index).map(|s| s.content.clone()) {
                    Some(section_content) => self.offer_contextual_actions(section_content),
                    None => {
                        self.finish(actions(ANSWER_DEFAULT_ACTIONS));
                        Vec::new()
                    }
                }
            }
            _ => {
                self.quick_actions.enable();
                Vec::new()
            }
        }
    }

    fn on_chapter_completed(
        &mut self,
        result: Result<CompleteChapterResponse, ApiError>,
    ) -> Vec<Effect> {
        self.loading = false;
        let title = self.cursor.chapter_title.clone().unwrap_or_default();

        match result {
            Ok(response) => {
                self.completion_failed.remove(&title);
                let next = self.navigator.apply_completion(&title, response);
                info!(chapter = %title, next = ?next, "Chapter completed");

                let mut text = messages::chapter_completed(&title);
                let offered = match next {
                    Some(next) => {
                        text.push_str(&messages::chapter_unlocked(&next));
                        self.state = BotState::AwaitingNextChapter;
                        messages::next_chapter_actions(&next)
                    }
                    None => {
                        text.push_str(messages::COURSE_COMPLETE);
                        actions(COURSE_COMPLETE_ACTIONS)
                    }
                };
                self.reveal(
                    MessageKind::Notion,
                    &text,
                    self.speeds.content(),
                    AfterReveal::ShowActions(offered),
                );
            }
            Err(e) => {
                warn!(
                    recoverable = e.is_recoverable(),
                    "Failed to record completion of '{}': {}",
                    title,
                    e
                );
                self.completion_failed.insert(title);
                self.reveal(
                    MessageKind::Notion,
                    messages::COMPLETION_FALLBACK,
                    self.speeds.content(),
                    AfterReveal::ShowActions(actions(COMPLETION_FAILED_ACTIONS)),
                );
            }
        }
        Vec::new()
    }

    fn on_reveal_tick(&mut self) -> Vec<Effect> {
        let Some(reveal) = self.reveals.front_mut() else {
            return Vec::new();
        };

        let (chunk, done) = reveal.tick();
        if let Some(chunk) = &chunk {
            self.views.append_text(reveal.target(), chunk);
        }

        match done {
            Some(after) => {
                self.reveals.pop_front();
                self.after_reveal(after)
            }
            None => {
                if chunk.is_none() {
                    self.reveals.pop_front();
                }
                Vec::new()
            }
        }
    }

    fn after_reveal(&mut self, after: AfterReveal) -> Vec<Effect> {
        match after {
            AfterReveal::AskReadyToStart => {
                match self.navigator.first_chapter_title().map(messages::ready_to_start) {
                    Some(question) => self.reveal(
                        MessageKind::Notion,
                        &question,
                        self.speeds.content(),
                        AfterReveal::AwaitCourseStart,
                    ),
                    None => return self.after_reveal(AfterReveal::AwaitCourseStart),
                }
                Vec::new()
            }
            AfterReveal::AwaitCourseStart => {
                self.state = BotState::AwaitingCourseStart;
                self.finish(actions(START_ACTIONS));
                Vec::new()
            }
            AfterReveal::ProceedToNextStep => self.proceed_to_next_step(),
            AfterReveal::OfferContextualActions { section_content } => {
                self.offer_contextual_actions(section_content)
            }
            AfterReveal::ShowActions(offered) => {
                self.finish(offered);
                Vec::new()
            }
        }
    }

    /// Ask the tutor
    fn ask(&mut self, question: &str) -> Vec<Effect> {
        let context = match self.state {
            BotState::AwaitingCourseStart | BotState::TocNavigation => {
                self.navigator.table_of_contents().to_string()
            }
            _ => self.chapter_content.clone(),
        };

        self.loading = true;
        self.answer = Some(StreamingAnswer::new(self.views.current_view().clone()));
        vec![Effect::AskStream {
            question: question.to_string(),
            context,
            current_chapter_title: self.cursor.chapter_title.clone().unwrap_or_default(),
        }]
    }

    fn start_first_chapter(&mut self) -> Vec<Effect> {
        match self.navigator.first_chapter_title().map(str::to_string) {
            Some(title) => self.start_chapter(&title),
            None => {
                warn!("Course has no chapters to start");
                let offered = self.quick_actions.actions().to_vec();
                self.finish(offered);
                Vec::new()
            }
        }
    }

    /// Enter a chapter, fresh or resumed
    fn start_chapter(&mut self, title: &str) -> Vec<Effect> {
        self.started = true;
        self.park_current();

        let view = View::chapter(title);
        self.views.switch_to_view(view.clone());
        self.cursor.chapter_title = Some(title.to_string());

        let fresh = !self.views.has_messages(&view) || !self.entered.contains(title);
        if fresh {
            info!("Starting chapter '{}'", title);
            self.parked.remove(title);
            if let Some(content) = self.navigator.cached_content(title).map(str::to_string) {
                return self.enter_chapter(title, content);
            }
            self.quick_actions.clear();
            self.loading = true;
            return vec![Effect::FetchChapter { title: title.to_string(), silent: false }];
        }

        info!("Resuming chapter '{}'", title);
        let parked = self.parked.remove(title).unwrap_or_default();
        self.state = parked.state;
        self.cursor.section_index = parked.section_index;

        self.finish(parked.actions);

        if self.loaded_chapter.as_deref() == Some(title) && !self.sections.is_empty() {
            self.clamp_cursor();
            return Vec::new();
        }
        if let Some(content) = self.navigator.cached_content(title).map(str::to_string) {
            self.load_sections(title, content);
            return Vec::new();
        }

        // Actions stay visible but unusable until the sections are back
        self.sections.clear();
        self.chapter_content.clear();
        self.loaded_chapter = None;
        self.quick_actions.disable();
        self.loading = true;
        vec![Effect::FetchChapter { title: title.to_string(), silent: true }]
    }

    /// Show a chapter's first section
    fn enter_chapter(&mut self, title: &str, content: String) -> Vec<Effect> {
        self.entered.insert(title.to_string());
        self.load_sections(title, content);
        self.cursor.section_index = 0;
        self.state = BotState::AwaitingNextSection;
        self.display_current_section()
    }

    fn load_sections(&mut self, title: &str, content: String) {
        self.sections = parse_content_into_sections(&content);
        self.chapter_content = content;
        self.loaded_chapter = Some(title.to_string());
        self.clamp_cursor();
        debug!(chapter = title, sections = self.sections.len(), "Sections loaded");
    }

    fn clamp_cursor(&mut self) {
        if self.loaded_chapter.is_some() {
            self.cursor.section_index = self.cursor.section_index.min(self.sections.len());
        }
    }

    /// Remember where the displayed chapter was left
    fn park_current(&mut self) {
        let Some(title) = self.cursor.chapter_title.clone() else {
            return;
        };
        if *self.views.current_view() != View::chapter(&title) {
            return;
        }
        self.parked.insert(
            title,
            ParkedChapter {
                section_index: self.cursor.section_index,
                state: self.state,
                actions: self.quick_actions.actions().to_vec(),
            },
        );
    }

    fn advance_section(&mut self) -> Vec<Effect> {
        if let Some(refetch) = self.refetch_unloaded_chapter() {
            return refetch;
        }
        self.cursor.section_index = (self.cursor.section_index + 1).min(self.sections.len());
        self.display_current_section()
    }

    /// Fetch the current chapter again if its sections are not loaded
    fn refetch_unloaded_chapter(&mut self) -> Option<Vec<Effect>> {
        let title = self.cursor.chapter_title.clone()?;
        if self.loaded_chapter.as_deref() == Some(title.as_str()) {
            return None;
        }
        info!("Sections of '{}' are missing, fetching again", title);
        self.advance_after_load = true;
        self.quick_actions.disable();
        self.loading = true;
        Some(vec![Effect::FetchChapter { title, silent: true }])
    }

    fn display_current_section(&mut self) -> Vec<Effect> {
        let Some(section) = self.sections.get(self.cursor.section_index).cloned() else {
            return self.complete_current_chapter();
        };

        if section.has_table() {
            self.views.push(ChatMessage::bot(MessageKind::Notion, section.content));
            self.proceed_to_next_step()
        } else {
            self.reveal(
                MessageKind::Notion,
                &section.content,
                self.speeds.content(),
                AfterReveal::ProceedToNextStep,
            );
            Vec::new()
        }
    }

    fn proceed_to_next_step(&mut self) -> Vec<Effect> {
        let index = self.cursor.section_index;
        let (Some(current), Some(next)) = (self.sections.get(index), self.sections.get(index + 1))
        else {
            return self.complete_current_chapter();
        };

        if is_factoid(&next.title) {
            debug!("Chaining factoid '{}'", next.title);
            self.cursor.section_index += 1;
            return self.display_current_section();
        }

        let prompt = messages::section_transition(&current.title, &next.title);
        let section_content = current.content.clone();
        self.state = BotState::AwaitingNextSection;
        self.reveal(
            MessageKind::Notion,
            &prompt,
            self.speeds.content(),
            AfterReveal::OfferContextualActions { section_content },
        );
        Vec::new()
    }

    fn offer_contextual_actions(&mut self, section_content: String) -> Vec<Effect> {
        let completed = self
            .cursor
            .chapter_title
            .as_deref()
            .is_some_and(|title| self.navigator.is_completed(title));
        if completed {
            self.finish(Vec::new());
            return Vec::new();
        }
        vec![Effect::GenerateQuickActions { section_content }]
    }

    fn complete_current_chapter(&mut self) -> Vec<Effect> {
        self.state = BotState::ChapterCompleted;

        match self.cursor.chapter_title.clone() {
            Some(chapter_title) => {
                self.completion_failed.remove(&chapter_title);
                self.loading = true;
                vec![Effect::CompleteChapter { chapter_title }]
            }
            None => {
                self.finish(Vec::new());
                Vec::new()
            }
        }
    }

    /// Forget progress and begin again at the first chapter
    fn restart_course(&mut self) -> Vec<Effect> {
        info!("Restarting course");
        self.started = false;
        self.cursor.chapter_title = None;
        self.completion_failed.clear();
        self.navigator.reset_progress();
        self.parked.clear();
        self.start_first_chapter()
    }

    /// Queue a reveal into a new bot message in the current view
    fn reveal(&mut self, kind: MessageKind, text: &str, interval: Duration, after: AfterReveal) {
        let handle = self.views.push(ChatMessage::bot(kind, ""));
        self.reveals.push_back(Reveal::new(handle, text, interval, after));
    }

    /// End the running sequence and offer `offered`
    fn finish(&mut self, offered: Vec<String>) {
        self.loading = false;
        self.quick_actions.set(offered);
    }
}
