//! Application shell: terminal, event loop and effect execution

pub mod input;
pub mod state;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{AskRequest, ClassifyIntentRequest, CourseBackend};
use crate::bot::{Bot, BotEvent, Effect, InputOutcome};
use crate::chat::classify_remote;
use crate::config::Config;
use crate::theme::Theme;
use crate::ui;
use input::{Action, key_to_action};
use state::AppState;

/// Upper bound on how long a frame waits for input
const FRAME: Duration = Duration::from_millis(16);

/// Buffer between the backend stream and the forwarder
const STREAM_BUFFER: usize = 64;

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Where effects are run
    backend: Arc<dyn CourseBackend>,

    /// The course bot
    bot: Bot,

    /// State around the bot
    state: AppState,

    /// Colors
    theme: Theme,

    /// Results of running effects, sent back to the bot
    events_tx: UnboundedSender<BotEvent>,
    events_rx: UnboundedReceiver<BotEvent>,

    /// When the running reveal shows its next line
    next_tick: Option<Instant>,

    /// Cancelled on exit
    shutdown: CancellationToken,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance
    pub fn new(
        config: Config,
        backend: Arc<dyn CourseBackend>,
        shutdown: CancellationToken,
    ) -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        let bot = Bot::new(config.course_title.clone(), config.reveal);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            backend,
            bot,
            state: AppState::default(),
            theme: Theme::default(),
            events_tx,
            events_rx,
            next_tick: None,
            shutdown,
            terminal,
        })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let effects = self.bot.start();
        self.dispatch(effects);

        loop {
            self.terminal.draw(|frame| {
                ui::draw(frame, &self.bot, &mut self.state, &self.theme);
            })?;

            let timeout = self
                .next_tick
                .map(|at| at.saturating_duration_since(Instant::now()).min(FRAME))
                .unwrap_or(FRAME);

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(action) = key_to_action(key.code, key.modifiers) {
                            if self.handle_action(action) {
                                break;
                            }
                        }
                    }
                }
            }

            self.drain_events();
            self.tick_reveal();
        }

        self.shutdown.cancel();
        self.restore_terminal()?;
        Ok(())
    }

    /// Feed finished effects back into the bot
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            let effects = self.bot.handle_event(event);
            self.dispatch(effects);
        }
    }

    /// Show the next reveal line when it is due
    fn tick_reveal(&mut self) {
        let Some(interval) = self.bot.reveal_interval() else {
            self.next_tick = None;
            return;
        };

        let now = Instant::now();
        match self.next_tick {
            None => self.next_tick = Some(now + interval),
            Some(at) if now >= at => {
                let effects = self.bot.handle_event(BotEvent::RevealTick);
                self.dispatch(effects);
                self.next_tick = self.bot.reveal_interval().map(|interval| now + interval);
            }
            Some(_) => {}
        }
    }

    /// Run effects requested by the bot
    fn dispatch(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowChapterList => self.state.panel_visibility.sidebar = true,
                Effect::Reload => {
                    self.reload();
                    // Anything after a reload belonged to the old session
                    return;
                }
                effect => {
                    debug!(?effect, "Running effect");
                    let backend = Arc::clone(&self.backend);
                    let tx = self.events_tx.clone();
                    tokio::spawn(run_effect(backend, effect, tx));
                }
            }
        }
    }

    /// Start over with a fresh bot
    fn reload(&mut self) {
        info!("Reloading course");
        self.bot = Bot::new(self.config.course_title.clone(), self.config.reveal);

        // Tasks still in flight hold the old sender and can no longer reach the bot
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        self.events_tx = events_tx;
        self.events_rx = events_rx;

        self.next_tick = None;
        self.state = AppState::default();
        let effects = self.bot.start();
        self.dispatch(effects);
    }

    /// Apply the result of an input handed to the bot
    fn apply_outcome(&mut self, outcome: InputOutcome) -> bool {
        match outcome {
            InputOutcome::Accepted(effects) => {
                self.state.input.clear_message();
                self.state.selected_action = None;
                self.state.chat.scroll_back = 0;
                self.dispatch(effects);
                true
            }
            InputOutcome::Busy => {
                self.state.input.set_message("Still working on the last request...");
                false
            }
            InputOutcome::Locked => {
                self.state.input.set_error("That chapter is locked");
                false
            }
            InputOutcome::Ignored => false,
        }
    }

    /// Send the input line, or the highlighted quick action when the line is empty
    fn submit(&mut self) {
        if self.state.input.input.trim().is_empty() {
            if let Some(index) = self.state.selected_action {
                let outcome = self.bot.activate_quick_action(index);
                self.apply_outcome(outcome);
            }
            return;
        }

        let text = self.state.input.take();
        let outcome = self.bot.handle_input(&text);
        if self.apply_outcome(outcome) {
            self.state.input.add_to_history(text);
        } else {
            self.state.input.restore(text);
        }
    }

    /// Open the row selected in the chapter list
    fn open_selected(&mut self) {
        if !self.state.panel_visibility.sidebar {
            self.state.panel_visibility.sidebar = true;
            return;
        }
        let outcome = match self.state.sidebar.selected_index {
            0 => self.bot.open_table_of_contents(),
            row => {
                let title =
                    self.bot.navigator().chapters().get(row - 1).map(|c| c.title.clone());
                match title {
                    Some(title) => self.bot.open_chapter(&title),
                    None => InputOutcome::Ignored,
                }
            }
        };
        self.apply_outcome(outcome);
    }

    /// Handle an action, returns true if should exit
    fn handle_action(&mut self, action: Action) -> bool {
        let action_count = self.bot.quick_actions().actions().len();

        match action {
            Action::Quit => return true,
            Action::Submit => self.submit(),
            Action::NextAction => self.state.cycle_action(action_count, true),
            Action::PrevAction => self.state.cycle_action(action_count, false),
            Action::ActivateAction(index) => {
                let outcome = self.bot.activate_quick_action(index);
                self.apply_outcome(outcome);
            }
            Action::ToggleSidebar => {
                self.state.panel_visibility.sidebar = !self.state.panel_visibility.sidebar;
            }
            Action::SidebarNext => {
                let rows = self.bot.navigator().chapters().len() + 1;
                self.state.sidebar.select_next(rows);
            }
            Action::SidebarPrevious => self.state.sidebar.select_previous(),
            Action::OpenSelected => self.open_selected(),
            Action::OpenTableOfContents => {
                let outcome = self.bot.open_table_of_contents();
                self.apply_outcome(outcome);
            }
            Action::PageUp => self.state.chat.page_up(),
            Action::PageDown => self.state.chat.page_down(),
            Action::Up => self.state.input.history_up(),
            Action::Down => self.state.input.history_down(),
            Action::Insert(c) => self.state.input.insert_char(c),
            Action::Backspace => self.state.input.delete_char(),
            Action::Delete => self.state.input.delete_char_forward(),
            Action::Left => self.state.input.move_left(),
            Action::Right => self.state.input.move_right(),
            Action::Home => self.state.input.move_start(),
            Action::End => self.state.input.move_end(),
        }
        false
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Run one remote effect against `backend` and report the result on `tx`
///
/// Streamed answers report every decoded frame, then either
/// [`BotEvent::StreamClosed`] or [`BotEvent::StreamFailed`].
pub async fn run_effect(
    backend: Arc<dyn CourseBackend>,
    effect: Effect,
    tx: UnboundedSender<BotEvent>,
) {
    let event = match effect {
        Effect::FetchCourse => BotEvent::CourseLoaded(backend.get_course_content().await),
        Effect::FetchChapter { title, silent } => {
            let result = backend.get_chapter_content(&title).await;
            BotEvent::ChapterLoaded { title, silent, result }
        }
        Effect::GenerateQuickActions { section_content } => {
            BotEvent::QuickActionsGenerated(backend.generate_quick_actions(&section_content).await)
        }
        Effect::ClassifyIntent { user_input, current_section_title, next_section_title } => {
            let request = ClassifyIntentRequest {
                user_input,
                current_section_title,
                next_section_title,
            };
            let intent = classify_remote(backend.as_ref(), &request).await;
            BotEvent::IntentClassified { input: request.user_input, intent }
        }
        Effect::AskStream { question, context, current_chapter_title } => {
            let request = AskRequest { question, context, current_chapter_title };
            stream_answer(backend.as_ref(), &request, &tx).await
        }
        Effect::CompleteChapter { chapter_title } => {
            BotEvent::ChapterCompleted(backend.complete_chapter(&chapter_title).await)
        }
        Effect::ShowChapterList | Effect::Reload => {
            warn!(?effect, "Not a backend effect");
            return;
        }
    };

    if tx.send(event).is_err() {
        debug!("Bot went away before the result arrived");
    }
}

/// Forward stream frames while the request runs, then report how it ended
async fn stream_answer(
    backend: &dyn CourseBackend,
    request: &AskRequest,
    tx: &UnboundedSender<BotEvent>,
) -> BotEvent {
    let (stream_tx, mut stream_rx) = mpsc::channel(STREAM_BUFFER);

    let forward = async {
        while let Some(event) = stream_rx.recv().await {
            if tx.send(BotEvent::Stream(event)).is_err() {
                break;
            }
        }
    };
    let (result, ()) = tokio::join!(backend.ask_question_stream(request, stream_tx), forward);

    match result {
        Ok(()) => BotEvent::StreamClosed,
        Err(e) => BotEvent::StreamFailed(e),
    }
}
