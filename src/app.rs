use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::catalog::{CATEGORIES, PartOfSpeech};
use crate::client::GenerationClient;
use crate::config::Config;
use crate::event::AppEvent;
use crate::session::chat::ChatSession;
use crate::session::quiz::{QuizPhase, QuizSession};
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Dashboard,
    Detail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailTab {
    Learn,
    Quiz,
}

pub enum ExplanationState {
    Loading,
    Ready(String),
}

/// Everything owned by one open detail view. Dropped wholesale when the view
/// closes or the category changes; in-flight results for it then miss their
/// epoch and are discarded.
pub struct DetailState {
    pub category: PartOfSpeech,
    pub tab: DetailTab,
    pub explanation: ExplanationState,
    pub explain_epoch: u64,
    /// Created the first time the quiz tab is activated, never on render.
    pub quiz: Option<QuizSession>,
    pub learn_scroll: u16,
}

pub const GRID_COLS: usize = 4;

pub struct App {
    pub screen: AppScreen,
    pub grid_selected: usize,
    pub detail: Option<DetailState>,
    pub chat: ChatSession,
    pub chat_open: bool,
    pub chat_input: LineInput,
    pub theme: &'static Theme,
    pub config: Config,
    pub should_quit: bool,
    /// Spinner frame counter, advanced on tick.
    pub tick: usize,
    client: Arc<GenerationClient>,
    tx: Sender<AppEvent>,
    next_epoch: u64,
}

impl App {
    pub fn new(config: Config, client: Arc<GenerationClient>, tx: Sender<AppEvent>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        Self {
            screen: AppScreen::Dashboard,
            grid_selected: 0,
            detail: None,
            chat: ChatSession::new(),
            chat_open: false,
            chat_input: LineInput::new(""),
            theme,
            config,
            should_quit: false,
            tick: 0,
            client,
            tx,
            next_epoch: 0,
        }
    }

    fn alloc_epoch(&mut self) -> u64 {
        self.next_epoch += 1;
        self.next_epoch
    }

    // --- dashboard grid ---

    pub fn grid_left(&mut self) {
        if self.grid_selected % GRID_COLS > 0 {
            self.grid_selected -= 1;
        }
    }

    pub fn grid_right(&mut self) {
        if self.grid_selected % GRID_COLS < GRID_COLS - 1 && self.grid_selected + 1 < CATEGORIES.len()
        {
            self.grid_selected += 1;
        }
    }

    pub fn grid_up(&mut self) {
        if self.grid_selected >= GRID_COLS {
            self.grid_selected -= GRID_COLS;
        }
    }

    pub fn grid_down(&mut self) {
        if self.grid_selected + GRID_COLS < CATEGORIES.len() {
            self.grid_selected += GRID_COLS;
        }
    }

    // --- detail view lifecycle ---

    /// Open the detail view for a category and kick off the explanation
    /// fetch. One mount, one fetch; tab switches and re-renders never
    /// re-invoke it.
    pub fn open_category(&mut self, category: PartOfSpeech) {
        let epoch = self.alloc_epoch();
        self.detail = Some(DetailState {
            category,
            tab: DetailTab::Learn,
            explanation: ExplanationState::Loading,
            explain_epoch: epoch,
            quiz: None,
            learn_scroll: 0,
        });
        self.screen = AppScreen::Detail;
        self.spawn_explanation(category, epoch);
    }

    pub fn open_selected(&mut self) {
        self.open_category(CATEGORIES[self.grid_selected].id);
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.screen = AppScreen::Dashboard;
    }

    /// Switch tabs; first activation of the quiz tab creates the session and
    /// starts the fetch.
    pub fn set_tab(&mut self, tab: DetailTab) {
        let Some(detail) = &mut self.detail else {
            return;
        };
        detail.tab = tab;
        if tab == DetailTab::Quiz && detail.quiz.is_none() {
            let category = detail.category;
            let epoch = self.alloc_epoch();
            if let Some(detail) = &mut self.detail {
                detail.quiz = Some(QuizSession::new(category, epoch));
            }
            self.spawn_quiz(category, epoch);
        }
    }

    pub fn toggle_tab(&mut self) {
        let tab = match self.detail.as_ref().map(|d| d.tab) {
            Some(DetailTab::Learn) => DetailTab::Quiz,
            Some(DetailTab::Quiz) => DetailTab::Learn,
            None => return,
        };
        self.set_tab(tab);
    }

    pub fn scroll_learn(&mut self, delta: i32) {
        if let Some(detail) = &mut self.detail {
            detail.learn_scroll = detail.learn_scroll.saturating_add_signed(delta as i16);
        }
    }

    // --- quiz ---

    pub fn quiz_select(&mut self, option: usize) {
        if let Some(quiz) = self.detail.as_mut().and_then(|d| d.quiz.as_mut()) {
            let focused = quiz.focused;
            quiz.select(focused, option);
        }
    }

    pub fn quiz_submit(&mut self) {
        if let Some(quiz) = self.detail.as_mut().and_then(|d| d.quiz.as_mut()) {
            quiz.submit();
        }
    }

    /// "Try a new quiz": full replace of questions and answers, then a fresh
    /// generation. Allowed from the submitted and unavailable states.
    pub fn quiz_retry(&mut self) {
        let Some(detail) = &mut self.detail else {
            return;
        };
        let Some(quiz) = &detail.quiz else {
            return;
        };
        if !matches!(quiz.phase, QuizPhase::Submitted | QuizPhase::Unavailable) {
            return;
        }
        let category = detail.category;
        let epoch = self.alloc_epoch();
        if let Some(quiz) = self.detail.as_mut().and_then(|d| d.quiz.as_mut()) {
            quiz.reset(epoch);
        }
        self.spawn_quiz(category, epoch);
    }

    // --- chat ---

    pub fn toggle_chat(&mut self) {
        self.chat_open = !self.chat_open;
    }

    /// Send the current input line. Empty input and sends while a response is
    /// pending are no-ops (the session enforces both).
    pub fn chat_send(&mut self) {
        let input = self.chat_input.value().to_string();
        let epoch = self.alloc_epoch();
        if let Some((message, history)) = self.chat.start_send(&input, epoch) {
            self.chat_input = LineInput::new("");
            self.spawn_chat(message, history, epoch);
        }
    }

    // --- generation workers ---
    //
    // Each fetch runs the blocking client call on its own thread and posts
    // the result back over the event channel tagged with category and epoch.
    // The handlers below compare epochs before applying anything, which is
    // what drops results for views that were closed or reset in the meantime.

    fn spawn_explanation(&self, category: PartOfSpeech, epoch: u64) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let text = client.explain(category);
            let _ = tx.send(AppEvent::ExplanationReady {
                category,
                epoch,
                text,
            });
        });
    }

    fn spawn_quiz(&self, category: PartOfSpeech, epoch: u64) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let questions = client.quiz(category);
            let _ = tx.send(AppEvent::QuizReady {
                category,
                epoch,
                questions,
            });
        });
    }

    fn spawn_chat(&self, message: String, history: Vec<crate::session::chat::ChatMessage>, epoch: u64) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let text = client.chat(&message, &history);
            let _ = tx.send(AppEvent::ChatReply { epoch, text });
        });
    }

    /// Apply a non-key event from the channel.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.tick = self.tick.wrapping_add(1),
            AppEvent::ExplanationReady {
                category,
                epoch,
                text,
            } => {
                let Some(detail) = &mut self.detail else {
                    log::debug!("dropping explanation for closed view ({category})");
                    return;
                };
                if detail.category != category || detail.explain_epoch != epoch {
                    log::debug!("dropping stale explanation for {category}");
                    return;
                }
                detail.explanation = ExplanationState::Ready(text);
            }
            AppEvent::QuizReady {
                category,
                epoch,
                questions,
            } => {
                let Some(quiz) = self.detail.as_mut().and_then(|d| d.quiz.as_mut()) else {
                    log::debug!("dropping quiz for closed view ({category})");
                    return;
                };
                if quiz.category != category || quiz.epoch() != epoch {
                    log::debug!("dropping stale quiz for {category}");
                    return;
                }
                quiz.finish_loading(questions);
            }
            AppEvent::ChatReply { epoch, text } => {
                self.chat.receive(epoch, text);
            }
            AppEvent::Key(_) | AppEvent::Resize(_, _) => {}
        }
    }
}
