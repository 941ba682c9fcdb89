use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use pumsa::app::{App, DetailTab, ExplanationState};
use pumsa::catalog::{CATEGORIES, PartOfSpeech};
use pumsa::client::{
    CHAT_NO_KEY, EXPLAIN_NO_KEY, GenerateRequest, GenerationClient, Provider, ProviderError,
};
use pumsa::config::Config;
use pumsa::event::AppEvent;
use pumsa::session::quiz::QuizPhase;
use pumsa::ui::components::quiz::QuizView;
use pumsa::ui::line_input::LineInput;
use pumsa::ui::theme::Theme;

const QUIZ_JSON: &str = r#"[
    {"question":"다음 중 동사는?","options":["run","apple","happy","very"],"correctAnswer":0,"explanation":"run은 동작을 나타내요."},
    {"question":"빈칸에 알맞은 동사는? I ___ breakfast.","options":["eat","blue","slowly","wow"],"correctAnswer":0,"explanation":"eat이 동사예요."},
    {"question":"상태를 나타내는 동사는?","options":["book","is","pretty","and"],"correctAnswer":1,"explanation":"is는 상태를 나타내는 동사예요."}
]"#;

/// Scripted provider: answers JSON-schema requests with the canned quiz and
/// everything else with a short explanation, while counting calls.
struct ScriptedProvider {
    quiz_response: Result<String, ()>,
    explain_calls: AtomicUsize,
    quiz_calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(quiz_response: Result<String, ()>) -> Self {
        Self {
            quiz_response,
            explain_calls: AtomicUsize::new(0),
            quiz_calls: AtomicUsize::new(0),
        }
    }
}

impl Provider for ScriptedProvider {
    fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        if request.response_schema.is_some() {
            self.quiz_calls.fetch_add(1, Ordering::SeqCst);
            match &self.quiz_response {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(ProviderError::Transport("connection reset".into())),
            }
        } else {
            self.explain_calls.fetch_add(1, Ordering::SeqCst);
            Ok("## 동사\n**동사**는 동작을 나타내요.".to_string())
        }
    }
}

fn app_with(provider: Arc<ScriptedProvider>) -> (App, mpsc::Receiver<AppEvent>) {
    let client = Arc::new(GenerationClient::new(provider));
    let (tx, rx) = mpsc::channel();
    (App::new(Config::default(), client, tx), rx)
}

fn pump(app: &mut App, rx: &mpsc::Receiver<AppEvent>, count: usize) {
    for _ in 0..count {
        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("generation worker should complete");
        app.handle_event(event);
    }
}

fn buffer_text(buf: &Buffer) -> String {
    // Wide glyphs occupy extra buffer cells that hold placeholder " "
    // symbols; skip those so the reconstructed text matches what was drawn.
    let mut text = String::new();
    let mut skip = 0usize;
    for cell in buf.content() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        let symbol = cell.symbol();
        text.push_str(symbol);
        skip = UnicodeWidthStr::width(symbol).saturating_sub(1);
    }
    text
}

#[test]
fn catalog_has_eight_entries() {
    assert_eq!(CATEGORIES.len(), 8);
}

#[test]
fn verb_quiz_happy_path() {
    let provider = Arc::new(ScriptedProvider::new(Ok(QUIZ_JSON.to_string())));
    let (mut app, rx) = app_with(provider.clone());

    app.open_category(PartOfSpeech::Verb);
    pump(&mut app, &rx, 1);
    assert!(matches!(
        app.detail.as_ref().unwrap().explanation,
        ExplanationState::Ready(_)
    ));

    // Opening the quiz tab triggers exactly one fetch.
    app.set_tab(DetailTab::Quiz);
    app.set_tab(DetailTab::Learn);
    app.set_tab(DetailTab::Quiz);
    pump(&mut app, &rx, 1);
    assert_eq!(provider.quiz_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.explain_calls.load(Ordering::SeqCst), 1);

    let quiz = app.detail.as_ref().unwrap().quiz.as_ref().unwrap();
    assert_eq!(quiz.phase, QuizPhase::Ready);
    assert_eq!(quiz.questions.len(), 3);
    assert!(quiz.questions.iter().all(|q| q.options.len() == 4));

    // Submit stays locked until every question is answered.
    assert!(!quiz.can_submit());
    app.quiz_submit();
    assert_eq!(
        app.detail.as_ref().unwrap().quiz.as_ref().unwrap().phase,
        QuizPhase::Ready
    );

    app.quiz_select(0);
    {
        let quiz = app.detail.as_mut().unwrap().quiz.as_mut().unwrap();
        quiz.focus_next();
    }
    app.quiz_select(2);
    {
        let quiz = app.detail.as_mut().unwrap().quiz.as_mut().unwrap();
        quiz.focus_next();
    }
    app.quiz_select(1);

    let quiz = app.detail.as_ref().unwrap().quiz.as_ref().unwrap();
    assert!(quiz.can_submit());
    app.quiz_submit();

    let quiz = app.detail.as_ref().unwrap().quiz.as_ref().unwrap();
    assert_eq!(quiz.phase, QuizPhase::Submitted);
    assert!(quiz.is_correct(0));
    assert!(!quiz.is_correct(1));
    assert!(quiz.is_correct(2));
    assert_eq!(quiz.score(), 2);
}

#[test]
fn fenced_quiz_json_still_parses() {
    let fenced = format!("```json\n{QUIZ_JSON}\n```");
    let provider = Arc::new(ScriptedProvider::new(Ok(fenced)));
    let (mut app, rx) = app_with(provider);

    app.open_category(PartOfSpeech::Verb);
    app.set_tab(DetailTab::Quiz);
    pump(&mut app, &rx, 2);

    let quiz = app.detail.as_ref().unwrap().quiz.as_ref().unwrap();
    assert_eq!(quiz.phase, QuizPhase::Ready);
    assert_eq!(quiz.questions.len(), 3);
}

#[test]
fn provider_fault_renders_unavailable_placeholder() {
    let provider = Arc::new(ScriptedProvider::new(Err(())));
    let (mut app, rx) = app_with(provider);

    app.open_category(PartOfSpeech::Verb);
    app.set_tab(DetailTab::Quiz);
    pump(&mut app, &rx, 2);

    let quiz = app.detail.as_ref().unwrap().quiz.as_ref().unwrap();
    assert_eq!(quiz.phase, QuizPhase::Unavailable);

    let theme = Theme::default();
    let area = Rect::new(0, 0, 60, 12);
    let mut buf = Buffer::empty(area);
    QuizView::new(quiz, 0, &theme).render(area, &mut buf);
    let text = buffer_text(&buf);
    assert!(text.contains("퀴즈를 불러오지 못했습니다"));
}

#[test]
fn missing_key_short_circuits_every_operation() {
    let client = Arc::new(GenerationClient::unconfigured());
    let (tx, rx) = mpsc::channel();
    let mut app = App::new(Config::default(), client, tx);

    app.open_category(PartOfSpeech::Noun);
    app.set_tab(DetailTab::Quiz);
    pump(&mut app, &rx, 2);

    let detail = app.detail.as_ref().unwrap();
    match &detail.explanation {
        ExplanationState::Ready(text) => assert_eq!(text, EXPLAIN_NO_KEY),
        ExplanationState::Loading => panic!("explanation never resolved"),
    }
    assert_eq!(
        detail.quiz.as_ref().unwrap().phase,
        QuizPhase::Unavailable
    );

    app.chat_input = LineInput::new("도와줘");
    app.chat_send();
    pump(&mut app, &rx, 1);
    assert_eq!(app.chat.messages.last().unwrap().text, CHAT_NO_KEY);
}

#[test]
fn chat_round_trip_appends_user_then_assistant() {
    let provider = Arc::new(ScriptedProvider::new(Ok(QUIZ_JSON.to_string())));
    let (mut app, rx) = app_with(provider);

    let before = app.chat.messages.len();
    app.chat_input = LineInput::new("형용사랑 부사 차이가 뭐야?");
    app.chat_send();
    assert!(app.chat.is_awaiting());
    pump(&mut app, &rx, 1);

    assert_eq!(app.chat.messages.len(), before + 2);
    let user = &app.chat.messages[before];
    let assistant = &app.chat.messages[before + 1];
    assert_eq!(user.text, "형용사랑 부사 차이가 뭐야?");
    assert!(matches!(
        user.role,
        pumsa::session::chat::ChatRole::User
    ));
    assert!(matches!(
        assistant.role,
        pumsa::session::chat::ChatRole::Assistant
    ));
    assert!(!app.chat.is_awaiting());
}

#[test]
fn retry_before_first_result_drops_the_stale_result() {
    let client = Arc::new(GenerationClient::unconfigured());
    let (tx, _rx) = mpsc::channel();
    let mut app = App::new(Config::default(), client, tx);

    app.open_category(PartOfSpeech::Adverb);
    app.set_tab(DetailTab::Quiz);
    let stale = app.detail.as_ref().unwrap().quiz.as_ref().unwrap().epoch();
    app.detail
        .as_mut()
        .unwrap()
        .quiz
        .as_mut()
        .unwrap()
        .reset(stale + 1);

    app.handle_event(AppEvent::QuizReady {
        category: PartOfSpeech::Adverb,
        epoch: stale,
        questions: pumsa::client::parse_quiz_response(QUIZ_JSON),
    });

    let quiz = app.detail.as_ref().unwrap().quiz.as_ref().unwrap();
    assert_eq!(quiz.phase, QuizPhase::Loading);
    assert!(quiz.questions.is_empty());
    assert!(quiz.selections.is_empty());
}
