mod app;
mod catalog;
mod client;
mod config;
mod event;
mod session;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, AppScreen, DetailTab};
use client::GenerationClient;
use config::Config;
use event::{AppEvent, EventHandler};
use session::quiz::QuizPhase;
use ui::components::chat::ChatPanel;
use ui::components::dashboard::CategoryGrid;
use ui::components::explanation::ExplanationView;
use ui::components::quiz::QuizView;
use ui::line_input::InputResult;

#[derive(Parser)]
#[command(
    name = "pumsa",
    version,
    about = "Terminal English parts-of-speech tutor for Korean middle schoolers"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Gemini model name")]
    model: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }

    let client = Arc::new(GenerationClient::from_env(&config.model));
    if !client.is_configured() {
        log::info!("no API key configured; generation is disabled");
    }

    let events = EventHandler::new(Duration::from_millis(250));
    let mut app = App::new(config, client, events.sender());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Resize(_, _) => {}
            other => app.handle_event(other),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // The open chat overlay captures all input.
    if app.chat_open {
        handle_chat_key(app, key);
        return;
    }

    match app.screen {
        AppScreen::Dashboard => handle_dashboard_key(app, key),
        AppScreen::Detail => handle_detail_key(app, key),
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    match app.chat_input.handle(key) {
        InputResult::Cancel => app.chat_open = false,
        InputResult::Submit => app.chat_send(),
        InputResult::Continue => {}
    }
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Left | KeyCode::Char('h') => app.grid_left(),
        KeyCode::Right | KeyCode::Char('l') => app.grid_right(),
        KeyCode::Up | KeyCode::Char('k') => app.grid_up(),
        KeyCode::Down | KeyCode::Char('j') => app.grid_down(),
        KeyCode::Enter | KeyCode::Char(' ') => app.open_selected(),
        KeyCode::Char('c') => app.toggle_chat(),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.close_detail();
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_tab();
            return;
        }
        KeyCode::Char('c') => {
            app.toggle_chat();
            return;
        }
        _ => {}
    }

    match app.detail.as_ref().map(|d| d.tab) {
        Some(DetailTab::Learn) => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.scroll_learn(-1),
            KeyCode::Down | KeyCode::Char('j') => app.scroll_learn(1),
            _ => {}
        },
        Some(DetailTab::Quiz) => handle_quiz_key(app, key),
        None => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    let Some(quiz) = app.detail.as_mut().and_then(|d| d.quiz.as_mut()) else {
        return;
    };
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => quiz.focus_prev(),
        KeyCode::Down | KeyCode::Char('j') => quiz.focus_next(),
        KeyCode::Char(ch @ '1'..='4') => {
            let option = ch as usize - '1' as usize;
            app.quiz_select(option);
        }
        KeyCode::Enter => app.quiz_submit(),
        KeyCode::Char('r') => app.quiz_retry(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Dashboard => render_dashboard(frame, app),
        AppScreen::Detail => render_detail(frame, app),
    }

    if app.chat_open {
        let chat_area = ui::layout::overlay_rect(
            area.width.min(46),
            area.height.min(22),
            area,
        );
        let panel = ChatPanel::new(&app.chat, &app.chat_input, app.tick, app.theme);
        frame.render_widget(panel, chat_area);
    }
}

fn render_dashboard(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " pumsa ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " 영어 8품사 학습 도우미",
            Style::default().fg(colors.dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let grid = CategoryGrid::new(app.grid_selected, app.theme);
    frame.render_widget(grid, layout[1]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [↑↓←→] Move  [Enter] Open  [c] Chat  [q] Quit ",
        Style::default().fg(colors.dim()),
    )));
    frame.render_widget(footer, layout[2]);
}

fn render_detail(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let Some(detail) = &app.detail else {
        return;
    };
    let cat = detail.category.entry();
    let (r, g, b) = cat.color;
    let card_color = Color::Rgb(r, g, b);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!(" {} {} ", cat.icon, cat.korean_name),
                Style::default()
                    .fg(colors.header_fg())
                    .bg(card_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", cat.id),
                Style::default().fg(colors.dim()).bg(colors.header_bg()),
            ),
        ]),
        Line::from(Span::styled(
            format!(" {}", cat.description),
            Style::default().fg(colors.dim()).bg(colors.header_bg()),
        )),
    ])
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    render_tab_bar(frame, app, detail.tab, layout[1]);

    match detail.tab {
        DetailTab::Learn => {
            let view = ExplanationView::new(
                &detail.explanation,
                detail.learn_scroll,
                app.tick,
                app.theme,
            );
            frame.render_widget(view, layout[2]);
        }
        DetailTab::Quiz => {
            if let Some(quiz) = &detail.quiz {
                let view = QuizView::new(quiz, app.tick, app.theme);
                frame.render_widget(view, layout[2]);
            }
        }
    }

    let hint = match detail.tab {
        DetailTab::Learn => " [Tab] Quiz  [j/k] Scroll  [c] Chat  [Esc] Back ".to_string(),
        DetailTab::Quiz => {
            let quiz = detail.quiz.as_ref();
            match quiz.map(|q| q.phase) {
                Some(QuizPhase::Ready) => {
                    if quiz.is_some_and(|q| q.can_submit()) {
                        " [1-4] Answer  [j/k] Question  [Enter] Submit  [Esc] Back ".to_string()
                    } else {
                        " [1-4] Answer  [j/k] Question  [Esc] Back ".to_string()
                    }
                }
                Some(QuizPhase::Submitted) | Some(QuizPhase::Unavailable) => {
                    " [r] New quiz  [Tab] Learn  [Esc] Back ".to_string()
                }
                _ => " [Tab] Learn  [Esc] Back ".to_string(),
            }
        }
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        hint,
        Style::default().fg(colors.dim()),
    )));
    frame.render_widget(footer, layout[3]);
}

fn render_tab_bar(frame: &mut ratatui::Frame, app: &App, active: DetailTab, area: Rect) {
    let colors = &app.theme.colors;
    let tab_style = |tab: DetailTab| {
        if tab == active {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(colors.dim())
        }
    };

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(" 📖 학습하기 ", tab_style(DetailTab::Learn)),
        Span::styled("│", Style::default().fg(colors.border())),
        Span::styled(" 🧠 퀴즈 풀기 ", tab_style(DetailTab::Quiz)),
    ]));
    frame.render_widget(bar, area);
}
