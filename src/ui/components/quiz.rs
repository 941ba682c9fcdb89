use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::quiz::{QuizPhase, QuizSession};
use crate::ui::components::explanation::SPINNER_FRAMES;
use crate::ui::theme::Theme;

const OPTION_KEYS: [char; 4] = ['1', '2', '3', '4'];

/// Quiz tab body: question list with selection highlighting, grading marks
/// after submission, and the unavailable placeholder.
pub struct QuizView<'a> {
    session: &'a QuizSession,
    tick: usize,
    theme: &'a Theme,
}

impl<'a> QuizView<'a> {
    pub fn new(session: &'a QuizSession, tick: usize, theme: &'a Theme) -> Self {
        Self {
            session,
            tick,
            theme,
        }
    }

    fn centered_notice(&self, text: &str, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                text.to_string(),
                Style::default().fg(colors.dim()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn question_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let session = self.session;
        let submitted = session.phase == QuizPhase::Submitted;
        let mut lines = Vec::new();

        for (idx, q) in session.questions.iter().enumerate() {
            let focused = idx == session.focused && !submitted;
            let marker = if focused { "> " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{marker}Q{num}. ", num = idx + 1),
                    Style::default()
                        .fg(if focused { colors.accent() } else { colors.fg() })
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    q.question.clone(),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                ),
            ]));

            for (opt_idx, opt) in q.options.iter().enumerate() {
                let selected = session.selections[idx] == Some(opt_idx);
                let style = if submitted {
                    if opt_idx == q.correct_answer {
                        Style::default()
                            .fg(colors.correct())
                            .add_modifier(Modifier::BOLD)
                    } else if selected {
                        Style::default().fg(colors.incorrect())
                    } else {
                        Style::default().fg(colors.dim())
                    }
                } else if selected {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };

                let mark = if submitted {
                    if opt_idx == q.correct_answer {
                        " ✓"
                    } else if selected {
                        " ✗"
                    } else {
                        ""
                    }
                } else if selected {
                    " ●"
                } else {
                    ""
                };

                lines.push(Line::from(Span::styled(
                    format!(
                        "    [{key}] {opt}{mark}",
                        key = OPTION_KEYS[opt_idx.min(3)]
                    ),
                    style,
                )));
            }

            if submitted {
                let correct = session.is_correct(idx);
                lines.push(Line::from(Span::styled(
                    format!("    해설: {}", q.explanation),
                    Style::default().fg(if correct {
                        colors.correct()
                    } else {
                        colors.incorrect()
                    }),
                )));
            }
            lines.push(Line::from(""));
        }

        if submitted {
            lines.push(Line::from(Span::styled(
                format!(
                    "점수: {score} / {total}",
                    score = session.score(),
                    total = session.questions.len()
                ),
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )));
        }

        lines
    }
}

impl Widget for QuizView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        match self.session.phase {
            QuizPhase::Loading => {
                let spinner = SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()];
                self.centered_notice(
                    &format!("{spinner} AI 선생님이 퀴즈를 만들고 있어요..."),
                    inner,
                    buf,
                );
            }
            QuizPhase::Unavailable => {
                self.centered_notice("퀴즈를 불러오지 못했습니다. 다시 시도해주세요. [r]", inner, buf);
            }
            QuizPhase::Ready | QuizPhase::Submitted => {
                // Keep the focused question in view: roughly 6 lines per
                // question card.
                let scroll = if self.session.phase == QuizPhase::Ready {
                    (self.session.focused as u16 * 6).saturating_sub(inner.height / 2)
                } else {
                    0
                };
                Paragraph::new(self.question_lines())
                    .wrap(Wrap { trim: false })
                    .scroll((scroll, 0))
                    .render(inner, buf);
            }
        }
    }
}
