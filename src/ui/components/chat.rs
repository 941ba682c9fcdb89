use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::session::chat::{ChatRole, ChatSession};
use crate::ui::components::explanation::SPINNER_FRAMES;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Floating chat overlay: transcript on top, input line on the bottom. The
/// transcript is bottom-anchored so the latest exchange is always visible.
pub struct ChatPanel<'a> {
    session: &'a ChatSession,
    input: &'a LineInput,
    tick: usize,
    theme: &'a Theme,
}

impl<'a> ChatPanel<'a> {
    pub fn new(
        session: &'a ChatSession,
        input: &'a LineInput,
        tick: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            session,
            input,
            tick,
            theme,
        }
    }

    fn transcript_lines(&self, width: u16) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let wrap_width = width.saturating_sub(4).max(8) as usize;
        let mut lines = Vec::new();

        for msg in &self.session.messages {
            let (prefix, style) = match msg.role {
                ChatRole::User => (
                    "나: ",
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                ChatRole::Assistant => ("튜터: ", Style::default().fg(colors.fg())),
            };
            lines.push(Line::from(Span::styled(prefix.to_string(), style)));
            for chunk in wrap_chars(&msg.text, wrap_width) {
                lines.push(Line::from(Span::styled(
                    format!("  {chunk}"),
                    Style::default().fg(colors.fg()),
                )));
            }
        }

        if self.session.is_awaiting() {
            let spinner = SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()];
            lines.push(Line::from(Span::styled(
                format!("{spinner} 입력 중..."),
                Style::default().fg(colors.dim()),
            )));
        }

        lines
    }
}

impl Widget for ChatPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(" AI 문법 튜터 ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        let lines = self.transcript_lines(layout[0].width);
        let overflow = (lines.len() as u16).saturating_sub(layout[0].height);
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((overflow, 0))
            .render(layout[0], buf);

        // Input line with a block cursor.
        let (before, cursor_ch, after) = self.input.render_parts();
        let mut spans = vec![
            Span::styled("> ", Style::default().fg(colors.accent())),
            Span::styled(before.to_string(), Style::default().fg(colors.fg())),
        ];
        match cursor_ch {
            Some(ch) => {
                spans.push(Span::styled(
                    ch.to_string(),
                    Style::default().fg(colors.bg()).bg(colors.fg()),
                ));
                spans.push(Span::styled(
                    after.to_string(),
                    Style::default().fg(colors.fg()),
                ));
            }
            None => {
                spans.push(Span::styled(
                    " ".to_string(),
                    Style::default().bg(colors.fg()),
                ));
            }
        }
        Paragraph::new(Line::from(spans)).render(layout[1], buf);
    }
}

/// Char-based wrap; good enough for short chat bubbles and safe with Hangul.
fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
