use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::ExplanationState;
use crate::ui::markdown;
use crate::ui::theme::Theme;

pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Learn tab body: loading spinner while the explanation is generated,
/// rendered markdown once it lands.
pub struct ExplanationView<'a> {
    state: &'a ExplanationState,
    scroll: u16,
    tick: usize,
    theme: &'a Theme,
}

impl<'a> ExplanationView<'a> {
    pub fn new(state: &'a ExplanationState, scroll: u16, tick: usize, theme: &'a Theme) -> Self {
        Self {
            state,
            scroll,
            tick,
            theme,
        }
    }
}

impl Widget for ExplanationView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        match self.state {
            ExplanationState::Loading => {
                let spinner = SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()];
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("{spinner} AI 선생님이 재미있는 설명을 준비하고 있어요..."),
                        Style::default().fg(colors.dim()),
                    )),
                ];
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(inner, buf);
            }
            ExplanationState::Ready(text) => {
                let lines = markdown::render_lines(text, self.theme);
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .scroll((self.scroll, 0))
                    .render(inner, buf);
            }
        }
    }
}
