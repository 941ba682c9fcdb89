use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::GRID_COLS;
use crate::catalog::CATEGORIES;
use crate::ui::theme::Theme;

/// 4x2 grid of category cards, one per part of speech.
pub struct CategoryGrid<'a> {
    selected: usize,
    theme: &'a Theme,
}

impl<'a> CategoryGrid<'a> {
    pub fn new(selected: usize, theme: &'a Theme) -> Self {
        Self { selected, theme }
    }
}

impl Widget for CategoryGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = CATEGORIES.len().div_ceil(GRID_COLS);
        let row_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
            .split(area);

        for (row, row_area) in row_layout.iter().enumerate() {
            let col_layout = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, GRID_COLS as u32); GRID_COLS])
                .split(*row_area);

            for col in 0..GRID_COLS {
                let idx = row * GRID_COLS + col;
                if idx >= CATEGORIES.len() {
                    continue;
                }
                self.render_card(idx, col_layout[col], buf);
            }
        }
    }
}

impl CategoryGrid<'_> {
    fn render_card(&self, idx: usize, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let cat = &CATEGORIES[idx];
        let (r, g, b) = cat.color;
        let card_color = Color::Rgb(r, g, b);
        let is_selected = idx == self.selected;

        let border_style = if is_selected {
            Style::default().fg(card_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.border())
        };

        let block = Block::bordered()
            .border_style(border_style)
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let title_style = Style::default()
            .fg(if is_selected { card_color } else { colors.fg() })
            .add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(cat.icon.to_string(), title_style)).alignment(Alignment::Center),
            Line::from(vec![
                Span::styled(cat.korean_name, title_style),
                Span::styled(
                    format!(" {}", cat.id),
                    Style::default().fg(colors.dim()),
                ),
            ])
            .alignment(Alignment::Center),
            Line::from(""),
            Line::from(Span::styled(
                cat.description,
                Style::default().fg(colors.fg()),
            ))
            .alignment(Alignment::Center),
            Line::from(Span::styled(
                cat.example,
                Style::default().fg(colors.dim()),
            ))
            .alignment(Alignment::Center),
        ];

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
