use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::theme::Theme;

/// Render the markdown subset the teacher persona actually emits: `##`/`###`
/// headings, `- ` bullets, full-line bold, and inline `**bold**` runs.
/// Anything else passes through as plain text.
pub fn render_lines(text: &str, theme: &Theme) -> Vec<Line<'static>> {
    let colors = &theme.colors;
    let mut out = Vec::new();

    for raw in text.lines() {
        let line = raw.trim_end();

        if let Some(rest) = line.strip_prefix("### ") {
            out.push(Line::from(Span::styled(
                rest.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
        } else if let Some(rest) = line.strip_prefix("## ") {
            out.push(Line::from(Span::styled(
                rest.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )));
        } else if line.starts_with("**") && line.ends_with("**") && line.len() > 4 {
            out.push(Line::from(Span::styled(
                line.replace("**", ""),
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD),
            )));
        } else if let Some(rest) = line.trim_start().strip_prefix("- ") {
            let mut spans = vec![Span::styled(
                "  • ".to_string(),
                Style::default().fg(colors.accent()),
            )];
            spans.extend(inline_spans(rest, theme));
            out.push(Line::from(spans));
        } else {
            out.push(Line::from(inline_spans(line, theme)));
        }
    }

    out
}

/// Split a line on `**bold**` runs. An unmatched `**` renders literally.
fn inline_spans(line: &str, theme: &Theme) -> Vec<Span<'static>> {
    let colors = &theme.colors;
    let plain = Style::default().fg(colors.fg());
    let bold = Style::default()
        .fg(colors.accent())
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    let mut rest = line;
    loop {
        match rest.find("**") {
            Some(start) => {
                let after = &rest[start + 2..];
                match after.find("**") {
                    Some(end) => {
                        if start > 0 {
                            spans.push(Span::styled(rest[..start].to_string(), plain));
                        }
                        spans.push(Span::styled(after[..end].to_string(), bold));
                        rest = &after[end + 2..];
                    }
                    None => {
                        spans.push(Span::styled(rest.to_string(), plain));
                        break;
                    }
                }
            }
            None => {
                if !rest.is_empty() || spans.is_empty() {
                    spans.push(Span::styled(rest.to_string(), plain));
                }
                break;
            }
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> Theme {
        Theme::default()
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn headings_strip_markers() {
        let lines = render_lines("## 정의\n### 역할", &theme());
        assert_eq!(line_text(&lines[0]), "정의");
        assert_eq!(line_text(&lines[1]), "역할");
    }

    #[test]
    fn full_line_bold_strips_markers() {
        let lines = render_lines("**Definition**", &theme());
        assert_eq!(line_text(&lines[0]), "Definition");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn bullets_get_a_marker() {
        let lines = render_lines("- I **run** fast.", &theme());
        let text = line_text(&lines[0]);
        assert!(text.starts_with("  • "));
        assert!(text.contains("run"));
        assert!(!text.contains("**"));
    }

    #[test]
    fn inline_bold_is_split_out() {
        let lines = render_lines("She is **happy** today.", &theme());
        let spans = &lines[0].spans;
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content.as_ref(), "happy");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn unmatched_bold_renders_literally() {
        let lines = render_lines("a ** b", &theme());
        assert_eq!(line_text(&lines[0]), "a ** b");
    }

    #[test]
    fn empty_lines_are_preserved() {
        let lines = render_lines("a\n\nb", &theme());
        assert_eq!(lines.len(), 3);
        assert_eq!(line_text(&lines[1]), "");
    }
}
