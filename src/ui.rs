use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::{
    app::App,
    session::{TypingSession, RETURN_MARKER},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Stand-in for a mistyped space so it stays visible.
const MISTAKEN_SPACE: &str = "·";

/// Lay out before / at / after cursor as styled lines, splitting on newlines.
pub fn snippet_lines(session: &TypingSession) -> Vec<Line<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let typed_style = Style::default().patch(bold_style).fg(Color::Green);
    let pending_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);

    let (at_cursor, cursor_style) = if session.has_mistakes() {
        (
            session
                .at_cursor()
                .replace(' ', MISTAKEN_SPACE)
                .replace('\n', RETURN_MARKER),
            Style::default()
                .patch(bold_style)
                .fg(Color::White)
                .bg(Color::Red),
        )
    } else {
        (
            session.at_cursor(),
            Style::default()
                .patch(pending_style)
                .add_modifier(Modifier::UNDERLINED | Modifier::REVERSED),
        )
    };

    let segments = [
        (session.before_cursor(), typed_style),
        (at_cursor, cursor_style),
        (session.after_cursor(), pending_style),
    ];

    let mut lines = vec![Line::default()];
    for (text, style) in segments {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            if part.is_empty() {
                continue;
            }
            if let Some(line) = lines.last_mut() {
                line.spans.push(Span::styled(part.to_string(), style));
            }
        }
    }
    lines
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(1), // live stats
                    Constraint::Length(1), // padding
                    Constraint::Min(1),    // snippet
                    Constraint::Length(1), // recent scores
                    Constraint::Length(1), // legend
                ]
                .as_ref(),
            )
            .split(area);

        let category = self
            .library
            .category(session.snippet().category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();

        let stats = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} wpm", self.live_wpm()), bold_style),
            Span::raw("   "),
            Span::styled(format!("{}% acc", session.accuracy()), bold_style),
            Span::raw("   "),
            Span::styled(
                format!("#{} {}", session.snippet().id, category),
                italic_style,
            ),
        ]))
        .alignment(Alignment::Center);

        stats.render(chunks[0], buf);

        // indentation is significant, so never trim when wrapping
        let snippet = Paragraph::new(snippet_lines(session))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false });

        snippet.render(chunks[2], buf);

        let recent = if self.board.is_empty() {
            String::new()
        } else {
            format!(
                "recent: {}   avg {} wpm",
                self.board
                    .scores()
                    .map(|s| format!("{}/{}%", s.wpm, s.accuracy))
                    .join("  "),
                self.board.average_wpm().unwrap_or_default()
            )
        };

        Paragraph::new(Span::styled(recent, dim_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let legend = Paragraph::new(Span::styled(
            "(tab) indent / (→) new snippet / (esc)ape",
            italic_style,
        ));

        legend.render(chunks[4], buf);
    }
}
