//! Panel 2: Divination: question, cast figure, present and projected readings.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::AppState;
use crate::theme;
use crate::ui::hexagram;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(8)])
        .split(area);

    let mut header = vec![Span::styled(
        "[i]ask a question [Enter]cast [r]ecast",
        theme::muted(),
    )];
    if let Some(seed) = app.seed() {
        header.push(Span::styled(format!("  seed {seed}"), theme::neutral()));
    }
    f.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    let Some(d) = &app.divination.result else {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Focus on your question, then press i to write it down.",
                theme::muted(),
            ))),
            chunks[1],
        );
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(20)])
        .split(chunks[1]);

    // Left: the figures.
    let mut figure: Vec<Line> = vec![Line::from(Span::styled("Cast", theme::muted()))];
    figure.extend(hexagram::figure_lines(&d.casting.values()));
    if d.has_changes() {
        figure.push(Line::from(""));
        figure.push(Line::from(Span::styled("Becomes", theme::muted())));
        figure.extend(hexagram::figure_lines(&hexagram::settled_values(
            d.projected.key,
        )));
    }
    f.render_widget(Paragraph::new(figure), columns[0]);

    // Right: question and readings.
    let mut text: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Question: ", theme::muted()),
            Span::styled(d.question.clone(), theme::accent_bold()),
        ]),
        Line::from(""),
    ];
    text.extend(hexagram::card_lines("Present", &d.present, false));
    if d.has_changes() {
        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Changing toward ", theme::warning()),
            Span::styled(
                format!("{} {}", d.projected.record.symbol, d.projected.record.name),
                theme::accent_bold(),
            ),
        ]));
        text.push(Line::from(""));
        text.extend(hexagram::card_lines("Projected", &d.projected, false));
    }
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), columns[1]);
}

#[cfg(test)]
mod tests {
    use crate::app::tests::test_app;
    use crate::app::Panel;
    use crate::ui::tests::render_to_string;

    #[test]
    fn empty_panel_invites_a_question() {
        let mut app = test_app();
        app.active_panel = Panel::Divination;
        let screen = render_to_string(&app, 100, 30);
        assert!(screen.contains("Divination [2]"));
        assert!(screen.contains("press i"));
    }

    #[test]
    fn header_shows_seed_when_seeded() {
        let mut app = test_app();
        app.active_panel = Panel::Divination;
        assert_eq!(app.seed(), Some(7));
        let screen = render_to_string(&app, 100, 30);
        assert!(screen.contains("seed 7"));
    }

    #[test]
    fn cast_shows_question_and_reading() {
        let mut app = test_app();
        app.active_panel = Panel::Divination;
        app.cast("Should I move house");
        let d = app.divination.result.clone().unwrap();

        let screen = render_to_string(&app, 120, 48);
        assert!(screen.contains("Question: Should I move house"));
        assert!(screen.contains("Present"));
        assert_eq!(screen.contains("Changing toward"), d.has_changes());
        assert_eq!(screen.contains("Becomes"), d.has_changes());
    }
}
