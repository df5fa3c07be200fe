//! Panel 3: Help: keyboard shortcuts and how the lines are read.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-3", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "e", "Open error history overlay");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Market");
    key(&mut lines, "j / k", "Next / previous instrument");
    key(&mut lines, "h / l", "Reference date back / forward one day");
    key(&mut lines, "H / L", "Reference date back / forward one week");
    key(&mut lines, "t", "Reference date to today");
    key(&mut lines, "Enter", "Fetch bars and read the hexagram");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Divination");
    key(&mut lines, "i", "Write a question");
    key(&mut lines, "Enter", "Cast six lines for the question");
    key(&mut lines, "r", "Recast the last question");
    lines.push(Line::from(""));

    section(&mut lines, "Reading the Lines");
    key(&mut lines, "Position 0", "Bottom line, most recent session");
    key(&mut lines, "Yang (7)", "Close at or above open");
    key(&mut lines, "Yin (8)", "Close below open");
    key(&mut lines, "Old Yang/Yin", "Move beyond 1.5× the six-bar mean; flips in the projection");
    key(&mut lines, "Coins", "Heads 3, tails 2; three tosses per line, bottom line first");

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
