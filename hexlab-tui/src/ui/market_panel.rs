//! Panel 1: Market: instrument picker, present/projected cards, six-line table.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use hexlab_core::oracle::MarketReading;

use crate::app::AppState;
use crate::theme;
use crate::ui::hexagram;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let market = &app.market;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(9),
        ])
        .split(area);

    // Header: instruments + reference date.
    let mut picker: Vec<Span> = vec![Span::styled("Instrument: ", theme::muted())];
    for (i, instrument) in market.catalog.iter().enumerate() {
        let style = if i == market.selected {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::muted()
        };
        picker.push(Span::styled(
            format!(" {} ({}) ", instrument.label, instrument.symbol),
            style,
        ));
        picker.push(Span::raw(" "));
    }
    let header = vec![
        Line::from(picker),
        Line::from(vec![
            Span::styled("Reference date: ", theme::muted()),
            Span::styled(market.reference_date.to_string(), theme::accent_bold()),
            Span::styled(
                format!("  lookback {}d", app.lookback_days),
                theme::muted(),
            ),
            Span::styled(
                "  [j/k]instrument [h/l]±1d [H/L]±7d [t]oday [Enter]read",
                theme::muted(),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(header), chunks[0]);

    let Some(reading) = &market.reading else {
        let hint = if app.pending.is_some() {
            Line::from(Span::styled("Fetching…", theme::warning()))
        } else {
            Line::from(Span::styled(
                "No reading yet. Pick an instrument and press Enter.",
                theme::muted(),
            ))
        };
        f.render_widget(Paragraph::new(hint), chunks[1]);
        return;
    };

    render_cards(f, chunks[1], reading);
    render_line_table(f, chunks[2], reading);
}

fn render_cards(f: &mut Frame, area: Rect, reading: &MarketReading) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let present = hexagram::card_lines(
        &format!("Present: {} as of {}", reading.symbol, reading.reference_date),
        &reading.present,
        false,
    );
    f.render_widget(
        Paragraph::new(present).wrap(Wrap { trim: true }),
        halves[0],
    );

    let projected = if reading.has_changes() {
        hexagram::card_lines("Projected", &reading.projected, false)
    } else {
        hexagram::card_lines("Projected (no change)", &reading.projected, true)
    };
    f.render_widget(
        Paragraph::new(projected).wrap(Wrap { trim: true }),
        halves[1],
    );
}

/// Most recent bar first, matching line positions 0 → 5.
fn render_line_table(f: &mut Frame, area: Rect, reading: &MarketReading) {
    let enc = &reading.encoding;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Mean |change| ", theme::muted()),
        Span::styled(format!("{:.3}%", enc.mean_change * 100.0), theme::accent()),
        Span::styled("  Moving above ", theme::muted()),
        Span::styled(format!("{:.3}%", enc.threshold * 100.0), theme::warning()),
        Span::styled(
            format!("  ({} bars fetched)", reading.bars_available),
            theme::muted(),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        format!(
            "{:>3} {:>10} {:<12} {:>11} {:>9}  {}",
            "Pos", "Date", "Line", "Close", "Change", "Type"
        ),
        theme::accent_bold(),
    )));

    for line in &enc.lines {
        let moving = line.value.is_moving();
        let row_style = if moving { theme::warning() } else { theme::muted() };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>3} {:>10} ", line.position.index(), line.date),
                row_style,
            ),
            // CJK names take two cells per glyph; padding counts chars.
            Span::styled(line.position.traditional_name(), row_style),
            Span::styled(
                format!(" {:<7} {:>11.3} ", line.position.label(), line.close),
                row_style,
            ),
            Span::styled(
                format!("{:>+8.2}%", line.change * 100.0),
                theme::change(line.change),
            ),
            Span::styled(format!("  {}", line.value.label()), theme::line(line.value)),
            Span::styled(if moving { "  moving" } else { "" }, theme::warning()),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
