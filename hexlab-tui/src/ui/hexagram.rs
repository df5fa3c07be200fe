//! Hexagram drawing: figures line by line, and text cards.

use ratatui::text::{Line, Span};

use hexlab_core::domain::{HexagramKey, LineValue};
use hexlab_core::oracle::Hexagram;

use crate::theme;

const YANG: &str = "━━━━━━━━━━━";
const YIN: &str = "━━━━━   ━━━━━";

/// Settled line values for a bare key.
pub fn settled_values(key: HexagramKey) -> [LineValue; 6] {
    key.bits().map(|bit| {
        if bit == 1 {
            LineValue::YoungYang
        } else {
            LineValue::YoungYin
        }
    })
}

/// Six rows, top line first. Moving lines carry a marker.
pub fn figure_lines(values: &[LineValue; 6]) -> Vec<Line<'static>> {
    values
        .iter()
        .rev()
        .map(|&value| {
            let body = if value.is_yang() {
                format!(" {YANG} ")
            } else {
                YIN.to_string()
            };
            let marker = match value {
                LineValue::OldYang => " ○",
                LineValue::OldYin => " ✕",
                _ => "",
            };
            Line::from(vec![
                Span::styled(body, theme::line(value)),
                Span::styled(marker, theme::warning()),
            ])
        })
        .collect()
}

/// Name, judgment, interpretation, and outlook. A dimmed card renders muted.
pub fn card_lines(title: &str, hexagram: &Hexagram, dimmed: bool) -> Vec<Line<'static>> {
    let r = &hexagram.record;
    let (head, body) = if dimmed {
        (theme::dimmed(), theme::dimmed())
    } else {
        (theme::accent_bold(), theme::text())
    };
    let outlook = if dimmed {
        theme::dimmed()
    } else {
        theme::outlook(r.outlook)
    };

    vec![
        Line::from(Span::styled(title.to_string(), theme::muted())),
        Line::from(vec![
            Span::styled(format!("{} {} ", r.symbol, r.name), head),
            Span::styled(format!("({})", r.pinyin), theme::muted()),
        ]),
        Line::from(vec![
            Span::styled("Key: ", theme::muted()),
            Span::styled(hexagram.key.to_string(), body),
            Span::styled("  Outlook: ", theme::muted()),
            Span::styled(r.outlook.to_string(), outlook),
        ]),
        Line::from(""),
        Line::from(Span::styled(r.judgment.clone(), body)),
        Line::from(""),
        Line::from(Span::styled(r.interpretation.clone(), body)),
    ]
}
