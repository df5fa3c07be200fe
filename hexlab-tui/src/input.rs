//! Keyboard input dispatch: overlays → global keys → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, Panel};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::Question => {
            handle_question_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='3') => {
            if let Some(panel) = Panel::from_index(c as usize - '1' as usize) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Market => handle_market_key(app, key),
        Panel::Divination => handle_divination_key(app, key),
        Panel::Help => {} // display only
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_question_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
        }
        KeyCode::Enter => {
            let question = app.question_input.clone();
            let before = app.divination.casts;
            app.cast(&question);
            if app.divination.casts > before {
                app.overlay = Overlay::None;
                app.question_input.clear();
            }
        }
        KeyCode::Backspace => {
            app.question_input.pop();
        }
        KeyCode::Char(c) => {
            app.question_input.push(c);
        }
        _ => {}
    }
}

fn handle_market_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.market.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.market.select_prev(),
        KeyCode::Char('h') | KeyCode::Left => app.market.shift_date(-1),
        KeyCode::Char('l') | KeyCode::Right => app.market.shift_date(1),
        KeyCode::Char('H') => app.market.shift_date(-7),
        KeyCode::Char('L') => app.market.shift_date(7),
        KeyCode::Char('t') => {
            app.market.reference_date = chrono::Local::now().date_naive();
        }
        KeyCode::Enter => app.request_market_reading(),
        _ => {}
    }
}

fn handle_divination_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') => {
            app.overlay = Overlay::Question;
        }
        KeyCode::Enter => {
            if app.question_input.trim().is_empty() {
                app.overlay = Overlay::Question;
            } else {
                let question = app.question_input.clone();
                app.cast(&question);
            }
        }
        KeyCode::Char('r') => app.recast(),
        _ => {}
    }
}
