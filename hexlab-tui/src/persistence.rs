//! App state persistence: JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub active_panel: Panel,
    pub selected_symbol: Option<String>,
    pub welcome_dismissed: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            active_panel: Panel::Market,
            selected_symbol: None,
            welcome_dismissed: false,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "ignoring corrupt state file: {e}");
            PersistedState::default()
        }),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        active_panel: app.active_panel,
        selected_symbol: app.market.instrument().map(|i| i.symbol.clone()),
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_panel = state.active_panel;
    if let Some(symbol) = &state.selected_symbol {
        app.market.select_symbol(symbol);
    }
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = PersistedState {
            active_panel: Panel::Divination,
            selected_symbol: Some("TTF=F".into()),
            welcome_dismissed: true,
        };
        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.active_panel, Panel::Divination);
        assert_eq!(loaded.selected_symbol.as_deref(), Some("TTF=F"));
        assert!(loaded.welcome_dismissed);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded.active_panel, Panel::Market);
        assert!(loaded.selected_symbol.is_none());
        assert!(!loaded.welcome_dismissed);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert!(loaded.selected_symbol.is_none());
    }

    #[test]
    fn first_run_shows_welcome_then_remembers() {
        let mut app = test_app();
        apply(&mut app, PersistedState::default());
        assert_eq!(app.overlay, Overlay::Welcome);
        assert!(!extract(&app).welcome_dismissed);

        app.overlay = Overlay::None;
        app.market.select_symbol("RB=F");
        let saved = extract(&app);
        assert!(saved.welcome_dismissed);
        assert_eq!(saved.selected_symbol.as_deref(), Some("RB=F"));

        let mut fresh = test_app();
        apply(&mut fresh, saved);
        assert_eq!(fresh.overlay, Overlay::None);
        assert_eq!(fresh.market.instrument().unwrap().symbol, "RB=F");
    }

    #[test]
    fn unknown_symbol_keeps_default_selection() {
        let mut app = test_app();
        apply(
            &mut app,
            PersistedState {
                selected_symbol: Some("CL=F".into()),
                welcome_dismissed: true,
                ..PersistedState::default()
            },
        );
        assert_eq!(app.market.selected, 0);
    }
}
