//! hexlab TUI: three-panel terminal interface with vim-style navigation.
//!
//! Panels:
//! 1. Market: six recent sessions of an energy future read as a hexagram
//! 2. Divination: three-coin casting for a written question
//! 3. Help: keyboard shortcuts and how the lines are read
//!
//! The config file is `$HEXLAB_CONFIG` or `<config_dir>/hexlab/config.toml`.
//! Logs go to `hexlab-tui.log` in the configured log dir, since the terminal
//! belongs to the UI.

mod app;
mod input;
mod persistence;
mod theme;
mod ui;

use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use hexlab_core::config::{config_home, default_config_path, HexlabConfig};
use hexlab_core::knowledge::KnowledgeBase;

use crate::app::AppState;

fn main() -> Result<()> {
    let config_path = std::env::var_os("HEXLAB_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let config = HexlabConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let log_dir = config.log.dir.clone().unwrap_or_else(config_home);
    let _log_guard = init_logging(&log_dir, &config.log.level)?;
    tracing::info!(config = %config_path.display(), "hexlab-tui starting");

    let kb = KnowledgeBase::embedded().map_err(|e| {
        tracing::error!("knowledge base failed to load: {e}");
        e
    })?;
    let provider = config.provider()?;

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let state_path = config_home().join("state.json");
    let persisted = persistence::load(&state_path);

    let mut app = AppState::new(
        kb,
        provider,
        config.catalog(),
        config.lookback_days,
        config.divination.seed,
    );
    persistence::apply(&mut app, persisted);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&state_path, &persisted) {
        tracing::warn!("could not save state: {e}");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("hexlab-tui exiting");
    result
}

/// File logger; the returned guard flushes on drop.
fn init_logging(dir: &Path, level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log dir {}", dir.display()))?;
    let appender = tracing_appender::rolling::never(dir, "hexlab-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Queued work runs after its "Fetching" frame is on screen.
        if app.pending.is_some() {
            app.run_pending();
            continue;
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
