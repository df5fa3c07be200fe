//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. Market readings run synchronously: a request is
//! queued, the loop draws one "Fetching" frame, then executes it.

use std::collections::VecDeque;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use hexlab_core::data::{BarProvider, DataError};
use hexlab_core::instruments::{Catalog, Instrument};
use hexlab_core::knowledge::KnowledgeBase;
use hexlab_core::oracle::{self, Divination, MarketReading};
use hexlab_core::rng::{entropy_rng, CastSeeder};
use hexlab_core::HexError;

const ERROR_HISTORY_CAP: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Market,
    Divination,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Market => 0,
            Panel::Divination => 1,
            Panel::Help => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Market),
            1 => Some(Panel::Divination),
            2 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Market => "Market",
            Panel::Divination => "Divination",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        match self {
            Panel::Market => Panel::Divination,
            Panel::Divination => Panel::Help,
            Panel::Help => Panel::Market,
        }
    }

    pub fn prev(self) -> Panel {
        match self {
            Panel::Market => Panel::Help,
            Panel::Divination => Panel::Market,
            Panel::Help => Panel::Divination,
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Integrity,
    Input,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Integrity => "KB",
            ErrorCategory::Input => "INPUT",
        }
    }

    pub fn of(err: &HexError) -> Self {
        match err {
            HexError::Data(
                DataError::NetworkUnreachable(_)
                | DataError::RateLimited { .. }
                | DataError::HttpStatus { .. },
            ) => ErrorCategory::Network,
            HexError::Integrity { .. } => ErrorCategory::Integrity,
            HexError::EmptyQuestion => ErrorCategory::Input,
            HexError::Data(_) | HexError::InsufficientData { .. } | HexError::InvalidBar(_) => {
                ErrorCategory::Data
            }
        }
    }
}

/// Market panel state: instrument picker, reference date, last reading.
#[derive(Debug)]
pub struct MarketPanelState {
    pub catalog: Catalog,
    pub selected: usize,
    pub reference_date: NaiveDate,
    pub reading: Option<MarketReading>,
}

impl MarketPanelState {
    pub fn new(catalog: Catalog, today: NaiveDate) -> Self {
        Self {
            catalog,
            selected: 0,
            reference_date: today,
            reading: None,
        }
    }

    pub fn instrument(&self) -> Option<&Instrument> {
        self.catalog.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.catalog.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Select by symbol; unknown symbols leave the selection unchanged.
    pub fn select_symbol(&mut self, symbol: &str) {
        if let Some(i) = self.catalog.position(symbol) {
            self.selected = i;
        }
    }

    pub fn shift_date(&mut self, days: i64) {
        self.reference_date += Duration::days(days);
    }
}

/// Divination panel state.
#[derive(Debug, Default)]
pub struct DivinationPanelState {
    pub result: Option<Divination>,
    /// Casts made so far; feeds the seeded stream so recasts differ.
    pub casts: u64,
}

/// A queued piece of blocking work, executed after the next frame is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    MarketReading { symbol: String, date: NaiveDate },
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    ErrorHistory,
    Question,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Panel states
    pub market: MarketPanelState,
    pub divination: DivinationPanelState,

    // Services
    pub kb: &'static KnowledgeBase,
    pub provider: Box<dyn BarProvider>,
    pub lookback_days: u32,
    seeder: Option<CastSeeder>,
    rng: StdRng,

    // Cross-cutting
    pub pending: Option<PendingRequest>,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub question_input: String,
}

impl AppState {
    pub fn new(
        kb: &'static KnowledgeBase,
        provider: Box<dyn BarProvider>,
        catalog: Catalog,
        lookback_days: u32,
        seed: Option<u64>,
    ) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            active_panel: Panel::Market,
            running: true,
            market: MarketPanelState::new(catalog, today),
            divination: DivinationPanelState::default(),
            kb,
            provider,
            lookback_days,
            seeder: seed.map(CastSeeder::new),
            rng: entropy_rng(),
            pending: None,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            question_input: String::new(),
        }
    }

    /// Queue a reading for the selected instrument and date.
    pub fn request_market_reading(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let Some(instrument) = self.market.instrument() else {
            self.set_warning("No instrument selected");
            return;
        };
        let symbol = instrument.symbol.clone();
        let date = self.market.reference_date;
        self.set_status(format!("Fetching {symbol} up to {date}…"));
        self.pending = Some(PendingRequest::MarketReading { symbol, date });
    }

    /// Execute the queued request, if any. Blocks on the provider.
    pub fn run_pending(&mut self) {
        let Some(request) = self.pending.take() else {
            return;
        };
        match request {
            PendingRequest::MarketReading { symbol, date } => {
                match oracle::read_market(
                    self.provider.as_ref(),
                    self.kb,
                    &symbol,
                    date,
                    self.lookback_days,
                ) {
                    Ok(reading) => {
                        let note = if reading.has_changes() {
                            format!("{} moving", reading.encoding.moving_positions().len())
                        } else {
                            "no change".to_string()
                        };
                        self.set_status(format!(
                            "{symbol}: {} → {} ({note})",
                            reading.present.record.name, reading.projected.record.name
                        ));
                        self.market.reading = Some(reading);
                    }
                    Err(e) => self.record_error(&e, format!("{symbol} @ {date}")),
                }
            }
        }
    }

    /// Master seed when castings are reproducible.
    pub fn seed(&self) -> Option<u64> {
        self.seeder.as_ref().map(CastSeeder::master_seed)
    }

    /// Cast for a question. A blank question only raises a warning.
    pub fn cast(&mut self, question: &str) {
        let question = question.trim();
        if question.is_empty() {
            self.set_warning("Please enter a question before casting");
            return;
        }
        let nonce = self.divination.casts;
        let outcome = match &self.seeder {
            Some(seeder) => oracle::divine(self.kb, question, &mut seeder.rng_for(question, nonce)),
            None => oracle::divine(self.kb, question, &mut self.rng),
        };
        match outcome {
            Ok(d) => {
                self.divination.casts += 1;
                self.set_status(format!(
                    "Cast: {} {}",
                    d.present.record.symbol, d.present.record.name
                ));
                self.divination.result = Some(d);
            }
            Err(e) => self.record_error(&e, "divination".into()),
        }
    }

    /// Cast again for the last question asked.
    pub fn recast(&mut self) {
        match self.divination.result.as_ref().map(|d| d.question.clone()) {
            Some(question) => self.cast(&question),
            None => self.set_warning("Nothing to recast; press i to ask a question"),
        }
    }

    /// Route a library error into the history and the status bar.
    pub fn record_error(&mut self, err: &HexError, context: String) {
        let category = ErrorCategory::of(err);
        if err.is_integrity() {
            tracing::error!(%context, "knowledge base integrity failure: {err}");
        } else {
            tracing::warn!(%context, "{err}");
        }
        self.push_error(category, err.to_string(), context);
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
