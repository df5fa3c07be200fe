//! Hexlab CLI: market readings, divinations, and knowledge-base queries.
//!
//! Commands:
//! - `market`: encode the latest six daily bars of a symbol into a hexagram pair
//! - `divine`: cast six lines with the three-coin method for a question
//! - `lookup`: print the record for one key
//! - `table`: list all 64 records
//! - `instruments`: list the configured instrument catalog

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hexlab_core::config::{default_config_path, HexlabConfig};
use hexlab_core::data::{BarProvider, CsvProvider};
use hexlab_core::domain::{HexagramKey, LinePosition, LineValue};
use hexlab_core::knowledge::KnowledgeBase;
use hexlab_core::oracle::{divine, read_market, Divination, Hexagram, MarketReading};
use hexlab_core::rng::{entropy_rng, CastSeeder};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hexlab",
    version,
    about = "Hexlab CLI — I Ching hexagrams from price action and coin casting"
)]
struct Cli {
    /// Config file. Defaults to <config_dir>/hexlab/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode the latest six daily bars of a symbol.
    Market {
        /// Yahoo symbol (e.g., BZ=F). Defaults to the first catalog entry.
        #[arg(long)]
        symbol: Option<String>,

        /// Reference date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Read bars from this CSV file instead of the configured source.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the reading as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Cast six lines for a question.
    Divine {
        /// The question to ask.
        question: String,

        /// Seed for a reproducible cast. Overrides [divination] seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Print the divination as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the record for a key such as 1,0,0,0,1,0 (bottom line first).
    Lookup { key: String },
    /// List all 64 hexagrams.
    Table,
    /// List the instrument catalog.
    Instruments,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = HexlabConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    init_logging(cli.verbose, &config.log.level);
    tracing::debug!(path = %config_path.display(), "config loaded");

    match cli.command {
        Commands::Market {
            symbol,
            date,
            csv,
            json,
        } => run_market(&config, symbol, date, csv, json),
        Commands::Divine {
            question,
            seed,
            json,
        } => run_divine(&config, &question, seed, json),
        Commands::Lookup { key } => run_lookup(&key),
        Commands::Table => run_table(),
        Commands::Instruments => run_instruments(&config),
    }
}

/// `RUST_LOG` wins; otherwise `-v` flags, then the config level.
fn init_logging(verbose: u8, config_level: &str) {
    let fallback = match verbose {
        0 => config_level,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn run_market(
    config: &HexlabConfig,
    symbol: Option<String>,
    date: Option<String>,
    csv: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let reference_date = parse_date(date.as_deref())?;
    let symbol = match symbol {
        Some(s) => s,
        None => match config.catalog().get(0) {
            Some(instrument) => instrument.symbol.clone(),
            None => bail!("no --symbol given and the instrument catalog is empty"),
        },
    };

    let provider: Box<dyn BarProvider> = match csv {
        Some(path) => Box::new(csv_provider(&path)?),
        None => config.provider()?,
    };
    let kb = KnowledgeBase::embedded()?;

    let reading = read_market(
        provider.as_ref(),
        kb,
        &symbol,
        reference_date,
        config.lookback_days,
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        let label = config
            .catalog()
            .find(&symbol)
            .map(|i| i.label.clone())
            .unwrap_or_else(|| symbol.clone());
        print!("{}", render_market(&reading, &label));
    }
    Ok(())
}

fn csv_provider(path: &Path) -> Result<CsvProvider> {
    if !path.is_file() {
        bail!("CSV file not found: {}", path.display());
    }
    Ok(CsvProvider::from_file(path))
}

fn run_divine(config: &HexlabConfig, question: &str, seed: Option<u64>, json: bool) -> Result<()> {
    let kb = KnowledgeBase::embedded()?;
    let divination = match seed.or(config.divination.seed) {
        Some(seed) => {
            let seeder = CastSeeder::new(seed);
            tracing::debug!(seed = seeder.master_seed(), "seeded casting");
            divine(kb, question, &mut seeder.rng_for(question, 0))?
        }
        None => divine(kb, question, &mut entropy_rng())?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&divination)?);
    } else {
        print!("{}", render_divination(&divination));
    }
    Ok(())
}

fn run_lookup(raw: &str) -> Result<()> {
    let key: HexagramKey = raw.parse()?;
    let kb = KnowledgeBase::embedded()?;
    let hexagram = Hexagram::resolve(kb, key)?;
    print!("{}", render_card("Hexagram", &hexagram));
    println!("{}", render_figure(&key.bits().map(bit_value)));
    Ok(())
}

fn run_table() -> Result<()> {
    let kb = KnowledgeBase::embedded()?;
    println!(
        "{:<13} {:<3} {:<10} {:<14} OUTLOOK",
        "KEY", "SYM", "NAME", "PINYIN"
    );
    for (key, record) in kb.iter() {
        println!(
            "{:<13} {:<3} {:<10} {:<14} {}",
            key.to_string(),
            record.symbol,
            record.name,
            record.pinyin,
            record.outlook
        );
    }
    Ok(())
}

fn run_instruments(config: &HexlabConfig) -> Result<()> {
    for instrument in config.catalog().iter() {
        println!("{:<8} {}", instrument.symbol, instrument.label);
    }
    Ok(())
}

// ── Rendering ────────────────────────────────────────────────────────

fn bit_value(bit: u8) -> LineValue {
    if bit == 1 {
        LineValue::YoungYang
    } else {
        LineValue::YoungYin
    }
}

fn render_card(title: &str, hexagram: &Hexagram) -> String {
    let r = &hexagram.record;
    format!(
        "{title}: {} {} ({})  [{}]\n  key:       {}\n  judgment:  {}\n  meaning:   {}\n",
        r.symbol, r.name, r.pinyin, r.outlook, hexagram.key, r.judgment, r.interpretation
    )
}

/// Lines drawn top-down, bottom line last.
fn render_figure(values: &[LineValue; 6]) -> String {
    let mut out = String::new();
    for value in values.iter().rev() {
        let body = if value.is_yang() {
            "━━━━━━━━━"
        } else {
            "━━━━ ━━━━"
        };
        let mark = match value {
            LineValue::OldYang => "  o",
            LineValue::OldYin => "  x",
            _ => "",
        };
        out.push_str(&format!("  {body}{mark}\n"));
    }
    out
}

fn render_market(reading: &MarketReading, label: &str) -> String {
    let mut out = format!(
        "{label} ({}) as of {}  [{} bars from {:?}]\n",
        reading.symbol, reading.reference_date, reading.bars_available, reading.source
    );
    out.push_str(&format!(
        "mean |change| {:.3}%  threshold {:.3}%\n\n",
        reading.encoding.mean_change * 100.0,
        reading.encoding.threshold * 100.0
    ));

    out.push_str(&render_card("Present", &reading.present));
    if reading.has_changes() {
        out.push_str(&changing_lines(reading.present.key, reading.projected.key));
        out.push_str(&render_card("Projected", &reading.projected));
    } else {
        out.push_str(&format!(
            "Projected: {} {} (no change)\n",
            reading.projected.record.symbol, reading.projected.record.name
        ));
    }

    out.push_str(&format!(
        "\n{:<3} {:<10} {:<12} {:>10} {:>9}  LINE\n",
        "POS", "DATE", "NAME", "CLOSE", "CHANGE"
    ));
    for line in &reading.encoding.lines {
        let flag = if line.value.is_moving() { "  *" } else { "" };
        out.push_str(&format!(
            "{:<3} {:<10} {} {:<7} {:>10.3} {:>+8.2}%  {}{flag}\n",
            line.position.index(),
            line.date,
            line.position.traditional_name(),
            line.position.label(),
            line.close,
            line.change * 100.0,
            line.value.label(),
        ));
    }
    out
}

fn render_divination(d: &Divination) -> String {
    let mut out = format!("Question: {}\n\n", d.question);
    out.push_str(&render_figure(&d.casting.values()));
    out.push('\n');
    out.push_str(&render_card("Present", &d.present));
    if d.has_changes() {
        out.push_str(&format!(
            "\nChanging toward {} {} ({})\n",
            d.projected.record.symbol, d.projected.record.name, d.projected.key
        ));
        out.push_str(&changing_lines(d.present.key, d.projected.key));
        out.push_str(&render_card("Projected", &d.projected));
    }
    out
}

/// "Changing lines: 初爻 (Bottom), 四爻 (Fourth)" for the lines that flip.
fn changing_lines(present: HexagramKey, projected: HexagramKey) -> String {
    let names: Vec<String> = present
        .changed_positions(projected)
        .into_iter()
        .filter_map(LinePosition::new)
        .map(|p| format!("{} ({})", p.traditional_name(), p.label()))
        .collect();
    format!("Changing lines: {}\n", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use hexlab_core::data::MemoryProvider;
    use hexlab_core::domain::PriceBar;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reading(flat: bool) -> MarketReading {
        let end = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let bars: Vec<PriceBar> = (0..8)
            .map(|i| {
                let close = if flat || i != 7 { 101.0 } else { 110.0 };
                PriceBar::new(end - Duration::days(7 - i), 100.0, close).unwrap()
            })
            .collect();
        let provider = MemoryProvider::new().with_series("BZ=F", bars);
        let kb = KnowledgeBase::embedded().unwrap();
        read_market(&provider, kb, "BZ=F", end, 40).unwrap()
    }

    #[test]
    fn cli_parses_market_flags() {
        let cli = Cli::try_parse_from([
            "hexlab", "-vv", "market", "--symbol", "NG=F", "--date", "2024-06-14", "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Market {
                symbol, date, json, ..
            } => {
                assert_eq!(symbol.as_deref(), Some("NG=F"));
                assert_eq!(date.as_deref(), Some("2024-06-14"));
                assert!(json);
            }
            _ => panic!("expected market"),
        }
    }

    #[test]
    fn cli_requires_a_question() {
        assert!(Cli::try_parse_from(["hexlab", "divine"]).is_err());
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(parse_date(Some("14/06/2024")).is_err());
        assert_eq!(
            parse_date(Some("2024-06-14")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
        );
    }

    #[test]
    fn market_text_flags_moving_lines() {
        let text = render_market(&reading(false), "Brent Crude");
        assert!(text.contains("Brent Crude (BZ=F)"));
        assert!(text.contains("Old Yang (9)  *"));
        assert!(text.contains("Projected:"));
        assert!(!text.contains("(no change)"));
    }

    #[test]
    fn market_text_names_lines_and_changes() {
        let text = render_market(&reading(false), "Brent Crude");
        assert!(text.contains("初爻 Bottom"));
        assert!(text.contains("上爻 Top"));
        assert!(text.contains("Changing lines: 初爻 (Bottom)\n"));
    }

    #[test]
    fn changing_lines_lists_flipped_positions() {
        let present: HexagramKey = "1,1,1,1,1,1".parse().unwrap();
        let projected: HexagramKey = "0,1,1,0,1,1".parse().unwrap();
        assert_eq!(
            changing_lines(present, projected),
            "Changing lines: 初爻 (Bottom), 四爻 (Fourth)\n"
        );
    }

    #[test]
    fn market_text_marks_no_change() {
        let text = render_market(&reading(true), "Brent Crude");
        assert!(text.contains("(no change)"));
        assert!(!text.contains("  *"));
    }

    #[test]
    fn figure_draws_top_line_first() {
        let values = [
            LineValue::OldYang,
            LineValue::YoungYin,
            LineValue::YoungYin,
            LineValue::YoungYin,
            LineValue::YoungYin,
            LineValue::OldYin,
        ];
        let figure = render_figure(&values);
        let lines: Vec<&str> = figure.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].ends_with('x'));
        assert!(lines[5].ends_with('o'));
    }

    #[test]
    fn divination_text_mentions_question() {
        let kb = KnowledgeBase::embedded().unwrap();
        let d = divine(kb, "  Should I travel?  ", &mut StdRng::seed_from_u64(3)).unwrap();
        let text = render_divination(&d);
        assert!(text.starts_with("Question: Should I travel?\n"));
        assert_eq!(text.contains("Changing toward"), d.has_changes());
    }
}
