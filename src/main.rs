//! autosuggest-rs: search autocomplete harvesting and ranking
//!
//! This is the command-line entry point.

use anyhow::Result;
use autosuggest_rs::{
    config::{self, OutputFormat, Settings, TransportKind},
    harvest::{HarvestQuery, SuggestionAggregator},
    locales::LocaleTable,
    metrics::Metrics,
    SuggestionClient,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Harvest and rank search autocomplete suggestions for a set of seed phrases
#[derive(Debug, Parser)]
#[command(name = "autosuggest-rs", version, about)]
struct Cli {
    /// Path to settings.yml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language hint (hl)
    #[arg(short, long)]
    lang: Option<String>,

    /// Country/region hint (gl); also selects the location token
    #[arg(short = 'g', long)]
    country: Option<String>,

    /// Raw encoded location token, overriding the country table
    #[arg(long)]
    location: Option<String>,

    /// Number of suggestions in the report
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Minimum delay between requests in milliseconds
    #[arg(long)]
    min_delay_ms: Option<u64>,

    /// Transport: direct or callback
    #[arg(long)]
    transport: Option<String>,

    /// Output format: text or json
    #[arg(short, long)]
    format: Option<String>,

    /// Print each phrase's suggestions before the ranking
    #[arg(long)]
    per_phrase: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Seed phrases (default: harvest.seeds from settings)
    phrases: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = config::load(cli.config.as_deref())?;
    apply_cli(&mut settings, &cli)?;
    settings.validate()?;

    init_logging(&settings, cli.verbose);
    info!("Starting autosuggest-rs v{}", autosuggest_rs::VERSION);

    let settings = config::init(settings)?;

    let metrics = Arc::new(Metrics::new());
    let client = SuggestionClient::from_settings(settings, metrics.clone())?;
    info!(
        "Suggestion client ready (transport: {}, min delay: {}ms)",
        client.transport(),
        settings.suggest.min_delay_ms
    );

    let table = LocaleTable::with_overrides(&settings.locations);
    let mut locale = table.resolve(&settings.suggest.language, &settings.suggest.country);
    if let Some(ref token) = cli.location {
        locale = locale.with_location_token(token.clone());
    }
    if locale.location_token.is_none() {
        info!(
            "No location token for '{}' (known: {}), requests carry no location bias",
            locale.country,
            table.countries().join(", ")
        );
    }

    let seeds = if cli.phrases.is_empty() {
        settings.harvest.seeds.clone()
    } else {
        cli.phrases.clone()
    };
    let query = HarvestQuery::new(seeds)
        .with_locale(locale)
        .with_top_n(settings.harvest.top_n);

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing after the current phrase");
            let _ = cancel_tx.send(true);
        }
    });

    let aggregator = SuggestionAggregator::new(Arc::new(client));
    let report = aggregator.execute(&query, Some(cancel_rx)).await?;

    match settings.harvest.format {
        OutputFormat::Text => {
            if settings.harvest.show_per_phrase {
                print!("{}", report.render_per_phrase());
                println!();
            }
            print!("{}", report);
        }
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    let snapshot = metrics.snapshot();
    info!(
        "Requests: {}, succeeded: {}, failed: {}, avg response: {}",
        snapshot.requests,
        snapshot.successes,
        snapshot.failures,
        snapshot
            .avg_response_time
            .map(|ms| format!("{}ms", ms))
            .unwrap_or_else(|| "n/a".to_string())
    );

    Ok(())
}

/// Command-line flags win over settings
fn apply_cli(settings: &mut Settings, cli: &Cli) -> Result<()> {
    if let Some(ref lang) = cli.lang {
        settings.suggest.language = lang.clone();
    }
    if let Some(ref country) = cli.country {
        settings.suggest.country = country.clone();
    }
    if let Some(top) = cli.top {
        settings.harvest.top_n = top;
    }
    if let Some(delay) = cli.min_delay_ms {
        settings.suggest.min_delay_ms = delay;
    }
    if let Some(ref transport) = cli.transport {
        settings.suggest.transport = transport.parse::<TransportKind>()?;
    }
    if let Some(ref format) = cli.format {
        settings.harvest.format = format.parse::<OutputFormat>()?;
    }
    if cli.per_phrase {
        settings.harvest.show_per_phrase = true;
    }
    if cli.verbose {
        settings.general.debug = true;
    }
    Ok(())
}

/// RUST_LOG wins; otherwise the configured level, or debug in debug mode
fn init_logging(settings: &Settings, verbose: bool) {
    let default_level = if verbose || settings.general.debug {
        "debug"
    } else {
        settings.general.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
