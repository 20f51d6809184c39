//! LeaderboardSniper - Main Entry Point
//!
//! Polls an AI leaderboard snapshot source and runs one trading strategy
//! against Polymarket.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use leaderboard_sniper::common::traits::{Notifier, OrderSink};
use leaderboard_sniper::config::{load_config, AppConfig};
use leaderboard_sniper::strategy::{build, StrategyDeps, StrategyId, TradeSettings, Trader};
use leaderboard_sniper::{
    Bot, DryRunOrderSink, HttpSnapshotSource, LogNotifier, PolymarketRestClient, RelayOrderSink,
    TelegramNotifier,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a strategy until it stops or Ctrl-C
    Run {
        #[arg(short, long, value_enum)]
        strategy: StrategyId,

        /// Log orders instead of sending them
        #[arg(long)]
        dry_run: bool,

        /// Seconds between polls
        #[arg(long)]
        interval: Option<u64>,

        /// Leaderboard snapshot URL
        #[arg(long, env = "LEADERBOARD_SOURCE_URL")]
        source_url: Option<String>,
    },
    /// List the available strategies
    Strategies,
    /// Load and validate the configuration, then exit
    CheckConfig,
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(&args.config)).context("loading configuration")?;
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    init_logging(&level, args.log_json)?;

    match args.command {
        Command::Strategies => {
            for id in StrategyId::ALL {
                println!("{:<24} {}", id.as_str(), id.description());
            }
            Ok(())
        }
        Command::CheckConfig => {
            config.validate()?;
            info!(config = %args.config, "Configuration is valid");
            println!("{}", serde_json::to_string_pretty(&redacted(&config))?);
            Ok(())
        }
        Command::Run {
            strategy,
            dry_run,
            interval,
            source_url,
        } => {
            let mut config = config;
            if dry_run {
                config.trading.dry_run = true;
            }
            if let Some(seconds) = interval {
                config.settings.interval_seconds = seconds;
            }
            if source_url.is_some() {
                config.source.url = source_url;
            }
            run(config, strategy).await
        }
    }
}

async fn run(config: AppConfig, id: StrategyId) -> Result<()> {
    config.validate()?;
    let timeout = Duration::from_secs(config.settings.request_timeout_seconds);

    let notifier: Arc<dyn Notifier> = match &config.telegram {
        Some(telegram) => Arc::new(TelegramNotifier::with_timeout(telegram, timeout)?),
        None => {
            warn!("Telegram not configured, notifications go to the log only");
            Arc::new(LogNotifier)
        }
    };

    let sink: Arc<dyn OrderSink> = if config.trading.dry_run {
        warn!("Running in DRY RUN mode - no actual trades will be executed");
        Arc::new(DryRunOrderSink::new())
    } else {
        let Some(relay_url) = &config.polymarket.order_relay_url else {
            bail!("polymarket.order_relay_url is required for live trading (or pass --dry-run)");
        };
        let mut relay = RelayOrderSink::with_timeout(relay_url, timeout)?
            .with_notifier(notifier.clone());
        match config.credentials() {
            Some(credentials) => relay = relay.with_credentials(credentials),
            None => warn!("No CLOB credentials configured; relay calls are unauthenticated"),
        }
        Arc::new(relay)
    };

    let Some(source_url) = &config.source.url else {
        bail!("source.url is required (or pass --source-url)");
    };
    let source = Arc::new(HttpSnapshotSource::with_timeout(source_url, timeout)?);

    let directory = Arc::new(PolymarketRestClient::with_timeout(
        &config.polymarket.rest_url,
        &config.polymarket.gamma_url,
        timeout,
    )?);

    let trader = Arc::new(Trader::new(
        directory,
        sink,
        notifier.clone(),
        TradeSettings::from(&config.trading),
    ));
    let mut deps = StrategyDeps::new(trader);
    deps.max_validation_failures = config.settings.max_validation_failures;
    let strategy = build(id, &deps)?;

    info!(strategy = %id, source = %source_url, "Starting LeaderboardSniper");

    let mut bot = Bot::new(
        source,
        strategy,
        notifier,
        Duration::from_secs(config.settings.interval_seconds),
    );
    let stop = bot.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal, stopping after the current cycle...");
            stop.store(true, Ordering::SeqCst);
        }
    });

    let summary = bot.run().await;
    info!(
        cycles = summary.cycles,
        trades = summary.trades,
        reason = ?summary.reason,
        "Bot finished"
    );
    Ok(())
}

/// Config with secrets masked, for `check-config`
fn redacted(config: &AppConfig) -> AppConfig {
    let mask = |value: &mut Option<String>| {
        if value.is_some() {
            *value = Some("***".to_string());
        }
    };

    let mut shown = config.clone();
    mask(&mut shown.polymarket.api_key);
    mask(&mut shown.polymarket.api_secret);
    mask(&mut shown.polymarket.api_passphrase);
    if let Some(telegram) = shown.telegram.as_mut() {
        telegram.bot_token = "***".to_string();
    }
    shown
}
