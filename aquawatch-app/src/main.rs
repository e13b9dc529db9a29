use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use aquawatch_engine::config::AquawatchConfig;
use aquawatch_engine::{runner, RiskScorer, SystemClock, WaterEngine};
use aquawatch_notify::{NotificationMonitor, NotificationStore};

#[derive(Parser, Debug)]
#[command(name = "aquawatch", version, about = "AquaWatch — municipal water-quality monitoring feed simulator")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "aquawatch.toml")]
    config: String,

    /// Tick interval in milliseconds (overrides config file)
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Log level (overrides config file)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Generate a default config file and exit
    #[arg(long)]
    generate_config: bool,

    /// Only raise critical notifications
    #[arg(long)]
    critical_only: bool,

    /// Skip history pre-population (start with an empty trend window)
    #[arg(long)]
    no_history: bool,

    /// Print the current public status as JSON after startup
    #[arg(long)]
    print_status: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Generate Config ──────────────────────────────────────────────
    if cli.generate_config {
        let config = AquawatchConfig::default();
        config.save(&cli.config).map_err(|e| anyhow::anyhow!(e))?;
        println!("Default configuration written to {}", cli.config);
        return Ok(());
    }

    // ── Load Config ──────────────────────────────────────────────────
    let config = AquawatchConfig::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: {}, using defaults", e);
        AquawatchConfig::default()
    });

    let log_level = cli.log_level.as_deref().unwrap_or(&config.general.log_level);
    let interval_ms = cli.interval_ms.unwrap_or(config.engine.tick_interval_ms);
    let critical_only = cli.critical_only || config.notify.critical_only;

    // ── Tracing ──────────────────────────────────────────────────────
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("AquaWatch v{}", env!("CARGO_PKG_VERSION"));
    info!(interval_ms, "Tick interval");

    // ── Engine ───────────────────────────────────────────────────────
    // Single-instance wiring: the engine owns all simulation state, the
    // scorer runs primary-only (no secondary quality-index provider wired).
    let engine = Arc::new(WaterEngine::new(RiskScorer::new(), Arc::new(SystemClock)));
    if !cli.no_history {
        engine.prepopulate_history(config.engine.history_days, config.engine.points_per_day);
    }
    let tick_handle = runner::start(engine.clone(), interval_ms);

    // ── Notifications ────────────────────────────────────────────────
    let store = Arc::new(NotificationStore::new(config.notify.store_capacity));
    let monitor = Arc::new(
        NotificationMonitor::new(engine.clone(), store.clone())
            .with_interval(config.notify.check_interval_ms)
            .with_critical_only(critical_only),
    );
    let monitor_handle = monitor.start();

    if cli.print_status {
        let status = aquawatch_engine::advisory::public_status(&engine);
        println!("{}", serde_json::to_string_pretty(&status)?);
    }

    // ── Run Until Shutdown ───────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    tick_handle.stop();
    monitor_handle.stop();
    info!(
        notifications = store.len(),
        history = engine.history_len(),
        "AquaWatch stopped"
    );
    Ok(())
}
