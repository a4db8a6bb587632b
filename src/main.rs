//! DR Status CLI
//!
//! Evaluates one workload snapshot and prints the outcome as JSON.
//!
//! ```text
//! dr-status --snapshot busybox.yaml --warning-multiplier 3
//! ```

use clap::Parser;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dr_status_engine::dr::parse_sync_interval;
use dr_status_engine::{
    ClassifierConfig, DrStatusEngine, EngineConfig, Error, HelpLinks, Result, WorkloadSnapshot,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// DR Status Engine - aggregate disaster-recovery status of a workload
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workload snapshot (YAML or JSON)
    #[arg(long, env = "DR_SNAPSHOT")]
    snapshot: String,

    /// Elapsed time up to interval * this is healthy
    #[arg(long, env = "DR_HEALTHY_MULTIPLIER", default_value = "1")]
    healthy_multiplier: u32,

    /// Elapsed time up to interval * this is a warning, beyond is critical
    #[arg(long, env = "DR_WARNING_MULTIPLIER", default_value = "2")]
    warning_multiplier: u32,

    /// Reference interval for synchronous policies
    #[arg(long, env = "DR_SYNC_INTERVAL", default_value = "5m")]
    sync_interval: String,

    /// Documentation root for help links
    #[arg(long, env = "DR_HELP_BASE_URL")]
    help_base_url: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);
    info!("DR status engine {}", dr_status_engine::VERSION);

    let config = engine_config(&args)?;
    let engine = DrStatusEngine::new(config)?;

    let snapshot = WorkloadSnapshot::load(&args.snapshot)?;
    debug!(topology = snapshot.topology(), "evaluating snapshot");
    let outcome = snapshot.evaluate(&engine);

    let output = if args.pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    println!("{}", output);
    Ok(())
}

fn engine_config(args: &Args) -> Result<EngineConfig> {
    let sync_interval = parse_sync_interval(&args.sync_interval)
        .map_err(|e| Error::Configuration(format!("Invalid sync interval: {}", e)))?;

    let mut config = EngineConfig {
        classifier: ClassifierConfig {
            healthy_multiplier: args.healthy_multiplier,
            warning_multiplier: args.warning_multiplier,
            sync_interval,
        },
        ..Default::default()
    };
    if let Some(base_url) = &args.help_base_url {
        config.help_links = HelpLinks {
            base_url: base_url.clone(),
        };
    }
    Ok(config)
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so stdout stays valid JSON
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
