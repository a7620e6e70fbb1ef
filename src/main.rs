//! Watermark check
//!
//! Run with: watermark [SERIES_JSON_FILE] (reads stdin without a file)
//!
//! Input is a JSON array of `{"target": ..., "datapoints": [[value, ts], ...]}`.
//! The decision is printed to stdout as JSON and the process exits with the
//! plugin convention (0 ok, 1 warning, 2 critical, 3 unknown).
//!
//! Environment variables:
//! - WATERMARK_WARNING: Warning bound
//! - WATERMARK_CRITICAL: Critical bound
//! - WATERMARK_BELOW: Alert when values drop below the bounds (true/1)
//! - WATERMARK_RESET_WINDOW: Trailing samples for rising-trend suppression
//! - WATERMARK_NODES: Breaching series required to escalate
//! - WATERMARK_RULE_FILE: JSON rule file, used instead of the variables above
//! - WATERMARK_NAME: Name used in responses (default: graphite check)
//! - RUST_LOG: Log level (default: info)

use std::io::Read;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use watermark::alerts::{Check, RuleConfig, Status, ThresholdRule};
use watermark::series::SeriesStore;

fn main() {
    // Initialize logging on stderr; stdout carries the decision
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watermark=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let status = match run() {
        Ok(status) => status,
        Err(e) => {
            tracing::error!(error = %e, "Check could not be evaluated");
            println!("{}: {}", Status::Unknown, e);
            Status::Unknown
        }
    };

    std::process::exit(status.exit_code());
}

fn run() -> Result<Status, Box<dyn std::error::Error>> {
    let config = match std::env::var("WATERMARK_RULE_FILE") {
        Ok(path) => {
            tracing::info!("Loading rule from {}", path);
            RuleConfig::from_file(path)?
        }
        Err(_) => RuleConfig::from_env()?,
    };
    let rule = ThresholdRule::try_from(config)?;

    let mut check = Check::new(rule);
    if let Ok(name) = std::env::var("WATERMARK_NAME") {
        check = check.with_name(name);
    }

    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let store = SeriesStore::from_json(&input)?;
    tracing::debug!("Series retrieved: {:?}", store.names());

    let decision = check.run_store(&store);
    if decision.status() == Status::Ok {
        tracing::info!("{}", check.ok_message());
    }

    println!("{}", serde_json::to_string_pretty(&decision)?);

    Ok(decision.status())
}
