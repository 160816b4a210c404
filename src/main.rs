//! polar-targets: optimal sailing performance targets from ORC polars.
//!
//! Single-binary Tokio application that:
//! 1. Resolves a boat by ref-no, sail-no, or name+country
//! 2. Fetches its RMS allowance table (or reads a saved record)
//! 3. Normalizes it into a polar model, cached per boat
//! 4. Solves optimal upwind/downwind angles and reaching targets
//! 5. Prints the result as JSON

mod config;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error};

use common::{Error, OptimalResult, TargetRequest};
use orc_client::{OrcClient, RmsRecord};
use polar::{compute_targets, PolarCache, PolarModel, PolarService};

/// Optimal sailing targets from ORC polar data.
#[derive(Parser)]
#[command(name = "polar-targets", about = "Optimal sailing targets from ORC polar data")]
struct Cli {
    /// True wind speed in knots (2–50).
    #[arg(long)]
    wind_speed: f64,

    /// ORC reference number.
    #[arg(long)]
    ref_no: Option<String>,

    /// Sail number (combine with --country).
    #[arg(long)]
    sail_no: Option<String>,

    /// Yacht name (requires --country).
    #[arg(long)]
    yacht_name: Option<String>,

    /// ISO country code of the certificate authority.
    #[arg(long)]
    country: Option<String>,

    /// Read a saved RMS record (JSON) instead of fetching upstream.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polar_targets=info,orc_client=info,polar=info".into()),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let compact = cli.compact;

    match run(cli).await {
        Ok(result) => print_result(&result, compact),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<OptimalResult, Error> {
    let request = TargetRequest {
        wind_speed: cli.wind_speed,
        ref_no: cli.ref_no,
        sail_no: cli.sail_no,
        yacht_name: cli.yacht_name,
        country_id: cli.country,
    };

    // Offline mode: solve a saved record directly; no identity, client,
    // or cache involved — only the wind-speed bound applies.
    if let Some(path) = cli.input {
        request.validate_wind_speed()?;
        debug!("solving offline record from {}", path.display());
        let contents = std::fs::read_to_string(&path)?;
        let record: RmsRecord = serde_json::from_str(&contents)?;
        let model = PolarModel::from_record(&record)?;
        return compute_targets(&model, request.wind_speed);
    }

    let config = config::load_config()?;
    let client = OrcClient::new(
        config.upstream.base_url.clone(),
        config.upstream.timeout_secs,
    );
    let cache = PolarCache::new(
        config.cache.capacity,
        Duration::from_secs(config.cache.ttl_hours * 3600),
    );
    let service = PolarService::new(client, cache);

    service.optimal_targets(&request).await
}

fn print_result(result: &OptimalResult, compact: bool) {
    let rendered = if compact {
        serde_json::to_string(result)
    } else {
        serde_json::to_string_pretty(result)
    };
    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => error!("failed to render result: {e}"),
    }
}
