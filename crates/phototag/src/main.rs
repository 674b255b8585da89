use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};
use tracing_subscriber::EnvFilter;

use phototag::config::ConfigOverrides;
use phototag::{load_config, ConfigError, LogProgress, Pipeline};

/// Annotate a photo archive with a vision model, one metadata.json per directory.
#[derive(Parser, Debug)]
#[command(name = "phototag", version, about)]
struct Args {
    /// Root of the photo tree
    #[arg(value_name = "ROOT", env = "PHOTOTAG_ROOT", default_value = "img")]
    root: PathBuf,

    /// Minimum pause between two vision requests, in milliseconds
    #[arg(long, env = "PHOTOTAG_REQUEST_DELAY_MS")]
    delay_ms: Option<u64>,

    /// Reject replies that do not match the annotation schema
    #[arg(long)]
    strict_schema: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(args.json_logs);

    info!("Starting phototag v{}", env!("CARGO_PKG_VERSION"));

    let overrides = ConfigOverrides {
        root: Some(args.root),
        request_delay: args.delay_ms.map(Duration::from_millis),
        strict_schema: args.strict_schema,
    };

    let config = match load_config(overrides) {
        Ok(config) => config,
        Err(e @ ConfigError::MissingCredential { .. }) => {
            error!("{}. Set it in the environment or in a .env file.", e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match Pipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match pipeline.run(&config.root, &LogProgress).await {
        Ok(summary) => {
            if summary.failed > 0 || summary.directory_errors > 0 {
                warn!("Some images were not annotated; run again to retry them");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
