use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reviewlens::{load_effective_config, run_pipeline};

const LOG_FORMAT_ENV: &str = "REVIEWLENS_LOG_FORMAT";

/// Classify product reviews and chart sentiment per category.
#[derive(Parser, Debug)]
#[command(name = "reviewlens", version, about)]
struct Args {
    /// CSV file with a header row
    dataset: PathBuf,
}

fn init_logging() {
    let _ = tracing_log::LogTracer::init();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let result = if json {
        tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .finish(),
        )
    } else {
        tracing::subscriber::set_global_default(
            tracing_subscriber::fmt().with_env_filter(filter).finish(),
        )
    };
    if let Err(e) = result {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_logging();

    let args = Args::parse();

    let config = match load_effective_config(|key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run_pipeline(&args.dataset, &config) {
        Ok(summary) => {
            println!("Processed table: {}", summary.processed_path.display());
            println!("Chart: {}", summary.report.chart.display());
            println!("Report: {}", summary.report.report.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
