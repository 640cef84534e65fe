use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use credmon::config::{config_schema, load_config};
use credmon::startup;
use credmon::utils::logger::init_logging;

/// Reports age and expiry of Microsoft Entra application credentials as metrics.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path of the YAML configuration file.
    #[arg(long, env = "CREDMON_CONFIG_FILE", default_value = "./config.yaml")]
    config: PathBuf,

    /// Print the JSON schema of the configuration and exit.
    #[arg(long)]
    print_schema: bool,

    /// Run a single scan even when an interval is configured.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.print_schema {
        return match config_schema() {
            Ok(schema) => {
                println!("{}", schema);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error rendering configuration schema: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match load_config(&args.config) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging, config.metrics.writes_to_stdout()) {
        eprintln!("Error initializing logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "Starting {} {}",
        config.logging.service_name, config.logging.service_version
    );

    match startup::run(config, args.once).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Monitor stopped with an error: {}", e);
            ExitCode::FAILURE
        }
    }
}
