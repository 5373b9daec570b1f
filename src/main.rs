use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use databridge::cli::{self, Cli};
use databridge::Config;

fn load_config(path: &Path) -> Config {
    if !path.exists() {
        eprintln!("{} not found, using default configuration.", path.display());
        let mut config = Config::default();
        config.apply_env_overrides();
        return config;
    }

    match Config::load_with_env(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", path.display());
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = load_config(&cli.config);

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    if cli.command.is_server() {
        if let Err(e) = databridge::logging::init(&config.logging) {
            eprintln!("Failed to initialize logging: {e}");
            // Fall back to console-only logging
            databridge::logging::init_console_only(&config.logging.level);
        }
        info!("DataBridge - personal file and text transfer");
        info!("Server configured on {}:{}", config.web.host, config.web.port);
    } else {
        databridge::logging::init_console_only("warn");
    }

    match cli::execute(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
