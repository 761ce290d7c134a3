use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use log::{error, info};
use tokio::sync::Mutex;

use heartnotes::{App, Cli, Config, FileStore, Journal, Result, SystemClock};

pub fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let store = FileStore::open(&config.data_dir)?;
    let journal = Journal::open(Box::new(store), Box::new(SystemClock))?;

    let app = App::new(
        Arc::new(Mutex::new(journal)),
        config,
        config_path,
        cli.verbose,
    );
    app.run(cli.command).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    info!("Application starting up");

    match run(cli).await {
        Ok(()) => {
            info!("Application shutting down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
