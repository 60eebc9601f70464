mod config;
mod logging;
mod shell;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use url::Url;

use crate::config::{load_config, CONFIG_FILENAME};
use crate::logging::LogDestination;
use crate::shell::{Shell, Step};

#[derive(Parser)]
#[command(
    name = "jobboard_app",
    about = "Replays a browsing session against the jobboard front end with in-app navigation"
)]
struct Cli {
    /// Config file (RON)
    #[arg(long, default_value = CONFIG_FILENAME)]
    config: PathBuf,
    /// Page to open first; overrides `start_url` from the config
    #[arg(long)]
    start: Option<Url>,
    /// REST API base; overrides `api_base` from the config
    #[arg(long)]
    api_base: Option<String>,
    /// Where log records go; overrides `log` from the config
    #[arg(long, value_enum)]
    log: Option<LogDestination>,
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
    /// Steps replayed in order: an href to click, `back` or `forward`
    steps: Vec<Step>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(api_base) = cli.api_base {
        config.api_base = Some(api_base);
    }
    if let Some(destination) = cli.log {
        config.log = destination;
    }
    logging::initialize(config.log, cli.log_level);

    let start = match cli.start {
        Some(start) => start,
        None => Url::parse(&config.start_url)
            .with_context(|| format!("invalid start_url {:?}", config.start_url))?,
    };

    let mut shell = Shell::open(config, start).await?;
    println!("{}", shell.snapshot());
    for step in &cli.steps {
        let snapshot = shell.run(step).await?;
        println!("{snapshot}");
    }
    Ok(())
}
