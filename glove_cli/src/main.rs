//! Entry point: argument parsing, logging setup, config loading and
//! command dispatch.

mod cli;
mod run;

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, JSON_MODE};

fn init_logging(args: &Cli, cfg: &glove_config::Config) -> Result<()> {
    let level = cfg
        .logging
        .level
        .clone()
        .unwrap_or_else(|| args.log_level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &cfg.logging.file {
        let file = fs::File::create(path)
            .wrap_err_with(|| format!("failed to open log file {path}"))?;
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(Arc::new(file))
            .init();
    } else if args.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

fn load_config(args: &Cli) -> Result<glove_config::Config> {
    if args.config.exists() {
        let text = fs::read_to_string(&args.config)
            .wrap_err_with(|| format!("failed to read config {}", args.config.display()))?;
        let cfg = glove_config::load_toml(&text)
            .wrap_err_with(|| format!("invalid config {}", args.config.display()))?;
        cfg.validate()
            .wrap_err_with(|| format!("config rejected {}", args.config.display()))?;
        Ok(cfg)
    } else {
        tracing::debug!(path = %args.config.display(), "config file absent, using defaults");
        Ok(glove_config::Config::default())
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    let _ = JSON_MODE.set(args.json);

    // Config errors before logging init go to stderr via eyre.
    let cfg = load_config(&args)?;
    init_logging(&args, &cfg)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown.clone();
    ctrlc::set_handler(move || {
        tracing::warn!("interrupt received, shutting down");
        shutdown_flag.store(true, Ordering::Release);
    })
    .wrap_err("failed to install interrupt handler")?;

    match args.cmd {
        Commands::Run { secs, level, stats } => run::run_session(&cfg, secs, level, stats, &shutdown),
        Commands::SelfCheck => run::self_check(&cfg),
    }
}
