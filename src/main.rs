use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use toolchanger::config::Config;
use toolchanger::controller::{Booted, Controller};

mod cli;

use cli::Cli;
use cli::commands::Commands;

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolchanger")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("toolchanger.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = config.log_filter(rust_log.as_deref());
    env_logger::Builder::new()
        .parse_filters(&filter)
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized with filter '{}', writing to: {}", filter, log_file.display());
    Ok(())
}

async fn boot(config: &Config, verbose: bool) -> Result<Booted> {
    let booted = Controller::boot(config).await.context("Failed to boot controller")?;
    if verbose {
        for note in &booted.notes {
            if note.starts_with("Error") || note.starts_with("ERROR") {
                println!("{}", note.red());
            } else {
                println!("{}", note.yellow());
            }
        }
    }
    Ok(booted)
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => handle_run_command(None, config, cli.is_verbose()).await,
        Some(Commands::Run { script }) => handle_run_command(script.as_deref(), config, cli.is_verbose()).await,
        Some(Commands::Tools) => handle_tools_command(config, cli.is_verbose()).await,
        Some(Commands::Config) => handle_config_command(config),
    }
}

async fn handle_run_command(script: Option<&Path>, config: &Config, verbose: bool) -> Result<()> {
    let mut booted = boot(config, verbose).await?;
    info!("Dispatching lines from {:?}", script);

    match script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .context(format!("Failed to open script {}", path.display()))?;
            dispatch_lines(&mut booted.controller, BufReader::new(file)).await
        }
        None => dispatch_lines(&mut booted.controller, BufReader::new(tokio::io::stdin())).await,
    }
}

async fn dispatch_lines<R: AsyncBufRead + Unpin>(controller: &mut Controller, reader: R) -> Result<()> {
    let mut lines = reader.lines();
    let mut stdout = std::io::stdout();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        controller
            .on_line(&line, &mut stdout)
            .await
            .context("Failed to write response")?;
        stdout.flush().context("Failed to flush stdout")?;
    }
    Ok(())
}

async fn handle_tools_command(config: &Config, verbose: bool) -> Result<()> {
    let mut booted = boot(config, verbose).await?;
    let mut stdout = std::io::stdout();
    booted
        .controller
        .on_line("tools", &mut stdout)
        .await
        .context("Failed to list tools")?;
    if booted.controller.tool_manager().tool_count() == 0 {
        println!("{}", "No tools loaded".yellow());
    }
    Ok(())
}

fn handle_config_command(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    println!("{} {}", "Resolved configuration for".green(), env!("CARGO_PKG_NAME"));
    print!("{}", yaml);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The logger filter depends on the configuration, so load it first
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
