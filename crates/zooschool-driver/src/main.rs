/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Account commands, config checks and the trip drive console
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod cli;
mod tui;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use zooschool_driver::DriverConfig;

use crate::cli::account::SignupDetails;
use crate::tui::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory};

const DEFAULT_CONFIG_FILE: &str = "zooschool.yaml";
const LOG_FILE_NAME: &str = "zooschool-driver.log";

#[derive(Parser, Debug)]
#[command(name = "zooschool-driver", version, about = "ZooSchool Carpool driver console")]
struct Cli {
    /// Defaults to ./zooschool.yaml when present
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a configuration file interactively
    Init {
        #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
    /// Validate configuration and optionally preview a trip's steps
    Check {
        #[arg(long, value_name = "TRIP_ID")]
        trip: Option<String>,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
    },
    /// Remove the stored session
    Logout,
    /// Drive a trip step by step
    Drive { trip_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        config_path,
        log_level,
        command,
    } = Cli::parse();

    let command = match command {
        Command::Init { output } => {
            init_tracing(&log_level)?;
            return tokio::task::spawn_blocking(move || cli::init::run_init(output))
                .await
                .context("init prompt task")?;
        }
        command => command,
    };

    let config_path = resolve_config_path(config_path.as_deref());
    let config = DriverConfig::load(config_path.as_deref()).context("load config")?;

    match command {
        Command::Drive { trip_id } => {
            let buffer = LogBuffer::handle(LOG_BUFFER_CAPACITY);
            let log_dir = config.data_dir()?.join("logs");
            let _guard = init_tui_tracing(&log_level, &log_dir, buffer.clone())?;
            config.validate().context("validate configuration")?;
            info!(
                config_path = ?config_path,
                trip_id = %trip_id,
                "starting zooschool-driver"
            );

            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());
            cli::drive::run_drive(&config, &trip_id, buffer, shutdown).await
        }
        command => {
            init_tracing(&log_level)?;
            info!(config_path = ?config_path, "configuration loaded");
            run_command(&config, command).await
        }
    }
}

async fn run_command(config: &DriverConfig, command: Command) -> Result<()> {
    match command {
        Command::Check { trip } => cli::drive::run_check(config, trip.as_deref()).await,
        Command::Signup {
            email,
            first_name,
            last_name,
            phone,
            address,
        } => {
            let details = SignupDetails {
                email,
                first_name,
                last_name,
                phone,
                address,
            };
            cli::account::run_signup(config, details).await
        }
        Command::Login { email } => cli::account::run_login(config, email).await,
        Command::Logout => cli::account::run_logout(config).await,
        Command::Init { .. } | Command::Drive { .. } => {
            Err(anyhow!("command must be dispatched before configuration"))
        }
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            fallback.exists().then_some(fallback)
        }
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

/// The console owns the terminal, so logs go to a daily file and the Activity panel
fn init_tui_tracing(
    log_level: &str,
    log_dir: &Path,
    buffer: LogBufferHandle,
) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(
            fmt::layer()
                .with_writer(LogWriterFactory::new(buffer))
                .with_ansi(false)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
