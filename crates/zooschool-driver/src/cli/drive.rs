/*
[INPUT]:  DriverConfig, trip id, log buffer, shutdown token
[OUTPUT]: Wired trip source, messenger, recorder; the drive console; dry-run checks
[POS]:    CLI drive and check commands
[UPDATE]: When a new trip source or SMS sender is added
*/

use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use zooschool_adapter::CarpoolClient;
use zooschool_adapter::maps::{self, RouteSummary};
use zooschool_driver::config::{SmsSenderKind, TripSourceKind};
use zooschool_driver::messaging::{LogSmsSender, WebhookSmsSender};
use zooschool_driver::sequencer::format_elapsed;
use zooschool_driver::state::storage::CompletionStore;
use zooschool_driver::{
    BackendTripSource, CompletionRecorder, DriverConfig, FileTripSource, Messenger, SmsSender,
    TripExecution, TripPlan, TripSource,
};

use super::account::{backend_client, print_session_status};
use crate::tui::{DriveApp, LogBufferHandle, run_drive as run_console};

fn trip_source(
    config: &DriverConfig,
    backend: Option<&CarpoolClient>,
) -> Result<Box<dyn TripSource>> {
    match config.trips.source {
        TripSourceKind::File => Ok(Box::new(FileTripSource::new(&config.trips.file))),
        TripSourceKind::Backend => {
            let client = backend.context("backend trip source requires a backend section")?;
            Ok(Box::new(BackendTripSource::new(client.clone())))
        }
    }
}

fn sms_sender(config: &DriverConfig) -> Result<Arc<dyn SmsSender>> {
    match config.messaging.sender {
        SmsSenderKind::Log => Ok(Arc::new(LogSmsSender)),
        SmsSenderKind::Webhook => {
            let sender = WebhookSmsSender::new(config.webhook_url()?, config.messaging.timeout())
                .context("create webhook SMS sender")?;
            Ok(Arc::new(sender))
        }
    }
}

fn optional_backend(config: &DriverConfig) -> Result<Option<CarpoolClient>> {
    if config.backend.is_some() {
        backend_client(config).map(Some)
    } else {
        Ok(None)
    }
}

async fn load_plan(
    config: &DriverConfig,
    backend: Option<&CarpoolClient>,
    trip_id: &str,
) -> Result<TripPlan> {
    let source = trip_source(config, backend)?;
    let plan = source
        .load(trip_id)
        .await
        .with_context(|| format!("load trip {trip_id}"))?;
    info!(
        trip_id = %plan.trip_id,
        riders = plan.riders.len(),
        destination = %plan.destination,
        "trip loaded"
    );
    Ok(plan)
}

/// Validate configuration and optionally load a trip without opening the console
pub async fn run_check(config: &DriverConfig, trip_id: Option<&str>) -> Result<()> {
    config.validate().context("validate configuration")?;
    println!("{}", style("Configuration OK").bold().green());
    println!("  trip source: {:?}", config.trips.source);
    println!("  sms sender:  {:?}", config.messaging.sender);
    println!("  data dir:    {}", config.data_dir()?.display());
    print_session_status(config).await?;

    let Some(trip_id) = trip_id else {
        return Ok(());
    };

    let backend = optional_backend(config)?;
    let plan = load_plan(config, backend.as_ref(), trip_id).await?;
    let execution = TripExecution::from_plan(&plan);

    println!("\n{}", style(&plan.title).bold().cyan());
    for (index, step) in execution.steps().iter().enumerate() {
        println!("  {}. {}", index + 1, step.label());
    }

    let distance: Decimal = plan.riders.iter().map(|r| r.distance_miles).sum();
    let summary = RouteSummary {
        distance_miles: distance.to_f64().unwrap_or_default(),
        duration_minutes: plan.riders.iter().map(|r| u64::from(r.eta_minutes)).sum(),
    };
    println!(
        "  {} riders, {} of pickups, {}",
        plan.riders.len(),
        summary.distance_label(),
        summary.duration_label()
    );
    if let Ok(url) = maps::search_url(&plan.destination_address) {
        println!("  destination: {}", style(url).underlined());
    }
    Ok(())
}

/// Run the drive console for one trip and print a summary when it closes
pub async fn run_drive(
    config: &DriverConfig,
    trip_id: &str,
    log_buffer: LogBufferHandle,
    shutdown: CancellationToken,
) -> Result<()> {
    let backend = optional_backend(config)?;
    let plan = load_plan(config, backend.as_ref(), trip_id).await?;

    let (report_tx, report_rx) = mpsc::unbounded_channel();
    let messenger = Messenger::new(sms_sender(config)?).with_reports(report_tx);
    info!(sender = messenger.sender_name(), "messenger ready");

    let data_dir = config.data_dir()?;
    let store = CompletionStore::open(&data_dir)
        .await
        .with_context(|| format!("open completion store in {}", data_dir.display()))?;
    // Status updates go to the backend only when trips come from it
    let status_backend = match config.trips.source {
        TripSourceKind::Backend => backend,
        TripSourceKind::File => None,
    };
    let recorder = CompletionRecorder::new(Arc::new(store), status_backend);

    let app = DriveApp::new(plan, messenger, recorder).with_log_buffer(log_buffer);
    let app = run_console(app, report_rx, shutdown).await?;

    let execution = app.execution();
    match app.completion() {
        Some(completion) => {
            println!(
                "{} {} in {}",
                style("Trip complete:").bold().green(),
                app.plan().title,
                format_elapsed(completion.elapsed_seconds)
            );
            if let Some(rating) = completion.rating {
                println!("  rating: {}", "*".repeat(usize::from(rating)));
            }
        }
        None => println!(
            "{} at step {} of {} ({})",
            style("Trip left unfinished").yellow(),
            execution.current_index() + 1,
            execution.steps().len(),
            execution.elapsed()
        ),
    }
    Ok(())
}
