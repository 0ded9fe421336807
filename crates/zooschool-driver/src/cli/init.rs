/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML driver configuration file
[POS]:    CLI initialization layer
[UPDATE]: When DriverConfig schema changes
*/

use anyhow::{Result, anyhow};
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use std::path::PathBuf;

use zooschool_driver::config::{
    AuthConfig, BackendConfig, DriverConfig, MessagingConfig, SmsSenderKind, StorageConfig,
    TripSourceKind, TripsConfig,
};

pub fn run_init(output: PathBuf) -> Result<()> {
    println!("{}", style("Welcome to ZooSchool Carpool").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a driver configuration.").dim()
    );

    if output.exists() {
        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} exists. Overwrite?", output.display()))
            .default(false)
            .interact()?;
        if !overwrite {
            println!("{}", style("Nothing written.").yellow());
            return Ok(());
        }
    }

    let theme = ColorfulTheme::default();

    println!("\n{}", style("--- Trips ---").bold());
    let sources = ["file", "backend"];
    let source = match Select::with_theme(&theme)
        .with_prompt("Trip source")
        .items(&sources)
        .default(0)
        .interact()?
    {
        0 => TripSourceKind::File,
        _ => TripSourceKind::Backend,
    };

    let trips_file: String = Input::with_theme(&theme)
        .with_prompt("Trips file")
        .default("trips.json".to_string())
        .interact_text()?;

    let wants_backend = source == TripSourceKind::Backend
        || Confirm::with_theme(&theme)
            .with_prompt("Configure a backend for accounts?")
            .default(false)
            .interact()?;

    let backend = if wants_backend {
        println!("\n{}", style("--- Backend ---").bold());
        let url: String = Input::with_theme(&theme)
            .with_prompt("Backend URL")
            .interact_text()?;
        let service_key: String = Input::with_theme(&theme)
            .with_prompt("Service key")
            .interact_text()?;
        Some(BackendConfig {
            url: url.trim().to_string(),
            service_key: service_key.trim().to_string(),
            timeout_secs: 10,
        })
    } else {
        None
    };

    println!("\n{}", style("--- Messaging ---").bold());
    let senders = ["log (print messages to the activity log)", "webhook"];
    let (sender, webhook_url) = match Select::with_theme(&theme)
        .with_prompt("SMS sender")
        .items(&senders)
        .default(0)
        .interact()?
    {
        0 => (SmsSenderKind::Log, None),
        _ => {
            let url: String = Input::with_theme(&theme)
                .with_prompt("Webhook URL")
                .interact_text()?;
            (SmsSenderKind::Webhook, Some(url.trim().to_string()))
        }
    };

    println!("\n{}", style("--- Storage ---").bold());
    let data_dir: String = Input::with_theme(&theme)
        .with_prompt("Data directory (empty for the platform default)")
        .allow_empty(true)
        .interact_text()?;
    let data_dir = data_dir.trim();

    let config = DriverConfig {
        backend,
        trips: TripsConfig {
            source,
            file: PathBuf::from(trips_file.trim()),
        },
        messaging: MessagingConfig {
            sender,
            webhook_url,
            ..MessagingConfig::default()
        },
        storage: StorageConfig {
            data_dir: (!data_dir.is_empty()).then(|| PathBuf::from(data_dir)),
        },
        auth: AuthConfig::default(),
    };

    config
        .validate()
        .map_err(|err| anyhow!("configuration is not usable: {err:#}"))?;
    config.write(&output)?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );

    Ok(())
}
