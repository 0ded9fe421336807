/*
[INPUT]:  YAML configuration file and ZOOSCHOOL__* environment variables
[OUTPUT]: Parsed driver configuration
[POS]:    Configuration layer - backend, trip source, messaging, storage
[UPDATE]: When adding new configuration options
*/

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use url::Url;

pub const ENV_PREFIX: &str = "ZOOSCHOOL";
pub const ENV_SEPARATOR: &str = "__";

/// Top-level configuration for the driver console
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DriverConfig {
    /// Backend REST endpoint; required for the backend trip source and accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendConfig>,
    #[serde(default)]
    pub trips: TripsConfig,
    #[serde(default)]
    pub messaging: MessagingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub url: String,
    /// Service role key sent as `apikey` and bearer token
    pub service_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TripSourceKind {
    #[default]
    File,
    Backend,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TripsConfig {
    #[serde(default)]
    pub source: TripSourceKind,
    /// JSON trip fixture used by the file source
    #[serde(default = "default_trips_file")]
    pub file: PathBuf,
}

impl Default for TripsConfig {
    fn default() -> Self {
        Self {
            source: TripSourceKind::default(),
            file: default_trips_file(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsSenderKind {
    #[default]
    Log,
    Webhook,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessagingConfig {
    #[serde(default)]
    pub sender: SmsSenderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            sender: SmsSenderKind::default(),
            webhook_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Defaults to the platform data dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Where the session signing key lives; defaults to `<data_dir>/keys`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_dir: Option<PathBuf>,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            key_dir: None,
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_trips_file() -> PathBuf {
    PathBuf::from("trips.json")
}

fn default_bcrypt_cost() -> u32 {
    12
}

impl DriverConfig {
    /// Load configuration from an optional YAML file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// `env` replaces the process environment when given
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(anyhow!("config file not found: {}", path.display()));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .source(env),
        );

        let config: Self = builder
            .build()
            .context("read configuration")?
            .try_deserialize()
            .context("parse configuration")?;
        Ok(config)
    }

    /// Write as YAML
    pub fn write(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("failed to serialize config to YAML")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.trips.source == TripSourceKind::Backend && self.backend.is_none() {
            return Err(anyhow!("trips.source is backend but no backend section is configured"));
        }
        if let Some(backend) = &self.backend {
            Url::parse(&backend.url)
                .with_context(|| format!("backend.url is not a valid URL: {}", backend.url))?;
            if backend.service_key.trim().is_empty() {
                return Err(anyhow!("backend.service_key cannot be empty"));
            }
        }
        if self.messaging.sender == SmsSenderKind::Webhook {
            self.webhook_url()?;
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(anyhow!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            ));
        }
        Ok(())
    }

    pub fn backend(&self) -> Result<&BackendConfig> {
        self.backend
            .as_ref()
            .ok_or_else(|| anyhow!("no backend section in configuration"))
    }

    pub fn webhook_url(&self) -> Result<Url> {
        let raw = self
            .messaging
            .webhook_url
            .as_deref()
            .ok_or_else(|| anyhow!("messaging.webhook_url is required for the webhook sender"))?;
        Url::parse(raw).with_context(|| format!("messaging.webhook_url is not a valid URL: {raw}"))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::state::storage::default_data_dir(),
        }
    }

    pub fn key_dir(&self) -> Result<PathBuf> {
        match &self.auth.key_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.data_dir()?.join("keys")),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl MessagingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
