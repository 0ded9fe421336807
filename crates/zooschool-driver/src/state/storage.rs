/*
[INPUT]:  Trip completions and auth sessions
[OUTPUT]: JSON files under the data directory (atomic temp-file writes)
[POS]:    Persistence layer - local stores
[UPDATE]: When stored record shapes change
*/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use zooschool_adapter::AuthSession;

use crate::completion::TripCompletion;

const COMPLETIONS_FILE: &str = "completions.json";
const SESSION_FILE: &str = "session.json";
const RECORD_MODE: u32 = 0o644;
/// Session files hold a bearer token
const SESSION_MODE: u32 = 0o600;

/// `dirs::data_dir()/zooschool-carpool`
pub fn default_data_dir() -> Result<PathBuf> {
    Ok(dirs::data_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?
        .join("zooschool-carpool"))
}

/// Append-only list of completed trips
#[derive(Debug)]
pub struct CompletionStore {
    path: PathBuf,
    records: Mutex<Vec<TripCompletion>>,
}

impl CompletionStore {
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("create data dir {}", data_dir.display()))?;

        let path = data_dir.join(COMPLETIONS_FILE);
        let records = Self::load(&path).await?;
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    async fn load(path: &Path) -> Result<Vec<TripCompletion>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).await?;
        let records = serde_json::from_str(&content)
            .with_context(|| format!("parse {}", path.display()))?;
        Ok(records)
    }

    pub async fn append(&self, completion: TripCompletion) -> Result<()> {
        completion.validate()?;
        let mut records = self.records.lock().await;
        if records.iter().any(|r| r.id == completion.id) {
            return Err(anyhow!("Completion '{}' already recorded", completion.id));
        }
        records.push(completion);
        write_atomic(&self.path, &*records, RECORD_MODE).await
    }

    pub async fn list(&self) -> Vec<TripCompletion> {
        self.records.lock().await.clone()
    }

    pub async fn for_trip(&self, trip_id: &str) -> Vec<TripCompletion> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|r| r.trip_id == trip_id)
            .cloned()
            .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Signed-in session kept between CLI invocations
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SESSION_FILE),
        }
    }

    pub async fn load(&self) -> Result<Option<AuthSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).await?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(session))
    }

    pub async fn save(&self, session: &AuthSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        write_atomic(&self.path, session, SESSION_MODE).await
    }

    /// Returns whether a session file existed
    pub async fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// Atomic write: write to temp file then rename; the temp file carries `mode` from creation
async fn write_atomic<T: serde::Serialize + ?Sized>(path: &Path, value: &T, mode: u32) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    let temp_path = path.with_extension("tmp");
    let mut file = create_temp(&temp_path, mode).await?;
    file.write_all(content.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(&temp_path, path).await?;
    Ok(())
}

/// A leftover temp file may have wider permissions, so start from a fresh one
async fn create_temp(path: &Path, mode: u32) -> Result<fs::File> {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;
    options
        .open(path)
        .await
        .with_context(|| format!("create {}", path.display()))
}
