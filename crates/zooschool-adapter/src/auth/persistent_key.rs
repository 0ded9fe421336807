/*
[INPUT]:  Key name and key storage directory
[OUTPUT]: Persistent Ed25519 signer instances
[POS]:    Auth layer - persistent storage for session-signing keys
[UPDATE]: When key storage format or file naming conventions change
*/

use std::fs;
use std::io;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{info, warn};

use crate::auth::Ed25519Signer;

/// Manages persistence of Ed25519 token-signing keys
#[derive(Debug, Clone)]
pub struct PersistentKeyManager {
    key_dir: PathBuf,
}

impl PersistentKeyManager {
    /// Create a new key manager with the given storage directory
    pub fn new(key_dir: impl AsRef<Path>) -> Self {
        Self {
            key_dir: key_dir.as_ref().to_path_buf(),
        }
    }

    /// Get an existing signer or create a new one if it doesn't exist
    pub fn get_or_create_signer(&self, key_name: &str) -> io::Result<Ed25519Signer> {
        if let Some(signer) = self.load_signer(key_name) {
            Ok(signer)
        } else {
            let signer = Ed25519Signer::generate();
            self.save_signer(key_name, &signer)?;
            info!(key_name, key_id = %signer.key_id(), "generated new signing key");
            Ok(signer)
        }
    }

    /// Load a signer from disk; unreadable or corrupt files yield `None`
    pub fn load_signer(&self, key_name: &str) -> Option<Ed25519Signer> {
        let path = self.key_file_path(key_name);
        let content = fs::read_to_string(&path).ok()?;
        let bytes = match STANDARD.decode(content.trim()) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring corrupt signing key");
                return None;
            }
        };

        let key_bytes: [u8; 32] = bytes.try_into().ok()?;
        Some(Ed25519Signer::from_secret_key(&key_bytes))
    }

    /// Save a signer to disk, readable by the owner only
    pub fn save_signer(&self, key_name: &str, signer: &Ed25519Signer) -> io::Result<()> {
        if !self.key_dir.exists() {
            fs::create_dir_all(&self.key_dir)?;
        }

        let path = self.key_file_path(key_name);
        fs::write(&path, STANDARD.encode(signer.secret_key_bytes()))?;

        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Names of all stored keys
    pub fn list_keys(&self) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.key_dir) {
            for entry in entries.flatten() {
                if let Some(name) = entry.file_name().to_str() {
                    if let Some(key_name) = name.strip_suffix("_ed25519.key") {
                        names.push(key_name.to_string());
                    }
                }
            }
        }
        names.sort();
        names
    }

    pub fn key_file_path(&self, key_name: &str) -> PathBuf {
        self.key_dir.join(format!("{key_name}_ed25519.key"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let mut path = env::temp_dir();
        path.push(format!("zooschool-test-{}", Uuid::new_v4()));
        fs::create_dir_all(&path).unwrap();
        path
    }

    #[test]
    fn test_persistent_key_lifecycle() {
        let dir = temp_dir();
        let manager = PersistentKeyManager::new(&dir);

        let signer1 = manager.get_or_create_signer("session").unwrap();
        let signer2 = manager
            .load_signer("session")
            .expect("Should load existing key");
        assert_eq!(signer2.key_id(), signer1.key_id());

        let signer3 = manager.get_or_create_signer("session").unwrap();
        assert_eq!(signer3.key_id(), signer1.key_id());

        assert_eq!(manager.list_keys(), vec!["session".to_string()]);

        #[cfg(unix)]
        {
            let metadata = fs::metadata(manager.key_file_path("session")).unwrap();
            assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
        }

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_corrupt_key_is_replaced() {
        let dir = temp_dir();
        let manager = PersistentKeyManager::new(&dir);
        fs::write(manager.key_file_path("session"), "not base64 at all!").unwrap();

        assert!(manager.load_signer("session").is_none());
        let signer = manager.get_or_create_signer("session").unwrap();
        assert_eq!(
            manager.load_signer("session").unwrap().key_id(),
            signer.key_id()
        );

        fs::remove_dir_all(dir).unwrap();
    }
}
