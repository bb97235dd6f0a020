use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;
use tracing::{debug, info, warn};

use shared_models::auth::UserProfile;

/// Key holding the bearer credential written by the login flow.
pub const TOKEN_KEY: &str = "niramya_token";
/// Key holding the signed-in user's profile as JSON.
pub const USER_KEY: &str = "niramya_user";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage file is not a JSON object: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Process-wide string key/value store, the browser `localStorage` contract.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Bearer credential, if the user is signed in. Empty strings count as absent.
pub fn read_token(storage: &dyn LocalStorage) -> Option<String> {
    storage.get_item(TOKEN_KEY).filter(|token| !token.trim().is_empty())
}

/// Stored user profile. A malformed record is logged and treated as absent.
pub fn read_user(storage: &dyn LocalStorage) -> Option<UserProfile> {
    let raw = storage.get_item(USER_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("Ignoring malformed {} record: {}", USER_KEY, e);
            None
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: RwLock::new(
                items
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .remove(key);
        Ok(())
    }
}

/// JSON-object file on disk. Reads go back to the file so values written by
/// the login flow after startup are seen; mutations write through.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            info!("No local storage at {}, starting empty", path.display());
        }
        let items = read_items(&path)?;

        debug!("Opened local storage {} with {} keys", path.display(), items.len());

        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the cached items with the current file contents.
    pub fn reload(&self) -> Result<(), StorageError> {
        let items = read_items(&self.path)?;
        *self.items.write().map_err(|_| StorageError::Poisoned)? = items;
        Ok(())
    }

    fn persist(&self, items: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

fn read_items(path: &Path) -> Result<HashMap<String, String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(e.into()),
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        if let Err(e) = self.reload() {
            warn!(
                "Could not reload local storage {}, using cached values: {}",
                self.path.display(),
                e
            );
        }
        self.items.read().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        self.persist(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        if items.remove(key).is_some() {
            self.persist(&items)?;
        }
        Ok(())
    }
}
