use crate::models::{MessageResult, MessagesCollection, SavedMessage, UiState, UserProfile};
use crate::services::automation::Cookie;
use chrono::Utc;
use std::path::PathBuf;
use tokio::sync::Mutex;
use thiserror::Error;

/// Errors from the file-backed stores
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Directory of archived message collections served under `/messages/`
pub struct MessageArchive {
    dir: PathBuf,
}

impl MessageArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write a collection and return its file name
    pub async fn save(
        &self,
        profile: &UserProfile,
        objective: &str,
        results: &[MessageResult],
    ) -> Result<String, StorageError> {
        let generated_at = Utc::now();
        let collection = MessagesCollection {
            user_profile: profile.clone(),
            objective: objective.to_string(),
            generated_at,
            messages: results.iter().map(SavedMessage::from).collect(),
        };

        let filename = format!(
            "messages_{}_{}.json",
            slug(&profile.full_name),
            generated_at.format("%Y%m%d%H%M%S")
        );

        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_vec_pretty(&collection)?;
        tokio::fs::write(self.dir.join(&filename), json).await?;

        tracing::info!("Saved {} messages to {}", results.len(), filename);
        Ok(filename)
    }

    /// Read a collection back by the file name `save` returned
    pub async fn load(&self, filename: &str) -> Result<MessagesCollection, StorageError> {
        if !is_safe_filename(filename) {
            return Err(StorageError::InvalidFileName(filename.to_string()));
        }

        let path = self.dir.join(filename);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(filename.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn slug(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "user".to_string()
    } else {
        slug
    }
}

fn is_safe_filename(name: &str) -> bool {
    name.ends_with(".json")
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Single JSON file holding the persisted UI state
///
/// Writes replace the whole file; the last writer wins.
pub struct StateStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Load the saved state, or the default state when nothing was saved yet
    pub async fn load(&self) -> Result<UiState, StorageError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    pub async fn save(&self, state: &UiState) -> Result<UiState, StorageError> {
        let _guard = self.lock.lock().await;
        let mut state = state.clone();
        self.write(&mut state).await?;
        Ok(state)
    }

    /// Read, modify and write back under one lock
    pub async fn update<F>(&self, f: F) -> Result<UiState, StorageError>
    where
        F: FnOnce(&mut UiState),
    {
        let _guard = self.lock.lock().await;
        let mut state = self.read().await?;
        f(&mut state);
        self.write(&mut state).await?;
        Ok(state)
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self) -> Result<UiState, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UiState::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, state: &mut UiState) -> Result<(), StorageError> {
        state.updated_at = Some(Utc::now());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(state)?).await?;
        Ok(())
    }
}

/// LinkedIn session cookies captured after a manual login
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// True when a saved session with at least one cookie exists
    pub async fn is_auth_setup(&self) -> bool {
        matches!(self.load().await, Ok(Some(cookies)) if !cookies.is_empty())
    }

    pub async fn load(&self) -> Result<Option<Vec<Cookie>>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, cookies: &[Cookie]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(cookies)?).await?;
        tracing::info!("Saved {} session cookies to {}", cookies.len(), self.path.display());
        Ok(())
    }
}
