use crate::config::APP_NAME;
use crate::error::PokedexError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

const TRAINER_FILE_NAME: &str = "trainer.json";

#[derive(Serialize, Deserialize, Debug)]
struct StoredTrainer {
    trainer_name: String,
    updated_at: OffsetDateTime,
}

/// Persists the trainer name as a single JSON document
#[derive(Debug, Clone)]
pub struct TrainerStore {
    file_path: PathBuf,
}

impl TrainerStore {
    pub fn new() -> Result<Self, PokedexError> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::with_path(config_dir.join(TRAINER_FILE_NAME)))
    }

    pub fn with_path(file_path: PathBuf) -> Self {
        TrainerStore { file_path }
    }

    fn get_config_dir() -> Result<PathBuf, PokedexError> {
        ProjectDirs::from("", "", APP_NAME)
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| PokedexError::Storage("Could not determine config directory".to_string()))
    }

    /// Stored name, or an empty string when nothing was saved yet
    pub fn load(&self) -> Result<String, PokedexError> {
        if !self.file_path.exists() {
            return Ok(String::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .map_err(|e| PokedexError::Storage(format!("Failed to read trainer file: {}", e)))?;
        let stored: StoredTrainer = serde_json::from_str(&content)
            .map_err(|e| PokedexError::Storage(format!("Failed to parse trainer file: {}", e)))?;

        Ok(stored.trainer_name)
    }

    pub fn save(&self, trainer_name: &str) -> Result<(), PokedexError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PokedexError::Storage(format!("Failed to create config directory: {}", e))
            })?;
        }

        let stored = StoredTrainer {
            trainer_name: trainer_name.to_string(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|e| PokedexError::Storage(format!("Failed to serialize trainer: {}", e)))?;

        fs::write(&self.file_path, content)
            .map_err(|e| PokedexError::Storage(format!("Failed to write trainer file: {}", e)))?;

        log::debug!("Saved trainer name to {}", self.file_path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Process-wide session state: the trainer name and where it is persisted.
///
/// Read once from the store when loaded, written through on every change.
#[derive(Debug)]
pub struct Session {
    trainer_name: String,
    store: TrainerStore,
}

impl Session {
    /// Load the stored name. An unreadable file starts an empty session.
    pub fn load(store: TrainerStore) -> Self {
        let trainer_name = match store.load() {
            Ok(name) => name,
            Err(e) => {
                log::warn!("Ignoring stored trainer name: {}", e);
                String::new()
            }
        };
        Session {
            trainer_name,
            store,
        }
    }

    pub fn trainer_name(&self) -> &str {
        &self.trainer_name
    }

    pub fn is_authenticated(&self) -> bool {
        !self.trainer_name.is_empty()
    }

    pub fn set_trainer_name(&mut self, name: &str) -> Result<(), PokedexError> {
        let name = name.trim();
        self.store.save(name)?;
        self.trainer_name = name.to_string();
        log::info!("Trainer name set to {:?}", self.trainer_name);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), PokedexError> {
        self.set_trainer_name("")
    }
}
