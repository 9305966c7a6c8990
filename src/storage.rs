//! Best-score persistence.
//!
//! A single number survives between runs, stored as a small JSON document
//! in the platform data directory.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const FILE_NAME: &str = "best_score.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not determine a data directory")]
    NoDataDir,
    #[error("best score file: {0}")]
    Io(#[from] io::Error),
    #[error("best score file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct BestScoreRecord {
    best_score: u32,
}

/// Data directory for everything the game writes (best score, log file).
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dirs = ProjectDirs::from("", "", "flappy-power").ok_or(StorageError::NoDataDir)?;
    Ok(dirs.data_dir().to_path_buf())
}

#[derive(Debug, Clone)]
pub struct BestScoreStore {
    path: PathBuf,
}

impl BestScoreStore {
    /// Store in the platform data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::at(data_dir()?.join(FILE_NAME)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored best score. A missing file means 0.
    pub fn try_load(&self) -> Result<u32, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => {
                let record: BestScoreRecord = serde_json::from_str(&json)?;
                Ok(record.best_score)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Like `try_load`, but any problem is logged and reads as 0.
    pub fn load(&self) -> u32 {
        match self.try_load() {
            Ok(best) => {
                debug!(best, path = %self.path.display(), "loaded best score");
                best
            }
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "ignoring stored best score");
                0
            }
        }
    }

    pub fn save(&self, best_score: u32) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&BestScoreRecord { best_score })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
