use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, Result};

/// Last observed count per source identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateRecord {
    counts: BTreeMap<String, u64>,
}

impl StateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source_id: &str) -> Option<u64> {
        self.counts.get(source_id).copied()
    }

    pub fn set(&mut self, source_id: impl Into<String>, count: u64) {
        self.counts.insert(source_id.into(), count);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for StateRecord {
    fn from_iter<T: IntoIterator<Item = (K, u64)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Durable storage for the state record. Loaded once and saved at most once per run.
#[cfg_attr(test, mockall::automock)]
pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<StateRecord>;
    fn save(&self, state: &StateRecord) -> Result<()>;
}

/// JSON object on disk, e.g. `{"K&L - New Product Page": 3}`.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    /// `path` may start with `~`, which expands to the home directory.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            path: expand_home(path.as_ref()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, message: impl Into<String>) -> AppError {
        AppError::StateCorrupt {
            path: self.path.display().to_string(),
            message: message.into(),
        }
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<StateRecord> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No state file at {}, starting empty", self.path.display());
                return Ok(StateRecord::new());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&data).map_err(|e| self.corrupt(e.to_string()))
    }

    fn save(&self, state: &StateRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string_pretty(state)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!("Saved {} counts to {}", state.len(), self.path.display());
        Ok(())
    }
}

/// Expands a leading `~` or `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
