//! YAML file storage for homepages and widgets.
//!
//! DESIGN
//! ======
//! The whole document is loaded into memory on open and rewritten on every
//! `save()`. Writes go to a sibling temp file that is renamed over the
//! target, and the previous file is copied to `<path>.backup` first, so a
//! crash mid-write leaves either the old or the new document on disk.
//!
//! ERROR HANDLING
//! ==============
//! A document that fails to parse is replaced by its backup and parsed
//! once more. Without a usable backup, `open` fails rather than silently
//! starting from an empty store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::homepage::Homepage;
use crate::widget::{Properties, Widget, WidgetKind};

pub const STORAGE_VERSION: &str = "1.0";
pub const DEFAULT_HOMEPAGE_NAME: &str = "Home";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encode error: {0}")]
    Encode(#[from] serde_yaml::Error),
    #[error("corrupt storage file {path} and no usable backup: {source}")]
    Corrupt { path: PathBuf, source: serde_yaml::Error },
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// A widget as stored on disk, tagged with its owning homepage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredWidget {
    pub id: Uuid,
    pub homepage_id: Uuid,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub position: u32,
    #[serde(default)]
    pub properties: Properties,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl StoredWidget {
    #[must_use]
    pub fn to_widget(&self) -> Widget {
        Widget {
            id: self.id,
            kind: self.kind,
            position: self.position,
            properties: self.properties.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Root YAML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageData {
    pub version: String,
    #[serde(default)]
    pub homepages: Vec<Homepage>,
    #[serde(default)]
    pub widgets: Vec<StoredWidget>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self { version: STORAGE_VERSION.to_owned(), homepages: Vec::new(), widgets: Vec::new() }
    }
}

impl StorageData {
    /// Guarantee exactly one default homepage exists. Returns `true` if the
    /// document was changed.
    pub fn ensure_default_homepage(&mut self) -> bool {
        if self.homepages.is_empty() {
            self.homepages.push(Homepage::new(DEFAULT_HOMEPAGE_NAME, true));
            return true;
        }
        let defaults = self.homepages.iter().filter(|hp| hp.is_default).count();
        if defaults == 1 {
            return false;
        }
        // Zero or several defaults: keep the oldest one.
        let keep = self
            .homepages
            .iter()
            .filter(|hp| defaults == 0 || hp.is_default)
            .min_by_key(|hp| hp.created_at)
            .map(|hp| hp.id);
        for hp in &mut self.homepages {
            hp.is_default = Some(hp.id) == keep;
        }
        true
    }

    #[must_use]
    pub fn default_homepage_id(&self) -> Option<Uuid> {
        self.homepages.iter().find(|hp| hp.is_default).map(|hp| hp.id)
    }
}

// =============================================================================
// STORE
// =============================================================================

/// In-memory copy of the storage file plus its location on disk.
#[derive(Debug)]
pub struct YamlStore {
    path: PathBuf,
    data: StorageData,
}

impl YamlStore {
    /// Open (or create) the storage file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written, or if it is
    /// corrupt and no backup can be parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let mut store = if path.exists() {
            let data = read_document(&path)?;
            Self { path, data }
        } else {
            info!(path = %path.display(), "creating new storage file");
            Self { path, data: StorageData::default() }
        };

        if store.data.ensure_default_homepage() || !store.path.exists() {
            store.save()?;
        }
        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        sibling_with_suffix(&self.path, ".backup")
    }

    #[must_use]
    pub fn data(&self) -> &StorageData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut StorageData {
        &mut self.data
    }

    /// Apply `f` to the document and save. If `f` fails or the save fails,
    /// the in-memory document is rolled back to its previous state.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or the storage error from `save`.
    pub fn transact<T, E>(&mut self, f: impl FnOnce(&mut StorageData) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StorageError>,
    {
        let snapshot = self.data.clone();
        let value = match f(&mut self.data) {
            Ok(value) => value,
            Err(e) => {
                self.data = snapshot;
                return Err(e);
            }
        };
        if let Err(e) = self.save() {
            self.data = snapshot;
            return Err(e.into());
        }
        Ok(value)
    }

    /// Write the in-memory document to disk atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, the backup copy, or the write fails.
    pub fn save(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        if self.path.exists() {
            fs::copy(&self.path, self.backup_path())?;
        }

        let encoded = serde_yaml::to_string(&self.data)?;
        let temp_path = sibling_with_suffix(&self.path, ".tmp");
        if let Err(e) = fs::write(&temp_path, encoded) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        fs::rename(&temp_path, &self.path)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<StorageData, StorageError> {
    let raw = fs::read_to_string(path)?;
    match parse_document(&raw) {
        Ok(data) => Ok(data),
        Err(source) => {
            let backup = sibling_with_suffix(path, ".backup");
            if !backup.exists() {
                return Err(StorageError::Corrupt { path: path.to_path_buf(), source });
            }
            warn!(path = %path.display(), error = %source, "storage file corrupt; restoring backup");
            fs::copy(&backup, path)?;
            let raw = fs::read_to_string(path)?;
            parse_document(&raw).map_err(|source| StorageError::Corrupt { path: path.to_path_buf(), source })
        }
    }
}

fn parse_document(raw: &str) -> Result<StorageData, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(StorageData::default());
    }
    serde_yaml::from_str(raw)
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
