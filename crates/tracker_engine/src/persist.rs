use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracker_core::HostIdentifier;
use tracker_logging::{tracker_info, tracker_warn};

use crate::{PersistError, StoreError};

/// Key the host identifier is stored under.
pub const HOST_ID_KEY: &str = "tracker_host_id";
const SETTINGS_FILENAME: &str = "tracker_settings.ron";

/// Creates the state directory if needed and checks that it is a writable directory.
pub fn ensure_state_dir(dir: &Path) -> Result<(), PersistError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    } else if !dir.is_dir() {
        return Err(PersistError::StateDir(format!("{} is not a directory", dir.display())));
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    Ok(())
}

/// Writes whole files through a temp file and a rename, so readers never see
/// a partial settings file.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_state_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Configuration store for the host identifier.
pub trait HostIdStore {
    fn load(&self) -> Result<Option<HostIdentifier>, StoreError>;
    fn save(&mut self, host_id: &HostIdentifier) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSettings {
    entries: BTreeMap<String, String>,
}

/// Key/value settings file in RON format.
#[derive(Debug, Clone)]
pub struct RonHostIdStore {
    dir: PathBuf,
}

impl RonHostIdStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILENAME)
    }

    fn read_settings(&self) -> Result<PersistedSettings, StoreError> {
        let content = match fs::read_to_string(self.path()) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PersistedSettings::default());
            }
            Err(err) => return Err(PersistError::Io(err).into()),
        };
        Ok(ron::from_str(&content)?)
    }
}

impl HostIdStore for RonHostIdStore {
    fn load(&self) -> Result<Option<HostIdentifier>, StoreError> {
        let settings = self.read_settings()?;
        Ok(settings
            .entries
            .get(HOST_ID_KEY)
            .and_then(|raw| HostIdentifier::parse(raw)))
    }

    fn save(&mut self, host_id: &HostIdentifier) -> Result<(), StoreError> {
        // Keep unrelated keys when rewriting; a corrupt file is replaced.
        let mut settings = self.read_settings().unwrap_or_default();
        settings
            .entries
            .insert(HOST_ID_KEY.to_string(), host_id.to_string());

        let content = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::new())?;
        AtomicFileWriter::new(self.dir.clone()).write(SETTINGS_FILENAME, &content)?;
        Ok(())
    }
}

/// Reads the configured host, falling back to `fallback` when nothing usable is stored.
pub fn load_host_identifier(store: &dyn HostIdStore, fallback: &HostIdentifier) -> HostIdentifier {
    match store.load() {
        Ok(Some(host_id)) => {
            tracker_info!("Loaded host ID {host_id}");
            host_id
        }
        Ok(None) => fallback.clone(),
        Err(err) => {
            tracker_warn!("Failed to load host ID, using {fallback}: {err}");
            fallback.clone()
        }
    }
}
