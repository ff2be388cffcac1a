//! Persistent application configuration.
//!
//! The configuration lives in a single JSON document, by default
//! `config.json` next to the executable:
//!
//! ```json
//! {
//!   "GlobalProjectPath": "/srv/projects",
//!   "Mode": "Custom",
//!   "ActiveProject": "Trip",
//!   "Projects": {
//!     "Trip": {
//!       "Name": "Trip",
//!       "StandardPaths": { "DocumentsPath": "/srv/projects/Trip/Documents", "...": "..." },
//!       "CustomPaths": { "ImagesPath": "/photos/trip", "DocumentsPath": null, "...": null }
//!     }
//!   }
//! }
//! ```
//!
//! All reads and writes go through [`ConfigStore`].

use crate::error::{OrganizerError, Result};
use crate::paths::{CustomPaths, Mode, PathSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name used when no explicit config path is given.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// A named project and its directory configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "StandardPaths", default)]
    pub standard_paths: PathSet,
    #[serde(rename = "CustomPaths", default)]
    pub custom_paths: CustomPaths,
}

impl Project {
    /// Creates a project rooted at `root`, with no overrides.
    pub fn new(name: impl Into<String>, root: &Path) -> Self {
        Self {
            name: name.into(),
            standard_paths: PathSet::standard_for(root),
            custom_paths: CustomPaths::default(),
        }
    }
}

/// Everything persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "GlobalProjectPath", default)]
    pub global_project_path: String,
    #[serde(rename = "Mode", default)]
    pub mode: Mode,
    #[serde(rename = "ActiveProject", default)]
    pub active_project: String,
    #[serde(rename = "Projects", default)]
    pub projects: BTreeMap<String, Project>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            global_project_path: String::new(),
            mode: Mode::Custom,
            active_project: String::new(),
            projects: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Returns the active project.
    ///
    /// # Errors
    ///
    /// `NoActiveProject` if none is selected, `ActiveProjectNotFound` if the
    /// selected name is not in the project map.
    pub fn active(&self) -> Result<&Project> {
        if self.active_project.is_empty() {
            return Err(OrganizerError::NoActiveProject);
        }
        self.projects
            .get(&self.active_project)
            .ok_or_else(|| OrganizerError::ActiveProjectNotFound(self.active_project.clone()))
    }

    /// The global root, or `None` when unset.
    pub fn root(&self) -> Option<&Path> {
        let root = self.global_project_path.trim();
        (!root.is_empty()).then(|| Path::new(root))
    }

    /// Re-derives empty standard paths of every project from the global
    /// root. Without a root nothing can be derived and nothing changes.
    fn fill_standard_paths(&mut self) {
        let Some(root) = self.root().map(Path::to_path_buf) else {
            return;
        };
        for (name, project) in self.projects.iter_mut() {
            let filled = project.standard_paths.fill_missing(&root.join(name));
            if filled > 0 {
                log::info!("Restored {} standard path(s) of project '{}'", filled, name);
            }
        }
    }
}

/// Owns the config file location and the in-memory configuration.
///
/// Reads go through [`ConfigStore::config`]; every mutation goes through
/// [`ConfigStore::update`], which saves afterwards.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: AppConfig,
    load_error: Option<OrganizerError>,
}

impl ConfigStore {
    /// Returns the default location: `config.json` beside the executable.
    pub fn default_path() -> Result<PathBuf> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join(CONFIG_FILE_NAME))
    }

    /// Opens the store at `path`.
    ///
    /// A missing file yields the defaults. An unreadable or malformed file
    /// also yields the defaults, and the failure is kept for
    /// [`ConfigStore::take_load_error`].
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (config, load_error) = match Self::load_from_file(&path) {
            Ok(Some(config)) => (config, None),
            Ok(None) => {
                log::debug!("No config at {}, using defaults", path.display());
                (AppConfig::default(), None)
            }
            Err(e) => {
                log::warn!("{}", e);
                (AppConfig::default(), Some(e))
            }
        };
        Self {
            path,
            config,
            load_error,
        }
    }

    fn load_from_file(path: &Path) -> Result<Option<AppConfig>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(OrganizerError::ConfigLoad {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let mut config: AppConfig =
            serde_json::from_str(&content).map_err(|e| OrganizerError::ConfigLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.fill_standard_paths();
        Ok(Some(config))
    }

    /// Takes the error hit while loading, if any.
    pub fn take_load_error(&mut self) -> Option<OrganizerError> {
        self.load_error.take()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Applies `f` to a draft of the configuration, then saves.
    ///
    /// If `f` fails the live configuration is left untouched. If saving
    /// fails the change stays in memory and the error is returned, so a
    /// later save writes it out.
    pub fn update<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut AppConfig) -> Result<T>,
    {
        let mut draft = self.config.clone();
        let value = f(&mut draft)?;
        self.config = draft;
        self.save()?;
        Ok(value)
    }

    /// Writes the configuration to disk.
    ///
    /// The JSON goes to a temporary file in the same directory first and is
    /// then renamed over the target, so a crash never leaves a torn file.
    pub fn save(&self) -> Result<()> {
        let save_error = |source: io::Error| OrganizerError::ConfigSave {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(&self.config)
            .map_err(|e| save_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(save_error)?;
        tmp.write_all(json.as_bytes()).map_err(save_error)?;
        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp.as_file().set_permissions(metadata.permissions()).map_err(save_error)?;
        }
        tmp.as_file().sync_all().map_err(save_error)?;
        tmp.persist(&self.path).map_err(|e| save_error(e.error))?;

        log::debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}
