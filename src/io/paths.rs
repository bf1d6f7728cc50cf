use crate::{CatalogError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration directory
pub const PROJECT_DIR_NAME: &str = ".catalog";

/// Configuration file name inside a configuration directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Data file used when neither the command line nor a config names one
pub const DEFAULT_DATA_FILE: &str = "catalog.csv";

/// Path management for catalog configuration files
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    /// Configuration directory (.catalog/ or the platform config dir)
    pub config_dir: PathBuf,
}

impl CatalogPaths {
    /// Create new paths instance using the platform's standard directories
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "catalog").ok_or_else(|| {
            CatalogError::Config("Failed to determine project directories".to_string())
        })?;

        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
        })
    }

    /// Create paths for a specific project directory
    pub fn for_project(project_root: &Path) -> Self {
        Self {
            config_dir: project_root.join(PROJECT_DIR_NAME),
        }
    }

    /// Configuration file inside this config directory
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// First existing config file: the project one, then the one in
    /// `user_config_dir`
    pub fn discover_config(project_root: &Path, user_config_dir: Option<&Path>) -> Option<PathBuf> {
        let project = Self::for_project(project_root).config_file();
        if project.is_file() {
            return Some(project);
        }

        user_config_dir
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file())
    }
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
