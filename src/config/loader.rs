use super::types::CatalogConfig;
use crate::io::paths::{resolve_against, CatalogPaths, PROJECT_DIR_NAME};
use crate::{CatalogError, Result};
use std::path::{Path, PathBuf};

/// Configuration after discovery, with the data file path made concrete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub config: CatalogConfig,
    /// Config file the settings came from, if any
    pub source: Option<PathBuf>,
    /// Absolute or cwd-relative path of the durable file
    pub data_file: PathBuf,
}

/// Loader for catalog configuration files
pub struct ConfigLoader {
    /// Directory used for discovery and for resolving relative paths
    project_root: PathBuf,
    /// User-wide config directory searched after the project one
    user_config_dir: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create new loader rooted at `project_root`, falling back to the
    /// platform config directory
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            user_config_dir: CatalogPaths::new().ok().map(|paths| paths.config_dir),
        }
    }

    /// Replace the user-wide config directory (`None` disables it)
    pub fn with_user_config_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.user_config_dir = dir;
        self
    }

    /// Create new loader rooted at the current working directory
    pub fn from_current_dir() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            CatalogError::Config(format!("Failed to get current directory: {}", e))
        })?;
        Ok(Self::new(current_dir))
    }

    /// Load a config file from an explicit path
    pub fn load_file(&self, path: &Path) -> Result<CatalogConfig> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: CatalogConfig = serde_yaml_ng::from_str(&contents).inspect_err(|e| {
            tracing::error!("Failed to parse config file {}: {}", path.display(), e)
        })?;

        // Surface a bad column list now rather than at first save
        config.schema()?;
        Ok(config)
    }

    /// Resolve settings from an explicit config, a discovered config, or the
    /// defaults, then apply a data file override
    pub fn resolve(
        &self,
        explicit: Option<&Path>,
        data_file_override: Option<&Path>,
    ) -> Result<ResolvedConfig> {
        let source = match explicit {
            Some(path) => Some(resolve_against(&self.project_root, path)),
            None => CatalogPaths::discover_config(&self.project_root, self.user_config_dir.as_deref()),
        };

        let config = match &source {
            Some(path) => {
                tracing::debug!("Using config file {}", path.display());
                self.load_file(path)?
            }
            None => CatalogConfig::default(),
        };

        let data_file = match data_file_override {
            Some(path) => resolve_against(&self.project_root, path),
            None => {
                let base = source
                    .as_deref()
                    .map(|path| self.config_base_dir(path))
                    .unwrap_or_else(|| self.project_root.clone());
                resolve_against(&base, &config.data_file)
            }
        };

        Ok(ResolvedConfig {
            config,
            source,
            data_file,
        })
    }

    /// Directory relative data paths resolve against: the project root for a
    /// config inside `.catalog/`, otherwise the config file's own directory
    fn config_base_dir(&self, config_path: &Path) -> PathBuf {
        let dir = config_path.parent().unwrap_or(Path::new("."));
        if dir.file_name().is_some_and(|name| name == PROJECT_DIR_NAME) {
            dir.parent().unwrap_or(dir).to_path_buf()
        } else {
            dir.to_path_buf()
        }
    }
}
