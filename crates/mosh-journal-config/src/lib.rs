use mosh_journal_engine::{FragmentRenderer, LinkStyle, Strings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How navigation exits link to other documents.
    pub exit_links: LinkStyle,
    /// Strip scripts and event handlers from block content.
    pub sanitize_content: bool,
    /// How often the editor-menu button check runs.
    pub maintenance_interval_ms: u64,
    /// A TOML file of translated strings, keyed like `[strings]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strings_path: Option<PathBuf>,
    /// Overrides for individual strings. These win over `strings_path`.
    pub strings: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exit_links: LinkStyle::Anchor,
            sanitize_content: true,
            maintenance_interval_ms: 2000,
            strings_path: None,
            strings: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let mut config: Config = read_toml(config_path)?;

        // Expand shell variables and tilde in the strings path
        config.strings_path = config
            .strings_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/mosh-journal");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn maintenance_interval(&self) -> Duration {
        Duration::from_millis(self.maintenance_interval_ms)
    }

    /// English defaults, then `strings_path`, then `[strings]`.
    pub fn load_strings(&self) -> Result<Strings, ConfigError> {
        let mut overrides: BTreeMap<String, String> = match &self.strings_path {
            Some(path) if path.exists() => read_toml(path)?,
            _ => BTreeMap::new(),
        };
        overrides.extend(self.strings.clone());
        Ok(Strings::with_overrides(overrides))
    }

    /// A renderer set up from this config.
    pub fn renderer(&self) -> Result<FragmentRenderer, ConfigError> {
        Ok(FragmentRenderer {
            strings: self.load_strings()?,
            link_style: self.exit_links,
            sanitize: self.sanitize_content,
        })
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigReadError {
        config_path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
        config_path: path.to_path_buf(),
        source,
    })
}
