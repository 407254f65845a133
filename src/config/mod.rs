use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::parse::{MessageParser, Patterns, RelevanceFilter, DEFAULT_KEYWORDS};

pub(crate) const CONFIG_FILE: &str = "config.toml";
pub(crate) const DEFAULT_STORE_FILE: &str = "mpesa_transactions.csv";

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DeviceSection {
    pub(crate) program: String,
    pub(crate) serial: Option<String>,
    pub(crate) interval_secs: u64,
}

impl Default for DeviceSection {
    fn default() -> Self {
        Self {
            program: "adb".into(),
            serial: None,
            interval_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileSection {
    pub(crate) interval_secs: u64,
}

impl Default for FileSection {
    fn default() -> Self {
        Self { interval_secs: 5 }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Ledger file. Falls back to the per-user data directory.
    pub(crate) output: Option<PathBuf>,
    pub(crate) keywords: Vec<String>,
    pub(crate) patterns: Patterns,
    pub(crate) device: DeviceSection,
    pub(crate) file: FileSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: None,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            patterns: Patterns::default(),
            device: DeviceSection::default(),
            file: FileSection::default(),
        }
    }
}

impl Config {
    /// Load `explicit` if given (it must exist), otherwise the per-user
    /// config file if there is one, otherwise built-in defaults.
    pub(crate) fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match project_dirs() {
            Some(dirs) => {
                let path = dirs.config_dir().join(CONFIG_FILE);
                if path.is_file() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub(crate) fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.device.interval_secs == 0 || self.file.interval_secs == 0 {
            anyhow::bail!("interval_secs must be at least 1");
        }
        if self.device.program.trim().is_empty() {
            anyhow::bail!("device.program must not be empty");
        }
        Ok(())
    }

    pub(crate) fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.output {
            return Ok(path.clone());
        }
        let dirs = project_dirs()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join(DEFAULT_STORE_FILE))
    }

    pub(crate) fn parser(&self) -> Result<MessageParser> {
        MessageParser::new(&self.patterns).context("Invalid [patterns] in config")
    }

    pub(crate) fn relevance_filter(&self) -> RelevanceFilter {
        let filter = RelevanceFilter::new(&self.keywords);
        if filter.is_empty() {
            log::warn!("No relevance keywords configured, every message will be ignored");
        }
        filter
    }

    pub(crate) fn device_interval(&self) -> Duration {
        Duration::from_secs(self.device.interval_secs)
    }

    pub(crate) fn file_interval(&self) -> Duration {
        Duration::from_secs(self.file.interval_secs)
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "mpesa-logger", "MpesaLogger")
}
