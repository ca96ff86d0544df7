use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use analyzer_core::DEFAULT_USER_NAME;
use analyzer_engine::{EngineConfig, ServiceSettings, DEFAULT_BASE_URL};
use analyzer_logging::analyzer_info;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::cli::Cli;

/// User-editable settings, read from a RON file. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub base_url: String,
    pub user_name: String,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub progress_interval_ms: u64,
    pub max_report_bytes: u64,
    pub output_dir: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_name: DEFAULT_USER_NAME.to_string(),
            connect_timeout_ms: None,
            request_timeout_ms: None,
            progress_interval_ms: 1500,
            max_report_bytes: 20 * 1024 * 1024,
            output_dir: None,
        }
    }
}

impl AppSettings {
    /// Reads the settings file when one is given; defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings = Self::parse(&content)
            .with_context(|| format!("failed to parse settings in {}", path.display()))?;
        analyzer_info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Command-line flags win over file values.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(user_name) = &cli.user_name {
            self.user_name = user_name.clone();
        }
        if let Some(output_dir) = &cli.output_dir {
            self.output_dir = Some(output_dir.clone());
        }
        self
    }

    pub fn engine_config(&self) -> Result<EngineConfig> {
        let base_url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base URL {:?}", self.base_url))?;
        let output_dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        let mut config = EngineConfig::default_with_output(output_dir);
        config.service = ServiceSettings {
            base_url,
            connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            max_report_bytes: self.max_report_bytes,
        };
        config.progress_interval = Duration::from_millis(self.progress_interval_ms.max(1));
        Ok(config)
    }
}
