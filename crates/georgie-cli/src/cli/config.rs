use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use georgie_core::{CoreConfig, MockResponder};
use serde::{Deserialize, Serialize};

/// CLI configuration that can be loaded from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Directory holding the storage file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Latency of the mock assistant in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_delay_ms: Option<u64>,
}

impl CliConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Store location. `--data-dir` wins over the file, which wins over the
    /// platform default.
    pub fn core_config(&self, data_dir_flag: Option<&Path>) -> CoreConfig {
        match data_dir_flag.or(self.data_dir.as_deref()) {
            Some(dir) => CoreConfig::new(dir),
            None => CoreConfig::default(),
        }
    }

    pub fn responder(&self) -> MockResponder {
        match self.response_delay_ms {
            Some(ms) => MockResponder::new(Duration::from_millis(ms)),
            None => MockResponder::default(),
        }
    }
}
