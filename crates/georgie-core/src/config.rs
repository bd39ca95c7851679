use std::path::{Path, PathBuf};

use crate::constants::{DATA_DIR_NAME, STORAGE_NAME};

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    /// Key of the durable storage record; the file backend appends `.json`
    pub storage_name: String,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            storage_name: STORAGE_NAME.to_string(),
        }
    }

    /// Platform data directory (e.g. `~/.local/share/georgie`), falling back
    /// to a relative `georgie_data` when the platform has none.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join(DATA_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("georgie_data"))
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.storage_name))
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(Self::default_data_dir())
    }
}
