//! Durable storage record.
//!
//! The blob is `{"state": {...}, "version": N}` with camelCase fields.
//! Unknown fields are ignored and missing ones take the fresh-store
//! defaults, so snapshots from older builds keep loading.

use serde::{Deserialize, Serialize};

use super::state::AppState;
use super::storage::StorageError;
use crate::constants::STORAGE_VERSION;
use crate::models::{Category, Conversation, Language, Project, Settings, SystemPrompt, Theme};

/// The part of `AppState` that survives restarts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub conversations: Vec<Conversation>,
    pub projects: Vec<Project>,
    pub categories: Vec<Category>,
    pub system_prompts: Vec<SystemPrompt>,
    pub active_system_prompt: Option<String>,
    pub settings: Settings,
    pub theme: Theme,
    pub language: Language,
}

impl Default for PersistedState {
    fn default() -> Self {
        AppState::default().to_persisted()
    }
}

#[derive(Serialize, Deserialize)]
struct StorageEnvelope {
    #[serde(default)]
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

pub fn encode(state: &PersistedState) -> Result<String, StorageError> {
    #[derive(Serialize)]
    struct EnvelopeRef<'a> {
        state: &'a PersistedState,
        version: u32,
    }

    serde_json::to_string_pretty(&EnvelopeRef {
        state,
        version: STORAGE_VERSION,
    })
    .map_err(StorageError::Serialize)
}

pub fn decode(blob: &str) -> Result<PersistedState, StorageError> {
    let envelope: StorageEnvelope = serde_json::from_str(blob).map_err(StorageError::Parse)?;
    if envelope.version > STORAGE_VERSION {
        tracing::warn!(
            "snapshot version {} is newer than supported {}, reading known fields only",
            envelope.version,
            STORAGE_VERSION
        );
    }
    Ok(envelope.state)
}
