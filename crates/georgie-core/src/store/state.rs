use serde::Serialize;

use super::snapshot::PersistedState;
use crate::constants::DEFAULT_SYSTEM_PROMPT_ID;
use crate::models::{
    default_categories, default_system_prompts, Category, Conversation, Language, Project,
    Settings, SystemPrompt, Theme, View,
};

/// Everything the front end renders from. Read it through `AppStore::state()`;
/// every change goes through an `AppStore` operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    // UI
    pub sidebar_open: bool,
    pub current_view: View,
    pub theme: Theme,
    pub language: Language,

    // Chat
    /// Newest first
    pub conversations: Vec<Conversation>,
    pub current_conversation_id: Option<String>,
    pub is_typing: bool,

    // Projects
    /// Newest first
    pub projects: Vec<Project>,
    pub current_project_id: Option<String>,

    pub categories: Vec<Category>,

    // System
    pub system_prompts: Vec<SystemPrompt>,
    pub active_system_prompt: Option<String>,

    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            current_view: View::Chat,
            theme: Theme::Dark,
            language: Language::En,
            conversations: Vec::new(),
            current_conversation_id: None,
            is_typing: false,
            projects: Vec::new(),
            current_project_id: None,
            categories: default_categories(),
            system_prompts: default_system_prompts(),
            active_system_prompt: Some(DEFAULT_SYSTEM_PROMPT_ID.to_string()),
            settings: Settings::default(),
        }
    }
}

impl AppState {
    /// Rebuild state from a stored snapshot. Ephemeral fields start at their
    /// defaults.
    pub fn from_persisted(persisted: PersistedState) -> Self {
        let mut settings = persisted.settings;
        settings.normalize();
        Self {
            conversations: persisted.conversations,
            projects: persisted.projects,
            categories: persisted.categories,
            system_prompts: persisted.system_prompts,
            active_system_prompt: persisted.active_system_prompt,
            settings,
            theme: persisted.theme,
            language: persisted.language,
            ..Self::default()
        }
    }

    /// The durable subset of this state
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            conversations: self.conversations.clone(),
            projects: self.projects.clone(),
            categories: self.categories.clone(),
            system_prompts: self.system_prompts.clone(),
            active_system_prompt: self.active_system_prompt.clone(),
            settings: self.settings.clone(),
            theme: self.theme,
            language: self.language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = AppState::default();
        assert!(state.sidebar_open);
        assert_eq!(state.current_view, View::Chat);
        assert_eq!(state.theme, Theme::Dark);
        assert!(state.conversations.is_empty());
        assert_eq!(state.categories.len(), 5);
        assert_eq!(state.system_prompts.len(), 3);
        assert_eq!(state.active_system_prompt.as_deref(), Some("default"));
    }

    #[test]
    fn test_from_persisted_resets_ephemeral_fields() {
        let mut persisted = AppState::default().to_persisted();
        persisted.theme = Theme::Light;
        persisted.language = Language::Mi;

        let state = AppState::from_persisted(persisted);
        assert_eq!(state.theme, Theme::Light);
        assert_eq!(state.language, Language::Mi);
        assert!(state.sidebar_open);
        assert_eq!(state.current_view, View::Chat);
        assert!(state.current_conversation_id.is_none());
        assert!(state.current_project_id.is_none());
        assert!(!state.is_typing);
    }

    #[test]
    fn test_from_persisted_clamps_settings() {
        let mut persisted = AppState::default().to_persisted();
        persisted.settings.max_tokens = 1_000_000;
        let state = AppState::from_persisted(persisted);
        assert_eq!(state.settings.max_tokens, 8192);
    }
}
