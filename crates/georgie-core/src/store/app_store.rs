use chrono::{DateTime, Utc};
use std::sync::mpsc::{self, Receiver, Sender};

use super::snapshot::PersistedState;
use super::state::AppState;
use super::storage::{JsonFileStorage, MemoryStorage, Storage};
use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::events::StoreChange;
use crate::models::{
    Category, CategoryPatch, Conversation, ConversationPatch, Language, Message, Project,
    ProjectPatch, Settings, SettingsPatch, SystemPrompt, SystemPromptPatch, Theme, View,
};

/// Single source of truth for conversations, projects, categories, prompts,
/// settings and UI selection.
///
/// Every operation is a synchronous state transition. Operations that touch
/// the durable subset rewrite the whole snapshot through the `Storage`
/// backend; a failed write is logged and remembered but never rolls back the
/// in-memory state. Id-targeted operations return whether the id matched and
/// are otherwise no-ops.
pub struct AppStore {
    state: AppState,
    storage: Box<dyn Storage>,
    clock: Box<dyn Clock>,
    subscribers: Vec<Sender<StoreChange>>,
    last_persist_error: Option<String>,
    /// Set when the stored snapshot could not be read; cleared once it has
    /// been moved out of the way of the next save
    load_failed: bool,
}

/// `updated_at` after a mutation: never behind `created_at` or its own
/// previous value, even if the clock steps backwards.
fn refreshed(now: DateTime<Utc>, created_at: DateTime<Utc>, previous: DateTime<Utc>) -> DateTime<Utc> {
    now.max(created_at).max(previous)
}

impl AppStore {
    /// Load the store from `storage` using the wall clock
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self::with_clock(storage, SystemClock)
    }

    pub fn with_clock(storage: impl Storage + 'static, clock: impl Clock + 'static) -> Self {
        let mut last_persist_error = None;
        let mut load_failed = false;
        let state = match storage.load() {
            Ok(Some(persisted)) => {
                tracing::info!(
                    "store: loaded {} conversations, {} projects",
                    persisted.conversations.len(),
                    persisted.projects.len()
                );
                AppState::from_persisted(persisted)
            }
            Ok(None) => {
                tracing::info!("store: no snapshot found, starting fresh");
                AppState::default()
            }
            Err(e) => {
                tracing::warn!("store: failed to load snapshot, starting fresh: {}", e);
                last_persist_error = Some(e.to_string());
                load_failed = true;
                AppState::default()
            }
        };

        Self {
            state,
            storage: Box::new(storage),
            clock: Box::new(clock),
            subscribers: Vec::new(),
            last_persist_error,
            load_failed,
        }
    }

    /// Store backed by the JSON file described by `config`
    pub fn open(config: &CoreConfig) -> Self {
        Self::new(JsonFileStorage::from_config(config))
    }

    /// Store that keeps its snapshot in memory only
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    // ===== Reading =====

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Receive a `StoreChange` after every effective mutation. Dropping the
    /// receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<StoreChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Current time according to the store's clock, for stamping new records
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Error from the most recent failed load or save, cleared by the next
    /// successful save
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub fn persisted_state(&self) -> PersistedState {
        self.state.to_persisted()
    }

    /// First conversation with this id. Duplicate ids shadow later entries.
    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.state.conversations.iter().find(|c| c.id == id)
    }

    pub fn current_conversation(&self) -> Option<&Conversation> {
        self.state
            .current_conversation_id
            .as_deref()
            .and_then(|id| self.conversation(id))
    }

    pub fn conversations_in_category(&self, category_id: &str) -> Vec<&Conversation> {
        self.state
            .conversations
            .iter()
            .filter(|c| c.category_id.as_deref() == Some(category_id))
            .collect()
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.state.projects.iter().find(|p| p.id == id)
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.state
            .current_project_id
            .as_deref()
            .and_then(|id| self.project(id))
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.state.categories.iter().find(|c| c.id == id)
    }

    pub fn system_prompt(&self, id: &str) -> Option<&SystemPrompt> {
        self.state.system_prompts.iter().find(|p| p.id == id)
    }

    /// The prompt the active pointer refers to (not the `is_active` flags)
    pub fn active_system_prompt(&self) -> Option<&SystemPrompt> {
        self.state
            .active_system_prompt
            .as_deref()
            .and_then(|id| self.system_prompt(id))
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    // ===== UI =====

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.state.sidebar_open = open;
        self.commit(StoreChange::SidebarOpen(open));
    }

    pub fn set_current_view(&mut self, view: View) {
        self.state.current_view = view;
        self.commit(StoreChange::CurrentView(view));
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
        self.commit(StoreChange::Theme(theme));
    }

    pub fn set_language(&mut self, language: Language) {
        self.state.language = language;
        self.commit(StoreChange::Language(language));
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.state.is_typing = typing;
        self.commit(StoreChange::Typing(typing));
    }

    // ===== Conversations =====

    /// Insert at the front (newest first) and make it the current conversation.
    /// Ids are not checked for uniqueness.
    pub fn add_conversation(&mut self, conversation: Conversation) {
        let id = conversation.id.clone();
        tracing::debug!("store: add_conversation {}", id);
        self.state.conversations.insert(0, conversation);
        self.state.current_conversation_id = Some(id.clone());
        self.commit(StoreChange::Conversations);
        self.notify(StoreChange::CurrentConversation(Some(id)));
    }

    pub fn update_conversation(&mut self, id: &str, patch: ConversationPatch) -> bool {
        let now = self.clock.now();
        let mut found = false;
        for conversation in self.state.conversations.iter_mut().filter(|c| c.id == id) {
            patch.apply(conversation);
            conversation.updated_at =
                refreshed(now, conversation.created_at, conversation.updated_at);
            found = true;
        }
        if !found {
            tracing::debug!("store: update_conversation {} not found", id);
            return false;
        }
        self.commit(StoreChange::Conversations);
        true
    }

    /// Remove the conversation; clears the current selection if it pointed here
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let before = self.state.conversations.len();
        self.state.conversations.retain(|c| c.id != id);
        if self.state.conversations.len() == before {
            tracing::debug!("store: delete_conversation {} not found", id);
            return false;
        }
        tracing::debug!("store: deleted conversation {}", id);
        self.commit(StoreChange::Conversations);
        if self.state.current_conversation_id.as_deref() == Some(id) {
            self.state.current_conversation_id = None;
            self.notify(StoreChange::CurrentConversation(None));
        }
        true
    }

    /// Point the selection at `id` without checking that it exists
    pub fn set_current_conversation(&mut self, id: Option<&str>) {
        let id = id.map(str::to_string);
        self.state.current_conversation_id = id.clone();
        self.commit(StoreChange::CurrentConversation(id));
    }

    /// Append to the conversation's messages and refresh its `updated_at`
    pub fn add_message(&mut self, conversation_id: &str, message: Message) -> bool {
        let now = self.clock.now();
        let message_id = message.id.clone();
        let mut found = false;
        for conversation in self
            .state
            .conversations
            .iter_mut()
            .filter(|c| c.id == conversation_id)
        {
            conversation.messages.push(message.clone());
            conversation.updated_at =
                refreshed(now, conversation.created_at, conversation.updated_at);
            found = true;
        }
        if !found {
            tracing::debug!("store: add_message to unknown conversation {}", conversation_id);
            return false;
        }
        self.commit(StoreChange::MessageAdded {
            conversation_id: conversation_id.to_string(),
            message_id,
        });
        true
    }

    // ===== Projects =====

    pub fn add_project(&mut self, project: Project) {
        let id = project.id.clone();
        tracing::debug!("store: add_project {}", id);
        self.state.projects.insert(0, project);
        self.state.current_project_id = Some(id.clone());
        self.commit(StoreChange::Projects);
        self.notify(StoreChange::CurrentProject(Some(id)));
    }

    pub fn update_project(&mut self, id: &str, patch: ProjectPatch) -> bool {
        let now = self.clock.now();
        let mut found = false;
        for project in self.state.projects.iter_mut().filter(|p| p.id == id) {
            patch.apply(project);
            project.updated_at = refreshed(now, project.created_at, project.updated_at);
            found = true;
        }
        if !found {
            tracing::debug!("store: update_project {} not found", id);
            return false;
        }
        self.commit(StoreChange::Projects);
        true
    }

    pub fn delete_project(&mut self, id: &str) -> bool {
        let before = self.state.projects.len();
        self.state.projects.retain(|p| p.id != id);
        if self.state.projects.len() == before {
            tracing::debug!("store: delete_project {} not found", id);
            return false;
        }
        self.commit(StoreChange::Projects);
        if self.state.current_project_id.as_deref() == Some(id) {
            self.state.current_project_id = None;
            self.notify(StoreChange::CurrentProject(None));
        }
        true
    }

    pub fn set_current_project(&mut self, id: Option<&str>) {
        let id = id.map(str::to_string);
        self.state.current_project_id = id.clone();
        self.commit(StoreChange::CurrentProject(id));
    }

    // ===== Categories =====

    pub fn add_category(&mut self, category: Category) {
        self.state.categories.push(category);
        self.commit(StoreChange::Categories);
    }

    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> bool {
        let mut found = false;
        for category in self.state.categories.iter_mut().filter(|c| c.id == id) {
            patch.apply(category);
            found = true;
        }
        if found {
            self.commit(StoreChange::Categories);
        }
        found
    }

    /// Member conversations keep their (now dangling) `category_id`
    pub fn delete_category(&mut self, id: &str) -> bool {
        let before = self.state.categories.len();
        self.state.categories.retain(|c| c.id != id);
        let found = self.state.categories.len() != before;
        if found {
            self.commit(StoreChange::Categories);
        }
        found
    }

    // ===== System prompts =====

    pub fn add_system_prompt(&mut self, prompt: SystemPrompt) {
        self.state.system_prompts.push(prompt);
        self.commit(StoreChange::SystemPrompts);
    }

    pub fn update_system_prompt(&mut self, id: &str, patch: SystemPromptPatch) -> bool {
        let mut found = false;
        for prompt in self.state.system_prompts.iter_mut().filter(|p| p.id == id) {
            patch.apply(prompt);
            found = true;
        }
        if found {
            self.commit(StoreChange::SystemPrompts);
        }
        found
    }

    /// Remove the prompt. The active pointer is left as is, even when it
    /// referred to this prompt; `active_system_prompt()` then yields `None`.
    pub fn delete_system_prompt(&mut self, id: &str) -> bool {
        let before = self.state.system_prompts.len();
        self.state.system_prompts.retain(|p| p.id != id);
        if self.state.system_prompts.len() == before {
            return false;
        }
        self.commit(StoreChange::SystemPrompts);
        true
    }

    /// Point the active prompt at `id` without checking that it exists.
    /// `is_active` flags on the prompts are left alone.
    pub fn set_active_system_prompt(&mut self, id: Option<&str>) {
        let id = id.map(str::to_string);
        self.state.active_system_prompt = id.clone();
        self.commit(StoreChange::ActiveSystemPrompt(id));
    }

    // ===== Settings =====

    /// Merge `patch` into the settings; `max_tokens` and `temperature` are
    /// clamped to their bounds
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        patch.apply(&mut self.state.settings);
        self.commit(StoreChange::Settings);
    }

    // ===== Internals =====

    fn commit(&mut self, change: StoreChange) {
        if change.is_persisted() {
            self.persist();
        }
        self.notify(change);
    }

    fn persist(&mut self) {
        if self.load_failed {
            match self.storage.preserve_unreadable(self.clock.now()) {
                Ok(Some(kept)) => {
                    tracing::warn!("store: unreadable snapshot kept at {}", kept.display());
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("store: cannot move unreadable snapshot aside, not saving: {}", e);
                    self.last_persist_error = Some(e.to_string());
                    return;
                }
            }
            self.load_failed = false;
        }

        let snapshot = self.state.to_persisted();
        match self.storage.save(&snapshot) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                tracing::warn!("store: failed to persist state: {}", e);
                self.last_persist_error = Some(e.to_string());
            }
        }
    }

    fn notify(&mut self, change: StoreChange) {
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}
