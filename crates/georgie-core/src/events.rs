use crate::models::{Language, Theme, View};

/// Notification sent to subscribers after a store mutation took effect
#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    SidebarOpen(bool),
    CurrentView(View),
    Theme(Theme),
    Language(Language),
    Typing(bool),
    Conversations,
    MessageAdded {
        conversation_id: String,
        message_id: String,
    },
    CurrentConversation(Option<String>),
    Projects,
    CurrentProject(Option<String>),
    Categories,
    SystemPrompts,
    ActiveSystemPrompt(Option<String>),
    Settings,
}

impl StoreChange {
    /// Whether the change touches the durable subset of the state
    pub fn is_persisted(&self) -> bool {
        match self {
            Self::SidebarOpen(_)
            | Self::CurrentView(_)
            | Self::Typing(_)
            | Self::CurrentConversation(_)
            | Self::CurrentProject(_) => false,
            Self::Theme(_)
            | Self::Language(_)
            | Self::Conversations
            | Self::MessageAdded { .. }
            | Self::Projects
            | Self::Categories
            | Self::SystemPrompts
            | Self::ActiveSystemPrompt(_)
            | Self::Settings => true,
        }
    }
}
