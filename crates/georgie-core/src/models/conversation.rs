use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::Message;
use super::view::Language;
use crate::constants::{DEFAULT_CATEGORY_ID, DERIVED_TITLE_MAX_CHARS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    /// Chronological, append-only
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub language: Language,
}

impl Conversation {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        language: Language,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            category_id: None,
            language,
        }
    }

    /// Empty conversation as created from the sidebar's "New Chat" button
    pub fn untitled(id: impl Into<String>, language: Language, now: DateTime<Utc>) -> Self {
        Self::new(id, default_title(language), language, now)
            .with_category(DEFAULT_CATEGORY_ID)
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Title given to a conversation created without any input
pub fn default_title(language: Language) -> &'static str {
    match language {
        Language::En => "New Conversation",
        Language::Mi => "Kōrerorero Hou",
    }
}

/// Title for a conversation started by sending `input`: the first 50
/// characters, with `...` appended when the input was longer.
pub fn derive_title(input: &str) -> String {
    let mut title: String = input.chars().take(DERIVED_TITLE_MAX_CHARS).collect();
    if input.chars().count() > DERIVED_TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

/// Field-level changes for `AppStore::update_conversation`.
/// `id` and `created_at` are fixed once the conversation exists, and
/// messages only change through `AppStore::add_message`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationPatch {
    pub title: Option<String>,
    /// `Some(None)` clears the category
    pub category_id: Option<Option<String>>,
    pub language: Option<Language>,
}

impl ConversationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn category_id(mut self, category_id: Option<String>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.category_id.is_none()
            && self.language.is_none()
    }

    pub(crate) fn apply(&self, conversation: &mut Conversation) {
        if let Some(title) = &self.title {
            conversation.title = title.clone();
        }
        if let Some(category_id) = &self.category_id {
            conversation.category_id = category_id.clone();
        }
        if let Some(language) = self.language {
            conversation.language = language;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_untitled_uses_language_title_and_general_category() {
        let conv = Conversation::untitled("c1", Language::Mi, now());
        assert_eq!(conv.title, "Kōrerorero Hou");
        assert_eq!(conv.category_id.as_deref(), Some("general"));
        assert_eq!(conv.created_at, conv.updated_at);
    }

    #[test]
    fn test_derive_title_short_input_kept() {
        assert_eq!(derive_title("hello"), "hello");
    }

    #[test]
    fn test_derive_title_long_input_truncated() {
        let input = "a".repeat(60);
        let title = derive_title(&input);
        assert_eq!(title, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn test_derive_title_counts_chars_not_bytes() {
        let input = "ā".repeat(50);
        assert_eq!(derive_title(&input), input);
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut conv = Conversation::new("c1", "Old", Language::En, now()).with_category("code");
        ConversationPatch::new().title("New").apply(&mut conv);
        assert_eq!(conv.title, "New");
        assert_eq!(conv.category_id.as_deref(), Some("code"));
        assert_eq!(conv.language, Language::En);
    }

    #[test]
    fn test_patch_can_clear_category() {
        let mut conv = Conversation::new("c1", "T", Language::En, now()).with_category("code");
        ConversationPatch::new().category_id(None).apply(&mut conv);
        assert!(conv.category_id.is_none());
    }

    #[test]
    fn test_missing_optional_fields_default_on_load() {
        let json = r#"{
            "id": "c1",
            "title": "Old snapshot",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert!(conv.messages.is_empty());
        assert_eq!(conv.language, Language::En);
        assert!(conv.category_id.is_none());
    }
}
