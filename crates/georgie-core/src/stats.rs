use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Role;
use crate::store::AppState;

/// Usage totals for the admin surface, computed from the live state
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub conversations: usize,
    pub messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub system_messages: usize,
    pub projects: usize,
    pub project_files: usize,
    /// Category id -> conversation count. Uncategorized conversations are
    /// counted under the empty string.
    pub conversations_by_category: BTreeMap<String, usize>,
}

impl UsageStats {
    pub fn collect(state: &AppState) -> Self {
        let mut stats = Self {
            conversations: state.conversations.len(),
            projects: state.projects.len(),
            project_files: state.projects.iter().map(|p| p.files.len()).sum(),
            ..Self::default()
        };

        for conversation in &state.conversations {
            let category = conversation.category_id.clone().unwrap_or_default();
            *stats.conversations_by_category.entry(category).or_insert(0) += 1;

            for message in &conversation.messages {
                stats.messages += 1;
                match message.role {
                    Role::User => stats.user_messages += 1,
                    Role::Assistant => stats.assistant_messages += 1,
                    Role::System => stats.system_messages += 1,
                }
            }
        }

        stats
    }

    /// Categories sorted by conversation count (descending)
    pub fn categories_by_count(&self) -> Vec<(&str, usize)> {
        let mut categories: Vec<_> = self
            .conversations_by_category
            .iter()
            .map(|(id, &count)| (id.as_str(), count))
            .collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1));
        categories
    }
}
