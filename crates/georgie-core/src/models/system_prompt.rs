use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemPrompt {
    pub id: String,
    pub name: String,
    pub prompt: String,
    #[serde(default)]
    pub category: String,
    /// Display flag only. The store's active prompt pointer decides which
    /// prompt is in effect and the two are never reconciled.
    #[serde(default)]
    pub is_active: bool,
}

impl SystemPrompt {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        prompt: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prompt: prompt.into(),
            category: category.into(),
            is_active: false,
        }
    }
}

/// Prompts present in a fresh store; `default` is the active one
pub fn default_system_prompts() -> Vec<SystemPrompt> {
    let mut default = SystemPrompt::new(
        "default",
        "Default Assistant",
        "You are GEORGIE, a helpful AI assistant that can help with coding, creative tasks, \
         academic work, and conversations in both English and Te Reo Māori.",
        "general",
    );
    default.is_active = true;

    vec![
        default,
        SystemPrompt::new(
            "code",
            "Code Assistant",
            "You are GEORGIE, an expert programming assistant. Help with coding, debugging, \
             code review, and technical explanations. Always provide clean, well-commented code.",
            "code",
        ),
        SystemPrompt::new(
            "maori",
            "Te Reo Māori Kaiako",
            "Ko koe a GEORGIE, he kaiako reo Māori. Āwhina ai i nga tangata ki te ako i te reo \
             Māori me nga tikanga Māori. You are GEORGIE, a Te Reo Māori teacher helping people \
             learn Māori language and culture.",
            "maori",
        ),
    ]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemPromptPatch {
    pub name: Option<String>,
    pub prompt: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl SystemPromptPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub(crate) fn apply(&self, prompt: &mut SystemPrompt) {
        if let Some(name) = &self.name {
            prompt.name = name.clone();
        }
        if let Some(text) = &self.prompt {
            prompt.prompt = text.clone();
        }
        if let Some(category) = &self.category {
            prompt.category = category.clone();
        }
        if let Some(is_active) = self.is_active {
            prompt.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_default_prompt_flagged_active() {
        let prompts = default_system_prompts();
        let active: Vec<_> = prompts.iter().filter(|p| p.is_active).map(|p| p.id.as_str()).collect();
        assert_eq!(active, vec!["default"]);
    }

    #[test]
    fn test_prompt_text_joined_without_line_breaks() {
        let prompts = default_system_prompts();
        assert!(!prompts[0].prompt.contains('\n'));
        assert!(prompts[0].prompt.contains("coding, creative tasks, academic work"));
    }

    #[test]
    fn test_serialized_is_active_field() {
        let prompt = SystemPrompt::new("p", "P", "text", "general");
        let json = serde_json::to_value(&prompt).unwrap();
        assert_eq!(json["isActive"], false);
    }
}
