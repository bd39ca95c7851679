use serde::{Deserialize, Serialize};

/// Display grouping for conversations. `icon` is a symbolic icon name and
/// `color` a display value, both interpreted by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub conversations: Vec<String>,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            conversations: Vec::new(),
        }
    }
}

/// Categories present in a fresh store
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("general", "General", "MessageCircle", "#8b5cf6"),
        Category::new("code", "Code", "Code", "#10b981"),
        Category::new("creative", "Creative", "Palette", "#f59e0b"),
        Category::new("academic", "Academic", "GraduationCap", "#3b82f6"),
        Category::new("maori", "Te Reo Māori", "Globe", "#ef4444"),
    ]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub conversations: Option<Vec<String>>,
}

impl CategoryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn conversations(mut self, conversations: Vec<String>) -> Self {
        self.conversations = Some(conversations);
        self
    }

    pub(crate) fn apply(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(icon) = &self.icon {
            category.icon = icon.clone();
        }
        if let Some(color) = &self.color {
            category.color = color.clone();
        }
        if let Some(conversations) = &self.conversations {
            category.conversations = conversations.clone();
        }
    }
}
