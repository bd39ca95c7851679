pub mod category;
pub mod conversation;
pub mod message;
pub mod project;
pub mod settings;
pub mod system_prompt;
pub mod view;

pub use category::{default_categories, Category, CategoryPatch};
pub use conversation::{default_title, derive_title, Conversation, ConversationPatch};
pub use message::{Message, MessageMetadata, MessageType, Role};
pub use project::{FileType, Project, ProjectFile, ProjectPatch, ProjectType};
pub use settings::{Settings, SettingsPatch};
pub use system_prompt::{default_system_prompts, SystemPrompt, SystemPromptPatch};
pub use view::{Language, ParseEnumError, Theme, View};
