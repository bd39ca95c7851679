use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use georgie_core::constants::{AVAILABLE_MODELS, DEFAULT_CATEGORY_ID};
use georgie_core::ids::{new_id, slug_from_name};
use georgie_core::models::{
    Category, Conversation, ConversationPatch, Language, Project, ProjectType, SettingsPatch,
    SystemPrompt, Theme,
};
use georgie_core::store::{write_backup, write_project};
use georgie_core::{send_message, AppStore, MockResponder, UsageStats};
use serde_json::json;

/// CLI command parsed from arguments
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// List conversations, optionally only those in one category
    ListConversations { category: Option<String> },
    /// Show one conversation with its messages
    ShowConversation { id: String },
    /// Create an empty conversation
    CreateConversation {
        title: Option<String>,
        category: Option<String>,
    },
    RenameConversation { id: String, title: String },
    DeleteConversation { id: String },
    /// Send a chat message; starts a new conversation when no id is given
    Chat {
        conversation_id: Option<String>,
        content: String,
    },
    ListProjects,
    CreateProject {
        name: String,
        description: String,
        project_type: ProjectType,
        tags: Vec<String>,
    },
    DeleteProject { id: String },
    ExportProject { id: String, dir: PathBuf },
    ListCategories,
    AddCategory {
        name: String,
        icon: String,
        color: String,
    },
    DeleteCategory { id: String },
    ListPrompts,
    AddPrompt {
        name: String,
        prompt: String,
        category: String,
    },
    ActivatePrompt { id: String },
    DeletePrompt { id: String },
    ShowSettings,
    UpdateSettings(SettingsPatch),
    SetTheme(Theme),
    SetLanguage(Language),
    ExportBackup { dir: PathBuf },
    Stats,
    /// Full state dump
    GetState,
}

fn conversation_summary(conversation: &Conversation) -> serde_json::Value {
    json!({
        "id": conversation.id,
        "title": conversation.title,
        "categoryId": conversation.category_id,
        "language": conversation.language,
        "messages": conversation.messages.len(),
        "lastMessage": conversation.last_message().map(|m| m.preview()),
        "updatedAt": conversation.updated_at,
    })
}

fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{} must not be empty", field);
    }
    Ok(())
}

/// Run one command against the store and return its JSON result
pub async fn handle_command(
    store: &mut AppStore,
    responder: &MockResponder,
    command: CliCommand,
) -> Result<serde_json::Value> {
    tracing::debug!("cli: {:?}", command);

    match command {
        CliCommand::ListConversations { category } => {
            let conversations: Vec<_> = match category {
                Some(category) => store
                    .conversations_in_category(&category)
                    .into_iter()
                    .map(conversation_summary)
                    .collect(),
                None => store
                    .state()
                    .conversations
                    .iter()
                    .map(conversation_summary)
                    .collect(),
            };
            Ok(json!(conversations))
        }

        CliCommand::ShowConversation { id } => {
            let conversation = store
                .conversation(&id)
                .with_context(|| format!("Conversation not found: {}", id))?;
            Ok(serde_json::to_value(conversation)?)
        }

        CliCommand::CreateConversation { title, category } => {
            let language = store.state().language;
            let mut conversation = Conversation::untitled(new_id("conv"), language, store.now());
            if let Some(title) = title {
                require_text(&title, "Title")?;
                conversation.title = title;
            }
            conversation.category_id =
                Some(category.unwrap_or_else(|| DEFAULT_CATEGORY_ID.to_string()));
            let id = conversation.id.clone();
            store.add_conversation(conversation);
            Ok(json!({ "id": id }))
        }

        CliCommand::RenameConversation { id, title } => {
            require_text(&title, "Title")?;
            if !store.update_conversation(&id, ConversationPatch::new().title(title)) {
                bail!("Conversation not found: {}", id);
            }
            Ok(json!({ "id": id }))
        }

        CliCommand::DeleteConversation { id } => {
            if !store.delete_conversation(&id) {
                bail!("Conversation not found: {}", id);
            }
            Ok(json!({ "deleted": id }))
        }

        CliCommand::Chat {
            conversation_id,
            content,
        } => {
            if let Some(id) = conversation_id.as_deref() {
                if store.conversation(id).is_none() {
                    bail!("Conversation not found: {}", id);
                }
                store.set_current_conversation(Some(id));
            }
            let exchange = send_message(store, responder, &content).await?;
            let reply = store
                .conversation(&exchange.conversation_id)
                .and_then(|c| c.last_message())
                .map(|m| m.content.clone());
            Ok(json!({
                "conversationId": exchange.conversation_id,
                "createdConversation": exchange.created_conversation,
                "userMessageId": exchange.user_message_id,
                "assistantMessageId": exchange.assistant_message_id,
                "reply": reply,
            }))
        }

        CliCommand::ListProjects => {
            let projects: Vec<_> = store
                .state()
                .projects
                .iter()
                .map(|p| {
                    json!({
                        "id": p.id,
                        "name": p.name,
                        "type": p.project_type,
                        "files": p.files.len(),
                        "tags": p.tags,
                        "updatedAt": p.updated_at,
                    })
                })
                .collect();
            Ok(json!(projects))
        }

        CliCommand::CreateProject {
            name,
            description,
            project_type,
            tags,
        } => {
            require_text(&name, "Project name")?;
            let project = Project::new(new_id("proj"), name.trim(), project_type, store.now())
                .with_description(description)
                .with_tags(tags);
            let id = project.id.clone();
            store.add_project(project);
            Ok(json!({ "id": id }))
        }

        CliCommand::DeleteProject { id } => {
            if !store.delete_project(&id) {
                bail!("Project not found: {}", id);
            }
            Ok(json!({ "deleted": id }))
        }

        CliCommand::ExportProject { id, dir } => {
            let path = write_project(store, &id, &dir)
                .with_context(|| format!("Failed to export project {}", id))?;
            Ok(json!({ "path": path.display().to_string() }))
        }

        CliCommand::ListCategories => Ok(serde_json::to_value(&store.state().categories)?),

        CliCommand::AddCategory { name, icon, color } => {
            let id = slug_from_name(&name)
                .with_context(|| format!("Cannot derive a category id from {:?}", name))?;
            if store.category(&id).is_some() {
                bail!("Category already exists: {}", id);
            }
            store.add_category(Category::new(id.clone(), name.trim(), icon, color));
            Ok(json!({ "id": id }))
        }

        CliCommand::DeleteCategory { id } => {
            if !store.delete_category(&id) {
                bail!("Category not found: {}", id);
            }
            Ok(json!({ "deleted": id }))
        }

        CliCommand::ListPrompts => {
            let active = store.state().active_system_prompt.clone();
            let prompts: Vec<_> = store
                .state()
                .system_prompts
                .iter()
                .map(|p| {
                    json!({
                        "id": p.id,
                        "name": p.name,
                        "category": p.category,
                        "active": active.as_deref() == Some(p.id.as_str()),
                        "prompt": p.prompt,
                    })
                })
                .collect();
            Ok(json!(prompts))
        }

        CliCommand::AddPrompt {
            name,
            prompt,
            category,
        } => {
            require_text(&name, "Prompt name")?;
            require_text(&prompt, "Prompt text")?;
            let id = slug_from_name(&name).unwrap_or_else(|| new_id("prompt"));
            if store.system_prompt(&id).is_some() {
                bail!("System prompt already exists: {}", id);
            }
            store.add_system_prompt(SystemPrompt::new(id.clone(), name.trim(), prompt, category));
            Ok(json!({ "id": id }))
        }

        CliCommand::ActivatePrompt { id } => {
            if store.system_prompt(&id).is_none() {
                bail!("System prompt not found: {}", id);
            }
            store.set_active_system_prompt(Some(&id));
            Ok(json!({ "active": id }))
        }

        CliCommand::DeletePrompt { id } => {
            if !store.delete_system_prompt(&id) {
                bail!("System prompt not found: {}", id);
            }
            Ok(json!({
                "deleted": id,
                "active": store.state().active_system_prompt,
            }))
        }

        CliCommand::ShowSettings => Ok(serde_json::to_value(store.settings())?),

        CliCommand::UpdateSettings(patch) => {
            if patch.is_empty() {
                bail!("No settings given");
            }
            if let Some(model) = patch.model.as_deref() {
                if !AVAILABLE_MODELS.contains(&model) {
                    bail!(
                        "Unknown model {:?} (expected one of: {})",
                        model,
                        AVAILABLE_MODELS.join(", ")
                    );
                }
            }
            store.update_settings(patch);
            Ok(serde_json::to_value(store.settings())?)
        }

        CliCommand::SetTheme(theme) => {
            store.set_theme(theme);
            Ok(json!({ "theme": theme }))
        }

        CliCommand::SetLanguage(language) => {
            store.set_language(language);
            Ok(json!({ "language": language }))
        }

        CliCommand::ExportBackup { dir } => {
            let path = write_backup(store, &dir).context("Failed to export backup")?;
            Ok(json!({ "path": path.display().to_string() }))
        }

        CliCommand::Stats => {
            let stats = UsageStats::collect(store.state());
            let top_categories: Vec<_> = stats
                .categories_by_count()
                .into_iter()
                .map(|(id, count)| json!({ "categoryId": id, "conversations": count }))
                .collect();
            let mut value = serde_json::to_value(&stats)?;
            value["topCategories"] = json!(top_categories);
            Ok(value)
        }

        CliCommand::GetState => Ok(serde_json::to_value(store.state())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn make_test_store() -> (AppStore, MockResponder) {
        (AppStore::in_memory(), MockResponder::new(Duration::ZERO))
    }

    async fn run(store: &mut AppStore, responder: &MockResponder, command: CliCommand) -> serde_json::Value {
        handle_command(store, responder, command).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_conversations() {
        let (mut store, responder) = make_test_store();
        let created = run(
            &mut store,
            &responder,
            CliCommand::CreateConversation {
                title: None,
                category: None,
            },
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let list = run(
            &mut store,
            &responder,
            CliCommand::ListConversations { category: Some("general".to_string()) },
        )
        .await;
        assert_eq!(list[0]["id"], id.as_str());
        assert_eq!(list[0]["title"], "New Conversation");
        assert_eq!(list[0]["messages"], 0);
    }

    #[tokio::test]
    async fn test_create_conversation_in_maori() {
        let (mut store, responder) = make_test_store();
        run(&mut store, &responder, CliCommand::SetLanguage(Language::Mi)).await;
        run(
            &mut store,
            &responder,
            CliCommand::CreateConversation {
                title: None,
                category: Some("maori".to_string()),
            },
        )
        .await;
        let conversation = &store.state().conversations[0];
        assert_eq!(conversation.title, "Kōrerorero Hou");
        assert_eq!(conversation.category_id.as_deref(), Some("maori"));
    }

    #[tokio::test]
    async fn test_rename_and_delete_unknown_conversation_fail() {
        let (mut store, responder) = make_test_store();
        let err = handle_command(
            &mut store,
            &responder,
            CliCommand::RenameConversation {
                id: "nope".to_string(),
                title: "x".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Conversation not found: nope");

        assert!(handle_command(
            &mut store,
            &responder,
            CliCommand::DeleteConversation { id: "nope".to_string() },
        )
        .await
        .is_err());
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let (mut store, responder) = make_test_store();
        let first = run(
            &mut store,
            &responder,
            CliCommand::Chat {
                conversation_id: None,
                content: "write some code".to_string(),
            },
        )
        .await;
        assert_eq!(first["createdConversation"], true);
        assert!(first["reply"].as_str().unwrap().starts_with("I can help you with coding!"));

        let conversation_id = first["conversationId"].as_str().unwrap().to_string();
        let second = run(
            &mut store,
            &responder,
            CliCommand::Chat {
                conversation_id: Some(conversation_id.clone()),
                content: "thanks".to_string(),
            },
        )
        .await;
        assert_eq!(second["createdConversation"], false);

        let shown = run(
            &mut store,
            &responder,
            CliCommand::ShowConversation { id: conversation_id },
        )
        .await;
        assert_eq!(shown["title"], "write some code");
        assert_eq!(shown["messages"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_chat_empty_input_rejected() {
        let (mut store, responder) = make_test_store();
        let err = handle_command(
            &mut store,
            &responder,
            CliCommand::Chat {
                conversation_id: None,
                content: "  ".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Message is empty");
    }

    #[tokio::test]
    async fn test_project_create_export_delete() {
        let (mut store, responder) = make_test_store();
        let dir = tempdir().unwrap();

        let created = run(
            &mut store,
            &responder,
            CliCommand::CreateProject {
                name: "Waiata Collection".to_string(),
                description: "songs".to_string(),
                project_type: ProjectType::Lyrics,
                tags: vec!["music".to_string()],
            },
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let exported = run(
            &mut store,
            &responder,
            CliCommand::ExportProject {
                id: id.clone(),
                dir: dir.path().to_path_buf(),
            },
        )
        .await;
        assert!(exported["path"].as_str().unwrap().ends_with("waiata-collection.json"));

        let list = run(&mut store, &responder, CliCommand::ListProjects).await;
        assert_eq!(list[0]["type"], "lyrics");

        run(&mut store, &responder, CliCommand::DeleteProject { id: id.clone() }).await;
        assert!(store.state().projects.is_empty());
        assert!(handle_command(&mut store, &responder, CliCommand::DeleteProject { id })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_create_project_requires_name() {
        let (mut store, responder) = make_test_store();
        let err = handle_command(
            &mut store,
            &responder,
            CliCommand::CreateProject {
                name: " ".to_string(),
                description: String::new(),
                project_type: ProjectType::General,
                tags: Vec::new(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Project name must not be empty");
    }

    #[tokio::test]
    async fn test_add_category_derives_id() {
        let (mut store, responder) = make_test_store();
        let added = run(
            &mut store,
            &responder,
            CliCommand::AddCategory {
                name: "Music Notes".to_string(),
                icon: "Music".to_string(),
                color: "#ec4899".to_string(),
            },
        )
        .await;
        assert_eq!(added["id"], "music-notes");
        assert_eq!(store.category("music-notes").unwrap().name, "Music Notes");

        let duplicate = handle_command(
            &mut store,
            &responder,
            CliCommand::AddCategory {
                name: "music notes".to_string(),
                icon: String::new(),
                color: String::new(),
            },
        )
        .await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn test_prompt_activate_and_delete() {
        let (mut store, responder) = make_test_store();
        run(
            &mut store,
            &responder,
            CliCommand::AddPrompt {
                name: "Poet".to_string(),
                prompt: "Answer in verse".to_string(),
                category: "creative".to_string(),
            },
        )
        .await;
        run(&mut store, &responder, CliCommand::ActivatePrompt { id: "poet".to_string() }).await;

        let prompts = run(&mut store, &responder, CliCommand::ListPrompts).await;
        let poet = prompts
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["id"] == "poet")
            .unwrap();
        assert_eq!(poet["active"], true);

        let deleted = run(&mut store, &responder, CliCommand::DeletePrompt { id: "poet".to_string() }).await;
        assert_eq!(deleted["active"], "poet");
        assert!(store.active_system_prompt().is_none());
    }

    #[tokio::test]
    async fn test_activate_unknown_prompt_fails() {
        let (mut store, responder) = make_test_store();
        assert!(handle_command(
            &mut store,
            &responder,
            CliCommand::ActivatePrompt { id: "ghost".to_string() },
        )
        .await
        .is_err());
        assert_eq!(store.state().active_system_prompt.as_deref(), Some("default"));
    }

    #[tokio::test]
    async fn test_update_settings() {
        let (mut store, responder) = make_test_store();
        let settings = run(
            &mut store,
            &responder,
            CliCommand::UpdateSettings(SettingsPatch::new().max_tokens(99_999).model("gpt-4o")),
        )
        .await;
        assert_eq!(settings["maxTokens"], 8192);
        assert_eq!(settings["model"], "gpt-4o");

        let unknown = handle_command(
            &mut store,
            &responder,
            CliCommand::UpdateSettings(SettingsPatch::new().model("gpt-2")),
        )
        .await;
        assert!(unknown.is_err());
        assert_eq!(store.settings().model, "gpt-4o");

        let empty = handle_command(
            &mut store,
            &responder,
            CliCommand::UpdateSettings(SettingsPatch::new()),
        )
        .await;
        assert!(empty.is_err());
    }

    #[tokio::test]
    async fn test_export_backup_and_stats() {
        let (mut store, responder) = make_test_store();
        let dir = tempdir().unwrap();
        run(
            &mut store,
            &responder,
            CliCommand::Chat {
                conversation_id: None,
                content: "hello".to_string(),
            },
        )
        .await;

        let exported = run(
            &mut store,
            &responder,
            CliCommand::ExportBackup { dir: dir.path().to_path_buf() },
        )
        .await;
        let path = PathBuf::from(exported["path"].as_str().unwrap());
        assert!(path.exists());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("georgie-backup-"));

        let stats = run(&mut store, &responder, CliCommand::Stats).await;
        assert_eq!(stats["conversations"], 1);
        assert_eq!(stats["messages"], 2);
        assert_eq!(stats["assistantMessages"], 1);
    }

    #[tokio::test]
    async fn test_stats_ranks_categories() {
        let (mut store, responder) = make_test_store();
        for category in ["code", "maori", "code"] {
            run(
                &mut store,
                &responder,
                CliCommand::CreateConversation {
                    title: None,
                    category: Some(category.to_string()),
                },
            )
            .await;
        }

        let stats = run(&mut store, &responder, CliCommand::Stats).await;
        assert_eq!(stats["topCategories"][0]["categoryId"], "code");
        assert_eq!(stats["topCategories"][0]["conversations"], 2);
        assert_eq!(stats["topCategories"][1]["categoryId"], "maori");
    }

    #[tokio::test]
    async fn test_get_state_and_theme() {
        let (mut store, responder) = make_test_store();
        run(&mut store, &responder, CliCommand::SetTheme(Theme::Light)).await;
        let state = run(&mut store, &responder, CliCommand::GetState).await;
        assert_eq!(state["theme"], "light");
        assert_eq!(state["activeSystemPrompt"], "default");
        assert_eq!(state["categories"].as_array().unwrap().len(), 5);
    }
}
