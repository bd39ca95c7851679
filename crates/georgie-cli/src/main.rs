use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use georgie_cli::cli::{handle_command, init_tracing, CliCommand, CliConfig};
use georgie_core::models::{Language, ProjectType, SettingsPatch, Theme};
use georgie_core::AppStore;

#[derive(Parser)]
#[command(name = "georgie")]
#[command(about = "Manage GEORGIE conversations, projects and settings")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, short)]
    pretty: bool,

    /// Directory holding georgie-app-storage.json
    #[arg(long, short = 'd')]
    data_dir: Option<PathBuf>,

    /// Path to JSON config file (contains dataDir, responseDelayMs)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List conversations, newest first
    ListConversations {
        /// Only conversations in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show a conversation with all messages
    ShowConversation { id: String },

    /// Create an empty conversation
    CreateConversation {
        /// Defaults to "New Conversation" in the current language
        #[arg(long, short = 't')]
        title: Option<String>,
        /// Defaults to "general"
        #[arg(long)]
        category: Option<String>,
    },

    /// Rename a conversation
    RenameConversation { id: String, title: String },

    /// Delete a conversation
    DeleteConversation { id: String },

    /// Send a message and wait for the assistant's reply
    Chat {
        /// Message content
        content: String,
        /// Continue this conversation instead of starting a new one
        #[arg(long)]
        conversation: Option<String>,
    },

    /// List all projects
    ListProjects,

    /// Create a new project
    CreateProject {
        /// Project name
        #[arg(long, short = 'n')]
        name: String,
        /// Project description
        #[arg(long, default_value = "")]
        description: String,
        /// code, tutorial, course, lyrics, academic, fashion or general
        #[arg(long = "type", default_value = "general")]
        project_type: ProjectType,
        /// Tag (can be specified multiple times)
        #[arg(long)]
        tag: Vec<String>,
    },

    /// Delete a project
    DeleteProject { id: String },

    /// Write a project to <dir>/<project-name>.json
    ExportProject {
        id: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// List categories
    ListCategories,

    /// Add a category; its id is derived from the name
    AddCategory {
        name: String,
        #[arg(long, default_value = "Folder")]
        icon: String,
        #[arg(long, default_value = "#6b7280")]
        color: String,
    },

    /// Delete a category (conversations keep their category id)
    DeleteCategory { id: String },

    /// List system prompts
    ListPrompts,

    /// Add a system prompt; its id is derived from the name
    AddPrompt {
        name: String,
        prompt: String,
        #[arg(long, default_value = "general")]
        category: String,
    },

    /// Make a system prompt the active one
    ActivatePrompt { id: String },

    /// Delete a system prompt
    DeletePrompt { id: String },

    /// Show current settings
    ShowSettings,

    /// Change one or more settings
    UpdateSettings {
        #[arg(long)]
        auto_save: Option<bool>,
        #[arg(long)]
        voice_enabled: Option<bool>,
        #[arg(long)]
        code_execution: Option<bool>,
        #[arg(long)]
        web_search: Option<bool>,
        #[arg(long)]
        image_generation: Option<bool>,
        /// Clamped to 100..=8192
        #[arg(long)]
        max_tokens: Option<u32>,
        /// Clamped to 0.0..=2.0
        #[arg(long)]
        temperature: Option<f64>,
        #[arg(long)]
        model: Option<String>,
    },

    /// Set the colour theme (dark or light)
    SetTheme { theme: Theme },

    /// Set the interface language (en or mi)
    SetLanguage { language: Language },

    /// Write a full backup to <dir>/georgie-backup-YYYY-MM-DD.json
    ExportBackup {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Print usage statistics
    Stats,

    /// Get full state dump
    GetState,
}

impl From<Commands> for CliCommand {
    fn from(command: Commands) -> Self {
        match command {
            Commands::ListConversations { category } => CliCommand::ListConversations { category },
            Commands::ShowConversation { id } => CliCommand::ShowConversation { id },
            Commands::CreateConversation { title, category } => {
                CliCommand::CreateConversation { title, category }
            }
            Commands::RenameConversation { id, title } => CliCommand::RenameConversation { id, title },
            Commands::DeleteConversation { id } => CliCommand::DeleteConversation { id },
            Commands::Chat {
                content,
                conversation,
            } => CliCommand::Chat {
                conversation_id: conversation,
                content,
            },
            Commands::ListProjects => CliCommand::ListProjects,
            Commands::CreateProject {
                name,
                description,
                project_type,
                tag,
            } => CliCommand::CreateProject {
                name,
                description,
                project_type,
                tags: tag,
            },
            Commands::DeleteProject { id } => CliCommand::DeleteProject { id },
            Commands::ExportProject { id, dir } => CliCommand::ExportProject { id, dir },
            Commands::ListCategories => CliCommand::ListCategories,
            Commands::AddCategory { name, icon, color } => {
                CliCommand::AddCategory { name, icon, color }
            }
            Commands::DeleteCategory { id } => CliCommand::DeleteCategory { id },
            Commands::ListPrompts => CliCommand::ListPrompts,
            Commands::AddPrompt {
                name,
                prompt,
                category,
            } => CliCommand::AddPrompt {
                name,
                prompt,
                category,
            },
            Commands::ActivatePrompt { id } => CliCommand::ActivatePrompt { id },
            Commands::DeletePrompt { id } => CliCommand::DeletePrompt { id },
            Commands::ShowSettings => CliCommand::ShowSettings,
            Commands::UpdateSettings {
                auto_save,
                voice_enabled,
                code_execution,
                web_search,
                image_generation,
                max_tokens,
                temperature,
                model,
            } => CliCommand::UpdateSettings(SettingsPatch {
                auto_save,
                voice_enabled,
                code_execution,
                web_search,
                image_generation,
                max_tokens,
                temperature,
                model,
            }),
            Commands::SetTheme { theme } => CliCommand::SetTheme(theme),
            Commands::SetLanguage { language } => CliCommand::SetLanguage(language),
            Commands::ExportBackup { dir } => CliCommand::ExportBackup { dir },
            Commands::Stats => CliCommand::Stats,
            Commands::GetState => CliCommand::GetState,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config.as_deref() {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let core_config = config.core_config(cli.data_dir.as_deref());
    tracing::debug!("using storage {}", core_config.storage_path().display());

    let mut store = AppStore::open(&core_config);
    let load_error = store.last_persist_error().map(str::to_string);
    if let Some(e) = load_error.as_deref() {
        eprintln!("Warning: stored state could not be loaded, starting fresh: {}", e);
    }
    let responder = config.responder();

    let result = handle_command(&mut store, &responder, cli.command.into()).await?;

    if let Some(e) = store.last_persist_error() {
        if load_error.as_deref() != Some(e) {
            eprintln!("Warning: changes were not saved: {}", e);
        }
    }

    let output = if cli.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("Failed to serialize output")?;
    println!("{}", output);
    Ok(())
}
