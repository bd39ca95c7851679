//! User-facing export files: a full backup and single-project dumps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::app_store::AppStore;
use crate::models::{Conversation, Project, Settings};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Body of `georgie-backup-YYYY-MM-DD.json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupExport<'a> {
    pub conversations: &'a [Conversation],
    pub projects: &'a [Project],
    pub settings: &'a Settings,
    pub export_date: DateTime<Utc>,
}

impl<'a> BackupExport<'a> {
    pub fn from_store(store: &'a AppStore, export_date: DateTime<Utc>) -> Self {
        let state = store.state();
        Self {
            conversations: &state.conversations,
            projects: &state.projects,
            settings: &state.settings,
            export_date,
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("georgie-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Write a full backup into `dir`, returning the path of the new file
pub fn write_backup(store: &AppStore, dir: &Path) -> Result<PathBuf, ExportError> {
    let now = store.now();
    let json = BackupExport::from_store(store, now).to_json()?;
    let path = dir.join(backup_file_name(now.date_naive()));
    write_file(&path, &json)?;
    tracing::info!("export: wrote backup {}", path.display());
    Ok(path)
}

/// Write one project as pretty JSON into `dir`
pub fn write_project(store: &AppStore, project_id: &str, dir: &Path) -> Result<PathBuf, ExportError> {
    let project = store
        .project(project_id)
        .ok_or_else(|| ExportError::ProjectNotFound(project_id.to_string()))?;
    let json = serde_json::to_string_pretty(project)?;
    let path = dir.join(project.export_file_name());
    write_file(&path, &json)?;
    tracing::info!("export: wrote project {} to {}", project_id, path.display());
    Ok(path)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    let write_err = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }
    fs::write(path, contents).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::{Language, ProjectType};
    use crate::store::MemoryStorage;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn make_test_store() -> AppStore {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 22, 15, 0).unwrap();
        let mut store = AppStore::with_clock(MemoryStorage::new(), ManualClock::new(now));
        store.add_conversation(Conversation::new("c1", "Hello", Language::En, now));
        store.add_project(
            Project::new("p1", "My Cool Project", ProjectType::Code, now).with_description("demo"),
        );
        store
    }

    #[test]
    fn test_backup_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(backup_file_name(date), "georgie-backup-2024-01-05.json");
    }

    #[test]
    fn test_write_backup() {
        let dir = tempdir().unwrap();
        let store = make_test_store();

        let path = write_backup(&store, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "georgie-backup-2024-03-09.json");

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["conversations"][0]["id"], "c1");
        assert_eq!(value["projects"][0]["name"], "My Cool Project");
        assert_eq!(value["settings"]["maxTokens"], 2048);
        assert_eq!(value["exportDate"], "2024-03-09T22:15:00Z");
        // backups carry only these four keys
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_write_project() {
        let dir = tempdir().unwrap();
        let store = make_test_store();

        let path = write_project(&store, "p1", dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "my-cool-project.json");

        let project: Project = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(&project, store.project("p1").unwrap());
    }

    #[test]
    fn test_write_project_stays_inside_dir() {
        let root = tempdir().unwrap();
        let dir = root.path().join("exports");
        let mut store = make_test_store();
        let now = store.now();
        store.add_project(Project::new("p2", "../escaped", ProjectType::General, now));
        store.add_project(Project::new("p3", "a/b", ProjectType::General, now));

        let escaped = write_project(&store, "p2", &dir).unwrap();
        let nested = write_project(&store, "p3", &dir).unwrap();

        assert_eq!(escaped, dir.join("-escaped.json"));
        assert_eq!(nested, dir.join("a-b.json"));
        assert!(!root.path().join("escaped.json").exists());
        assert!(!dir.join("a").exists());
    }

    #[test]
    fn test_write_project_unknown_id() {
        let dir = tempdir().unwrap();
        let store = make_test_store();
        let err = write_project(&store, "missing", dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::ProjectNotFound(id) if id == "missing"));
    }
}
