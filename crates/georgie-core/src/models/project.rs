use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::view::{parse_named, ParseEnumError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Code,
    Tutorial,
    Course,
    Lyrics,
    Academic,
    Fashion,
    #[default]
    General,
}

impl ProjectType {
    pub const ALL: [ProjectType; 7] = [
        ProjectType::Code,
        ProjectType::Tutorial,
        ProjectType::Course,
        ProjectType::Lyrics,
        ProjectType::Academic,
        ProjectType::Fashion,
        ProjectType::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Tutorial => "tutorial",
            Self::Course => "course",
            Self::Lyrics => "lyrics",
            Self::Academic => "academic",
            Self::Fashion => "fashion",
            Self::General => "general",
        }
    }
}

impl FromStr for ProjectType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("project type", s, &Self::ALL, Self::as_str)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Text,
    Code,
    Markdown,
    Json,
    Css,
    Html,
    Javascript,
    Typescript,
}

/// A file owned by exactly one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub files: Vec<ProjectFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Project {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        project_type: ProjectType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            project_type,
            files: Vec::new(),
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// File name used when exporting this project on its own: runs of
    /// whitespace or path-unsafe characters become `-`, everything
    /// lower-cased. Leading dots are dropped so the result always names a
    /// plain file inside the export directory.
    pub fn export_file_name(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        let mut in_separator = false;
        for c in self.name.chars() {
            if c.is_whitespace() || c.is_control() || UNSAFE_FILE_CHARS.contains(&c) {
                if !in_separator {
                    slug.push('-');
                }
                in_separator = true;
            } else {
                slug.extend(c.to_lowercase());
                in_separator = false;
            }
        }
        let slug = slug.trim_start_matches('.');
        if slug.is_empty() {
            "project.json".to_string()
        } else {
            format!("{}.json", slug)
        }
    }
}

const UNSAFE_FILE_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Field-level changes for `AppStore::update_project`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub project_type: Option<ProjectType>,
    pub files: Option<Vec<ProjectFile>>,
    pub tags: Option<Vec<String>>,
}

impl ProjectPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = Some(project_type);
        self
    }

    pub fn files(mut self, files: Vec<ProjectFile>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub(crate) fn apply(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(project_type) = self.project_type {
            project.project_type = project_type;
        }
        if let Some(files) = &self.files {
            project.files = files.clone();
        }
        if let Some(tags) = &self.tags {
            project.tags = tags.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_test_project(name: &str) -> Project {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Project::new("p1", name, ProjectType::Code, now)
    }

    #[test]
    fn test_export_file_name_collapses_whitespace() {
        let project = make_test_project("My  Cool\tProject");
        assert_eq!(project.export_file_name(), "my-cool-project.json");
    }

    #[test]
    fn test_export_file_name_keeps_edge_whitespace_as_dash() {
        let project = make_test_project(" Waiata ");
        assert_eq!(project.export_file_name(), "-waiata-.json");
    }

    #[test]
    fn test_export_file_name_strips_path_separators() {
        assert_eq!(make_test_project("../escaped").export_file_name(), "-escaped.json");
        assert_eq!(make_test_project("a/b").export_file_name(), "a-b.json");
        assert_eq!(make_test_project("C:\\Temp\\x").export_file_name(), "c-temp-x.json");
        assert_eq!(make_test_project("..").export_file_name(), "project.json");
        assert_eq!(make_test_project("").export_file_name(), "project.json");
        assert_eq!(make_test_project(".hidden").export_file_name(), "hidden.json");
    }

    #[test]
    fn test_serialized_type_field_name() {
        let project = make_test_project("Lyrics").with_tags(vec!["waiata".to_string()]);
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["type"], "code");
        assert_eq!(json["tags"][0], "waiata");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_patch_replaces_files_and_keeps_name() {
        let mut project = make_test_project("Site");
        let file = ProjectFile {
            id: "f1".to_string(),
            name: "index.html".to_string(),
            content: "<html></html>".to_string(),
            file_type: FileType::Html,
            language: None,
            path: "/index.html".to_string(),
        };
        ProjectPatch::new().files(vec![file.clone()]).apply(&mut project);
        assert_eq!(project.name, "Site");
        assert_eq!(project.files, vec![file]);
    }

    #[test]
    fn test_project_type_parse() {
        assert_eq!("Lyrics".parse::<ProjectType>().unwrap(), ProjectType::Lyrics);
        assert!("poetry".parse::<ProjectType>().is_err());
    }
}
