use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::error::BoardError;

/// Unique identifier for a project, stable for the life of the process
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProjectId {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Drag payloads carry ids as plain text, so anything non-blank is accepted
        if s.trim().is_empty() {
            return Err(BoardError::InvalidProjectId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status column a project belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Finished,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 2] = [ProjectStatus::Active, ProjectStatus::Finished];

    /// Lowercase name used in element ids and command input
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "finished" => Ok(Self::Finished),
            _ => Err(BoardError::InvalidStatus(s.to_string())),
        }
    }
}

/// A project on the board.
///
/// Projects are only built by [`ProjectStore::create`](crate::store::ProjectStore::create)
/// and only their status ever changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    title: String,
    description: String,
    people: u32,
    status: ProjectStatus,
    created_at: DateTime<Utc>,
}

impl Project {
    pub(crate) fn new(id: ProjectId, title: String, description: String, people: u32) -> Self {
        Self {
            id,
            title,
            description,
            people,
            status: ProjectStatus::Active,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn people(&self) -> u32 {
        self.people
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Human readable head count, e.g. "1 person" or "3 persons"
    pub fn persons_label(&self) -> String {
        if self.people == 1 {
            "1 person".to_string()
        } else {
            format!("{} persons", self.people)
        }
    }

    pub(crate) fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_differ() {
        let a = ProjectId::generate();
        let b = ProjectId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_project_id_parsing() {
        let id = ProjectId::from_str("0.123456").unwrap();
        assert_eq!(id.as_str(), "0.123456");

        assert!(ProjectId::from_str("").is_err());
        assert!(ProjectId::from_str("   ").is_err());
    }

    #[test]
    fn test_status_parsing_and_display() {
        assert_eq!(ProjectStatus::from_str("ACTIVE").unwrap(), ProjectStatus::Active);
        assert_eq!(
            ProjectStatus::from_str(" finished ").unwrap(),
            ProjectStatus::Finished
        );
        assert!(ProjectStatus::from_str("done").is_err());

        assert_eq!(ProjectStatus::Active.to_string(), "Active");
        assert_eq!(ProjectStatus::Finished.slug(), "finished");
    }

    fn sample(title: &str, description: &str, people: u32) -> Project {
        Project::new(
            ProjectId::generate(),
            title.to_string(),
            description.to_string(),
            people,
        )
    }

    #[test]
    fn test_new_project_is_active() {
        let project = sample("Title", "Some text", 2);
        assert_eq!(project.status(), ProjectStatus::Active);
        assert_eq!(project.people(), 2);
    }

    #[test]
    fn test_persons_label() {
        let one = sample("A", "desc1", 1);
        let many = sample("B", "desc2", 4);
        assert_eq!(one.persons_label(), "1 person");
        assert_eq!(many.persons_label(), "4 persons");
    }

    #[test]
    fn test_project_serialization() {
        let project = sample("A", "desc1", 3);
        let json = serde_json::to_string(&project).unwrap();
        assert!(json.contains("\"status\":\"active\""));
        assert!(json.contains(&format!("\"id\":\"{}\"", project.id())));

        let back: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(back, project);
    }
}
