use crate::{
    domain::project::ProjectStatus,
    error::{BoardError, Result},
    validation::FormRules,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};

/// Configuration for a board column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub status: ProjectStatus,
}

impl Column {
    pub fn new(name: impl Into<String>, status: ProjectStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    /// Column header text, e.g. "ACTIVE PROJECTS"
    pub fn heading(&self) -> String {
        format!("{} PROJECTS", self.name.to_uppercase())
    }
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub name: String,
    /// Element id the form and columns attach to
    pub host_id: String,
    pub columns: Vec<Column>,
    pub form: FormRules,
    /// Message raised when the form rejects input
    pub alert_message: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "Project Board".to_string(),
            host_id: "app".to_string(),
            columns: vec![
                Column::new("active", ProjectStatus::Active),
                Column::new("finished", ProjectStatus::Finished),
            ],
            form: FormRules::default(),
            alert_message: "Invalid input, please try again!".to_string(),
        }
    }
}

impl BoardConfig {
    /// Parses and validates a JSON configuration; omitted keys take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        log::debug!("loading board config from {}", path.display());
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host_id.trim().is_empty() {
            return Err(BoardError::ConfigError("host_id cannot be empty".to_string()));
        }
        if self.columns.is_empty() {
            return Err(BoardError::ConfigError(
                "at least one column is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.status) {
                return Err(BoardError::ConfigError(format!(
                    "status {} is used by more than one column",
                    column.status
                )));
            }
        }

        let rules = [
            ("title", &self.form.title),
            ("description", &self.form.description),
            ("people", &self.form.people),
        ];
        for (field, constraints) in rules {
            if !constraints.is_consistent() {
                return Err(BoardError::ConfigError(format!(
                    "{} constraints have a lower bound above the upper bound",
                    field
                )));
            }
        }

        Ok(())
    }

    /// Gets the column configuration for a status
    pub fn column_for_status(&self, status: ProjectStatus) -> Option<&Column> {
        self.columns.iter().find(|col| col.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.columns.len(), 2);
        assert_eq!(
            config.column_for_status(ProjectStatus::Finished).unwrap().heading(),
            "FINISHED PROJECTS"
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = BoardConfig::from_json_str(r#"{ "alert_message": "Nope" }"#).unwrap();
        assert_eq!(config.alert_message, "Nope");
        assert_eq!(config.host_id, "app");
        assert_eq!(config.form, FormRules::default());
    }

    #[test]
    fn test_duplicate_status_rejected() {
        let json = r#"{
            "columns": [
                { "name": "todo", "status": "active" },
                { "name": "doing", "status": "active" }
            ]
        }"#;
        let err = BoardConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, BoardError::ConfigError(_)));
    }

    #[test]
    fn test_empty_columns_rejected() {
        assert!(BoardConfig::from_json_str(r#"{ "columns": [] }"#).is_err());
    }

    #[test]
    fn test_inconsistent_rules_rejected() {
        let json = r#"{ "form": { "people": { "min": 4, "max": 2 } } }"#;
        assert!(BoardConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "name": "Sprint", "columns": [{{ "name": "open", "status": "active" }}] }}"#
        )
        .unwrap();

        let config = BoardConfig::load(file.path()).unwrap();
        assert_eq!(config.name, "Sprint");
        assert_eq!(config.columns.len(), 1);
        assert!(config.column_for_status(ProjectStatus::Finished).is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = BoardConfig::load("/nonexistent/board.json").unwrap_err();
        assert!(matches!(err, BoardError::IoError(_)));
    }
}
