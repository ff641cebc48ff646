use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::{Assignment, Project, Sprint, SprintSquad, Squad, Story};
use super::state::{Allocation, PlanState};

/// Errors reading, writing or validating a plan file.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML plan: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("failed to serialize plan as TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("invalid JSON plan: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid plan: {0}")]
    Invalid(String),

    #[error("unsupported plan format: {} (expected .toml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// On-disk encoding of a plan, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(DocumentError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Serializable snapshot of every plan collection.
///
/// Sprints keep file order, which is their sequence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanDocument {
    pub projects: Vec<Project>,
    pub stories: Vec<Story>,
    pub sprints: Vec<Sprint>,
    pub squads: Vec<Squad>,
    pub sprint_squads: Vec<SprintSquad>,
    pub assignments: Vec<Assignment>,
}

impl PlanDocument {
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self, DocumentError> {
        let doc: Self = match format {
            DocumentFormat::Toml => toml::from_str(content)?,
            DocumentFormat::Json => serde_json::from_str(content)?,
        };
        doc.validate()?;
        Ok(doc)
    }

    pub fn render(&self, format: DocumentFormat) -> Result<String, DocumentError> {
        match format {
            DocumentFormat::Toml => Ok(toml::to_string_pretty(self)?),
            DocumentFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Read and validate a plan file.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let format = DocumentFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::parse(&content, format)?;
        debug!(
            path = %path.display(),
            stories = doc.stories.len(),
            sprints = doc.sprints.len(),
            "loaded plan"
        );
        Ok(doc)
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let content = self.render(DocumentFormat::from_path(path)?)?;
        fs::write(path, content).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "saved plan");
        Ok(())
    }

    /// Check identifier uniqueness and SprintSquad id derivation.
    ///
    /// Dangling cross-references are allowed; the engine tolerates them.
    pub fn validate(&self) -> Result<(), DocumentError> {
        unique("project", self.projects.iter().map(|p| p.id.as_str()))?;
        unique("story", self.stories.iter().map(|s| s.id.as_str()))?;
        unique("sprint", self.sprints.iter().map(|s| s.id.as_str()))?;
        unique("squad", self.squads.iter().map(|s| s.id.as_str()))?;
        unique("sprint squad", self.sprint_squads.iter().map(|ss| ss.id.as_str()))?;
        unique(
            "assignment for story",
            self.assignments.iter().map(|a| a.story_id.as_str()),
        )?;

        for ss in &self.sprint_squads {
            let expected = SprintSquad::id_for(&ss.sprint_id, &ss.squad_id);
            if ss.id != expected {
                return Err(DocumentError::Invalid(format!(
                    "sprint squad {} should be named {}",
                    ss.id, expected
                )));
            }
        }
        Ok(())
    }

    /// Snapshot the plan at its baseline allocation. Edits in an open
    /// draft are not included; see [`PlanState::baseline_allocation`].
    pub fn from_state(state: &PlanState) -> Self {
        let allocation = state.baseline_allocation();
        Self {
            projects: state.projects().to_vec(),
            stories: state.stories().to_vec(),
            sprints: state.sprints().to_vec(),
            squads: state.squads().to_vec(),
            sprint_squads: allocation.sprint_squads.clone(),
            assignments: allocation.assignments.clone(),
        }
    }

    pub fn into_state(self) -> PlanState {
        PlanState::from_parts(
            self.projects,
            self.stories,
            self.sprints,
            self.squads,
            Allocation {
                sprint_squads: self.sprint_squads,
                assignments: self.assignments,
            },
        )
    }
}

fn unique<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), DocumentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DocumentError::Invalid(format!("duplicate {} id: {}", what, id)));
        }
    }
    Ok(())
}
