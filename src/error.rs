//! Caller-facing engine errors.
//!
//! Planning problems (overloads, dependency violations) are never errors;
//! they are reported as [`crate::audit::PlanningIssue`] values.

use crate::sandbox::SandboxError;

/// Errors returned by [`crate::plan::PlanState`] commands.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// The referenced SprintSquad does not exist.
    #[error("unknown sprint squad: {0}")]
    UnknownSprintSquad(String),

    /// The referenced sprint does not exist.
    #[error("unknown sprint: {0}")]
    UnknownSprint(String),

    /// The referenced squad does not exist.
    #[error("unknown squad: {0}")]
    UnknownSquad(String),

    /// The referenced story does not exist.
    #[error("unknown story: {0}")]
    UnknownStory(String),

    /// The referenced project does not exist.
    #[error("unknown project: {0}")]
    UnknownProject(String),

    /// An entity with this identifier already exists.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// A project must keep at least one sprint.
    #[error("project {0} has only one sprint left")]
    LastSprint(String),

    /// The project has no sprint to extend from.
    #[error("project {0} has no sprints")]
    NoSprints(String),

    /// Capacity factors must lie in (0, 1].
    #[error("capacity factor must be in (0, 1], got {0}")]
    InvalidCapacityFactor(f64),

    /// A sandbox transition was attempted from the wrong state.
    #[error(transparent)]
    Sandbox(#[from] SandboxError),
}

impl PlanError {
    /// True for errors caused by a dangling identifier.
    pub fn is_invalid_reference(&self) -> bool {
        matches!(
            self,
            Self::UnknownSprintSquad(_)
                | Self::UnknownSprint(_)
                | Self::UnknownSquad(_)
                | Self::UnknownStory(_)
                | Self::UnknownProject(_)
        )
    }

    /// True for errors caused by calling a sandbox transition out of order.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::Sandbox(_))
    }
}
