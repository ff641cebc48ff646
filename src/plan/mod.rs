//! Plan entities, the mutable plan state, and on-disk plan documents.
//!
//! [`PlanState`] is the single owner of every collection. Staffing and
//! assignments sit behind a draft/commit sandbox; everything else is
//! edited in place.

mod document;
mod model;
mod state;

pub use document::{DocumentError, DocumentFormat, PlanDocument};
pub use model::{
    Assignment, Project, Sprint, SprintSquad, Squad, Story, StoryCategory, TaskSchedule,
    DEFAULT_HEADCOUNT,
};
pub use state::{Allocation, PlanState, ProjectView, FALLBACK_SCHEDULE, FALLBACK_SPRINT_WORKING_DAYS};
