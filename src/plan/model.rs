use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::role::RoleMap;

/// Default headcount for a newly staffed SprintSquad.
pub const DEFAULT_HEADCOUNT: RoleMap = RoleMap {
    backend: 2.0,
    android: 2.0,
    ios: 2.0,
    qa: 2.0,
    qa_automation: 1.0,
};

/// A planning scope grouping stories, sprints and squads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }
}

/// Story category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryCategory {
    #[serde(alias = "Existing")]
    Existing,
    #[serde(alias = "Future")]
    Future,
    #[serde(alias = "New Feature")]
    NewFeature,
    #[serde(alias = "Foundation")]
    Foundation,
}

impl StoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Existing => "existing",
            Self::Future => "future",
            Self::NewFeature => "new_feature",
            Self::Foundation => "foundation",
        }
    }
}

/// A unit of work with per-role effort estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Caller-assigned, stable identifier.
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<StoryCategory>,
    /// Effort in mandays per role.
    #[serde(default)]
    pub estimate: RoleMap,
    /// Stories that must be scheduled no later than this one.
    /// Unknown identifiers are tolerated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl Story {
    pub fn new(id: impl Into<String>, project_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            title: title.into(),
            epic: None,
            category: None,
            estimate: RoleMap::ZERO,
            dependencies: Vec::new(),
        }
    }

    pub fn with_estimate(mut self, estimate: RoleMap) -> Self {
        self.estimate = estimate;
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// A delivery period. Its position in the plan's sprint list is its order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: String,
    pub project_id: String,
    pub name: String,
    /// First calendar day (inclusive).
    pub start: NaiveDate,
    /// Last calendar day (inclusive).
    pub end: NaiveDate,
    /// Planned availability in (0, 1] after meetings, holidays and the like.
    pub capacity_factor: f64,
}

impl Sprint {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            project_id: project_id.into(),
            start,
            end,
            capacity_factor: 1.0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_capacity_factor(mut self, factor: f64) -> Self {
        self.capacity_factor = factor;
        self
    }

    /// Weekdays between start and end, inclusive.
    pub fn working_days(&self) -> u32 {
        calendar::working_days(self.start, self.end)
    }

    /// Working days scaled by the capacity factor.
    pub fn effective_days(&self) -> f64 {
        f64::from(self.working_days()) * self.capacity_factor
    }
}

/// A named team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    pub id: String,
    pub project_id: String,
    pub name: String,
}

impl Squad {
    pub fn new(id: impl Into<String>, project_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            name: name.into(),
        }
    }
}

/// Staffing of one squad during one sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintSquad {
    /// Always `SS-{sprint_id}-{squad_id}`.
    pub id: String,
    pub sprint_id: String,
    pub squad_id: String,
    #[serde(default)]
    pub headcount: RoleMap,
}

impl SprintSquad {
    pub fn new(sprint_id: impl Into<String>, squad_id: impl Into<String>, headcount: RoleMap) -> Self {
        let sprint_id = sprint_id.into();
        let squad_id = squad_id.into();
        Self {
            id: Self::id_for(&sprint_id, &squad_id),
            sprint_id,
            squad_id,
            headcount,
        }
    }

    /// Derive the identifier for a (sprint, squad) pair.
    pub fn id_for(sprint_id: &str, squad_id: &str) -> String {
        format!("SS-{}-{}", sprint_id, squad_id)
    }
}

/// Intra-sprint start offsets, in working days from the sprint's first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskSchedule {
    pub backend_offset: u32,
    /// Android and iOS run in parallel on one mobile track.
    pub mobile_offset: u32,
    pub qa_offset: u32,
}

impl TaskSchedule {
    pub fn new(backend_offset: u32, mobile_offset: u32, qa_offset: u32) -> Self {
        Self {
            backend_offset,
            mobile_offset,
            qa_offset,
        }
    }
}

/// A story bound to a SprintSquad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub story_id: String,
    pub sprint_squad_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<TaskSchedule>,
}

impl Assignment {
    pub fn new(story_id: impl Into<String>, sprint_squad_id: impl Into<String>) -> Self {
        Self {
            story_id: story_id.into(),
            sprint_squad_id: sprint_squad_id.into(),
            schedule: None,
        }
    }

    pub fn with_schedule(mut self, schedule: TaskSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }
}
