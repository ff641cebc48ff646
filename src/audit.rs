//! Whole-plan health check.
//!
//! The audit runs two independent passes and concatenates their findings:
//! capacity overloads per SprintSquad first, then dependency violations per
//! assignment. Findings are data, not errors.

use serde::Serialize;
use tracing::debug;

use crate::capacity;
use crate::dependency::{self, ViolationKind};
use crate::plan::{Assignment, Sprint, SprintSquad, Story};

/// Total utilization above which a SprintSquad is overloaded.
pub const OVERLOAD_THRESHOLD: f64 = 110.0;

/// Total utilization above which a SprintSquad is near capacity.
pub const NEAR_CAPACITY_THRESHOLD: f64 = 90.0;

/// What an issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Overload,
    DependencyViolation,
    UnassignedDependency,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overload => "overload",
            Self::DependencyViolation => "dependency_violation",
            Self::UnassignedDependency => "unassigned_dependency",
        }
    }
}

impl From<ViolationKind> for IssueKind {
    fn from(kind: ViolationKind) -> Self {
        match kind {
            ViolationKind::Unassigned => Self::UnassignedDependency,
            ViolationKind::ScheduledLater => Self::DependencyViolation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

/// A finding from [`audit`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_squad_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<String>,
}

/// Audit a plan.
///
/// SprintSquads whose sprint is not in `sprints` and assignments whose
/// story is not in `stories` are skipped.
pub fn audit(
    stories: &[Story],
    sprints: &[Sprint],
    sprint_squads: &[SprintSquad],
    assignments: &[Assignment],
) -> Vec<PlanningIssue> {
    let mut issues = overload_issues(stories, sprints, sprint_squads, assignments);
    issues.extend(dependency_issues(stories, sprints, sprint_squads, assignments));
    debug!(count = issues.len(), "audit complete");
    issues
}

fn overload_issues(
    stories: &[Story],
    sprints: &[Sprint],
    sprint_squads: &[SprintSquad],
    assignments: &[Assignment],
) -> Vec<PlanningIssue> {
    let mut issues = Vec::new();

    for ss in sprint_squads {
        let Some(sprint) = sprints.iter().find(|s| s.id == ss.sprint_id) else {
            continue;
        };

        let assigned = assigned_stories(&ss.id, stories, assignments);
        let metric = capacity::metrics(sprint, ss, assigned);
        let total = metric.total_utilization;

        let (severity, state) = if total > OVERLOAD_THRESHOLD {
            (Severity::High, "is overloaded")
        } else if total > NEAR_CAPACITY_THRESHOLD {
            (Severity::Medium, "is near capacity")
        } else {
            continue;
        };

        issues.push(PlanningIssue {
            kind: IssueKind::Overload,
            severity,
            message: format!("{} in {} {} ({:.0}%)", ss.squad_id, sprint.name, state, total),
            story_id: None,
            sprint_squad_id: Some(ss.id.clone()),
            sprint_id: Some(sprint.id.clone()),
        });
    }

    issues
}

fn dependency_issues(
    stories: &[Story],
    sprints: &[Sprint],
    sprint_squads: &[SprintSquad],
    assignments: &[Assignment],
) -> Vec<PlanningIssue> {
    let mut issues = Vec::new();

    for assignment in assignments {
        // Assignments of stories outside `stories` only serve as lookups.
        let Some(story) = stories.iter().find(|s| s.id == assignment.story_id) else {
            continue;
        };

        for violation in dependency::violations(story, assignments, sprint_squads, sprints) {
            let kind = IssueKind::from(violation.kind);
            let state = match violation.kind {
                ViolationKind::ScheduledLater => "scheduled later",
                ViolationKind::Unassigned => "not scheduled",
            };
            issues.push(PlanningIssue {
                kind,
                severity: Severity::High,
                message: format!(
                    "{} depends on {}, but {} is {}",
                    story.id, violation.dependency_id, violation.dependency_id, state
                ),
                story_id: Some(story.id.clone()),
                sprint_squad_id: None,
                sprint_id: None,
            });
        }
    }

    issues
}

/// Stories assigned to one SprintSquad, in story order.
pub fn assigned_stories<'a>(
    sprint_squad_id: &str,
    stories: &'a [Story],
    assignments: &[Assignment],
) -> Vec<&'a Story> {
    stories
        .iter()
        .filter(|story| {
            assignments
                .iter()
                .any(|a| a.sprint_squad_id == sprint_squad_id && a.story_id == story.id)
        })
        .collect()
}

/// Headline figures for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub story_count: usize,
    pub assigned_count: usize,
    /// Mean total utilization over the project's SprintSquads.
    pub average_utilization: f64,
    /// High-severity issues.
    pub critical_count: usize,
    pub issue_count: usize,
}

/// Summarize a project from its scoped collections.
///
/// Only SprintSquads whose sprint is in `sprints` count towards the
/// average.
pub fn summarize(
    stories: &[Story],
    sprints: &[Sprint],
    sprint_squads: &[SprintSquad],
    assignments: &[Assignment],
) -> ProjectSummary {
    let issues = audit(stories, sprints, sprint_squads, assignments);

    let utilizations: Vec<f64> = sprint_squads
        .iter()
        .filter_map(|ss| {
            let sprint = sprints.iter().find(|s| s.id == ss.sprint_id)?;
            let assigned = assigned_stories(&ss.id, stories, assignments);
            Some(capacity::metrics(sprint, ss, assigned).total_utilization)
        })
        .collect();
    let average_utilization = if utilizations.is_empty() {
        0.0
    } else {
        utilizations.iter().sum::<f64>() / utilizations.len() as f64
    };

    ProjectSummary {
        story_count: stories.len(),
        assigned_count: assignments
            .iter()
            .filter(|a| stories.iter().any(|s| s.id == a.story_id))
            .count(),
        average_utilization,
        critical_count: issues.iter().filter(|i| i.severity == Severity::High).count(),
        issue_count: issues.len(),
    }
}
