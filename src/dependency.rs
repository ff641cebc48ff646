//! Dependency timing checks.
//!
//! A story's dependencies must be scheduled in the same sprint or an
//! earlier one. Sprint order is the position in the sprint list passed in,
//! never the sprint dates.

use serde::Serialize;

use crate::plan::{Assignment, Sprint, SprintSquad, Story};

/// A dependency scheduled in the same sprint as its dependent counts as
/// satisfied. Parallel work inside one sprint does not guarantee the
/// dependency finishes first; this constant makes the policy visible.
pub const SAME_SPRINT_SATISFIES: bool = true;

/// Why a dependency is in violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The dependency has no assignment.
    Unassigned,
    /// The dependency sits in a later sprint than the dependent story, or
    /// is assigned to a SprintSquad that no longer exists.
    ScheduledLater,
}

/// A dependency that breaks the ordering constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyViolation {
    pub dependency_id: String,
    pub kind: ViolationKind,
}

/// Position in `sprints` of the sprint a story is assigned to.
///
/// `None` if the story is unassigned or any hop of
/// assignment → SprintSquad → sprint fails to resolve.
pub fn sprint_position(
    story_id: &str,
    assignments: &[Assignment],
    sprint_squads: &[SprintSquad],
    sprints: &[Sprint],
) -> Option<usize> {
    let assignment = assignments.iter().find(|a| a.story_id == story_id)?;
    let sprint_squad = sprint_squads
        .iter()
        .find(|ss| ss.id == assignment.sprint_squad_id)?;
    sprints.iter().position(|s| s.id == sprint_squad.sprint_id)
}

/// Find the dependencies of `story` that are unscheduled or scheduled
/// after it.
///
/// An unassigned (or unresolvable) story makes no timing claim, so the
/// result is empty. Violations come back in declaration order.
///
/// A dependency counts as unscheduled only when it has no assignment at
/// all. An assignment to a missing SprintSquad is reported as scheduled
/// later. A dependency whose sprint is not in `sprints` (another
/// project's sequence) is treated as satisfied.
pub fn violations(
    story: &Story,
    assignments: &[Assignment],
    sprint_squads: &[SprintSquad],
    sprints: &[Sprint],
) -> Vec<DependencyViolation> {
    let Some(own) = sprint_position(&story.id, assignments, sprint_squads, sprints) else {
        return Vec::new();
    };

    story
        .dependencies
        .iter()
        .filter_map(|dep| {
            let kind = dependency_kind(dep, own, assignments, sprint_squads, sprints)?;
            Some(DependencyViolation {
                dependency_id: dep.clone(),
                kind,
            })
        })
        .collect()
}

fn dependency_kind(
    dep: &str,
    own: usize,
    assignments: &[Assignment],
    sprint_squads: &[SprintSquad],
    sprints: &[Sprint],
) -> Option<ViolationKind> {
    let Some(assignment) = assignments.iter().find(|a| a.story_id == dep) else {
        return Some(ViolationKind::Unassigned);
    };
    let Some(sprint_squad) = sprint_squads
        .iter()
        .find(|ss| ss.id == assignment.sprint_squad_id)
    else {
        return Some(ViolationKind::ScheduledLater);
    };
    match sprints.iter().position(|s| s.id == sprint_squad.sprint_id) {
        Some(pos) if pos > own => Some(ViolationKind::ScheduledLater),
        Some(pos) if pos == own && !SAME_SPRINT_SATISFIES => Some(ViolationKind::ScheduledLater),
        _ => None,
    }
}

/// Identifiers of the violating dependencies of `story`.
pub fn violation_ids(
    story: &Story,
    assignments: &[Assignment],
    sprint_squads: &[SprintSquad],
    sprints: &[Sprint],
) -> Vec<String> {
    violations(story, assignments, sprint_squads, sprints)
        .into_iter()
        .map(|v| v.dependency_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::RoleMap;
    use chrono::{Duration, NaiveDate};

    struct Fixture {
        sprints: Vec<Sprint>,
        sprint_squads: Vec<SprintSquad>,
    }

    fn fixture() -> Fixture {
        let base = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let sprints: Vec<Sprint> = (0..3)
            .map(|i| {
                let start = base + Duration::days(14 * i);
                Sprint::new(format!("S{}", i), "P1", start, start + Duration::days(11))
            })
            .collect();
        let sprint_squads = sprints
            .iter()
            .map(|s| SprintSquad::new(&s.id, "Q1", RoleMap::splat(1.0)))
            .collect();
        Fixture {
            sprints,
            sprint_squads,
        }
    }

    fn ss(index: usize) -> String {
        SprintSquad::id_for(&format!("S{}", index), "Q1")
    }

    fn story_a() -> Story {
        Story::new("A", "P1", "A").with_dependencies(["B"])
    }

    #[test]
    fn test_unassigned_story_has_no_violations() {
        let f = fixture();
        let v = violations(&story_a(), &[], &f.sprint_squads, &f.sprints);
        assert!(v.is_empty());
    }

    #[test]
    fn test_unassigned_dependency() {
        let f = fixture();
        let assignments = vec![Assignment::new("A", ss(1))];
        let v = violations(&story_a(), &assignments, &f.sprint_squads, &f.sprints);
        assert_eq!(
            v,
            vec![DependencyViolation {
                dependency_id: "B".to_string(),
                kind: ViolationKind::Unassigned,
            }]
        );
    }

    #[test]
    fn test_dependency_scheduled_later() {
        let f = fixture();
        let assignments = vec![Assignment::new("A", ss(1)), Assignment::new("B", ss(2))];
        let v = violations(&story_a(), &assignments, &f.sprint_squads, &f.sprints);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].dependency_id, "B");
        assert_eq!(v[0].kind, ViolationKind::ScheduledLater);
    }

    #[test]
    fn test_same_sprint_dependency_is_satisfied() {
        assert!(SAME_SPRINT_SATISFIES);
        let f = fixture();
        let assignments = vec![Assignment::new("A", ss(1)), Assignment::new("B", ss(1))];
        let v = violations(&story_a(), &assignments, &f.sprint_squads, &f.sprints);
        assert!(v.is_empty());
    }

    #[test]
    fn test_earlier_dependency_is_satisfied() {
        let f = fixture();
        let assignments = vec![Assignment::new("A", ss(2)), Assignment::new("B", ss(0))];
        assert!(violation_ids(&story_a(), &assignments, &f.sprint_squads, &f.sprints).is_empty());
    }

    #[test]
    fn test_order_uses_list_position_not_dates() {
        let mut f = fixture();
        // Move the last sprint to the front: it is now "first" despite its dates.
        let last = f.sprints.pop().unwrap();
        f.sprints.insert(0, last);
        let assignments = vec![Assignment::new("A", ss(1)), Assignment::new("B", ss(2))];
        assert!(violation_ids(&story_a(), &assignments, &f.sprint_squads, &f.sprints).is_empty());
    }

    #[test]
    fn test_dependency_with_dangling_sprint_squad_counts_as_scheduled_later() {
        let f = fixture();
        let assignments = vec![Assignment::new("A", ss(1)), Assignment::new("B", "SS-missing")];
        let v = violations(&story_a(), &assignments, &f.sprint_squads, &f.sprints);
        assert_eq!(
            v,
            vec![DependencyViolation {
                dependency_id: "B".to_string(),
                kind: ViolationKind::ScheduledLater,
            }]
        );
    }

    #[test]
    fn test_dependency_outside_sprint_sequence_is_satisfied() {
        let mut f = fixture();
        f.sprint_squads.push(SprintSquad::new("T1", "R1", RoleMap::splat(1.0)));
        let assignments = vec![
            Assignment::new("A", ss(0)),
            Assignment::new("B", SprintSquad::id_for("T1", "R1")),
        ];
        assert!(violations(&story_a(), &assignments, &f.sprint_squads, &f.sprints).is_empty());
    }

    #[test]
    fn test_unresolvable_own_assignment_has_no_violations() {
        let f = fixture();
        let assignments = vec![Assignment::new("A", "SS-missing")];
        assert!(violations(&story_a(), &assignments, &f.sprint_squads, &f.sprints).is_empty());
    }

    #[test]
    fn test_multiple_dependencies_keep_declaration_order() {
        let f = fixture();
        let story = Story::new("A", "P1", "A").with_dependencies(["C", "B", "D"]);
        let assignments = vec![
            Assignment::new("A", ss(1)),
            Assignment::new("B", ss(2)),
            Assignment::new("D", ss(0)),
        ];
        let ids = violation_ids(&story, &assignments, &f.sprint_squads, &f.sprints);
        assert_eq!(ids, vec!["C".to_string(), "B".to_string()]);
    }
}
