//! Test utilities for squadplan.
//!
//! Shared fixtures for unit tests, plus a helper for tests that change the
//! process-wide working directory.

#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use chrono::{Duration, NaiveDate};
#[cfg(test)]
use tempfile::TempDir;

#[cfg(test)]
use crate::plan::{Allocation, PlanState, Project, Sprint, SprintSquad, Squad, Story, DEFAULT_HEADCOUNT};
#[cfg(test)]
use crate::role::RoleMap;

/// Global mutex for tests that change the current working directory.
#[cfg(test)]
pub static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` inside a fresh temporary directory, then restore the original
/// working directory.
///
/// # Panics
///
/// Panics if the directory changes fail.
#[cfg(test)]
pub fn with_temp_cwd<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let original = std::env::current_dir().expect("failed to get current directory");
    let temp = TempDir::new().expect("failed to create temp directory");
    std::env::set_current_dir(temp.path()).expect("failed to change to temp directory");
    let result = f();
    std::env::set_current_dir(original).expect("failed to restore original directory");
    result
}

/// Monday 2024-03-04.
#[cfg(test)]
pub fn first_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date")
}

/// `count` back-to-back sprints of ten working days each.
#[cfg(test)]
pub fn sprints(project_id: &str, count: usize) -> Vec<Sprint> {
    (0..count)
        .map(|i| {
            let start = first_monday() + Duration::days(14 * i as i64);
            Sprint::new(format!("S{}", i + 1), project_id, start, start + Duration::days(11))
                .with_name(format!("Sprint {}", i + 1))
        })
        .collect()
}

/// A small committed plan.
///
/// Project P1 has sprints S1..S3 (ten working days, factor 1.0), squads Q1
/// and Q2 staffed with the default headcount in every sprint, and stories:
/// - A: 3 BE, 5 AND, 2 iOS, 2 QA; depends on B
/// - B: 4 BE, 2 QA
/// - C: 20 BE
///
/// Project P2 has one sprint (P2S1), squad R1 and story Z.
#[cfg(test)]
pub fn sample_plan() -> PlanState {
    let projects = vec![Project::new("P1", "Mobile"), Project::new("P2", "Web")];

    let mut all_sprints = sprints("P1", 3);
    all_sprints.push(Sprint::new(
        "P2S1",
        "P2",
        first_monday(),
        first_monday() + Duration::days(11),
    ));

    let squads = vec![
        Squad::new("Q1", "P1", "Squad 1"),
        Squad::new("Q2", "P1", "Squad 2"),
        Squad::new("R1", "P2", "Web Squad"),
    ];

    let mut sprint_squads = Vec::new();
    for sprint in all_sprints.iter().filter(|s| s.project_id == "P1") {
        for squad in ["Q1", "Q2"] {
            sprint_squads.push(SprintSquad::new(&sprint.id, squad, DEFAULT_HEADCOUNT));
        }
    }
    sprint_squads.push(SprintSquad::new("P2S1", "R1", DEFAULT_HEADCOUNT));

    let stories = vec![
        Story::new("A", "P1", "Login")
            .with_estimate(RoleMap::new(3.0, 5.0, 2.0, 2.0, 0.0))
            .with_dependencies(["B"]),
        Story::new("B", "P1", "Auth API").with_estimate(RoleMap::new(4.0, 0.0, 0.0, 2.0, 0.0)),
        Story::new("C", "P1", "Ledger").with_estimate(RoleMap::new(20.0, 0.0, 0.0, 0.0, 0.0)),
        Story::new("Z", "P2", "Landing page").with_estimate(RoleMap::new(1.0, 0.0, 0.0, 1.0, 0.0)),
    ];

    PlanState::from_parts(
        projects,
        stories,
        all_sprints,
        squads,
        Allocation {
            sprint_squads,
            assignments: Vec::new(),
        },
    )
}

/// SprintSquad id of squad `squad_id` in sprint `S{sprint}` of P1.
#[cfg(test)]
pub fn ss(sprint: usize, squad_id: &str) -> String {
    SprintSquad::id_for(&format!("S{}", sprint), squad_id)
}
