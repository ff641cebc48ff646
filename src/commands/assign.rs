use serde::Serialize;
use tracing::info;

use squadplan::audit::PlanningIssue;
use squadplan::color::{self, emoji};
use squadplan::config::{Config, OutputFormat};
use squadplan::error::PlanError;
use squadplan::plan::PlanState;

use super::{load_plan, print_json, save_plan, target_project, CommandError};

/// Issues that appeared and disappeared between two audits.
#[derive(Debug, Default, Serialize)]
struct AuditDelta {
    introduced: Vec<PlanningIssue>,
    resolved: Vec<PlanningIssue>,
}

impl AuditDelta {
    fn between(before: &[PlanningIssue], after: &[PlanningIssue]) -> Self {
        Self {
            introduced: after.iter().filter(|i| !before.contains(i)).cloned().collect(),
            resolved: before.iter().filter(|i| !after.contains(i)).cloned().collect(),
        }
    }
}

#[derive(Serialize)]
struct DraftReport<'a> {
    action: String,
    saved: bool,
    delta: &'a AuditDelta,
}

/// Apply `edit` inside a draft, report the audit delta, then commit and
/// save, or discard when `dry_run` is set.
fn with_draft<F>(config: &Config, project_id: &str, dry_run: bool, edit: F) -> Result<(), CommandError>
where
    F: FnOnce(&mut PlanState) -> Result<String, CommandError>,
{
    let mut plan = load_plan(config)?;
    let before = plan.audit_project(project_id)?;

    plan.enter_draft();
    let action = match edit(&mut plan) {
        Ok(action) => action,
        Err(e) => {
            plan.discard_draft()?;
            return Err(e);
        }
    };
    let after = plan.audit_project(project_id)?;
    let delta = AuditDelta::between(&before, &after);

    if dry_run {
        plan.discard_draft()?;
    } else {
        plan.commit_draft()?;
        save_plan(config, &plan)?;
        info!(%action, "plan updated");
    }

    if config.output_format == OutputFormat::Json {
        return print_json(&DraftReport {
            action,
            saved: !dry_run,
            delta: &delta,
        });
    }

    let c = config.color;
    println!("{} {}", emoji::CLOCK, action);
    for issue in &delta.introduced {
        println!("  {} [{}] {}", emoji::CROSS, color::severity(issue.severity, c), issue.message);
    }
    for issue in &delta.resolved {
        println!("  {} {}", emoji::CHECK, color::success(&issue.message, c));
    }
    if delta.introduced.is_empty() && delta.resolved.is_empty() {
        println!("  no change in planning issues");
    }
    if dry_run {
        println!("{}", color::info("dry run: draft discarded", c));
    } else {
        println!("{}", color::success(&format!("saved {}", config.plan_file.display()), c));
    }
    Ok(())
}

/// Assign a story to a SprintSquad, or unassign it.
pub fn cmd_assign(
    config: &Config,
    story_id: &str,
    sprint_squad_id: Option<&str>,
    dry_run: bool,
) -> Result<(), CommandError> {
    let project_id = {
        let plan = load_plan(config)?;
        plan.story(story_id)
            .map(|s| s.project_id.clone())
            .ok_or_else(|| PlanError::UnknownStory(story_id.to_string()))?
    };

    with_draft(config, &project_id, dry_run, |plan| {
        plan.assign(story_id, sprint_squad_id)?;
        Ok(match sprint_squad_id {
            Some(ss) => format!("assigned {} to {}", story_id, ss),
            None => format!("unassigned {}", story_id),
        })
    })
}

/// Append the next sprint to a project, staffing every squad with the
/// configured default headcount.
pub fn cmd_add_sprint(config: &Config, project: Option<&str>, dry_run: bool) -> Result<(), CommandError> {
    let project_id = target_project(config, &load_plan(config)?, project)?;
    let length = config.sprint_length_days;
    let headcount = config.default_headcount;

    with_draft(config, &project_id, dry_run, |plan| {
        let id = plan.add_next_sprint(&project_id, length, headcount)?;
        Ok(format!("added sprint {} to {}", id, project_id))
    })
}
