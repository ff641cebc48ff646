use serde::Serialize;

use squadplan::color::{self, emoji};
use squadplan::config::{Config, OutputFormat};
use squadplan::dependency::{DependencyViolation, ViolationKind};
use squadplan::error::PlanError;

use super::{load_plan, print_json, CommandError};

#[derive(Serialize)]
struct DepsReport<'a> {
    story_id: &'a str,
    sprint_squad_id: Option<&'a str>,
    dependencies: &'a [String],
    violations: Vec<DependencyViolation>,
}

/// Print the dependency violations of one story.
pub fn cmd_deps(config: &Config, story_id: &str) -> Result<(), CommandError> {
    let plan = load_plan(config)?;
    let story = plan
        .story(story_id)
        .ok_or_else(|| PlanError::UnknownStory(story_id.to_string()))?;
    let view = plan.project_view(&story.project_id)?;
    let violations = view.violations(story);
    let placed = plan.assignment_for_story(story_id).map(|a| a.sprint_squad_id.as_str());

    if config.output_format == OutputFormat::Json {
        return print_json(&DepsReport {
            story_id,
            sprint_squad_id: placed,
            dependencies: &story.dependencies,
            violations,
        });
    }

    let c = config.color;
    println!(
        "{} {} {} ({})",
        emoji::LINK,
        color::label(&story.id, c),
        story.title,
        placed.unwrap_or("unassigned")
    );
    if story.dependencies.is_empty() {
        println!("  no dependencies");
        return Ok(());
    }
    if placed.is_none() {
        println!("  {}", color::info("unassigned stories make no timing claim", c));
    }
    for dep in &story.dependencies {
        let state = match violations.iter().find(|v| &v.dependency_id == dep) {
            Some(v) if v.kind == ViolationKind::Unassigned => color::warning("not scheduled", c),
            Some(_) => color::warning("scheduled later", c),
            None => color::success("ok", c),
        };
        println!("  {} {}", dep, state);
    }
    Ok(())
}
