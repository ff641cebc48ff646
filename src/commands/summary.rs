use serde::Serialize;

use squadplan::audit::ProjectSummary;
use squadplan::color::{self, emoji};
use squadplan::config::{Config, OutputFormat};

use super::{load_plan, print_json, selected_projects, CommandError};

#[derive(Serialize)]
struct SummaryRow<'a> {
    project_id: &'a str,
    name: &'a str,
    #[serde(flatten)]
    summary: ProjectSummary,
}

/// Print the headline figures of each project.
pub fn cmd_summary(config: &Config) -> Result<(), CommandError> {
    let plan = load_plan(config)?;
    let mut rows = Vec::new();
    for project in selected_projects(config, &plan)? {
        rows.push(SummaryRow {
            project_id: &project.id,
            name: &project.name,
            summary: plan.summarize_project(&project.id)?,
        });
    }

    if config.output_format == OutputFormat::Json {
        return print_json(&rows);
    }

    let c = config.color;
    for row in &rows {
        let s = &row.summary;
        println!("{} {} ({})", emoji::TASK, color::label(row.name, c), row.project_id);
        println!(
            "  Stories:     {} ({} assigned)",
            color::number(s.story_count, c),
            color::number(s.assigned_count, c)
        );
        println!("  Utilization: {}", color::utilization(s.average_utilization, c));
        let critical = if s.critical_count > 0 {
            format!("{} {}", emoji::FIRE, color::warning(&s.critical_count.to_string(), c))
        } else {
            color::success("0", c)
        };
        println!("  Critical:    {} of {} issue(s)", critical, s.issue_count);
    }
    Ok(())
}
