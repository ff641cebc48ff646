use serde::Serialize;

use squadplan::audit::{PlanningIssue, Severity};
use squadplan::color::{self, emoji};
use squadplan::config::{Config, OutputFormat};

use super::{load_plan, print_json, selected_projects, CommandError};

#[derive(Serialize)]
struct ProjectIssues<'a> {
    project_id: &'a str,
    issues: Vec<PlanningIssue>,
}

/// Print planning issues per project, high severity first.
pub fn cmd_audit(config: &Config) -> Result<(), CommandError> {
    let plan = load_plan(config)?;
    let mut reports = Vec::new();
    for project in selected_projects(config, &plan)? {
        let mut issues = plan.audit_project(&project.id)?;
        issues.sort_by_key(|i| i.severity);
        reports.push((project, issues));
    }

    if config.output_format == OutputFormat::Json {
        let body: Vec<ProjectIssues> = reports
            .into_iter()
            .map(|(project, issues)| ProjectIssues {
                project_id: &project.id,
                issues,
            })
            .collect();
        return print_json(&body);
    }

    let c = config.color;
    for (project, issues) in &reports {
        println!("{} {} ({})", emoji::TASK, color::label(&project.name, c), project.id);
        if issues.is_empty() {
            println!("  {} {}", emoji::CHECK, color::success("no issues", c));
            continue;
        }
        for issue in issues {
            println!("  [{}] {}", color::severity(issue.severity, c), issue.message);
        }
        let high = issues.iter().filter(|i| i.severity == Severity::High).count();
        println!(
            "  {} issue(s), {} high",
            color::number(issues.len(), c),
            color::number(high, c)
        );
    }
    Ok(())
}
