use serde::Serialize;

use squadplan::capacity::{CapacityMetric, UtilizationBand};
use squadplan::color::{self, emoji};
use squadplan::config::{Config, OutputFormat};
use squadplan::role::{Role, RoleMap};

use super::{load_plan, print_json, selected_projects, CommandError};

#[derive(Serialize)]
struct MetricRow {
    sprint_squad_id: String,
    sprint_id: String,
    squad_id: String,
    band: UtilizationBand,
    /// Available minus assigned mandays; negative when overbooked.
    remaining: RoleMap,
    #[serde(flatten)]
    metric: CapacityMetric,
}

/// Print the capacity metric of each SprintSquad, optionally filtered by
/// sprint and squad.
pub fn cmd_metrics(config: &Config, sprint: Option<&str>, squad: Option<&str>) -> Result<(), CommandError> {
    let plan = load_plan(config)?;

    let mut rows = Vec::new();
    for project in selected_projects(config, &plan)? {
        let view = plan.project_view(&project.id)?;
        for s in &view.sprints {
            if sprint.is_some_and(|id| id != s.id) {
                continue;
            }
            for ss in view.sprint_squads.iter().filter(|ss| ss.sprint_id == s.id) {
                if squad.is_some_and(|id| id != ss.squad_id) {
                    continue;
                }
                let Some(metric) = plan.metrics_for(&ss.id) else {
                    continue;
                };
                rows.push(MetricRow {
                    sprint_squad_id: ss.id.clone(),
                    sprint_id: s.id.clone(),
                    squad_id: ss.squad_id.clone(),
                    band: metric.band(),
                    remaining: metric.remaining(),
                    metric,
                });
            }
        }
    }

    if config.output_format == OutputFormat::Json {
        return print_json(&rows);
    }

    let c = config.color;
    if rows.is_empty() {
        println!("{} no sprint squads match", emoji::WARNING);
        return Ok(());
    }

    let header: Vec<String> = Role::ALL.iter().map(|r| format!("{:>12}", r.label())).collect();
    println!("{} {:<20} {}  {:>6}", emoji::TEAM, "sprint squad", header.join(""), "total");
    for row in &rows {
        let cells: Vec<String> = Role::ALL
            .iter()
            .map(|&role| {
                let cell = format!(
                    "{:.1}/{:.1}",
                    row.metric.assigned.get(role),
                    row.metric.available.get(role)
                );
                format!("{:>12}", cell)
            })
            .collect();
        println!(
            "   {:<20} {}  {:>6}",
            row.sprint_squad_id,
            cells.join(""),
            color::utilization(row.metric.total_utilization, c)
        );
    }
    Ok(())
}
