use std::fs;
use std::path::Path;

use chrono::{Datelike, Duration, Local, NaiveDate};

use squadplan::config::{Config, DEFAULT_CONFIG_FILE};
use squadplan::plan::{PlanDocument, Project, Sprint, SprintSquad, Squad};

use super::CommandError;

/// Write a default squadplan.toml and a starter plan, keeping existing files.
pub fn cmd_init(config: &Config) -> Result<(), CommandError> {
    println!("Initializing squadplan...");

    let config_path = Path::new(DEFAULT_CONFIG_FILE);
    if config_path.exists() {
        println!("  Config already exists: {}", config_path.display());
    } else {
        fs::write(config_path, Config::default_toml()).map_err(|source| CommandError::Io {
            path: config_path.to_path_buf(),
            source,
        })?;
        println!("  Created {}", config_path.display());
    }

    if config.plan_file.exists() {
        println!("  Plan already exists: {}", config.plan_file.display());
    } else {
        starter_plan(config, next_monday(Local::now().date_naive())).save(&config.plan_file)?;
        println!("  Created {}", config.plan_file.display());
    }

    println!("\nRun 'squadplan audit' to check the plan.");
    Ok(())
}

fn next_monday(today: NaiveDate) -> NaiveDate {
    let days = (7 - today.weekday().num_days_from_monday()) % 7;
    today + Duration::days(i64::from(days))
}

/// One project with one sprint and one default-staffed squad.
fn starter_plan(config: &Config, start: NaiveDate) -> PlanDocument {
    let sprint = Sprint::new("S1", "P1", start, start + Duration::days(i64::from(config.sprint_length_days)))
        .with_name("Sprint 1")
        .with_capacity_factor(0.8);
    let sprint_squad = SprintSquad::new(&sprint.id, "Q1", config.default_headcount);
    PlanDocument {
        projects: vec![Project::new("P1", "New project")],
        sprints: vec![sprint],
        squads: vec![Squad::new("Q1", "P1", "Squad 1")],
        sprint_squads: vec![sprint_squad],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_monday() {
        let wednesday = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_eq!(next_monday(wednesday), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(next_monday(monday), monday);
    }

    #[test]
    fn test_starter_plan_is_valid() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let doc = starter_plan(&Config::default(), start);
        doc.validate().unwrap();
        assert_eq!(doc.sprints[0].end, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        assert_eq!(doc.sprint_squads[0].id, "SS-S1-Q1");
    }
}
