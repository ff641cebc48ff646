pub mod assign;
pub mod audit;
pub mod deps;
pub mod init;
pub mod metrics;
pub mod schedule;
pub mod summary;

pub use assign::{cmd_add_sprint, cmd_assign};
pub use audit::cmd_audit;
pub use deps::cmd_deps;
pub use init::cmd_init;
pub use metrics::cmd_metrics;
pub use schedule::cmd_schedule;
pub use summary::cmd_summary;

use serde::Serialize;
use tracing::debug;

use squadplan::config::Config;
use squadplan::error::PlanError;
use squadplan::plan::{DocumentError, PlanDocument, PlanState, Project};

/// Errors surfaced by subcommands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Usage(String),
}

/// Load the configured plan document.
pub fn load_plan(config: &Config) -> Result<PlanState, CommandError> {
    let doc = PlanDocument::load(&config.plan_file)?;
    Ok(doc.into_state())
}

/// Write the committed plan back to the configured document.
pub fn save_plan(config: &Config, plan: &PlanState) -> Result<(), CommandError> {
    PlanDocument::from_state(plan).save(&config.plan_file)?;
    debug!(path = %config.plan_file.display(), "plan saved");
    Ok(())
}

/// Projects a report covers: the configured one, or all of them.
pub fn selected_projects<'a>(config: &Config, plan: &'a PlanState) -> Result<Vec<&'a Project>, CommandError> {
    match config.project {
        Some(ref id) => plan
            .project(id)
            .map(|p| vec![p])
            .ok_or_else(|| PlanError::UnknownProject(id.clone()).into()),
        None => Ok(plan.projects().iter().collect()),
    }
}

/// The single project a mutating command applies to.
pub fn target_project(config: &Config, plan: &PlanState, explicit: Option<&str>) -> Result<String, CommandError> {
    if let Some(id) = explicit.or(config.project.as_deref()) {
        return plan
            .project(id)
            .map(|p| p.id.clone())
            .ok_or_else(|| PlanError::UnknownProject(id.to_string()).into());
    }
    match plan.projects() {
        [only] => Ok(only.id.clone()),
        [] => Err(CommandError::Usage("plan has no projects".to_string())),
        _ => Err(CommandError::Usage(
            "plan has several projects; pass --project <ID>".to_string(),
        )),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
