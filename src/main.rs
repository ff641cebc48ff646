use std::process;

use tracing::debug;

use squadplan::config::{self, Command, Config};
use squadplan::logging;

mod commands;

use commands::CommandError;

fn main() {
    let cli = match config::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    logging::init_logging(&config);
    debug!(command = cli.command.name(), plan = %config.plan_file.display(), "starting");

    if let Err(e) = run(&config, &cli.command) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(config: &Config, command: &Command) -> Result<(), CommandError> {
    match command {
        Command::Audit => commands::cmd_audit(config),
        Command::Metrics { sprint, squad } => {
            commands::cmd_metrics(config, sprint.as_deref(), squad.as_deref())
        }
        Command::Deps { story } => commands::cmd_deps(config, story),
        Command::Schedule { sprint_squad } => commands::cmd_schedule(config, sprint_squad),
        Command::Summary => commands::cmd_summary(config),
        Command::Assign {
            story,
            sprint_squad,
            dry_run,
        } => commands::cmd_assign(config, story, sprint_squad.as_deref(), *dry_run),
        Command::AddSprint { project_id, dry_run } => {
            commands::cmd_add_sprint(config, project_id.as_deref(), *dry_run)
        }
        Command::Init => commands::cmd_init(config),
    }
}
