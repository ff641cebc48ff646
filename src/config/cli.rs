use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::types::OutputFormat;

/// CLI arguments parsed from the command line.
#[derive(Debug, Parser)]
#[command(name = "squadplan", version, about = "Sprint capacity planning for cross-functional squads")]
pub struct CliArgs {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (default: squadplan.toml).
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Plan document (.toml or .json).
    #[arg(short, long, global = true, value_name = "PATH")]
    pub plan: Option<PathBuf>,

    /// Restrict reports to one project.
    #[arg(short = 'P', long, global = true, value_name = "ID")]
    pub project: Option<String>,

    /// Output format.
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Disable ANSI colors.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// squadplan subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List planning issues, high severity first.
    Audit,
    /// Show capacity per SprintSquad.
    Metrics {
        /// Only SprintSquads of this sprint.
        #[arg(long)]
        sprint: Option<String>,
        /// Only SprintSquads of this squad.
        #[arg(long)]
        squad: Option<String>,
    },
    /// Show the dependency violations of one story.
    Deps {
        story: String,
    },
    /// Show the intra-sprint timeline of a SprintSquad.
    Schedule {
        sprint_squad: String,
    },
    /// Show per-project totals.
    Summary,
    /// Assign a story (or unassign it when no SprintSquad is given).
    Assign {
        story: String,
        sprint_squad: Option<String>,
        /// Show the effect without saving.
        #[arg(long)]
        dry_run: bool,
    },
    /// Append the next sprint to a project.
    AddSprint {
        /// Project to extend (default: the only project).
        #[arg(value_name = "PROJECT")]
        project_id: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Write a default squadplan.toml.
    Init,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Audit => "audit",
            Self::Metrics { .. } => "metrics",
            Self::Deps { .. } => "deps",
            Self::Schedule { .. } => "schedule",
            Self::Summary => "summary",
            Self::Assign { .. } => "assign",
            Self::AddSprint { .. } => "add-sprint",
            Self::Init => "init",
        }
    }
}

/// Parse CLI arguments from an iterator whose first item is the program name.
pub fn parse_args<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(args)
}
