//! squadplan: sprint capacity planning for cross-functional squads.
//!
//! A plan is a set of stories with per-role effort estimates, a sequence of
//! sprints, and squads staffed per sprint. The engine computes capacity
//! metrics, checks dependency timing, audits the plan for overloads and
//! violations, proposes intra-sprint schedules, and lets staffing and
//! assignments be edited as a draft that is committed or discarded.
//!
//! ## Layout
//!
//! - [`calendar`] - working-day arithmetic
//! - [`capacity`] - available versus assigned mandays per SprintSquad
//! - [`dependency`] - dependency timing checks
//! - [`audit`] - planning issues and project summaries
//! - [`schedule`] - default backend → mobile → QA sequencing
//! - [`sandbox`] - committed/draft container
//! - [`plan`] - entities, [`plan::PlanState`] and plan documents
//! - [`config`] - `squadplan.toml`, env and CLI configuration

pub mod audit;
pub mod calendar;
pub mod capacity;
pub mod color;
pub mod config;
pub mod dependency;
pub mod error;
pub mod logging;
pub mod plan;
pub mod role;
pub mod sandbox;
pub mod schedule;
#[doc(hidden)]
pub mod testutil;
