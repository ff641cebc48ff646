use chrono::NaiveDate;
use serde::Serialize;

use squadplan::calendar;
use squadplan::color::{self, emoji};
use squadplan::config::{Config, OutputFormat};
use squadplan::error::PlanError;
use squadplan::schedule::TrackSpan;

use super::{load_plan, print_json, CommandError};

#[derive(Serialize)]
struct StoryTimeline {
    story_id: String,
    title: String,
    fits: bool,
    tracks: Vec<TrackRow>,
}

#[derive(Serialize)]
struct TrackRow {
    #[serde(flatten)]
    span: TrackSpan,
    /// Calendar date of the track's first working day.
    start_date: Option<NaiveDate>,
}

/// Print the intra-sprint timeline of every story in a SprintSquad.
pub fn cmd_schedule(config: &Config, sprint_squad_id: &str) -> Result<(), CommandError> {
    let plan = load_plan(config)?;
    let ss = plan
        .sprint_squad(sprint_squad_id)
        .ok_or_else(|| PlanError::UnknownSprintSquad(sprint_squad_id.to_string()))?;
    let sprint = plan
        .sprint(&ss.sprint_id)
        .ok_or_else(|| PlanError::UnknownSprint(ss.sprint_id.clone()))?;
    let days = sprint.working_days();

    let mut timelines = Vec::new();
    for story in plan.stories_for_sprint_squad(sprint_squad_id) {
        let Some(schedule) = plan.assignment_for_story(&story.id).and_then(|a| a.schedule) else {
            continue;
        };
        let tracks = schedule
            .tracks(story, days)
            .into_iter()
            .map(|span| TrackRow {
                start_date: calendar::offset_date(sprint.start, sprint.end, span.start),
                span,
            })
            .collect();
        timelines.push(StoryTimeline {
            story_id: story.id.clone(),
            title: story.title.clone(),
            fits: schedule.fits(days),
            tracks,
        });
    }

    if config.output_format == OutputFormat::Json {
        return print_json(&timelines);
    }

    let c = config.color;
    println!(
        "{} {} {} {}..{} ({} working days)",
        emoji::SPRINT,
        color::label(&ss.id, c),
        sprint.name,
        sprint.start,
        sprint.end,
        color::number(days, c)
    );
    if timelines.is_empty() {
        println!("  no scheduled stories");
    }
    for timeline in &timelines {
        let flag = if timeline.fits { "" } else { emoji::WARNING };
        println!("  {} {} {}", color::label(&timeline.story_id, c), timeline.title, flag);
        for row in timeline.tracks.iter().filter(|r| !r.span.is_empty()) {
            let date = row
                .start_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "beyond sprint".to_string());
            println!(
                "    {:<8} day {:>2} {} {:.1}d",
                row.span.track.as_str(),
                row.span.start,
                color::dim(&date, c),
                row.span.width
            );
        }
    }
    Ok(())
}
