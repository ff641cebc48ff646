use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::audit::{self, PlanningIssue, ProjectSummary};
use crate::capacity::{self, CapacityMetric};
use crate::dependency::{self, DependencyViolation};
use crate::error::PlanError;
use crate::role::RoleMap;
use crate::sandbox::{Sandbox, SandboxMode};
use crate::schedule;

use super::model::{Assignment, Project, Sprint, SprintSquad, Squad, Story, TaskSchedule};

/// Sprint length assumed when a SprintSquad's sprint cannot be resolved.
pub const FALLBACK_SPRINT_WORKING_DAYS: u32 = 10;

/// Schedule used when assigning a story the plan does not know.
pub const FALLBACK_SCHEDULE: TaskSchedule = TaskSchedule {
    backend_offset: 0,
    mobile_offset: 0,
    qa_offset: 5,
};

/// The part of a plan covered by draft/commit: staffing and assignments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub sprint_squads: Vec<SprintSquad>,
    pub assignments: Vec<Assignment>,
}

/// One project's slice of the plan, with sprints in sequence order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectView {
    pub project: Project,
    pub stories: Vec<Story>,
    pub sprints: Vec<Sprint>,
    pub squads: Vec<Squad>,
    /// SprintSquads of the project's sprints.
    pub sprint_squads: Vec<SprintSquad>,
    /// Assignments of the project's stories.
    pub assignments: Vec<Assignment>,
    /// Staffing and assignments of the whole plan, so dependencies on
    /// other projects' stories resolve.
    pub plan_allocation: Allocation,
}

impl ProjectView {
    /// Audit against the project's sprint sequence.
    ///
    /// Overloads cover the project's SprintSquads only; dependencies are
    /// looked up across the whole plan.
    pub fn audit(&self) -> Vec<PlanningIssue> {
        audit::audit(
            &self.stories,
            &self.sprints,
            &self.plan_allocation.sprint_squads,
            &self.plan_allocation.assignments,
        )
    }

    pub fn summary(&self) -> ProjectSummary {
        audit::summarize(
            &self.stories,
            &self.sprints,
            &self.plan_allocation.sprint_squads,
            &self.plan_allocation.assignments,
        )
    }

    /// Dependency violations of `story` within the project's sequence.
    pub fn violations(&self, story: &Story) -> Vec<DependencyViolation> {
        dependency::violations(
            story,
            &self.plan_allocation.assignments,
            &self.plan_allocation.sprint_squads,
            &self.sprints,
        )
    }
}

/// All entity collections of a plan.
///
/// Stories, sprints and squads are edited in place. Staffing and
/// assignments live in a [`Sandbox`], so they can be edited as a draft and
/// then committed or discarded.
#[derive(Debug, Clone, Default)]
pub struct PlanState {
    projects: Vec<Project>,
    stories: Vec<Story>,
    sprints: Vec<Sprint>,
    squads: Vec<Squad>,
    allocation: Sandbox<Allocation>,
}

impl PlanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from raw collections, committed, with no draft.
    pub fn from_parts(
        projects: Vec<Project>,
        stories: Vec<Story>,
        sprints: Vec<Sprint>,
        squads: Vec<Squad>,
        allocation: Allocation,
    ) -> Self {
        Self {
            projects,
            stories,
            sprints,
            squads,
            allocation: Sandbox::new(allocation),
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// Every sprint, in sequence order.
    pub fn sprints(&self) -> &[Sprint] {
        &self.sprints
    }

    pub fn squads(&self) -> &[Squad] {
        &self.squads
    }

    /// Live staffing (the draft when one is open).
    pub fn sprint_squads(&self) -> &[SprintSquad] {
        &self.allocation.live().sprint_squads
    }

    /// Live assignments (the draft when one is open).
    pub fn assignments(&self) -> &[Assignment] {
        &self.allocation.live().assignments
    }

    pub fn allocation(&self) -> &Allocation {
        self.allocation.live()
    }

    /// The allocation a discard would restore, regardless of any open
    /// draft.
    ///
    /// This is the committed allocation unless a draft was re-entered
    /// while open; re-entry moves the baseline to the draft as it stood.
    pub fn baseline_allocation(&self) -> &Allocation {
        self.allocation.baseline()
    }

    pub fn mode(&self) -> SandboxMode {
        self.allocation.mode()
    }

    pub fn is_draft(&self) -> bool {
        self.allocation.is_draft()
    }

    pub fn story(&self, id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.id == id)
    }

    pub fn sprint(&self, id: &str) -> Option<&Sprint> {
        self.sprints.iter().find(|s| s.id == id)
    }

    pub fn squad(&self, id: &str) -> Option<&Squad> {
        self.squads.iter().find(|s| s.id == id)
    }

    pub fn sprint_squad(&self, id: &str) -> Option<&SprintSquad> {
        self.sprint_squads().iter().find(|ss| ss.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    // ---------------------------------------------------------------
    // Core commands
    // ---------------------------------------------------------------

    /// Assign `story_id` to `sprint_squad_id`, or unassign it with `None`.
    ///
    /// Any previous assignment of the story is removed. A new assignment
    /// gets the auto-sequenced default schedule. Fails without touching the
    /// plan if the target SprintSquad does not exist.
    pub fn assign(&mut self, story_id: &str, sprint_squad_id: Option<&str>) -> Result<(), PlanError> {
        let schedule = match sprint_squad_id {
            Some(ss_id) => {
                let ss = self
                    .sprint_squad(ss_id)
                    .ok_or_else(|| PlanError::UnknownSprintSquad(ss_id.to_string()))?;
                Some(self.default_schedule(story_id, ss))
            }
            None => None,
        };

        let assignments = &mut self.allocation.live_mut().assignments;
        assignments.retain(|a| a.story_id != story_id);

        if let (Some(ss_id), Some(schedule)) = (sprint_squad_id, schedule) {
            assignments.push(Assignment::new(story_id, ss_id).with_schedule(schedule));
            debug!(story = story_id, sprint_squad = ss_id, "story assigned");
        } else {
            debug!(story = story_id, "story unassigned");
        }
        Ok(())
    }

    fn default_schedule(&self, story_id: &str, ss: &SprintSquad) -> TaskSchedule {
        let working_days = self
            .sprint(&ss.sprint_id)
            .map(Sprint::working_days)
            .unwrap_or(FALLBACK_SPRINT_WORKING_DAYS);
        match self.story(story_id) {
            Some(story) => schedule::auto_schedule(story, working_days),
            None => {
                warn!(story = story_id, "assigning unknown story; using fallback schedule");
                FALLBACK_SCHEDULE
            }
        }
    }

    /// Replace the headcount of a SprintSquad.
    pub fn set_staffing(&mut self, sprint_squad_id: &str, headcount: RoleMap) -> Result<(), PlanError> {
        let ss = self
            .allocation
            .live_mut()
            .sprint_squads
            .iter_mut()
            .find(|ss| ss.id == sprint_squad_id)
            .ok_or_else(|| PlanError::UnknownSprintSquad(sprint_squad_id.to_string()))?;
        ss.headcount = headcount;
        debug!(sprint_squad = sprint_squad_id, "staffing updated");
        Ok(())
    }

    /// Overwrite the schedule of the matching assignment.
    ///
    /// Offsets are stored as given, without bounds checks. Returns whether
    /// an assignment matched.
    pub fn set_task_schedule(&mut self, story_id: &str, sprint_squad_id: &str, schedule: TaskSchedule) -> bool {
        let found = self
            .allocation
            .live_mut()
            .assignments
            .iter_mut()
            .find(|a| a.story_id == story_id && a.sprint_squad_id == sprint_squad_id);
        match found {
            Some(assignment) => {
                assignment.schedule = Some(schedule);
                true
            }
            None => false,
        }
    }

    /// Snapshot staffing and assignments and start editing a draft.
    pub fn enter_draft(&mut self) {
        self.allocation.enter_draft();
    }

    /// Keep the draft as the new baseline.
    pub fn commit_draft(&mut self) -> Result<(), PlanError> {
        self.allocation.commit_draft().map_err(PlanError::from)
    }

    /// Restore staffing and assignments to the snapshot.
    pub fn discard_draft(&mut self) -> Result<(), PlanError> {
        self.allocation.discard_draft().map_err(PlanError::from)
    }

    // ---------------------------------------------------------------
    // Entity editing
    // ---------------------------------------------------------------

    pub fn add_project(&mut self, project: Project) -> Result<(), PlanError> {
        if self.project(&project.id).is_some() {
            return Err(PlanError::DuplicateId(project.id));
        }
        self.projects.push(project);
        Ok(())
    }

    pub fn add_story(&mut self, story: Story) -> Result<(), PlanError> {
        if self.story(&story.id).is_some() {
            return Err(PlanError::DuplicateId(story.id));
        }
        self.stories.push(story);
        Ok(())
    }

    /// Replace a story with the same identifier.
    pub fn update_story(&mut self, story: Story) -> Result<(), PlanError> {
        let slot = self
            .stories
            .iter_mut()
            .find(|s| s.id == story.id)
            .ok_or_else(|| PlanError::UnknownStory(story.id.clone()))?;
        *slot = story;
        Ok(())
    }

    /// Remove a story and its assignment.
    pub fn delete_story(&mut self, story_id: &str) -> Result<Story, PlanError> {
        let index = self
            .stories
            .iter()
            .position(|s| s.id == story_id)
            .ok_or_else(|| PlanError::UnknownStory(story_id.to_string()))?;
        self.allocation
            .live_mut()
            .assignments
            .retain(|a| a.story_id != story_id);
        debug!(story = story_id, "story deleted");
        Ok(self.stories.remove(index))
    }

    /// Append a sprint at the end of the sequence.
    pub fn add_sprint(&mut self, sprint: Sprint) -> Result<(), PlanError> {
        if self.sprint(&sprint.id).is_some() {
            return Err(PlanError::DuplicateId(sprint.id));
        }
        self.sprints.push(sprint);
        Ok(())
    }

    pub fn add_squad(&mut self, squad: Squad) -> Result<(), PlanError> {
        if self.squad(&squad.id).is_some() {
            return Err(PlanError::DuplicateId(squad.id));
        }
        self.squads.push(squad);
        Ok(())
    }

    /// Staff `squad_id` for `sprint_id`. Returns the new SprintSquad id.
    pub fn add_sprint_squad(
        &mut self,
        sprint_id: &str,
        squad_id: &str,
        headcount: RoleMap,
    ) -> Result<String, PlanError> {
        if self.sprint(sprint_id).is_none() {
            return Err(PlanError::UnknownSprint(sprint_id.to_string()));
        }
        if self.squad(squad_id).is_none() {
            return Err(PlanError::UnknownSquad(squad_id.to_string()));
        }
        let ss = SprintSquad::new(sprint_id, squad_id, headcount);
        if self.sprint_squad(&ss.id).is_some() {
            return Err(PlanError::DuplicateId(ss.id));
        }
        let id = ss.id.clone();
        self.allocation.live_mut().sprint_squads.push(ss);
        Ok(id)
    }

    /// Append the next sprint of a project.
    ///
    /// It starts the day after the project's last sprint ends, ends
    /// `length_days` later, inherits the capacity factor, and gets a
    /// SprintSquad with `headcount` for every squad of the project.
    pub fn add_next_sprint(
        &mut self,
        project_id: &str,
        length_days: u32,
        headcount: RoleMap,
    ) -> Result<String, PlanError> {
        self.require_project(project_id)?;
        let last = self
            .project_sprints(project_id)
            .last()
            .cloned()
            .ok_or_else(|| PlanError::NoSprints(project_id.to_string()))?;
        let number = self.project_sprints(project_id).count() + 1;

        let mut id = format!("S{}", number);
        let mut suffix = 1;
        while self.sprint(&id).is_some() {
            suffix += 1;
            id = format!("S{}-{}", number, suffix);
        }

        let start = last.end + Duration::days(1);
        let end = start + Duration::days(i64::from(length_days));
        let sprint = Sprint::new(id.clone(), project_id, start, end)
            .with_name(format!("Sprint {}", number))
            .with_capacity_factor(last.capacity_factor);
        self.sprints.push(sprint);

        let squad_ids: Vec<String> = self
            .squads
            .iter()
            .filter(|sq| sq.project_id == project_id)
            .map(|sq| sq.id.clone())
            .collect();
        let live = self.allocation.live_mut();
        for squad_id in squad_ids {
            live.sprint_squads.push(SprintSquad::new(&id, squad_id, headcount));
        }

        debug!(project = project_id, sprint = %id, %start, %end, "sprint added");
        Ok(id)
    }

    /// Remove the project's last sprint with its staffing and assignments.
    ///
    /// A project always keeps at least one sprint.
    pub fn delete_last_sprint(&mut self, project_id: &str) -> Result<Sprint, PlanError> {
        self.require_project(project_id)?;
        if self.project_sprints(project_id).count() <= 1 {
            return Err(PlanError::LastSprint(project_id.to_string()));
        }
        let index = self
            .sprints
            .iter()
            .rposition(|s| s.project_id == project_id)
            .ok_or_else(|| PlanError::NoSprints(project_id.to_string()))?;
        let sprint = self.sprints.remove(index);

        let live = self.allocation.live_mut();
        let removed: Vec<String> = live
            .sprint_squads
            .iter()
            .filter(|ss| ss.sprint_id == sprint.id)
            .map(|ss| ss.id.clone())
            .collect();
        live.assignments.retain(|a| !removed.contains(&a.sprint_squad_id));
        live.sprint_squads.retain(|ss| ss.sprint_id != sprint.id);

        debug!(project = project_id, sprint = %sprint.id, "last sprint deleted");
        Ok(sprint)
    }

    /// Set the capacity factor of every sprint of a project.
    pub fn set_capacity_factor(&mut self, project_id: &str, factor: f64) -> Result<(), PlanError> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(PlanError::InvalidCapacityFactor(factor));
        }
        self.require_project(project_id)?;
        for sprint in self.sprints.iter_mut().filter(|s| s.project_id == project_id) {
            sprint.capacity_factor = factor;
        }
        Ok(())
    }

    /// Re-run the auto-sequencer for every assignment of a SprintSquad.
    ///
    /// Does nothing if the SprintSquad or its sprint cannot be resolved.
    /// Assignments whose story is unknown keep their schedule.
    pub fn reschedule_sprint_squad(&mut self, sprint_squad_id: &str) {
        let Some(working_days) = self
            .sprint_squad(sprint_squad_id)
            .and_then(|ss| self.sprint(&ss.sprint_id))
            .map(Sprint::working_days)
        else {
            return;
        };

        let stories = &self.stories;
        for assignment in self
            .allocation
            .live_mut()
            .assignments
            .iter_mut()
            .filter(|a| a.sprint_squad_id == sprint_squad_id)
        {
            if let Some(story) = stories.iter().find(|s| s.id == assignment.story_id) {
                assignment.schedule = Some(schedule::auto_schedule(story, working_days));
            }
        }
    }

    fn require_project(&self, project_id: &str) -> Result<(), PlanError> {
        match self.project(project_id) {
            Some(_) => Ok(()),
            None => Err(PlanError::UnknownProject(project_id.to_string())),
        }
    }

    // ---------------------------------------------------------------
    // Derived views
    // ---------------------------------------------------------------

    fn project_sprints<'a>(&'a self, project_id: &'a str) -> impl Iterator<Item = &'a Sprint> + 'a {
        self.sprints.iter().filter(move |s| s.project_id == project_id)
    }

    /// The project's slice of the plan.
    pub fn project_view(&self, project_id: &str) -> Result<ProjectView, PlanError> {
        let project = self
            .project(project_id)
            .cloned()
            .ok_or_else(|| PlanError::UnknownProject(project_id.to_string()))?;
        let stories: Vec<Story> = self
            .stories
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        let sprints: Vec<Sprint> = self.project_sprints(project_id).cloned().collect();
        let squads = self
            .squads
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        let sprint_squads = self
            .sprint_squads()
            .iter()
            .filter(|ss| sprints.iter().any(|s| s.id == ss.sprint_id))
            .cloned()
            .collect();
        let assignments = self
            .assignments()
            .iter()
            .filter(|a| stories.iter().any(|s| s.id == a.story_id))
            .cloned()
            .collect();

        Ok(ProjectView {
            project,
            stories,
            sprints,
            squads,
            sprint_squads,
            assignments,
            plan_allocation: self.allocation().clone(),
        })
    }

    /// Audit one project against its own sprint sequence.
    pub fn audit_project(&self, project_id: &str) -> Result<Vec<PlanningIssue>, PlanError> {
        Ok(self.project_view(project_id)?.audit())
    }

    pub fn summarize_project(&self, project_id: &str) -> Result<ProjectSummary, PlanError> {
        Ok(self.project_view(project_id)?.summary())
    }

    /// Stories of a project with no assignment.
    pub fn unassigned_stories(&self, project_id: &str) -> Vec<&Story> {
        self.stories
            .iter()
            .filter(|s| s.project_id == project_id)
            .filter(|s| self.assignment_for_story(&s.id).is_none())
            .collect()
    }

    pub fn stories_for_sprint_squad(&self, sprint_squad_id: &str) -> Vec<&Story> {
        audit::assigned_stories(sprint_squad_id, &self.stories, self.assignments())
    }

    pub fn assignment_for_story(&self, story_id: &str) -> Option<&Assignment> {
        self.assignments().iter().find(|a| a.story_id == story_id)
    }

    /// Capacity metric of one SprintSquad, if it and its sprint resolve.
    pub fn metrics_for(&self, sprint_squad_id: &str) -> Option<CapacityMetric> {
        let ss = self.sprint_squad(sprint_squad_id)?;
        let sprint = self.sprint(&ss.sprint_id)?;
        Some(capacity::metrics(sprint, ss, self.stories_for_sprint_squad(sprint_squad_id)))
    }

    /// Audit every collection at once, across projects.
    ///
    /// Sprint positions then span all projects; prefer
    /// [`ProjectView::audit`] when sprint order matters per project.
    pub fn audit(&self) -> Vec<PlanningIssue> {
        audit::audit(&self.stories, &self.sprints, self.sprint_squads(), self.assignments())
    }
}
