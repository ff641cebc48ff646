//! Default intra-sprint sequencing.
//!
//! Work is handed over in a fixed order: backend first, then the mobile
//! track (Android and iOS in parallel), then QA. Offsets are clamped to the
//! sprint's last working day; a story longer than the sprint is truncated,
//! not rejected. Other stories in the same SprintSquad are not considered.

use serde::Serialize;

use crate::plan::{Story, TaskSchedule};

/// One of the three sequenced tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Backend,
    Mobile,
    Qa,
}

impl Track {
    pub const ALL: [Track; 3] = [Track::Backend, Track::Mobile, Track::Qa];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Mobile => "mobile",
            Self::Qa => "qa",
        }
    }
}

/// Placement of a track inside a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackSpan {
    pub track: Track,
    /// First working day (0-based).
    pub start: u32,
    /// Length in working days, clipped to the sprint.
    pub width: f64,
}

impl TrackSpan {
    /// True when the span has no work.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0
    }
}

/// Backend track length in whole days, saturating at `u32::MAX`.
pub fn backend_duration(story: &Story) -> u32 {
    story.estimate.backend.max(0.0).ceil() as u32
}

/// Mobile track length in whole days: the longer of Android and iOS.
pub fn mobile_duration(story: &Story) -> u32 {
    story.estimate.android.max(story.estimate.ios).max(0.0).ceil() as u32
}

/// Build the default handover schedule for `story` in a sprint of
/// `sprint_working_days` days.
pub fn auto_schedule(story: &Story, sprint_working_days: u32) -> TaskSchedule {
    let last_day = sprint_working_days.saturating_sub(1);

    let backend_offset: u32 = 0;
    let mobile_offset = backend_offset
        .saturating_add(backend_duration(story))
        .min(last_day);
    let qa_offset = mobile_offset
        .saturating_add(mobile_duration(story))
        .min(last_day);

    TaskSchedule {
        backend_offset,
        mobile_offset,
        qa_offset,
    }
}

impl TaskSchedule {
    /// Spans of the three tracks for `story` under this schedule.
    ///
    /// Backend and mobile widths use the ceiled track durations; the QA
    /// width is the raw QA estimate. Each width is clipped to the sprint.
    pub fn tracks(&self, story: &Story, sprint_working_days: u32) -> [TrackSpan; 3] {
        let days = f64::from(sprint_working_days);
        let clip = |w: f64| w.max(0.0).min(days);
        [
            TrackSpan {
                track: Track::Backend,
                start: self.backend_offset,
                width: clip(f64::from(backend_duration(story))),
            },
            TrackSpan {
                track: Track::Mobile,
                start: self.mobile_offset,
                width: clip(f64::from(mobile_duration(story))),
            },
            TrackSpan {
                track: Track::Qa,
                start: self.qa_offset,
                width: clip(story.estimate.qa),
            },
        ]
    }

    /// True when every offset falls inside a sprint of the given length.
    pub fn fits(&self, sprint_working_days: u32) -> bool {
        [self.backend_offset, self.mobile_offset, self.qa_offset]
            .iter()
            .all(|&o| o < sprint_working_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::RoleMap;
    use proptest::prelude::*;

    fn story(backend: f64, android: f64, ios: f64, qa: f64) -> Story {
        Story::new("A", "P1", "A").with_estimate(RoleMap::new(backend, android, ios, qa, 0.0))
    }

    #[test]
    fn test_handover_order() {
        let schedule = auto_schedule(&story(3.0, 5.0, 2.0, 2.0), 10);
        assert_eq!(schedule, TaskSchedule::new(0, 3, 8));
    }

    #[test]
    fn test_fractional_estimates_round_up() {
        let schedule = auto_schedule(&story(1.5, 0.5, 2.1, 0.0), 10);
        assert_eq!(schedule, TaskSchedule::new(0, 2, 5));
    }

    #[test]
    fn test_overflow_clamps_to_last_day() {
        let schedule = auto_schedule(&story(15.0, 20.0, 20.0, 20.0), 10);
        assert_eq!(schedule, TaskSchedule::new(0, 9, 9));
        assert!(schedule.fits(10));
    }

    #[test]
    fn test_zero_day_sprint_pins_to_day_zero() {
        let schedule = auto_schedule(&story(3.0, 5.0, 2.0, 2.0), 0);
        assert_eq!(schedule, TaskSchedule::new(0, 0, 0));
    }

    #[test]
    fn test_mobile_only_story_starts_immediately() {
        let schedule = auto_schedule(&story(0.0, 12.0, 12.0, 0.0), 10);
        assert_eq!(schedule, TaskSchedule::new(0, 0, 9));
    }

    #[test]
    fn test_huge_estimates_clamp() {
        let schedule = auto_schedule(&story(3.0, 1e10, 0.0, 0.0), 10);
        assert_eq!(schedule, TaskSchedule::new(0, 3, 9));

        let schedule = auto_schedule(&story(f64::MAX, f64::MAX, 0.0, 0.0), 10);
        assert_eq!(schedule, TaskSchedule::new(0, 9, 9));
    }

    #[test]
    fn test_non_finite_estimates() {
        let schedule = auto_schedule(&story(f64::INFINITY, 2.0, 0.0, 0.0), 10);
        assert_eq!(schedule, TaskSchedule::new(0, 9, 9));

        let schedule = auto_schedule(&story(f64::NAN, 2.0, 0.0, 0.0), 10);
        assert_eq!(schedule, TaskSchedule::new(0, 0, 2));
    }

    #[test]
    fn test_tracks() {
        let s = story(3.0, 5.0, 2.0, 12.0);
        let schedule = auto_schedule(&s, 10);
        let [be, mob, qa] = schedule.tracks(&s, 10);
        assert_eq!((be.start, be.width), (0, 3.0));
        assert_eq!((mob.start, mob.width), (3, 5.0));
        assert_eq!((qa.track, qa.start, qa.width), (Track::Qa, 8, 10.0));
    }

    #[test]
    fn test_fits_rejects_manual_overflow() {
        assert!(!TaskSchedule::new(0, 4, 12).fits(10));
    }

    proptest! {
        #[test]
        fn prop_auto_schedule_fits_and_is_ordered(
            backend in 0.0f64..40.0,
            android in 0.0f64..40.0,
            ios in 0.0f64..40.0,
            days in 1u32..30,
        ) {
            let schedule = auto_schedule(&story(backend, android, ios, 0.0), days);
            prop_assert!(schedule.fits(days));
            prop_assert_eq!(schedule.backend_offset, 0);
            prop_assert!(schedule.mobile_offset <= schedule.qa_offset);
        }

        #[test]
        fn prop_auto_schedule_clamps_any_estimate(
            backend in 0.0f64..=f64::MAX,
            android in 0.0f64..=f64::MAX,
            ios in 0.0f64..=f64::MAX,
            days in 0u32..30,
        ) {
            let schedule = auto_schedule(&story(backend, android, ios, 0.0), days);
            let last_day = days.saturating_sub(1);
            prop_assert!(schedule.mobile_offset <= last_day);
            prop_assert!(schedule.qa_offset <= last_day);
            prop_assert!(schedule.mobile_offset <= schedule.qa_offset);
        }
    }
}
