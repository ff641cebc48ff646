//! Capacity metrics for one SprintSquad.

use serde::Serialize;
use tracing::trace;

use crate::plan::{Sprint, SprintSquad, Story};
use crate::role::RoleMap;

/// Available versus assigned mandays for one SprintSquad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityMetric {
    /// Headcount times effective sprint days.
    pub available: RoleMap,
    /// Sum of the estimates of the stories considered.
    pub assigned: RoleMap,
    /// `assigned / available * 100` per role; 0 where nothing is available.
    pub utilization: RoleMap,
    /// Total assigned over total available, as a percentage.
    pub total_utilization: f64,
}

impl CapacityMetric {
    /// Utilization band of the aggregate figure.
    pub fn band(&self) -> UtilizationBand {
        UtilizationBand::classify(self.total_utilization)
    }

    /// Mandays still free per role (negative when overbooked).
    pub fn remaining(&self) -> RoleMap {
        self.available.zip_with(&self.assigned, |a, s| a - s)
    }
}

fn percent(assigned: f64, available: f64) -> f64 {
    if available > 0.0 {
        assigned / available * 100.0
    } else {
        0.0
    }
}

/// Compute the capacity metric of `sprint_squad` in `sprint`.
///
/// `stories` must be exactly the stories assigned to the SprintSquad; no
/// filtering happens here.
pub fn metrics<'a, I>(sprint: &Sprint, sprint_squad: &SprintSquad, stories: I) -> CapacityMetric
where
    I: IntoIterator<Item = &'a Story>,
{
    let effective_days = sprint.effective_days();
    let available = sprint_squad.headcount.map(|h| h * effective_days);
    let assigned = stories
        .into_iter()
        .fold(RoleMap::ZERO, |acc, story| acc + story.estimate);
    let utilization = assigned.zip_with(&available, percent);
    let total_utilization = percent(assigned.total(), available.total());

    trace!(
        sprint_squad = %sprint_squad.id,
        effective_days,
        total_utilization,
        "computed capacity metric"
    );

    CapacityMetric {
        available,
        assigned,
        utilization,
        total_utilization,
    }
}

/// Reporting band for a utilization percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationBand {
    /// Above 110%.
    Overloaded,
    /// At least 91%, or between 50% (inclusive) and 70% (exclusive).
    Warning,
    /// 70% to 90%, inclusive.
    Healthy,
    /// Everything else, including 0%.
    Idle,
}

impl UtilizationBand {
    pub fn classify(utilization: f64) -> Self {
        if utilization > 110.0 {
            Self::Overloaded
        } else if utilization >= 91.0 || (50.0..70.0).contains(&utilization) {
            Self::Warning
        } else if (70.0..=90.0).contains(&utilization) {
            Self::Healthy
        } else {
            Self::Idle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overloaded => "overloaded",
            Self::Warning => "warning",
            Self::Healthy => "healthy",
            Self::Idle => "idle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn ten_day_sprint(factor: f64) -> Sprint {
        // Monday 2024-03-04 to Friday 2024-03-15: ten working days.
        Sprint::new(
            "S1",
            "P1",
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        )
        .with_capacity_factor(factor)
    }

    fn story(id: &str, estimate: RoleMap) -> Story {
        Story::new(id, "P1", id).with_estimate(estimate)
    }

    #[test]
    fn test_backend_overload_is_125_percent() {
        let sprint = ten_day_sprint(1.0);
        let ss = SprintSquad::new("S1", "Q1", RoleMap::new(2.0, 0.0, 0.0, 0.0, 0.0));
        let stories = [story("A", RoleMap::new(25.0, 0.0, 0.0, 0.0, 0.0))];

        let m = metrics(&sprint, &ss, &stories);
        assert_eq!(m.available.backend, 20.0);
        assert_eq!(m.assigned.backend, 25.0);
        assert!((m.utilization.backend - 125.0).abs() < 1e-9);
        assert!((m.total_utilization - 125.0).abs() < 1e-9);
        assert_eq!(m.band(), UtilizationBand::Overloaded);
    }

    #[test]
    fn test_total_is_ratio_of_sums_not_mean_of_ratios() {
        let sprint = ten_day_sprint(1.0);
        // 10 backend mandays available, 30 android.
        let ss = SprintSquad::new("S1", "Q1", RoleMap::new(1.0, 3.0, 0.0, 0.0, 0.0));
        let stories = [story("A", RoleMap::new(10.0, 0.0, 0.0, 0.0, 0.0))];

        let m = metrics(&sprint, &ss, &stories);
        assert_eq!(m.utilization.backend, 100.0);
        assert_eq!(m.utilization.android, 0.0);
        assert!((m.total_utilization - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_capacity_factor_yields_zero() {
        let sprint = ten_day_sprint(0.0);
        let ss = SprintSquad::new("S1", "Q1", RoleMap::splat(3.0));
        let stories = [story("A", RoleMap::splat(5.0))];

        let m = metrics(&sprint, &ss, &stories);
        assert_eq!(m.total_utilization, 0.0);
        assert_eq!(m.utilization, RoleMap::ZERO);
        assert_eq!(m.assigned, RoleMap::splat(5.0));
    }

    #[test]
    fn test_zero_headcount_role_has_zero_utilization() {
        let sprint = ten_day_sprint(1.0);
        let ss = SprintSquad::new("S1", "Q1", RoleMap::new(1.0, 0.0, 0.0, 0.0, 0.0));
        let stories = [story("A", RoleMap::new(0.0, 4.0, 0.0, 0.0, 0.0))];

        let m = metrics(&sprint, &ss, &stories);
        assert_eq!(m.utilization.android, 0.0);
        assert!((m.total_utilization - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_stories() {
        let sprint = ten_day_sprint(0.8);
        let ss = SprintSquad::new("S1", "Q1", RoleMap::splat(1.0));
        let m = metrics(&sprint, &ss, std::iter::empty());
        assert_eq!(m.assigned, RoleMap::ZERO);
        assert_eq!(m.total_utilization, 0.0);
        assert_eq!(m.available, RoleMap::splat(8.0));
        assert_eq!(m.band(), UtilizationBand::Idle);
    }

    #[test]
    fn test_remaining() {
        let sprint = ten_day_sprint(1.0);
        let ss = SprintSquad::new("S1", "Q1", RoleMap::new(1.0, 0.0, 0.0, 0.0, 0.0));
        let stories = [story("A", RoleMap::new(12.0, 0.0, 0.0, 0.0, 0.0))];
        let m = metrics(&sprint, &ss, &stories);
        assert_eq!(m.remaining().backend, -2.0);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(UtilizationBand::classify(0.0), UtilizationBand::Idle);
        assert_eq!(UtilizationBand::classify(49.9), UtilizationBand::Idle);
        assert_eq!(UtilizationBand::classify(50.0), UtilizationBand::Warning);
        assert_eq!(UtilizationBand::classify(69.9), UtilizationBand::Warning);
        assert_eq!(UtilizationBand::classify(70.0), UtilizationBand::Healthy);
        assert_eq!(UtilizationBand::classify(90.0), UtilizationBand::Healthy);
        assert_eq!(UtilizationBand::classify(90.5), UtilizationBand::Idle);
        assert_eq!(UtilizationBand::classify(91.0), UtilizationBand::Warning);
        assert_eq!(UtilizationBand::classify(110.0), UtilizationBand::Warning);
        assert_eq!(UtilizationBand::classify(110.1), UtilizationBand::Overloaded);
    }

    proptest! {
        #[test]
        fn prop_backend_utilization_is_exact_ratio(
            headcount in 0.5f64..10.0,
            factor in 0.1f64..=1.0,
            estimate in 0.0f64..200.0,
        ) {
            let sprint = ten_day_sprint(factor);
            let ss = SprintSquad::new("S1", "Q1", RoleMap::new(headcount, 0.0, 0.0, 0.0, 0.0));
            let stories = [story("A", RoleMap::new(estimate, 0.0, 0.0, 0.0, 0.0))];
            let m = metrics(&sprint, &ss, &stories);

            let available = headcount * 10.0 * factor;
            prop_assert!((m.available.backend - available).abs() < 1e-9);
            prop_assert!((m.utilization.backend - 100.0 * estimate / available).abs() < 1e-6);
        }

        #[test]
        fn prop_zero_headcount_never_divides(estimate in 0.0f64..500.0, factor in 0.0f64..=1.0) {
            let sprint = ten_day_sprint(factor);
            let ss = SprintSquad::new("S1", "Q1", RoleMap::ZERO);
            let stories = [story("A", RoleMap::splat(estimate))];
            let m = metrics(&sprint, &ss, &stories);
            prop_assert_eq!(m.total_utilization, 0.0);
            prop_assert!(m.utilization.iter().all(|(_, v)| v == 0.0));
        }
    }
}
