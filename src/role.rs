//! Roles and per-role quantities.
//!
//! Every per-role figure in a plan (estimates, headcount, available and
//! assigned mandays, utilization) is a [`RoleMap`]: a fixed record with one
//! field per [`Role`], always fully populated.

use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// A delivery discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Backend engineering.
    Backend,
    /// Android engineering.
    Android,
    /// iOS engineering.
    Ios,
    /// Manual QA.
    Qa,
    /// QA automation.
    #[serde(alias = "qa-automation", alias = "qaAutomation")]
    QaAutomation,
}

impl Role {
    /// All roles in reporting order.
    pub const ALL: [Role; 5] = [
        Role::Backend,
        Role::Android,
        Role::Ios,
        Role::Qa,
        Role::QaAutomation,
    ];

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Qa => "qa",
            Self::QaAutomation => "qa_automation",
        }
    }

    /// Short column label for tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Backend => "BE",
            Self::Android => "AND",
            Self::Ios => "iOS",
            Self::Qa => "QA",
            Self::QaAutomation => "QA-A",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per role. Missing roles are zero, never absent.
///
/// Deserialization defaults missing roles to zero and rejects unknown role
/// names, so a malformed plan document fails at load time instead of
/// silently dropping effort.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoleMap {
    pub backend: f64,
    pub android: f64,
    pub ios: f64,
    pub qa: f64,
    #[serde(alias = "qa-automation", alias = "qaAutomation")]
    pub qa_automation: f64,
}

impl RoleMap {
    /// All roles zero.
    pub const ZERO: RoleMap = RoleMap {
        backend: 0.0,
        android: 0.0,
        ios: 0.0,
        qa: 0.0,
        qa_automation: 0.0,
    };

    /// Build a map from the five values in [`Role::ALL`] order.
    pub fn new(backend: f64, android: f64, ios: f64, qa: f64, qa_automation: f64) -> Self {
        Self {
            backend,
            android,
            ios,
            qa,
            qa_automation,
        }
    }

    /// Same value for every role.
    pub fn splat(value: f64) -> Self {
        Self::new(value, value, value, value, value)
    }

    pub fn get(&self, role: Role) -> f64 {
        match role {
            Role::Backend => self.backend,
            Role::Android => self.android,
            Role::Ios => self.ios,
            Role::Qa => self.qa,
            Role::QaAutomation => self.qa_automation,
        }
    }

    pub fn set(&mut self, role: Role, value: f64) {
        match role {
            Role::Backend => self.backend = value,
            Role::Android => self.android = value,
            Role::Ios => self.ios = value,
            Role::Qa => self.qa = value,
            Role::QaAutomation => self.qa_automation = value,
        }
    }

    /// Iterate `(role, value)` pairs in [`Role::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, f64)> + '_ {
        Role::ALL.iter().map(move |&role| (role, self.get(role)))
    }

    /// Sum across all roles.
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, v)| v).sum()
    }

    /// Apply `f` to every role.
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        let mut out = Self::ZERO;
        for (role, value) in self.iter() {
            out.set(role, f(value));
        }
        out
    }

    /// Combine two maps role by role.
    pub fn zip_with(&self, other: &RoleMap, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        let mut out = Self::ZERO;
        for role in Role::ALL {
            out.set(role, f(self.get(role), other.get(role)));
        }
        out
    }
}

impl Add for RoleMap {
    type Output = RoleMap;

    fn add(self, rhs: RoleMap) -> RoleMap {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl AddAssign for RoleMap {
    fn add_assign(&mut self, rhs: RoleMap) {
        *self = *self + rhs;
    }
}

impl<'a> std::iter::Sum<&'a RoleMap> for RoleMap {
    fn sum<I: Iterator<Item = &'a RoleMap>>(iter: I) -> RoleMap {
        iter.fold(RoleMap::ZERO, |acc, m| acc + *m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_map_get_set() {
        let mut map = RoleMap::ZERO;
        map.set(Role::Ios, 3.5);
        assert_eq!(map.get(Role::Ios), 3.5);
        assert_eq!(map.get(Role::Android), 0.0);
        assert_eq!(map.total(), 3.5);
    }

    #[test]
    fn test_role_map_sum() {
        let maps = [RoleMap::new(1.0, 2.0, 3.0, 4.0, 5.0), RoleMap::splat(1.0)];
        let total: RoleMap = maps.iter().sum();
        assert_eq!(total, RoleMap::new(2.0, 3.0, 4.0, 5.0, 6.0));
        assert_eq!(total.total(), 20.0);
    }

    #[test]
    fn test_role_map_deserialize_defaults_missing_roles() {
        let map: RoleMap = toml::from_str("backend = 2\nqaAutomation = 1.5").unwrap();
        assert_eq!(map, RoleMap::new(2.0, 0.0, 0.0, 0.0, 1.5));
    }

    #[test]
    fn test_role_map_deserialize_rejects_unknown_role() {
        let result: Result<RoleMap, _> = toml::from_str("backend = 2\ndesigner = 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_role_map_serializes_all_roles() {
        let json = serde_json::to_value(RoleMap::ZERO).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        assert!(obj.contains_key("qa_automation"));
    }
}
