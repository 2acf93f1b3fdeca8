//! Archer roles and the role-keyed row storage of a set.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Which side (or bookkeeping slot) a row of a set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArcherRole {
    /// The archer whose head-to-head this is
    #[serde(rename = "SELF")]
    Archer,
    /// Second member of a team
    TeamMate,
    /// Combined row for the whole team
    Team,
    Opponent,
    /// Recorded set result (set-points only)
    Result,
    /// Tie-break decision of a shoot-off set
    ShootOff,
}

impl ArcherRole {
    pub const ALL: [ArcherRole; 6] = [
        ArcherRole::Archer,
        ArcherRole::TeamMate,
        ArcherRole::Team,
        ArcherRole::Opponent,
        ArcherRole::Result,
        ArcherRole::ShootOff,
    ];

    /// Roles that carry arrow scores or totals.
    pub const SCORING: [ArcherRole; 4] =
        [ArcherRole::Archer, ArcherRole::TeamMate, ArcherRole::Team, ArcherRole::Opponent];

    fn index(self) -> usize {
        match self {
            ArcherRole::Archer => 0,
            ArcherRole::TeamMate => 1,
            ArcherRole::Team => 2,
            ArcherRole::Opponent => 3,
            ArcherRole::Result => 4,
            ArcherRole::ShootOff => 5,
        }
    }

    pub fn is_scoring(self) -> bool {
        Self::SCORING.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArcherRole::Archer => "SELF",
            ArcherRole::TeamMate => "TEAM_MATE",
            ArcherRole::Team => "TEAM",
            ArcherRole::Opponent => "OPPONENT",
            ArcherRole::Result => "RESULT",
            ArcherRole::ShootOff => "SHOOT_OFF",
        }
    }
}

impl fmt::Display for ArcherRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArcherRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        ArcherRole::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| format!("unknown archer role: {s}"))
    }
}

/// Fixed-size map from [`ArcherRole`] to at most one value.
///
/// Two entries for the same role cannot exist; iteration follows the
/// declaration order of [`ArcherRole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMap<T> {
    slots: [Option<T>; 6],
}

impl<T> Default for RoleMap<T> {
    fn default() -> Self {
        Self { slots: [None, None, None, None, None, None] }
    }
}

impl<T> RoleMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: ArcherRole) -> Option<&T> {
        self.slots[role.index()].as_ref()
    }

    pub fn contains(&self, role: ArcherRole) -> bool {
        self.slots[role.index()].is_some()
    }

    /// Stores `value` under `role`, returning the previous value if any.
    pub fn insert(&mut self, role: ArcherRole, value: T) -> Option<T> {
        self.slots[role.index()].replace(value)
    }

    pub fn remove(&mut self, role: ArcherRole) -> Option<T> {
        self.slots[role.index()].take()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArcherRole, &T)> + '_ {
        ArcherRole::ALL
            .into_iter()
            .filter_map(move |role| self.get(role).map(|value| (role, value)))
    }
}

impl<T: Serialize> Serialize for RoleMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (role, value) in self.iter() {
            map.serialize_entry(&role, value)?;
        }
        map.end()
    }
}
