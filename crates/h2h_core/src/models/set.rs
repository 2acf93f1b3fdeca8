use serde::Serialize;

use super::role::{ArcherRole, RoleMap};
use super::row::{ResultRow, Row, ShootOffRow};
use crate::error::{Result, ScoringError};

/// One end of a match: at most one row per role plus the shoot-off flag.
///
/// A set never holds both a `RESULT` and a `SHOOT_OFF` row: result rows are
/// rejected on shoot-off sets and shoot-off rows on regular sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Set {
    set_number: u32,
    is_shoot_off: bool,
    rows: RoleMap<Row>,
}

impl Set {
    pub fn new(
        set_number: u32,
        is_shoot_off: bool,
        rows: impl IntoIterator<Item = Row>,
    ) -> Result<Self> {
        if set_number == 0 {
            return Err(ScoringError::InvalidSetNumber(set_number));
        }
        let mut set = Self { set_number, is_shoot_off, rows: RoleMap::new() };
        for row in rows {
            set.insert(row)?;
        }
        Ok(set)
    }

    pub fn regular(set_number: u32, rows: impl IntoIterator<Item = Row>) -> Result<Self> {
        Self::new(set_number, false, rows)
    }

    pub fn shoot_off(set_number: u32, rows: impl IntoIterator<Item = Row>) -> Result<Self> {
        Self::new(set_number, true, rows)
    }

    /// Adds a row, returning the extended set.
    pub fn with_row(mut self, row: impl Into<Row>) -> Result<Self> {
        self.insert(row.into())?;
        Ok(self)
    }

    fn insert(&mut self, row: Row) -> Result<()> {
        let role = row.role();
        match &row {
            Row::Result(_) if self.is_shoot_off => {
                return Err(ScoringError::ResultRowInShootOff { set_number: self.set_number });
            }
            Row::ShootOff(_) if !self.is_shoot_off => {
                return Err(ScoringError::ShootOffRowOutsideShootOff {
                    set_number: self.set_number,
                });
            }
            _ => {}
        }
        if self.rows.contains(role) {
            return Err(ScoringError::DuplicateRole { set_number: self.set_number, role });
        }
        self.rows.insert(role, row);
        Ok(())
    }

    pub fn set_number(&self) -> u32 {
        self.set_number
    }

    pub fn is_shoot_off(&self) -> bool {
        self.is_shoot_off
    }

    pub fn row(&self, role: ArcherRole) -> Option<&Row> {
        self.rows.get(role)
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows.iter().map(|(_, row)| row)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when any `SELF`/`TEAM_MATE`/`TEAM`/`OPPONENT` row exists.
    pub fn has_scoring_rows(&self) -> bool {
        ArcherRole::SCORING.into_iter().any(|role| self.rows.contains(role))
    }

    pub fn result_row(&self) -> Option<&ResultRow> {
        match self.rows.get(ArcherRole::Result) {
            Some(Row::Result(row)) => Some(row),
            _ => None,
        }
    }

    pub fn shoot_off_row(&self) -> Option<&ShootOffRow> {
        match self.rows.get(ArcherRole::ShootOff) {
            Some(Row::ShootOff(row)) => Some(row),
            _ => None,
        }
    }
}
