//! Running totals over the sets of a match.
//!
//! The fold carries `(accumulator, poison)`. Once a set cannot be decided
//! every later entry reports a status, and that status only ever escalates
//! (`INCOMPLETE` → `UNKNOWN`), even when later sets are decisive.

use serde::{Deserialize, Serialize};

use super::set_result::{Outcome, Resolution, SetResultResolver};
use crate::error::{Result, ScoringError};
use crate::models::{Match, MatchFormat, Set};

/// Why a running total is unavailable. Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoResult {
    Incomplete,
    Unknown,
}

impl NoResult {
    fn of(outcome: Outcome) -> Option<Self> {
        match outcome {
            Outcome::Incomplete => Some(NoResult::Incomplete),
            Outcome::Unknown => Some(NoResult::Unknown),
            Outcome::Win | Outcome::Tie | Outcome::Loss => None,
        }
    }
}

impl From<NoResult> for Outcome {
    fn from(status: NoResult) -> Self {
        match status {
            NoResult::Incomplete => Outcome::Incomplete,
            NoResult::Unknown => Outcome::Unknown,
        }
    }
}

/// Cumulative `(competitor, opponent)` points after a set, or why there are none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunningTotal {
    Points(u32, u32),
    Status(NoResult),
}

impl RunningTotal {
    pub fn points(self) -> Option<(u32, u32)> {
        match self {
            RunningTotal::Points(team, opponent) => Some((team, opponent)),
            RunningTotal::Status(_) => None,
        }
    }

    pub fn status(self) -> Option<NoResult> {
        match self {
            RunningTotal::Points(..) => None,
            RunningTotal::Status(status) => Some(status),
        }
    }
}

/// One fold step: the set's own resolution and the running total after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningTotalStep {
    pub set_number: u32,
    pub is_shoot_off: bool,
    pub resolution: Resolution,
    pub running_total: RunningTotal,
}

#[derive(Debug, Default)]
struct FoldState {
    accumulator: (u32, u32),
    poison: Option<NoResult>,
}

impl FoldState {
    fn step(&mut self, set: &Set, resolution: &Resolution, format: MatchFormat) -> Result<RunningTotal> {
        let severity = NoResult::of(resolution.outcome);

        if let Some(poison) = self.poison {
            // Never un-poison: escalate only
            let escalated = severity.map_or(poison, |s| s.max(poison));
            self.poison = Some(escalated);
            return Ok(RunningTotal::Status(escalated));
        }
        if let Some(status) = severity {
            self.poison = Some(status);
            return Ok(RunningTotal::Status(status));
        }

        let (team, opponent) = score_delta(set, resolution, format);
        let (Some(team), Some(opponent)) =
            (self.accumulator.0.checked_add(team), self.accumulator.1.checked_add(opponent))
        else {
            return Err(ScoringError::ScoreOverflow(format!(
                "running total after set {}",
                set.set_number()
            )));
        };
        self.accumulator = (team, opponent);
        Ok(RunningTotal::Points(team, opponent))
    }
}

/// Points a decided set adds to the running total.
///
/// Total-points matches add the raw side totals, shoot-offs included.
/// Set-points matches award 2/1/0 for regular sets and 1/0 for a shoot-off.
pub fn score_delta(set: &Set, resolution: &Resolution, format: MatchFormat) -> (u32, u32) {
    match format {
        // A decided total-points set always has both totals
        MatchFormat::TotalPoints => (
            resolution.team_total.unwrap_or(0),
            resolution.opponent_total.unwrap_or(0),
        ),
        MatchFormat::SetPoints => match (resolution.outcome, set.is_shoot_off()) {
            (Outcome::Win, false) => (2, 0),
            (Outcome::Tie, false) => (1, 1),
            (Outcome::Loss, false) => (0, 2),
            (Outcome::Win, true) => (1, 0),
            (Outcome::Loss, true) => (0, 1),
            // Shoot-off ties are rejected by the resolver
            (Outcome::Tie, true) | (Outcome::Incomplete | Outcome::Unknown, _) => (0, 0),
        },
    }
}

pub struct RunningTotalsCalculator;

impl RunningTotalsCalculator {
    /// One running total per set, in set order.
    pub fn compute(m: &Match) -> Result<Vec<RunningTotal>> {
        Ok(Self::steps(m)?.into_iter().map(|step| step.running_total).collect())
    }

    /// Like [`RunningTotalsCalculator::compute`], keeping each set's resolution.
    pub fn steps(m: &Match) -> Result<Vec<RunningTotalStep>> {
        let mut state = FoldState::default();
        let mut steps = Vec::with_capacity(m.sets().len());

        for set in m.sets() {
            let resolution = SetResultResolver::resolve_detailed(set, m.format(), m.team_size())?;
            let running_total = state.step(set, &resolution, m.format())?;
            log::trace!(
                "match {} set {}: {:?} -> {:?}",
                m.match_number(),
                set.set_number(),
                resolution.outcome,
                running_total
            );
            steps.push(RunningTotalStep {
                set_number: set.set_number(),
                is_shoot_off: set.is_shoot_off(),
                resolution,
                running_total,
            });
        }
        Ok(steps)
    }
}
