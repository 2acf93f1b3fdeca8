use super::running_totals::{RunningTotal, RunningTotalsCalculator};
use super::set_result::Outcome;
use crate::error::Result;
use crate::models::{Match, MatchFormat};

pub struct MatchResultResolver;

impl MatchResultResolver {
    /// Final or partial outcome of a match.
    pub fn result(m: &Match) -> Result<Outcome> {
        if m.is_bye() {
            return Ok(Outcome::Win);
        }
        if m.sets().is_empty() {
            return Ok(Outcome::Incomplete);
        }
        let totals = RunningTotalsCalculator::compute(m)?;
        Ok(Self::from_running_totals(m, &totals))
    }

    /// Outcome derived from already computed running totals of `m`.
    pub fn from_running_totals(m: &Match, totals: &[RunningTotal]) -> Outcome {
        if m.is_bye() {
            return Outcome::Win;
        }
        let Some(last) = totals.last() else {
            return Outcome::Incomplete;
        };

        let outcome = match (m.format(), *last) {
            (MatchFormat::SetPoints, _) => Self::race_result(totals, m.rules().winning_points),
            (MatchFormat::TotalPoints, RunningTotal::Status(status)) => status.into(),
            (MatchFormat::TotalPoints, RunningTotal::Points(team, opponent)) => {
                if (m.sets().len() as u32) < m.rules().regular_set_count {
                    Outcome::Incomplete
                } else if team > opponent {
                    Outcome::Win
                } else if team < opponent {
                    Outcome::Loss
                } else {
                    Outcome::Tie
                }
            }
        };

        log::debug!("match {} result: {:?}", m.match_number(), outcome);
        outcome
    }

    /// Set-points result: the first running total where one side has reached
    /// `winning_points` ahead of the other decides the match. Sets entered
    /// after that point do not change it.
    fn race_result(totals: &[RunningTotal], winning_points: u32) -> Outcome {
        for total in totals {
            match *total {
                // Poison only escalates, so the last entry carries the worst status
                RunningTotal::Status(status) => {
                    return totals.last().and_then(|last| last.status()).unwrap_or(status).into();
                }
                RunningTotal::Points(team, opponent) => {
                    if team.max(opponent) >= winning_points && team != opponent {
                        return if team > opponent { Outcome::Win } else { Outcome::Loss };
                    }
                }
            }
        }
        // Mid-match, or level and waiting for a shoot-off
        Outcome::Incomplete
    }

    pub fn is_complete(m: &Match) -> Result<bool> {
        Ok(Self::result(m)?.is_decided())
    }
}
