//! Per-set result resolution.
//!
//! Resolution order:
//! 1. a recorded `RESULT` row wins over everything (set-points, regular sets only)
//! 2. shoot-off sets: score difference first, then the `SHOOT_OFF` tie-break
//! 3. regular sets: compare the two side totals

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};
use crate::models::{ArcherRole, Match, MatchFormat, Set, Verdict};

/// Result of a set or a whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Win,
    Tie,
    Loss,
    /// Some rows recorded, not enough to decide
    Incomplete,
    /// Nothing recorded yet
    Unknown,
}

impl Outcome {
    pub fn is_decided(self) -> bool {
        matches!(self, Outcome::Win | Outcome::Tie | Outcome::Loss)
    }

    fn from_totals(team_total: u32, opponent_total: u32) -> Self {
        match team_total.cmp(&opponent_total) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }
}

impl From<Verdict> for Outcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Win => Outcome::Win,
            Verdict::Tie => Outcome::Tie,
            Verdict::Loss => Outcome::Loss,
        }
    }
}

/// The two sides of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// `TEAM`, or `SELF` (+ `TEAM_MATE` for teams)
    Competitor,
    /// `OPPONENT`
    Opponent,
}

/// A set's outcome together with the side totals it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub team_total: Option<u32>,
    pub opponent_total: Option<u32>,
}

pub struct SetResultResolver;

impl SetResultResolver {
    /// Total of one side, or `None` while that side is incomplete.
    ///
    /// A complete combined row (`TEAM` / `OPPONENT`) is used first. Otherwise a
    /// team needs complete `SELF` and `TEAM_MATE` rows and an individual a
    /// complete `SELF` row.
    pub fn side_total(set: &Set, side: Side, team_size: u32) -> Result<Option<u32>> {
        let combined = match side {
            Side::Competitor => ArcherRole::Team,
            Side::Opponent => ArcherRole::Opponent,
        };
        if let Some(total) = set.row(combined).and_then(|row| row.complete_total()) {
            return Ok(Some(total));
        }
        if side == Side::Opponent {
            return Ok(None);
        }

        let complete = |role| set.row(role).and_then(|row| row.complete_total());
        let Some(own) = complete(ArcherRole::Archer) else {
            return Ok(None);
        };
        if team_size == 1 {
            return Ok(Some(own));
        }
        let Some(mate) = complete(ArcherRole::TeamMate) else {
            return Ok(None);
        };
        own.checked_add(mate).map(Some).ok_or_else(|| {
            ScoringError::ScoreOverflow(format!("set {} team total", set.set_number()))
        })
    }

    pub fn resolve(set: &Set, m: &Match) -> Result<Outcome> {
        Ok(Self::resolve_detailed(set, m.format(), m.team_size())?.outcome)
    }

    /// Resolves a set for the given format and team size, keeping the totals.
    pub fn resolve_detailed(set: &Set, format: MatchFormat, team_size: u32) -> Result<Resolution> {
        let team_total = Self::side_total(set, Side::Competitor, team_size)?;
        let opponent_total = Self::side_total(set, Side::Opponent, team_size)?;
        let outcome = Self::decide(set, format, team_total, opponent_total)?;

        log::debug!(
            "set {} resolved to {:?} ({:?} vs {:?})",
            set.set_number(),
            outcome,
            team_total,
            opponent_total
        );
        Ok(Resolution { outcome, team_total, opponent_total })
    }

    fn decide(
        set: &Set,
        format: MatchFormat,
        team_total: Option<u32>,
        opponent_total: Option<u32>,
    ) -> Result<Outcome> {
        let set_number = set.set_number();

        if let Some(result_row) = set.result_row() {
            if format != MatchFormat::SetPoints {
                return Err(ScoringError::InvalidFormatForResultRow { set_number });
            }
            if set.is_shoot_off() {
                return Err(ScoringError::ResultRowInShootOff { set_number });
            }
            return Ok(result_row.result.into());
        }

        if !set.has_scoring_rows() {
            return Ok(Outcome::Unknown);
        }
        let (Some(team), Some(opponent)) = (team_total, opponent_total) else {
            return Ok(Outcome::Incomplete);
        };

        if !set.is_shoot_off() || team != opponent {
            // Score difference is authoritative, even over a recorded tie-break
            return Ok(Outcome::from_totals(team, opponent));
        }

        match set.shoot_off_row().and_then(|row| row.result) {
            Some(Verdict::Win) => Ok(Outcome::Win),
            Some(Verdict::Loss) => Ok(Outcome::Loss),
            Some(Verdict::Tie) => Err(ScoringError::IllegalShootOffTie { set_number }),
            None => Ok(Outcome::Incomplete),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArrowsRow, ResultRow, ShootOffRow, TotalRow};

    fn individual(format: MatchFormat) -> Match {
        Match::builder(1, format, 1).build().unwrap()
    }

    fn team(format: MatchFormat) -> Match {
        Match::builder(1, format, 2).build().unwrap()
    }

    fn total(role: ArcherRole, arrows: u32, value: Option<u32>) -> crate::models::Row {
        TotalRow::new(role, arrows, value).unwrap().into()
    }

    #[test]
    fn test_empty_set_is_unknown() {
        let set = Set::regular(1, []).unwrap();
        for format in [MatchFormat::SetPoints, MatchFormat::TotalPoints] {
            assert_eq!(SetResultResolver::resolve(&set, &individual(format)).unwrap(), Outcome::Unknown);
        }
        let shoot_off = Set::shoot_off(6, []).unwrap();
        assert_eq!(
            SetResultResolver::resolve(&shoot_off, &individual(MatchFormat::SetPoints)).unwrap(),
            Outcome::Unknown
        );
    }

    #[test]
    fn test_regular_set_compares_totals() {
        let m = individual(MatchFormat::SetPoints);
        let cases = [(29, 27, Outcome::Win), (27, 27, Outcome::Tie), (25, 28, Outcome::Loss)];
        for (own, opp, expected) in cases {
            let set = Set::regular(
                1,
                [total(ArcherRole::Archer, 3, Some(own)), total(ArcherRole::Opponent, 3, Some(opp))],
            )
            .unwrap();
            assert_eq!(SetResultResolver::resolve(&set, &m).unwrap(), expected);
        }
    }

    #[test]
    fn test_partial_rows_are_incomplete() {
        let m = individual(MatchFormat::TotalPoints);
        let only_self = Set::regular(1, [total(ArcherRole::Archer, 3, Some(28))]).unwrap();
        assert_eq!(SetResultResolver::resolve(&only_self, &m).unwrap(), Outcome::Incomplete);

        let partial_arrows = Set::regular(
            1,
            [
                ArrowsRow::from_scores(ArcherRole::Archer, 3, &[10, 10]).unwrap().into(),
                total(ArcherRole::Opponent, 3, Some(27)),
            ],
        )
        .unwrap();
        assert_eq!(SetResultResolver::resolve(&partial_arrows, &m).unwrap(), Outcome::Incomplete);

        let empty_total = Set::regular(1, [total(ArcherRole::Opponent, 3, None)]).unwrap();
        assert_eq!(SetResultResolver::resolve(&empty_total, &m).unwrap(), Outcome::Incomplete);
    }

    #[test]
    fn test_team_side_total_needs_both_members() {
        let set = Set::regular(
            1,
            [
                total(ArcherRole::Archer, 2, Some(19)),
                total(ArcherRole::Opponent, 4, Some(36)),
            ],
        )
        .unwrap();
        assert_eq!(SetResultResolver::side_total(&set, Side::Competitor, 2).unwrap(), None);
        assert_eq!(SetResultResolver::side_total(&set, Side::Competitor, 1).unwrap(), Some(19));
        assert_eq!(
            SetResultResolver::resolve(&set, &team(MatchFormat::TotalPoints)).unwrap(),
            Outcome::Incomplete
        );

        let set = set.with_row(TotalRow::new(ArcherRole::TeamMate, 2, Some(18)).unwrap()).unwrap();
        assert_eq!(SetResultResolver::side_total(&set, Side::Competitor, 2).unwrap(), Some(37));
        assert_eq!(
            SetResultResolver::resolve(&set, &team(MatchFormat::TotalPoints)).unwrap(),
            Outcome::Win
        );
    }

    #[test]
    fn test_combined_team_row_takes_precedence() {
        let set = Set::regular(
            1,
            [
                total(ArcherRole::Team, 4, Some(35)),
                total(ArcherRole::Archer, 2, Some(20)),
                total(ArcherRole::TeamMate, 2, Some(20)),
                total(ArcherRole::Opponent, 4, Some(36)),
            ],
        )
        .unwrap();
        assert_eq!(SetResultResolver::side_total(&set, Side::Competitor, 2).unwrap(), Some(35));

        // An incomplete combined row falls back to the members
        let set = Set::regular(
            1,
            [
                total(ArcherRole::Team, 4, None),
                total(ArcherRole::Archer, 2, Some(20)),
                total(ArcherRole::TeamMate, 2, Some(19)),
            ],
        )
        .unwrap();
        assert_eq!(SetResultResolver::side_total(&set, Side::Competitor, 2).unwrap(), Some(39));
    }

    #[test]
    fn test_team_member_totals_overflow_is_an_error() {
        let set = Set::regular(
            2,
            [
                total(ArcherRole::Archer, 2, Some(u32::MAX)),
                total(ArcherRole::TeamMate, 2, Some(1)),
                total(ArcherRole::Opponent, 4, Some(36)),
            ],
        )
        .unwrap();
        let err = SetResultResolver::resolve(&set, &team(MatchFormat::SetPoints)).unwrap_err();
        assert!(matches!(err, ScoringError::ScoreOverflow(_)));
    }

    #[test]
    fn test_result_row_takes_precedence() {
        let set = Set::regular(
            1,
            [
                total(ArcherRole::Archer, 3, Some(20)),
                total(ArcherRole::Opponent, 3, Some(30)),
                ResultRow::new(Verdict::Win).into(),
            ],
        )
        .unwrap();
        let outcome = SetResultResolver::resolve(&set, &individual(MatchFormat::SetPoints)).unwrap();
        assert_eq!(outcome, Outcome::Win);
    }

    #[test]
    fn test_result_row_in_total_points_is_an_error() {
        let set = Set::regular(1, [ResultRow::new(Verdict::Tie).into()]).unwrap();
        let err =
            SetResultResolver::resolve(&set, &individual(MatchFormat::TotalPoints)).unwrap_err();
        assert_eq!(err, ScoringError::InvalidFormatForResultRow { set_number: 1 });
    }

    #[test]
    fn test_shoot_off_score_difference_overrides_tie_break() {
        let m = individual(MatchFormat::SetPoints);
        let set = Set::shoot_off(
            6,
            [
                total(ArcherRole::Archer, 1, Some(10)),
                total(ArcherRole::Opponent, 1, Some(9)),
                ShootOffRow::new(Some(Verdict::Loss)).into(),
            ],
        )
        .unwrap();
        assert_eq!(SetResultResolver::resolve(&set, &m).unwrap(), Outcome::Win);

        // Differing scores make even a recorded tie irrelevant
        let set = Set::shoot_off(
            6,
            [
                total(ArcherRole::Archer, 1, Some(8)),
                total(ArcherRole::Opponent, 1, Some(9)),
                ShootOffRow::new(Some(Verdict::Tie)).into(),
            ],
        )
        .unwrap();
        assert_eq!(SetResultResolver::resolve(&set, &m).unwrap(), Outcome::Loss);
    }

    #[test]
    fn test_tied_shoot_off_uses_tie_break() {
        let m = individual(MatchFormat::SetPoints);
        let tied = |tie_break: Option<Option<Verdict>>| {
            let mut rows =
                vec![total(ArcherRole::Archer, 1, Some(10)), total(ArcherRole::Opponent, 1, Some(10))];
            if let Some(result) = tie_break {
                rows.push(ShootOffRow::new(result).into());
            }
            Set::shoot_off(6, rows).unwrap()
        };

        assert_eq!(SetResultResolver::resolve(&tied(Some(Some(Verdict::Win))), &m).unwrap(), Outcome::Win);
        assert_eq!(SetResultResolver::resolve(&tied(Some(Some(Verdict::Loss))), &m).unwrap(), Outcome::Loss);
        assert_eq!(SetResultResolver::resolve(&tied(Some(None)), &m).unwrap(), Outcome::Incomplete);
        assert_eq!(SetResultResolver::resolve(&tied(None), &m).unwrap(), Outcome::Incomplete);
        assert_eq!(
            SetResultResolver::resolve(&tied(Some(Some(Verdict::Tie))), &m).unwrap_err(),
            ScoringError::IllegalShootOffTie { set_number: 6 }
        );
    }

    #[test]
    fn test_shoot_off_row_alone_is_unknown() {
        let set = Set::shoot_off(6, [ShootOffRow::new(Some(Verdict::Win)).into()]).unwrap();
        let outcome = SetResultResolver::resolve(&set, &individual(MatchFormat::SetPoints)).unwrap();
        assert_eq!(outcome, Outcome::Unknown);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let m = individual(MatchFormat::TotalPoints);
        let set = Set::regular(
            1,
            [total(ArcherRole::Archer, 3, Some(28)), total(ArcherRole::Opponent, 3, Some(28))],
        )
        .unwrap();
        let first = SetResultResolver::resolve_detailed(&set, m.format(), m.team_size()).unwrap();
        let second = SetResultResolver::resolve_detailed(&set, m.format(), m.team_size()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.team_total, Some(28));
    }
}
