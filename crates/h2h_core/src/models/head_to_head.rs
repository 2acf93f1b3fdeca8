use serde::Serialize;

use super::h2h_match::{Match, MatchFormat};
use crate::engine::{MatchResultResolver, Outcome};
use crate::error::{Result, ScoringError};

/// All head-to-head matches of one competitor in one shoot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadToHead {
    qualification_rank: Option<u32>,
    total_archers: Option<u32>,
    team_size: u32,
    format: MatchFormat,
    matches: Vec<Match>,
}

/// Win/loss tally across a head-to-head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadToHeadSummary {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    /// Byes, also counted in `wins`
    pub byes: u32,
    pub undecided: u32,
    pub last_match_number: Option<u32>,
}

impl HeadToHead {
    pub fn new(format: MatchFormat, team_size: u32) -> Result<Self> {
        if team_size == 0 {
            return Err(ScoringError::InvalidTeamSize(team_size));
        }
        Ok(Self {
            qualification_rank: None,
            total_archers: None,
            team_size,
            format,
            matches: Vec::new(),
        })
    }

    pub fn with_qualification(mut self, rank: Option<u32>, total_archers: Option<u32>) -> Self {
        self.qualification_rank = rank;
        self.total_archers = total_archers;
        self
    }

    /// Appends a match; match numbers must strictly increase and the match
    /// must share this head-to-head's format, team size and rules.
    pub fn push_match(&mut self, m: Match) -> Result<()> {
        if let Some(previous) = self.matches.last() {
            if m.match_number() <= previous.match_number() {
                return Err(ScoringError::MatchNumberOrder {
                    previous: previous.match_number(),
                    found: m.match_number(),
                });
            }
        }
        if m.format() != self.format {
            return Err(ScoringError::ForeignMatch {
                match_number: m.match_number(),
                reason: format!("format {} differs from {}", m.format(), self.format),
            });
        }
        if m.team_size() != self.team_size {
            return Err(ScoringError::ForeignMatch {
                match_number: m.match_number(),
                reason: format!("team size {} differs from {}", m.team_size(), self.team_size),
            });
        }
        if let Some(first) = self.matches.first() {
            if m.rules() != first.rules() {
                return Err(ScoringError::ForeignMatch {
                    match_number: m.match_number(),
                    reason: format!(
                        "rules {:?} differ from {:?} used by match {}",
                        m.rules(),
                        first.rules(),
                        first.match_number()
                    ),
                });
            }
        }
        self.matches.push(m);
        Ok(())
    }

    pub fn with_match(mut self, m: Match) -> Result<Self> {
        self.push_match(m)?;
        Ok(self)
    }

    pub fn qualification_rank(&self) -> Option<u32> {
        self.qualification_rank
    }

    pub fn total_archers(&self) -> Option<u32> {
        self.total_archers
    }

    pub fn team_size(&self) -> u32 {
        self.team_size
    }

    pub fn format(&self) -> MatchFormat {
        self.format
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn get_match(&self, match_number: u32) -> Option<&Match> {
        self.matches.iter().find(|m| m.match_number() == match_number)
    }

    /// Outcome of every match, keyed by match number.
    pub fn results(&self) -> Result<Vec<(u32, Outcome)>> {
        self.matches
            .iter()
            .map(|m| Ok((m.match_number(), MatchResultResolver::result(m)?)))
            .collect()
    }

    pub fn summary(&self) -> Result<HeadToHeadSummary> {
        let mut summary = HeadToHeadSummary::default();
        for m in &self.matches {
            match MatchResultResolver::result(m)? {
                Outcome::Win => summary.wins += 1,
                Outcome::Loss => summary.losses += 1,
                Outcome::Tie => summary.ties += 1,
                Outcome::Incomplete | Outcome::Unknown => summary.undecided += 1,
            }
            if m.is_bye() {
                summary.byes += 1;
            }
            summary.last_match_number = Some(m.match_number());
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::row::{ResultRow, Verdict};
    use crate::models::set::Set;

    fn decided_match(match_number: u32, verdicts: &[Verdict]) -> Match {
        Match::builder(match_number, MatchFormat::SetPoints, 1)
            .sets(verdicts.iter().enumerate().map(|(i, v)| {
                Set::regular(i as u32 + 1, [ResultRow::new(*v).into()]).unwrap()
            }))
            .build()
            .unwrap()
    }

    #[test]
    fn test_summary_counts_outcomes() {
        use Verdict::*;
        let h2h = HeadToHead::new(MatchFormat::SetPoints, 1)
            .unwrap()
            .with_qualification(Some(12), Some(64))
            .with_match(Match::builder(1, MatchFormat::SetPoints, 1).bye(true).build().unwrap())
            .unwrap()
            .with_match(decided_match(2, &[Win, Win, Win]))
            .unwrap()
            .with_match(decided_match(3, &[Loss, Loss, Win, Loss]))
            .unwrap()
            .with_match(decided_match(4, &[Win]))
            .unwrap();

        let summary = h2h.summary().unwrap();
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.byes, 1);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.undecided, 1);
        assert_eq!(summary.last_match_number, Some(4));

        let results = h2h.results().unwrap();
        assert_eq!(results[1], (2, Outcome::Win));
        assert_eq!(results[3], (4, Outcome::Incomplete));
        assert_eq!(h2h.qualification_rank(), Some(12));
        assert_eq!(h2h.total_archers(), Some(64));
    }

    #[test]
    fn test_match_numbers_must_increase() {
        let mut h2h = HeadToHead::new(MatchFormat::SetPoints, 1).unwrap();
        h2h.push_match(decided_match(2, &[])).unwrap();
        let err = h2h.push_match(decided_match(2, &[])).unwrap_err();
        assert_eq!(err, ScoringError::MatchNumberOrder { previous: 2, found: 2 });
    }

    #[test]
    fn test_foreign_matches_are_rejected() {
        let mut h2h = HeadToHead::new(MatchFormat::TotalPoints, 1).unwrap();
        let err = h2h.push_match(decided_match(1, &[])).unwrap_err();
        assert!(matches!(err, ScoringError::ForeignMatch { match_number: 1, .. }));

        let team = Match::builder(1, MatchFormat::TotalPoints, 2).build().unwrap();
        assert!(h2h.push_match(team).is_err());
        assert!(h2h.get_match(1).is_none());
    }

    #[test]
    fn test_matches_must_share_rules() {
        use crate::models::MatchRules;
        use Verdict::*;

        let mut h2h = HeadToHead::new(MatchFormat::SetPoints, 1).unwrap();
        h2h.push_match(decided_match(1, &[Win])).unwrap();

        let short_race = Match::builder(2, MatchFormat::SetPoints, 1)
            .rules(MatchRules { winning_points: 4, ..MatchRules::standard(1) })
            .sets([Win, Win].iter().enumerate().map(|(i, v)| {
                Set::regular(i as u32 + 1, [ResultRow::new(*v).into()]).unwrap()
            }))
            .build()
            .unwrap();
        let err = h2h.push_match(short_race).unwrap_err();
        assert!(matches!(err, ScoringError::ForeignMatch { match_number: 2, .. }));
        assert_eq!(h2h.matches().len(), 1);

        h2h.push_match(decided_match(2, &[Win, Win])).unwrap();
        assert_eq!(h2h.results().unwrap(), vec![(1, Outcome::Incomplete), (2, Outcome::Incomplete)]);
    }
}
