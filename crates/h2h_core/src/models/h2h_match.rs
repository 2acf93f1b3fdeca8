use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::rules::MatchRules;
use super::set::Set;
use crate::engine::{MatchResultResolver, Outcome, RunningTotal, RunningTotalsCalculator};
use crate::error::{Result, ScoringError};

/// Competition format of a head-to-head match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchFormat {
    /// 2/1/0 set points per set, race to `winning_points`
    SetPoints,
    /// Cumulative arrow scores over `regular_set_count` sets
    TotalPoints,
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchFormat::SetPoints => write!(f, "SET_POINTS"),
            MatchFormat::TotalPoints => write!(f, "TOTAL_POINTS"),
        }
    }
}

impl FromStr for MatchFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "set_points" | "set" | "sets" => Ok(MatchFormat::SetPoints),
            "total_points" | "total" | "cumulative" => Ok(MatchFormat::TotalPoints),
            other => Err(format!("unknown match format: {other}")),
        }
    }
}

/// One head-to-head match: configuration plus its sets in `set_number` order.
///
/// Built through [`MatchBuilder`]; every set placement rule is checked on
/// construction so the resolvers never see an illegal layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    match_number: u32,
    heat: Option<String>,
    opponent_name: Option<String>,
    opponent_qualification_rank: Option<u32>,
    is_bye: bool,
    team_size: u32,
    format: MatchFormat,
    rules: MatchRules,
    sets: Vec<Set>,
}

impl Match {
    pub fn builder(match_number: u32, format: MatchFormat, team_size: u32) -> MatchBuilder {
        MatchBuilder::new(match_number, format, team_size)
    }

    /// Appends a set after checking its number and placement.
    pub fn with_set(mut self, set: Set) -> Result<Self> {
        self.check_next_set(&set)?;
        self.sets.push(set);
        Ok(self)
    }

    fn check_next_set(&self, set: &Set) -> Result<()> {
        let set_number = set.set_number();
        if self.is_bye {
            return Err(ScoringError::ByeWithSets { match_number: self.match_number });
        }

        let expected = self.sets.len() as u32 + 1;
        if set_number != expected {
            return Err(ScoringError::SetNumberSequence { expected, found: set_number });
        }

        if self.shoot_off_set().is_some() {
            return Err(if set.is_shoot_off() {
                ScoringError::DuplicateShootOff { set_number }
            } else {
                ScoringError::SetAfterShootOff { set_number }
            });
        }

        if set.is_shoot_off() && self.sets.len() as u32 != self.rules.regular_set_count {
            return Err(ScoringError::ShootOffOutOfPlace {
                set_number,
                expected: self.rules.regular_set_count + 1,
            });
        }

        if set.result_row().is_some() && self.format != MatchFormat::SetPoints {
            return Err(ScoringError::InvalidFormatForResultRow { set_number });
        }

        Ok(())
    }

    pub fn match_number(&self) -> u32 {
        self.match_number
    }

    pub fn heat(&self) -> Option<&str> {
        self.heat.as_deref()
    }

    pub fn opponent_name(&self) -> Option<&str> {
        self.opponent_name.as_deref()
    }

    pub fn opponent_qualification_rank(&self) -> Option<u32> {
        self.opponent_qualification_rank
    }

    pub fn is_bye(&self) -> bool {
        self.is_bye
    }

    pub fn team_size(&self) -> u32 {
        self.team_size
    }

    pub fn is_team(&self) -> bool {
        self.team_size > 1
    }

    pub fn format(&self) -> MatchFormat {
        self.format
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    pub fn shoot_off_set(&self) -> Option<&Set> {
        self.sets.last().filter(|set| set.is_shoot_off())
    }

    pub fn running_totals(&self) -> Result<Vec<RunningTotal>> {
        RunningTotalsCalculator::compute(self)
    }

    pub fn result(&self) -> Result<Outcome> {
        MatchResultResolver::result(self)
    }

    pub fn is_complete(&self) -> Result<bool> {
        MatchResultResolver::is_complete(self)
    }
}

#[derive(Debug, Clone)]
pub struct MatchBuilder {
    match_number: u32,
    heat: Option<String>,
    opponent_name: Option<String>,
    opponent_qualification_rank: Option<u32>,
    is_bye: bool,
    team_size: u32,
    format: MatchFormat,
    rules: Option<MatchRules>,
    sets: Vec<Set>,
}

impl MatchBuilder {
    pub fn new(match_number: u32, format: MatchFormat, team_size: u32) -> Self {
        Self {
            match_number,
            heat: None,
            opponent_name: None,
            opponent_qualification_rank: None,
            is_bye: false,
            team_size,
            format,
            rules: None,
            sets: Vec::new(),
        }
    }

    pub fn heat(mut self, heat: impl Into<String>) -> Self {
        self.heat = Some(heat.into());
        self
    }

    pub fn opponent(mut self, name: impl Into<String>) -> Self {
        self.opponent_name = Some(name.into());
        self
    }

    pub fn opponent_rank(mut self, rank: u32) -> Self {
        self.opponent_qualification_rank = Some(rank);
        self
    }

    pub fn bye(mut self, is_bye: bool) -> Self {
        self.is_bye = is_bye;
        self
    }

    /// Overrides [`MatchRules::standard`] for this match.
    pub fn rules(mut self, rules: MatchRules) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn set(mut self, set: Set) -> Self {
        self.sets.push(set);
        self
    }

    pub fn sets(mut self, sets: impl IntoIterator<Item = Set>) -> Self {
        self.sets.extend(sets);
        self
    }

    pub fn build(self) -> Result<Match> {
        if self.team_size == 0 {
            return Err(ScoringError::InvalidTeamSize(self.team_size));
        }
        if self.is_bye && !self.sets.is_empty() {
            return Err(ScoringError::ByeWithSets { match_number: self.match_number });
        }
        let rules = self.rules.unwrap_or_else(|| MatchRules::standard(self.team_size));
        rules.validate()?;

        let mut m = Match {
            match_number: self.match_number,
            heat: self.heat,
            opponent_name: self.opponent_name,
            opponent_qualification_rank: self.opponent_qualification_rank,
            is_bye: self.is_bye,
            team_size: self.team_size,
            format: self.format,
            rules,
            sets: Vec::with_capacity(self.sets.len()),
        };
        for set in self.sets {
            m = m.with_set(set)?;
        }
        Ok(m)
    }
}
