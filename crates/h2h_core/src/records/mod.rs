//! Persistence boundary
//!
//! Flat score records, as stored per arrow / per total by the persistence
//! layer, are grouped into the `HeadToHead → Match → Set → Row` tree
//! ([`assemble`]) and projected back ([`flatten_head_to_head`]).

pub mod assemble;
pub mod flatten;

use serde::{Deserialize, Serialize};

use crate::models::{ArcherRole, MatchFormat, MatchRules, RecordId, Verdict};

/// One persisted value: an arrow, a total, or a recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub shoot_id: i64,
    pub match_number: u32,
    pub set_number: u32,
    pub role: ArcherRole,
    /// 1-based arrow number; empty for a total / decision record
    #[serde(default)]
    pub arrow_number: Option<u32>,
    #[serde(default)]
    pub score: Option<u32>,
    /// Maximum-value shot
    #[serde(default)]
    pub is_x: bool,
    /// Decision carried by `RESULT` / `SHOOT_OFF` records
    #[serde(default)]
    pub result: Option<Verdict>,
    #[serde(default)]
    pub is_shoot_off: bool,
    #[serde(default)]
    pub expected_arrows: Option<u32>,
    #[serde(default)]
    pub record_id: Option<RecordId>,
}

impl ScoreRecord {
    pub fn is_total_marker(&self) -> bool {
        self.arrow_number.is_none()
    }
}

/// Per-match metadata stored next to the score records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchHeader {
    pub match_number: u32,
    #[serde(default)]
    pub heat: Option<String>,
    #[serde(default)]
    pub opponent_name: Option<String>,
    #[serde(default)]
    pub opponent_qualification_rank: Option<u32>,
    #[serde(default)]
    pub is_bye: bool,
}

impl MatchHeader {
    pub fn new(match_number: u32) -> Self {
        Self { match_number, ..Self::default() }
    }
}

/// Head-to-head level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHeadHeader {
    #[serde(default)]
    pub qualification_rank: Option<u32>,
    #[serde(default)]
    pub total_archers: Option<u32>,
    pub team_size: u32,
    pub format: MatchFormat,
    #[serde(default)]
    pub rules: Option<MatchRules>,
}

impl HeadToHeadHeader {
    pub fn new(format: MatchFormat, team_size: u32) -> Self {
        Self { qualification_rank: None, total_archers: None, team_size, format, rules: None }
    }

    pub fn rules(&self) -> MatchRules {
        self.rules.unwrap_or_else(|| MatchRules::standard(self.team_size))
    }
}

pub use assemble::assemble;
pub use flatten::{flatten_head_to_head, flatten_match, flatten_set};
