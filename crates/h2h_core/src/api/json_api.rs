use serde::Deserialize;
use tracing::{debug, info, warn};

use super::report::{report_head_to_head, report_match};
use crate::error::{Result as ScoringResult, ScoringError};
use crate::models::{
    ArcherRole, Arrow, ArrowsRow, HeadToHead, Match, MatchFormat, MatchRules, ResultRow, Row,
    Set, ShootOffRow, TotalRow, Verdict,
};

/// Supported request schema
pub const SCHEMA_VERSION: u8 = 1;

pub mod error_codes {
    pub const UNSUPPORTED_SCHEMA: &str = "E_SCHEMA";
    pub const INVALID_JSON: &str = "E_PARSE";
    pub const INVALID_DATA: &str = "E_DATA";
}

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn default_team_size() -> u32 {
    1
}

fn check_schema(version: u8) -> Result<(), String> {
    if version == SCHEMA_VERSION {
        Ok(())
    } else {
        Err(err_code(
            error_codes::UNSUPPORTED_SCHEMA,
            format!("unsupported schema version {version}, expected {SCHEMA_VERSION}"),
        ))
    }
}

/// Single match scoring request
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub schema_version: u8,
    pub format: MatchFormat,
    #[serde(default = "default_team_size")]
    pub team_size: u32,
    /// Falls back to `H2H_RULES_PATH`, then the standard rules
    #[serde(default)]
    pub rules: Option<MatchRules>,
    #[serde(rename = "match")]
    pub match_data: MatchData,
}

/// Whole head-to-head scoring request
#[derive(Debug, Deserialize)]
pub struct HeadToHeadRequest {
    pub schema_version: u8,
    pub format: MatchFormat,
    #[serde(default = "default_team_size")]
    pub team_size: u32,
    #[serde(default)]
    pub rules: Option<MatchRules>,
    #[serde(default)]
    pub qualification_rank: Option<u32>,
    #[serde(default)]
    pub total_archers: Option<u32>,
    #[serde(default)]
    pub matches: Vec<MatchData>,
}

#[derive(Debug, Deserialize)]
pub struct MatchData {
    pub match_number: u32,
    #[serde(default)]
    pub heat: Option<String>,
    #[serde(default)]
    pub opponent_name: Option<String>,
    #[serde(default)]
    pub opponent_qualification_rank: Option<u32>,
    #[serde(default)]
    pub is_bye: bool,
    #[serde(default)]
    pub sets: Vec<SetData>,
}

#[derive(Debug, Deserialize)]
pub struct SetData {
    pub set_number: u32,
    #[serde(default)]
    pub is_shoot_off: bool,
    #[serde(default)]
    pub rows: Vec<RowData>,
}

/// One row as entered on the score sheet.
///
/// Scoring roles carry either `arrows` or `total`; `RESULT` and `SHOOT_OFF`
/// carry `result`. A missing `expected_arrow_count` is derived from the rules.
#[derive(Debug, Deserialize)]
pub struct RowData {
    pub role: ArcherRole,
    #[serde(default)]
    pub expected_arrow_count: Option<u32>,
    #[serde(default)]
    pub arrows: Option<Vec<ArrowData>>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub result: Option<Verdict>,
}

/// `9` or `{"score": 10, "is_x": true}`
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum ArrowData {
    Score(u32),
    Detailed {
        score: u32,
        #[serde(default)]
        is_x: bool,
    },
}

impl From<ArrowData> for Arrow {
    fn from(data: ArrowData) -> Self {
        match data {
            ArrowData::Score(score) => Arrow::new(score),
            ArrowData::Detailed { score, is_x: true } => Arrow::x(score),
            ArrowData::Detailed { score, is_x: false } => Arrow::new(score),
        }
    }
}

/// Context needed to turn request data into validated rows.
#[derive(Debug, Clone, Copy)]
struct TreeContext {
    format: MatchFormat,
    team_size: u32,
    rules: MatchRules,
}

impl TreeContext {
    fn new(format: MatchFormat, team_size: u32, rules: Option<MatchRules>) -> Self {
        let rules = rules.unwrap_or_else(|| MatchRules::from_env_or_default(team_size));
        Self { format, team_size, rules }
    }

    fn row(&self, data: RowData, is_shoot_off: bool) -> ScoringResult<Row> {
        match data.role {
            ArcherRole::Result => {
                let verdict = data.result.ok_or_else(|| {
                    ScoringError::InvalidRecord("RESULT row without a result".to_string())
                })?;
                Ok(ResultRow::new(verdict).into())
            }
            ArcherRole::ShootOff => Ok(ShootOffRow::new(data.result).into()),
            role => {
                let expected = data.expected_arrow_count.unwrap_or_else(|| {
                    self.rules.expected_arrows(role, self.team_size, is_shoot_off)
                });
                match data.arrows {
                    Some(arrows) => {
                        if data.total.is_some() {
                            return Err(ScoringError::InvalidRecord(format!(
                                "{role} row carries both arrows and a total"
                            )));
                        }
                        let arrows = arrows.into_iter().map(Arrow::from).collect();
                        Ok(ArrowsRow::new(role, expected, arrows)?.into())
                    }
                    None => Ok(TotalRow::new(role, expected, data.total)?.into()),
                }
            }
        }
    }

    fn set(&self, data: SetData) -> ScoringResult<Set> {
        let is_shoot_off = data.is_shoot_off;
        let rows = data
            .rows
            .into_iter()
            .map(|row| self.row(row, is_shoot_off))
            .collect::<ScoringResult<Vec<_>>>()?;
        Set::new(data.set_number, is_shoot_off, rows)
    }

    fn build_match(&self, data: MatchData) -> ScoringResult<Match> {
        let mut builder = Match::builder(data.match_number, self.format, self.team_size)
            .bye(data.is_bye)
            .rules(self.rules);
        if let Some(heat) = data.heat {
            builder = builder.heat(heat);
        }
        if let Some(name) = data.opponent_name {
            builder = builder.opponent(name);
        }
        if let Some(rank) = data.opponent_qualification_rank {
            builder = builder.opponent_rank(rank);
        }
        let sets = data.sets.into_iter().map(|set| self.set(set)).collect::<ScoringResult<Vec<_>>>()?;
        builder.sets(sets).build()
    }
}

impl MatchRequest {
    pub fn into_match(self) -> ScoringResult<Match> {
        TreeContext::new(self.format, self.team_size, self.rules).build_match(self.match_data)
    }
}

impl HeadToHeadRequest {
    pub fn into_head_to_head(self) -> ScoringResult<HeadToHead> {
        let context = TreeContext::new(self.format, self.team_size, self.rules);
        let mut h2h = HeadToHead::new(self.format, self.team_size)?
            .with_qualification(self.qualification_rank, self.total_archers);
        for data in self.matches {
            h2h.push_match(context.build_match(data)?)?;
        }
        Ok(h2h)
    }
}

/// Parse and validate a head-to-head request without scoring it.
pub fn parse_head_to_head_json(request_json: &str) -> Result<HeadToHead, String> {
    let request: HeadToHeadRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, e))?;
    check_schema(request.schema_version)?;
    request.into_head_to_head().map_err(|e| {
        warn!("Head-to-head request rejected: {}", e);
        err_code(error_codes::INVALID_DATA, e)
    })
}

/// Scores one match from a JSON request and returns the `MatchReport` as JSON.
pub fn score_match_json(request_json: &str) -> Result<String, String> {
    let request: MatchRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, e))?;
    check_schema(request.schema_version)?;
    debug!("Scoring match {} ({})", request.match_data.match_number, request.format);

    let m = request.into_match().map_err(|e| {
        warn!("Match request rejected: {}", e);
        err_code(error_codes::INVALID_DATA, e)
    })?;
    let report = report_match(&m).map_err(|e| err_code(error_codes::INVALID_DATA, e))?;
    info!("Match {} scored: {:?}", report.match_number, report.result);

    serde_json::to_string(&report).map_err(|e| err_code(error_codes::INVALID_JSON, e))
}

/// Scores every match of a head-to-head and returns the `HeadToHeadReport` as JSON.
pub fn score_head_to_head_json(request_json: &str) -> Result<String, String> {
    let h2h = parse_head_to_head_json(request_json)?;
    let report = report_head_to_head(&h2h).map_err(|e| err_code(error_codes::INVALID_DATA, e))?;
    info!(
        "Head-to-head scored: {} matches, {} wins, {} losses",
        report.matches.len(),
        report.summary.wins,
        report.summary.losses
    );

    serde_json::to_string(&report).map_err(|e| err_code(error_codes::INVALID_JSON, e))
}
