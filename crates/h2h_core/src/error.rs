use thiserror::Error;

use crate::models::role::ArcherRole;

/// Errors raised for structurally invalid head-to-head data.
///
/// Missing or partial scores are never errors: they surface as
/// [`Outcome::Incomplete`](crate::engine::Outcome::Incomplete) or
/// [`Outcome::Unknown`](crate::engine::Outcome::Unknown).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    // Resolution
    #[error("Set {set_number}: result rows are only allowed in set-points matches")]
    InvalidFormatForResultRow { set_number: u32 },

    #[error("Set {set_number}: result rows are not allowed in a shoot-off")]
    ResultRowInShootOff { set_number: u32 },

    #[error("Set {set_number}: a tied shoot-off must record a win or a loss")]
    IllegalShootOffTie { set_number: u32 },

    #[error("Score overflow: {0}")]
    ScoreOverflow(String),

    // Construction
    #[error("Expected arrow count must be at least 1")]
    ZeroArrowCount,

    #[error("Too many arrows: expected {expected}, found {found}")]
    TooManyArrows { expected: u32, found: u32 },

    #[error("Row kind '{row_kind}' cannot be stored under role {role}")]
    RoleMismatch { role: ArcherRole, row_kind: &'static str },

    #[error("Set {set_number}: duplicate row for role {role}")]
    DuplicateRole { set_number: u32, role: ArcherRole },

    #[error("Set numbers start at 1, got {0}")]
    InvalidSetNumber(u32),

    #[error("Set {set_number}: shoot-off rows are only allowed in a shoot-off set")]
    ShootOffRowOutsideShootOff { set_number: u32 },

    #[error("Set numbers must be sequential: expected {expected}, found {found}")]
    SetNumberSequence { expected: u32, found: u32 },

    #[error("Set {set_number}: a shoot-off is only allowed as set {expected}")]
    ShootOffOutOfPlace { set_number: u32, expected: u32 },

    #[error("Set {set_number}: only one shoot-off set is allowed")]
    DuplicateShootOff { set_number: u32 },

    #[error("Set {set_number}: no set may follow the shoot-off")]
    SetAfterShootOff { set_number: u32 },

    #[error("Match {match_number}: a bye cannot have sets")]
    ByeWithSets { match_number: u32 },

    #[error("Match numbers must increase: {previous} then {found}")]
    MatchNumberOrder { previous: u32, found: u32 },

    #[error("Match {match_number} does not belong to this head-to-head: {reason}")]
    ForeignMatch { match_number: u32, reason: String },

    #[error("Invalid team size: {0}")]
    InvalidTeamSize(u32),

    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    // Boundary
    #[error("Invalid score record: {0}")]
    InvalidRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ScoringError {
    /// True for errors caused by the scored data itself rather than by the
    /// input document or configuration. None of them go away on retry.
    pub fn is_data_integrity(&self) -> bool {
        !matches!(
            self,
            ScoringError::InvalidRules(_) | ScoringError::Serialization(_)
        )
    }
}

impl From<serde_json::Error> for ScoringError {
    fn from(err: serde_json::Error) -> Self {
        ScoringError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for ScoringError {
    fn from(err: serde_yaml::Error) -> Self {
        ScoringError::InvalidRules(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
