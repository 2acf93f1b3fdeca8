//! Rows: the scored value of one role in one set.

use serde::{Deserialize, Serialize};

use super::role::ArcherRole;
use crate::error::{Result, ScoringError};

/// A literal set decision, as recorded in a result or shoot-off row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Win,
    Tie,
    Loss,
}

/// Write-back key handed over by the persistence layer. Never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Arrow {
    pub score: u32,
    /// Maximum-value shot (inner ten)
    pub is_x: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
}

impl Arrow {
    pub fn new(score: u32) -> Self {
        Self { score, is_x: false, record_id: None }
    }

    pub fn x(score: u32) -> Self {
        Self { score, is_x: true, record_id: None }
    }

    pub fn with_record_id(mut self, record_id: RecordId) -> Self {
        self.record_id = Some(record_id);
        self
    }
}

/// Arrow-by-arrow entry. Complete once every expected arrow is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrowsRow {
    role: ArcherRole,
    expected_arrow_count: u32,
    arrows: Vec<Arrow>,
}

impl ArrowsRow {
    pub fn new(role: ArcherRole, expected_arrow_count: u32, arrows: Vec<Arrow>) -> Result<Self> {
        check_scoring_role(role, "arrows")?;
        if expected_arrow_count == 0 {
            return Err(ScoringError::ZeroArrowCount);
        }
        if arrows.len() > expected_arrow_count as usize {
            return Err(ScoringError::TooManyArrows {
                expected: expected_arrow_count,
                found: arrows.len() as u32,
            });
        }
        if sum_scores(&arrows).is_none() {
            return Err(ScoringError::ScoreOverflow(format!("{role} arrow scores")));
        }
        Ok(Self { role, expected_arrow_count, arrows })
    }

    /// Convenience for plain scores without X flags or record ids.
    pub fn from_scores(role: ArcherRole, expected_arrow_count: u32, scores: &[u32]) -> Result<Self> {
        Self::new(role, expected_arrow_count, scores.iter().copied().map(Arrow::new).collect())
    }

    pub fn role(&self) -> ArcherRole {
        self.role
    }

    pub fn expected_arrow_count(&self) -> u32 {
        self.expected_arrow_count
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    pub fn is_complete(&self) -> bool {
        self.arrows.len() == self.expected_arrow_count as usize
    }

    pub fn total(&self) -> Option<u32> {
        if self.is_complete() {
            sum_scores(&self.arrows)
        } else {
            None
        }
    }
}

fn sum_scores(arrows: &[Arrow]) -> Option<u32> {
    arrows.iter().try_fold(0u32, |total, arrow| total.checked_add(arrow.score))
}

/// Single-total entry. Complete once the total is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalRow {
    role: ArcherRole,
    expected_arrow_count: u32,
    total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    record_id: Option<RecordId>,
}

impl TotalRow {
    pub fn new(role: ArcherRole, expected_arrow_count: u32, total: Option<u32>) -> Result<Self> {
        check_scoring_role(role, "total")?;
        if expected_arrow_count == 0 {
            return Err(ScoringError::ZeroArrowCount);
        }
        Ok(Self { role, expected_arrow_count, total, record_id: None })
    }

    pub fn with_record_id(mut self, record_id: RecordId) -> Self {
        self.record_id = Some(record_id);
        self
    }

    pub fn role(&self) -> ArcherRole {
        self.role
    }

    pub fn expected_arrow_count(&self) -> u32 {
        self.expected_arrow_count
    }

    pub fn total(&self) -> Option<u32> {
        self.total
    }

    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    pub fn is_complete(&self) -> bool {
        self.total.is_some()
    }
}

/// Recorded set result. Lives under [`ArcherRole::Result`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub result: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
}

impl ResultRow {
    pub fn new(result: Verdict) -> Self {
        Self { result, record_id: None }
    }
}

/// Tie-break decision of a shoot-off. Lives under [`ArcherRole::ShootOff`].
///
/// `None` means the scores differ and no tie-break was needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShootOffRow {
    pub result: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
}

impl ShootOffRow {
    pub fn new(result: Option<Verdict>) -> Self {
        Self { result, record_id: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Row {
    Arrows(ArrowsRow),
    Total(TotalRow),
    Result(ResultRow),
    ShootOff(ShootOffRow),
}

impl Row {
    pub fn role(&self) -> ArcherRole {
        match self {
            Row::Arrows(row) => row.role,
            Row::Total(row) => row.role,
            Row::Result(_) => ArcherRole::Result,
            Row::ShootOff(_) => ArcherRole::ShootOff,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Row::Arrows(_) => "arrows",
            Row::Total(_) => "total",
            Row::Result(_) => "result",
            Row::ShootOff(_) => "shoot_off",
        }
    }

    /// Total of a complete scoring row; `None` for incomplete or non-scoring rows.
    pub fn complete_total(&self) -> Option<u32> {
        match self {
            Row::Arrows(row) => row.total(),
            Row::Total(row) => row.total(),
            Row::Result(_) | Row::ShootOff(_) => None,
        }
    }
}

impl From<ArrowsRow> for Row {
    fn from(row: ArrowsRow) -> Self {
        Row::Arrows(row)
    }
}

impl From<TotalRow> for Row {
    fn from(row: TotalRow) -> Self {
        Row::Total(row)
    }
}

impl From<ResultRow> for Row {
    fn from(row: ResultRow) -> Self {
        Row::Result(row)
    }
}

impl From<ShootOffRow> for Row {
    fn from(row: ShootOffRow) -> Self {
        Row::ShootOff(row)
    }
}

fn check_scoring_role(role: ArcherRole, row_kind: &'static str) -> Result<()> {
    if role.is_scoring() {
        Ok(())
    } else {
        Err(ScoringError::RoleMismatch { role, row_kind })
    }
}
