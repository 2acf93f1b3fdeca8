//! Head-to-head match rules
//!
//! 승리 세트 포인트, 정규 세트 수, 세트당 화살 수를 한 값으로 묶어 경기마다 전달합니다.
//! Defaults follow the published recurve/compound head-to-head rules:
//! race to 6 set points, 5 regular sets for individuals and 4 for teams.
//!
//! ## Usage
//!
//! ```rust
//! use h2h_core::models::MatchRules;
//!
//! let individual = MatchRules::standard(1);
//! assert_eq!(individual.regular_set_count, 5);
//!
//! let from_yaml = MatchRules::from_yaml("winning_points: 5\nregular_set_count: 4\n").unwrap();
//! assert_eq!(from_yaml.winning_points, 5);
//! ```
//!
//! ## Environment Variables
//!
//! - `H2H_RULES_PATH`: YAML rules file used by [`MatchRules::from_env_or_default`]

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::role::ArcherRole;
use crate::error::{Result, ScoringError};

pub const RULES_PATH_ENV: &str = "H2H_RULES_PATH";

pub const DEFAULT_WINNING_POINTS: u32 = 6;
pub const INDIVIDUAL_REGULAR_SETS: u32 = 5;
pub const TEAM_REGULAR_SETS: u32 = 4;

const INDIVIDUAL_ARROWS_PER_SET: u32 = 3;
const TEAM_ARROWS_PER_MEMBER: u32 = 2;
const SHOOT_OFF_ARROWS_PER_MEMBER: u32 = 1;

/// Format constants of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRules {
    /// Set points needed to win a set-points match
    pub winning_points: u32,
    /// Sets shot before a shoot-off may follow
    pub regular_set_count: u32,
    /// Arrows each archer shoots in a regular set
    #[serde(default)]
    pub arrows_per_archer: Option<u32>,
    /// Arrows each archer shoots in a shoot-off
    #[serde(default)]
    pub shoot_off_arrows_per_archer: Option<u32>,
}

impl MatchRules {
    /// Standard rules for the given team size.
    pub fn standard(team_size: u32) -> Self {
        Self {
            winning_points: DEFAULT_WINNING_POINTS,
            regular_set_count: if team_size == 1 {
                INDIVIDUAL_REGULAR_SETS
            } else {
                TEAM_REGULAR_SETS
            },
            arrows_per_archer: None,
            shoot_off_arrows_per_archer: None,
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let rules: MatchRules = serde_yaml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let rules: MatchRules =
            serde_json::from_str(content).map_err(|e| ScoringError::InvalidRules(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Loads a YAML (or `.json`) rules file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScoringError::InvalidRules(format!("failed to read {}: {e}", path.display()))
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Rules file named by `H2H_RULES_PATH`, or [`MatchRules::standard`].
    pub fn from_env_or_default(team_size: u32) -> Self {
        let Ok(path) = env::var(RULES_PATH_ENV) else {
            return Self::standard(team_size);
        };
        let path = path.trim();
        if path.is_empty() {
            return Self::standard(team_size);
        }

        match Self::from_path(Path::new(path)) {
            Ok(rules) => {
                log::debug!("Loaded match rules from {}={}", RULES_PATH_ENV, path);
                rules
            }
            Err(e) => {
                log::warn!("Ignoring {}='{}': {}", RULES_PATH_ENV, path, e);
                Self::standard(team_size)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.winning_points == 0 {
            return Err(ScoringError::InvalidRules("winning_points must be at least 1".into()));
        }
        if self.regular_set_count == 0 {
            return Err(ScoringError::InvalidRules("regular_set_count must be at least 1".into()));
        }
        if self.arrows_per_archer == Some(0) || self.shoot_off_arrows_per_archer == Some(0) {
            return Err(ScoringError::InvalidRules("arrow counts must be at least 1".into()));
        }
        Ok(())
    }

    /// Arrows a single archer shoots in one set.
    pub fn arrows_per_archer(&self, team_size: u32, is_shoot_off: bool) -> u32 {
        if is_shoot_off {
            return self.shoot_off_arrows_per_archer.unwrap_or(SHOOT_OFF_ARROWS_PER_MEMBER);
        }
        self.arrows_per_archer.unwrap_or(if team_size == 1 {
            INDIVIDUAL_ARROWS_PER_SET
        } else {
            TEAM_ARROWS_PER_MEMBER
        })
    }

    /// Expected arrow count of a row stored under `role`.
    ///
    /// Combined `TEAM` rows, and the opponent row of a team match, cover every
    /// member of the side.
    pub fn expected_arrows(&self, role: ArcherRole, team_size: u32, is_shoot_off: bool) -> u32 {
        let per_archer = self.arrows_per_archer(team_size, is_shoot_off);
        match role {
            ArcherRole::Team | ArcherRole::Opponent => per_archer * team_size.max(1),
            _ => per_archer,
        }
    }
}
