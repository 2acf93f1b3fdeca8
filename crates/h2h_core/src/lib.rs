//! # h2h_core - Head-to-Head Archery Match Scoring
//!
//! Scoring engine for elimination (head-to-head) archery matches, individual
//! and team, in set-points or total-points format.
//!
//! ## Features
//! - Per-set resolution from arrows, totals or recorded decisions
//! - Running totals that stay poisoned once a set is incomplete or unknown
//! - Match result for race-to-points and cumulative formats, byes and shoot-offs
//! - Flat score record assembly for the persistence layer
//! - JSON API for scoreboards and tooling

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Method naming conventions - would require API changes
#![allow(clippy::should_implement_trait)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod records;

// Re-export main API functions
pub use api::{
    report_head_to_head, report_match, score_head_to_head_json, score_match_json,
    HeadToHeadReport, MatchReport,
};
pub use engine::{
    MatchResultResolver, Outcome, RunningTotal, RunningTotalsCalculator, SetResultResolver,
};
pub use error::{Result, ScoringError};
pub use models::{HeadToHead, Match, MatchFormat, MatchRules, Set};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
