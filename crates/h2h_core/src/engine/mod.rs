//! # Scoring engine
//!
//! Row → Set → [`SetResultResolver`] → [`RunningTotalsCalculator`] →
//! [`MatchResultResolver`]. Every function is a pure read of an immutable
//! match snapshot; nothing here mutates or caches.

pub mod match_result;
pub mod running_totals;
pub mod set_result;


pub use match_result::MatchResultResolver;
pub use running_totals::{score_delta, NoResult, RunningTotal, RunningTotalStep, RunningTotalsCalculator};
pub use set_result::{Outcome, Resolution, SetResultResolver, Side};
