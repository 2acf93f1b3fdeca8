pub mod h2h_match;
pub mod head_to_head;
pub mod role;
pub mod row;
pub mod rules;
pub mod set;

pub use h2h_match::{Match, MatchBuilder, MatchFormat};
pub use head_to_head::{HeadToHead, HeadToHeadSummary};
pub use role::{ArcherRole, RoleMap};
pub use row::{Arrow, ArrowsRow, RecordId, ResultRow, Row, ShootOffRow, TotalRow, Verdict};
pub use rules::MatchRules;
pub use set::Set;
