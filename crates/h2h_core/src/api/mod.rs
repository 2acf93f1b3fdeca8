pub mod json_api;
pub mod report;

pub use json_api::{
    error_codes, parse_head_to_head_json, score_head_to_head_json, score_match_json, ArrowData,
    HeadToHeadRequest, MatchData, MatchRequest, RowData, SetData, SCHEMA_VERSION,
};
pub use report::{report_head_to_head, report_match, HeadToHeadReport, MatchReport, SetReport};
