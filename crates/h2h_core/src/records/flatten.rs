use super::{HeadToHeadHeader, MatchHeader, ScoreRecord};
use crate::models::{HeadToHead, Match, Row, Set};

/// Flat records for one set, in role order then arrow order.
///
/// An arrows row without any arrow produces no record.
pub fn flatten_set(shoot_id: i64, match_number: u32, set: &Set) -> Vec<ScoreRecord> {
    let base = |role| ScoreRecord {
        shoot_id,
        match_number,
        set_number: set.set_number(),
        role,
        arrow_number: None,
        score: None,
        is_x: false,
        result: None,
        is_shoot_off: set.is_shoot_off(),
        expected_arrows: None,
        record_id: None,
    };

    let mut records = Vec::new();
    for row in set.rows() {
        let role = row.role();
        match row {
            Row::Arrows(arrows) => {
                records.extend(arrows.arrows().iter().zip(1u32..).map(|(arrow, n)| ScoreRecord {
                    arrow_number: Some(n),
                    score: Some(arrow.score),
                    is_x: arrow.is_x,
                    expected_arrows: Some(arrows.expected_arrow_count()),
                    record_id: arrow.record_id,
                    ..base(role)
                }));
            }
            Row::Total(total) => records.push(ScoreRecord {
                score: total.total(),
                expected_arrows: Some(total.expected_arrow_count()),
                record_id: total.record_id(),
                ..base(role)
            }),
            Row::Result(result) => records.push(ScoreRecord {
                result: Some(result.result),
                record_id: result.record_id,
                ..base(role)
            }),
            Row::ShootOff(shoot_off) => records.push(ScoreRecord {
                result: shoot_off.result,
                record_id: shoot_off.record_id,
                ..base(role)
            }),
        }
    }
    records
}

pub fn flatten_match(shoot_id: i64, m: &Match) -> (MatchHeader, Vec<ScoreRecord>) {
    let header = MatchHeader {
        match_number: m.match_number(),
        heat: m.heat().map(str::to_string),
        opponent_name: m.opponent_name().map(str::to_string),
        opponent_qualification_rank: m.opponent_qualification_rank(),
        is_bye: m.is_bye(),
    };
    let records = m
        .sets()
        .iter()
        .flat_map(|set| flatten_set(shoot_id, m.match_number(), set))
        .collect();
    (header, records)
}

/// Inverse of [`assemble`](super::assemble): headers plus every score record.
pub fn flatten_head_to_head(
    shoot_id: i64,
    h2h: &HeadToHead,
) -> (HeadToHeadHeader, Vec<MatchHeader>, Vec<ScoreRecord>) {
    let header = HeadToHeadHeader {
        qualification_rank: h2h.qualification_rank(),
        total_archers: h2h.total_archers(),
        team_size: h2h.team_size(),
        format: h2h.format(),
        rules: h2h.matches().first().map(|m| *m.rules()),
    };

    let mut match_headers = Vec::with_capacity(h2h.matches().len());
    let mut records = Vec::new();
    for m in h2h.matches() {
        let (match_header, match_records) = flatten_match(shoot_id, m);
        match_headers.push(match_header);
        records.extend(match_records);
    }
    log::debug!("flattened {} matches into {} score records", match_headers.len(), records.len());
    (header, match_headers, records)
}
