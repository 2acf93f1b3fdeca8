use std::collections::BTreeMap;

use super::{HeadToHeadHeader, MatchHeader, ScoreRecord};
use crate::error::{Result, ScoringError};
use crate::models::{
    ArcherRole, Arrow, ArrowsRow, HeadToHead, Match, MatchRules, ResultRow, Row, Set, ShootOffRow,
    TotalRow,
};

type SetRecords<'a> = BTreeMap<u32, Vec<&'a ScoreRecord>>;

/// Groups flat records into a validated [`HeadToHead`].
///
/// Records are grouped by `(match_number, set_number, role)`. Matches that
/// only appear in `records` get an empty header; headers without records
/// become matches without sets (byes, or matches not yet shot).
pub fn assemble(
    header: &HeadToHeadHeader,
    matches: &[MatchHeader],
    records: &[ScoreRecord],
) -> Result<HeadToHead> {
    let rules = header.rules();
    rules.validate()?;

    if let Some(first) = records.first() {
        if let Some(other) = records.iter().find(|r| r.shoot_id != first.shoot_id) {
            return Err(ScoringError::InvalidRecord(format!(
                "records from shoots {} and {} cannot be mixed",
                first.shoot_id, other.shoot_id
            )));
        }
    }

    let mut headers: BTreeMap<u32, &MatchHeader> = BTreeMap::new();
    for match_header in matches {
        if headers.insert(match_header.match_number, match_header).is_some() {
            return Err(ScoringError::InvalidRecord(format!(
                "duplicate header for match {}",
                match_header.match_number
            )));
        }
    }

    let mut grouped: BTreeMap<u32, SetRecords> = BTreeMap::new();
    for record in records {
        grouped
            .entry(record.match_number)
            .or_default()
            .entry(record.set_number)
            .or_default()
            .push(record);
    }

    let mut match_numbers: Vec<u32> = headers.keys().chain(grouped.keys()).copied().collect();
    match_numbers.sort_unstable();
    match_numbers.dedup();

    let mut h2h = HeadToHead::new(header.format, header.team_size)?
        .with_qualification(header.qualification_rank, header.total_archers);

    for match_number in match_numbers {
        let default_header = MatchHeader::new(match_number);
        let match_header = headers.get(&match_number).copied().unwrap_or(&default_header);
        let sets = grouped.remove(&match_number).unwrap_or_default();
        h2h.push_match(assemble_match(header, &rules, match_header, sets)?)?;
    }

    log::debug!(
        "assembled {} matches from {} score records",
        h2h.matches().len(),
        records.len()
    );
    Ok(h2h)
}

fn assemble_match(
    header: &HeadToHeadHeader,
    rules: &MatchRules,
    match_header: &MatchHeader,
    sets: SetRecords,
) -> Result<Match> {
    let mut builder = Match::builder(match_header.match_number, header.format, header.team_size)
        .bye(match_header.is_bye)
        .rules(*rules);
    if let Some(heat) = &match_header.heat {
        builder = builder.heat(heat.clone());
    }
    if let Some(name) = &match_header.opponent_name {
        builder = builder.opponent(name.clone());
    }
    if let Some(rank) = match_header.opponent_qualification_rank {
        builder = builder.opponent_rank(rank);
    }

    for (set_number, set_records) in sets {
        builder = builder.set(assemble_set(set_number, &set_records, header.team_size, rules)?);
    }
    builder.build()
}

fn assemble_set(
    set_number: u32,
    records: &[&ScoreRecord],
    team_size: u32,
    rules: &MatchRules,
) -> Result<Set> {
    let is_shoot_off = records.first().is_some_and(|r| r.is_shoot_off);
    if records.iter().any(|r| r.is_shoot_off != is_shoot_off) {
        return Err(ScoringError::InvalidRecord(format!(
            "set {set_number} mixes shoot-off and regular records"
        )));
    }

    let mut by_role: BTreeMap<ArcherRole, Vec<&ScoreRecord>> = BTreeMap::new();
    for &record in records {
        by_role.entry(record.role).or_default().push(record);
    }

    let mut rows = Vec::with_capacity(by_role.len());
    for (role, role_records) in by_role {
        let expected = || {
            role_records
                .iter()
                .find_map(|r| r.expected_arrows)
                .unwrap_or_else(|| rules.expected_arrows(role, team_size, is_shoot_off))
        };
        rows.push(assemble_row(set_number, role, &role_records, expected)?);
    }
    Set::new(set_number, is_shoot_off, rows)
}

fn assemble_row(
    set_number: u32,
    role: ArcherRole,
    records: &[&ScoreRecord],
    expected: impl Fn() -> u32,
) -> Result<Row> {
    match role {
        ArcherRole::Result => {
            let record = single(set_number, role, records)?;
            let result = record.result.ok_or_else(|| {
                ScoringError::InvalidRecord(format!("set {set_number}: RESULT record without a result"))
            })?;
            Ok(ResultRow { result, record_id: record.record_id }.into())
        }
        ArcherRole::ShootOff => {
            let record = single(set_number, role, records)?;
            Ok(ShootOffRow { result: record.result, record_id: record.record_id }.into())
        }
        _ if records.iter().all(|r| r.is_total_marker()) => {
            let record = single(set_number, role, records)?;
            let row = TotalRow::new(role, expected(), record.score)?;
            Ok(match record.record_id {
                Some(id) => row.with_record_id(id),
                None => row,
            }
            .into())
        }
        _ if records.iter().any(|r| r.is_total_marker()) => Err(ScoringError::InvalidRecord(
            format!("set {set_number}: {role} mixes arrow and total records"),
        )),
        _ => {
            let mut sorted: Vec<&ScoreRecord> = records.to_vec();
            sorted.sort_by_key(|r| r.arrow_number);

            let mut arrows = Vec::with_capacity(sorted.len());
            let mut previous = 0;
            for record in sorted {
                let arrow_number = record.arrow_number.unwrap_or_default();
                if arrow_number == previous {
                    return Err(ScoringError::InvalidRecord(format!(
                        "set {set_number}: {role} arrow {arrow_number} is duplicated or unnumbered"
                    )));
                }
                previous = arrow_number;

                // Unshot arrows are placeholders, not scores
                let Some(score) = record.score else { continue };
                arrows.push(Arrow { score, is_x: record.is_x, record_id: record.record_id });
            }
            Ok(ArrowsRow::new(role, expected(), arrows)?.into())
        }
    }
}

fn single<'a>(set_number: u32, role: ArcherRole, records: &[&'a ScoreRecord]) -> Result<&'a ScoreRecord> {
    match records {
        [record] => Ok(*record),
        _ => Err(ScoringError::InvalidRecord(format!(
            "set {set_number}: expected one {role} record, found {}",
            records.len()
        ))),
    }
}
