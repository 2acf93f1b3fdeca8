//! Head-to-head scoring CLI library
//!
//! CSV score records → assembled head-to-head → scoreboard report
//! JSON head-to-head → flat CSV score records

use anyhow::{anyhow, Context, Result};
use h2h_core::api::{self, HeadToHeadReport};
use h2h_core::records::{self, HeadToHeadHeader, MatchHeader, ScoreRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut rows = Vec::new();
    for (i, row) in reader.deserialize().enumerate() {
        // +2: 1-based, after the header line
        let row: T = row.with_context(|| format!("{}: invalid row at line {}", path.display(), i + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

fn write_csv<T: Serialize, W: Write>(writer: W, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Score records CSV (`shoot_id,match_number,set_number,role,arrow_number,score,...`)
pub fn load_score_records(path: &Path) -> Result<Vec<ScoreRecord>> {
    let records: Vec<ScoreRecord> = read_csv(path)?;
    log::info!("Loaded {} score records from {}", records.len(), path.display());
    Ok(records)
}

/// Match header CSV (`match_number,heat,opponent_name,opponent_qualification_rank,is_bye`)
pub fn load_match_headers(path: &Path) -> Result<Vec<MatchHeader>> {
    read_csv(path)
}

pub fn write_score_records<W: Write>(writer: W, records: &[ScoreRecord]) -> Result<()> {
    write_csv(writer, records)
}

pub fn write_match_headers<W: Write>(writer: W, headers: &[MatchHeader]) -> Result<()> {
    write_csv(writer, headers)
}

/// Assembles the CSV files into a head-to-head and scores it.
pub fn score_record_files(
    header: &HeadToHeadHeader,
    scores_csv: &Path,
    matches_csv: Option<&Path>,
) -> Result<HeadToHeadReport> {
    let records = load_score_records(scores_csv)?;
    let matches = match matches_csv {
        Some(path) => load_match_headers(path)?,
        None => Vec::new(),
    };

    let h2h = records::assemble(header, &matches, &records)
        .with_context(|| format!("Failed to assemble score records from {}", scores_csv.display()))?;
    api::report_head_to_head(&h2h).context("Failed to score head-to-head")
}

/// Scores a JSON match request file; returns the report JSON.
pub fn score_match_file(input: &Path) -> Result<String> {
    let request = fs::read_to_string(input)
        .with_context(|| format!("Failed to read JSON file: {}", input.display()))?;
    api::score_match_json(&request).map_err(|e| anyhow!("{}: {}", input.display(), e))
}

/// Flat records for every match of a JSON head-to-head request file.
pub fn flatten_file(input: &Path, shoot_id: i64) -> Result<(Vec<MatchHeader>, Vec<ScoreRecord>)> {
    let request = fs::read_to_string(input)
        .with_context(|| format!("Failed to read JSON file: {}", input.display()))?;
    let h2h = api::parse_head_to_head_json(&request)
        .map_err(|e| anyhow!("{}: {}", input.display(), e))?;
    let (_, headers, records) = records::flatten_head_to_head(shoot_id, &h2h);
    Ok((headers, records))
}

/// Writes to `out`, or stdout when no path is given.
pub fn write_output(out: Option<&Path>, contents: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(path, contents)
                .with_context(|| format!("Failed to write output file: {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{contents}").context("Failed to write to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use h2h_core::engine::{Outcome, RunningTotal};
    use h2h_core::models::{ArcherRole, MatchFormat};
    use std::fs::File;
    use tempfile::tempdir;

    const SCORES_CSV: &str = "\
shoot_id,match_number,set_number,role,arrow_number,score,is_x,result,is_shoot_off,expected_arrows,record_id
7,2,1,SELF,1,10,true,,false,3,101
7,2,1,SELF,2,9,false,,false,3,102
7,2,1,SELF,3,9,false,,false,3,103
7,2,1,OPPONENT,,27,false,,false,3,
7,2,2,SELF,,29,false,,false,,
7,2,2,OPPONENT,,29,false,,false,,
7,2,3,RESULT,,,false,LOSS,false,,
";

    const MATCHES_CSV: &str = "\
match_number,heat,opponent_name,opponent_qualification_rank,is_bye
1,1/32,,,true
2,1/16,Archer B,17,false
";

    #[test]
    fn test_score_record_files() {
        let dir = tempdir().unwrap();
        let scores = dir.path().join("scores.csv");
        let matches = dir.path().join("matches.csv");
        fs::write(&scores, SCORES_CSV).unwrap();
        fs::write(&matches, MATCHES_CSV).unwrap();

        let header = HeadToHeadHeader::new(MatchFormat::SetPoints, 1);
        let report = score_record_files(&header, &scores, Some(&matches)).unwrap();

        assert_eq!(report.matches.len(), 2);
        assert!(report.matches[0].is_bye);
        assert_eq!(report.matches[0].result, Outcome::Win);

        let second = &report.matches[1];
        assert_eq!(second.opponent_name.as_deref(), Some("Archer B"));
        assert_eq!(second.sets[0].team_total, Some(28));
        assert_eq!(second.sets[1].result, Outcome::Tie);
        assert_eq!(second.sets[2].running_total, RunningTotal::Points(3, 3));
        assert_eq!(second.result, Outcome::Incomplete);
    }

    #[test]
    fn test_score_records_without_match_headers() {
        let dir = tempdir().unwrap();
        let scores = dir.path().join("scores.csv");
        fs::write(&scores, SCORES_CSV).unwrap();

        let header = HeadToHeadHeader::new(MatchFormat::SetPoints, 1);
        let report = score_record_files(&header, &scores, None).unwrap();
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].match_number, 2);
    }

    #[test]
    fn test_invalid_row_reports_line() {
        let dir = tempdir().unwrap();
        let scores = dir.path().join("scores.csv");
        fs::write(
            &scores,
            "shoot_id,match_number,set_number,role,arrow_number,score\n7,1,1,CAPTAIN,1,10\n",
        )
        .unwrap();

        let err = load_score_records(&scores).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "{err:#}");
    }

    #[test]
    fn test_flatten_file_round_trips_through_csv() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("h2h.json");
        fs::write(
            &input,
            r#"{
                "schema_version": 1,
                "format": "SET_POINTS",
                "matches": [
                    { "match_number": 1, "is_bye": true },
                    { "match_number": 2, "opponent_name": "Archer C", "sets": [
                        { "set_number": 1, "rows": [
                            { "role": "SELF", "arrows": [10, 10, 9] },
                            { "role": "OPPONENT", "total": 26 }
                        ]}
                    ]}
                ]
            }"#,
        )
        .unwrap();

        let (headers, records) = flatten_file(&input, 42).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.shoot_id == 42));

        let scores = dir.path().join("out/scores.csv");
        let matches = dir.path().join("out/matches.csv");
        fs::create_dir_all(dir.path().join("out")).unwrap();
        write_score_records(File::create(&scores).unwrap(), &records).unwrap();
        write_match_headers(File::create(&matches).unwrap(), &headers).unwrap();

        assert_eq!(load_score_records(&scores).unwrap(), records);
        assert_eq!(load_match_headers(&matches).unwrap(), headers);

        let header = HeadToHeadHeader::new(MatchFormat::SetPoints, 1);
        let report = score_record_files(&header, &scores, Some(&matches)).unwrap();
        assert_eq!(report.matches[1].sets[0].result, Outcome::Win);
        assert_eq!(
            report.matches[1].sets[0].running_total,
            RunningTotal::Points(2, 0)
        );
        assert_eq!(
            records.iter().filter(|r| r.role == ArcherRole::Archer).count(),
            3
        );
    }

    #[test]
    fn test_score_match_file_error_carries_code() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("match.json");
        fs::write(&input, r#"{"schema_version": 9, "format": "SET_POINTS", "match": {"match_number": 1}}"#)
            .unwrap();
        let err = score_match_file(&input).unwrap_err();
        assert!(err.to_string().contains("E_SCHEMA"), "{err}");
    }

    #[test]
    fn test_write_output_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/report.json");
        write_output(Some(&out), "{}").unwrap();
        assert_eq!(fs::read_to_string(out).unwrap(), "{}");
    }
}
