//! Scoreboard reports
//!
//! Combines the three engine entry points (per-set result, running totals,
//! match result) into one serializable value per match.

use serde::Serialize;

use crate::engine::{MatchResultResolver, Outcome, RunningTotal, RunningTotalsCalculator};
use crate::error::Result;
use crate::models::{HeadToHead, HeadToHeadSummary, Match, MatchFormat};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetReport {
    pub set_number: u32,
    pub is_shoot_off: bool,
    pub team_total: Option<u32>,
    pub opponent_total: Option<u32>,
    pub result: Outcome,
    pub running_total: RunningTotal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub match_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_name: Option<String>,
    pub is_bye: bool,
    pub format: MatchFormat,
    pub sets: Vec<SetReport>,
    pub result: Outcome,
    pub is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadToHeadReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification_rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_archers: Option<u32>,
    pub team_size: u32,
    pub format: MatchFormat,
    pub matches: Vec<MatchReport>,
    pub summary: HeadToHeadSummary,
}

pub fn report_match(m: &Match) -> Result<MatchReport> {
    let steps = RunningTotalsCalculator::steps(m)?;
    let totals: Vec<RunningTotal> = steps.iter().map(|step| step.running_total).collect();
    let result = MatchResultResolver::from_running_totals(m, &totals);

    let sets = steps
        .into_iter()
        .map(|step| SetReport {
            set_number: step.set_number,
            is_shoot_off: step.is_shoot_off,
            team_total: step.resolution.team_total,
            opponent_total: step.resolution.opponent_total,
            result: step.resolution.outcome,
            running_total: step.running_total,
        })
        .collect();

    Ok(MatchReport {
        match_number: m.match_number(),
        heat: m.heat().map(str::to_string),
        opponent_name: m.opponent_name().map(str::to_string),
        is_bye: m.is_bye(),
        format: m.format(),
        sets,
        result,
        is_complete: result.is_decided(),
    })
}

pub fn report_head_to_head(h2h: &HeadToHead) -> Result<HeadToHeadReport> {
    let matches = h2h.matches().iter().map(report_match).collect::<Result<Vec<_>>>()?;
    Ok(HeadToHeadReport {
        qualification_rank: h2h.qualification_rank(),
        total_archers: h2h.total_archers(),
        team_size: h2h.team_size(),
        format: h2h.format(),
        summary: h2h.summary()?,
        matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArcherRole, ResultRow, Set, TotalRow, Verdict};
    use insta::assert_json_snapshot;

    #[test]
    fn test_report_matches_engine_outputs() {
        let m = Match::builder(3, MatchFormat::TotalPoints, 1)
            .sets((1..=5).map(|n| {
                Set::regular(
                    n,
                    [
                        TotalRow::new(ArcherRole::Archer, 3, Some(29)).unwrap().into(),
                        TotalRow::new(ArcherRole::Opponent, 3, Some(28)).unwrap().into(),
                    ],
                )
                .unwrap()
            }))
            .build()
            .unwrap();

        let report = report_match(&m).unwrap();
        assert_eq!(report.sets.len(), 5);
        assert_eq!(report.sets[4].running_total, RunningTotal::Points(145, 140));
        assert_eq!(report.result, MatchResultResolver::result(&m).unwrap());
        assert_eq!(report.result, Outcome::Win);
        assert!(report.is_complete);
    }

    #[test]
    fn test_match_report_json_shape() {
        let m = Match::builder(1, MatchFormat::SetPoints, 1)
            .heat("1/8")
            .opponent("Archer D")
            .set(
                Set::regular(
                    1,
                    [
                        TotalRow::new(ArcherRole::Archer, 3, Some(29)).unwrap().into(),
                        TotalRow::new(ArcherRole::Opponent, 3, Some(27)).unwrap().into(),
                    ],
                )
                .unwrap(),
            )
            .set(Set::regular(2, [ResultRow::new(Verdict::Tie).into()]).unwrap())
            .set(Set::regular(3, []).unwrap())
            .build()
            .unwrap();

        assert_json_snapshot!(report_match(&m).unwrap(), @r###"
        {
          "match_number": 1,
          "heat": "1/8",
          "opponent_name": "Archer D",
          "is_bye": false,
          "format": "SET_POINTS",
          "sets": [
            {
              "set_number": 1,
              "is_shoot_off": false,
              "team_total": 29,
              "opponent_total": 27,
              "result": "WIN",
              "running_total": {
                "points": [
                  2,
                  0
                ]
              }
            },
            {
              "set_number": 2,
              "is_shoot_off": false,
              "team_total": null,
              "opponent_total": null,
              "result": "TIE",
              "running_total": {
                "points": [
                  3,
                  1
                ]
              }
            },
            {
              "set_number": 3,
              "is_shoot_off": false,
              "team_total": null,
              "opponent_total": null,
              "result": "UNKNOWN",
              "running_total": {
                "status": "UNKNOWN"
              }
            }
          ],
          "result": "UNKNOWN",
          "is_complete": false
        }
        "###);
    }

    #[test]
    fn test_head_to_head_report_includes_summary() {
        let h2h = HeadToHead::new(MatchFormat::SetPoints, 1)
            .unwrap()
            .with_match(Match::builder(1, MatchFormat::SetPoints, 1).bye(true).build().unwrap())
            .unwrap();
        let report = report_head_to_head(&h2h).unwrap();
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.summary.wins, 1);
        assert_eq!(report.summary.byes, 1);
        assert!(report.matches[0].is_complete);
    }
}
