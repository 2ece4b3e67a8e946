use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::nba_fetch::{LineScoreRow, TeamGameRow};
use crate::state::{GameRecord, HeadToHeadRecord, LAST_N_GAMES, QUARTERS, WinLoss};
use crate::stats::latest_window;

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("game {game_id}: negative score {value} for {field}")]
    NegativeScore {
        game_id: String,
        field: &'static str,
        value: i64,
    },
    #[error("game {game_id}: unparseable date {raw:?}")]
    BadDate { game_id: String, raw: String },
    #[error("game {game_id}: unknown result code {raw:?}")]
    BadResult { game_id: String, raw: String },
    #[error("row without game id")]
    MissingGameId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuarterLine {
    pub quarters: [u32; QUARTERS],
}

impl QuarterLine {
    pub fn pts_1h(&self) -> u32 {
        self.quarters[0] + self.quarters[1]
    }
}

/// Per-game quarter scores keyed by game id, then team id. Built by the
/// collection stage from scoreboard line scores and handed to the record
/// builders explicitly.
#[derive(Debug, Clone, Default)]
pub struct QuarterCache {
    games: HashMap<String, HashMap<u32, QuarterLine>>,
}

impl QuarterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn insert(&mut self, row: &LineScoreRow) {
        self.games.entry(row.game_id.clone()).or_default().insert(
            row.team_id,
            QuarterLine {
                quarters: row.quarters,
            },
        );
    }

    pub fn extend<'a>(&mut self, rows: impl IntoIterator<Item = &'a LineScoreRow>) {
        for row in rows {
            self.insert(row);
        }
    }

    pub fn team_line(&self, game_id: &str, team_id: u32) -> Option<QuarterLine> {
        self.games.get(game_id)?.get(&team_id).copied()
    }

    /// The other side's line for a game, whichever team that was.
    pub fn opponent_line(&self, game_id: &str, team_id: u32) -> Option<QuarterLine> {
        self.games
            .get(game_id)?
            .iter()
            .find(|(id, _)| **id != team_id)
            .map(|(_, line)| *line)
    }
}

fn non_negative(game_id: &str, field: &'static str, value: i64) -> Result<u32, RecordError> {
    u32::try_from(value).map_err(|_| RecordError::NegativeScore {
        game_id: game_id.to_string(),
        field,
        value,
    })
}

fn normalize_date(game_id: &str, raw: &str) -> Result<String, RecordError> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| RecordError::BadDate {
            game_id: game_id.to_string(),
            raw: raw.to_string(),
        })
}

fn opponent_points(row: &TeamGameRow) -> i64 {
    row.pts - row.plus_minus.unwrap_or(0.0).round() as i64
}

pub fn build_game_record(
    row: &TeamGameRow,
    team_id: u32,
    cache: &QuarterCache,
) -> Result<GameRecord, RecordError> {
    if row.game_id.is_empty() {
        return Err(RecordError::MissingGameId);
    }
    let pts = non_negative(&row.game_id, "pts", row.pts)?;
    let opp_pts = non_negative(&row.game_id, "opp_pts", opponent_points(row))?;
    let date = normalize_date(&row.game_id, &row.game_date)?;
    let wl = WinLoss::from_code(&row.wl).ok_or_else(|| RecordError::BadResult {
        game_id: row.game_id.clone(),
        raw: row.wl.clone(),
    })?;

    let own = cache.team_line(&row.game_id, team_id).unwrap_or_default();
    let opp = cache
        .opponent_line(&row.game_id, team_id)
        .unwrap_or_default();

    Ok(GameRecord {
        game_id: row.game_id.clone(),
        date,
        matchup: row.matchup.clone(),
        is_home: row.matchup.contains("vs."),
        wl,
        pts,
        opp_pts,
        pts_1h: own.pts_1h(),
        opp_pts_1h: opp.pts_1h(),
        quarters: own.quarters,
        opp_quarters: opp.quarters,
    })
}

/// Builds the latest-ten window for a team, skipping rows that fail
/// validation. Rejected rows are returned alongside so callers can log them.
pub fn build_team_logs(
    rows: &[TeamGameRow],
    team_id: u32,
    cache: &QuarterCache,
) -> (Vec<GameRecord>, Vec<RecordError>) {
    let mut records = Vec::new();
    let mut rejected = Vec::new();
    for row in rows {
        match build_game_record(row, team_id, cache) {
            Ok(record) => records.push(record),
            Err(err) => rejected.push(err),
        }
    }
    (latest_window(records, LAST_N_GAMES), rejected)
}

/// Head-to-head rows come from the home team's game log filtered to the
/// visitor, so `pts` is the home side.
pub fn build_h2h_logs(
    rows: &[TeamGameRow],
    home_id: u32,
    visitor_id: u32,
    cache: &QuarterCache,
) -> (Vec<HeadToHeadRecord>, Vec<RecordError>) {
    let mut out = Vec::new();
    let mut rejected = Vec::new();
    for row in rows {
        let built = non_negative(&row.game_id, "pts", row.pts).and_then(|home_pts| {
            let visitor_pts = non_negative(&row.game_id, "opp_pts", opponent_points(row))?;
            let date = normalize_date(&row.game_id, &row.game_date)?;
            Ok(HeadToHeadRecord {
                date,
                home_pts,
                visitor_pts,
                home_1h: cache
                    .team_line(&row.game_id, home_id)
                    .map(|l| l.pts_1h())
                    .unwrap_or(0),
                visitor_1h: cache
                    .team_line(&row.game_id, visitor_id)
                    .map(|l| l.pts_1h())
                    .unwrap_or(0),
            })
        });
        match built {
            Ok(record) => out.push(record),
            Err(err) => rejected.push(err),
        }
    }
    out.sort_by(|a, b| b.date.cmp(&a.date));
    (out, rejected)
}
