use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http_client::{RetryPolicy, fetch_text, http_client};
use crate::state::{LeaderEntry, Leaders, QUARTERS};
use crate::stats::round1;

const NBA_STATS_BASE: &str = "https://stats.nba.com/stats";
const LEADERS_PER_CATEGORY: usize = 2;

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets", default)]
    result_sets: Vec<ResultSet>,
}

/// The tabular `{name, headers, rowSet}` block every stats.nba.com endpoint
/// returns.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    pub row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.column(name)
            .ok_or_else(|| anyhow!("result set {:?} has no column {name}", self.name))
    }
}

fn cell<'a>(row: &'a [Value], idx: usize) -> &'a Value {
    row.get(idx).unwrap_or(&Value::Null)
}

fn cell_str(row: &[Value], idx: usize) -> String {
    match cell(row, idx) {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn cell_f64(row: &[Value], idx: usize) -> Option<f64> {
    match cell(row, idx) {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn cell_i64(row: &[Value], idx: usize) -> Option<i64> {
    cell_f64(row, idx).map(|v| v.round() as i64)
}

// Quarter points are null for games that haven't reached that period.
fn cell_points(row: &[Value], idx: Option<usize>) -> u32 {
    idx.and_then(|i| cell_i64(row, i))
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

fn parse_result_sets(raw: &str) -> Result<Vec<ResultSet>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let parsed: StatsResponse = serde_json::from_str(trimmed).context("invalid stats json")?;
    Ok(parsed.result_sets)
}

fn named_set(sets: &[ResultSet], name: &str, fallback_idx: usize) -> Option<ResultSet> {
    sets.iter()
        .find(|s| s.name == name)
        .or_else(|| sets.get(fallback_idx))
        .cloned()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledGame {
    pub game_id: String,
    pub api_date: String,
    pub status_text: String,
    pub home_id: u32,
    pub visitor_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineScoreRow {
    pub game_id: String,
    pub team_id: u32,
    #[serde(default)]
    pub team_abbr: String,
    pub quarters: [u32; QUARTERS],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreboardDay {
    pub games: Vec<ScheduledGame>,
    pub line_scores: Vec<LineScoreRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamGameRow {
    pub game_id: String,
    pub game_date: String,
    pub matchup: String,
    pub wl: String,
    pub pts: i64,
    pub plus_minus: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDashRow {
    pub name: String,
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
}

pub fn parse_scoreboard_json(raw: &str, api_date: &str) -> Result<ScoreboardDay> {
    let sets = parse_result_sets(raw)?;
    let mut day = ScoreboardDay::default();

    if let Some(header) = named_set(&sets, "GameHeader", 0) {
        let game_id = header.require("GAME_ID")?;
        let home = header.require("HOME_TEAM_ID")?;
        let visitor = header.require("VISITOR_TEAM_ID")?;
        let status = header.column("GAME_STATUS_TEXT");
        for row in &header.row_set {
            let (Some(home_id), Some(visitor_id)) = (cell_i64(row, home), cell_i64(row, visitor))
            else {
                continue;
            };
            day.games.push(ScheduledGame {
                game_id: cell_str(row, game_id),
                api_date: api_date.to_string(),
                status_text: status.map(|i| cell_str(row, i)).unwrap_or_default(),
                home_id: home_id as u32,
                visitor_id: visitor_id as u32,
            });
        }
    }

    if let Some(lines) = named_set(&sets, "LineScore", 1) {
        let game_id = lines.require("GAME_ID")?;
        let team_id = lines.require("TEAM_ID")?;
        let abbr = lines.column("TEAM_ABBREVIATION");
        let qcols = ["PTS_QTR1", "PTS_QTR2", "PTS_QTR3", "PTS_QTR4"].map(|c| lines.column(c));
        for row in &lines.row_set {
            let Some(team) = cell_i64(row, team_id) else {
                continue;
            };
            day.line_scores.push(LineScoreRow {
                game_id: cell_str(row, game_id),
                team_id: team as u32,
                team_abbr: abbr.map(|i| cell_str(row, i)).unwrap_or_default(),
                quarters: qcols.map(|c| cell_points(row, c)),
            });
        }
    }

    Ok(day)
}

pub fn parse_game_finder_json(raw: &str) -> Result<Vec<TeamGameRow>> {
    let sets = parse_result_sets(raw)?;
    let Some(set) = sets.into_iter().next() else {
        return Ok(Vec::new());
    };
    let game_id = set.require("GAME_ID")?;
    let game_date = set.require("GAME_DATE")?;
    let matchup = set.require("MATCHUP")?;
    let wl = set.require("WL")?;
    let pts = set.require("PTS")?;
    let plus_minus = set.column("PLUS_MINUS");

    let mut out = Vec::new();
    for row in &set.row_set {
        let Some(points) = cell_i64(row, pts) else {
            continue;
        };
        out.push(TeamGameRow {
            game_id: cell_str(row, game_id),
            game_date: cell_str(row, game_date),
            matchup: cell_str(row, matchup),
            wl: cell_str(row, wl),
            pts: points,
            plus_minus: plus_minus.and_then(|i| cell_f64(row, i)),
        });
    }
    Ok(out)
}

pub fn parse_player_dashboard_json(raw: &str) -> Result<Vec<PlayerDashRow>> {
    let sets = parse_result_sets(raw)?;
    let Some(set) = named_set(&sets, "PlayersSeasonTotals", 1) else {
        return Ok(Vec::new());
    };
    let name = set.require("PLAYER_NAME")?;
    let pts = set.require("PTS")?;
    let reb = set.require("REB")?;
    let ast = set.require("AST")?;
    Ok(set
        .row_set
        .iter()
        .map(|row| PlayerDashRow {
            name: cell_str(row, name),
            pts: cell_f64(row, pts).unwrap_or(0.0),
            reb: cell_f64(row, reb).unwrap_or(0.0),
            ast: cell_f64(row, ast).unwrap_or(0.0),
        })
        .collect())
}

fn top_by(rows: &[PlayerDashRow], value: impl Fn(&PlayerDashRow) -> f64) -> Vec<LeaderEntry> {
    let mut sorted = rows.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| value(b).total_cmp(&value(a)));
    sorted
        .into_iter()
        .take(LEADERS_PER_CATEGORY)
        .map(|r| LeaderEntry {
            name: r.name.clone(),
            val: round1(value(r)),
        })
        .collect()
}

pub fn leaders_from_rows(rows: &[PlayerDashRow]) -> Leaders {
    Leaders {
        pts: top_by(rows, |r| r.pts),
        reb: top_by(rows, |r| r.reb),
        ast: top_by(rows, |r| r.ast),
    }
}

pub fn scoreboard_url(date: NaiveDate) -> String {
    format!(
        "{NBA_STATS_BASE}/scoreboardv2?DayOffset=0&GameDate={}&LeagueID=00",
        date.format("%Y-%m-%d")
    )
}

pub fn game_finder_url(season: &str, team_id: u32, vs_team_id: Option<u32>) -> String {
    let mut url = format!(
        "{NBA_STATS_BASE}/leaguegamefinder?PlayerOrTeam=T&LeagueID=00&Season={season}&TeamID={team_id}"
    );
    if let Some(vs) = vs_team_id {
        url.push_str(&format!("&VsTeamID={vs}"));
    }
    url
}

pub fn player_dashboard_url(season: &str, team_id: u32) -> String {
    format!(
        "{NBA_STATS_BASE}/teamplayerdashboard?TeamID={team_id}&Season={season}\
         &SeasonType=Regular%20Season&PerMode=PerGame&MeasureType=Base&LeagueID=00\
         &PaceAdjust=N&PlusMinus=N&Rank=N&Period=0&Month=0&OpponentTeamID=0&LastNGames=0\
         &PORound=0&DateFrom=&DateTo=&GameSegment=&Location=&Outcome=&SeasonSegment=\
         &VsConference=&VsDivision=&ShotClockRange="
    )
}

/// Blocking stats.nba.com client. Every call goes through the retry policy.
pub struct NbaStatsSource {
    client: &'static Client,
    retry: RetryPolicy,
    season: String,
}

impl NbaStatsSource {
    pub fn new(season: &str, retry: RetryPolicy) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            retry,
            season: season.to_string(),
        })
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    fn get(&self, label: &str, url: &str) -> Result<String> {
        self.retry.run(label, || fetch_text(self.client, url))
    }

    pub fn fetch_scoreboard(&self, date: NaiveDate) -> Result<ScoreboardDay> {
        let api_date = date.format("%Y-%m-%d").to_string();
        let body = self.get(&format!("scoreboard {api_date}"), &scoreboard_url(date))?;
        parse_scoreboard_json(&body, &api_date)
    }

    pub fn fetch_team_games(&self, team_id: u32) -> Result<Vec<TeamGameRow>> {
        let url = game_finder_url(&self.season, team_id, None);
        let body = self.get(&format!("team games {team_id}"), &url)?;
        parse_game_finder_json(&body).context("team games")
    }

    pub fn fetch_h2h_games(&self, team_id: u32, vs_team_id: u32) -> Result<Vec<TeamGameRow>> {
        let url = game_finder_url(&self.season, team_id, Some(vs_team_id));
        let body = self.get(&format!("h2h {team_id} vs {vs_team_id}"), &url)?;
        parse_game_finder_json(&body).context("h2h games")
    }

    pub fn fetch_leaders(&self, team_id: u32) -> Result<Leaders> {
        let url = player_dashboard_url(&self.season, team_id);
        let body = self.get(&format!("leaders {team_id}"), &url)?;
        let rows = parse_player_dashboard_json(&body).context("player dashboard")?;
        Ok(leaders_from_rows(&rows))
    }
}
