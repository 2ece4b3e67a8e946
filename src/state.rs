use std::collections::VecDeque;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

pub const LAST_N_GAMES: usize = 10;
pub const QUARTERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinLoss {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

impl WinLoss {
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim() {
            "W" => Some(Self::Win),
            "L" => Some(Self::Loss),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Win => "W",
            Self::Loss => "L",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    Home,
    Visitor,
}

/// One completed game seen from one team's side. A zero in any first-half or
/// quarter field means the line score was not available for that game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub date: String,
    #[serde(default)]
    pub matchup: String,
    #[serde(default)]
    pub is_home: bool,
    pub wl: WinLoss,
    pub pts: u32,
    pub opp_pts: u32,
    #[serde(default)]
    pub pts_1h: u32,
    #[serde(default)]
    pub opp_pts_1h: u32,
    #[serde(default)]
    pub quarters: [u32; QUARTERS],
    #[serde(default)]
    pub opp_quarters: [u32; QUARTERS],
}

impl GameRecord {
    pub fn is_win(&self) -> bool {
        self.wl == WinLoss::Win
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamStatsSummary {
    pub games_count: usize,
    pub pts_avg: f64,
    pub pts_min: u32,
    pub pts_max: u32,
    pub pts_1h_avg: f64,
    pub pts_1h_min: u32,
    pub pts_1h_max: u32,
    pub wins: usize,
    pub wins_1h: usize,
    pub quarters: [f64; QUARTERS],
    pub opp_quarters: [f64; QUARTERS],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadRecord {
    pub date: String,
    pub home_pts: u32,
    pub visitor_pts: u32,
    #[serde(default)]
    pub home_1h: u32,
    #[serde(default)]
    pub visitor_1h: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadToHeadSummary {
    pub games: usize,
    pub home_avg: f64,
    pub visitor_avg: f64,
}

impl HeadToHeadSummary {
    pub fn is_empty(&self) -> bool {
        self.games == 0
    }

    /// Average for one side, or `None` when there is nothing usable.
    pub fn avg_for(&self, side: TeamSide) -> Option<f64> {
        let avg = match side {
            TeamSide::Home => self.home_avg,
            TeamSide::Visitor => self.visitor_avg,
        };
        (avg > 0.0).then_some(avg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderEntry {
    pub name: String,
    pub val: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderCategory {
    Points,
    Rebounds,
    Assists,
}

impl LeaderCategory {
    pub const ALL: [LeaderCategory; 3] = [Self::Points, Self::Rebounds, Self::Assists];

    pub fn label(self) -> &'static str {
        match self {
            Self::Points => "Points",
            Self::Rebounds => "Rebounds",
            Self::Assists => "Assists",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Leaders {
    pub pts: Vec<LeaderEntry>,
    pub reb: Vec<LeaderEntry>,
    pub ast: Vec<LeaderEntry>,
}

impl Leaders {
    pub fn category(&self, category: LeaderCategory) -> &[LeaderEntry] {
        match category {
            LeaderCategory::Points => &self.pts,
            LeaderCategory::Rebounds => &self.reb,
            LeaderCategory::Assists => &self.ast,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injury {
    pub player: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub abbr: String,
    #[serde(default)]
    pub last10_logs: Vec<GameRecord>,
    #[serde(default)]
    pub stats: TeamStatsSummary,
    #[serde(default)]
    pub leaders: Leaders,
    #[serde(default)]
    pub injuries: Vec<Injury>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotGame {
    pub game_id: String,
    pub api_date: String,
    #[serde(default)]
    pub game_time: String,
    pub home: TeamEntry,
    pub visitor: TeamEntry,
    #[serde(default)]
    pub h2h_logs: Vec<HeadToHeadRecord>,
    #[serde(default)]
    pub h2h_stats: HeadToHeadSummary,
}

impl SnapshotGame {
    pub fn label(&self) -> String {
        format!("{} @ {}", self.visitor.name, self.home.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub last_updated: String,
    #[serde(default)]
    pub games: Vec<SnapshotGame>,
}

impl Snapshot {
    /// Distinct game dates, oldest first.
    pub fn unique_dates(&self) -> Vec<String> {
        let mut dates = self
            .games
            .iter()
            .map(|g| g.api_date.clone())
            .collect::<Vec<_>>();
        dates.sort();
        dates.dedup();
        dates
    }

    pub fn games_on(&self, date: &str) -> Vec<&SnapshotGame> {
        self.games.iter().filter(|g| g.api_date == date).collect()
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub snapshot: Option<Snapshot>,
    pub snapshot_mtime: Option<SystemTime>,
    pub load_error: Option<String>,
    pub dates: Vec<String>,
    pub selected_date: usize,
    pub selected_game: usize,
    pub scroll: u16,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            snapshot: None,
            snapshot_mtime: None,
            load_error: None,
            dates: Vec::new(),
            selected_date: 0,
            selected_game: 0,
            scroll: 0,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    /// Swap in a freshly loaded snapshot, keeping the current date and game
    /// selected when they still exist.
    pub fn set_snapshot(&mut self, snapshot: Snapshot, mtime: Option<SystemTime>) {
        let prev_date = self.selected_date_str().map(str::to_string);
        let prev_game = self.selected_game().map(|g| g.game_id.clone());

        self.dates = snapshot.unique_dates();
        self.snapshot = Some(snapshot);
        self.snapshot_mtime = mtime;
        self.load_error = None;

        self.selected_date = prev_date
            .and_then(|d| self.dates.iter().position(|x| *x == d))
            .unwrap_or_else(|| self.dates.len().saturating_sub(1));
        self.selected_game = prev_game
            .and_then(|id| {
                self.games_for_selected_date()
                    .iter()
                    .position(|g| g.game_id == id)
            })
            .unwrap_or(0);
        self.clamp_game();
    }

    pub fn set_load_error(&mut self, err: impl Into<String>) {
        let err = err.into();
        self.push_log(format!("[WARN] {err}"));
        self.load_error = Some(err);
    }

    pub fn selected_date_str(&self) -> Option<&str> {
        self.dates.get(self.selected_date).map(String::as_str)
    }

    pub fn games_for_selected_date(&self) -> Vec<&SnapshotGame> {
        match (self.snapshot.as_ref(), self.selected_date_str()) {
            (Some(snapshot), Some(date)) => snapshot.games_on(date),
            _ => Vec::new(),
        }
    }

    pub fn selected_game(&self) -> Option<&SnapshotGame> {
        self.games_for_selected_date()
            .get(self.selected_game)
            .copied()
    }

    pub fn select_next_game(&mut self) {
        let total = self.games_for_selected_date().len();
        if total > 0 {
            self.selected_game = (self.selected_game + 1).min(total - 1);
            self.scroll = 0;
        }
    }

    pub fn select_prev_game(&mut self) {
        if self.selected_game > 0 {
            self.selected_game -= 1;
            self.scroll = 0;
        }
    }

    pub fn select_next_date(&mut self) {
        if self.selected_date + 1 < self.dates.len() {
            self.selected_date += 1;
            self.selected_game = 0;
            self.scroll = 0;
        }
    }

    pub fn select_prev_date(&mut self) {
        if self.selected_date > 0 {
            self.selected_date -= 1;
            self.selected_game = 0;
            self.scroll = 0;
        }
    }

    pub fn scroll_down(&mut self, by: u16) {
        self.scroll = self.scroll.saturating_add(by);
    }

    pub fn scroll_up(&mut self, by: u16) {
        self.scroll = self.scroll.saturating_sub(by);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn clamp_game(&mut self) {
        let total = self.games_for_selected_date().len();
        if total == 0 {
            self.selected_game = 0;
        } else if self.selected_game >= total {
            self.selected_game = total - 1;
        }
    }
}
