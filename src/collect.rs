use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use anyhow::Result;
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveDate};
use tracing::{info, warn};

use crate::injuries::InjuryReport;
use crate::nba_fetch::{NbaStatsSource, ScheduledGame, ScoreboardDay, TeamGameRow};
use crate::persist::LineScoreStore;
use crate::records::{QuarterCache, RecordError, build_h2h_logs, build_team_logs};
use crate::state::{Leaders, Snapshot, SnapshotGame, TeamEntry};
use crate::stats::{aggregate, summarize_h2h};
use crate::teams::{team_by_id, team_name};

// Today and yesterday may still change (late games, stat corrections), so
// only older days are served from the on-disk store.
const SETTLED_AFTER_DAYS: u32 = 2;

/// Where game data comes from. The live implementation talks to
/// stats.nba.com; tests plug in canned responses.
pub trait StatsSource {
    fn scoreboard(&self, date: NaiveDate) -> Result<ScoreboardDay>;
    fn team_games(&self, team_id: u32) -> Result<Vec<TeamGameRow>>;
    fn h2h_games(&self, team_id: u32, vs_team_id: u32) -> Result<Vec<TeamGameRow>>;
    fn leaders(&self, team_id: u32) -> Result<Leaders>;
}

impl StatsSource for NbaStatsSource {
    fn scoreboard(&self, date: NaiveDate) -> Result<ScoreboardDay> {
        self.fetch_scoreboard(date)
    }

    fn team_games(&self, team_id: u32) -> Result<Vec<TeamGameRow>> {
        self.fetch_team_games(team_id)
    }

    fn h2h_games(&self, team_id: u32, vs_team_id: u32) -> Result<Vec<TeamGameRow>> {
        self.fetch_h2h_games(team_id, vs_team_id)
    }

    fn leaders(&self, team_id: u32) -> Result<Leaders> {
        self.fetch_leaders(team_id)
    }
}

/// Keeps successful scoreboard responses so the schedule pass reuses the days
/// the quarter cache already fetched. Failed days are asked again.
pub struct ScoreboardMemo<'a> {
    inner: &'a dyn StatsSource,
    days: RefCell<HashMap<NaiveDate, ScoreboardDay>>,
}

impl<'a> ScoreboardMemo<'a> {
    pub fn new(inner: &'a dyn StatsSource) -> Self {
        Self {
            inner,
            days: RefCell::new(HashMap::new()),
        }
    }
}

impl StatsSource for ScoreboardMemo<'_> {
    fn scoreboard(&self, date: NaiveDate) -> Result<ScoreboardDay> {
        if let Some(day) = self.days.borrow().get(&date) {
            return Ok(day.clone());
        }
        let day = self.inner.scoreboard(date)?;
        self.days.borrow_mut().insert(date, day.clone());
        Ok(day)
    }

    fn team_games(&self, team_id: u32) -> Result<Vec<TeamGameRow>> {
        self.inner.team_games(team_id)
    }

    fn h2h_games(&self, team_id: u32, vs_team_id: u32) -> Result<Vec<TeamGameRow>> {
        self.inner.h2h_games(team_id, vs_team_id)
    }

    fn leaders(&self, team_id: u32) -> Result<Leaders> {
        self.inner.leaders(team_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuarterCacheStats {
    pub days_fetched: usize,
    pub days_from_store: usize,
    pub days_failed: usize,
}

pub fn build_quarter_cache(
    source: &dyn StatsSource,
    store: &mut LineScoreStore,
    today: NaiveDate,
    days: u32,
) -> (QuarterCache, QuarterCacheStats) {
    let mut cache = QuarterCache::new();
    let mut stats = QuarterCacheStats::default();

    for back in 0..=days {
        let date = today - ChronoDuration::days(i64::from(back));
        let key = date.format("%Y-%m-%d").to_string();
        let settled = back >= SETTLED_AFTER_DAYS;

        if settled && let Some(rows) = store.get(&key) {
            cache.extend(rows);
            stats.days_from_store += 1;
            continue;
        }

        match source.scoreboard(date) {
            Ok(day) => {
                cache.extend(&day.line_scores);
                if settled {
                    store.insert(&key, day.line_scores);
                }
                stats.days_fetched += 1;
            }
            Err(err) => {
                warn!(date = %key, error = %format!("{err:#}"), "scoreboard fetch failed");
                stats.days_failed += 1;
            }
        }
    }

    let oldest = today - ChronoDuration::days(i64::from(days));
    store.retain_since(&oldest.format("%Y-%m-%d").to_string());
    info!(
        games = cache.len(),
        fetched = stats.days_fetched,
        cached = stats.days_from_store,
        failed = stats.days_failed,
        "quarter cache built"
    );
    (cache, stats)
}

/// Games scheduled on the given dates, first occurrence of each id wins.
pub fn collect_schedule(source: &dyn StatsSource, dates: &[NaiveDate]) -> Vec<ScheduledGame> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for date in dates {
        match source.scoreboard(*date) {
            Ok(day) => {
                for game in day.games {
                    if seen.insert(game.game_id.clone()) {
                        out.push(game);
                    }
                }
            }
            Err(err) => warn!(%date, error = %format!("{err:#}"), "schedule fetch failed"),
        }
    }
    out
}

/// Yesterday, today and tomorrow around `now`.
pub fn schedule_window(now: DateTime<FixedOffset>) -> Vec<NaiveDate> {
    let today = now.date_naive();
    vec![
        today - ChronoDuration::days(1),
        today,
        today + ChronoDuration::days(1),
    ]
}

fn log_rejected(team_id: u32, rejected: &[RecordError]) {
    for err in rejected {
        warn!(team_id, %err, "skipping game row");
    }
}

pub fn build_team_entry(
    source: &dyn StatsSource,
    cache: &QuarterCache,
    injuries: &InjuryReport,
    team_id: u32,
) -> TeamEntry {
    let name = team_name(team_id);
    let abbr = team_by_id(team_id)
        .map(|t| t.abbr.to_string())
        .unwrap_or_default();

    let rows = source.team_games(team_id).unwrap_or_else(|err| {
        warn!(team_id, error = %format!("{err:#}"), "team games unavailable");
        Vec::new()
    });
    let (last10_logs, rejected) = build_team_logs(&rows, team_id, cache);
    log_rejected(team_id, &rejected);

    let leaders = source.leaders(team_id).unwrap_or_else(|err| {
        warn!(team_id, error = %format!("{err:#}"), "leaders unavailable");
        Leaders::default()
    });

    TeamEntry {
        id: team_id,
        stats: aggregate(&last10_logs),
        injuries: injuries.for_team_id(team_id),
        name,
        abbr,
        last10_logs,
        leaders,
    }
}

pub fn build_game(
    source: &dyn StatsSource,
    cache: &QuarterCache,
    injuries: &InjuryReport,
    game: &ScheduledGame,
) -> SnapshotGame {
    let home = build_team_entry(source, cache, injuries, game.home_id);
    let visitor = build_team_entry(source, cache, injuries, game.visitor_id);

    let h2h_rows = source
        .h2h_games(game.home_id, game.visitor_id)
        .unwrap_or_else(|err| {
            warn!(game_id = %game.game_id, error = %format!("{err:#}"), "h2h unavailable");
            Vec::new()
        });
    let (h2h_logs, rejected) = build_h2h_logs(&h2h_rows, game.home_id, game.visitor_id, cache);
    log_rejected(game.home_id, &rejected);

    SnapshotGame {
        game_id: game.game_id.clone(),
        api_date: game.api_date.clone(),
        game_time: game.status_text.clone(),
        home,
        visitor,
        h2h_stats: summarize_h2h(&h2h_logs),
        h2h_logs,
    }
}

pub fn collect_snapshot(
    source: &dyn StatsSource,
    cache: &QuarterCache,
    injuries: &InjuryReport,
    schedule: &[ScheduledGame],
    now: DateTime<FixedOffset>,
) -> Snapshot {
    let total = schedule.len();
    let mut games = Vec::with_capacity(total);
    for (idx, game) in schedule.iter().enumerate() {
        info!(
            "[{}/{}] {} @ {}",
            idx + 1,
            total,
            team_name(game.visitor_id),
            team_name(game.home_id)
        );
        games.push(build_game(source, cache, injuries, game));
    }
    Snapshot {
        last_updated: now.to_rfc3339(),
        games,
    }
}
