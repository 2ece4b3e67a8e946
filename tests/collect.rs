use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, TimeZone};

use hoops_terminal::collect::{
    ScoreboardMemo, StatsSource, build_quarter_cache, collect_schedule, collect_snapshot,
    schedule_window,
};
use hoops_terminal::config::offset;
use hoops_terminal::coupon::Stability;
use hoops_terminal::dashboard::coupon_for;
use hoops_terminal::injuries::parse_injuries_html;
use hoops_terminal::nba_fetch::{
    ScheduledGame, ScoreboardDay, TeamGameRow, leaders_from_rows, parse_game_finder_json,
    parse_player_dashboard_json, parse_scoreboard_json,
};
use hoops_terminal::persist::LineScoreStore;
use hoops_terminal::state::{Leaders, TeamSide};

const BOS: u32 = 1610612738;
const NYK: u32 = 1610612752;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

#[derive(Default)]
struct FakeSource {
    scoreboards: HashMap<NaiveDate, ScoreboardDay>,
    team_games: HashMap<u32, Vec<TeamGameRow>>,
    h2h: HashMap<(u32, u32), Vec<TeamGameRow>>,
    leaders: HashMap<u32, Leaders>,
    scoreboard_calls: RefCell<Vec<NaiveDate>>,
}

impl StatsSource for FakeSource {
    fn scoreboard(&self, date: NaiveDate) -> Result<ScoreboardDay> {
        self.scoreboard_calls.borrow_mut().push(date);
        self.scoreboards
            .get(&date)
            .cloned()
            .ok_or_else(|| anyhow!("no scoreboard for {date}"))
    }

    fn team_games(&self, team_id: u32) -> Result<Vec<TeamGameRow>> {
        self.team_games
            .get(&team_id)
            .cloned()
            .ok_or_else(|| anyhow!("team {team_id} offline"))
    }

    fn h2h_games(&self, team_id: u32, vs_team_id: u32) -> Result<Vec<TeamGameRow>> {
        Ok(self
            .h2h
            .get(&(team_id, vs_team_id))
            .cloned()
            .unwrap_or_default())
    }

    fn leaders(&self, team_id: u32) -> Result<Leaders> {
        self.leaders
            .get(&team_id)
            .cloned()
            .ok_or_else(|| anyhow!("no leaders for {team_id}"))
    }
}

fn fixture_source() -> FakeSource {
    let mut source = FakeSource::default();
    let day = parse_scoreboard_json(&read_fixture("scoreboard.json"), "2025-12-01")
        .expect("scoreboard fixture");
    source.scoreboards.insert(date("2025-12-01"), day);

    let rows = parse_game_finder_json(&read_fixture("game_finder.json")).expect("finder fixture");
    let h2h_rows = rows
        .iter()
        .filter(|r| r.matchup.contains("NYK"))
        .cloned()
        .collect::<Vec<_>>();
    source.team_games.insert(BOS, rows);
    source.h2h.insert((BOS, NYK), h2h_rows);

    let dash = parse_player_dashboard_json(&read_fixture("player_dashboard.json"))
        .expect("dashboard fixture");
    source.leaders.insert(BOS, leaders_from_rows(&dash));
    source
}

#[test]
fn quarter_cache_reuses_settled_days_from_store() {
    let mut source = fixture_source();
    source
        .scoreboards
        .insert(date("2025-12-03"), ScoreboardDay::default());
    source
        .scoreboards
        .insert(date("2025-11-30"), ScoreboardDay::default());

    let mut store = LineScoreStore::default();
    store.insert("2025-12-02", Vec::new());
    store.insert("2025-11-01", Vec::new());

    let (cache, stats) = build_quarter_cache(&source, &mut store, date("2025-12-03"), 3);

    // 12-03 and 12-02 are always refetched, 12-01 and 11-30 are settled.
    let calls = source.scoreboard_calls.borrow().clone();
    assert_eq!(
        calls,
        [
            date("2025-12-03"),
            date("2025-12-02"),
            date("2025-12-01"),
            date("2025-11-30")
        ]
    );
    assert_eq!(stats.days_fetched, 3);
    assert_eq!(stats.days_failed, 1);
    assert_eq!(stats.days_from_store, 0);
    assert_eq!(cache.len(), 2);

    // Settled days landed in the store, the stale month was pruned.
    assert_eq!(store.get("2025-12-01").map(|r| r.len()), Some(4));
    assert!(store.get("2025-11-30").is_some());
    assert!(store.get("2025-11-01").is_none());

    source.scoreboard_calls.borrow_mut().clear();
    let (cache, stats) = build_quarter_cache(&source, &mut store, date("2025-12-03"), 3);
    assert_eq!(stats.days_from_store, 2);
    assert_eq!(source.scoreboard_calls.borrow().len(), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn schedule_dedupes_game_ids_across_days() {
    let mut source = fixture_source();
    let repeat = ScoreboardDay {
        games: vec![ScheduledGame {
            game_id: "0022500301".to_string(),
            api_date: "2025-12-02".to_string(),
            status_text: "Final".to_string(),
            home_id: BOS,
            visitor_id: NYK,
        }],
        line_scores: Vec::new(),
    };
    source.scoreboards.insert(date("2025-12-02"), repeat);

    let now = offset(3)
        .with_ymd_and_hms(2025, 12, 2, 9, 15, 0)
        .single()
        .expect("valid time");
    let window = schedule_window(now);
    assert_eq!(window, [date("2025-12-01"), date("2025-12-02"), date("2025-12-03")]);

    let games = collect_schedule(&source, &window);
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].api_date, "2025-12-01");
}

#[test]
fn schedule_reuses_scoreboards_fetched_for_the_cache() {
    let mut source = fixture_source();
    source
        .scoreboards
        .insert(date("2025-12-02"), ScoreboardDay::default());
    let memo = ScoreboardMemo::new(&source);

    let mut store = LineScoreStore::default();
    let (cache, _) = build_quarter_cache(&memo, &mut store, date("2025-12-02"), 2);
    assert_eq!(cache.len(), 2);

    let now = offset(3)
        .with_ymd_and_hms(2025, 12, 2, 9, 15, 0)
        .single()
        .expect("valid time");
    let games = collect_schedule(&memo, &schedule_window(now));
    assert!(!games.is_empty());
    assert_eq!(games[0].api_date, "2025-12-01");

    // Yesterday and today come from the memo, only tomorrow hits the source.
    assert_eq!(
        source.scoreboard_calls.borrow().clone(),
        [
            date("2025-12-02"),
            date("2025-12-01"),
            date("2025-11-30"),
            date("2025-12-03")
        ]
    );

    // Failures are not remembered.
    assert!(memo.scoreboard(date("2025-12-03")).is_err());
    assert_eq!(source.scoreboard_calls.borrow().len(), 5);
}

#[test]
fn snapshot_from_fixtures() {
    let source = fixture_source();
    let mut store = LineScoreStore::default();
    let (cache, _) = build_quarter_cache(&source, &mut store, date("2025-12-02"), 2);
    let injuries = parse_injuries_html(&read_fixture("injuries.html")).expect("injuries");
    let schedule = collect_schedule(&source, &[date("2025-12-01")]);
    let now = offset(3)
        .with_ymd_and_hms(2025, 12, 2, 9, 15, 0)
        .single()
        .expect("valid time");

    let snap = collect_snapshot(&source, &cache, &injuries, &schedule[..1], now);
    assert_eq!(snap.last_updated, "2025-12-02T09:15:00+03:00");
    assert_eq!(snap.games.len(), 1);

    let game = &snap.games[0];
    assert_eq!(game.game_time, "Final");
    assert_eq!(game.home.name, "Boston Celtics");
    assert_eq!(game.home.abbr, "BOS");

    let home = &game.home;
    assert_eq!(home.last10_logs.len(), 3);
    assert_eq!(home.last10_logs[0].date, "2025-12-01");
    assert_eq!(home.last10_logs[0].opp_pts, 99);
    assert_eq!(home.last10_logs[0].quarters, [30, 28, 25, 27]);
    assert_eq!(home.last10_logs[0].opp_pts_1h, 48);
    assert_eq!(home.last10_logs[2].opp_pts, 105);
    assert_eq!(home.stats.pts_avg, 110.3);
    assert_eq!(home.stats.pts_min, 101);
    assert_eq!(home.stats.wins, 2);
    // Only the NYK game had a line score.
    assert_eq!(home.stats.pts_1h_avg, 58.0);
    assert_eq!(home.stats.wins_1h, 1);
    assert_eq!(home.stats.quarters[2], 25.0);
    assert_eq!(home.leaders.pts[0].name, "Jayson Tatum");
    assert_eq!(home.injuries.len(), 2);

    // A failed fetch leaves the visitor empty instead of aborting.
    let visitor = &game.visitor;
    assert!(visitor.last10_logs.is_empty());
    assert_eq!(visitor.stats.games_count, 0);
    assert!(visitor.leaders.pts.is_empty());

    assert_eq!(game.h2h_logs.len(), 1);
    assert_eq!(game.h2h_logs[0].home_pts, 110);
    assert_eq!(game.h2h_logs[0].visitor_pts, 99);
    assert_eq!(game.h2h_logs[0].home_1h, 58);
    assert_eq!(game.h2h_logs[0].visitor_1h, 48);
    assert_eq!(game.h2h_stats.games, 1);
    assert_eq!(game.h2h_stats.home_avg, 110.0);
    assert_eq!(game.h2h_stats.visitor_avg, 99.0);

    // Home: min(110.3, 110.0) floors to 110, margin 9. The visitor has no
    // games, so its margin is 0 and it takes the pick.
    let coupon = coupon_for(game);
    assert_eq!(coupon.pick, TeamSide::Visitor);
    assert_eq!(coupon.margin, 0);
    assert_eq!(coupon.stability, Stability::VeryStable);
}
