use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use hoops_terminal::coupon::project;
use hoops_terminal::dashboard::game_body_text;
use hoops_terminal::injuries::parse_injuries_html;
use hoops_terminal::nba_fetch::{parse_game_finder_json, parse_scoreboard_json};
use hoops_terminal::quarters::analyze;
use hoops_terminal::records::{QuarterCache, build_team_logs};
use hoops_terminal::snapshot::parse_snapshot_json;
use hoops_terminal::state::{GameRecord, HeadToHeadSummary, WinLoss};
use hoops_terminal::stats::aggregate;

fn sample_records() -> Vec<GameRecord> {
    (0..10u32)
        .map(|i| GameRecord {
            game_id: format!("00225{i:05}"),
            date: format!("2025-11-{:02}", 10 + i),
            matchup: "BOS vs. NYK".to_string(),
            is_home: i % 2 == 0,
            wl: if i % 3 == 0 { WinLoss::Loss } else { WinLoss::Win },
            pts: 98 + i * 2,
            opp_pts: 100 + i,
            pts_1h: if i == 4 { 0 } else { 50 + i },
            opp_pts_1h: 49 + i,
            quarters: [25 + i, 25, if i % 4 == 0 { 0 } else { 26 }, 24 + i],
            opp_quarters: [24, 25 + i, 26, 25],
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let records = sample_records();
    c.bench_function("aggregate_last10", |b| {
        b.iter(|| {
            let summary = aggregate(black_box(&records));
            black_box(analyze(&summary));
        });
    });
}

fn bench_project(c: &mut Criterion) {
    let records = sample_records();
    let home = aggregate(&records);
    let visitor = aggregate(&records[..7]);
    let h2h = HeadToHeadSummary {
        games: 2,
        home_avg: 108.5,
        visitor_avg: 101.0,
    };
    c.bench_function("coupon_project", |b| {
        b.iter(|| black_box(project(black_box(&home), black_box(&visitor), black_box(&h2h))));
    });
}

fn bench_record_building(c: &mut Criterion) {
    let day = parse_scoreboard_json(SCOREBOARD_JSON, "2025-12-01").unwrap();
    let mut cache = QuarterCache::new();
    cache.extend(&day.line_scores);
    let rows = parse_game_finder_json(GAME_FINDER_JSON).unwrap();
    c.bench_function("build_team_logs", |b| {
        b.iter(|| {
            let (logs, rejected) = build_team_logs(black_box(&rows), 1610612738, &cache);
            black_box((logs.len(), rejected.len()));
        });
    });
}

fn bench_scoreboard_parse(c: &mut Criterion) {
    c.bench_function("scoreboard_parse", |b| {
        b.iter(|| {
            let day = parse_scoreboard_json(black_box(SCOREBOARD_JSON), "2025-12-01").unwrap();
            black_box(day.line_scores.len());
        });
    });
}

fn bench_injuries_parse(c: &mut Criterion) {
    c.bench_function("injuries_parse", |b| {
        b.iter(|| {
            let report = parse_injuries_html(black_box(INJURIES_HTML)).unwrap();
            black_box(report.teams.len());
        });
    });
}

fn bench_snapshot_render(c: &mut Criterion) {
    let snap = parse_snapshot_json(SNAPSHOT_JSON).unwrap();
    c.bench_function("snapshot_parse_and_render", |b| {
        b.iter(|| {
            let parsed = parse_snapshot_json(black_box(SNAPSHOT_JSON)).unwrap();
            black_box(parsed.games.len());
            for game in &snap.games {
                black_box(game_body_text(game).len());
            }
        });
    });
}

criterion_group!(
    perf,
    bench_aggregate,
    bench_project,
    bench_record_building,
    bench_scoreboard_parse,
    bench_injuries_parse,
    bench_snapshot_render
);
criterion_main!(perf);

static SCOREBOARD_JSON: &str = include_str!("../tests/fixtures/scoreboard.json");
static GAME_FINDER_JSON: &str = include_str!("../tests/fixtures/game_finder.json");
static INJURIES_HTML: &str = include_str!("../tests/fixtures/injuries.html");
static SNAPSHOT_JSON: &str = include_str!("../tests/fixtures/snapshot.json");
