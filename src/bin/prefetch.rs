use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use hoops_terminal::collect::{
    ScoreboardMemo, build_quarter_cache, collect_schedule, collect_snapshot, schedule_window,
};
use hoops_terminal::config::{CollectConfig, arg_value, init_logging, load_dotenv};
use hoops_terminal::injuries::{InjuryReport, fetch_injury_report};
use hoops_terminal::nba_fetch::NbaStatsSource;
use hoops_terminal::persist::{load_line_scores, save_line_scores};
use hoops_terminal::snapshot;

fn main() -> Result<()> {
    load_dotenv();
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = CollectConfig::from_env();
    if let Some(out) = arg_value(&args, "out") {
        config.snapshot_path = PathBuf::from(out);
    }
    if let Some(days) = arg_value(&args, "days").and_then(|v| v.parse::<u32>().ok()) {
        config.quarter_cache_days = days.clamp(1, 200);
    }
    if let Some(season) = arg_value(&args, "season") {
        config.season = season;
    }

    let now = config.now();
    info!(
        days = config.quarter_cache_days,
        out = %config.snapshot_path.display(),
        "collecting"
    );

    let live = NbaStatsSource::new(&config.season, config.retry)?;
    info!(season = %live.season(), "stats source ready");
    let source = ScoreboardMemo::new(&live);

    let mut store = load_line_scores();
    let (cache, _) = build_quarter_cache(
        &source,
        &mut store,
        now.date_naive(),
        config.quarter_cache_days,
    );
    if let Err(err) = save_line_scores(&store) {
        warn!(error = %format!("{err:#}"), "line score cache not saved");
    }

    let schedule = collect_schedule(&source, &schedule_window(now));
    info!(games = schedule.len(), "schedule loaded");

    let injuries = fetch_injury_report(&config.retry).unwrap_or_else(|err| {
        warn!(error = %format!("{err:#}"), "injury report unavailable");
        InjuryReport::default()
    });

    let snap = collect_snapshot(&source, &cache, &injuries, &schedule, now);
    snapshot::save(&config.snapshot_path, &snap)?;
    info!(
        games = snap.games.len(),
        path = %config.snapshot_path.display(),
        "snapshot written"
    );
    Ok(())
}
