//! Text blocks for the dashboard panels. Rendering lives in the binary; these
//! builders only turn snapshot data into lines so they can be tested without a
//! terminal.

use crate::coupon::{CouponProjection, project};
use crate::quarters::{Quarter, analyze};
use crate::state::{
    AppState, GameRecord, LAST_N_GAMES, LeaderCategory, LeaderEntry, SnapshotGame, TeamEntry,
    TeamSide,
};

const INJURIES_SHOWN: usize = 3;
const INJURY_STATUS_CHARS: usize = 15;
const H2H_NAME_CHARS: usize = 15;

fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.1}")
    } else {
        format!("{value:.1}")
    }
}

fn truncate_chars(raw: &str, max: usize) -> String {
    raw.chars().take(max).collect()
}

pub fn sidebar_text(state: &AppState) -> String {
    let Some(snapshot) = &state.snapshot else {
        return "No snapshot loaded".to_string();
    };
    let mut lines = vec![format!(
        "Updated: {}",
        truncate_chars(&snapshot.last_updated, 16).replace('T', " ")
    )];

    match state.selected_date_str() {
        Some(date) => lines.push(format!(
            "Date: {date} ({}/{})",
            state.selected_date + 1,
            state.dates.len()
        )),
        None => lines.push("Date: -".to_string()),
    }
    lines.push(String::new());

    let games = state.games_for_selected_date();
    if games.is_empty() {
        lines.push("No games on this date".to_string());
        return lines.join("\n");
    }
    for (idx, game) in games.iter().enumerate() {
        let prefix = if idx == state.selected_game { "> " } else { "  " };
        lines.push(format!("{prefix}{}", game.label()));
    }
    lines.join("\n")
}

pub fn game_header_text(game: &SnapshotGame) -> String {
    format!(
        "{}\n{} | {} home | Status: {}",
        game.label(),
        game.api_date,
        game.home.name,
        game.game_time
    )
}

pub fn basic_stats_text(team: &TeamEntry) -> String {
    let s = &team.stats;
    [
        team.name.clone(),
        format!(
            "FG  avg {:.1}  min {}  max {}  wins {}/{}",
            s.pts_avg, s.pts_min, s.pts_max, s.wins, LAST_N_GAMES
        ),
        format!(
            "1H  avg {:.1}  min {}  max {}  wins {}/{}",
            s.pts_1h_avg, s.pts_1h_min, s.pts_1h_max, s.wins_1h, LAST_N_GAMES
        ),
    ]
    .join("\n")
}

pub fn quarter_text(team: &TeamEntry) -> String {
    let analysis = analyze(&team.stats);
    let mut lines = vec![team.name.clone()];
    for quarter in Quarter::ALL {
        let idx = quarter.index();
        lines.push(format!(
            "{}  {:>5.1} scored  {:>5.1} allowed  ({})",
            quarter.label(),
            team.stats.quarters[idx],
            team.stats.opp_quarters[idx],
            signed(analysis.diff(quarter))
        ));
    }
    if let Some(extremes) = analysis.extremes {
        lines.push(format!(
            "Best: {} ({}) | Weakest: {} ({})",
            extremes.strongest.label(),
            signed(analysis.diff(extremes.strongest)),
            extremes.weakest.label(),
            signed(analysis.diff(extremes.weakest))
        ));
    }
    lines.join("\n")
}

fn format_leaders(entries: &[LeaderEntry]) -> String {
    if entries.is_empty() {
        return "No data".to_string();
    }
    entries
        .iter()
        .take(2)
        .map(|e| format!("{} ({:.1})", e.name, e.val))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn leaders_text(team: &TeamEntry) -> String {
    let mut lines = vec![team.name.clone()];
    for category in LeaderCategory::ALL {
        lines.push(format!(
            "{}: {}",
            category.label(),
            format_leaders(team.leaders.category(category))
        ));
    }
    lines.push("Injuries:".to_string());
    if team.injuries.is_empty() {
        lines.push("  No injuries".to_string());
    } else {
        for injury in team.injuries.iter().take(INJURIES_SHOWN) {
            lines.push(format!(
                "  - {} ({})",
                injury.player,
                truncate_chars(&injury.status, INJURY_STATUS_CHARS)
            ));
        }
    }
    lines.join("\n")
}

pub fn h2h_text(game: &SnapshotGame) -> String {
    if game.h2h_logs.is_empty() {
        return "No meetings this season".to_string();
    }
    let visitor = truncate_chars(&game.visitor.name, H2H_NAME_CHARS);
    let home = truncate_chars(&game.home.name, H2H_NAME_CHARS);
    let mut lines = vec![
        format!(
            "Meetings: {} | {visitor} avg {:.1} | {home} avg {:.1}",
            game.h2h_logs.len(),
            game.h2h_stats.visitor_avg,
            game.h2h_stats.home_avg
        ),
        format!(
            "{:<10}  {:>5}  {:>5}  {:>5}  {:>5}",
            "Date",
            game.visitor.abbr,
            game.home.abbr,
            format!("{}1H", game.visitor.abbr),
            format!("{}1H", game.home.abbr)
        ),
    ];
    for log in &game.h2h_logs {
        lines.push(format!(
            "{:<10}  {:>5}  {:>5}  {:>5}  {:>5}",
            log.date, log.visitor_pts, log.home_pts, log.visitor_1h, log.home_1h
        ));
    }
    lines.join("\n")
}

pub fn coupon_for(game: &SnapshotGame) -> CouponProjection {
    project(&game.home.stats, &game.visitor.stats, &game.h2h_stats)
}

pub fn coupon_text(game: &SnapshotGame) -> String {
    let coupon = coupon_for(game);
    let pick = match coupon.pick {
        TeamSide::Home => &game.home.name,
        TeamSide::Visitor => &game.visitor.name,
    };
    [
        format!("Team total: {pick} over {:.1}", coupon.team_total_line),
        format!(
            "  margin {} ({})",
            coupon.margin,
            coupon.stability.label()
        ),
        format!(
            "Match total: over {:.1} | safe over {:.1} | base {}",
            coupon.match_total_line, coupon.match_total_safe_line, coupon.match_total_base
        ),
    ]
    .join("\n")
}

fn game_log_row(log: &GameRecord) -> String {
    format!(
        "{:<10}  {:<12}  {}  {:>3}  {:>3}  {:>3}  {:>3}",
        log.date,
        truncate_chars(&log.matchup, 12),
        log.wl.code(),
        log.pts,
        log.opp_pts,
        log.pts_1h,
        log.opp_pts_1h
    )
}

pub fn game_log_text(team: &TeamEntry) -> String {
    let mut lines = vec![team.name.clone()];
    if team.last10_logs.is_empty() {
        lines.push("No games logged".to_string());
        return lines.join("\n");
    }
    lines.push(format!(
        "{:<10}  {:<12}  {}  {:>3}  {:>3}  {:>3}  {:>3}",
        "Date", "Matchup", "R", "Pts", "Opp", "1H", "O1H"
    ));
    lines.extend(team.last10_logs.iter().map(game_log_row));
    lines.join("\n")
}

/// Everything below the game header, in display order. Scrolling offsets into
/// this text.
pub fn game_body_text(game: &SnapshotGame) -> String {
    let sections = [
        ("BASIC STATS (LAST 10)", pair(basic_stats_text, game)),
        ("QUARTER ANALYSIS", pair(quarter_text, game)),
        ("LEADERS & INJURIES", pair(leaders_text, game)),
        ("HEAD TO HEAD (THIS SEASON)", h2h_text(game)),
        ("COUPON", coupon_text(game)),
        ("GAME LOGS", pair(game_log_text, game)),
    ];
    sections
        .iter()
        .map(|(title, body)| format!("== {title} ==\n{body}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn pair(build: fn(&TeamEntry) -> String, game: &SnapshotGame) -> String {
    format!("{}\n\n{}", build(&game.visitor), build(&game.home))
}

pub fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}
