use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::dashboard::coupon_for;
use crate::quarters::analyze;
use crate::state::{GameRecord, Snapshot, SnapshotGame, TeamEntry, TeamSide};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub games: usize,
    pub team_rows: usize,
    pub log_rows: usize,
    pub coupons: usize,
}

/// Sheet name plus rows, header first.
pub type Sheet = (&'static str, Vec<Vec<String>>);

pub fn build_sheets(snapshot: &Snapshot) -> Vec<Sheet> {
    let mut games_rows = vec![header(&[
        "Game ID", "Date", "Status", "Visitor", "Home", "H2H Games", "Visitor H2H Avg",
        "Home H2H Avg",
    ])];
    let mut team_rows = vec![header(&[
        "Game ID", "Side", "Team", "Games", "Pts Avg", "Pts Min", "Pts Max", "1H Avg", "1H Min",
        "1H Max", "Wins", "1H Wins", "Q1 Diff", "Q2 Diff", "Q3 Diff", "Q4 Diff", "Strongest",
        "Weakest",
    ])];
    let mut log_rows = vec![header(&[
        "Team", "Game ID", "Date", "Matchup", "W/L", "Pts", "Opp", "1H", "Opp 1H", "Q1", "Q2",
        "Q3", "Q4", "Opp Q1", "Opp Q2", "Opp Q3", "Opp Q4",
    ])];
    let mut coupon_rows = vec![header(&[
        "Game ID", "Date", "Matchup", "Pick", "Team Line", "Margin", "Stability", "Match Base",
        "Match Line", "Safe Line",
    ])];

    for game in &snapshot.games {
        games_rows.push(game_row(game));
        for (side, team) in [("Visitor", &game.visitor), ("Home", &game.home)] {
            team_rows.push(team_row(&game.game_id, side, team));
            log_rows.extend(team.last10_logs.iter().map(|log| log_row(&team.name, log)));
        }
        coupon_rows.push(coupon_row(game));
    }

    vec![
        ("Games", games_rows),
        ("Team Stats", team_rows),
        ("Game Logs", log_rows),
        ("Coupons", coupon_rows),
    ]
}

pub fn export_snapshot(path: &Path, snapshot: &Snapshot) -> Result<ExportReport> {
    let sheets = build_sheets(snapshot);
    let mut workbook = Workbook::new();
    for (name, rows) in &sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name)?;
        write_rows(sheet, rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    let data_rows = |idx: usize| {
        sheets
            .get(idx)
            .map(|(_, rows)| rows.len().saturating_sub(1))
            .unwrap_or(0)
    };
    Ok(ExportReport {
        games: data_rows(0),
        team_rows: data_rows(1),
        log_rows: data_rows(2),
        coupons: data_rows(3),
    })
}

fn header(cols: &[&str]) -> Vec<String> {
    cols.iter().map(|c| c.to_string()).collect()
}

fn num(value: f64) -> String {
    format!("{value:.1}")
}

fn game_row(game: &SnapshotGame) -> Vec<String> {
    vec![
        game.game_id.clone(),
        game.api_date.clone(),
        game.game_time.clone(),
        game.visitor.name.clone(),
        game.home.name.clone(),
        game.h2h_stats.games.to_string(),
        num(game.h2h_stats.visitor_avg),
        num(game.h2h_stats.home_avg),
    ]
}

fn team_row(game_id: &str, side: &str, team: &TeamEntry) -> Vec<String> {
    let s = &team.stats;
    let analysis = analyze(s);
    let mut row = vec![
        game_id.to_string(),
        side.to_string(),
        team.name.clone(),
        s.games_count.to_string(),
        num(s.pts_avg),
        s.pts_min.to_string(),
        s.pts_max.to_string(),
        num(s.pts_1h_avg),
        s.pts_1h_min.to_string(),
        s.pts_1h_max.to_string(),
        s.wins.to_string(),
        s.wins_1h.to_string(),
    ];
    row.extend(analysis.diffs.iter().map(|d| num(*d)));
    match analysis.extremes {
        Some(ext) => {
            row.push(ext.strongest.label().to_string());
            row.push(ext.weakest.label().to_string());
        }
        None => {
            row.push(String::new());
            row.push(String::new());
        }
    }
    row
}

fn log_row(team: &str, log: &GameRecord) -> Vec<String> {
    let mut row = vec![
        team.to_string(),
        log.game_id.clone(),
        log.date.clone(),
        log.matchup.clone(),
        log.wl.code().to_string(),
        log.pts.to_string(),
        log.opp_pts.to_string(),
        log.pts_1h.to_string(),
        log.opp_pts_1h.to_string(),
    ];
    row.extend(log.quarters.iter().map(u32::to_string));
    row.extend(log.opp_quarters.iter().map(u32::to_string));
    row
}

fn coupon_row(game: &SnapshotGame) -> Vec<String> {
    let coupon = coupon_for(game);
    let pick = match coupon.pick {
        TeamSide::Home => &game.home.name,
        TeamSide::Visitor => &game.visitor.name,
    };
    vec![
        game.game_id.clone(),
        game.api_date.clone(),
        game.label(),
        pick.clone(),
        num(coupon.team_total_line),
        coupon.margin.to_string(),
        coupon.stability.label().to_string(),
        coupon.match_total_base.to_string(),
        num(coupon.match_total_line),
        num(coupon.match_total_safe_line),
    ]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::build_sheets;
    use crate::state::{HeadToHeadSummary, Leaders, Snapshot, SnapshotGame, TeamEntry, TeamStatsSummary};

    fn team(name: &str, avg: f64, min: u32) -> TeamEntry {
        TeamEntry {
            id: 1,
            name: name.to_string(),
            abbr: String::new(),
            last10_logs: Vec::new(),
            stats: TeamStatsSummary {
                games_count: 10,
                pts_avg: avg,
                pts_min: min,
                ..TeamStatsSummary::default()
            },
            leaders: Leaders::default(),
            injuries: Vec::new(),
        }
    }

    #[test]
    fn one_row_per_game_and_two_per_team_sheet() {
        let snapshot = Snapshot {
            last_updated: "2025-12-01T10:00:00+03:00".to_string(),
            games: vec![SnapshotGame {
                game_id: "0022500100".to_string(),
                api_date: "2025-12-01".to_string(),
                game_time: "Final".to_string(),
                home: team("Boston Celtics", 110.2, 101),
                visitor: team("New York Knicks", 105.8, 90),
                h2h_logs: Vec::new(),
                h2h_stats: HeadToHeadSummary::default(),
            }],
        };
        let sheets = build_sheets(&snapshot);
        let names: Vec<&str> = sheets.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["Games", "Team Stats", "Game Logs", "Coupons"]);
        assert_eq!(sheets[0].1.len(), 2);
        assert_eq!(sheets[1].1.len(), 3);
        assert_eq!(sheets[2].1.len(), 1);

        let coupon = &sheets[3].1[1];
        assert_eq!(coupon[3], "Boston Celtics");
        assert_eq!(coupon[4], "109.5");
        assert_eq!(coupon[7], "216");
        // Row width matches the header everywhere.
        for (_, rows) in &sheets {
            let width = rows[0].len();
            assert!(rows.iter().all(|r| r.len() == width));
        }
    }
}
