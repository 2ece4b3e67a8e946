use std::fs;
use std::path::PathBuf;

use hoops_terminal::injuries::parse_injuries_html;
use hoops_terminal::nba_fetch::{
    leaders_from_rows, parse_game_finder_json, parse_player_dashboard_json, parse_scoreboard_json,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_scoreboard_fixture() {
    let raw = read_fixture("scoreboard.json");
    let day = parse_scoreboard_json(&raw, "2025-12-01").expect("fixture should parse");
    assert_eq!(day.games.len(), 2);
    assert_eq!(day.games[0].game_id, "0022500301");
    assert_eq!(day.games[0].home_id, 1610612738);
    assert_eq!(day.games[0].visitor_id, 1610612752);
    assert_eq!(day.games[0].status_text, "Final");
    assert_eq!(day.games[1].status_text, "10:00 pm ET");
    assert_eq!(day.games[1].api_date, "2025-12-01");

    assert_eq!(day.line_scores.len(), 4);
    assert_eq!(day.line_scores[0].team_abbr, "BOS");
    assert_eq!(day.line_scores[0].quarters, [30, 28, 25, 27]);
    // Games that haven't tipped off carry nulls.
    assert_eq!(day.line_scores[2].quarters, [0, 0, 0, 0]);
}

#[test]
fn parses_game_finder_fixture() {
    let raw = read_fixture("game_finder.json");
    let rows = parse_game_finder_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].game_id, "0022500301");
    assert_eq!(rows[1].matchup, "BOS vs. NYK");
    assert_eq!(rows[1].wl, "W");
    assert_eq!(rows[1].pts, 110);
    assert_eq!(rows[1].plus_minus, Some(11.0));
}

#[test]
fn empty_stats_body_is_no_rows() {
    assert!(parse_game_finder_json("").expect("empty").is_empty());
    assert!(parse_game_finder_json(r#"{"resultSets":[]}"#).expect("no sets").is_empty());
}

#[test]
fn scoreboard_without_required_column_is_an_error() {
    let raw = r#"{"resultSets":[{"name":"GameHeader","headers":["GAME_ID"],"rowSet":[["1"]]}]}"#;
    assert!(parse_scoreboard_json(raw, "2025-12-01").is_err());
}

#[test]
fn leaders_from_dashboard_fixture() {
    let raw = read_fixture("player_dashboard.json");
    let rows = parse_player_dashboard_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 3);

    let leaders = leaders_from_rows(&rows);
    assert_eq!(leaders.pts.len(), 2);
    assert_eq!(leaders.pts[0].name, "Jayson Tatum");
    assert_eq!(leaders.pts[0].val, 27.0);
    assert_eq!(leaders.pts[1].name, "Jaylen Brown");
    assert_eq!(leaders.pts[1].val, 23.5);
    assert_eq!(leaders.ast[0].name, "Jrue Holiday");
    assert_eq!(leaders.ast[0].val, 5.1);
    assert_eq!(leaders.reb[1].name, "Jaylen Brown");
}

#[test]
fn parses_injury_page_fixture() {
    let html = read_fixture("injuries.html");
    let report = parse_injuries_html(&html).expect("fixture should parse");
    assert_eq!(report.teams.len(), 2);
    assert_eq!(report.teams[0].header, "Boston");

    let celtics = report.for_team("Boston Celtics");
    assert_eq!(celtics.len(), 2);
    assert_eq!(celtics[0].player, "Jayson Tatum");
    assert_eq!(celtics[0].status, "Expected to be out for the season");

    let lakers = report.for_team("Los Angeles Lakers");
    assert_eq!(lakers.len(), 1);
    assert_eq!(lakers[0].player, "Maxi Kleber");
    assert_eq!(lakers[0].status, "Out");

    assert!(report.for_team("Denver Nuggets").is_empty());
}
