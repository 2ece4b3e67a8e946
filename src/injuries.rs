use anyhow::{Context, Result, anyhow};
use scraper::{ElementRef, Html, Selector};

use crate::http_client::{RetryPolicy, fetch_text, http_client};
use crate::state::Injury;
use crate::teams::{NbaTeam, team_by_id, team_by_name};

const CBS_INJURIES_URL: &str = "https://www.cbssports.com/nba/injuries/";

#[derive(Debug, Clone, PartialEq)]
pub struct TeamInjuries {
    pub header: String,
    pub injuries: Vec<Injury>,
}

/// The whole league's injury page, parsed once per collection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjuryReport {
    pub teams: Vec<TeamInjuries>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow!("bad selector {css}: {err}"))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn parse_injuries_html(html: &str) -> Result<InjuryReport> {
    let document = Html::parse_document(html);
    let wrapper_sel = selector("div.TableBaseWrapper")?;
    let team_sel = selector("span.TeamName")?;
    let row_sel = selector("tr.TableBase-bodyTr")?;
    let cell_sel = selector("td")?;
    let player_sel = selector("span.CellPlayerName--long")?;

    let mut report = InjuryReport::default();
    for wrapper in document.select(&wrapper_sel) {
        let Some(header) = wrapper.select(&team_sel).next().map(element_text) else {
            continue;
        };
        let mut injuries = Vec::new();
        for row in wrapper.select(&row_sel) {
            let cells = row.select(&cell_sel).collect::<Vec<_>>();
            if cells.len() < 2 {
                continue;
            }
            let player = cells[0]
                .select(&player_sel)
                .next()
                .map(element_text)
                .unwrap_or_else(|| element_text(cells[0]));
            let status = cells.last().map(|c| element_text(*c)).unwrap_or_default();
            injuries.push(Injury { player, status });
        }
        report.teams.push(TeamInjuries { header, injuries });
    }
    Ok(report)
}

impl InjuryReport {
    /// Finds a team's table. Tries the nickname first ("Lakers"), then the
    /// city, since the page sometimes only prints the city.
    pub fn for_team(&self, team_name: &str) -> Vec<Injury> {
        if let Some(team) = team_by_name(team_name) {
            return self.for_known_team(team);
        }
        let (city, nickname) = team_name
            .trim()
            .rsplit_once(' ')
            .unwrap_or(("", team_name));
        self.lookup(&[nickname, city])
    }

    pub fn for_team_id(&self, team_id: u32) -> Vec<Injury> {
        team_by_id(team_id)
            .map(|team| self.for_known_team(team))
            .unwrap_or_default()
    }

    fn for_known_team(&self, team: &NbaTeam) -> Vec<Injury> {
        self.lookup(&[team.nickname(), team.city])
    }

    fn lookup(&self, keys: &[&str]) -> Vec<Injury> {
        for key in keys {
            let key = key.to_lowercase();
            if key.is_empty() {
                continue;
            }
            if let Some(team) = self
                .teams
                .iter()
                .find(|t| t.header.to_lowercase().contains(&key))
            {
                return team.injuries.clone();
            }
        }
        Vec::new()
    }
}

pub fn fetch_injury_report(retry: &RetryPolicy) -> Result<InjuryReport> {
    let client = http_client()?;
    let body = retry.run("injury report", || fetch_text(client, CBS_INJURIES_URL))?;
    parse_injuries_html(&body).context("parse injury report")
}
