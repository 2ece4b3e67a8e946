use crate::state::{GameRecord, HeadToHeadRecord, HeadToHeadSummary, QUARTERS, TeamStatsSummary};

/// Rounds to one decimal place, halves away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().map(|v| u64::from(*v)).sum();
    round1(sum as f64 / values.len() as f64)
}

// Zero means "no line score" for half and quarter fields, so only positive
// values are observations.
fn observed(values: impl Iterator<Item = u32>) -> Vec<u32> {
    values.filter(|v| *v > 0).collect()
}

pub fn aggregate(records: &[GameRecord]) -> TeamStatsSummary {
    if records.is_empty() {
        return TeamStatsSummary::default();
    }

    let pts = records.iter().map(|g| g.pts).collect::<Vec<_>>();
    let pts_1h = observed(records.iter().map(|g| g.pts_1h));

    let mut quarters = [0.0; QUARTERS];
    let mut opp_quarters = [0.0; QUARTERS];
    for q in 0..QUARTERS {
        quarters[q] = mean(&observed(records.iter().map(|g| g.quarters[q])));
        opp_quarters[q] = mean(&observed(records.iter().map(|g| g.opp_quarters[q])));
    }

    TeamStatsSummary {
        games_count: records.len(),
        pts_avg: mean(&pts),
        pts_min: pts.iter().copied().min().unwrap_or(0),
        pts_max: pts.iter().copied().max().unwrap_or(0),
        pts_1h_avg: mean(&pts_1h),
        pts_1h_min: pts_1h.iter().copied().min().unwrap_or(0),
        pts_1h_max: pts_1h.iter().copied().max().unwrap_or(0),
        wins: records.iter().filter(|g| g.is_win()).count(),
        wins_1h: records
            .iter()
            .filter(|g| g.pts_1h > 0 && g.pts_1h > g.opp_pts_1h)
            .count(),
        quarters,
        opp_quarters,
    }
}

pub fn summarize_h2h(records: &[HeadToHeadRecord]) -> HeadToHeadSummary {
    if records.is_empty() {
        return HeadToHeadSummary::default();
    }
    let home = records.iter().map(|r| r.home_pts).collect::<Vec<_>>();
    let visitor = records.iter().map(|r| r.visitor_pts).collect::<Vec<_>>();
    HeadToHeadSummary {
        games: records.len(),
        home_avg: mean(&home),
        visitor_avg: mean(&visitor),
    }
}

/// Most-recent-first, truncated to `n`. Dates are ISO `YYYY-MM-DD`, so string
/// order is chronological.
pub fn latest_window(mut records: Vec<GameRecord>, n: usize) -> Vec<GameRecord> {
    records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.game_id.cmp(&a.game_id)));
    records.truncate(n);
    records
}
