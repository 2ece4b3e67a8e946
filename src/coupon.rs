use crate::state::{HeadToHeadSummary, TeamSide, TeamStatsSummary};
use crate::stats::round1;

const TEAM_TOTAL_OFFSET: f64 = 0.5;
const MATCH_TOTAL_OFFSET: f64 = 1.5;
const MATCH_TOTAL_SAFE_OFFSET: f64 = 2.5;
const VERY_STABLE_BELOW: i64 = 10;
const AVERAGE_UP_TO: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    VeryStable,
    Average,
    NotVeryStable,
}

impl Stability {
    pub fn from_margin(margin: i64) -> Self {
        if margin < VERY_STABLE_BELOW {
            Self::VeryStable
        } else if margin <= AVERAGE_UP_TO {
            Self::Average
        } else {
            Self::NotVeryStable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryStable => "Very Stable",
            Self::Average => "Average",
            Self::NotVeryStable => "Not Very Stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouponProjection {
    pub pick: TeamSide,
    pub team_total_base: i64,
    pub team_total_line: f64,
    pub margin: i64,
    pub stability: Stability,
    pub match_total_base: i64,
    pub match_total_line: f64,
    pub match_total_safe_line: f64,
}

#[derive(Debug, Clone, Copy)]
struct TeamTotal {
    base: i64,
    margin: i64,
}

fn team_total(stats: &TeamStatsSummary, h2h_avg: Option<f64>) -> TeamTotal {
    let conservative = match h2h_avg {
        Some(h2h) => stats.pts_avg.min(h2h),
        None => stats.pts_avg,
    };
    let base = conservative.floor() as i64;
    TeamTotal {
        base,
        margin: base - i64::from(stats.pts_min),
    }
}

pub fn project(
    home: &TeamStatsSummary,
    visitor: &TeamStatsSummary,
    h2h: &HeadToHeadSummary,
) -> CouponProjection {
    let home_h2h = h2h.avg_for(TeamSide::Home);
    let visitor_h2h = h2h.avg_for(TeamSide::Visitor);
    let home_total = team_total(home, home_h2h);
    let visitor_total = team_total(visitor, visitor_h2h);

    // Smaller margin means lower volatility; home wins ties.
    let (pick, picked) = if home_total.margin <= visitor_total.margin {
        (TeamSide::Home, home_total)
    } else {
        (TeamSide::Visitor, visitor_total)
    };

    // Averages carry one decimal, so normalising the sums removes float noise
    // before flooring (110.2 + 105.8 must floor to 216).
    let overall_sum = round1(home.pts_avg + visitor.pts_avg);
    let h2h_sum = match (home_h2h, visitor_h2h) {
        (Some(h), Some(v)) => round1(h + v),
        _ => f64::INFINITY,
    };
    let match_total_base = overall_sum.min(h2h_sum).floor() as i64;

    CouponProjection {
        pick,
        team_total_base: picked.base,
        team_total_line: picked.base as f64 - TEAM_TOTAL_OFFSET,
        margin: picked.margin,
        stability: Stability::from_margin(picked.margin),
        match_total_base,
        match_total_line: match_total_base as f64 - MATCH_TOTAL_OFFSET,
        match_total_safe_line: match_total_base as f64 - MATCH_TOTAL_SAFE_OFFSET,
    }
}
