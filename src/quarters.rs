use crate::state::{QUARTERS, TeamStatsSummary};
use crate::stats::round1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; QUARTERS] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    pub fn index(self) -> usize {
        match self {
            Self::Q1 => 0,
            Self::Q2 => 1,
            Self::Q3 => 2,
            Self::Q4 => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterExtremes {
    pub strongest: Quarter,
    pub weakest: Quarter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuarterAnalysis {
    pub diffs: [f64; QUARTERS],
    /// `None` when every differential is zero (typically: no quarter data).
    pub extremes: Option<QuarterExtremes>,
}

impl QuarterAnalysis {
    pub fn diff(&self, quarter: Quarter) -> f64 {
        self.diffs[quarter.index()]
    }
}

pub fn analyze(summary: &TeamStatsSummary) -> QuarterAnalysis {
    let mut diffs = [0.0; QUARTERS];
    for q in Quarter::ALL {
        let i = q.index();
        diffs[i] = round1(summary.quarters[i] - summary.opp_quarters[i]);
    }

    if diffs.iter().all(|d| *d == 0.0) {
        return QuarterAnalysis {
            diffs,
            extremes: None,
        };
    }

    // Strict comparisons keep the earliest quarter on ties.
    let mut strongest = Quarter::Q1;
    let mut weakest = Quarter::Q1;
    for q in Quarter::ALL.into_iter().skip(1) {
        if diffs[q.index()] > diffs[strongest.index()] {
            strongest = q;
        }
        if diffs[q.index()] < diffs[weakest.index()] {
            weakest = q;
        }
    }

    QuarterAnalysis {
        diffs,
        extremes: Some(QuarterExtremes { strongest, weakest }),
    }
}
