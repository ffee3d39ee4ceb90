use itertools::Itertools;
use serde::Serialize;

use crate::course::{Course, HOLES_PER_ROUND};
use crate::rank;
use crate::records::Snapshot;
use crate::score::{CategoryCounts, ScoreCategory};

/// Aggregate difficulty of one (course, hole) pair across every round played
/// on it. Holes nobody has played produce no statistic at all; "no statistic"
/// is a defined state for callers, never a placeholder mean.
#[derive(Debug, Clone, Serialize)]
pub struct HoleStatistic {
    pub course: Course,
    pub hole: u8,
    pub par: u8,
    pub records: u16,
    pub avg_score: f64,
    pub avg_vs_par: f64,
    pub counts: CategoryCounts,
}

/// Per-hole statistics for one course, in hole order. Holes with no par
/// record or no recorded strokes are omitted.
pub fn hole_statistics(snapshot: &Snapshot, course: Course) -> Vec<HoleStatistic> {
    (1..=HOLES_PER_ROUND)
        .filter_map(|hole| {
            let par = snapshot.pars().par(course, hole)?;
            let strokes = snapshot
                .rounds_on(course)
                .filter_map(|scores| scores.strokes_on(hole))
                .collect_vec();
            if strokes.is_empty() {
                return None;
            }
            let mut counts = CategoryCounts::default();
            for &s in &strokes {
                counts.record(ScoreCategory::new(s, par));
            }
            let avg_score =
                strokes.iter().map(|&s| f64::from(s)).sum::<f64>() / strokes.len() as f64;
            Some(HoleStatistic {
                course,
                hole,
                par,
                records: strokes.len() as u16,
                avg_score,
                avg_vs_par: avg_score - f64::from(par),
                counts,
            })
        })
        .collect_vec()
}

/// The stacked "scoring rates" view of a hole: what share of the field made
/// birdie or better, par, and bogey or worse.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringRates {
    pub course: Course,
    pub hole: u8,
    pub birdie_or_better_pct: f64,
    pub par_pct: f64,
    pub bogey_or_worse_pct: f64,
}

impl ScoringRates {
    /// `None` when the hole has no classified records to take rates over.
    pub fn from_statistic(stat: &HoleStatistic) -> Option<Self> {
        let total = f64::from(stat.counts.total());
        if stat.counts.total() == 0 {
            return None;
        }
        Some(Self {
            course: stat.course,
            hole: stat.hole,
            birdie_or_better_pct: f64::from(stat.counts.birdie_or_better()) / total * 100.0,
            par_pct: f64::from(stat.counts.pars) / total * 100.0,
            bogey_or_worse_pct: f64::from(stat.counts.bogey_or_worse()) / total * 100.0,
        })
    }
}

pub fn scoring_rates(stats: &[HoleStatistic]) -> Vec<ScoringRates> {
    stats
        .iter()
        .filter_map(ScoringRates::from_statistic)
        .collect_vec()
}

/// Top-n holes by average over par, hardest first.
pub fn hardest_holes(stats: &[HoleStatistic], n: usize) -> Vec<&HoleStatistic> {
    rank::nlargest(stats, n, |stat| Some(stat.avg_vs_par))
}

/// Top-n holes by average under par, easiest first.
pub fn easiest_holes(stats: &[HoleStatistic], n: usize) -> Vec<&HoleStatistic> {
    rank::nsmallest(stats, n, |stat| Some(stat.avg_vs_par))
}
