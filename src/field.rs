use itertools::Itertools;
use serde::Serialize;

use crate::course::{Course, Nine};
use crate::cut::CutLine;
use crate::records::Snapshot;
use crate::summary::PlayerSummary;

/// Championship-level headline numbers.
#[derive(Debug, Clone, Serialize)]
pub struct FieldOverview {
    pub players: usize,
    pub made_cut: usize,
    pub made_cut_rate_pct: Option<f64>,
    pub mean_total: Option<f64>,
    pub leader_score: Option<u16>,
    pub cut_line: Option<CutLine>,
    /// Cut threshold relative to the 36-hole par, when both course layouts
    /// are complete.
    pub cut_to_par: Option<i16>,
}

pub fn field_overview(
    snapshot: &Snapshot,
    summaries: &[PlayerSummary],
    cut: Option<CutLine>,
) -> FieldOverview {
    let totals = summaries
        .iter()
        .filter_map(|summary| summary.total_score)
        .collect_vec();
    let made_cut = summaries.iter().filter(|summary| summary.made_cut).count();
    let tournament_par = snapshot
        .pars()
        .course_par(Course::Lake)
        .zip(snapshot.pars().course_par(Course::Ocean))
        .map(|(lake, ocean)| lake + ocean);
    FieldOverview {
        players: summaries.len(),
        made_cut,
        made_cut_rate_pct: (!summaries.is_empty())
            .then(|| made_cut as f64 / summaries.len() as f64 * 100.0),
        mean_total: (!totals.is_empty())
            .then(|| totals.iter().map(|&t| f64::from(t)).sum::<f64>() / totals.len() as f64),
        leader_score: totals.iter().min().copied(),
        cut_line: cut,
        cut_to_par: cut
            .zip(tournament_par)
            .map(|(cut, par)| cut.threshold_score as i16 - par as i16),
    }
}

/// The margins the near-miss table is bucketed over.
pub const NEAR_MISS_MARGINS: [i16; 4] = [1, 2, 3, 5];

/// Players within ±margin strokes of the cut line and how many of them
/// survived it.
#[derive(Debug, Clone, Serialize)]
pub struct NearMissBucket {
    pub margin: i16,
    pub players: usize,
    pub made_cut: usize,
    pub missed_cut: usize,
    pub cut_rate_pct: Option<f64>,
}

pub fn near_miss_analysis(summaries: &[PlayerSummary]) -> Vec<NearMissBucket> {
    NEAR_MISS_MARGINS
        .iter()
        .map(|&margin| {
            let in_range = summaries
                .iter()
                .filter(|summary| {
                    summary
                        .cut_margin
                        .is_some_and(|m| (-margin..=margin).contains(&m))
                })
                .collect_vec();
            let made_cut = in_range.iter().filter(|summary| summary.made_cut).count();
            NearMissBucket {
                margin,
                players: in_range.len(),
                made_cut,
                missed_cut: in_range.len() - made_cut,
                cut_rate_pct: (!in_range.is_empty())
                    .then(|| made_cut as f64 / in_range.len() as f64 * 100.0),
            }
        })
        .collect_vec()
}

/// Smallest positive margin among players who missed the cut.
pub fn tightest_miss(summaries: &[PlayerSummary]) -> Option<i16> {
    summaries
        .iter()
        .filter(|summary| !summary.made_cut)
        .filter_map(|summary| summary.cut_margin)
        .min()
}

/// Improved / tied / worsened breakdown of round 2 against round 1, over
/// players with both rounds complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoundTwoChanges {
    pub improved: usize,
    pub tied: usize,
    pub worsened: usize,
}

impl RoundTwoChanges {
    pub fn total(&self) -> usize {
        self.improved + self.tied + self.worsened
    }
}

pub fn round_two_changes(summaries: &[PlayerSummary]) -> RoundTwoChanges {
    let mut changes = RoundTwoChanges::default();
    for diff in summaries.iter().filter_map(|s| s.round_differential) {
        match diff.cmp(&0) {
            std::cmp::Ordering::Less => changes.improved += 1,
            std::cmp::Ordering::Equal => changes.tied += 1,
            std::cmp::Ordering::Greater => changes.worsened += 1,
        }
    }
    changes
}

/// How many players found their best nine in each (round, course, side)
/// segment, most common first; label ties break alphabetically.
pub fn best_nine_distribution(summaries: &[PlayerSummary]) -> Vec<(String, usize)> {
    summaries
        .iter()
        .filter_map(|summary| summary.best_nine)
        .counts_by(|best| best.label())
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect_vec()
}

/// Made-cut players grouped by the nine they started round 2 on.
#[derive(Debug, Clone, Serialize)]
pub struct StartNineImpact {
    pub start: Nine,
    pub players: usize,
    pub mean_total: f64,
    pub mean_round_2: f64,
}

pub fn start_nine_impact(snapshot: &Snapshot, summaries: &[PlayerSummary]) -> Vec<StartNineImpact> {
    Nine::ALL
        .iter()
        .filter_map(|&start| {
            let group = summaries
                .iter()
                .filter(|summary| summary.made_cut)
                .filter(|summary| {
                    snapshot
                        .player_round(&summary.player, 2)
                        .and_then(|scores| scores.start_nine)
                        == Some(start)
                })
                .collect_vec();
            let totals = group.iter().filter_map(|s| s.total_score).collect_vec();
            let round_2_totals = group
                .iter()
                .filter_map(|s| s.round_2.as_ref().and_then(|r| r.total))
                .collect_vec();
            if totals.is_empty() || round_2_totals.is_empty() {
                return None;
            }
            Some(StartNineImpact {
                start,
                players: group.len(),
                mean_total: totals.iter().map(|&t| f64::from(t)).sum::<f64>()
                    / totals.len() as f64,
                mean_round_2: round_2_totals.iter().map(|&t| f64::from(t)).sum::<f64>()
                    / round_2_totals.len() as f64,
            })
        })
        .collect_vec()
}

/// Field-level comparison of the two courses.
#[derive(Debug, Clone, Serialize)]
pub struct CourseComparison {
    pub mean_lake: Option<f64>,
    pub mean_ocean: Option<f64>,
    pub better_on_lake: usize,
    pub better_on_ocean: usize,
    pub round_to_par: Vec<CourseRoundToPar>,
}

/// Mean to-par for one (course, round) cell.
#[derive(Debug, Clone, Serialize)]
pub struct CourseRoundToPar {
    pub course: Course,
    pub round: u8,
    pub rounds: usize,
    pub mean_to_par: f64,
}

pub fn course_comparison(snapshot: &Snapshot, summaries: &[PlayerSummary]) -> CourseComparison {
    let mean = |scores: Vec<u16>| {
        (!scores.is_empty())
            .then(|| scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64)
    };
    let lake = summaries.iter().filter_map(|s| s.lake_score).collect_vec();
    let ocean = summaries.iter().filter_map(|s| s.ocean_score).collect_vec();

    let round_to_par = Course::ALL
        .iter()
        .cartesian_product(1..=2u8)
        .filter_map(|(&course, round)| {
            let to_pars = summaries
                .iter()
                .filter_map(|summary| match round {
                    1 => summary.round_1.as_ref(),
                    _ => summary.round_2.as_ref(),
                })
                .filter(|round_total| round_total.course == course)
                .filter_map(|round_total| round_total.to_par(snapshot.pars()))
                .collect_vec();
            (!to_pars.is_empty()).then(|| CourseRoundToPar {
                course,
                round,
                rounds: to_pars.len(),
                mean_to_par: to_pars.iter().map(|&t| f64::from(t)).sum::<f64>()
                    / to_pars.len() as f64,
            })
        })
        .collect_vec();

    CourseComparison {
        mean_lake: mean(lake),
        mean_ocean: mean(ocean),
        better_on_lake: summaries
            .iter()
            .filter(|s| s.course_differential.is_some_and(|d| d < 0))
            .count(),
        better_on_ocean: summaries
            .iter()
            .filter(|s| s.course_differential.is_some_and(|d| d > 0))
            .count(),
        round_to_par,
    }
}
