use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::course::Course;
use crate::cut::CutLine;
use crate::field::{
    best_nine_distribution, course_comparison, field_overview, near_miss_analysis,
    round_two_changes, start_nine_impact, tightest_miss, CourseComparison, FieldOverview,
    NearMissBucket, RoundTwoChanges, StartNineImpact,
};
use crate::holes::{
    easiest_holes, hardest_holes, hole_statistics, scoring_rates, HoleStatistic, ScoringRates,
};
use crate::rank::{describe, percentile_table, PercentileRow, SummaryStats};
use crate::records::Snapshot;
use crate::stretch::{hardest_stretches, stretch_statistics, StretchStatistic};
use crate::summary::{derive_summaries, PlayerSummary};

/// Everything derived for one course: per-hole difficulty, scoring rates and
/// the 3-hole stretch rankings.
#[derive(Debug, Clone, Serialize)]
pub struct CourseReport {
    pub course: Course,
    pub holes: Vec<HoleStatistic>,
    pub scoring_rates: Vec<ScoringRates>,
    pub hardest_holes: Vec<HoleStatistic>,
    pub easiest_holes: Vec<HoleStatistic>,
    pub hardest_stretches: Vec<StretchStatistic>,
}

impl CourseReport {
    fn build(snapshot: &Snapshot, course: Course, top: usize) -> Self {
        let holes = hole_statistics(snapshot, course);
        let stretches = stretch_statistics(&holes);
        Self {
            course,
            scoring_rates: scoring_rates(&holes),
            hardest_holes: hardest_holes(&holes, top).into_iter().cloned().collect_vec(),
            easiest_holes: easiest_holes(&holes, top).into_iter().cloned().collect_vec(),
            hardest_stretches: hardest_stretches(&stretches, top),
            holes,
        }
    }
}

/// The full tournament report, derived in one pass over a snapshot. Serializes
/// to JSON as-is; [`fmt::Display`] renders the text form.
#[derive(Debug, Serialize)]
pub struct Report {
    pub overview: FieldOverview,
    pub cut: Option<CutLine>,
    /// Summaries ordered by position; players without a total trail the field.
    pub leaderboard: Vec<PlayerSummary>,
    pub courses: Vec<CourseReport>,
    pub total_percentiles: Vec<PercentileRow>,
    pub total_stats: Option<SummaryStats>,
    pub near_miss: Vec<NearMissBucket>,
    pub tightest_miss: Option<i16>,
    pub round_two_changes: RoundTwoChanges,
    pub best_nine_distribution: Vec<(String, usize)>,
    pub start_nine_impact: Vec<StartNineImpact>,
    pub course_comparison: CourseComparison,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn build(snapshot: &Snapshot, top: usize) -> Self {
        let (mut summaries, cut) = derive_summaries(snapshot);
        summaries.sort_by_key(|summary| {
            (
                summary.total_score.is_none(),
                summary.position.map_or(usize::MAX, |position| position.rank),
            )
        });

        let totals = summaries
            .iter()
            .filter_map(|summary| summary.total_score.map(f64::from))
            .collect_vec();

        Self {
            overview: field_overview(snapshot, &summaries, cut),
            cut,
            courses: Course::ALL
                .iter()
                .map(|&course| CourseReport::build(snapshot, course, top))
                .collect_vec(),
            total_percentiles: percentile_table(&totals),
            total_stats: describe(&totals),
            near_miss: near_miss_analysis(&summaries),
            tightest_miss: tightest_miss(&summaries),
            round_two_changes: round_two_changes(&summaries),
            best_nine_distribution: best_nine_distribution(&summaries),
            start_nine_impact: start_nine_impact(snapshot, &summaries),
            course_comparison: course_comparison(snapshot, &summaries),
            warnings: snapshot
                .warnings()
                .iter()
                .map(|warning| warning.to_string())
                .collect_vec(),
            leaderboard: summaries,
        }
    }
}

fn opt<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Field overview ===")?;
        writeln!(
            f,
            "{} players, {} made the cut ({})",
            self.overview.players,
            self.overview.made_cut,
            opt(self
                .overview
                .made_cut_rate_pct
                .map(|rate| format!("{rate:.1}%"))),
        )?;
        if let Some(cut) = self.cut {
            writeln!(
                f,
                "cut line {} ({} advance){}",
                cut.threshold_score,
                cut.advancing_count,
                self.overview
                    .cut_to_par
                    .map(|to_par| format!(", {to_par:+} to par"))
                    .unwrap_or_default(),
            )?;
        }
        writeln!(f, "leader {}", opt(self.overview.leader_score))?;

        writeln!(f, "\n=== Leaderboard ===")?;
        for summary in &self.leaderboard {
            writeln!(
                f,
                "{:>4} {:<24} {:>3} {:>3} {:>5} {:>5} {}",
                opt(summary.position),
                summary.player,
                opt(summary.round_1.as_ref().and_then(|round| round.total)),
                opt(summary.round_2.as_ref().and_then(|round| round.total)),
                opt(summary.total_score),
                opt(summary.to_par.map(|to_par| format!("{to_par:+}"))),
                if summary.made_cut { "cut: in" } else { "cut: out" },
            )?;
        }

        for report in &self.courses {
            writeln!(f, "\n=== {} course ===", report.course)?;
            writeln!(f, "hardest holes:")?;
            for stat in &report.hardest_holes {
                writeln!(
                    f,
                    "  hole {:>2} (par {}): avg {:.2} ({:+.2})",
                    stat.hole, stat.par, stat.avg_score, stat.avg_vs_par
                )?;
            }
            writeln!(f, "easiest holes:")?;
            for stat in &report.easiest_holes {
                writeln!(
                    f,
                    "  hole {:>2} (par {}): avg {:.2} ({:+.2})",
                    stat.hole, stat.par, stat.avg_score, stat.avg_vs_par
                )?;
            }
            writeln!(f, "hardest stretches:")?;
            for stretch in &report.hardest_stretches {
                writeln!(
                    f,
                    "  holes {:>5}: {:+.2} vs par",
                    stretch.label(),
                    stretch.avg_vs_par_sum
                )?;
            }
        }

        if let Some(stats) = &self.total_stats {
            writeln!(f, "\n=== 36-hole totals ===")?;
            writeln!(
                f,
                "n={} mean={:.2} sd={} min={} max={}",
                stats.count,
                stats.mean,
                opt(stats.std_dev.map(|sd| format!("{sd:.2}"))),
                stats.min,
                stats.max
            )?;
            for row in &self.total_percentiles {
                writeln!(f, "  p{:<2.0} {:.1}", row.percentile * 100.0, row.value)?;
            }
        }

        if !self.near_miss.is_empty() {
            writeln!(f, "\n=== Near the cut line ===")?;
            for bucket in &self.near_miss {
                writeln!(
                    f,
                    "  within {} stroke(s): {} players, {} in / {} out",
                    bucket.margin, bucket.players, bucket.made_cut, bucket.missed_cut
                )?;
            }
            if let Some(margin) = self.tightest_miss {
                writeln!(f, "tightest miss: {margin} stroke(s)")?;
            }
        }

        writeln!(f, "\n=== Round 2 vs round 1 ===")?;
        writeln!(
            f,
            "improved {} / tied {} / worsened {}",
            self.round_two_changes.improved,
            self.round_two_changes.tied,
            self.round_two_changes.worsened
        )?;

        if !self.best_nine_distribution.is_empty() {
            writeln!(f, "\n=== Best nine distribution ===")?;
            for (label, count) in &self.best_nine_distribution {
                writeln!(f, "  {label}: {count}")?;
            }
        }

        if !self.start_nine_impact.is_empty() {
            writeln!(f, "\n=== Round 2 start (made cut) ===")?;
            for group in &self.start_nine_impact {
                writeln!(
                    f,
                    "  {}: {} players, mean total {:.1}, mean R2 {:.1}",
                    group.start, group.players, group.mean_total, group.mean_round_2
                )?;
            }
        }

        writeln!(f, "\n=== Course comparison ===")?;
        writeln!(
            f,
            "mean Lake {} / mean Ocean {}; better on Lake {} / Ocean {}",
            opt(self.course_comparison.mean_lake.map(|m| format!("{m:.1}"))),
            opt(self.course_comparison.mean_ocean.map(|m| format!("{m:.1}"))),
            self.course_comparison.better_on_lake,
            self.course_comparison.better_on_ocean
        )?;
        for cell in &self.course_comparison.round_to_par {
            writeln!(
                f,
                "  {} R{}: {:+.2} to par over {} round(s)",
                cell.course, cell.round, cell.mean_to_par, cell.rounds
            )?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "\n=== Data warnings ===")?;
            for warning in &self.warnings {
                writeln!(f, "  {warning}")?;
            }
        }
        Ok(())
    }
}
