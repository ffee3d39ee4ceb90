use itertools::Itertools;
use serde::Serialize;

use crate::course::HOLES_PER_ROUND;
use crate::course::Course;
use crate::holes::HoleStatistic;

/// Holes per contiguous stretch window.
pub const STRETCH_LEN: u8 = 3;

/// Summed average-vs-par over one contiguous 3-hole window of a course.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StretchStatistic {
    pub course: Course,
    pub start_hole: u8,
    pub avg_vs_par_sum: f64,
}

impl StretchStatistic {
    /// "1-3", "16-18", the display form of the window.
    pub fn label(&self) -> String {
        format!("{}-{}", self.start_hole, self.start_hole + STRETCH_LEN - 1)
    }
}

/// All defined 3-hole windows for one course's hole statistics. A window is
/// excluded (not zero-filled) whenever any of its holes has no statistic, so
/// a course with full data yields 16 windows and a sparse one fewer.
pub fn stretch_statistics(stats: &[HoleStatistic]) -> Vec<StretchStatistic> {
    let Some(course) = stats.first().map(|stat| stat.course) else {
        return vec![];
    };
    let mut avg_vs_par = [None; HOLES_PER_ROUND as usize];
    for stat in stats {
        avg_vs_par[stat.hole as usize - 1] = Some(stat.avg_vs_par);
    }
    (1..=HOLES_PER_ROUND - STRETCH_LEN + 1)
        .filter_map(|start_hole| {
            let window: Option<Vec<f64>> = (0..STRETCH_LEN)
                .map(|offset| avg_vs_par[(start_hole + offset) as usize - 1])
                .collect();
            window.map(|window| StretchStatistic {
                course,
                start_hole,
                avg_vs_par_sum: window.iter().sum(),
            })
        })
        .collect_vec()
}

/// Top-n windows by summed average-vs-par, hardest first. Ties break toward
/// the earlier start hole, which the ascending construction order gives for
/// free under a stable sort.
pub fn hardest_stretches(stretches: &[StretchStatistic], n: usize) -> Vec<StretchStatistic> {
    stretches
        .iter()
        .copied()
        .sorted_by(|a, b| {
            b.avg_vs_par_sum
                .partial_cmp(&a.avg_vs_par_sum)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .take(n)
        .collect_vec()
}

/// Bottom-n windows, easiest first. Same tie-break as [`hardest_stretches`].
pub fn easiest_stretches(stretches: &[StretchStatistic], n: usize) -> Vec<StretchStatistic> {
    stretches
        .iter()
        .copied()
        .sorted_by(|a, b| {
            a.avg_vs_par_sum
                .partial_cmp(&b.avg_vs_par_sum)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .take(n)
        .collect_vec()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::score::CategoryCounts;

    fn stats_from(avg_vs_par: &[f64]) -> Vec<HoleStatistic> {
        avg_vs_par
            .iter()
            .enumerate()
            .map(|(i, &delta)| HoleStatistic {
                course: Course::Lake,
                hole: i as u8 + 1,
                par: 4,
                records: 1,
                avg_score: 4.0 + delta,
                avg_vs_par: delta,
                counts: CategoryCounts::default(),
            })
            .collect()
    }

    #[test]
    fn window_sums_match_direct_summation() {
        let mut deltas = vec![1.68, 0.2, -0.3, 0.1, 0.13];
        deltas.extend(std::iter::repeat(0.0).take(13));
        let stretches = stretch_statistics(&stats_from(&deltas));
        assert_eq!(stretches.len(), 16);

        let first = &stretches[0];
        assert_eq!(first.start_hole, 1);
        assert!((first.avg_vs_par_sum - 1.58).abs() < 1e-9);
        assert_eq!(first.label(), "1-3");

        let hardest = hardest_stretches(&stretches, 1);
        assert_eq!(hardest[0].start_hole, 1);
        assert!((hardest[0].avg_vs_par_sum - 1.58).abs() < 1e-9);
    }

    #[test]
    fn windows_with_missing_holes_are_excluded() {
        let deltas: Vec<f64> = (0..18).map(|i| i as f64 / 10.0).collect();
        let mut stats = stats_from(&deltas);
        stats.retain(|stat| stat.hole != 5);
        let stretches = stretch_statistics(&stats);
        // Windows starting at 3, 4 and 5 all touch hole 5.
        assert_eq!(stretches.len(), 13);
        assert!(stretches
            .iter()
            .all(|s| !(3..=5).contains(&s.start_hole)));
    }

    #[test]
    fn ties_break_toward_the_earlier_start() {
        let stretches = stretch_statistics(&stats_from(&[0.0; 18]));
        let hardest = hardest_stretches(&stretches, 3);
        assert_eq!(
            hardest.iter().map(|s| s.start_hole).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        let easiest = easiest_stretches(&stretches, 2);
        assert_eq!(easiest[0].start_hole, 1);
    }

    #[test]
    fn empty_input_yields_no_windows() {
        assert!(stretch_statistics(&[]).is_empty());
    }
}
