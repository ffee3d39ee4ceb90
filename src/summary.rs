use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::course::{Course, CoursePars, Nine};
use crate::cut::CutLine;
use crate::records::{RoundScores, Snapshot};
use crate::score::CategoryCounts;

/// One player's aggregated result for a single round.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRoundTotal {
    pub player: String,
    pub round: u8,
    pub course: Course,
    /// Stroke total, absent when any hole of the round is missing. A partial
    /// sum never propagates downstream.
    pub total: Option<u16>,
    pub counts: CategoryCounts,
}

impl PlayerRoundTotal {
    pub fn derive(scores: &RoundScores, pars: &CoursePars) -> Self {
        Self {
            player: scores.player.clone(),
            round: scores.round,
            course: scores.course,
            total: scores.total(),
            counts: scores.counts(pars),
        }
    }

    /// Round total relative to the official course par; absent when either
    /// the total or the full 18-hole par layout is.
    pub fn to_par(&self, pars: &CoursePars) -> Option<i16> {
        let total = self.total?;
        let par = pars.course_par(self.course)?;
        Some(total as i16 - par as i16)
    }
}

/// Leaderboard position: competition ranking (1, 2, 2, 4) with a tied flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub rank: usize,
    pub tied: bool,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tied {
            write!(f, "T{}", self.rank)
        } else {
            write!(f, "{}", self.rank)
        }
    }
}

/// The lowest nine-hole segment a player recorded across both rounds,
/// labelled with the course actually played that round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BestNine {
    pub round: u8,
    pub course: Course,
    pub nine: Nine,
    pub score: u16,
}

impl BestNine {
    pub fn label(&self) -> String {
        format!("R{} {} {}", self.round, self.course, self.nine)
    }
}

/// Everything the reporting layer needs about one player. Derived fields stay
/// absent (never zero) when the rounds they depend on are incomplete; such a
/// player remains in the collection but drops out of the affected aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    pub player: String,
    pub position: Option<Position>,
    pub made_cut: bool,
    pub round_1: Option<PlayerRoundTotal>,
    pub round_2: Option<PlayerRoundTotal>,
    pub total_score: Option<u16>,
    pub to_par: Option<i16>,
    pub lake_score: Option<u16>,
    pub ocean_score: Option<u16>,
    /// Round 2 minus round 1; negative always means round 2 was better.
    pub round_differential: Option<i16>,
    /// Lake minus Ocean; positive means Lake played worse for this player.
    pub course_differential: Option<i16>,
    /// Absolute difference of the two round totals; lower = steadier.
    pub consistency_score: Option<u16>,
    pub improved_round_2: Option<bool>,
    pub scoring_average: Option<f64>,
    /// Signed distance to the cut line: negative = inside by that many.
    pub cut_margin: Option<i16>,
    pub best_nine: Option<BestNine>,
}

impl PlayerSummary {
    fn derive(snapshot: &Snapshot, player: &str) -> Self {
        let pars = snapshot.pars();
        let round_1 = snapshot
            .player_round(player, 1)
            .map(|scores| PlayerRoundTotal::derive(scores, pars));
        let round_2 = snapshot
            .player_round(player, 2)
            .map(|scores| PlayerRoundTotal::derive(scores, pars));

        let r1_total = round_1.as_ref().and_then(|round| round.total);
        let r2_total = round_2.as_ref().and_then(|round| round.total);
        let total_score = r1_total.zip(r2_total).map(|(a, b)| a + b);
        let to_par = round_1
            .as_ref()
            .and_then(|round| round.to_par(pars))
            .zip(round_2.as_ref().and_then(|round| round.to_par(pars)))
            .map(|(a, b)| a + b);

        let mut lake_score = None;
        let mut ocean_score = None;
        for round in [&round_1, &round_2].into_iter().flatten() {
            let Some(total) = round.total else { continue };
            let slot = match round.course {
                Course::Lake => &mut lake_score,
                Course::Ocean => &mut ocean_score,
            };
            // First round on a course wins if a player somehow repeats one.
            slot.get_or_insert(total);
        }

        let round_differential = r1_total
            .zip(r2_total)
            .map(|(r1, r2)| r2 as i16 - r1 as i16);

        Self {
            player: player.to_string(),
            position: None,
            made_cut: false,
            total_score,
            to_par,
            lake_score,
            ocean_score,
            round_differential,
            course_differential: lake_score
                .zip(ocean_score)
                .map(|(lake, ocean)| lake as i16 - ocean as i16),
            consistency_score: round_differential.map(i16::unsigned_abs),
            improved_round_2: round_differential.map(|diff| diff < 0),
            scoring_average: total_score.map(|total| f64::from(total) / 2.0),
            cut_margin: None,
            best_nine: best_nine(snapshot, player),
            round_1,
            round_2,
        }
    }
}

/// Lowest of the four nine-hole segments, ties resolved to the earliest in
/// (R1 front, R1 back, R2 front, R2 back) order. Segments with a missing hole
/// are not candidates.
fn best_nine(snapshot: &Snapshot, player: &str) -> Option<BestNine> {
    (1..=2)
        .cartesian_product(Nine::ALL)
        .filter_map(|(round, nine)| {
            let scores = snapshot.player_round(player, round)?;
            let score = scores.nine_total(nine)?;
            Some(BestNine {
                round,
                course: scores.course,
                nine,
                score,
            })
        })
        .min_by_key(|segment| segment.score)
}

/// Derive the summary collection and the cut line for one snapshot. Summaries
/// come back in the snapshot's player order; sorting is the caller's concern.
pub fn derive_summaries(snapshot: &Snapshot) -> (Vec<PlayerSummary>, Option<CutLine>) {
    let mut summaries = snapshot
        .players()
        .into_iter()
        .map(|player| PlayerSummary::derive(snapshot, player))
        .collect_vec();

    let cut = CutLine::resolve(summaries.iter().filter_map(|summary| summary.total_score));
    if let Some(cut) = cut {
        for summary in &mut summaries {
            if let Some(total) = summary.total_score {
                summary.made_cut = cut.makes_cut(total);
                summary.cut_margin = Some(cut.margin(total));
            }
        }
    }
    assign_positions(&mut summaries);
    (summaries, cut)
}

fn assign_positions(summaries: &mut [PlayerSummary]) {
    let order = summaries
        .iter()
        .enumerate()
        .filter_map(|(index, summary)| summary.total_score.map(|total| (total, index)))
        .sorted_by_key(|&(total, _)| total)
        .collect_vec();

    let mut rank = 1;
    let mut same_score_count = 0;
    let mut last_score = None;
    let mut ranked = Vec::with_capacity(order.len());
    for (total, index) in order {
        if last_score != Some(total) {
            rank += same_score_count;
            same_score_count = 0;
        }
        same_score_count += 1;
        last_score = Some(total);
        ranked.push((index, rank, total));
    }

    for &(index, rank, total) in &ranked {
        let tied = ranked.iter().filter(|&&(_, _, t)| t == total).count() > 1;
        summaries[index].position = Some(Position { rank, tied });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::records::test_support::{flat_pars, round_with_total};
    use crate::records::RoundScores;

    /// Nine strokes summing to `total`.
    fn nine(total: u16) -> [Option<u8>; 9] {
        let base = (total / 9) as u8;
        let mut strokes = [Some(base); 9];
        let mut rest = total - 9 * base as u16;
        for slot in strokes.iter_mut() {
            if rest == 0 {
                break;
            }
            *slot = Some(base + 1);
            rest -= 1;
        }
        strokes
    }

    fn round_with_nines(
        player: &str,
        num: u8,
        course: Course,
        front: u16,
        back: u16,
    ) -> RoundScores {
        let mut strokes = [None; 18];
        strokes[..9].copy_from_slice(&nine(front));
        strokes[9..].copy_from_slice(&nine(back));
        RoundScores::new(player, num, course, strokes)
    }

    #[test]
    fn best_nine_resolves_the_round_course() {
        let rounds = vec![
            round_with_nines("a", 1, Course::Lake, 34, 36),
            round_with_nines("a", 2, Course::Ocean, 35, 33),
        ];
        let snapshot = Snapshot::new(flat_pars(), rounds).unwrap();
        let (summaries, _) = derive_summaries(&snapshot);
        let best = summaries[0].best_nine.unwrap();
        assert_eq!(
            best,
            BestNine {
                round: 2,
                course: Course::Ocean,
                nine: Nine::Back,
                score: 33,
            }
        );
        assert_eq!(best.label(), "R2 Ocean Back");
    }

    #[test]
    fn best_nine_ties_go_to_the_earliest_segment() {
        let rounds = vec![
            round_with_nines("a", 1, Course::Lake, 35, 35),
            round_with_nines("a", 2, Course::Ocean, 35, 36),
        ];
        let snapshot = Snapshot::new(flat_pars(), rounds).unwrap();
        let (summaries, _) = derive_summaries(&snapshot);
        let best = summaries[0].best_nine.unwrap();
        assert_eq!((best.round, best.nine), (1, Nine::Front));
    }

    #[test]
    fn differentials_and_consistency() {
        let rounds = vec![
            round_with_total("a", 1, Course::Lake, 75),
            round_with_total("a", 2, Course::Ocean, 70),
        ];
        let snapshot = Snapshot::new(flat_pars(), rounds).unwrap();
        let (summaries, _) = derive_summaries(&snapshot);
        let summary = &summaries[0];

        assert_eq!(summary.total_score, Some(145));
        assert_eq!(summary.round_differential, Some(-5));
        assert_eq!(summary.improved_round_2, Some(true));
        assert_eq!(summary.consistency_score, Some(5));
        assert_eq!(summary.lake_score, Some(75));
        assert_eq!(summary.ocean_score, Some(70));
        assert_eq!(summary.course_differential, Some(5)); // Lake played worse
        assert_eq!(summary.scoring_average, Some(72.5));
        // Flat par-4 table: 72 per course, 144 overall.
        assert_eq!(summary.to_par, Some(1));
    }

    #[test]
    fn missing_round_two_leaves_fields_undefined_but_player_present() {
        let mut rounds = vec![round_with_total("ghost", 1, Course::Lake, 70)];
        for i in 0..4 {
            rounds.push(round_with_total(&format!("p{i}"), 1, Course::Lake, 72));
            rounds.push(round_with_total(&format!("p{i}"), 2, Course::Ocean, 73 + i as u16));
        }
        let snapshot = Snapshot::new(flat_pars(), rounds).unwrap();
        let (summaries, cut) = derive_summaries(&snapshot);

        let ghost = summaries.iter().find(|s| s.player == "ghost").unwrap();
        assert_eq!(ghost.total_score, None);
        assert_eq!(ghost.round_differential, None);
        assert_eq!(ghost.course_differential, None);
        assert_eq!(ghost.position, None);
        assert_eq!(ghost.cut_margin, None);
        assert!(!ghost.made_cut);
        // Round 1 alone still contributes what it can.
        assert_eq!(ghost.lake_score, Some(70));

        // The cut is resolved over the four complete players only.
        let cut = cut.unwrap();
        assert_eq!(cut.advancing_count, 4);
        assert_eq!(summaries.len(), 5);
    }

    #[test]
    fn competition_ranking_with_ties() {
        let totals: [u16; 4] = [140, 141, 141, 143];
        let rounds = totals
            .iter()
            .enumerate()
            .flat_map(|(i, &total)| {
                vec![
                    round_with_total(&format!("p{i}"), 1, Course::Lake, 70),
                    round_with_total(&format!("p{i}"), 2, Course::Ocean, total - 70),
                ]
            })
            .collect_vec();
        let snapshot = Snapshot::new(flat_pars(), rounds).unwrap();
        let (summaries, _) = derive_summaries(&snapshot);

        let positions = summaries
            .iter()
            .map(|s| s.position.unwrap().to_string())
            .collect_vec();
        assert_eq!(positions, vec!["1", "T2", "T2", "4"]);
    }

    mod generated_field {
        use super::*;
        use fake::{Dummy, Fake, Faker};

        #[derive(Debug, Dummy)]
        struct TestingRound {
            #[dummy(faker = "(Faker, 18)")]
            holes: Vec<TestingResult>,
        }

        #[derive(Debug, Dummy)]
        struct TestingResult {
            #[dummy(faker = "3..=7")]
            strokes: u8,
        }

        impl TestingRound {
            fn into_scores(self, player: &str, round: u8, course: Course) -> RoundScores {
                let mut strokes = [None; 18];
                for (slot, result) in strokes.iter_mut().zip(self.holes) {
                    *slot = Some(result.strokes);
                }
                RoundScores::new(player, round, course, strokes)
            }
        }

        #[test]
        fn cut_invariants_hold_over_a_generated_field() {
            let rounds = (0..80)
                .flat_map(|i| {
                    let player = format!("player{i}");
                    let r1: TestingRound = Faker.fake();
                    let r2: TestingRound = Faker.fake();
                    vec![
                        r1.into_scores(&player, 1, Course::Lake),
                        r2.into_scores(&player, 2, Course::Ocean),
                    ]
                })
                .collect_vec();
            let snapshot = Snapshot::new(flat_pars(), rounds).unwrap();
            let (summaries, cut) = derive_summaries(&snapshot);
            let cut = cut.unwrap();

            for summary in &summaries {
                let total = summary.total_score.unwrap();
                assert_eq!(summary.made_cut, total <= cut.threshold_score);
                assert_eq!(summary.cut_margin, Some(cut.margin(total)));
                let round_1 = summary.round_1.as_ref().unwrap();
                assert_eq!(round_1.counts.total(), 18);
            }
            let advancing = summaries.iter().filter(|s| s.made_cut).count();
            assert_eq!(advancing, cut.advancing_count);
        }
    }
}
