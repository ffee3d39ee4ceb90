use itertools::Itertools;
use log::warn;

use crate::course::{Course, CoursePars, Nine, HOLES_PER_ROUND, ROUNDS};
use crate::error::{DataWarning, Error};
use crate::score::CategoryCounts;

/// One player's scorecard for one round: the course played, an optional
/// starting nine, and per-hole strokes where `None` means the hole was not
/// played (withdrawal, no-show, or round not completed).
#[derive(Debug, Clone)]
pub struct RoundScores {
    pub player: String,
    pub round: u8,
    pub course: Course,
    pub start_nine: Option<Nine>,
    pub strokes: [Option<u8>; HOLES_PER_ROUND as usize],
    /// Pre-aggregated category counts supplied by the loader, if any. The
    /// engine can consume these or reclassify from strokes; disagreement is
    /// surfaced as a [`DataWarning`] when the snapshot is built.
    pub provided_counts: Option<CategoryCounts>,
}

impl RoundScores {
    pub fn new(
        player: impl Into<String>,
        round: u8,
        course: Course,
        strokes: [Option<u8>; HOLES_PER_ROUND as usize],
    ) -> Self {
        Self {
            player: player.into(),
            round,
            course,
            start_nine: None,
            strokes,
            provided_counts: None,
        }
    }

    /// Strokes on a 1-based hole number.
    pub fn strokes_on(&self, hole: u8) -> Option<u8> {
        self.strokes.get(hole as usize - 1).copied().flatten()
    }

    /// (hole, strokes) for every hole actually played, in hole order.
    pub fn recorded(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.strokes
            .iter()
            .enumerate()
            .filter_map(|(i, strokes)| strokes.map(|s| (i as u8 + 1, s)))
    }

    pub fn holes_played(&self) -> usize {
        self.strokes.iter().flatten().count()
    }

    pub fn is_complete(&self) -> bool {
        self.holes_played() == HOLES_PER_ROUND as usize
    }

    /// Round total, defined only when all 18 holes were played. A partial sum
    /// never stands in for a total.
    pub fn total(&self) -> Option<u16> {
        self.strokes
            .iter()
            .map(|strokes| strokes.map(u16::from))
            .sum()
    }

    /// Stroke total over one nine, defined only when all 9 holes were played.
    pub fn nine_total(&self, nine: Nine) -> Option<u16> {
        nine.holes()
            .map(|hole| self.strokes_on(hole).map(u16::from))
            .sum()
    }

    /// Category counts reclassified from the per-hole strokes. Holes without
    /// a par record are skipped (surfaced separately as warnings).
    pub fn reclassified_counts(&self, pars: &CoursePars) -> CategoryCounts {
        CategoryCounts::from_scores(
            self.recorded()
                .filter_map(|(hole, strokes)| Some((Some(strokes), pars.par(self.course, hole)?))),
        )
    }

    /// The counts the engine should use: reclassified when any strokes are
    /// recorded, otherwise whatever the loader supplied.
    pub fn counts(&self, pars: &CoursePars) -> CategoryCounts {
        if self.holes_played() > 0 {
            self.reclassified_counts(pars)
        } else {
            self.provided_counts.unwrap_or_default()
        }
    }
}

/// Immutable, validated score store for one tournament snapshot. Built once
/// by the loader and passed by reference to every aggregator; if the
/// underlying data changes, a new snapshot is built and everything derived is
/// recomputed from scratch.
#[derive(Debug)]
pub struct Snapshot {
    pars: CoursePars,
    rounds: Vec<RoundScores>,
    warnings: Vec<DataWarning>,
}

impl Snapshot {
    pub fn new(pars: CoursePars, rounds: Vec<RoundScores>) -> Result<Self, Error> {
        for scores in &rounds {
            if !(1..=ROUNDS).contains(&scores.round) {
                return Err(Error::RoundOutOfRange {
                    player: scores.player.clone(),
                    round: scores.round,
                });
            }
        }
        if let Some(dup) = rounds
            .iter()
            .duplicates_by(|scores| (scores.player.clone(), scores.round))
            .next()
        {
            return Err(Error::DuplicateRound {
                player: dup.player.clone(),
                round: dup.round,
            });
        }

        let warnings = Self::collect_warnings(&pars, &rounds);
        for warning in &warnings {
            warn!("{warning}");
        }
        Ok(Self {
            pars,
            rounds,
            warnings,
        })
    }

    fn collect_warnings(pars: &CoursePars, rounds: &[RoundScores]) -> Vec<DataWarning> {
        let mut warnings = vec![];
        for scores in rounds {
            for (hole, _) in scores.recorded() {
                if pars.par(scores.course, hole).is_none() {
                    warnings.push(DataWarning::MissingParRecord {
                        course: scores.course,
                        hole,
                        player: scores.player.clone(),
                        round: scores.round,
                    });
                }
            }
            if let Some(provided) = scores.provided_counts {
                if scores.holes_played() > 0 && provided != scores.reclassified_counts(pars) {
                    warnings.push(DataWarning::CategoryCountMismatch {
                        player: scores.player.clone(),
                        round: scores.round,
                    });
                }
            }
        }
        warnings
    }

    pub fn pars(&self) -> &CoursePars {
        &self.pars
    }

    pub fn rounds(&self) -> &[RoundScores] {
        &self.rounds
    }

    pub fn warnings(&self) -> &[DataWarning] {
        &self.warnings
    }

    /// Players in first-seen order. All rankings that fall back to insertion
    /// order for tie-breaking are reproducible because this order is.
    pub fn players(&self) -> Vec<&str> {
        self.rounds
            .iter()
            .map(|scores| scores.player.as_str())
            .unique()
            .collect_vec()
    }

    pub fn player_round(&self, player: &str, round: u8) -> Option<&RoundScores> {
        self.rounds
            .iter()
            .find(|scores| scores.player == player && scores.round == round)
    }

    pub fn rounds_on(&self, course: Course) -> impl Iterator<Item = &RoundScores> {
        self.rounds.iter().filter(move |scores| scores.course == course)
    }
}


#[cfg(test)]
mod test {
    use super::test_support::{flat_pars, round, round_with_total};
    use super::*;
    use crate::score::ScoreCategory;

    #[test]
    fn total_undefined_with_any_missing_hole() {
        let mut scores = round("a", 1, Course::Lake, 4);
        assert_eq!(scores.total(), Some(72));
        scores.strokes[9] = None;
        assert_eq!(scores.total(), None);
        assert_eq!(scores.holes_played(), 17);
    }

    #[test]
    fn nine_totals_follow_the_same_rule() {
        let mut scores = round("a", 1, Course::Lake, 4);
        scores.strokes[2] = None; // hole 3, front nine
        assert_eq!(scores.nine_total(Nine::Front), None);
        assert_eq!(scores.nine_total(Nine::Back), Some(36));
    }

    #[test]
    fn round_with_total_builds_exact_sums() {
        let scores = round_with_total("a", 1, Course::Lake, 71);
        assert_eq!(scores.total(), Some(71));
        let scores = round_with_total("a", 2, Course::Ocean, 68);
        assert_eq!(scores.total(), Some(68));
    }

    #[test]
    fn duplicate_player_round_rejected() {
        let rounds = vec![
            round("a", 1, Course::Lake, 4),
            round("a", 1, Course::Lake, 4),
        ];
        assert!(matches!(
            Snapshot::new(flat_pars(), rounds),
            Err(Error::DuplicateRound { round: 1, .. })
        ));
    }

    #[test]
    fn out_of_range_round_rejected() {
        let rounds = vec![round("a", 3, Course::Lake, 4)];
        assert!(matches!(
            Snapshot::new(flat_pars(), rounds),
            Err(Error::RoundOutOfRange { round: 3, .. })
        ));
    }

    #[test]
    fn missing_par_record_is_warned_not_fatal() {
        let pars = CoursePars::from_records(
            (1..=17)
                .map(|hole| crate::course::HolePar {
                    course: Course::Lake,
                    hole,
                    par: 4,
                })
                .collect(),
        )
        .unwrap();
        let snapshot = Snapshot::new(pars, vec![round("a", 1, Course::Lake, 4)]).unwrap();
        assert_eq!(
            snapshot.warnings(),
            &[DataWarning::MissingParRecord {
                course: Course::Lake,
                hole: 18,
                player: "a".into(),
                round: 1,
            }]
        );
    }

    #[test]
    fn provided_counts_checked_against_reclassification() {
        let mut scores = round("a", 1, Course::Lake, 4);
        let mut wrong = scores.reclassified_counts(&flat_pars());
        wrong.birdies += 1;
        wrong.pars -= 1;
        scores.provided_counts = Some(wrong);
        let snapshot = Snapshot::new(flat_pars(), vec![scores]).unwrap();
        assert_eq!(
            snapshot.warnings(),
            &[DataWarning::CategoryCountMismatch {
                player: "a".into(),
                round: 1,
            }]
        );
        // The engine prefers the reclassified counts.
        let counts = snapshot.rounds()[0].counts(snapshot.pars());
        assert_eq!(counts.pars, 18);
        assert_eq!(counts.count(ScoreCategory::Birdie), 0);
    }

    #[test]
    fn provided_counts_used_when_no_strokes_recorded() {
        let mut scores = RoundScores::new("a", 1, Course::Lake, [None; 18]);
        let provided = CategoryCounts {
            birdies: 2,
            pars: 14,
            bogeys: 2,
            ..Default::default()
        };
        scores.provided_counts = Some(provided);
        let snapshot = Snapshot::new(flat_pars(), vec![scores]).unwrap();
        assert!(snapshot.warnings().is_empty());
        assert_eq!(snapshot.rounds()[0].counts(snapshot.pars()), provided);
    }

    #[test]
    fn players_keep_first_seen_order() {
        let rounds = vec![
            round("b", 1, Course::Lake, 4),
            round("a", 1, Course::Ocean, 4),
            round("b", 2, Course::Ocean, 4),
        ];
        let snapshot = Snapshot::new(flat_pars(), rounds).unwrap();
        assert_eq!(snapshot.players(), vec!["b", "a"]);
    }
}
