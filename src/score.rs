use std::ops::{Add, AddAssign};

use serde::Serialize;

/// Result of one hole relative to its par, ordered best to worst for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ScoreCategory {
    EagleOrBetter,
    Birdie,
    Par,
    Bogey,
    DoubleOrWorse,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 5] = [
        ScoreCategory::EagleOrBetter,
        ScoreCategory::Birdie,
        ScoreCategory::Par,
        ScoreCategory::Bogey,
        ScoreCategory::DoubleOrWorse,
    ];

    pub const fn new(strokes: u8, par: u8) -> Self {
        let diff = strokes as i8 - par as i8;
        match diff {
            ..=-2 => Self::EagleOrBetter,
            -1 => Self::Birdie,
            0 => Self::Par,
            1 => Self::Bogey,
            2.. => Self::DoubleOrWorse,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::EagleOrBetter => "Eagle or better",
            Self::Birdie => "Birdie",
            Self::Par => "Par",
            Self::Bogey => "Bogey",
            Self::DoubleOrWorse => "Double or worse",
        }
    }
}

/// Classify a hole that may not have been played. Unplayed holes are excluded
/// from every count and rate, never treated as zero strokes.
pub const fn classify(strokes: Option<u8>, par: u8) -> Option<ScoreCategory> {
    match strokes {
        Some(strokes) => Some(ScoreCategory::new(strokes, par)),
        None => None,
    }
}

/// Per-category tallies for some set of classified holes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub eagles: u16,
    pub birdies: u16,
    pub pars: u16,
    pub bogeys: u16,
    pub doubles_plus: u16,
}

impl CategoryCounts {
    pub fn record(&mut self, category: ScoreCategory) {
        match category {
            ScoreCategory::EagleOrBetter => self.eagles += 1,
            ScoreCategory::Birdie => self.birdies += 1,
            ScoreCategory::Par => self.pars += 1,
            ScoreCategory::Bogey => self.bogeys += 1,
            ScoreCategory::DoubleOrWorse => self.doubles_plus += 1,
        }
    }

    /// Tally every played hole in `scores`, given as (strokes, par) pairs.
    pub fn from_scores(scores: impl IntoIterator<Item = (Option<u8>, u8)>) -> Self {
        let mut counts = Self::default();
        for (strokes, par) in scores {
            if let Some(category) = classify(strokes, par) {
                counts.record(category);
            }
        }
        counts
    }

    pub fn count(&self, category: ScoreCategory) -> u16 {
        match category {
            ScoreCategory::EagleOrBetter => self.eagles,
            ScoreCategory::Birdie => self.birdies,
            ScoreCategory::Par => self.pars,
            ScoreCategory::Bogey => self.bogeys,
            ScoreCategory::DoubleOrWorse => self.doubles_plus,
        }
    }

    /// Number of classified (played) holes behind these counts.
    pub fn total(&self) -> u16 {
        self.eagles + self.birdies + self.pars + self.bogeys + self.doubles_plus
    }

    pub fn birdie_or_better(&self) -> u16 {
        self.eagles + self.birdies
    }

    pub fn bogey_or_worse(&self) -> u16 {
        self.bogeys + self.doubles_plus
    }
}

impl Add for CategoryCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            eagles: self.eagles + rhs.eagles,
            birdies: self.birdies + rhs.birdies,
            pars: self.pars + rhs.pars,
            bogeys: self.bogeys + rhs.bogeys,
            doubles_plus: self.doubles_plus + rhs.doubles_plus,
        }
    }
}

impl AddAssign for CategoryCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
