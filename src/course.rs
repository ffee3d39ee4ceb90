use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const HOLES_PER_ROUND: u8 = 18;
pub const ROUNDS: u8 = 2;

/// The two courses the championship is played over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Course {
    Lake,
    Ocean,
}

impl Course {
    pub const ALL: [Course; 2] = [Course::Lake, Course::Ocean];

    pub fn parse(name: &str) -> Result<Self, Error> {
        match name.trim() {
            n if n.eq_ignore_ascii_case("lake") => Ok(Course::Lake),
            n if n.eq_ignore_ascii_case("ocean") => Ok(Course::Ocean),
            other => Err(Error::UnknownCourse(other.to_string())),
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Course::Lake => write!(f, "Lake"),
            Course::Ocean => write!(f, "Ocean"),
        }
    }
}

/// Front (holes 1-9) or back (holes 10-18) side of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nine {
    Front,
    Back,
}

impl Nine {
    pub const ALL: [Nine; 2] = [Nine::Front, Nine::Back];

    pub const fn holes(self) -> RangeInclusive<u8> {
        match self {
            Nine::Front => 1..=9,
            Nine::Back => 10..=18,
        }
    }

    pub fn parse(name: &str) -> Result<Self, Error> {
        match name.trim() {
            n if n.eq_ignore_ascii_case("front") => Ok(Nine::Front),
            n if n.eq_ignore_ascii_case("back") => Ok(Nine::Back),
            other => Err(Error::UnknownNine(other.to_string())),
        }
    }
}

impl fmt::Display for Nine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nine::Front => write!(f, "Front"),
            Nine::Back => write!(f, "Back"),
        }
    }
}

/// Official par for one (course, hole) pair. Immutable reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HolePar {
    pub course: Course,
    pub hole: u8,
    pub par: u8,
}

/// Validated par table for both courses, keyed by (course, hole).
#[derive(Debug, Clone, Default)]
pub struct CoursePars {
    pars: Vec<HolePar>,
}

impl CoursePars {
    pub fn from_records(mut records: Vec<HolePar>) -> Result<Self, Error> {
        for record in &records {
            if !(1..=HOLES_PER_ROUND).contains(&record.hole) {
                return Err(Error::HoleOutOfRange(record.hole));
            }
            if !(3..=5).contains(&record.par) {
                return Err(Error::ParOutOfRange {
                    course: record.course,
                    hole: record.hole,
                    par: record.par,
                });
            }
        }
        records.sort_by_key(|record| (record.course, record.hole));
        if let Some(dup) = records
            .windows(2)
            .find(|pair| (pair[0].course, pair[0].hole) == (pair[1].course, pair[1].hole))
        {
            return Err(Error::DuplicateParRecord {
                course: dup[0].course,
                hole: dup[0].hole,
            });
        }
        Ok(Self { pars: records })
    }

    pub fn par(&self, course: Course, hole: u8) -> Option<u8> {
        self.pars
            .iter()
            .find(|record| record.course == course && record.hole == hole)
            .map(|record| record.par)
    }

    /// Total par for a full 18-hole round, or `None` when the layout is incomplete.
    pub fn course_par(&self, course: Course) -> Option<u16> {
        let holes = self
            .pars
            .iter()
            .filter(|record| record.course == course)
            .collect::<Vec<_>>();
        if holes.len() == HOLES_PER_ROUND as usize {
            Some(holes.iter().map(|record| record.par as u16).sum())
        } else {
            None
        }
    }

    pub fn records(&self) -> &[HolePar] {
        &self.pars
    }
}
