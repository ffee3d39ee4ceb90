use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;
use itertools::Itertools;
use log::info;

use crate::course::{Course, CoursePars, HolePar, Nine, HOLES_PER_ROUND};
use crate::error::Error;
use crate::records::{RoundScores, Snapshot};
use crate::score::CategoryCounts;

pub const PARS_FILE: &str = "course_pars.csv";
pub const SCORES_FILE: &str = "round_scores.csv";

const COUNT_COLUMNS: [&str; 5] = ["EAGLES", "BIRDIES", "PARS", "BOGEYS", "DOUBLES_PLUS"];

/// Case-insensitive header lookup so exports with either casing load as-is.
struct Header {
    columns: Vec<String>,
}

impl Header {
    fn new(record: &StringRecord) -> Self {
        Self {
            columns: record
                .iter()
                .map(|column| column.trim().to_ascii_uppercase())
                .collect_vec(),
        }
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    fn required(&self, name: &str) -> Result<usize, Error> {
        self.optional(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }
}

fn cell<'r>(record: &'r StringRecord, index: usize) -> &'r str {
    record.get(index).unwrap_or("").trim()
}

fn parse_cell<T: FromStr>(column: &str, value: &str) -> Result<T, Error> {
    value.parse().map_err(|_| Error::InvalidValue {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Parse the par table from `COURSE,HOLE,PAR` rows.
pub fn read_pars(reader: impl io::Read) -> Result<CoursePars, Error> {
    let mut csv = csv::Reader::from_reader(reader);
    let header = Header::new(csv.headers()?);
    let course = header.required("COURSE")?;
    let hole = header.required("HOLE")?;
    let par = header.required("PAR")?;

    let mut records = vec![];
    for row in csv.records() {
        let row = row?;
        records.push(HolePar {
            course: Course::parse(cell(&row, course))?,
            hole: parse_cell("HOLE", cell(&row, hole))?,
            par: parse_cell("PAR", cell(&row, par))?,
        });
    }
    CoursePars::from_records(records)
}

/// Parse scorecards from `PLAYER,ROUND,COURSE[,START],HOLE_1..HOLE_18` rows.
/// Blank hole cells stay unplayed. Pre-aggregated category columns
/// (`EAGLES,BIRDIES,PARS,BOGEYS,DOUBLES_PLUS`) are picked up when the file
/// carries all five.
pub fn read_scores(reader: impl io::Read) -> Result<Vec<RoundScores>, Error> {
    let mut csv = csv::Reader::from_reader(reader);
    let header = Header::new(csv.headers()?);
    let player = header.required("PLAYER")?;
    let round = header.required("ROUND")?;
    let course = header.required("COURSE")?;
    let start = header.optional("START");
    let holes: Vec<usize> = (1..=HOLES_PER_ROUND)
        .map(|hole| header.required(&format!("HOLE_{hole}")))
        .try_collect()?;
    let counts: Option<Vec<usize>> = COUNT_COLUMNS
        .iter()
        .map(|column| header.optional(column))
        .collect();

    let mut rounds = vec![];
    for row in csv.records() {
        let row = row?;
        let mut strokes = [None; HOLES_PER_ROUND as usize];
        for (slot, &index) in strokes.iter_mut().zip(&holes) {
            let value = cell(&row, index);
            if !value.is_empty() {
                *slot = Some(parse_cell(&header.columns[index], value)?);
            }
        }

        let mut scores = RoundScores::new(
            cell(&row, player),
            parse_cell("ROUND", cell(&row, round))?,
            Course::parse(cell(&row, course))?,
            strokes,
        );
        if let Some(index) = start {
            let value = cell(&row, index);
            if !value.is_empty() {
                scores.start_nine = Some(Nine::parse(value)?);
            }
        }
        if let Some(indices) = &counts {
            scores.provided_counts = read_counts(&row, indices)?;
        }
        rounds.push(scores);
    }
    Ok(rounds)
}

/// `Some` only when the row fills every category cell; a partially filled
/// group cannot be checked against reclassification and is ignored.
fn read_counts(row: &StringRecord, indices: &[usize]) -> Result<Option<CategoryCounts>, Error> {
    if indices.iter().any(|&index| cell(row, index).is_empty()) {
        return Ok(None);
    }
    let values: Vec<u16> = indices
        .iter()
        .zip(COUNT_COLUMNS)
        .map(|(&index, column)| parse_cell(column, cell(row, index)))
        .try_collect()?;
    Ok(Some(CategoryCounts {
        eagles: values[0],
        birdies: values[1],
        pars: values[2],
        bogeys: values[3],
        doubles_plus: values[4],
    }))
}

/// Load a full snapshot from `course_pars.csv` and `round_scores.csv` in one
/// directory.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Snapshot, Error> {
    let dir = dir.as_ref();
    let pars = read_pars(File::open(dir.join(PARS_FILE))?)?;
    let rounds = read_scores(File::open(dir.join(SCORES_FILE))?)?;
    info!(
        "loaded {} par records and {} rounds from {}",
        pars.records().len(),
        rounds.len(),
        dir.display()
    );
    Snapshot::new(pars, rounds)
}

#[cfg(test)]
mod test {
    use super::*;

    fn pars_csv() -> String {
        let mut csv = String::from("COURSE,HOLE,PAR\n");
        for course in ["Lake", "Ocean"] {
            for hole in 1..=18 {
                csv.push_str(&format!("{course},{hole},4\n"));
            }
        }
        csv
    }

    fn scores_header(extra: &str) -> String {
        let holes = (1..=18).map(|hole| format!("HOLE_{hole}")).join(",");
        format!("PLAYER,ROUND,COURSE,START,{holes}{extra}\n")
    }

    #[test]
    fn pars_parse_and_validate() {
        let pars = read_pars(pars_csv().as_bytes()).unwrap();
        assert_eq!(pars.par(Course::Lake, 7), Some(4));
        assert_eq!(pars.course_par(Course::Ocean), Some(72));
    }

    #[test]
    fn missing_column_is_fatal() {
        let result = read_pars("COURSE,HOLE\nLake,1\n".as_bytes());
        assert!(matches!(result, Err(Error::MissingColumn(col)) if col == "PAR"));
    }

    #[test]
    fn bad_par_value_names_the_column() {
        let result = read_pars("COURSE,HOLE,PAR\nLake,1,four\n".as_bytes());
        assert!(
            matches!(result, Err(Error::InvalidValue { column, value }) if column == "PAR" && value == "four")
        );
    }

    #[test]
    fn scores_with_blanks_and_start_nine() {
        let mut csv = scores_header("");
        csv.push_str(&format!("Alice,1,Lake,front,{}\n", vec!["4"; 18].join(",")));
        let mut holes = vec!["5"; 18];
        holes[10] = "";
        csv.push_str(&format!("Bob,2,ocean,,{}\n", holes.join(",")));

        let rounds = read_scores(csv.as_bytes()).unwrap();
        assert_eq!(rounds.len(), 2);

        let alice = &rounds[0];
        assert_eq!(alice.player, "Alice");
        assert_eq!(alice.start_nine, Some(Nine::Front));
        assert_eq!(alice.total(), Some(72));

        let bob = &rounds[1];
        assert_eq!(bob.course, Course::Ocean);
        assert_eq!(bob.start_nine, None);
        assert_eq!(bob.strokes_on(11), None);
        assert_eq!(bob.total(), None);
        assert_eq!(bob.holes_played(), 17);
    }

    #[test]
    fn category_columns_are_picked_up_when_complete() {
        let mut csv = scores_header(",EAGLES,BIRDIES,PARS,BOGEYS,DOUBLES_PLUS");
        csv.push_str(&format!(
            "Alice,1,Lake,,{},0,2,14,2,0\n",
            vec!["4"; 18].join(",")
        ));
        csv.push_str(&format!("Bob,1,Ocean,,{},,,,,\n", vec!["4"; 18].join(",")));

        let rounds = read_scores(csv.as_bytes()).unwrap();
        let counts = rounds[0].provided_counts.unwrap();
        assert_eq!(counts.birdies, 2);
        assert_eq!(counts.total(), 18);
        assert_eq!(rounds[1].provided_counts, None);
    }

    #[test]
    fn unknown_course_rejected() {
        let mut csv = scores_header("");
        csv.push_str(&format!("Alice,1,Links,,{}\n", vec!["4"; 18].join(",")));
        assert!(matches!(
            read_scores(csv.as_bytes()),
            Err(Error::UnknownCourse(name)) if name == "Links"
        ));
    }

    #[test]
    fn headers_match_case_insensitively() {
        let csv = "course,hole,par\nLake,1,4\n";
        let pars = read_pars(csv.as_bytes()).unwrap();
        assert_eq!(pars.par(Course::Lake, 1), Some(4));
    }
}
