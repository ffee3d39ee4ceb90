use crate::course::Course;

/// Fatal input-validation failures. Everything downstream of a valid
/// [`Snapshot`](crate::records::Snapshot) is a pure computation and cannot fail.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unknown course: \"{0}\"")]
    UnknownCourse(String),
    #[error("unknown starting nine: \"{0}\"")]
    UnknownNine(String),
    #[error("hole {0} is outside 1..=18")]
    HoleOutOfRange(u8),
    #[error("round {round} for player \"{player}\" is outside 1..=2")]
    RoundOutOfRange { player: String, round: u8 },
    #[error("par {par} on {course} hole {hole} is outside 3..=5")]
    ParOutOfRange { course: Course, hole: u8, par: u8 },
    #[error("duplicate par record for {course} hole {hole}")]
    DuplicateParRecord { course: Course, hole: u8 },
    #[error("duplicate round {round} for player \"{player}\"")]
    DuplicateRound { player: String, round: u8 },
    #[error("missing column \"{0}\"")]
    MissingColumn(String),
    #[error("invalid value \"{value}\" in column {column}")]
    InvalidValue { column: String, value: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Recoverable data-integrity conditions. Collected on the snapshot and
/// logged; the offending records are excluded from the aggregates they would
/// have fed, never from the whole pass.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DataWarning {
    #[error(
        "no par record for {course} hole {hole}; strokes from \"{player}\" round {round} excluded from hole statistics"
    )]
    MissingParRecord {
        course: Course,
        hole: u8,
        player: String,
        round: u8,
    },
    #[error(
        "pre-aggregated category counts for \"{player}\" round {round} disagree with reclassified per-hole scores"
    )]
    CategoryCountMismatch { player: String, round: u8 },
}
