//! Stroke-play analytics for a two-round qualifying championship played over
//! two courses. A validated [`records::Snapshot`] is the single source of
//! truth; everything else (scoring classification, the cut line, hole and
//! stretch difficulty, player summaries, field reports) is a pure derivation
//! over it.

pub mod course;
pub mod cut;
pub mod error;
pub mod field;
pub mod holes;
pub mod loader;
pub mod rank;
pub mod records;
pub mod report;
pub mod score;
pub mod stretch;
pub mod summary;

pub use course::{Course, Nine};
pub use cut::CutLine;
pub use error::{DataWarning, Error};
pub use records::{RoundScores, Snapshot};
pub use score::{CategoryCounts, ScoreCategory};
pub use summary::PlayerSummary;
