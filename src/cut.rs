use itertools::Itertools;
use serde::Serialize;

/// Number of players that advance to match play, before ties are added.
pub const CUT_SIZE: usize = 64;

/// The score threshold separating players who advance from those eliminated
/// after round 2. Everyone at or under the threshold advances, so ties at the
/// line can push `advancing_count` past [`CUT_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CutLine {
    pub threshold_score: u16,
    pub advancing_count: usize,
}

impl CutLine {
    /// Resolve the cut from every defined 36-hole total. Players without a
    /// total are not candidates (they are excluded, not assumed eliminated).
    /// With fewer than [`CUT_SIZE`] candidates the threshold degenerates to
    /// the highest total present and the whole field advances.
    pub fn resolve(totals: impl IntoIterator<Item = u16>) -> Option<Self> {
        let sorted = totals.into_iter().sorted_unstable().collect_vec();
        let threshold_score = *sorted.get(CUT_SIZE - 1).or(sorted.last())?;
        let advancing_count = sorted
            .iter()
            .take_while(|&&total| total <= threshold_score)
            .count();
        Some(Self {
            threshold_score,
            advancing_count,
        })
    }

    pub fn makes_cut(&self, total: u16) -> bool {
        total <= self.threshold_score
    }

    /// Signed distance to the line: negative = inside the cut by that many
    /// strokes, positive = missed by that many.
    pub fn margin(&self, total: u16) -> i16 {
        total as i16 - self.threshold_score as i16
    }
}
