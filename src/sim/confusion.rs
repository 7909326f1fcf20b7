use serde::{Deserialize, Serialize};

/// Number of synthetic class labels.
pub const NUM_CLASSES: usize = 3;

/// Class labels in row/column order.
pub const LABELS: [usize; NUM_CLASSES] = [0, 1, 2];

/// Sample count used for the end-of-run evaluation.
pub const DEFAULT_EVAL_SAMPLES: usize = 100;

/// A 3×3 grid of true-vs-predicted label counts.
///
/// `counts[t][p]` is the number of samples whose true label is `t` and whose predicted
/// label is `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub counts: [[u32; NUM_CLASSES]; NUM_CLASSES],
}

impl ConfusionMatrix {
    /// Builds a matrix from `(true, predicted)` label pairs.
    ///
    /// Pairs with a label outside `0..NUM_CLASSES` are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut matrix = ConfusionMatrix::default();
        for (truth, predicted) in pairs {
            if truth < NUM_CLASSES && predicted < NUM_CLASSES {
                matrix.counts[truth][predicted] += 1;
            }
        }
        matrix
    }

    /// Sum of all cells.
    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal, i.e. samples whose prediction matched.
    pub fn correct(&self) -> u32 {
        (0..NUM_CLASSES).map(|i| self.counts[i][i]).sum()
    }

    /// Largest single cell, used to scale heatmap colours.
    pub fn max_cell(&self) -> u32 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_counts_cells() {
        let m = ConfusionMatrix::from_pairs([(0, 0), (0, 1), (2, 2), (2, 2), (1, 0)]);
        assert_eq!(m.counts, [[1, 1, 0], [1, 0, 0], [0, 0, 2]]);
        assert_eq!(m.total(), 5);
        assert_eq!(m.correct(), 3);
        assert_eq!(m.max_cell(), 2);
    }

    #[test]
    fn test_from_pairs_skips_unknown_labels() {
        let m = ConfusionMatrix::from_pairs([(3, 0), (0, 7), (1, 1)]);
        assert_eq!(m.total(), 1);
    }
}
