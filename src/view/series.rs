use serde::{Deserialize, Serialize};

use crate::sim::MetricPoint;

/// Which per-step metric to read from a [`MetricPoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Loss,
    Accuracy,
}

impl Field {
    pub fn read(self, point: &MetricPoint) -> f64 {
        match self {
            Field::Loss => point.loss,
            Field::Accuracy => point.accuracy,
        }
    }
}

/// Projects points onto `(step, value)` pairs in insertion order.
pub fn to_series(points: &[MetricPoint], field: Field) -> Vec<(usize, f64)> {
    points.iter().map(|p| (p.step, field.read(p))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_series() {
        let points = [
            MetricPoint { step: 0, loss: 0.9, accuracy: 0.1 },
            MetricPoint { step: 1, loss: 0.5, accuracy: 0.3 },
        ];
        assert_eq!(to_series(&points, Field::Loss), vec![(0, 0.9), (1, 0.5)]);
        assert_eq!(to_series(&points, Field::Accuracy), vec![(0, 0.1), (1, 0.3)]);
    }

    #[test]
    fn test_series_keeps_order_and_duplicates() {
        let points = [
            MetricPoint { step: 3, loss: 0.4, accuracy: 0.0 },
            MetricPoint { step: 1, loss: 0.4, accuracy: 0.0 },
            MetricPoint { step: 1, loss: 0.4, accuracy: 0.0 },
        ];
        let steps: Vec<usize> = to_series(&points, Field::Loss).into_iter().map(|(s, _)| s).collect();
        assert_eq!(steps, vec![3, 1, 1]);
    }
}
