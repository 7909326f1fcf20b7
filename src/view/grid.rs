use serde::Serialize;

use crate::sim::{ConfusionMatrix, LABELS, NUM_CLASSES};

/// Heatmap-ready confusion matrix: rows are true labels, columns predicted labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridView {
    pub row_labels: [usize; NUM_CLASSES],
    pub col_labels: [usize; NUM_CLASSES],
    pub cells: [[u32; NUM_CLASSES]; NUM_CLASSES],
}

pub fn to_grid_view(matrix: &ConfusionMatrix) -> GridView {
    GridView {
        row_labels: LABELS,
        col_labels: LABELS,
        cells: matrix.counts,
    }
}

impl GridView {
    /// Cell intensity in [0, 1] relative to the largest cell.
    pub fn intensity(&self, row: usize, col: usize) -> f64 {
        let max = ConfusionMatrix { counts: self.cells }.max_cell();
        if max == 0 {
            return 0.0;
        }
        self.cells[row][col] as f64 / max as f64
    }

    /// Renders the grid as an HTML table with per-cell counts and heat shading.
    pub fn to_html(&self) -> String {
        let header: String = self
            .col_labels
            .iter()
            .map(|c| format!("<th>P:{c}</th>"))
            .collect();
        let rows: String = self
            .cells
            .iter()
            .enumerate()
            .map(|(r, row)| {
                let cells: String = row
                    .iter()
                    .enumerate()
                    .map(|(c, &v)| {
                        format!(
                            "<td style=\"background:{}\">{}</td>",
                            viridis(self.intensity(r, c)),
                            v
                        )
                    })
                    .collect();
                format!("<tr><th>T:{}</th>{}</tr>", self.row_labels[r], cells)
            })
            .collect();
        format!(
            "<table class=\"conf-matrix\">\n  <thead><tr><th></th>{header}</tr></thead>\n  <tbody>{rows}</tbody>\n</table>"
        )
    }
}

/// Coarse five-stop approximation of the Viridis scale.
fn viridis(t: f64) -> &'static str {
    const STOPS: [&str; 5] = ["#440154", "#3b528b", "#21918c", "#5ec962", "#fde725"];
    let idx = (t.clamp(0.0, 1.0) * (STOPS.len() - 1) as f64).round() as usize;
    STOPS[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_keeps_cells_and_labels() {
        let m = ConfusionMatrix { counts: [[5, 1, 0], [2, 8, 3], [0, 0, 11]] };
        let g = to_grid_view(&m);
        assert_eq!(g.cells, m.counts);
        assert_eq!(g.row_labels, [0, 1, 2]);
        assert_eq!(g.col_labels, [0, 1, 2]);
    }

    #[test]
    fn test_intensity_scales_to_max() {
        let g = to_grid_view(&ConfusionMatrix { counts: [[10, 5, 0], [0, 0, 0], [0, 0, 0]] });
        assert_eq!(g.intensity(0, 0), 1.0);
        assert_eq!(g.intensity(0, 1), 0.5);
        assert_eq!(g.intensity(2, 2), 0.0);
        assert_eq!(to_grid_view(&ConfusionMatrix::default()).intensity(1, 1), 0.0);
    }

    #[test]
    fn test_html_annotates_every_cell() {
        let g = to_grid_view(&ConfusionMatrix { counts: [[1, 2, 3], [4, 5, 6], [7, 8, 9]] });
        let html = g.to_html();
        assert_eq!(html.matches("<td ").count(), 9);
        assert!(html.contains(">9</td>"));
        assert!(html.contains("<th>T:2</th>"));
    }
}
