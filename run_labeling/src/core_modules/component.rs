// THEORY:
// A `Component` is the summary of one final label: which cells carry it, the
// rectangle enclosing them, how many there are, and where their centroid sits.
// It is what a caller usually wants once the convergence driver has settled,
// instead of walking the label grid again itself.
//
// Like the grids, `Component` is a plain data container. Building the list is a
// single row-major pass over a finished `LabelGrid`; components come back sorted
// by label so the order is stable between runs.

use crate::core_modules::grid::{Label, LabelGrid};
use std::collections::BTreeMap;

/// A grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

/// One connected region of a final labeling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    pub label: Label,
    /// Top-left and bottom-right corners, inclusive.
    pub bounding_box: (Point, Point),
    /// Every cell carrying `label`, in row-major order.
    pub cells: Vec<Point>,
    /// Unweighted mean position as `(row, col)`.
    pub centroid: (f64, f64),
}

impl Component {
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    fn from_cells(label: Label, cells: Vec<Point>) -> Self {
        let mut min = Point {
            row: usize::MAX,
            col: usize::MAX,
        };
        let mut max = Point { row: 0, col: 0 };
        let mut sum_row = 0.0;
        let mut sum_col = 0.0;

        for point in &cells {
            min.row = min.row.min(point.row);
            min.col = min.col.min(point.col);
            max.row = max.row.max(point.row);
            max.col = max.col.max(point.col);
            sum_row += point.row as f64;
            sum_col += point.col as f64;
        }

        let count = cells.len() as f64;
        Self {
            label,
            bounding_box: (min, max),
            cells,
            centroid: (sum_row / count, sum_col / count),
        }
    }
}

/// Groups the nonzero cells of `grid` by label.
pub fn components(grid: &LabelGrid) -> Vec<Component> {
    let mut by_label: BTreeMap<Label, Vec<Point>> = BTreeMap::new();
    for (row, col, label) in grid.cells() {
        if label != 0 {
            by_label.entry(label).or_default().push(Point { row, col });
        }
    }

    by_label
        .into_iter()
        .map(|(label, cells)| Component::from_cells(label, cells))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarises_each_label() {
        let grid = LabelGrid::from_rows(vec![vec![2, 2, 0], vec![0, 2, 0], vec![5, 0, 0]]);
        let found = components(&grid);

        assert_eq!(found.len(), 2);
        let first = &found[0];
        assert_eq!(first.label, 2);
        assert_eq!(first.size(), 3);
        assert_eq!(
            first.bounding_box,
            (Point { row: 0, col: 0 }, Point { row: 1, col: 1 })
        );
        assert!((first.centroid.0 - 1.0 / 3.0).abs() < 1e-12);
        assert!((first.centroid.1 - 2.0 / 3.0).abs() < 1e-12);

        assert_eq!(found[1].label, 5);
        assert_eq!(found[1].cells, vec![Point { row: 2, col: 0 }]);
    }

    #[test]
    fn empty_grid_has_no_components() {
        assert!(components(&LabelGrid::from_rows(vec![vec![0, 0]])).is_empty());
    }
}
