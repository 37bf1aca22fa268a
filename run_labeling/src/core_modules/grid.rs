// THEORY:
// The `grid` module holds the two "dumb" data containers the labeling engine
// passes between its stages: the `BinaryGrid` a caller supplies, and the
// `LabelGrid` every stage produces. Neither knows anything about runs,
// equivalences or convergence.
//
// Key architectural principles:
// 1.  **Row-Major Ownership**: Both grids own their rows as `Vec<Vec<_>>`. Each
//     stage reads one grid and builds a fresh one, so earlier iterations are never
//     disturbed by later ones and no deep-copy helper is needed.
// 2.  **Ragged Tolerance**: Rows are not forced to share a length. The algorithm
//     assumes a rectangle, but a ragged grid degrades gracefully: any position
//     that does not exist simply reads as "absent" through `LabelGrid::neighbor`.
// 3.  **Validation at the Edge**: `BinaryGrid::new` is the place where non-binary
//     cells are rejected. Once a `BinaryGrid` exists the rest of the engine can
//     treat it as trusted.

use crate::error::{LabelingError, Result};
use image::GrayImage;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A component label. `0` means "off"; any positive value names a component.
pub type Label = u64;

/// The value stored in a binary grid cell (`0` or `1`).
pub type Cell = u8;

/// A caller-supplied grid of on/off cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryGrid {
    rows: Vec<Vec<Cell>>,
}

impl BinaryGrid {
    /// Builds a grid, rejecting any cell that is not `0` or `1`.
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self> {
        for (row, cells) in rows.iter().enumerate() {
            if let Some((col, &value)) = cells.iter().enumerate().find(|&(_, &v)| v > 1) {
                return Err(LabelingError::NonBinaryCell { row, col, value });
            }
        }
        Ok(Self { rows })
    }

    /// Builds a grid without checking cell values.
    ///
    /// The run labeler accepts anything, but only `0`/`1` input has defined labeling semantics.
    pub fn from_rows_unchecked(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn from_bools(rows: &[Vec<bool>]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&on| Cell::from(on)).collect())
                .collect(),
        }
    }

    /// Thresholds a grayscale image: pixels at or above `threshold` are "on".
    pub fn from_luma(image: &GrayImage, threshold: u8) -> Self {
        let rows = image
            .rows()
            .map(|row| row.map(|pixel| Cell::from(pixel.0[0] >= threshold)).collect())
            .collect();
        Self { rows }
    }

    /// An all-off grid of the given size.
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            rows: vec![vec![0; width]; height],
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of "on" cells.
    pub fn on_cells(&self) -> usize {
        self.rows.iter().flatten().filter(|&&cell| cell != 0).count()
    }
}

/// Parses one row per line. `0` or `.` is off, `1` or `#` is on; whitespace
/// between cells and blank lines are ignored.
impl FromStr for BinaryGrid {
    type Err = LabelingError;

    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .enumerate()
                    .map(|(col, c)| match c {
                        '0' | '.' => Ok(0),
                        '1' | '#' => Ok(1),
                        found => Err(LabelingError::UnexpectedCharacter { row, col, found }),
                    })
                    .collect::<Result<Vec<Cell>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }
}

/// A grid of labels with the same shape as the `BinaryGrid` it came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelGrid {
    rows: Vec<Vec<Label>>,
}

impl LabelGrid {
    pub fn from_rows(rows: Vec<Vec<Label>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Label>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Label> {
        self.rows.get(row)?.get(col).copied()
    }

    /// Reads the cell at `(row + d_row, col + d_col)`.
    /// Anything outside the grid, including past the end of a short row, is `None`.
    pub fn neighbor(&self, row: usize, col: usize, d_row: isize, d_col: isize) -> Option<Label> {
        let n_row = row.checked_add_signed(d_row)?;
        let n_col = col.checked_add_signed(d_col)?;
        self.get(n_row, n_col)
    }

    /// Iterates `(row, col, label)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Label)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &label)| (row, col, label))
        })
    }

    /// The largest label present, or `0` for a grid with no "on" cells.
    pub fn max_label(&self) -> Label {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Every nonzero label present, ascending.
    pub fn distinct_labels(&self) -> BTreeSet<Label> {
        self.rows
            .iter()
            .flatten()
            .copied()
            .filter(|&label| label != 0)
            .collect()
    }

    /// Builds a new grid by passing every cell through `f`. The receiver is left untouched.
    pub fn try_map<F>(&self, mut f: F) -> Result<LabelGrid>
    where
        F: FnMut(Label) -> Result<Label>,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(|&label| f(label)).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;
        Ok(LabelGrid { rows })
    }
}

impl fmt::Display for LabelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_label().to_string().len();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, label) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{label:>width$}")?;
            }
        }
        Ok(())
    }
}
