//! Shared test utilities for run_labeling tests.
//!
//! Provides a plain flood-fill labeling to compare the engine's output against,
//! and a partition check that ignores the actual label numbers.

#![allow(dead_code)] // Not all test files use all helpers

use run_labeling::{BinaryGrid, LabelGrid};
use std::collections::HashMap;

pub const FOUR_NEIGHBORS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const EIGHT_NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn cell(rows: &[Vec<u8>], row: usize, col: usize, d_row: isize, d_col: isize) -> Option<(usize, usize)> {
    let n_row = row.checked_add_signed(d_row)?;
    let n_col = col.checked_add_signed(d_col)?;
    rows.get(n_row)?.get(n_col)?;
    Some((n_row, n_col))
}

/// Reference component ids (1-based, 0 for off) found by an explicit-stack flood fill.
pub fn flood_fill(grid: &BinaryGrid, neighbors: &[(isize, isize)]) -> Vec<Vec<usize>> {
    let rows = grid.rows();
    let mut ids: Vec<Vec<usize>> = rows.iter().map(|row| vec![0; row.len()]).collect();
    let mut next_id = 0;

    for (row, cells) in rows.iter().enumerate() {
        for (col, &value) in cells.iter().enumerate() {
            if value == 0 || ids[row][col] != 0 {
                continue;
            }
            next_id += 1;
            ids[row][col] = next_id;
            let mut stack = vec![(row, col)];
            while let Some((r, c)) = stack.pop() {
                for &(dr, dc) in neighbors {
                    if let Some((nr, nc)) = cell(rows, r, c, dr, dc) {
                        if rows[nr][nc] != 0 && ids[nr][nc] == 0 {
                            ids[nr][nc] = next_id;
                            stack.push((nr, nc));
                        }
                    }
                }
            }
        }
    }

    ids
}

/// Checks that `labels` and `reference` split the "on" cells into the same groups,
/// and that "off" cells are exactly the zero cells.
pub fn same_partition(labels: &LabelGrid, reference: &[Vec<usize>]) -> Result<(), String> {
    let mut forward: HashMap<u64, usize> = HashMap::new();
    let mut backward: HashMap<usize, u64> = HashMap::new();

    for (row, col, label) in labels.cells() {
        let id = reference
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .ok_or_else(|| format!("label grid has extra cell ({row}, {col})"))?;
        if (label == 0) != (id == 0) {
            return Err(format!("cell ({row}, {col}): label {label}, reference {id}"));
        }
        if label == 0 {
            continue;
        }
        if *forward.entry(label).or_insert(id) != id {
            return Err(format!("label {label} spans two reference components"));
        }
        if *backward.entry(id).or_insert(label) != label {
            return Err(format!("reference component {id} split across labels"));
        }
    }

    Ok(())
}
