// THEORY:
// The `equivalence_scanner` discovers which labels in a `LabelGrid` touch each
// other. It visits cells in row-major order and compares each one only against
// the causal neighbors named by a `NeighborMask`, i.e. cells that were already
// visited. Every adjacency between two different nonzero labels is a candidate
// edge `current -> neighbor`.
//
// Candidates are filtered by `EquivalenceMap::commit`: a neighbor that already
// redirects elsewhere cannot become a target, and a label keeps only the first
// edge it was given. This keeps every chain single-hop-per-scan, which is what
// the chain resolver expects. Merges that need more than one hop are left for
// the next scan.
//
// Scan order is part of the contract: rows top to bottom, columns left to
// right, offsets in mask order. It decides which candidate wins when several
// compete for the same source label.

use crate::core_modules::equivalence::{EquivalenceMap, NeighborMask};
use crate::core_modules::grid::LabelGrid;
use tracing::trace;

pub mod equivalence_scanner {
    use super::*;

    /// Collects the equivalence edges of one full scan. An empty map means no merges are left.
    pub fn scan(grid: &LabelGrid, mask: NeighborMask) -> EquivalenceMap {
        let mut map = EquivalenceMap::new();

        for (row, col, label) in grid.cells() {
            if label == 0 {
                continue;
            }
            for &(d_row, d_col) in mask.offsets() {
                let Some(neighbor) = grid.neighbor(row, col, d_row, d_col) else {
                    continue;
                };
                if neighbor == 0 || neighbor == label {
                    continue;
                }
                if map.commit(label, neighbor) {
                    trace!(row, col, source = label, target = neighbor, "equivalence edge");
                }
            }
        }

        map
    }
}
