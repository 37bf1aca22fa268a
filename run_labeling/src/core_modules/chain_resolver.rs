// THEORY:
// The `chain_resolver` turns a label into its canonical label for one scan's
// `EquivalenceMap`: it follows `source -> target` edges until it reaches a label
// with no outgoing edge. A label with no edge at all is already canonical and
// comes back unchanged.
//
// The walk is iterative and bounded. An acyclic chain can visit every edge of
// the map at most once, so a walk that takes more hops than the map has edges is
// going round a cycle. That is reported as `LabelingError::EquivalenceCycle`
// rather than looped on. The scanner's commit rule never produces cycles, so
// hitting this means the map was built by something else or the scanner is
// broken.

use crate::core_modules::equivalence::EquivalenceMap;
use crate::core_modules::grid::{Label, LabelGrid};
use crate::error::{LabelingError, Result};
use std::collections::HashMap;
use tracing::warn;

pub mod chain_resolver {
    use super::*;

    /// Follows equivalence edges from `label` to the terminal label.
    pub fn resolve(map: &EquivalenceMap, label: Label) -> Result<Label> {
        let mut current = label;
        let mut hops = 0;
        while let Some(next) = map.get(current) {
            hops += 1;
            if hops > map.len() {
                warn!(label, hops, edges = map.len(), "equivalence chain does not terminate");
                return Err(LabelingError::EquivalenceCycle { label, hops });
            }
            current = next;
        }
        Ok(current)
    }

    /// Rewrites every cell of `grid` to its canonical label, returning a new grid.
    pub fn resolve_grid(map: &EquivalenceMap, grid: &LabelGrid) -> Result<LabelGrid> {
        if map.is_empty() {
            return Ok(grid.clone());
        }

        let mut canonical: HashMap<Label, Label> = HashMap::new();
        grid.try_map(|label| {
            if label == 0 {
                return Ok(0);
            }
            if let Some(&resolved) = canonical.get(&label) {
                return Ok(resolved);
            }
            let resolved = resolve(map, label)?;
            canonical.insert(label, resolved);
            Ok(resolved)
        })
    }
}
