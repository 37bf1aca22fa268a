// THEORY:
// The `ConvergenceDriver` is the loop that turns preliminary run labels into
// final component labels. A single scan can only merge labels that touch
// directly through the neighbor mask; merges that need several hops show up
// once earlier merges have made intermediate labels equal. So the driver scans,
// resolves every cell, and feeds the result back in, until a scan finds nothing.
//
// Key architectural principles:
// 1.  **Single Step, Caller-Owned Pacing**: `step` runs exactly one iteration and
//     hands back what it saw. Whoever owns the loop decides how fast to go,
//     whether to render in between, and when to stop. `run_to_fixed_point` is
//     the plain blocking loop; the async `stepper` is the paced one.
// 2.  **Fixed Point as Proof**: An empty equivalence map means no two adjacent
//     "on" cells carry different labels, which is exactly "every component is
//     uniform". The driver never stops for any other reason.
// 3.  **Progress Check Instead of a Cap**: Every edge source vanishes from the
//     grid when resolved, so a non-empty iteration must lower the number of
//     distinct labels. If it does not, something is wrong and the driver returns
//     `NoProgress` rather than spinning or giving up after an arbitrary count.
// 4.  **Last Good State**: The driver only replaces its grid once an iteration
//     has fully succeeded, so an error or an external stop never leaves a
//     half-rewritten grid behind.

use crate::core_modules::chain_resolver::chain_resolver;
use crate::core_modules::equivalence::{EquivalenceMap, NeighborMask};
use crate::core_modules::equivalence_scanner::equivalence_scanner;
use crate::core_modules::grid::{BinaryGrid, Label, LabelGrid};
use crate::core_modules::run_labeler::run_labeler;
use crate::error::{LabelingError, Result};
use tracing::{debug, info, warn};

/// What one scan-and-resolve iteration produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Iteration {
    /// 1-based iteration number.
    pub index: usize,
    /// The grid after resolving every cell through `equivalences`.
    pub grid: LabelGrid,
    /// The edges this iteration's scan committed.
    pub equivalences: EquivalenceMap,
}

impl Iteration {
    /// Number of equivalence edges merged in this iteration.
    pub fn merged(&self) -> usize {
        self.equivalences.len()
    }

    pub fn max_label(&self) -> Label {
        self.grid.max_label()
    }

    /// `true` when the scan found nothing to merge.
    pub fn is_fixed_point(&self) -> bool {
        self.equivalences.is_empty()
    }
}

/// One scan-and-resolve pass over `grid`, without any driver state.
pub fn label_step(grid: &LabelGrid, mask: NeighborMask) -> Result<(LabelGrid, EquivalenceMap)> {
    let equivalences = equivalence_scanner::scan(grid, mask);
    let next = chain_resolver::resolve_grid(&equivalences, grid)?;
    Ok((next, equivalences))
}

fn ensure_progress(
    iteration: usize,
    previous: &LabelGrid,
    next: &LabelGrid,
    equivalences: &EquivalenceMap,
) -> Result<()> {
    if equivalences.is_empty() {
        return Ok(());
    }
    let before = previous.distinct_labels().len();
    let after = next.distinct_labels().len();
    if after >= before {
        warn!(iteration, before, after, merged = equivalences.len(), "iteration merged nothing");
        return Err(LabelingError::NoProgress {
            iteration,
            labels: after,
        });
    }
    Ok(())
}

/// Drives a label grid to its fixed point, one iteration at a time.
#[derive(Debug, Clone)]
pub struct ConvergenceDriver {
    grid: LabelGrid,
    mask: NeighborMask,
    iterations: usize,
    total_merges: usize,
    converged: bool,
}

impl ConvergenceDriver {
    /// Starts from an existing label grid, usually the run labeler's output.
    pub fn new(grid: LabelGrid, mask: NeighborMask) -> Self {
        Self {
            grid,
            mask,
            iterations: 0,
            total_merges: 0,
            converged: false,
        }
    }

    /// Run-labels `grid` and starts from the preliminary labels.
    pub fn from_binary(grid: &BinaryGrid, mask: NeighborMask) -> Self {
        Self::new(run_labeler::label_runs(grid), mask)
    }

    /// The grid produced by the last completed iteration.
    pub fn grid(&self) -> &LabelGrid {
        &self.grid
    }

    pub fn into_grid(self) -> LabelGrid {
        self.grid
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Equivalence edges merged across every iteration so far.
    pub fn total_merges(&self) -> usize {
        self.total_merges
    }

    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Runs one scan-and-resolve iteration.
    ///
    /// On error the driver keeps the grid from the last successful iteration.
    pub fn step(&mut self) -> Result<Iteration> {
        let index = self.iterations + 1;
        let (next, equivalences) = label_step(&self.grid, self.mask)?;
        ensure_progress(index, &self.grid, &next, &equivalences)?;

        self.iterations = index;
        self.total_merges += equivalences.len();
        self.converged = equivalences.is_empty();
        self.grid = next.clone();

        debug!(
            iteration = index,
            merged = equivalences.len(),
            max_label = next.max_label(),
            "labeling iteration"
        );
        if self.converged {
            info!(
                iterations = self.iterations,
                total_merges = self.total_merges,
                components = next.distinct_labels().len(),
                "labeling reached a fixed point"
            );
        }

        Ok(Iteration {
            index,
            grid: next,
            equivalences,
        })
    }

    /// Steps until a fixed point, handing every iteration to `observe`.
    pub fn run_with<F>(&mut self, mut observe: F) -> Result<&LabelGrid>
    where
        F: FnMut(&Iteration),
    {
        loop {
            let iteration = self.step()?;
            observe(&iteration);
            if iteration.is_fixed_point() {
                return Ok(&self.grid);
            }
        }
    }

    /// Steps until a fixed point and returns every iteration, the confirming empty one last.
    pub fn run_to_fixed_point(&mut self) -> Result<Vec<Iteration>> {
        let mut history = Vec::new();
        self.run_with(|iteration| history.push(iteration.clone()))?;
        Ok(history)
    }
}
