// THEORY:
// The `pipeline` module is the top-level API of the labeling engine. It wraps the
// full stack (run labeling, the convergence loop, component aggregation) behind
// one call: hand it a `BinaryGrid`, get back a `LabelingReport` with the final
// labels, a summary of every iteration, and the components those labels name.
//
// Callers that want to watch convergence happen, or pace it, use the
// `ConvergenceDriver` (blocking, one step at a time) or the async `stepper`
// directly. The pipeline is for callers that only want the answer.

use crate::core_modules::component::{self, Component};
use crate::core_modules::convergence::ConvergenceDriver;
use crate::core_modules::run_labeler::run_labeler;
use crate::error::Result;
use std::time::Duration;
use tracing::debug;

// Re-export key data structures for the public API.
pub use crate::core_modules::convergence::Iteration;
pub use crate::core_modules::equivalence::{EquivalenceMap, NeighborMask};
pub use crate::core_modules::grid::{BinaryGrid, Label, LabelGrid};

const DEFAULT_TICK_MILLIS: u64 = 1000;

/// Configuration for the LabelingPipeline and the async stepper.
#[derive(Debug, Clone)]
pub struct LabelingConfig {
    pub mask: NeighborMask,
    /// Pause between iterations when the loop is driven by the stepper.
    pub tick_interval: Duration,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            mask: NeighborMask::default(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MILLIS),
        }
    }
}

/// What a renderer needs to know about one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationSummary {
    pub index: usize,
    pub merged: usize,
    pub max_label: Label,
}

impl From<&Iteration> for IterationSummary {
    fn from(iteration: &Iteration) -> Self {
        Self {
            index: iteration.index,
            merged: iteration.merged(),
            max_label: iteration.max_label(),
        }
    }
}

/// The result of labeling one grid to its fixed point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelingReport {
    /// The run labeler's output, before any merging.
    pub preliminary: LabelGrid,
    /// The fixed-point labels.
    pub labels: LabelGrid,
    /// One entry per iteration; the last one always has `merged == 0`.
    pub iterations: Vec<IterationSummary>,
    pub components: Vec<Component>,
}

impl LabelingReport {
    /// Assembles a report from a run that was driven elsewhere, such as through the stepper.
    pub fn from_run(preliminary: LabelGrid, iterations: Vec<IterationSummary>, labels: LabelGrid) -> Self {
        let components = component::components(&labels);
        Self {
            preliminary,
            labels,
            iterations,
            components,
        }
    }

    pub fn total_merges(&self) -> usize {
        self.iterations.iter().map(|it| it.merged).sum()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

/// The main, top-level struct for the labeling engine.
#[derive(Debug, Clone, Default)]
pub struct LabelingPipeline {
    config: LabelingConfig,
}

impl LabelingPipeline {
    pub fn new(config: LabelingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LabelingConfig {
        &self.config
    }

    /// A driver positioned at the preliminary labels of `grid`, for callers that step by hand.
    pub fn driver(&self, grid: &BinaryGrid) -> ConvergenceDriver {
        ConvergenceDriver::from_binary(grid, self.config.mask)
    }

    /// Labels `grid` all the way to its fixed point.
    pub fn label(&self, grid: &BinaryGrid) -> Result<LabelingReport> {
        // Stage 1: Run Labeling
        let preliminary = run_labeler::label_runs(grid);
        debug!(
            rows = preliminary.height(),
            runs = preliminary.distinct_labels().len(),
            "preliminary labels assigned"
        );

        // Stage 2: Convergence
        let mut driver = ConvergenceDriver::new(preliminary.clone(), self.config.mask);
        let mut iterations = Vec::new();
        driver.run_with(|iteration| iterations.push(IterationSummary::from(iteration)))?;
        let labels = driver.into_grid();

        // Stage 3: Component Aggregation
        Ok(LabelingReport::from_run(preliminary, iterations, labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_covers_every_stage() {
        let grid = BinaryGrid::new(vec![vec![1, 1, 0], vec![0, 1, 0], vec![0, 0, 1]])
            .expect("binary test grid");
        let report = LabelingPipeline::default().label(&grid).expect("labels");

        assert_eq!(report.preliminary.rows()[1][1], 3);
        // The lone bottom-right cell touches (1,1) diagonally.
        assert_eq!(report.component_count(), 1);
        assert_eq!(report.iterations.last().map(|it| it.merged), Some(0));
        assert!(report.total_merges() >= 2);
    }

    #[test]
    fn orthogonal_mask_keeps_diagonal_cells_apart() {
        let grid = BinaryGrid::new(vec![vec![1, 0], vec![0, 1]]).expect("binary test grid");
        let pipeline = LabelingPipeline::new(LabelingConfig {
            mask: NeighborMask::Orthogonal,
            ..LabelingConfig::default()
        });
        let report = pipeline.label(&grid).expect("labels");

        assert_eq!(report.component_count(), 2);
        assert_eq!(report.total_merges(), 0);
        assert_eq!(pipeline.config().mask, NeighborMask::Orthogonal);
    }

    #[test]
    fn report_from_a_stepped_run_matches_one_call_labeling() {
        let grid = BinaryGrid::new(vec![vec![1, 0, 1], vec![1, 1, 1]]).expect("binary test grid");
        let pipeline = LabelingPipeline::default();

        let mut driver = pipeline.driver(&grid);
        let preliminary = driver.grid().clone();
        let summaries = driver
            .run_to_fixed_point()
            .expect("converges")
            .iter()
            .map(IterationSummary::from)
            .collect();
        let stepped = LabelingReport::from_run(preliminary, summaries, driver.into_grid());

        assert_eq!(stepped, pipeline.label(&grid).expect("labels"));
        assert_eq!(stepped.component_count(), 1);
    }
}
