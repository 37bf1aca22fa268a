// THEORY:
// This file is the main entry point for the `run_labeling` library crate. It
// exports the `LabelingPipeline` and its data structures (`LabelingConfig`,
// `LabelingReport`, the grid types) as the high-level interface, plus the
// `ConvergenceDriver` and async `stepper` for callers that want to watch or pace
// the labeling loop themselves.
//
// The engine labels 4- or 8-connected regions of a binary grid without a
// union-find: runs get preliminary labels, a causal neighbor scan records
// label equivalences, equivalence chains are followed to canonical labels, and
// the scan/resolve cycle repeats until a scan finds nothing.

pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod stepper;

pub use core_modules::convergence::{ConvergenceDriver, Iteration, label_step};
pub use core_modules::equivalence::{EquivalenceMap, NeighborMask};
pub use core_modules::grid::{BinaryGrid, Label, LabelGrid};
pub use error::LabelingError;
pub use pipeline::{LabelingConfig, LabelingPipeline, LabelingReport};
