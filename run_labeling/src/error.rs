// THEORY:
// Every fallible operation in the labeling engine reports through a single error
// type. Geometric oddities (ragged rows, neighbors off the edge of the grid) are
// never errors: they read as "absent" wherever they occur. What *is* an error is
// input the caller promised would be binary but is not (numeric or text), and the two
// internal-consistency failures the iterative algorithm can in principle run
// into: a cyclic equivalence chain, and an iteration that merges labels without
// actually reducing them.

use crate::core_modules::grid::Label;

/// Errors raised by the labeling engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelingError {
    /// A grid cell held something other than 0 or 1.
    #[error("cell ({row}, {col}) holds {value}, expected 0 or 1")]
    NonBinaryCell { row: usize, col: usize, value: u8 },

    /// A text grid held a character other than `0`, `1`, `.` or `#`.
    #[error("row {row}, column {col}: unexpected character `{found}`")]
    UnexpectedCharacter { row: usize, col: usize, found: char },

    /// A neighbor mask name that is neither `causal` nor `orthogonal`.
    #[error("unknown neighbor mask `{name}`, expected `causal` or `orthogonal`")]
    UnknownMask { name: String },

    /// Following equivalence edges from `label` never reached a terminal label.
    #[error("equivalence chain starting at label {label} did not terminate after {hops} hops")]
    EquivalenceCycle { label: Label, hops: usize },

    /// An iteration recorded merges but the grid kept as many distinct labels as before.
    #[error("iteration {iteration} recorded merges but {labels} distinct labels remain unchanged")]
    NoProgress { iteration: usize, labels: usize },
}

pub type Result<T> = std::result::Result<T, LabelingError>;
