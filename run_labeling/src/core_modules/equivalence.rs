// THEORY:
// Shared vocabulary for the equivalence stages: the neighbor mask that decides
// which already-visited cells a cell is compared against, and the map of
// "this label should be read as that label" edges the scanner produces and the
// resolver consumes.
//
// The map deliberately stays a plain forest of single-hop edges. It is never
// compressed or re-rooted; collapsing chains is the resolver's job, and
// collapsing *across* scans is the convergence driver's job.

use crate::core_modules::grid::Label;
use crate::error::LabelingError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The set of causal (already scanned in row-major order) neighbors a cell is compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeighborMask {
    /// Up-left, up, up-right, left. Cells touching only at a corner end up in one component.
    #[default]
    Causal,
    /// Up, left. Strict 4-connectivity.
    Orthogonal,
}

const CAUSAL_OFFSETS: [(isize, isize); 4] = [(-1, -1), (-1, 0), (-1, 1), (0, -1)];
const ORTHOGONAL_OFFSETS: [(isize, isize); 2] = [(-1, 0), (0, -1)];

impl NeighborMask {
    /// `(d_row, d_col)` offsets, in the order the scanner must visit them.
    pub fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Self::Causal => &CAUSAL_OFFSETS,
            Self::Orthogonal => &ORTHOGONAL_OFFSETS,
        }
    }
}

impl fmt::Display for NeighborMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Causal => write!(f, "causal"),
            Self::Orthogonal => write!(f, "orthogonal"),
        }
    }
}

impl FromStr for NeighborMask {
    type Err = LabelingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "causal" => Ok(Self::Causal),
            "orthogonal" => Ok(Self::Orthogonal),
            other => Err(LabelingError::UnknownMask {
                name: other.to_string(),
            }),
        }
    }
}

/// Directed `source -> target` label edges discovered by one scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquivalenceMap {
    edges: BTreeMap<Label, Label>,
}

impl EquivalenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The label `source` redirects to, if any.
    pub fn get(&self, source: Label) -> Option<Label> {
        self.edges.get(&source).copied()
    }

    pub fn contains_source(&self, label: Label) -> bool {
        self.edges.contains_key(&label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, Label)> + '_ {
        self.edges.iter().map(|(&source, &target)| (source, target))
    }

    /// Records `source -> target` under the scanner's commit rule.
    ///
    /// The edge is refused when `target` already redirects somewhere, or when
    /// `source` already has an edge (the first one wins). Returns whether it was stored.
    pub(crate) fn commit(&mut self, source: Label, target: Label) -> bool {
        if self.contains_source(target) || self.contains_source(source) {
            return false;
        }
        self.edges.insert(source, target);
        true
    }
}

/// Builds a map from raw edges with no commit rule applied. Later edges for a source replace earlier ones.
///
/// Label `0` means "off" and can never take part in an equivalence, so edges
/// touching it are dropped.
impl FromIterator<(Label, Label)> for EquivalenceMap {
    fn from_iter<I: IntoIterator<Item = (Label, Label)>>(iter: I) -> Self {
        Self {
            edges: iter
                .into_iter()
                .filter(|&(source, target)| source != 0 && target != 0)
                .collect(),
        }
    }
}
