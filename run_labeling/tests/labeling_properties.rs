//! Property-based tests for the labeling engine.
//!
//! These tests check the engine against a flood-fill reference on random grids:
//! - Final labels match 8-connectivity under the causal mask
//! - Final labels match 4-connectivity under the orthogonal mask
//! - Preliminary labels are unique per run
//! - A fixed point is idempotent
//! - Every run ends with exactly one empty confirming iteration

mod common;

use common::{EIGHT_NEIGHBORS, FOUR_NEIGHBORS, flood_fill, same_partition};
use proptest::prelude::*;
use run_labeling::core_modules::run_labeler::run_labeler;
use run_labeling::{BinaryGrid, ConvergenceDriver, NeighborMask, label_step};

fn rectangular_grid() -> impl Strategy<Value = BinaryGrid> {
    (1usize..14, 1usize..14)
        .prop_flat_map(|(height, width)| {
            prop::collection::vec(prop::collection::vec(0u8..=1, width), height)
        })
        .prop_map(BinaryGrid::from_rows_unchecked)
}

fn ragged_grid() -> impl Strategy<Value = BinaryGrid> {
    prop::collection::vec(prop::collection::vec(0u8..=1, 0..10), 1..10)
        .prop_map(BinaryGrid::from_rows_unchecked)
}

// =============================================================================
// Connectivity
// =============================================================================

proptest! {
    /// The causal mask reaches diagonal neighbors, so components are 8-connected.
    #[test]
    fn prop_causal_mask_matches_eight_connectivity(grid in rectangular_grid()) {
        let mut driver = ConvergenceDriver::from_binary(&grid, NeighborMask::Causal);
        driver.run_to_fixed_point().expect("converges");

        let reference = flood_fill(&grid, &EIGHT_NEIGHBORS);
        prop_assert_eq!(same_partition(driver.grid(), &reference), Ok(()));
    }

    /// The orthogonal mask only links up and left, so components are 4-connected.
    #[test]
    fn prop_orthogonal_mask_matches_four_connectivity(grid in rectangular_grid()) {
        let mut driver = ConvergenceDriver::from_binary(&grid, NeighborMask::Orthogonal);
        driver.run_to_fixed_point().expect("converges");

        let reference = flood_fill(&grid, &FOUR_NEIGHBORS);
        prop_assert_eq!(same_partition(driver.grid(), &reference), Ok(()));
    }

    /// Ragged rows never fault; missing cells simply are not neighbors.
    #[test]
    fn prop_ragged_grids_label_correctly(grid in ragged_grid()) {
        let mut driver = ConvergenceDriver::from_binary(&grid, NeighborMask::Causal);
        driver.run_to_fixed_point().expect("converges");

        let reference = flood_fill(&grid, &EIGHT_NEIGHBORS);
        prop_assert_eq!(same_partition(driver.grid(), &reference), Ok(()));
    }
}

// =============================================================================
// Run labels
// =============================================================================

proptest! {
    /// Each run carries one label and no label is shared by two runs.
    #[test]
    fn prop_preliminary_labels_unique_per_run(grid in rectangular_grid()) {
        let labels = run_labeler::label_runs(&grid);
        let mut owner = std::collections::HashMap::new();

        for (row, cells) in labels.rows().iter().enumerate() {
            let mut run_start = None;
            for (col, &label) in cells.iter().enumerate() {
                prop_assert_eq!(label == 0, grid.rows()[row][col] == 0);
                if label == 0 {
                    run_start = None;
                    continue;
                }
                let start = *run_start.get_or_insert(col);
                let previous = owner.insert(label, (row, start));
                if let Some(previous) = previous {
                    prop_assert_eq!(previous, (row, start), "label {} reused", label);
                }
            }
        }
    }
}

// =============================================================================
// Convergence
// =============================================================================

proptest! {
    /// Scanning a fixed point finds nothing and changes nothing.
    #[test]
    fn prop_fixed_point_is_idempotent(grid in rectangular_grid()) {
        let mut driver = ConvergenceDriver::from_binary(&grid, NeighborMask::Causal);
        driver.run_to_fixed_point().expect("converges");

        let (again, map) = label_step(driver.grid(), NeighborMask::Causal).expect("step");
        prop_assert!(map.is_empty());
        prop_assert_eq!(&again, driver.grid());
    }

    /// Only the last iteration is empty, and each earlier one removes labels.
    #[test]
    fn prop_history_ends_with_single_confirming_iteration(grid in rectangular_grid()) {
        let mut driver = ConvergenceDriver::from_binary(&grid, NeighborMask::Causal);
        let mut labels_before = driver.grid().distinct_labels().len();
        let history = driver.run_to_fixed_point().expect("converges");

        let (last, earlier) = history.split_last().expect("at least one iteration");
        prop_assert!(last.is_fixed_point());
        for iteration in earlier {
            prop_assert!(iteration.merged() > 0);
            let labels_after = iteration.grid.distinct_labels().len();
            prop_assert!(labels_after < labels_before);
            labels_before = labels_after;
        }
        prop_assert_eq!(driver.total_merges(), history.iter().map(|it| it.merged()).sum::<usize>());
    }

    /// Resolved labels are always labels the previous grid already used.
    #[test]
    fn prop_resolution_introduces_no_new_labels(grid in rectangular_grid()) {
        let start = run_labeler::label_runs(&grid);
        let (next, _) = label_step(&start, NeighborMask::Causal).expect("step");
        prop_assert!(next.distinct_labels().is_subset(&start.distinct_labels()));
    }
}
