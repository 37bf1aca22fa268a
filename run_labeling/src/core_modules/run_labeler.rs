// THEORY:
// The `run_labeler` is the first stage of the labeling engine. It turns a raw
// `BinaryGrid` into a `LabelGrid` of *preliminary* labels: every maximal
// horizontal run of "on" cells gets one positive integer, and no two runs
// anywhere in the grid share one.
//
// Key architectural principles:
// 1.  **Edge-Triggered Counting**: A single `RunCounter` walks the grid. It bumps
//     once at the start of every row and once each time an "on" run ends (a
//     falling edge). A run's label is whatever the counter reads while it is on.
// 2.  **Row Buffers**: The unconditional bump per row means a run touching the end
//     of one row can never share a label with a run at the start of the next.
// 3.  **Stateless Utility**: Like the rest of the stages, it reads one grid and
//     returns a new one.

use crate::core_modules::grid::{BinaryGrid, Cell, Label, LabelGrid};

pub mod run_labeler {
    use super::*;

    /// Source of preliminary labels. Never decreases.
    #[derive(Debug, Default)]
    struct RunCounter(Label);

    impl RunCounter {
        fn bump(&mut self) {
            self.0 += 1;
        }

        fn value(&self) -> Label {
            self.0
        }
    }

    /// Labels every horizontal run of "on" cells with a distinct positive integer.
    pub fn label_runs(grid: &BinaryGrid) -> LabelGrid {
        let mut counter = RunCounter::default();

        let rows = grid
            .rows()
            .iter()
            .map(|row| {
                counter.bump();
                let mut level: Cell = 0;
                row.iter()
                    .map(|&cell| {
                        if cell != level {
                            level = (level + 1) % 2;
                            if level == 0 {
                                // Falling edge: the next run gets a fresh value.
                                counter.bump();
                            }
                        }
                        Label::from(level) * counter.value()
                    })
                    .collect()
            })
            .collect();

        LabelGrid::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::run_labeler::label_runs;
    use crate::core_modules::grid::BinaryGrid;

    fn grid(rows: Vec<Vec<u8>>) -> BinaryGrid {
        BinaryGrid::new(rows).expect("binary test grid")
    }

    #[test]
    fn single_row_with_two_runs() {
        let labels = label_runs(&grid(vec![vec![0, 1, 1, 0, 1, 1, 0]]));
        assert_eq!(labels.rows(), &[vec![0, 1, 1, 0, 2, 2, 0]]);
    }

    #[test]
    fn every_row_starts_with_a_fresh_label() {
        let labels = label_runs(&grid(vec![vec![1, 1], vec![1, 1]]));
        assert_eq!(labels.rows(), &[vec![1, 1], vec![2, 2]]);
    }

    #[test]
    fn empty_rows_still_bump_the_counter() {
        let labels = label_runs(&grid(vec![vec![1, 0], vec![0, 0], vec![0, 1]]));
        // Row 0: bump to 1, run ends -> 2. Row 1: bump to 3. Row 2: bump to 4.
        assert_eq!(labels.rows(), &[vec![1, 0], vec![0, 0], vec![0, 4]]);
    }

    #[test]
    fn labels_are_unique_per_run() {
        let labels = label_runs(&grid(vec![
            vec![1, 0, 1, 0, 1],
            vec![0, 1, 1, 1, 0],
            vec![1, 1, 0, 1, 1],
        ]));
        assert_eq!(
            labels.rows(),
            &[
                vec![1, 0, 2, 0, 3],
                vec![0, 4, 4, 4, 0],
                vec![6, 6, 0, 7, 7],
            ]
        );
    }

    #[test]
    fn all_zero_grid_stays_zero() {
        let labels = label_runs(&BinaryGrid::zeros(3, 4));
        assert_eq!(labels.max_label(), 0);
        assert_eq!(labels.height(), 3);
    }
}
