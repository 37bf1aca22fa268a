// Example runner for the `run_labeling` library.
// Reads a grid from stdin, one row per line, `0`/`.` for off and `1`/`#` for on,
// cells separated by whitespace or written back to back, and prints the final labels.

use run_labeling::{BinaryGrid, LabelingPipeline};
use std::io::{self, Read};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        eprintln!("failed to read stdin: {err}");
        return ExitCode::FAILURE;
    }

    let grid = match input.parse::<BinaryGrid>() {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("invalid grid: {err}");
            return ExitCode::FAILURE;
        }
    };

    match LabelingPipeline::default().label(&grid) {
        Ok(report) => {
            println!("{}", report.labels);
            println!(
                "components: {}, iterations: {}, merges: {}",
                report.component_count(),
                report.iterations.len(),
                report.total_merges()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("labeling failed: {err}");
            ExitCode::FAILURE
        }
    }
}
