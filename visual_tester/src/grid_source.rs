// Where the tester's binary grids come from: random fills for quick runs, or a
// file on disk. Files ending in `.json` hold a 2D array of 0/1 numbers, `.txt`
// files hold one row per line of `0`/`1` (or `.`/`#`) characters, and anything
// else is opened as an image and thresholded.

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use run_labeling::BinaryGrid;
use std::path::Path;

/// A `size` x `size` grid where each cell is on with probability `density`.
pub fn random_grid(size: usize, density: f64, seed: Option<u64>) -> BinaryGrid {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let density = density.clamp(0.0, 1.0);
    let rows: Vec<Vec<bool>> = (0..size)
        .map(|_| (0..size).map(|_| rng.random_bool(density)).collect())
        .collect();
    BinaryGrid::from_bools(&rows)
}

/// Loads a grid from `path`, picking the format from its extension.
pub fn load_grid(path: &Path, threshold: u8) -> anyhow::Result<BinaryGrid> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let rows: Vec<Vec<u8>> = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a 2D array of numbers", path.display()))?;
            Ok(BinaryGrid::new(rows)?)
        }
        Some("txt") => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            text.parse::<BinaryGrid>()
                .with_context(|| format!("{} is not a text grid", path.display()))
        }
        _ => {
            let image = image::open(path).with_context(|| format!("opening image {}", path.display()))?;
            Ok(BinaryGrid::from_luma(&image.to_luma8(), threshold))
        }
    }
}
