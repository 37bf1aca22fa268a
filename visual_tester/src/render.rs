// Paints a label grid as an RGB image, one square block per cell.
//
// Labels are normalised against the largest label in the grid and run through a
// three-band colour chart: blue fades out over the first half, green rises and
// falls across the whole range, red rises over the second half. Off cells are
// white; positions past the end of a short row are light grey.

use image::{Rgb, RgbImage};
use run_labeling::{Label, LabelGrid};

const OFF_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const MISSING_COLOR: Rgb<u8> = Rgb([200, 200, 200]);

/// Maps a label normalised to `0.0..=1.0` onto the colour chart.
pub fn color_chart(normalized: f64) -> Rgb<u8> {
    let n = normalized.clamp(0.0, 1.0);
    let band = |v: f64| (255.0 * 2.0 * v).round();

    let blue = (255.0 - band(n)).max(0.0);
    let green = if n < 0.5 { band(n) } else { 255.0 - band(n - 0.5) };
    let red = if n < 0.5 { 0.0 } else { band(n - 0.5) };

    Rgb([red as u8, green as u8, blue as u8])
}

fn label_color(label: Label, max_label: Label) -> Rgb<u8> {
    if label == 0 || max_label == 0 {
        return OFF_COLOR;
    }
    color_chart(label as f64 / max_label as f64)
}

/// Renders `grid` with `cell_size` x `cell_size` pixels per cell.
pub fn render_labels(grid: &LabelGrid, cell_size: u32) -> RgbImage {
    let cell_size = cell_size.max(1);
    let max_label = grid.max_label();
    let width = grid.rows().iter().map(Vec::len).max().unwrap_or(0) as u32;
    let height = grid.height() as u32;

    let mut image = RgbImage::from_pixel(width * cell_size, height * cell_size, MISSING_COLOR);
    for (row, col, label) in grid.cells() {
        let color = label_color(label, max_label);
        let x0 = col as u32 * cell_size;
        let y0 = row as u32 * cell_size;
        for y in y0..y0 + cell_size {
            for x in x0..x0 + cell_size {
                image.put_pixel(x, y, color);
            }
        }
    }
    image
}
