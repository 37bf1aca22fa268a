use anyhow::Context;
use clap::Parser;
use run_labeling::pipeline::{IterationSummary, LabelingReport};
use run_labeling::stepper::{ConvergenceStepper, StepperOutcome};
use run_labeling::{LabelingConfig, LabelingPipeline, NeighborMask};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod grid_source;
mod render;

/// Labels a binary grid step by step, writing one PNG per convergence iteration.
#[derive(Parser, Debug)]
#[command(name = "visual_tester", version)]
struct Args {
    /// Directory the iteration frames and `report.json` are written to.
    output_dir: PathBuf,

    /// Grid file (`.json`, `.txt` or an image). A random grid is used when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Side length of the random grid.
    #[arg(long, env = "RL_SIZE", default_value_t = 50)]
    size: usize,

    /// Probability that a random cell is on.
    #[arg(long, env = "RL_DENSITY", default_value_t = 0.5, value_parser = parse_density)]
    density: f64,

    /// Seed for the random grid.
    #[arg(long, env = "RL_SEED")]
    seed: Option<u64>,

    /// Luma value at or above which an image pixel counts as on.
    #[arg(long, default_value_t = 128)]
    threshold: u8,

    /// `causal` (corner contact joins) or `orthogonal` (edge contact only).
    #[arg(long, env = "RL_MASK", default_value_t = NeighborMask::Causal)]
    mask: NeighborMask,

    /// Pause between iterations, in milliseconds.
    #[arg(long, env = "RL_TICK_MS", default_value_t = 1000)]
    tick_ms: u64,

    /// Pixels per grid cell in the rendered frames.
    #[arg(long, default_value_t = 8)]
    cell_size: u32,
}

fn parse_density(s: &str) -> Result<f64, String> {
    let density: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if !(0.0..=1.0).contains(&density) {
        return Err(format!("{density} is not a probability between 0 and 1"));
    }
    Ok(density)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // --- 1. Argument Parsing & Setup ---
    let args = Args::parse();
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    // --- 2. Grid Source ---
    let grid = match &args.input {
        Some(path) => grid_source::load_grid(path, args.threshold)?,
        None => grid_source::random_grid(args.size, args.density, args.seed),
    };
    info!(rows = grid.height(), on_cells = grid.on_cells(), mask = %args.mask, "grid loaded");

    // --- 3. Labeling Setup ---
    let config = LabelingConfig {
        mask: args.mask,
        tick_interval: Duration::from_millis(args.tick_ms),
    };
    let pipeline = LabelingPipeline::new(config);
    let driver = pipeline.driver(&grid);
    let preliminary = driver.grid().clone();
    render::render_labels(&preliminary, args.cell_size)
        .save(args.output_dir.join("iteration_000.png"))
        .context("writing preliminary frame")?;

    let (stepper, control, mut iterations) =
        ConvergenceStepper::new(driver, pipeline.config().tick_interval, 2);
    let run = tokio::spawn(stepper.run());

    // Ctrl-C stops the loop between iterations; the last finished frame stays on disk.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            control.cancel();
        }
    });

    // --- 4. Render Loop ---
    let mut summaries = Vec::new();
    while let Some(iteration) = iterations.recv().await {
        let summary = IterationSummary::from(&iteration);
        summaries.push(summary);
        let path = args.output_dir.join(format!("iteration_{:03}.png", summary.index));
        render::render_labels(&iteration.grid, args.cell_size)
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(
            iteration = summary.index,
            merged = summary.merged,
            max_label = summary.max_label,
            "frame written"
        );
    }

    // --- 5. Final Report ---
    match run.await.context("stepper task panicked")?? {
        StepperOutcome::Converged { iterations, grid } => {
            info!(iterations, "END");
            let report = LabelingReport::from_run(preliminary, summaries, grid);
            let path = args.output_dir.join("report.json");
            std::fs::write(&path, serde_json::to_string_pretty(&report)?)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                components = report.component_count(),
                merges = report.total_merges(),
                "report saved to {}",
                path.display()
            );
        }
        StepperOutcome::Cancelled { iterations, .. } => {
            warn!(iterations, "stopped before reaching a fixed point");
        }
    }

    Ok(())
}
