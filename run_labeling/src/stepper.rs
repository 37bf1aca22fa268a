// THEORY:
// The `stepper` owns the convergence loop when somebody wants to *watch* it:
// one iteration per tick, every iteration published to a channel, and a way to
// stop it from outside. The labeling core never sleeps or does I/O itself; the
// pacing lives entirely here.
//
// Key architectural principles:
// 1.  **Tick-Driven**: A `tokio::time::interval` paces iterations. The first tick
//     fires immediately, so the first iteration is never delayed.
// 2.  **Publish, Don't Render**: Each `Iteration` is sent on an `mpsc` channel.
//     A slow consumer applies back-pressure; a dropped consumer does not stop
//     the loop.
// 3.  **Cancellation Between Iterations**: A `watch` flag is checked before every
//     iteration. An iteration in progress always completes, so a cancelled run
//     hands back the last fully resolved grid.
// 4.  **Stream View**: `iteration_stream` offers the same sequence, unpaced, as a
//     `futures::Stream` for callers who prefer combinators to channels.

use crate::core_modules::convergence::{ConvergenceDriver, Iteration};
use crate::core_modules::grid::LabelGrid;
use crate::error::Result;
use futures::Stream;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// How a stepper run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepperOutcome {
    /// The last iteration found nothing to merge.
    Converged { iterations: usize, grid: LabelGrid },
    /// Stopped from outside; `grid` is the last completed iteration's grid.
    Cancelled { iterations: usize, grid: LabelGrid },
}

impl StepperOutcome {
    pub fn grid(&self) -> &LabelGrid {
        match self {
            Self::Converged { grid, .. } | Self::Cancelled { grid, .. } => grid,
        }
    }

    pub fn iterations(&self) -> usize {
        match self {
            Self::Converged { iterations, .. } | Self::Cancelled { iterations, .. } => *iterations,
        }
    }
}

/// Lets the owner of a running stepper stop it.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    cancel_tx: watch::Sender<bool>,
}

impl ControlHandle {
    /// Asks the stepper to stop before its next iteration.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }
}

/// Runs a `ConvergenceDriver` one iteration per tick.
pub struct ConvergenceStepper {
    driver: ConvergenceDriver,
    tick_interval: Duration,
    iterations_tx: mpsc::Sender<Iteration>,
    cancel_rx: watch::Receiver<bool>,
}

impl ConvergenceStepper {
    /// Builds a stepper plus its control handle and the receiving end of its iteration channel.
    pub fn new(
        driver: ConvergenceDriver,
        tick_interval: Duration,
        buffer: usize,
    ) -> (Self, ControlHandle, mpsc::Receiver<Iteration>) {
        let (iterations_tx, iterations_rx) = mpsc::channel(buffer.max(1));
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let stepper = Self {
            driver,
            tick_interval,
            iterations_tx,
            cancel_rx,
        };
        (stepper, ControlHandle { cancel_tx }, iterations_rx)
    }

    /// Steps until a fixed point or cancellation.
    pub async fn run(mut self) -> Result<StepperOutcome> {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancelled(&mut self.cancel_rx) => {
                    info!(iterations = self.driver.iterations(), "labeling cancelled");
                    return Ok(StepperOutcome::Cancelled {
                        iterations: self.driver.iterations(),
                        grid: self.driver.into_grid(),
                    });
                }
                _ = ticker.tick() => {}
            }

            let iteration = self.driver.step()?;
            let done = iteration.is_fixed_point();
            if self.iterations_tx.send(iteration).await.is_err() {
                debug!("iteration receiver dropped, continuing without it");
            }

            if done {
                return Ok(StepperOutcome::Converged {
                    iterations: self.driver.iterations(),
                    grid: self.driver.into_grid(),
                });
            }
        }
    }
}

/// Resolves once the flag turns `true`. A dropped sender can never cancel.
async fn cancelled(cancel_rx: &mut watch::Receiver<bool>) {
    if cancel_rx.wait_for(|&cancel| cancel).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Every iteration of `driver` as a stream, ending after the fixed point or the first error.
pub fn iteration_stream(driver: ConvergenceDriver) -> impl Stream<Item = Result<Iteration>> {
    futures::stream::unfold(Some(driver), |state| async move {
        let Some(mut driver) = state else {
            return None;
        };
        match driver.step() {
            Ok(iteration) => {
                let next = if iteration.is_fixed_point() { None } else { Some(driver) };
                Some((Ok(iteration), next))
            }
            Err(err) => Some((Err(err), None)),
        }
    })
}
