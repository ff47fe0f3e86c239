//! Animator loop with playback controls.
//!
//! This module provides [`run_animator`], the async function that drives
//! the periodic tick with support for:
//!
//! - **Idle/Playing**: every tick renders; only playing ticks advance
//! - **Variable tick speed**: interval adjustable at runtime
//! - **Bounded runs**: stop after `max_generations`
//! - **Cancellation**: [`AnimatorHandle::shutdown`] wakes and ends the loop
//!
//! Ticks are serialized: a late tick delays the schedule instead of firing
//! a burst to catch up, so two advances never overlap.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::engine::LifeEngine;
use crate::frame::Frame;

/// Errors that can occur while joining the animator task.
#[derive(Debug, thiserror::Error)]
pub enum AnimatorError {
    /// The animator task panicked or was aborted.
    #[error("animator task failed: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Why the animator loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorEndReason {
    /// A stop was requested through the playback control.
    Cancelled,
    /// The configured generation limit was reached.
    GenerationLimitReached,
}

/// Result of an animator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimatorSummary {
    /// The reason the loop ended.
    pub end_reason: AnimatorEndReason,
    /// Ticks executed, idle or playing.
    pub ticks: u64,
    /// Generations advanced by this animator.
    pub generations: u64,
}

/// Callback invoked with a fresh frame after every tick.
///
/// Called after the grid lock is released, so implementations may take as
/// long as they need without blocking edits. They must not block the
/// runtime for longer than a tick interval.
pub trait RenderCallback: Send {
    /// Called once per tick with the current frame.
    fn on_frame(&mut self, frame: &Frame);
}

/// A render callback that discards frames.
pub struct NoOpRender;

impl RenderCallback for NoOpRender {
    fn on_frame(&mut self, _frame: &Frame) {}
}

/// Run the animator until a stop is requested or the generation limit is
/// reached.
///
/// Each tick advances one generation if the engine is playing, then hands
/// the resulting frame to `render`. Idle ticks still render so edits made
/// while idle show up on the next tick.
pub async fn run_animator(engine: &LifeEngine, render: &mut dyn RenderCallback) -> AnimatorSummary {
    let playback = engine.playback();
    let mut interval_ms = playback.tick_interval_ms();
    let mut ticker = new_ticker(interval_ms);
    let mut ticks: u64 = 0;
    let mut generations: u64 = 0;

    info!(
        tick_interval_ms = interval_ms,
        max_generations = playback.max_generations(),
        playing = playback.is_playing(),
        "Animator starting"
    );

    let end_reason = loop {
        tokio::select! {
            biased;
            () = playback.stopped() => {
                info!("Animator stop requested");
                break AnimatorEndReason::Cancelled;
            }
            _ = ticker.tick() => {}
        }

        // --- Advance and render ---
        let started = Instant::now();
        let outcome = engine.tick();
        ticks = ticks.saturating_add(1);
        if outcome.advanced {
            generations = generations.saturating_add(1);
        }
        render.on_frame(&outcome.frame);

        // --- Measure drift ---
        let work = started.elapsed();
        if work > Duration::from_millis(interval_ms) {
            warn!(
                generation = outcome.frame.generation,
                work_ms = work.as_millis(),
                tick_interval_ms = interval_ms,
                "Tick work exceeded the tick interval"
            );
        }

        // --- Check generation limit ---
        if playback.generation_limit_reached(generations) {
            info!(
                generations,
                max_generations = playback.max_generations(),
                "Generation limit reached"
            );
            break AnimatorEndReason::GenerationLimitReached;
        }

        // --- Pick up speed changes ---
        let requested = playback.tick_interval_ms();
        if requested != interval_ms {
            debug!(from = interval_ms, to = requested, "Tick interval changed");
            interval_ms = requested;
            ticker = new_ticker(interval_ms);
        }
    };

    AnimatorSummary {
        end_reason,
        ticks,
        generations,
    }
}

/// An interval whose first tick fires one period from now.
fn new_ticker(interval_ms: u64) -> Interval {
    let period = Duration::from_millis(interval_ms);
    let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
    let mut ticker = tokio::time::interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// A running animator task.
#[derive(Debug)]
pub struct AnimatorHandle {
    engine: Arc<LifeEngine>,
    task: JoinHandle<AnimatorSummary>,
}

impl AnimatorHandle {
    /// Request a stop and wait for the loop to exit.
    pub async fn shutdown(self) -> Result<AnimatorSummary, AnimatorError> {
        self.engine.playback().request_stop();
        self.join().await
    }

    /// Wait for the loop to exit on its own.
    pub async fn join(self) -> Result<AnimatorSummary, AnimatorError> {
        Ok(self.task.await?)
    }

    /// Whether the loop has already exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn [`run_animator`] on the current runtime.
pub fn spawn_animator(
    engine: Arc<LifeEngine>,
    mut render: Box<dyn RenderCallback>,
) -> AnimatorHandle {
    let task = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { run_animator(&engine, render.as_mut()).await })
    };
    AnimatorHandle { engine, task }
}

/// Log the animator end sequence.
pub fn log_animator_end(summary: &AnimatorSummary, final_frame: &Frame) {
    info!(
        reason = ?summary.end_reason,
        ticks = summary.ticks,
        generations = summary.generations,
        "Animator ended"
    );
    info!(
        generation = final_frame.generation,
        population = final_frame.population,
        "Final frame"
    );
    if summary.ticks == 0 {
        warn!("Animator ended with no ticks executed");
    }
}
