//! Playback control state shared by the control surface and the animator.
//!
//! The animator has two states, idle and playing. It starts idle;
//! [`PlaybackControl::start`] moves it to playing and is idempotent. Nothing
//! in the engine ever returns to idle on its own; [`PlaybackControl::pause`]
//! exists for adapters that want a pause button.
//!
//! # Architecture
//!
//! All mutable fields are atomics so the control surface can flip them from
//! any thread while the animator task reads them once per tick without
//! touching the grid lock. Stop requests also wake the animator through a
//! [`Notify`] so it exits without waiting for the next tick.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::Notify;

/// Smallest accepted tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Shared playback state.
#[derive(Debug)]
pub struct PlaybackControl {
    /// Whether generations advance on each tick.
    playing: AtomicBool,

    /// Whether the animator has been asked to exit.
    stop_requested: AtomicBool,

    /// Wakes the animator when a stop is requested.
    stop_notify: Notify,

    /// Current tick interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Generations after which the animator ends (0 = unlimited).
    max_generations: u64,
}

impl PlaybackControl {
    /// Create idle playback state.
    ///
    /// `tick_interval_ms` is raised to [`MIN_TICK_INTERVAL_MS`] if lower.
    pub fn new(tick_interval_ms: u64, max_generations: u64) -> Self {
        Self {
            playing: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::new(),
            tick_interval_ms: AtomicU64::new(tick_interval_ms.max(MIN_TICK_INTERVAL_MS)),
            max_generations,
        }
    }

    // -----------------------------------------------------------------------
    // Idle / Playing
    // -----------------------------------------------------------------------

    /// Whether the animator advances generations.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Switch to playing. Returns `true` if the state changed.
    pub fn start(&self) -> bool {
        !self.playing.swap(true, Ordering::AcqRel)
    }

    /// Switch to idle. Returns `true` if the state changed.
    pub fn pause(&self) -> bool {
        self.playing.swap(false, Ordering::AcqRel)
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Ask the animator to exit and wake it if it is waiting for a tick.
    ///
    /// A stop is permanent for this control; build a new engine to run
    /// again.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Resolve once a stop has been requested.
    pub async fn stopped(&self) {
        while !self.is_stop_requested() {
            self.stop_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Tick Speed
    // -----------------------------------------------------------------------

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds.
    ///
    /// Returns the previous interval on success, or `None` if the value
    /// was rejected (below [`MIN_TICK_INTERVAL_MS`]).
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        Some(self.tick_interval_ms.swap(ms, Ordering::AcqRel))
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Get the configured generation limit (0 = unlimited).
    pub const fn max_generations(&self) -> u64 {
        self.max_generations
    }

    /// Returns `true` if `max_generations > 0` and `generations` reached it.
    pub const fn generation_limit_reached(&self, generations: u64) -> bool {
        self.max_generations > 0 && generations >= self.max_generations
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn initial_state_is_idle() {
        let state = PlaybackControl::new(200, 0);
        assert!(!state.is_playing());
        assert!(!state.is_stop_requested());
    }

    #[test]
    fn start_is_idempotent() {
        let state = PlaybackControl::new(200, 0);
        assert!(state.start());
        assert!(state.is_playing());
        assert!(!state.start());
        assert!(state.is_playing());
    }

    #[test]
    fn pause_returns_to_idle() {
        let state = PlaybackControl::new(200, 0);
        assert!(!state.pause());
        let _ = state.start();
        assert!(state.pause());
        assert!(!state.is_playing());
    }

    #[test]
    fn set_tick_interval() {
        let state = PlaybackControl::new(200, 0);
        assert_eq!(state.set_tick_interval_ms(500), Some(200));
        assert_eq!(state.tick_interval_ms(), 500);
    }

    #[test]
    fn reject_interval_below_minimum() {
        let state = PlaybackControl::new(200, 0);
        assert_eq!(state.set_tick_interval_ms(MIN_TICK_INTERVAL_MS - 1), None);
        assert_eq!(state.tick_interval_ms(), 200);
    }

    #[test]
    fn constructor_clamps_interval() {
        let state = PlaybackControl::new(0, 0);
        assert_eq!(state.tick_interval_ms(), MIN_TICK_INTERVAL_MS);
    }

    #[test]
    fn generation_limit_zero_means_unlimited() {
        let state = PlaybackControl::new(200, 0);
        assert!(!state.generation_limit_reached(u64::MAX));
    }

    #[test]
    fn generation_limit_reached() {
        let state = PlaybackControl::new(200, 10);
        assert!(!state.generation_limit_reached(9));
        assert!(state.generation_limit_reached(10));
        assert!(state.generation_limit_reached(11));
    }

    #[tokio::test]
    async fn stopped_resolves_after_request() {
        let state = Arc::new(PlaybackControl::new(200, 0));
        let waiter = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.stopped().await })
        };
        tokio::task::yield_now().await;
        state.request_stop();
        let joined = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn stopped_is_immediate_when_already_requested() {
        let state = PlaybackControl::new(200, 0);
        state.request_stop();
        let done = tokio::time::timeout(Duration::from_millis(50), state.stopped()).await;
        assert!(done.is_ok());
    }
}
