//! Engine, animator, and persistence for the Life simulation.
//!
//! This crate wraps the grid from `life-grid` in a thread-safe engine that
//! UI adapters drive through a small control surface, and runs the periodic
//! animator that advances generations and hands frames to a renderer.
//!
//! # Modules
//!
//! - [`animator`] -- [`run_animator`], the periodic tick loop, and the
//!   [`RenderCallback`] trait.
//! - [`config`] -- Configuration loading from `life-config.yaml` into
//!   strongly-typed structs.
//! - [`engine`] -- [`LifeEngine`]: the locked grid plus toggle, randomize,
//!   start, save, and load.
//! - [`frame`] -- Read-only snapshots handed to renderers.
//! - [`persistence`] -- Atomic save file storage.
//! - [`playback`] -- Idle/playing state, tick speed, and stop requests.
//!
//! [`run_animator`]: animator::run_animator
//! [`RenderCallback`]: animator::RenderCallback
//! [`LifeEngine`]: engine::LifeEngine

pub mod animator;
pub mod config;
pub mod engine;
pub mod frame;
pub mod persistence;
pub mod playback;

pub use animator::{
    AnimatorEndReason, AnimatorHandle, AnimatorSummary, NoOpRender, RenderCallback,
    spawn_animator,
};
pub use config::{ConfigError, LifeConfig};
pub use engine::{ControlError, LifeEngine, TickOutcome};
pub use frame::Frame;
pub use persistence::{PersistenceError, SaveStore};
pub use playback::PlaybackControl;
