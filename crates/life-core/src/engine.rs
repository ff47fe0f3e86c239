//! The engine and its control surface.
//!
//! [`LifeEngine`] owns the grid behind a single mutex. Every external edit,
//! every generation advance, and every frame capture takes that lock for its
//! whole duration, so an advance always sees a consistent snapshot and edits
//! never interleave with an in-progress neighbor pass. The lock is never held
//! across an `.await`: save encodes under the lock and writes after
//! releasing it, load reads and decodes before taking it.
//!
//! The engine is shared as `Arc<LifeEngine>` between the UI layer and the
//! animator task.

use std::sync::{Mutex, MutexGuard, PoisonError};

use life_grid::{Dimensions, GridError, GridState, Pattern, decode_bytes, encode};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, LifeConfig};
use crate::frame::Frame;
use crate::persistence::{PersistenceError, SaveStore};
use crate::playback::{MIN_TICK_INTERVAL_MS, PlaybackControl};

/// Errors returned by control-surface commands.
///
/// Adapters that dispatch several kinds of command (a console, a key map)
/// can funnel every failure through this one type.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    /// A cell edit or reseed was rejected.
    #[error(transparent)]
    Grid {
        /// The underlying grid error.
        #[from]
        source: GridError,
    },

    /// Save or load failed.
    #[error(transparent)]
    Persistence {
        /// The underlying persistence error.
        #[from]
        source: PersistenceError,
    },

    /// The requested tick interval is below the minimum.
    #[error("tick interval {ms} ms is below the minimum of {min} ms")]
    InvalidInterval {
        /// The rejected interval.
        ms: u64,
        /// The smallest accepted interval.
        min: u64,
    },
}

/// Result of one animator tick.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// Snapshot taken after any advance on this tick.
    pub frame: Frame,
    /// Whether a generation was computed on this tick.
    pub advanced: bool,
}

/// Game of Life engine: grid, seeding RNG, playback state, and save store.
#[derive(Debug)]
pub struct LifeEngine {
    grid: Mutex<GridState>,
    rng: Mutex<StdRng>,
    playback: PlaybackControl,
    store: SaveStore,
    dimensions: Dimensions,
    default_density: u32,
}

impl LifeEngine {
    /// Build an engine from validated configuration.
    ///
    /// The grid starts with every cell dead and the animator idle (or
    /// playing if `animation.start_playing` is set).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails
    /// validation.
    pub fn new(config: &LifeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let dimensions = config.grid.dimensions()?;

        let rng = match config.seeding.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let playback = PlaybackControl::new(
            config.animation.tick_interval_ms,
            config.animation.max_generations,
        );
        if config.animation.start_playing {
            let _ = playback.start();
        }

        let store = SaveStore::new(
            config.persistence.save_path.clone(),
            config.persistence.format,
        );

        info!(
            width = dimensions.width(),
            height = dimensions.height(),
            tick_interval_ms = playback.tick_interval_ms(),
            save_path = %store.path().display(),
            seeded = config.seeding.rng_seed.is_some(),
            "Engine initialized"
        );

        Ok(Self {
            grid: Mutex::new(GridState::new(dimensions)),
            rng: Mutex::new(rng),
            playback,
            store,
            dimensions,
            default_density: config.seeding.density_percent,
        })
    }

    /// Grid dimensions.
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Shared playback state.
    pub const fn playback(&self) -> &PlaybackControl {
        &self.playback
    }

    /// The save store.
    pub const fn store(&self) -> &SaveStore {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Cell editing
    // -----------------------------------------------------------------------

    /// Read one cell of the current buffer.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] for coordinates outside the grid.
    pub fn get_cell(&self, x: usize, y: usize) -> Result<bool, GridError> {
        self.lock_grid().get_cell(x, y)
    }

    /// Set one cell of the current buffer.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] for coordinates outside the grid.
    pub fn set_cell(&self, x: usize, y: usize, alive: bool) -> Result<(), GridError> {
        self.lock_grid().set_cell(x, y, alive)
    }

    /// Flip one cell of the current buffer and return its new state.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] for coordinates outside the grid.
    pub fn toggle_cell(&self, x: usize, y: usize) -> Result<bool, GridError> {
        let alive = self.lock_grid().toggle_cell(x, y)?;
        debug!(x, y, alive, "Cell toggled");
        Ok(alive)
    }

    /// Reseed the current buffer at `density_percent`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDensity`] if `density_percent > 100`;
    /// the grid is unchanged.
    pub fn randomize(&self, density_percent: u32) -> Result<(), GridError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut grid = self.lock_grid();
        grid.randomize(density_percent, &mut *rng)?;
        info!(
            density_percent,
            population = grid.population(),
            "Grid randomized"
        );
        Ok(())
    }

    /// Reseed the current buffer at the configured default density.
    ///
    /// # Errors
    ///
    /// Never fails for a validated configuration; see [`randomize`].
    ///
    /// [`randomize`]: Self::randomize
    pub fn randomize_default(&self) -> Result<(), GridError> {
        self.randomize(self.default_density)
    }

    /// Kill every cell and reset the generation counter.
    pub fn clear(&self) {
        self.lock_grid().clear();
        info!("Grid cleared");
    }

    /// Stamp a pattern with its origin at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the origin is outside the grid.
    pub fn stamp(&self, pattern: &Pattern, x: usize, y: usize) -> Result<(), GridError> {
        pattern.stamp(&mut self.lock_grid(), x, y)?;
        debug!(pattern = pattern.name, x, y, "Pattern stamped");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Playback
    // -----------------------------------------------------------------------

    /// Begin advancing generations. Idempotent.
    pub fn start(&self) {
        if self.playback.start() {
            info!("Playback started");
        }
    }

    /// Stop advancing generations; the animator keeps rendering.
    pub fn pause(&self) {
        if self.playback.pause() {
            info!("Playback paused");
        }
    }

    /// Whether generations advance on each tick.
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Change the animator tick interval and return the previous one.
    ///
    /// The animator picks the new interval up after its next tick.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidInterval`] below
    /// [`MIN_TICK_INTERVAL_MS`].
    pub fn set_tick_interval_ms(&self, ms: u64) -> Result<u64, ControlError> {
        let previous = self
            .playback
            .set_tick_interval_ms(ms)
            .ok_or(ControlError::InvalidInterval {
                ms,
                min: MIN_TICK_INTERVAL_MS,
            })?;
        info!(from = previous, to = ms, "Tick interval changed");
        Ok(previous)
    }

    // -----------------------------------------------------------------------
    // Generations and frames
    // -----------------------------------------------------------------------

    /// Advance one generation regardless of playback state and return the
    /// resulting frame. The dirty flag is left for the animator.
    pub fn advance(&self) -> Frame {
        let mut grid = self.lock_grid();
        grid.advance();
        let dirty = grid.is_dirty();
        Frame::capture(&grid, self.playback.is_playing(), dirty)
    }

    /// One animator tick: advance if playing, then capture a frame and
    /// consume the dirty flag, all under one lock acquisition.
    pub fn tick(&self) -> TickOutcome {
        let playing = self.playback.is_playing();
        let mut grid = self.lock_grid();
        if playing {
            grid.advance();
        }
        let dirty = grid.take_dirty();
        TickOutcome {
            frame: Frame::capture(&grid, playing, dirty),
            advanced: playing,
        }
    }

    /// Snapshot the current buffer without touching the dirty flag.
    pub fn frame(&self) -> Frame {
        let grid = self.lock_grid();
        let dirty = grid.is_dirty();
        Frame::capture(&grid, self.playback.is_playing(), dirty)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Persist the current buffer and return the text written.
    ///
    /// The buffer is encoded under the grid lock; the file write runs on
    /// the blocking pool so it cannot delay animator ticks.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the file cannot be written. The
    /// grid and the previous save are unchanged.
    pub async fn save(&self) -> Result<String, PersistenceError> {
        let (text, population) = {
            let grid = self.lock_grid();
            let text = encode(grid.current(), grid.dimensions(), self.store.format());
            (text, grid.population())
        };

        let store = self.store.clone();
        let payload = text.clone();
        let result = tokio::task::spawn_blocking(move || store.write(&payload)).await?;
        if let Err(e) = result {
            warn!(path = %self.store.path().display(), error = %e, "Save failed");
            return Err(e);
        }

        info!(
            path = %self.store.path().display(),
            population,
            format = ?self.store.format(),
            "Grid saved"
        );
        Ok(text)
    }

    /// Restore the current buffer from the save file and return the
    /// resulting frame.
    ///
    /// The file is read and fully decoded before the grid lock is taken, so
    /// a missing, truncated, or corrupt file leaves the grid untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the file cannot be read, or
    /// [`PersistenceError::Decode`] if its contents are invalid.
    pub async fn load(&self) -> Result<Frame, PersistenceError> {
        let store = self.store.clone();
        let bytes = tokio::task::spawn_blocking(move || store.read()).await??;

        let cells = match decode_bytes(&bytes, self.dimensions) {
            Ok(cells) => cells,
            Err(e) => {
                warn!(path = %self.store.path().display(), error = %e, "Save file rejected");
                return Err(e.into());
            }
        };

        let frame = {
            let mut grid = self.lock_grid();
            grid.replace_current(&cells)?;
            Frame::capture(&grid, self.playback.is_playing(), true)
        };
        info!(
            path = %self.store.path().display(),
            population = frame.population,
            "Grid loaded"
        );
        Ok(frame)
    }

    /// Take the grid lock, recovering from poisoning.
    ///
    /// Grid methods never leave a buffer half-written when they return an
    /// error, so the state behind a poisoned lock is still usable.
    fn lock_grid(&self) -> MutexGuard<'_, GridState> {
        self.grid.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
