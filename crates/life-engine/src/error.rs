//! Error types for the console binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode during startup and shutdown.

/// Top-level error for the console binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: life_core::ConfigError,
    },

    /// The animator task failed.
    #[error("animator error: {source}")]
    Animator {
        /// The underlying animator error.
        #[from]
        source: life_core::animator::AnimatorError,
    },

    /// A console or signal handler could not be set up.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
