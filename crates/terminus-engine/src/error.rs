//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup, scenario
//! construction and shutdown.

/// Top-level error for the engine binary.
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
        source: terminus_core::config::ConfigError,
    },

    /// Building the empty world failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: terminus_world::WorldError,
    },

    /// Loading or applying the scenario failed.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: terminus_core::ScenarioError,
    },

    /// A station lifecycle operation failed.
    #[error("lifecycle error: {source}")]
    Lifecycle {
        /// The underlying lifecycle error.
        #[from]
        source: terminus_core::LifecycleError,
    },
}
