//! Error types for the `terminus-station` crate.

use terminus_types::StationId;

/// Errors raised by station bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Committing a tile or block would make the station's bounding rect
    /// wider or taller than the configured spread.
    #[error("station too spread out: {width}x{height} exceeds maximum spread {max_spread}")]
    SpreadTooLarge {
        /// Width the rect would have.
        width: i32,
        /// Height the rect would have.
        height: i32,
        /// Configured maximum spread.
        max_spread: u32,
    },

    /// A station handle did not resolve.
    #[error("station not found: {0}")]
    StationNotFound(StationId),

    /// Every station handle is in use.
    #[error("station pool exhausted ({capacity} stations)")]
    PoolExhausted {
        /// Maximum number of live stations.
        capacity: usize,
    },

    /// A settings value is out of range.
    #[error("invalid station setting {field}: {reason}")]
    InvalidSettings {
        /// Offending field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
