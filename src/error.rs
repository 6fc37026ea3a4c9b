//! Error types for the layout library.
//!
//! The data path is total: degenerate or empty primitive input produces
//! empty results, never an error. The only fallible surface is
//! configuration validation, which rejects contract violations (negative
//! tolerances, out-of-range ratios) before a pipeline runs.

/// Result type alias for layout library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tolerance or margin that must be non-negative was negative.
    #[error("Invalid tolerance for {name}: {value} (must be >= 0)")]
    InvalidTolerance {
        /// Name of the offending setting
        name: &'static str,
        /// Value supplied by the caller
        value: f32,
    },

    /// A ratio setting fell outside its documented range.
    #[error("Invalid ratio for {name}: {value} (must be within [{min}, {max}])")]
    InvalidRatio {
        /// Name of the offending setting
        name: &'static str,
        /// Value supplied by the caller
        value: f32,
        /// Lower bound (inclusive)
        min: f32,
        /// Upper bound (inclusive)
        max: f32,
    },

    /// A count setting that must be at least one was zero.
    #[error("Invalid count for {name}: must be >= 1")]
    InvalidCount {
        /// Name of the offending setting
        name: &'static str,
    },
}
