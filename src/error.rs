//! Crate-wide error type.
//!
//! All failures are deterministic functions of the input: a configuration
//! field that fails eager validation, a waveform too short for one analysis
//! frame, or a spectrum with the wrong bin count handed to the inverse
//! transform. Nothing is retried.

/// Returned whenever the feature pipeline is mis-configured or fed a buffer
/// it cannot process.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// A configuration field was rejected during eager validation.
    #[error("invalid config: {param} = {value} ({reason})")]
    InvalidConfig {
        /// Name of the offending field.
        param: &'static str,
        /// The rejected value, rendered as text.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// The waveform is too short for even one analysis frame.
    #[error("insufficient samples: need at least {needed}, got {got}")]
    InsufficientSamples {
        /// Minimum sample count for one frame under the active config.
        needed: usize,
        /// Actual sample count provided.
        got: usize,
    },
    /// A spectrum handed to the inverse transform has the wrong bin count.
    #[error("spectrum length ({given}) must equal n_fft/2 + 1 ({expected})")]
    BadFrame {
        /// The provided bin count.
        given: usize,
        /// The expected bin count.
        expected: usize,
    },
}

/// Result alias used across the public API.
pub type Result<T> = std::result::Result<T, FeatureError>;
