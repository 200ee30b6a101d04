//! Shared constants of the reference 16 kHz speech pipeline.

/// DEFAULT_SAMPLE_RATE is the sample rate the default configuration targets.
pub const DEFAULT_SAMPLE_RATE: f32 = 16_000.0;

/// DEFAULT_N_FFT is the default transform size.
pub const DEFAULT_N_FFT: usize = 512;

/// DEFAULT_WIN_LENGTH is the default analysis window length in samples.
pub const DEFAULT_WIN_LENGTH: usize = 512;

/// DEFAULT_HOP_LENGTH is the default hop between frames (10 ms @ 16 kHz).
pub const DEFAULT_HOP_LENGTH: usize = 160;

/// DEFAULT_N_MELS is the default mel band count.
pub const DEFAULT_N_MELS: usize = 50;

/// DEFAULT_N_MFCC is the default cepstral coefficient count.
pub const DEFAULT_N_MFCC: usize = 13;

/// LOG_EPSILON is added to mel energies before the MFCC log compression.
pub const LOG_EPSILON: f32 = 1e-6;

/// Window-energy floor below which overlap-add samples are left unscaled.
pub(crate) const WIN_SUM_SQUARES_FLOOR: f32 = 1e-10;

/// Power floor used by the decibel conversion.
pub(crate) const DB_AMIN: f32 = 1e-10;

/// HTK mel-scale constants: mel = 2595 * log10(1 + f/700).
pub(crate) const HTK_MEL_SCALE: f32 = 2595.0;
pub(crate) const HTK_BREAK_HZ: f32 = 700.0;

/// Slaney mel-scale constants: linear below 1 kHz, logarithmic above.
pub(crate) const SLANEY_F_STEP: f32 = 200.0 / 3.0;
pub(crate) const SLANEY_BREAK_HZ: f32 = 1000.0;
pub(crate) const SLANEY_BREAK_MEL: f32 = 15.0;
/// ln(6.4) / 27, the per-mel log step above the break frequency.
pub(crate) const SLANEY_LOG_STEP: f32 = 0.068_751_78;
