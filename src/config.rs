//! Explicit, validated configuration for the feature pipeline.
//!
//! Every knob the pipeline honors is a named field here; there are no
//! implicit library defaults. [`FeatureConfig::validate`] checks the whole
//! tree eagerly, so a bad value surfaces before any transform work starts.
//!
//! The frequency-scale convention ([`MelScale`]) and the per-band area
//! normalization ([`FilterbankNorm`]) are deliberately independent fields:
//! they compose into four valid filterbank variants.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::constants::{
    DEFAULT_HOP_LENGTH, DEFAULT_N_FFT, DEFAULT_N_MELS, DEFAULT_N_MFCC, DEFAULT_SAMPLE_RATE,
    DEFAULT_WIN_LENGTH, LOG_EPSILON,
};
use crate::error::{FeatureError, Result};

/* ────────────────────────── config enums ─────────────────────────────── */

/// Analysis window shape. All windows are generated in periodic form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// Hann: `0.5 - 0.5*cos(2*pi*n/N)`.
    Hann,
    /// Hamming: `0.54 - 0.46*cos(2*pi*n/N)`.
    Hamming,
    /// Blackman: `0.42 - 0.5*cos(2*pi*n/N) + 0.08*cos(4*pi*n/N)`.
    Blackman,
    /// No tapering.
    Rectangular,
}

/// Edge padding applied before framing when `center` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PadMode {
    /// Mirror the signal around its first/last sample (no edge duplication).
    Reflect,
    /// Pad with zeros.
    Zero,
}

/// Frequency-scale convention used to place mel band centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MelScale {
    /// `mel = 2595 * log10(1 + f/700)`.
    Htk,
    /// Linear below 1 kHz, logarithmic above (Auditory Toolbox constants).
    Slaney,
}

/// Per-band weight normalization of the filterbank rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FilterbankNorm {
    /// Raw triangles peaking at 1.0.
    None,
    /// Each triangle scaled to unit area in Hz, so wide high bands do not
    /// dominate energy sums.
    Slaney,
}

/* ────────────────────────── config structs ───────────────────────────── */

/// Short-time analysis parameters shared by every spectral feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StftConfig {
    /// Transform size; must be a power of two >= 2.
    pub n_fft: usize,
    /// Analysis window length in samples; `<= n_fft`, zero-padded centered
    /// into the transform buffer when shorter.
    pub win_length: usize,
    /// Samples between consecutive frame starts.
    pub hop_length: usize,
    /// Analysis/synthesis window shape.
    pub window: WindowKind,
    /// When set, the waveform is padded by `n_fft/2` on each side so the
    /// first frame is centered on sample 0.
    pub center: bool,
    /// Edge padding flavor used when `center` is set.
    pub pad_mode: PadMode,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            n_fft: DEFAULT_N_FFT,
            win_length: DEFAULT_WIN_LENGTH,
            hop_length: DEFAULT_HOP_LENGTH,
            window: WindowKind::Hann,
            center: true,
            pad_mode: PadMode::Reflect,
        }
    }
}

impl StftConfig {
    /// Number of unique spectrum bins per frame (`n_fft/2 + 1`).
    #[inline]
    pub const fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Eagerly validate every field.
    pub fn validate(&self) -> Result<()> {
        if self.n_fft < 2 || !self.n_fft.is_power_of_two() {
            return Err(FeatureError::InvalidConfig {
                param: "n_fft",
                value: self.n_fft.to_string(),
                reason: "must be a power of two >= 2",
            });
        }
        if self.hop_length == 0 {
            return Err(FeatureError::InvalidConfig {
                param: "hop_length",
                value: self.hop_length.to_string(),
                reason: "must be positive",
            });
        }
        if self.win_length == 0 {
            return Err(FeatureError::InvalidConfig {
                param: "win_length",
                value: self.win_length.to_string(),
                reason: "must be positive",
            });
        }
        if self.win_length > self.n_fft {
            return Err(FeatureError::InvalidConfig {
                param: "win_length",
                value: self.win_length.to_string(),
                reason: "must not exceed n_fft",
            });
        }
        Ok(())
    }
}

/// Mel filterbank and spectrogram parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MelConfig {
    /// Number of triangular mel bands.
    pub n_mels: usize,
    /// Lowest band edge in Hz.
    pub fmin: f32,
    /// Highest band edge in Hz; `<= sample_rate / 2`.
    pub fmax: f32,
    /// Spectrum exponent: 1.0 for magnitude, 2.0 for power.
    pub power: f32,
    /// Frequency-scale convention for band placement.
    pub scale: MelScale,
    /// Per-band area normalization.
    pub norm: FilterbankNorm,
}

impl Default for MelConfig {
    fn default() -> Self {
        Self {
            n_mels: DEFAULT_N_MELS,
            fmin: 0.0,
            fmax: DEFAULT_SAMPLE_RATE / 2.0,
            power: 2.0,
            scale: MelScale::Slaney,
            norm: FilterbankNorm::Slaney,
        }
    }
}

impl MelConfig {
    /// Eagerly validate every field against the configured sample rate.
    pub fn validate(&self, sample_rate: f32) -> Result<()> {
        if self.n_mels < 1 {
            return Err(FeatureError::InvalidConfig {
                param: "n_mels",
                value: self.n_mels.to_string(),
                reason: "must be at least 1",
            });
        }
        if !self.fmin.is_finite() || self.fmin < 0.0 {
            return Err(FeatureError::InvalidConfig {
                param: "fmin",
                value: self.fmin.to_string(),
                reason: "must be finite and non-negative",
            });
        }
        if !self.fmax.is_finite() || self.fmax <= self.fmin {
            return Err(FeatureError::InvalidConfig {
                param: "fmax",
                value: self.fmax.to_string(),
                reason: "must be finite and greater than fmin",
            });
        }
        if self.fmax > sample_rate / 2.0 {
            return Err(FeatureError::InvalidConfig {
                param: "fmax",
                value: self.fmax.to_string(),
                reason: "must not exceed the Nyquist frequency",
            });
        }
        if !self.power.is_finite() || self.power <= 0.0 {
            return Err(FeatureError::InvalidConfig {
                param: "power",
                value: self.power.to_string(),
                reason: "must be finite and positive",
            });
        }
        Ok(())
    }
}

/// Cepstral extraction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfccConfig {
    /// Number of cepstral coefficients kept.
    pub n_mfcc: usize,
    /// DCT variant applied along the mel axis; 2 (canonical) or 3.
    pub dct_type: u8,
    /// Sinusoidal liftering parameter; 0 disables.
    pub lifter: f32,
    /// Added to mel energies before the log, so silence stays finite.
    pub log_epsilon: f32,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            n_mfcc: DEFAULT_N_MFCC,
            dct_type: 2,
            lifter: 0.0,
            log_epsilon: LOG_EPSILON,
        }
    }
}

impl MfccConfig {
    /// Eagerly validate every field against the configured band count.
    pub fn validate(&self, n_mels: usize) -> Result<()> {
        if self.n_mfcc < 1 {
            return Err(FeatureError::InvalidConfig {
                param: "n_mfcc",
                value: self.n_mfcc.to_string(),
                reason: "must be at least 1",
            });
        }
        if self.n_mfcc > n_mels {
            return Err(FeatureError::InvalidConfig {
                param: "n_mfcc",
                value: self.n_mfcc.to_string(),
                reason: "must not exceed n_mels",
            });
        }
        if self.dct_type != 2 && self.dct_type != 3 {
            return Err(FeatureError::InvalidConfig {
                param: "dct_type",
                value: self.dct_type.to_string(),
                reason: "only DCT types 2 and 3 are supported",
            });
        }
        if !self.lifter.is_finite() || self.lifter < 0.0 {
            return Err(FeatureError::InvalidConfig {
                param: "lifter",
                value: self.lifter.to_string(),
                reason: "must be finite and non-negative",
            });
        }
        if !self.log_epsilon.is_finite() || self.log_epsilon <= 0.0 {
            return Err(FeatureError::InvalidConfig {
                param: "log_epsilon",
                value: self.log_epsilon.to_string(),
                reason: "must be finite and positive",
            });
        }
        Ok(())
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Sample rate of the input waveform in Hz.
    pub sample_rate: f32,
    /// Short-time analysis parameters.
    pub stft: StftConfig,
    /// Mel filterbank / spectrogram parameters.
    pub mel: MelConfig,
    /// Cepstral extraction parameters.
    pub mfcc: MfccConfig,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            stft: StftConfig::default(),
            mel: MelConfig::default(),
            mfcc: MfccConfig::default(),
        }
    }
}

impl FeatureConfig {
    /// Validate the whole configuration tree. Called by every pipeline
    /// constructor before any work is done.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(FeatureError::InvalidConfig {
                param: "sample_rate",
                value: self.sample_rate.to_string(),
                reason: "must be finite and positive",
            });
        }
        self.stft.validate()?;
        self.mel.validate(self.sample_rate)?;
        self.mfcc.validate(self.mel.n_mels)?;
        Ok(())
    }
}

/* --------------------------------------------------------------------- */
/*  Unit-tests                                                           */
