//! Cepstra – speech/audio front-end features
//! ==========================================
//! Self-contained STFT/ISTFT, mel filterbank, mel-spectrogram and MFCC
//! computation over raw mono sample buffers.
//!
//! * The numeric core (framing, windowing, the radix-2 transform, the
//!   filterbank projection and the cepstral transform) lives in this crate;
//!   no external DSP engine is called.
//! * Deterministic batch computation: the same samples and config always
//!   produce the same matrices. No I/O, no hidden defaults, no retries.
//! * Desktop builds fan frame work out with Rayon (default `parallel`
//!   feature); `--no-default-features` gives a single-threaded build.
//!
//! Feed decoded mono `f32` samples plus a sample rate, get back an STFT
//! matrix, a reconstructed waveform, a mel-spectrogram or an MFCC matrix.
//!
//! ```
//! use cepstra::{FeatureConfig, FeatureExtractor};
//!
//! let cfg = FeatureConfig::default(); // 16 kHz, n_fft 512, hop 160
//! let extractor = FeatureExtractor::new(cfg)?;
//! let samples = vec![0.1f32; 16_000]; // one second, from your decoder
//! let mel = extractor.mel_spectrogram(&samples)?;
//! assert_eq!(mel.len(), 50); // [n_mels][n_frames]
//! # Ok::<(), cepstra::FeatureError>(())
//! ```

#![deny(unsafe_code)]

/* ────────────────────────  sub-modules  ─────────────────────────────── */
pub mod config;
pub mod constants;
pub mod error;
pub mod fft;
pub mod mel;
pub mod mfcc;
pub mod spectrogram;
pub mod stft;
pub mod window;

/* ────────── public façade & re-exports ─────────────── */
pub use config::{
    FeatureConfig, FilterbankNorm, MelConfig, MelScale, MfccConfig, PadMode, StftConfig,
    WindowKind,
};
pub use error::{FeatureError, Result};
pub use fft::Radix2Fft;
pub use mel::MelFilterbank;
pub use mfcc::mfcc;
pub use spectrogram::{mel_spectrogram, power_to_db};
pub use stft::{StftProcessor, istft, stft};

/* ───────────────────────── crate imports ─────────────────────────────── */
use num_complex::Complex32;

use mfcc::{DctMatrix, lifter_weights};

/* ───────────────────────── main extractor ────────────────────────────── */

/// **FeatureExtractor** – the whole front-end behind one handle.
///
/// Build with [`FeatureExtractor::new`]; the configuration is validated
/// eagerly and the window, transform plan, mel filterbank and DCT matrix are
/// computed once, then reused across every call. The extractor is immutable
/// and can be shared between threads.
pub struct FeatureExtractor {
    /* ---------- config (immutable after ctor) ---------- */
    cfg: FeatureConfig,

    /* ----------------- cached DSP bits ---------------- */
    stft: StftProcessor,
    filterbank: MelFilterbank,
    dct: DctMatrix,
    lifter: Vec<f32>,
}

impl FeatureExtractor {
    /// Validate `cfg` and precompute every reusable table.
    ///
    /// All configuration errors surface here, before any samples are seen.
    pub fn new(cfg: FeatureConfig) -> Result<Self> {
        cfg.validate()?;
        let stft = StftProcessor::new(cfg.stft.clone())?;
        let filterbank = MelFilterbank::new(cfg.sample_rate, cfg.stft.n_fft, &cfg.mel)?;
        let dct = DctMatrix::new(cfg.mfcc.dct_type, cfg.mfcc.n_mfcc, cfg.mel.n_mels)?;
        let lifter = lifter_weights(cfg.mfcc.lifter, cfg.mfcc.n_mfcc);
        log::debug!(
            "extractor: sr={} n_fft={} n_mels={} n_mfcc={} scale={} norm={}",
            cfg.sample_rate,
            cfg.stft.n_fft,
            cfg.mel.n_mels,
            cfg.mfcc.n_mfcc,
            cfg.mel.scale,
            cfg.mel.norm
        );
        Ok(Self {
            cfg,
            stft,
            filterbank,
            dct,
            lifter,
        })
    }

    /// The configuration this extractor was built from.
    #[inline]
    pub fn config(&self) -> &FeatureConfig {
        &self.cfg
    }

    /// The cached mel filterbank.
    #[inline]
    pub fn filterbank(&self) -> &MelFilterbank {
        &self.filterbank
    }

    /// Complex STFT matrix: one half-spectrum per frame.
    pub fn stft(&self, samples: &[f32]) -> Result<Vec<Vec<Complex32>>> {
        self.stft.transform(samples)
    }

    /// Overlap-add reconstruction of a waveform from an STFT matrix.
    pub fn istft(&self, spectra: &[Vec<Complex32>]) -> Result<Vec<f32>> {
        self.stft.inverse(spectra)
    }

    /// Mel-spectrogram `[n_mels][n_frames]` in the configured power domain.
    pub fn mel_spectrogram(&self, samples: &[f32]) -> Result<Vec<Vec<f32>>> {
        let spectra = self.stft.transform(samples)?;
        Ok(spectrogram::project(
            &spectra,
            &self.filterbank,
            self.cfg.mel.power,
        ))
    }

    /// MFCC matrix `[n_mfcc][n_frames]`: log-compressed mel energies through
    /// the DCT, with the configured lifter curve applied.
    pub fn mfcc(&self, samples: &[f32]) -> Result<Vec<Vec<f32>>> {
        let mel = self.mel_spectrogram(samples)?;
        Ok(self.cepstra_from_mel(&mel))
    }

    /// The cepstral tail of the pipeline, reusable on a precomputed
    /// mel-spectrogram.
    pub fn cepstra_from_mel(&self, mel: &[Vec<f32>]) -> Vec<Vec<f32>> {
        let n_frames = mel.first().map_or(0, Vec::len);
        let n_mfcc = self.cfg.mfcc.n_mfcc;
        let eps = self.cfg.mfcc.log_epsilon;

        let mut out = vec![vec![0.0f32; n_frames]; n_mfcc];
        let mut column = vec![0.0f32; mel.len()];
        for t in 0..n_frames {
            for (m, row) in mel.iter().enumerate() {
                column[m] = (row[t] + eps).ln();
            }
            let cepstra = self.dct.apply(&column);
            for (i, c) in cepstra.into_iter().enumerate() {
                out[i][t] = c * self.lifter[i];
            }
        }
        out
    }
}

/* --------------------------------------------------------------------- */
/*  Unit-tests                                                           */
