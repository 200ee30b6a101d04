//! Short-time analysis and overlap-add synthesis.
//!
//! Analysis slices the waveform into `n_fft`-sample frames at `hop_length`
//! stride, multiplies each by the (centered) analysis window and keeps the
//! `n_fft/2 + 1` non-redundant spectrum bins per frame. Synthesis rebuilds
//! the conjugate-symmetric spectrum, inverse-transforms, applies the same
//! window and overlap-adds at hop stride, then divides every output sample
//! by the accumulated squared window energy.
//!
//! With `center = false` the first and last `n_fft - hop_length` samples
//! are covered by fewer window tapers than the interior and cannot be
//! recovered exactly; that edge loss is inherent to the framing, not a
//! defect of the inverse.

use std::borrow::Cow;

use num_complex::Complex32;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::StftConfig;
use crate::constants::WIN_SUM_SQUARES_FLOOR;
use crate::error::{FeatureError, Result};
use crate::fft::Radix2Fft;
use crate::window;

/// Reusable analysis/synthesis engine for one [`StftConfig`].
///
/// The FFT plan and the padded window are built once in [`new`] and reused
/// across every call; the processor itself is immutable and shareable.
///
/// [`new`]: StftProcessor::new
pub struct StftProcessor {
    cfg: StftConfig,
    fft: Radix2Fft,
    /// Analysis/synthesis window, zero-padded centered to `n_fft`.
    window: Vec<f32>,
}

impl StftProcessor {
    /// Validate the config and precompute the window and transform plan.
    pub fn new(cfg: StftConfig) -> Result<Self> {
        cfg.validate()?;
        let fft = Radix2Fft::new(cfg.n_fft)?;
        let win = window::pad_center(&window::generate(cfg.window, cfg.win_length), cfg.n_fft);
        log::debug!(
            "stft: n_fft={} win_length={} hop_length={} window={} center={}",
            cfg.n_fft,
            cfg.win_length,
            cfg.hop_length,
            cfg.window,
            cfg.center
        );
        Ok(Self {
            cfg,
            fft,
            window: win,
        })
    }

    /// The configuration this processor was built from.
    #[inline]
    pub fn config(&self) -> &StftConfig {
        &self.cfg
    }

    /// Number of frames [`transform`] will produce for `len` input samples.
    ///
    /// [`transform`]: StftProcessor::transform
    pub fn frame_count(&self, len: usize) -> Result<usize> {
        if len == 0 {
            return Err(FeatureError::InsufficientSamples { needed: 1, got: 0 });
        }
        let effective = if self.cfg.center {
            len + 2 * (self.cfg.n_fft / 2)
        } else {
            len
        };
        window::frame_count(effective, self.cfg.n_fft, self.cfg.hop_length)
    }

    /// Forward transform: one half-spectrum of `n_fft/2 + 1` complex bins
    /// per frame, frames in input order.
    pub fn transform(&self, samples: &[f32]) -> Result<Vec<Vec<Complex32>>> {
        let n_frames = self.frame_count(samples.len())?;
        let padded: Cow<'_, [f32]> = if self.cfg.center {
            Cow::Owned(window::pad_edges(
                samples,
                self.cfg.n_fft / 2,
                self.cfg.pad_mode,
            ))
        } else {
            Cow::Borrowed(samples)
        };
        log::trace!("stft: {} samples -> {} frames", samples.len(), n_frames);

        let hop = self.cfg.hop_length;
        let compute = |idx: usize| -> Vec<Complex32> {
            let frame = &padded[idx * hop..idx * hop + self.cfg.n_fft];
            let windowed: Vec<f32> = frame
                .iter()
                .zip(&self.window)
                .map(|(&x, &w)| x * w)
                .collect();
            self.fft.forward_real(&windowed)
        };

        #[cfg(feature = "parallel")]
        let spectra = (0..n_frames).into_par_iter().map(compute).collect();
        #[cfg(not(feature = "parallel"))]
        let spectra = (0..n_frames).map(compute).collect();
        Ok(spectra)
    }

    /// Inverse transform: overlap-add reconstruction of the waveform.
    ///
    /// Every frame must carry exactly `n_fft/2 + 1` bins. With
    /// `center = true` the synthetic edge padding is stripped and the output
    /// holds `(n_frames - 1) * hop_length` samples; otherwise the full
    /// overlap-add buffer of `n_fft + (n_frames - 1) * hop_length` samples
    /// is returned. Output positions that no window taper reached stay zero.
    pub fn inverse(&self, spectra: &[Vec<Complex32>]) -> Result<Vec<f32>> {
        if spectra.is_empty() {
            return Err(FeatureError::InsufficientSamples { needed: 1, got: 0 });
        }
        let n_fft = self.cfg.n_fft;
        let n_bins = self.cfg.n_bins();
        for s in spectra {
            if s.len() != n_bins {
                return Err(FeatureError::BadFrame {
                    given: s.len(),
                    expected: n_bins,
                });
            }
        }

        let hop = self.cfg.hop_length;
        let out_len = n_fft + (spectra.len() - 1) * hop;
        let mut out = vec![0.0f32; out_len];
        let mut win_sumsq = vec![0.0f32; out_len];
        let mut buf = vec![Complex32::ZERO; n_fft];

        for (idx, spectrum) in spectra.iter().enumerate() {
            // rebuild the conjugate-symmetric full spectrum; DC and Nyquist
            // must be purely real for a real signal
            buf[..n_bins].copy_from_slice(spectrum);
            buf[0].im = 0.0;
            buf[n_fft / 2].im = 0.0;
            for k in 1..n_fft / 2 {
                buf[n_fft - k] = buf[k].conj();
            }
            self.fft.inverse(&mut buf);

            let start = idx * hop;
            for (i, v) in buf.iter().enumerate() {
                let w = self.window[i];
                out[start + i] += v.re * w;
                win_sumsq[start + i] += w * w;
            }
        }

        for (v, &ws) in out.iter_mut().zip(&win_sumsq) {
            if ws > WIN_SUM_SQUARES_FLOOR {
                *v /= ws;
            }
        }

        if self.cfg.center {
            let pad = n_fft / 2;
            Ok(out[pad..out_len - pad].to_vec())
        } else {
            Ok(out)
        }
    }
}

/// One-shot forward transform. Builds a throwaway [`StftProcessor`]; use
/// the processor directly when transforming many buffers.
pub fn stft(samples: &[f32], cfg: &StftConfig) -> Result<Vec<Vec<Complex32>>> {
    StftProcessor::new(cfg.clone())?.transform(samples)
}

/// One-shot inverse transform.
pub fn istft(spectra: &[Vec<Complex32>], cfg: &StftConfig) -> Result<Vec<f32>> {
    StftProcessor::new(cfg.clone())?.inverse(spectra)
}

/* --------------------------------------------------------------------- */
/*  Unit-tests                                                           */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PadMode, WindowKind};

    fn processor(n_fft: usize, win: usize, hop: usize, center: bool) -> StftProcessor {
        StftProcessor::new(StftConfig {
            n_fft,
            win_length: win,
            hop_length: hop,
            window: WindowKind::Hann,
            center,
            pad_mode: PadMode::Reflect,
        })
        .unwrap()
    }

    #[test]
    fn uncentered_frame_count_matches_the_invariant() {
        let p = processor(512, 512, 160, false);
        assert_eq!(p.frame_count(16_000).unwrap(), 97);
        let spectra = p.transform(&vec![0.25f32; 16_000]).unwrap();
        assert_eq!(spectra.len(), 97);
        assert_eq!(spectra[0].len(), 257);
    }

    #[test]
    fn centered_frame_count_gains_the_edge_frames() {
        let p = processor(512, 512, 160, true);
        assert_eq!(p.frame_count(16_000).unwrap(), 101);
    }

    #[test]
    fn short_input_fails_fast_without_partial_output() {
        let p = processor(512, 512, 160, false);
        assert!(matches!(
            p.transform(&[0.0; 100]),
            Err(FeatureError::InsufficientSamples {
                needed: 512,
                got: 100
            })
        ));
        assert!(matches!(
            p.transform(&[]),
            Err(FeatureError::InsufficientSamples { needed: 1, got: 0 })
        ));
    }

    #[test]
    fn inverse_rejects_malformed_spectra() {
        let p = processor(256, 256, 64, true);
        assert!(matches!(
            p.inverse(&[]),
            Err(FeatureError::InsufficientSamples { .. })
        ));
        let bad = vec![vec![Complex32::ZERO; 100]];
        assert!(matches!(
            p.inverse(&bad),
            Err(FeatureError::BadFrame {
                given: 100,
                expected: 129
            })
        ));
    }

    #[test]
    fn bin_aligned_sine_concentrates_in_its_bin() {
        // 1000 Hz at 16 kHz with n_fft = 512: bin 32 exactly
        let sr = 16_000.0f32;
        let freq = 1000.0f32;
        let samples: Vec<f32> = (0..4096)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr).sin())
            .collect();
        let p = processor(512, 512, 160, false);
        let spectra = p.transform(&samples).unwrap();

        for spectrum in &spectra {
            let mags: Vec<f32> = spectrum.iter().map(|c| c.norm()).collect();
            let peak = mags
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
                .map(|(i, _)| i)
                .unwrap();
            assert_eq!(peak, 32);
            // Hann leakage is confined to the immediate neighbors
            let far_energy: f32 = mags
                .iter()
                .enumerate()
                .filter(|(i, _)| i.abs_diff(32) > 2)
                .map(|(_, m)| m * m)
                .sum();
            let peak_energy = mags[32] * mags[32];
            assert!(far_energy < peak_energy * 1e-4);
        }
    }

    #[test]
    fn centered_round_trip_reconstructs_the_waveform() {
        let samples: Vec<f32> = (0..3200)
            .map(|i| {
                let t = i as f32 / 16_000.0;
                (2.0 * std::f32::consts::PI * 440.0 * t).sin()
                    + 0.3 * (2.0 * std::f32::consts::PI * 1320.0 * t).cos()
            })
            .collect();
        let p = processor(512, 512, 160, true);
        let spectra = p.transform(&samples).unwrap();
        let rebuilt = p.inverse(&spectra).unwrap();
        assert_eq!(rebuilt.len(), samples.len());

        let rms = samples
            .iter()
            .zip(&rebuilt)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
            / (samples.len() as f32).sqrt();
        assert!(rms < 1e-5, "round-trip rms {rms}");
    }

    #[test]
    fn uncentered_round_trip_is_exact_away_from_the_edges() {
        let samples: Vec<f32> = (0..2048)
            .map(|i| (i as f32 * 0.05).sin())
            .collect();
        let p = processor(256, 256, 64, false);
        let spectra = p.transform(&samples).unwrap();
        let rebuilt = p.inverse(&spectra).unwrap();

        // interior samples (beyond one full window of either edge) match
        for i in 256..rebuilt.len() - 256 {
            assert!(
                (rebuilt[i] - samples[i]).abs() < 1e-4,
                "sample {i}: {} vs {}",
                rebuilt[i],
                samples[i]
            );
        }
    }

    #[test]
    fn short_window_is_centered_inside_the_transform_buffer() {
        let p = processor(512, 400, 160, true);
        let samples: Vec<f32> = (0..1600).map(|i| (i as f32 * 0.01).sin()).collect();
        let spectra = p.transform(&samples).unwrap();
        let rebuilt = p.inverse(&spectra).unwrap();
        let rms = samples
            .iter()
            .zip(&rebuilt)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
            / (samples.len() as f32).sqrt();
        assert!(rms < 1e-5, "round-trip rms {rms}");
    }
}
