//! Triangular mel filterbank construction.
//!
//! A filterbank is a pure function of `(sample_rate, n_fft, MelConfig)`:
//! build it once and reuse it across every signal analyzed with the same
//! parameters. Band centers are placed on the configured mel scale
//! ([`MelScale`]) and each row may independently carry Slaney unit-area
//! normalization ([`FilterbankNorm`]); the two axes compose.

use crate::config::{FilterbankNorm, MelConfig, MelScale};
use crate::constants::{
    HTK_BREAK_HZ, HTK_MEL_SCALE, SLANEY_BREAK_HZ, SLANEY_BREAK_MEL, SLANEY_F_STEP,
    SLANEY_LOG_STEP,
};
use crate::error::{FeatureError, Result};

/// Convert a frequency in Hz to mel under the given convention.
#[inline]
pub fn hz_to_mel(hz: f32, scale: MelScale) -> f32 {
    match scale {
        MelScale::Htk => HTK_MEL_SCALE * (1.0 + hz / HTK_BREAK_HZ).log10(),
        MelScale::Slaney => {
            if hz < SLANEY_BREAK_HZ {
                hz / SLANEY_F_STEP
            } else {
                SLANEY_BREAK_MEL + (hz / SLANEY_BREAK_HZ).ln() / SLANEY_LOG_STEP
            }
        }
    }
}

/// Convert a mel value back to Hz under the given convention.
#[inline]
pub fn mel_to_hz(mel: f32, scale: MelScale) -> f32 {
    match scale {
        MelScale::Htk => HTK_BREAK_HZ * (10.0f32.powf(mel / HTK_MEL_SCALE) - 1.0),
        MelScale::Slaney => {
            if mel < SLANEY_BREAK_MEL {
                SLANEY_F_STEP * mel
            } else {
                SLANEY_BREAK_HZ * ((mel - SLANEY_BREAK_MEL) * SLANEY_LOG_STEP).exp()
            }
        }
    }
}

/// Fixed `[n_mels, n_fft/2 + 1]` matrix mapping spectrum bins to mel bands.
///
/// Weights are stored row-major; rows are triangles peaking at 1.0 at the
/// band's center bin (before normalization).
pub struct MelFilterbank {
    n_mels: usize,
    n_bins: usize,
    weights: Vec<f32>,
}

impl MelFilterbank {
    /// Build the filterbank for the given geometry.
    pub fn new(sample_rate: f32, n_fft: usize, cfg: &MelConfig) -> Result<Self> {
        cfg.validate(sample_rate)?;
        if n_fft < 2 {
            return Err(FeatureError::InvalidConfig {
                param: "n_fft",
                value: n_fft.to_string(),
                reason: "must be at least 2",
            });
        }
        let n_bins = n_fft / 2 + 1;

        // n_mels + 2 equally spaced points on the mel axis, back to Hz,
        // then to spectrum bin indices
        let mel_lo = hz_to_mel(cfg.fmin, cfg.scale);
        let mel_hi = hz_to_mel(cfg.fmax, cfg.scale);
        let hz: Vec<f32> = (0..cfg.n_mels + 2)
            .map(|i| {
                let mel = mel_lo + (mel_hi - mel_lo) * i as f32 / (cfg.n_mels + 1) as f32;
                mel_to_hz(mel, cfg.scale)
            })
            .collect();
        let bin: Vec<usize> = hz
            .iter()
            .map(|&f| (((n_fft + 1) as f32 * f / sample_rate).floor() as usize).min(n_bins - 1))
            .collect();

        let mut weights = vec![0.0f32; cfg.n_mels * n_bins];
        let mut empty_rows = 0usize;
        for m in 0..cfg.n_mels {
            let (left, center, right) = (bin[m], bin[m + 1], bin[m + 2]);
            let row = &mut weights[m * n_bins..(m + 1) * n_bins];

            for k in left..center {
                row[k] = (k - left) as f32 / (center - left) as f32;
            }
            row[center] = 1.0;
            for k in center + 1..=right {
                row[k] = (right - k) as f32 / (right - center) as f32;
            }

            if let FilterbankNorm::Slaney = cfg.norm {
                let bandwidth = hz[m + 2] - hz[m];
                if bandwidth > 0.0 {
                    let area_inv = 2.0 / bandwidth;
                    for w in row.iter_mut() {
                        *w *= area_inv;
                    }
                }
            }
            if left == right {
                empty_rows += 1;
            }
        }
        if empty_rows > 0 {
            log::warn!(
                "mel filterbank: {empty_rows} of {} bands collapse to a single bin; \
                 n_mels is likely too large for n_fft={n_fft}",
                cfg.n_mels
            );
        }

        Ok(Self {
            n_mels: cfg.n_mels,
            n_bins,
            weights,
        })
    }

    /// Number of mel bands.
    #[inline]
    pub const fn n_mels(&self) -> usize {
        self.n_mels
    }

    /// Number of spectrum bins each row spans (`n_fft/2 + 1`).
    #[inline]
    pub const fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// The full weight matrix, row-major `[n_mels, n_bins]`.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// One band's weights over the spectrum bins.
    #[inline]
    pub fn row(&self, m: usize) -> &[f32] {
        &self.weights[m * self.n_bins..(m + 1) * self.n_bins]
    }

    /// Project a power/magnitude spectrum onto the mel bands.
    pub fn apply(&self, spectrum: &[f32]) -> Vec<f32> {
        debug_assert_eq!(spectrum.len(), self.n_bins);
        (0..self.n_mels)
            .map(|m| {
                self.row(m)
                    .iter()
                    .zip(spectrum)
                    .map(|(w, p)| w * p)
                    .sum::<f32>()
            })
            .collect()
    }
}

/* --------------------------------------------------------------------- */
/*  Unit-tests                                                           */

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(n_mels: usize, scale: MelScale, norm: FilterbankNorm) -> MelConfig {
        MelConfig {
            n_mels,
            fmin: 0.0,
            fmax: 8000.0,
            power: 2.0,
            scale,
            norm,
        }
    }

    #[test]
    fn htk_conversions_round_trip() {
        for hz in [0.0f32, 120.0, 700.0, 1000.0, 4000.0, 7999.0] {
            let back = mel_to_hz(hz_to_mel(hz, MelScale::Htk), MelScale::Htk);
            assert!((back - hz).abs() < 0.5, "{hz} -> {back}");
        }
        // calibration point: 1 kHz is ~1000 mel under HTK
        assert!((hz_to_mel(1000.0, MelScale::Htk) - 1000.0).abs() < 1.0);
    }

    #[test]
    fn slaney_conversions_round_trip_across_the_break() {
        for hz in [0.0f32, 500.0, 999.0, 1000.0, 1001.0, 6000.0] {
            let back = mel_to_hz(hz_to_mel(hz, MelScale::Slaney), MelScale::Slaney);
            assert!((back - hz).abs() < 0.5, "{hz} -> {back}");
        }
        // linear region: 200/3 Hz per mel
        assert!((hz_to_mel(200.0, MelScale::Slaney) - 3.0).abs() < 1e-3);
        assert!((hz_to_mel(1000.0, MelScale::Slaney) - 15.0).abs() < 1e-3);
    }

    #[test]
    fn unnormalized_rows_peak_at_exactly_one() {
        for scale in [MelScale::Htk, MelScale::Slaney] {
            let fb =
                MelFilterbank::new(16_000.0, 512, &cfg(40, scale, FilterbankNorm::None)).unwrap();
            for m in 0..fb.n_mels() {
                let peak = fb.row(m).iter().cloned().fold(0.0f32, f32::max);
                assert!((peak - 1.0).abs() < 1e-6, "band {m} peaks at {peak}");
            }
        }
    }

    #[test]
    fn slaney_normalized_rows_have_unit_area_in_hz() {
        let sr = 16_000.0f32;
        let n_fft = 1024usize;
        let fb = MelFilterbank::new(sr, n_fft, &cfg(20, MelScale::Slaney, FilterbankNorm::Slaney))
            .unwrap();
        let hz_per_bin = sr / (n_fft + 1) as f32;
        let mut mean_area = 0.0f32;
        for m in 0..fb.n_mels() {
            let area: f32 = fb.row(m).iter().sum::<f32>() * hz_per_bin;
            // bin quantization of the band edges bounds the per-row error
            assert!((0.8..1.2).contains(&area), "band {m} area {area}");
            mean_area += area;
        }
        mean_area /= fb.n_mels() as f32;
        assert!((mean_area - 1.0).abs() < 0.05, "mean area {mean_area}");
    }

    #[test]
    fn scale_and_norm_axes_are_independent() {
        // the four combinations produce four distinct matrices
        let variants: Vec<Vec<f32>> = [
            (MelScale::Htk, FilterbankNorm::None),
            (MelScale::Htk, FilterbankNorm::Slaney),
            (MelScale::Slaney, FilterbankNorm::None),
            (MelScale::Slaney, FilterbankNorm::Slaney),
        ]
        .into_iter()
        .map(|(scale, norm)| {
            MelFilterbank::new(16_000.0, 512, &cfg(40, scale, norm))
                .unwrap()
                .weights()
                .to_vec()
        })
        .collect();

        for i in 0..variants.len() {
            for j in i + 1..variants.len() {
                assert_ne!(variants[i], variants[j], "variants {i} and {j} collide");
            }
        }
    }

    #[test]
    fn rows_cover_only_their_triangle() {
        let fb =
            MelFilterbank::new(16_000.0, 512, &cfg(40, MelScale::Htk, FilterbankNorm::None))
                .unwrap();
        // every row is non-negative and supported on a contiguous bin range
        for m in 0..fb.n_mels() {
            let row = fb.row(m);
            assert!(row.iter().all(|&w| w >= 0.0));
            let first = row.iter().position(|&w| w > 0.0).unwrap();
            let last = row.iter().rposition(|&w| w > 0.0).unwrap();
            assert!(row[first..=last].iter().all(|&w| w > 0.0));
        }
    }

    #[test]
    fn projection_weights_energy_into_the_right_band() {
        let fb =
            MelFilterbank::new(16_000.0, 512, &cfg(40, MelScale::Htk, FilterbankNorm::None))
                .unwrap();
        // single-bin impulse lands only in bands whose triangle covers it
        let mut spectrum = vec![0.0f32; fb.n_bins()];
        spectrum[64] = 2.0;
        let bands = fb.apply(&spectrum);
        assert_eq!(bands.len(), 40);
        let hot = bands.iter().filter(|&&e| e > 0.0).count();
        assert!(hot >= 1 && hot <= 3, "impulse lit {hot} bands");
    }
}
