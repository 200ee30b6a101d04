//! Mel-spectrogram: the short-time power spectrum projected through the
//! mel filterbank, plus decibel conversion helpers.

use num_complex::Complex32;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::FeatureConfig;
use crate::constants::DB_AMIN;
use crate::error::Result;
use crate::mel::MelFilterbank;

/// Raise a complex bin to the configured spectrum exponent.
#[inline]
fn bin_power(c: &Complex32, power: f32) -> f32 {
    if power == 2.0 {
        c.norm_sqr()
    } else if power == 1.0 {
        c.norm()
    } else {
        c.norm().powf(power)
    }
}

/// Project per-frame spectra onto mel bands, returning `[n_mels][n_frames]`.
///
/// Frames are independent; with the `parallel` feature the projection fans
/// out across worker threads and the indexed collect keeps frame order.
pub(crate) fn project(
    spectra: &[Vec<Complex32>],
    filterbank: &MelFilterbank,
    power: f32,
) -> Vec<Vec<f32>> {
    let frame_energies = |spectrum: &Vec<Complex32>| -> Vec<f32> {
        let mags: Vec<f32> = spectrum.iter().map(|c| bin_power(c, power)).collect();
        filterbank.apply(&mags)
    };

    #[cfg(feature = "parallel")]
    let columns: Vec<Vec<f32>> = spectra.par_iter().map(frame_energies).collect();
    #[cfg(not(feature = "parallel"))]
    let columns: Vec<Vec<f32>> = spectra.iter().map(frame_energies).collect();

    // transpose the per-frame energies into band-major rows
    let n_frames = columns.len();
    let mut out = vec![vec![0.0f32; n_frames]; filterbank.n_mels()];
    for (t, column) in columns.iter().enumerate() {
        for (m, &e) in column.iter().enumerate() {
            out[m][t] = e;
        }
    }
    out
}

/// One-shot mel-spectrogram of `samples` under `cfg`.
///
/// Output is `[n_mels][n_frames]` and non-negative; silent frames produce
/// values at or near zero, which is expected rather than an error. Use a
/// [`crate::FeatureExtractor`] when processing many buffers with one config.
pub fn mel_spectrogram(samples: &[f32], cfg: &FeatureConfig) -> Result<Vec<Vec<f32>>> {
    crate::FeatureExtractor::new(cfg.clone())?.mel_spectrogram(samples)
}

/// Convert a non-negative power matrix to decibels referenced to its
/// maximum, flooring the dynamic range at `max - top_db`.
pub fn power_to_db(matrix: &[Vec<f32>], top_db: f32) -> Vec<Vec<f32>> {
    let max = matrix
        .iter()
        .flatten()
        .fold(DB_AMIN, |acc, &v| acc.max(v));
    let ref_db = 10.0 * max.log10();
    matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| (10.0 * v.max(DB_AMIN).log10() - ref_db).max(-top_db))
                .collect()
        })
        .collect()
}

/* --------------------------------------------------------------------- */
/*  Unit-tests                                                           */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterbankNorm, MelConfig, MelScale};

    fn filterbank() -> MelFilterbank {
        MelFilterbank::new(
            16_000.0,
            512,
            &MelConfig {
                n_mels: 20,
                fmin: 0.0,
                fmax: 8000.0,
                power: 2.0,
                scale: MelScale::Slaney,
                norm: FilterbankNorm::Slaney,
            },
        )
        .unwrap()
    }

    #[test]
    fn projection_is_band_major_and_non_negative() {
        let fb = filterbank();
        let spectra: Vec<Vec<Complex32>> = (0..7)
            .map(|t| {
                (0..257)
                    .map(|k| Complex32::new((t * k) as f32 * 0.01 - 0.5, 0.3))
                    .collect()
            })
            .collect();
        let mel = project(&spectra, &fb, 2.0);
        assert_eq!(mel.len(), 20);
        assert_eq!(mel[0].len(), 7);
        assert!(mel.iter().flatten().all(|&v| v >= 0.0));
    }

    #[test]
    fn magnitude_and_power_exponents_differ() {
        let fb = filterbank();
        let spectra = vec![vec![Complex32::new(2.0, 0.0); 257]];
        let p1 = project(&spectra, &fb, 1.0);
        let p2 = project(&spectra, &fb, 2.0);
        for (a, b) in p1.iter().flatten().zip(p2.iter().flatten()) {
            assert!((b - 2.0 * a).abs() < 1e-4, "power=2 should double {a}");
        }
    }

    #[test]
    fn power_to_db_is_zero_at_the_peak_and_floored_below() {
        let matrix = vec![vec![1.0f32, 0.1, 0.0]];
        let db = power_to_db(&matrix, 80.0);
        assert!((db[0][0] - 0.0).abs() < 1e-6);
        assert!((db[0][1] + 10.0).abs() < 1e-4);
        assert!((db[0][2] + 80.0).abs() < 1e-6, "silence clamps to -top_db");
    }
}
