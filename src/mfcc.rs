//! Cepstral extraction: log compression, orthonormal DCT, liftering.

use std::f32::consts::PI;

use crate::config::FeatureConfig;
use crate::error::{FeatureError, Result};

/// Precomputed orthonormal DCT coefficient matrix, `n_out` rows over
/// `n_in` inputs. Types 2 (canonical for cepstra) and 3 are supported.
pub(crate) struct DctMatrix {
    coeffs: Vec<f32>,
    n_out: usize,
    n_in: usize,
}

impl DctMatrix {
    pub(crate) fn new(dct_type: u8, n_out: usize, n_in: usize) -> Result<Self> {
        let mut coeffs = vec![0.0f32; n_out * n_in];
        let n = n_in as f32;
        match dct_type {
            2 => {
                for i in 0..n_out {
                    let norm = if i == 0 {
                        (1.0 / n).sqrt()
                    } else {
                        (2.0 / n).sqrt()
                    };
                    for j in 0..n_in {
                        coeffs[i * n_in + j] =
                            norm * (PI * i as f32 * (j as f32 + 0.5) / n).cos();
                    }
                }
            }
            3 => {
                for i in 0..n_out {
                    for j in 0..n_in {
                        let norm = if j == 0 {
                            (1.0 / n).sqrt()
                        } else {
                            (2.0 / n).sqrt()
                        };
                        coeffs[i * n_in + j] =
                            norm * (PI * (i as f32 + 0.5) * j as f32 / n).cos();
                    }
                }
            }
            other => {
                return Err(FeatureError::InvalidConfig {
                    param: "dct_type",
                    value: other.to_string(),
                    reason: "only DCT types 2 and 3 are supported",
                });
            }
        }
        Ok(Self {
            coeffs,
            n_out,
            n_in,
        })
    }

    /// Multiply one input vector through the matrix.
    pub(crate) fn apply(&self, input: &[f32]) -> Vec<f32> {
        debug_assert_eq!(input.len(), self.n_in);
        (0..self.n_out)
            .map(|i| {
                self.coeffs[i * self.n_in..(i + 1) * self.n_in]
                    .iter()
                    .zip(input)
                    .map(|(c, x)| c * x)
                    .sum::<f32>()
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn row(&self, i: usize) -> &[f32] {
        &self.coeffs[i * self.n_in..(i + 1) * self.n_in]
    }
}

/// Sinusoidal lifter curve: coefficient `c_n` (n >= 1) is scaled by
/// `1 + (lifter/2) * sin(pi * n / lifter)`; `c_0` is never scaled and a
/// zero lifter disables the curve entirely.
pub(crate) fn lifter_weights(lifter: f32, n_mfcc: usize) -> Vec<f32> {
    (0..n_mfcc)
        .map(|n| {
            if n == 0 || lifter <= 0.0 {
                1.0
            } else {
                1.0 + 0.5 * lifter * (PI * n as f32 / lifter).sin()
            }
        })
        .collect()
}

/// One-shot MFCC matrix of `samples` under `cfg`, shaped
/// `[n_mfcc][n_frames]`. Use a [`crate::FeatureExtractor`] when processing
/// many buffers with one config.
pub fn mfcc(samples: &[f32], cfg: &FeatureConfig) -> Result<Vec<Vec<f32>>> {
    crate::FeatureExtractor::new(cfg.clone())?.mfcc(samples)
}

/* --------------------------------------------------------------------- */
/*  Unit-tests                                                           */
