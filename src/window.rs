//! Analysis windows, centered padding and frame geometry.
//!
//! Windows are generated in *periodic* form (denominator `N`, not `N-1`),
//! the convention the analysis/synthesis round-trip assumes.

use std::f32::consts::PI;

use crate::config::{PadMode, WindowKind};
use crate::error::{FeatureError, Result};

/// Generate `len` coefficients of the given window.
pub fn generate(kind: WindowKind, len: usize) -> Vec<f32> {
    match kind {
        WindowKind::Hann => (0..len)
            .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f32 / len as f32).cos())
            .collect(),
        WindowKind::Hamming => (0..len)
            .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f32 / len as f32).cos())
            .collect(),
        WindowKind::Blackman => (0..len)
            .map(|n| {
                let phase = 2.0 * PI * n as f32 / len as f32;
                0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
            })
            .collect(),
        WindowKind::Rectangular => vec![1.0; len],
    }
}

/// Zero-pad `window` centered into a buffer of `n_fft` coefficients.
///
/// Frames are always `n_fft` samples; a shorter analysis window sits in the
/// middle of the transform buffer so its taper stays aligned with the frame
/// center.
pub fn pad_center(window: &[f32], n_fft: usize) -> Vec<f32> {
    debug_assert!(window.len() <= n_fft);
    let offset = (n_fft - window.len()) / 2;
    let mut out = vec![0.0f32; n_fft];
    out[offset..offset + window.len()].copy_from_slice(window);
    out
}

/// Pad `samples` by `pad` values on each side.
pub(crate) fn pad_edges(samples: &[f32], pad: usize, mode: PadMode) -> Vec<f32> {
    let n = samples.len();
    let mut out = Vec::with_capacity(n + 2 * pad);
    match mode {
        PadMode::Zero => {
            out.resize(pad, 0.0);
            out.extend_from_slice(samples);
            out.resize(n + 2 * pad, 0.0);
        }
        PadMode::Reflect => {
            for i in 0..pad {
                out.push(samples[reflect_index(i as isize - pad as isize, n as isize)]);
            }
            out.extend_from_slice(samples);
            for i in 0..pad {
                out.push(samples[reflect_index((n + i) as isize, n as isize)]);
            }
        }
    }
    out
}

/// Fold an out-of-range position back into `0..n` by mirroring around the
/// endpoints (without repeating them). A one-sample signal maps everywhere
/// to index 0.
fn reflect_index(mut pos: isize, n: isize) -> usize {
    if n == 1 {
        return 0;
    }
    loop {
        if pos < 0 {
            pos = -pos;
        } else if pos >= n {
            pos = 2 * (n - 1) - pos;
        } else {
            return pos as usize;
        }
    }
}

/// Number of frames a buffer of `len` samples yields with the given
/// geometry: `1 + floor((len - n_fft) / hop)`.
///
/// Errors with [`FeatureError::InsufficientSamples`] when not even one frame
/// fits.
pub fn frame_count(len: usize, n_fft: usize, hop: usize) -> Result<usize> {
    if len < n_fft {
        return Err(FeatureError::InsufficientSamples {
            needed: n_fft,
            got: len,
        });
    }
    Ok(1 + (len - n_fft) / hop)
}

/* --------------------------------------------------------------------- */
/*  Unit-tests                                                           */
