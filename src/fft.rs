//! Iterative radix-2 Cooley–Tukey FFT over complex single-precision buffers.
//!
//! The transform is implemented in-crate: bit-reversal permutation followed
//! by in-place butterflies, with the twiddle factors and the permutation
//! table precomputed once per plan. Normalization convention: the forward
//! transform applies no scaling, the inverse applies `1/N`, so
//! `inverse(forward(x)) == x` to floating-point accuracy.

use num_complex::Complex32;

use crate::error::{FeatureError, Result};

/// Precomputed transform plan for a fixed power-of-two length.
///
/// Immutable after construction; transforms borrow `&self` and operate on
/// caller buffers, so one plan is safely shared across threads.
pub struct Radix2Fft {
    size: usize,
    /// Bit-reversal permutation, one entry per input index.
    rev: Vec<usize>,
    /// Forward twiddles `exp(-2*pi*i*k/N)` for `k` in `0..N/2`.
    twiddles: Vec<Complex32>,
}

impl Radix2Fft {
    /// Create a plan for transforms of length `size`.
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 || !size.is_power_of_two() {
            return Err(FeatureError::InvalidConfig {
                param: "n_fft",
                value: size.to_string(),
                reason: "transform length must be a power of two >= 2",
            });
        }
        let bits = size.trailing_zeros();
        let rev = (0..size)
            .map(|i| (i.reverse_bits() >> (usize::BITS - bits)))
            .collect();
        let twiddles = (0..size / 2)
            .map(|k| {
                let angle = -2.0 * std::f32::consts::PI * k as f32 / size as f32;
                Complex32::new(angle.cos(), angle.sin())
            })
            .collect();
        Ok(Self {
            size,
            rev,
            twiddles,
        })
    }

    /// Transform length.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Forward transform, in place. No scaling is applied.
    pub fn forward(&self, buf: &mut [Complex32]) {
        self.transform(buf, false);
    }

    /// Inverse transform, in place, scaled by `1/N`.
    pub fn inverse(&self, buf: &mut [Complex32]) {
        self.transform(buf, true);
        let scale = 1.0 / self.size as f32;
        for v in buf.iter_mut() {
            *v *= scale;
        }
    }

    /// Forward transform of a real frame, zero-padded to the plan length,
    /// returning the `N/2 + 1` non-redundant bins.
    pub fn forward_real(&self, frame: &[f32]) -> Vec<Complex32> {
        debug_assert!(frame.len() <= self.size);
        let mut buf: Vec<Complex32> = frame.iter().map(|&x| Complex32::new(x, 0.0)).collect();
        buf.resize(self.size, Complex32::ZERO);
        self.forward(&mut buf);
        buf.truncate(self.size / 2 + 1);
        buf
    }

    fn transform(&self, buf: &mut [Complex32], inverse: bool) {
        let n = self.size;
        assert_eq!(buf.len(), n, "buffer length must equal the plan size");

        // decimation-in-time reordering
        for i in 0..n {
            let j = self.rev[i];
            if i < j {
                buf.swap(i, j);
            }
        }

        let mut size = 2;
        while size <= n {
            let half = size / 2;
            let stride = n / size;
            for base in (0..n).step_by(size) {
                for j in 0..half {
                    let mut w = self.twiddles[j * stride];
                    if inverse {
                        w = w.conj();
                    }
                    let u = buf[base + j];
                    let t = w * buf[base + j + half];
                    buf[base + j] = u + t;
                    buf[base + j + half] = u - t;
                }
            }
            size <<= 1;
        }
    }
}

/* --------------------------------------------------------------------- */
/*  Unit-tests                                                           */
