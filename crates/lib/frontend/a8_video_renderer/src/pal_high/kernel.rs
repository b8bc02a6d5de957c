/*
    A8Video
    Atari 8-bit video pipeline

    Copyright 2022-2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    ---------------------------------------------------------------------------

    a8_video_renderer::pal_high::kernel.rs

    Fixed capacity FIR kernels and the algebra used to derive the composite
    decoding tables.

    A kernel is a run of coefficients starting at a (possibly negative) time
    offset. Operations never allocate, and results longer than KERNEL_MAX_TAPS
    are truncated.
*/

pub const KERNEL_MAX_TAPS: usize = 96;

/// Coefficient `A` of the cubic convolution used for resampling.
const BICUBIC_A: f32 = -0.75;

#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    offset: i32,
    size: usize,
    coeffs: [f32; KERNEL_MAX_TAPS],
}

impl Default for Kernel {
    fn default() -> Self {
        Self::zero()
    }
}

#[inline]
fn cubic(x: f32) -> f32 {
    let x = x.abs();
    if x < 1.0 {
        ((BICUBIC_A + 2.0) * x - (BICUBIC_A + 3.0)) * x * x + 1.0
    }
    else if x < 2.0 {
        ((BICUBIC_A * x - 5.0 * BICUBIC_A) * x + 8.0 * BICUBIC_A) * x - 4.0 * BICUBIC_A
    }
    else {
        0.0
    }
}

impl Kernel {
    pub const fn zero() -> Self {
        Self {
            offset: 0,
            size: 0,
            coeffs: [0.0; KERNEL_MAX_TAPS],
        }
    }

    pub fn new(offset: i32, coeffs: &[f32]) -> Self {
        let mut k = Self::zero();
        k.offset = offset;
        k.size = coeffs.len().min(KERNEL_MAX_TAPS);
        k.coeffs[..k.size].copy_from_slice(&coeffs[..k.size]);
        k
    }

    #[inline]
    pub fn offset(&self) -> i32 {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// One past the time of the last coefficient.
    #[inline]
    pub fn end(&self) -> i32 {
        self.offset + self.size as i32
    }

    #[inline]
    pub fn coeffs(&self) -> &[f32] {
        &self.coeffs[..self.size]
    }

    /// Coefficient at time `t`, zero outside the kernel.
    #[inline]
    pub fn at(&self, t: i32) -> f32 {
        let i = t - self.offset;
        if i < 0 || i as usize >= self.size {
            0.0
        }
        else {
            self.coeffs[i as usize]
        }
    }

    pub fn sum(&self) -> f32 {
        self.coeffs().iter().sum()
    }

    pub fn shift(&self, n: i32) -> Self {
        let mut k = self.clone();
        k.offset += n;
        k
    }

    pub fn scale(&self, factor: f32) -> Self {
        let mut k = self.clone();
        k.coeffs[..k.size].iter_mut().for_each(|c| *c *= factor);
        k
    }

    pub fn convolve(&self, other: &Kernel) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::zero();
        }
        let mut k = Self::zero();
        k.offset = self.offset + other.offset;
        k.size = (self.size + other.size - 1).min(KERNEL_MAX_TAPS);

        for (i, &a) in self.coeffs().iter().enumerate() {
            for (j, &b) in other.coeffs().iter().enumerate() {
                if i + j < k.size {
                    k.coeffs[i + j] += a * b;
                }
            }
        }
        k
    }

    pub fn add(&self, other: &Kernel) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let start = self.offset.min(other.offset);
        let end = self.end().max(other.end());
        let mut k = Self::zero();
        k.offset = start;
        k.size = ((end - start) as usize).min(KERNEL_MAX_TAPS);
        for i in 0..k.size {
            let t = start + i as i32;
            k.coeffs[i] = self.at(t) + other.at(t);
        }
        k
    }

    pub fn sub(&self, other: &Kernel) -> Self {
        self.add(&other.scale(-1.0))
    }

    /// Multiply every coefficient by a periodic carrier. The carrier sample for time `t` is
    /// `carrier[(t + phase) mod carrier.len()]`.
    pub fn modulate(&self, carrier: &[f32], phase: i32) -> Self {
        if carrier.is_empty() {
            return Self::zero();
        }
        let period = carrier.len() as i32;
        let mut k = self.clone();
        for (i, c) in k.coeffs[..k.size].iter_mut().enumerate() {
            let t = self.offset + i as i32 + phase;
            *c *= carrier[t.rem_euclid(period) as usize];
        }
        k
    }

    /// Resample onto a new time grid with cubic convolution. Output tap `i` is the kernel
    /// evaluated at `offset + i * step`, multiplied by `scale`.
    pub fn sample_bicubic(&self, offset: f32, step: f32, scale: f32) -> Self {
        if self.is_empty() || step <= 0.0 {
            return Self::zero();
        }
        let first = ((self.offset as f32 - 2.0 - offset) / step).ceil() as i32;
        let last = ((self.end() as f32 + 1.0 - offset) / step).floor() as i32;

        let mut k = Self::zero();
        k.offset = first;
        k.size = ((last - first + 1).max(0) as usize).min(KERNEL_MAX_TAPS);
        for i in 0..k.size {
            let pos = offset + (first + i as i32) as f32 * step;
            let base = pos.floor();
            let frac = pos - base;
            let t = base as i32;
            let v = self.at(t - 1) * cubic(1.0 + frac)
                + self.at(t) * cubic(frac)
                + self.at(t + 1) * cubic(1.0 - frac)
                + self.at(t + 2) * cubic(2.0 - frac);
            k.coeffs[i] = v * scale;
        }
        k
    }

    /// Decimate: output tap `i` is the coefficient at time `offset + i * step`.
    pub fn sample_point(&self, offset: i32, step: i32) -> Self {
        if self.is_empty() || step <= 0 {
            return Self::zero();
        }
        let first = -(offset - self.offset).div_euclid(step);
        let last = (self.end() - 1 - offset).div_euclid(step);

        let mut k = Self::zero();
        k.offset = first;
        k.size = ((last - first + 1).max(0) as usize).min(KERNEL_MAX_TAPS);
        for i in 0..k.size {
            k.coeffs[i] = self.at(offset + (first + i as i32) * step);
        }
        k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn convolve_boxes_gives_triangle() {
        let a = Kernel::new(-1, &[1.0, 1.0]);
        let b = Kernel::new(3, &[1.0, 1.0]);
        let c = a.convolve(&b);
        assert_eq!(c.offset(), 2);
        assert_eq!(c.coeffs(), &[1.0, 2.0, 1.0]);
    }

    #[test]
    fn convolve_truncates_at_capacity() {
        let a = Kernel::new(0, &[1.0; 60]);
        let c = a.convolve(&a);
        assert_eq!(c.len(), KERNEL_MAX_TAPS);
        assert_eq!(c.at(59), 60.0);
        assert_eq!(c.at(KERNEL_MAX_TAPS as i32), 0.0);
        assert_eq!(Kernel::new(0, &[1.0; 200]).len(), KERNEL_MAX_TAPS);
    }

    #[test]
    fn add_and_sub_cover_union() {
        let a = Kernel::new(0, &[1.0, 2.0]);
        let b = Kernel::new(4, &[3.0]);
        let s = a.add(&b);
        assert_eq!(s.offset(), 0);
        assert_eq!(s.coeffs(), &[1.0, 2.0, 0.0, 0.0, 3.0]);
        let d = s.sub(&a);
        assert_eq!(d.coeffs(), &[0.0, 0.0, 0.0, 0.0, 3.0]);
        assert_eq!(Kernel::zero().add(&b), b);
    }

    #[test]
    fn shift_and_scale() {
        let k = Kernel::new(2, &[1.0, -2.0]).shift(-5).scale(0.5);
        assert_eq!(k.offset(), -3);
        assert_eq!(k.coeffs(), &[0.5, -1.0]);
        assert!(approx(k.sum(), -0.5));
    }

    #[test]
    fn modulate_wraps_negative_time() {
        let carrier = [1.0, 0.0, -1.0, 0.0];
        let k = Kernel::new(-2, &[1.0; 4]).modulate(&carrier, 0);
        // Times -2, -1, 0, 1 map to carrier slots 2, 3, 0, 1.
        assert_eq!(k.coeffs(), &[-1.0, 0.0, 1.0, 0.0]);
        let k = Kernel::new(0, &[1.0; 2]).modulate(&carrier, 2);
        assert_eq!(k.coeffs(), &[-1.0, 0.0]);
    }

    #[test]
    fn bicubic_preserves_constants_and_samples_exactly_on_grid() {
        let flat = Kernel::new(0, &[1.0; 40]);
        let s = flat.sample_bicubic(2.5, 5.0, 1.0);
        for i in 1..6 {
            assert!(approx(s.at(i), 1.0), "tap {} = {}", i, s.at(i));
        }

        let ramp: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let r = Kernel::new(0, &ramp).sample_bicubic(0.0, 1.0, 2.0);
        for t in 2..8 {
            assert!(approx(r.at(t), 2.0 * t as f32));
        }
    }

    #[test]
    fn point_sampling_decimates() {
        let ramp: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let k = Kernel::new(3, &ramp);
        let p = k.sample_point(1, 4);
        // Coefficients live at times 3..=12, so only times 5 and 9 of the 1 + 4i grid land.
        assert_eq!(p.offset(), 1);
        assert_eq!(p.coeffs(), &[2.0, 6.0]);
    }
}
