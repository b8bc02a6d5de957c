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

    a8_video_renderer::pal_high::tables.rs

    Builds the per-colour decoding tables of the PAL high artifact engine.

    The composite signal is modelled at 8x the PAL subcarrier frequency. A hi-res
    pixel lasts 5 ticks and the subcarrier 8 ticks, so the carrier phase under a
    pixel repeats every 8 pixels. For each of those 8 phases the table records
    what a single pixel of each colour contributes to the decoded Y, U and V of
    the surrounding output pixels. Rendering a line is then a sum of table rows.

    Table words pack two adjacent output pixels as 16-bit lanes. Contributions are
    signed; the accumulators start at 0x4000 per lane so that the lane sums stay
    positive and the lanes never borrow from each other.
*/

use super::kernel::Kernel;
use crate::color::YuvEntry;

pub const PHASES: usize = 8;
/// Output words (pixel pairs) touched by one source pixel in the luma pass.
pub const LUMA_TAPS: usize = 4;
/// Output words touched by one source pixel in each chroma pass.
pub const CHROMA_TAPS: usize = 12;
/// Word of the first luma tap, relative to the word holding the source pixel.
pub const LUMA_FIRST_WORD: i32 = -1;
/// Word of the first chroma tap, relative to the word holding the source pixel.
pub const CHROMA_FIRST_WORD: i32 = -5;

/// Fixed-point value of a full-scale (1.0) component.
pub const TABLE_SCALE: f32 = 64.0 * 255.0;
pub const LANE_BIAS: i32 = 0x4000;
pub const WORD_BIAS: u32 = 0x4000_4000;

const TICKS_PER_PIXEL: i32 = 5;
/// Centre of output pixel 0 on the tick grid.
const PIXEL_CENTRE: f32 = 2.5;
/// Chroma is stored at half amplitude; the delay line adds two lines back together.
const CHROMA_SCALE: f32 = 0.5;

const S: f32 = std::f32::consts::FRAC_1_SQRT_2;
const CARRIER_COS: [f32; 8] = [1.0, S, 0.0, -S, -1.0, -S, 0.0, S];
const CARRIER_SIN: [f32; 8] = [0.0, S, 1.0, S, 0.0, -S, -1.0, -S];
const DEMOD_COS: [f32; 8] = [2.0, 2.0 * S, 0.0, -2.0 * S, -2.0, -2.0 * S, 0.0, 2.0 * S];
const DEMOD_SIN: [f32; 8] = [0.0, 2.0 * S, 2.0, 2.0 * S, 0.0, -2.0 * S, -2.0, -2.0 * S];

// Luma low-pass: an 8-tick box smoothed by a 2-tick box. Nulls the subcarrier.
#[rustfmt::skip]
const LUMA_FIR: [f32; 9] = [
    1.0 / 16.0, 2.0 / 16.0, 2.0 / 16.0, 2.0 / 16.0, 2.0 / 16.0,
    2.0 / 16.0, 2.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0,
];
const LUMA_FIR_OFFSET: i32 = -4;

// Chroma low-pass: two 12-tick boxes. Nulls the 2x subcarrier product left by demodulation.
#[rustfmt::skip]
const CHROMA_FIR: [f32; 23] = [
     1.0 / 144.0,  2.0 / 144.0,  3.0 / 144.0,  4.0 / 144.0,  5.0 / 144.0,  6.0 / 144.0,
     7.0 / 144.0,  8.0 / 144.0,  9.0 / 144.0, 10.0 / 144.0, 11.0 / 144.0, 12.0 / 144.0,
    11.0 / 144.0, 10.0 / 144.0,  9.0 / 144.0,  8.0 / 144.0,  7.0 / 144.0,  6.0 / 144.0,
     5.0 / 144.0,  4.0 / 144.0,  3.0 / 144.0,  2.0 / 144.0,  1.0 / 144.0,
];
const CHROMA_FIR_OFFSET: i32 = -11;

/// Decoding kernels of a pixel at one phase, on the output pixel grid. Index 0 is the
/// response to the pixel's luma, 1 to its U component and 2 to its V component.
#[derive(Clone, Debug)]
pub struct PhaseKernels {
    pub to_y: [Kernel; 3],
    pub to_u: [Kernel; 3],
    pub to_v: [Kernel; 3],
}

impl PhaseKernels {
    pub fn new(phase: usize) -> Self {
        let pixel = Kernel::new(0, &[1.0; TICKS_PER_PIXEL as usize]).shift(phase as i32 * TICKS_PER_PIXEL);
        let sources = [
            pixel.clone(),
            pixel.modulate(&CARRIER_COS, 0),
            pixel.modulate(&CARRIER_SIN, 0),
        ];

        let luma_fir = Kernel::new(LUMA_FIR_OFFSET, &LUMA_FIR);
        let chroma_fir = Kernel::new(CHROMA_FIR_OFFSET, &CHROMA_FIR);

        let decode = |signal: &Kernel| {
            let luma = luma_fir.convolve(signal);
            let chroma = signal.sub(&luma);
            let y = luma.sample_bicubic(PIXEL_CENTRE, TICKS_PER_PIXEL as f32, 1.0);
            let u = chroma_fir
                .convolve(&chroma.modulate(&DEMOD_COS, 0))
                .sample_bicubic(PIXEL_CENTRE, TICKS_PER_PIXEL as f32, CHROMA_SCALE);
            let v = chroma_fir
                .convolve(&chroma.modulate(&DEMOD_SIN, 0))
                .sample_bicubic(PIXEL_CENTRE, TICKS_PER_PIXEL as f32, CHROMA_SCALE);
            (y, u, v)
        };

        let (y0, u0, v0) = decode(&sources[0]);
        let (y1, u1, v1) = decode(&sources[1]);
        let (y2, u2, v2) = decode(&sources[2]);
        Self {
            to_y: [y0, y1, y2],
            to_u: [u0, u1, u2],
            to_v: [v0, v1, v2],
        }
    }
}

/// Rounds table values to integers, pushing the rounding error of each output pixel
/// onto the next one. The error buffer is indexed by output pixel modulo 8 and carries
/// over from one table entry to the next.
struct ErrorDiffuser {
    err: [f32; PHASES],
}

impl ErrorDiffuser {
    fn new() -> Self {
        Self { err: [0.0; PHASES] }
    }

    #[inline]
    fn quantize(&mut self, pixel: i32, value: f32) -> i32 {
        let i = pixel.rem_euclid(PHASES as i32) as usize;
        let v = value + self.err[i];
        let q = v.round();
        self.err[i] = 0.0;
        self.err[(i + 1) % PHASES] += v - q;
        q as i32
    }
}

#[inline(always)]
pub fn pack_lanes(lo: i32, hi: i32) -> u32 {
    (lo as u32).wrapping_add((hi as u32) << 16)
}

/// Signed value of one lane of an accumulated (biased) word.
#[inline(always)]
pub fn lane(word: u32, lane: usize) -> i32 {
    ((word >> (16 * (lane & 1))) & 0xFFFF) as i32 - LANE_BIAS
}

#[inline]
pub fn luma_index(parity: usize, color: usize, phase: usize) -> usize {
    ((parity * 256 + color) * PHASES + phase) * LUMA_TAPS
}

#[inline]
pub fn chroma_index(parity: usize, color: usize, phase: usize) -> usize {
    ((parity * 256 + color) * PHASES + phase) * CHROMA_TAPS
}

/// `to_y/to_u/to_v[parity][color][phase][tap]`, flattened.
#[derive(Clone, PartialEq, Eq)]
pub struct ArtifactTables {
    pub to_y: Box<[u32]>,
    pub to_u: Box<[u32]>,
    pub to_v: Box<[u32]>,
}

impl ArtifactTables {
    pub fn build(yuv: &[YuvEntry; 256]) -> Self {
        let mut diffusers = [ErrorDiffuser::new(), ErrorDiffuser::new(), ErrorDiffuser::new()];
        Self::build_with(yuv, &mut diffusers)
    }

    /// Build with the given Y, U and V diffusers, which are left holding the error still
    /// pending at the end of the build.
    fn build_with(yuv: &[YuvEntry; 256], diffusers: &mut [ErrorDiffuser; 3]) -> Self {
        let kernels: Vec<PhaseKernels> = (0..PHASES).map(PhaseKernels::new).collect();

        let mut to_y = vec![0u32; 2 * 256 * PHASES * LUMA_TAPS];
        let mut to_u = vec![0u32; 2 * 256 * PHASES * CHROMA_TAPS];
        let mut to_v = vec![0u32; 2 * 256 * PHASES * CHROMA_TAPS];
        let [diffuse_y, diffuse_u, diffuse_v] = diffusers;

        for parity in 0..2 {
            for (color, e) in yuv.iter().enumerate() {
                let components = [e.y as f32, e.u(parity) as f32, e.v(parity) as f32];
                for (phase, pk) in kernels.iter().enumerate() {
                    // First pixel of the word holding this phase's pixel.
                    let word_pixel = (phase & !1) as i32;

                    let li = luma_index(parity, color, phase);
                    write_taps(
                        &mut to_y[li..li + LUMA_TAPS],
                        &pk.to_y,
                        &components,
                        word_pixel + 2 * LUMA_FIRST_WORD,
                        diffuse_y,
                    );

                    let ci = chroma_index(parity, color, phase);
                    write_taps(
                        &mut to_u[ci..ci + CHROMA_TAPS],
                        &pk.to_u,
                        &components,
                        word_pixel + 2 * CHROMA_FIRST_WORD,
                        diffuse_u,
                    );
                    write_taps(
                        &mut to_v[ci..ci + CHROMA_TAPS],
                        &pk.to_v,
                        &components,
                        word_pixel + 2 * CHROMA_FIRST_WORD,
                        diffuse_v,
                    );
                }
            }
        }

        Self {
            to_y: to_y.into_boxed_slice(),
            to_u: to_u.into_boxed_slice(),
            to_v: to_v.into_boxed_slice(),
        }
    }
}

/// Unquantized table value of output pixel `p` for a pixel with the given Y, U, V.
#[inline]
fn tap_value(kernels: &[Kernel; 3], components: &[f32; 3], p: i32) -> f32 {
    let v = components[0] * kernels[0].at(p) + components[1] * kernels[1].at(p) + components[2] * kernels[2].at(p);
    v * TABLE_SCALE
}

fn write_taps(out: &mut [u32], kernels: &[Kernel; 3], components: &[f32; 3], first_pixel: i32, diffuser: &mut ErrorDiffuser) {
    for (j, word) in out.iter_mut().enumerate() {
        let p0 = first_pixel + 2 * j as i32;
        let [lo, hi] = [p0, p0 + 1].map(|p| diffuser.quantize(p, tap_value(kernels, components, p)));
        *word = pack_lanes(lo, hi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorDecoder;
    use a8_common::TvSystem;

    #[test]
    fn table_build_is_idempotent() {
        let decoder = ColorDecoder::new(TvSystem::Pal);
        let a = ArtifactTables::build(decoder.yuv_table());
        let b = ArtifactTables::build(decoder.yuv_table());
        assert!(a == b);
    }

    #[test]
    fn rounding_error_carries_across_entries() {
        let decoder = ColorDecoder::new(TvSystem::Pal);
        let yuv = decoder.yuv_table();
        let mut diffusers = [ErrorDiffuser::new(), ErrorDiffuser::new(), ErrorDiffuser::new()];
        let tables = ArtifactTables::build_with(yuv, &mut diffusers);
        assert!(tables == ArtifactTables::build(yuv));

        // Sum every value handed to the luma quantizer, in build order.
        let kernels: Vec<PhaseKernels> = (0..PHASES).map(PhaseKernels::new).collect();
        let mut exact = 0.0f64;
        for parity in 0..2 {
            for e in yuv.iter() {
                let components = [e.y as f32, e.u(parity) as f32, e.v(parity) as f32];
                for (phase, pk) in kernels.iter().enumerate() {
                    let first = (phase & !1) as i32 + 2 * LUMA_FIRST_WORD;
                    for p in first..first + 2 * LUMA_TAPS as i32 {
                        exact += tap_value(&pk.to_y, &components, p) as f64;
                    }
                }
            }
        }

        let quantized: i64 = tables
            .to_y
            .iter()
            .map(|&w| {
                let w = WORD_BIAS.wrapping_add(w);
                (lane(w, 0) + lane(w, 1)) as i64
            })
            .sum();
        let pending: f64 = diffusers[0].err.iter().map(|&e| e as f64).sum();

        // Nothing is dropped between entries: what was not emitted is still pending.
        assert!(
            (quantized as f64 + pending - exact).abs() < 1.0,
            "quantized {} pending {} exact {}",
            quantized,
            pending,
            exact
        );
        assert!(diffusers[0].err.iter().all(|e| e.abs() < 8.0));
    }

    #[test]
    fn packed_lanes_sum_independently() {
        let w = WORD_BIAS
            .wrapping_add(pack_lanes(-100, 300))
            .wrapping_add(pack_lanes(50, -700))
            .wrapping_add(pack_lanes(-3, 2));
        assert_eq!(lane(w, 0), -53);
        assert_eq!(lane(w, 1), -398);
    }

    #[test]
    fn flat_field_decodes_to_its_colour() {
        // Summing every phase's contribution at one output pixel reproduces a flat field.
        let kernels: Vec<PhaseKernels> = (0..PHASES).map(PhaseKernels::new).collect();
        let (y, u, v) = (0.6f32, 0.1f32, -0.2f32);
        let target = 12;
        let mut sum = [0.0f32; 3];
        for pixel in 0..32i32 {
            let pk = &kernels[pixel as usize % PHASES];
            // The kernels are built for the first period; shift the target instead of the pixel.
            let t = target - (pixel / PHASES as i32) * PHASES as i32;
            for (out, k) in sum.iter_mut().zip([&pk.to_y, &pk.to_u, &pk.to_v]) {
                *out += y * k[0].at(t) + u * k[1].at(t) + v * k[2].at(t);
            }
        }
        assert!((sum[0] - y).abs() < 0.02, "y {}", sum[0]);
        assert!((sum[1] - u * 0.5).abs() < 0.02, "u {}", sum[1]);
        assert!((sum[2] - v * 0.5).abs() < 0.02, "v {}", sum[2]);
    }

    #[test]
    fn kernels_fit_their_tap_windows() {
        for phase in 0..PHASES {
            let pk = PhaseKernels::new(phase);
            let word_pixel = (phase & !1) as i32;
            let luma_lo = word_pixel + 2 * LUMA_FIRST_WORD;
            let luma_hi = luma_lo + 2 * LUMA_TAPS as i32;
            for k in &pk.to_y {
                assert!(k.offset() >= luma_lo && k.end() <= luma_hi, "phase {} luma", phase);
            }
            let chroma_lo = word_pixel + 2 * CHROMA_FIRST_WORD;
            let chroma_hi = chroma_lo + 2 * CHROMA_TAPS as i32;
            for k in pk.to_u.iter().chain(pk.to_v.iter()) {
                assert!(k.offset() >= chroma_lo && k.end() <= chroma_hi, "phase {} chroma", phase);
            }
        }
    }
}
