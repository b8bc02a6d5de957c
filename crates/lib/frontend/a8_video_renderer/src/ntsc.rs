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

    a8_video_renderer::ntsc.rs

    NTSC composite filter.

    Re-creates the composite signal of a scanline at 4x the NTSC subcarrier, where a
    hi-res pixel is half a colour clock (2 ticks), and decodes it the way a
    television would. Luma is low-passed with a filter that nulls the subcarrier,
    chroma is demodulated and low-passed, and the decoded line is resampled to
    7 output pixels for every 4 input pixels. Hi-res patterns whose period matches
    the subcarrier come out as artifact colours.
*/

use a8_common::{PixelFormat, VideoGeometry};

use crate::{
    blit::{fixed_index, fixed_step, rows_available},
    color::{to_u8, ColorDecoder},
    consts::{CO_UB, CO_UG, CO_VG, CO_VR, MAX_LINE_WIDTH},
};

pub const NTSC_IN_CHUNK: u32 = 4;
pub const NTSC_OUT_CHUNK: u32 = 7;
pub const MAX_NTSC_WIDTH: usize = MAX_LINE_WIDTH / NTSC_IN_CHUNK as usize * NTSC_OUT_CHUNK as usize;

const TICKS_PER_PIXEL: usize = 2;
const MAX_TICKS: usize = MAX_LINE_WIDTH * TICKS_PER_PIXEL;
/// Ticks covered by one output pixel.
const TICKS_PER_OUTPUT: f32 = (NTSC_IN_CHUNK as usize * TICKS_PER_PIXEL) as f32 / NTSC_OUT_CHUNK as f32;

const CARRIER_COS: [f32; 4] = [1.0, 0.0, -1.0, 0.0];
const CARRIER_SIN: [f32; 4] = [0.0, 1.0, 0.0, -1.0];
const LUMA_FIR: [f32; 5] = [0.125, 0.25, 0.25, 0.25, 0.125];
const CHROMA_FIR: [f32; 7] = [
    1.0 / 16.0,
    2.0 / 16.0,
    3.0 / 16.0,
    4.0 / 16.0,
    3.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
];

/// Width of a filtered line for `w` input pixels.
#[inline]
pub fn ntsc_out_width(w: u32) -> u32 {
    w.div_ceil(NTSC_IN_CHUNK) * NTSC_OUT_CHUNK
}

/// Input pixels needed for a filtered line `w` pixels wide.
#[inline]
pub fn ntsc_in_width(w: u32) -> u32 {
    w / NTSC_OUT_CHUNK * NTSC_IN_CHUNK
}

pub struct NtscFilter {
    yuv: [[f32; 3]; 256],
    gamma_lut: [u8; 256],
    format: PixelFormat,
    built_for: Option<(u64, PixelFormat)>,
    signal: [f32; MAX_TICKS],
    y: [f32; MAX_TICKS],
    u: [f32; MAX_TICKS],
    v: [f32; MAX_TICKS],
    line: [u32; MAX_NTSC_WIDTH],
}

impl Default for NtscFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl NtscFilter {
    pub fn new() -> Self {
        Self {
            yuv: [[0.0; 3]; 256],
            gamma_lut: [0; 256],
            format: PixelFormat::XRGB8888,
            built_for: None,
            signal: [0.0; MAX_TICKS],
            y: [0.0; MAX_TICKS],
            u: [0.0; MAX_TICKS],
            v: [0.0; MAX_TICKS],
            line: [0; MAX_NTSC_WIDTH],
        }
    }

    pub fn invalidate(&mut self) {
        self.built_for = None;
    }

    pub fn rebuild_if_stale(&mut self, decoder: &ColorDecoder, format: PixelFormat) -> bool {
        if self.built_for == Some((decoder.generation(), format)) {
            return false;
        }
        self.update_lookup(decoder, format);
        true
    }

    pub fn update_lookup(&mut self, decoder: &ColorDecoder, format: PixelFormat) {
        for (dst, e) in self.yuv.iter_mut().zip(decoder.yuv_table()) {
            *dst = [e.y as f32, e.u_even as f32, e.v_even as f32];
        }
        self.gamma_lut = decoder.gamma_lut();
        self.format = format;
        self.built_for = Some((decoder.generation(), format));
    }

    /// Filter one scanline and return the packed output pixels.
    pub fn filter_line(&mut self, src: &[u8]) -> &[u32] {
        let width = src.len().min(MAX_LINE_WIDTH);
        if width == 0 {
            return &self.line[..0];
        }
        let ticks = width * TICKS_PER_PIXEL;
        let last = ticks as isize - 1;
        let at = |t: isize| t.clamp(0, last) as usize;

        for t in 0..ticks {
            let [y, u, v] = self.yuv[src[t / TICKS_PER_PIXEL] as usize];
            self.signal[t] = y + u * CARRIER_COS[t & 3] + v * CARRIER_SIN[t & 3];
        }

        for t in 0..ticks as isize {
            let mut y = 0.0;
            for (k, c) in LUMA_FIR.iter().enumerate() {
                y += c * self.signal[at(t + k as isize - 2)];
            }
            let (mut u, mut v) = (0.0, 0.0);
            for (k, c) in CHROMA_FIR.iter().enumerate() {
                let s = at(t + k as isize - 3);
                u += c * self.signal[s] * 2.0 * CARRIER_COS[s & 3];
                v += c * self.signal[s] * 2.0 * CARRIER_SIN[s & 3];
            }
            self.y[t as usize] = y;
            self.u[t as usize] = u;
            self.v[t as usize] = v;
        }

        let out_w = ntsc_out_width(width as u32) as usize;
        let format = self.format;
        for o in 0..out_w {
            let pos = ((o as f32 + 0.5) * TICKS_PER_OUTPUT - 0.5).max(0.0);
            let i0 = (pos as usize).min(ticks - 1);
            let i1 = (i0 + 1).min(ticks - 1);
            let f = pos - pos.floor();
            let lerp = |buf: &[f32; MAX_TICKS]| buf[i0] + (buf[i1] - buf[i0]) * f;
            let (y, u, v) = (lerp(&self.y), lerp(&self.u), lerp(&self.v));

            let r = y + CO_VR as f32 * v;
            let g = y + CO_UG as f32 * u + CO_VG as f32 * v;
            let b = y + CO_UB as f32 * u;
            let level = |c: f32| self.gamma_lut[to_u8(c as f64) as usize];
            self.line[o] = format.pack(level(r), level(g), level(b));
        }
        &self.line[..out_w]
    }

    fn blit_generic<T: Copy>(
        &mut self,
        dest: &mut [T],
        dest_pitch: usize,
        frame: &[u8],
        frame_pitch: usize,
        frame_w: usize,
        geometry: &VideoGeometry,
        to_px: impl Fn(u32) -> T,
    ) {
        let (crop_left, crop_top) = (geometry.src_offset_left as usize, geometry.src_offset_top as usize);
        let (crop_w, dest_w) = (geometry.src_width as usize, geometry.dest_width as usize);
        let frame_rows = rows_available(frame.len(), frame_pitch, frame_w);
        let crop_h = (geometry.src_height as usize).min(frame_rows.saturating_sub(crop_top));
        let dest_h = (geometry.dest_height as usize).min(rows_available(dest.len(), dest_pitch, dest_w));
        if crop_h == 0 || dest_h == 0 || crop_w == 0 {
            return;
        }

        let step_x = fixed_step(crop_w, dest_w);
        let step_y = fixed_step(crop_h, dest_h);
        let mut acc_y = 0;
        let mut last_sy = usize::MAX;
        let mut out_w = 0;

        for dy in 0..dest_h {
            let sy = fixed_index(acc_y, crop_h);
            if sy != last_sy {
                let row_start = (crop_top + sy) * frame_pitch;
                out_w = self.filter_line(&frame[row_start..row_start + frame_w]).len();
                last_sy = sy;
            }
            if out_w == 0 {
                break;
            }
            let d = &mut dest[dy * dest_pitch..dy * dest_pitch + dest_w];
            let mut acc_x = 0;
            for px in d.iter_mut() {
                let x = (crop_left + fixed_index(acc_x, crop_w)).min(out_w - 1);
                *px = to_px(self.line[x]);
                acc_x += step_x;
            }
            acc_y += step_y;
        }
    }

    /// Filter the rows of `frame` selected by `geometry` (in filtered pixels horizontally)
    /// and scale them to the geometry's destination size. `dest` starts at the
    /// destination's top left pixel.
    pub fn blit16(
        &mut self,
        dest: &mut [u16],
        dest_pitch: usize,
        frame: &[u8],
        frame_pitch: usize,
        frame_w: usize,
        geometry: &VideoGeometry,
    ) {
        self.blit_generic(dest, dest_pitch, frame, frame_pitch, frame_w, geometry, |p| p as u16);
    }

    pub fn blit32(
        &mut self,
        dest: &mut [u32],
        dest_pitch: usize,
        frame: &[u8],
        frame_pitch: usize,
        frame_w: usize,
        geometry: &VideoGeometry,
    ) {
        self.blit_generic(dest, dest_pitch, frame, frame_pitch, frame_w, geometry, |p| p);
    }
}
