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

    a8_video_renderer::pal_blend.rs

    Simple PAL blending.

    A PAL television averages the chroma of each line with the line above it. This
    approximates that by decoding every pixel with its own line's palette, decoding
    the pixel above with the other line's palette, and averaging the two with a
    carry-free masked average.
*/

use a8_common::PixelFormat;

use crate::{
    blit::{fixed_index, fixed_step, rows_available},
    color::ColorDecoder,
};

/// Average two pixels of the same format without letting a channel's low bit carry into
/// its neighbour. `mask` comes from `PixelFormat::average_mask`.
#[inline(always)]
pub fn average(a: u32, b: u32, mask: u32) -> u32 {
    (a & b) + (((a ^ b) & mask) >> 1)
}

pub struct PalBlender {
    even: [u32; 256],
    odd: [u32; 256],
    mask: u32,
    built_for: Option<(u64, PixelFormat)>,
}

impl Default for PalBlender {
    fn default() -> Self {
        Self::new()
    }
}

impl PalBlender {
    pub fn new() -> Self {
        Self {
            even: [0; 256],
            odd: [0; 256],
            mask: 0,
            built_for: None,
        }
    }

    pub fn invalidate(&mut self) {
        self.built_for = None;
    }

    /// Rebuild the even and odd palettes if the decoder or the pixel format changed since
    /// the last build. Returns true if a rebuild happened.
    pub fn rebuild_if_stale(&mut self, decoder: &ColorDecoder, format: PixelFormat) -> bool {
        if self.built_for == Some((decoder.generation(), format)) {
            return false;
        }
        self.update_lookup(decoder, format);
        true
    }

    pub fn update_lookup(&mut self, decoder: &ColorDecoder, format: PixelFormat) {
        for (i, e) in decoder.yuv_table().iter().enumerate() {
            let (r, g, b) = decoder.to_rgb8(e.y, e.u_even, e.v_even);
            self.even[i] = format.pack(r, g, b);
            let (r, g, b) = decoder.to_rgb8(e.y, e.u_odd, e.v_odd);
            self.odd[i] = format.pack(r, g, b);
        }
        self.mask = format.average_mask();
        self.built_for = Some((decoder.generation(), format));
        log::debug!("PalBlender: rebuilt lookup for {}bpp, mask {:#010x}", format.bpp(), self.mask);
    }

    #[inline]
    fn palettes(&self, parity: usize) -> (&[u32; 256], &[u32; 256]) {
        if parity & 1 == 0 {
            (&self.even, &self.odd)
        }
        else {
            (&self.odd, &self.even)
        }
    }

    /// Blend one source row against the row above it into `dest`, stepping through the
    /// source with `step_x` (16.16).
    #[inline]
    fn blend_row<T: Copy>(
        &self,
        dest: &mut [T],
        cur: &[u8],
        above: &[u8],
        parity: usize,
        step_x: usize,
        to_px: &impl Fn(u32) -> T,
    ) {
        let (pal_cur, pal_above) = self.palettes(parity);
        let mut acc_x = 0;
        for d in dest.iter_mut() {
            let x = fixed_index(acc_x, cur.len());
            *d = to_px(average(
                pal_cur[cur[x] as usize],
                pal_above[above[x] as usize],
                self.mask,
            ));
            acc_x += step_x;
        }
    }

    fn blit_generic<T: Copy>(
        &self,
        dest: &mut [T],
        dest_pitch: usize,
        dest_w: usize,
        dest_h: usize,
        src: &[u8],
        src_pitch: usize,
        src_w: usize,
        src_h: usize,
        start_parity: usize,
        to_px: impl Fn(u32) -> T,
    ) {
        let src_h = src_h.min(rows_available(src.len(), src_pitch, src_w));
        let dest_h = dest_h.min(rows_available(dest.len(), dest_pitch, dest_w));
        if src_h == 0 || dest_h == 0 {
            return;
        }

        let step_x = fixed_step(src_w, dest_w);
        let step_y = fixed_step(src_h, dest_h);
        let mut acc_y: usize = 0;

        for dy in 0..dest_h {
            let sy = fixed_index(acc_y, src_h);
            // The first row has nothing above it and blends with itself.
            let above_y = sy.saturating_sub(1);
            let cur = &src[sy * src_pitch..sy * src_pitch + src_w];
            let above = &src[above_y * src_pitch..above_y * src_pitch + src_w];
            let d = &mut dest[dy * dest_pitch..dy * dest_pitch + dest_w];
            self.blend_row(d, cur, above, start_parity + sy, step_x, &to_px);
            acc_y += step_y;
        }
    }

    pub fn blit16(
        &self,
        dest: &mut [u16],
        dest_pitch: usize,
        src: &[u8],
        src_pitch: usize,
        w: usize,
        h: usize,
        start_parity: usize,
    ) {
        self.blit_generic(dest, dest_pitch, w, h, src, src_pitch, w, h, start_parity, |p| p as u16);
    }

    pub fn blit32(
        &self,
        dest: &mut [u32],
        dest_pitch: usize,
        src: &[u8],
        src_pitch: usize,
        w: usize,
        h: usize,
        start_parity: usize,
    ) {
        self.blit_generic(dest, dest_pitch, w, h, src, src_pitch, w, h, start_parity, |p| p);
    }

    pub fn blit_scaled16(
        &self,
        dest: &mut [u16],
        dest_pitch: usize,
        dest_w: usize,
        dest_h: usize,
        src: &[u8],
        src_pitch: usize,
        src_w: usize,
        src_h: usize,
        start_parity: usize,
    ) {
        self.blit_generic(
            dest,
            dest_pitch,
            dest_w,
            dest_h,
            src,
            src_pitch,
            src_w,
            src_h,
            start_parity,
            |p| p as u16,
        );
    }

    pub fn blit_scaled32(
        &self,
        dest: &mut [u32],
        dest_pitch: usize,
        dest_w: usize,
        dest_h: usize,
        src: &[u8],
        src_pitch: usize,
        src_w: usize,
        src_h: usize,
        start_parity: usize,
    ) {
        self.blit_generic(
            dest,
            dest_pitch,
            dest_w,
            dest_h,
            src,
            src_pitch,
            src_w,
            src_h,
            start_parity,
            |p| p,
        );
    }
}
