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

    a8_video_renderer::pal_high::render.rs

    Scanline rendering, delay line and blitters of the PAL high artifact engine.
*/

use super::{
    tables::{chroma_index, lane, luma_index, CHROMA_TAPS, LUMA_TAPS, PHASES, WORD_BIAS},
    PalHighEngine,
    C_BUF_WORDS,
};
use crate::{
    blit::{fixed_index, fixed_step, rows_available},
    consts::{CO_UB_FX, CO_UG_FX, CO_VG_FX, CO_VR_FX, MATRIX_SHIFT, MAX_LINE_WIDTH},
};

/// Convert a fixed-point component (1.0 = 64 * 255) to an 8-bit level.
#[inline(always)]
fn to_level(v: i32) -> u8 {
    ((v + 32) >> 6).clamp(0, 255) as u8
}

/// Add each pixel's chroma table row into `buf`. Every buffer word starts with one bias.
fn chroma_pass(buf: &mut [u32; C_BUF_WORDS], table: &[u32], src: &[u8], parity: usize) {
    buf.fill(WORD_BIAS);
    for (x, &c) in src.iter().enumerate() {
        let k = chroma_index(parity, c as usize, x % PHASES);
        let w = x >> 1;
        for (d, t) in buf[w..w + CHROMA_TAPS].iter_mut().zip(&table[k..k + CHROMA_TAPS]) {
            *d = d.wrapping_add(*t);
        }
    }
}

impl PalHighEngine {
    /// Render one scanline into the Y/U/V line buffers. The first byte of `src` is taken
    /// as subcarrier phase 0. Lines longer than the line buffers are clamped; the number of
    /// pixels rendered is returned.
    pub fn render_line(&mut self, src: &[u8], parity: usize) -> usize {
        let width = src.len().min(MAX_LINE_WIDTH);
        if width != self.delay_width {
            self.reset_delay();
            self.delay_width = width;
        }
        let parity = parity & 1;
        let padded = (width + PHASES - 1) & !(PHASES - 1);
        self.src[..width].copy_from_slice(&src[..width]);
        self.src[width..padded].fill(0);

        self.luma_pass(padded, parity);
        chroma_pass(&mut self.u_buf, &self.tables.to_u, &self.src[..width], parity);
        chroma_pass(&mut self.v_buf, &self.tables.to_v, &self.src[..width], parity);
        width
    }

    /// Luma runs a group of 8 pixels (one full phase cycle) at a time, two pixels per
    /// output word. Each pixel touches 4 words starting one word behind its own, so once a
    /// pixel pair is added the word behind it is complete. The three words still
    /// accumulating are carried in registers from pair to pair.
    fn luma_pass(&mut self, padded: usize, parity: usize) {
        let table = &self.tables.to_y;
        let out = &mut self.y_buf;
        let (mut a0, mut a1, mut a2) = (WORD_BIAS, WORD_BIAS, WORD_BIAS);

        for (g, group) in self.src[..padded].chunks_exact(PHASES).enumerate() {
            for pair in 0..PHASES / 2 {
                let p0 = pair * 2;
                let k0 = luma_index(parity, group[p0] as usize, p0);
                let k1 = luma_index(parity, group[p0 + 1] as usize, p0 + 1);
                let t0 = &table[k0..k0 + LUMA_TAPS];
                let t1 = &table[k1..k1 + LUMA_TAPS];

                out[g * 4 + pair] = a0.wrapping_add(t0[0]).wrapping_add(t1[0]);
                a0 = a1.wrapping_add(t0[1]).wrapping_add(t1[1]);
                a1 = a2.wrapping_add(t0[2]).wrapping_add(t1[2]);
                a2 = WORD_BIAS.wrapping_add(t0[3]).wrapping_add(t1[3]);
            }
        }

        let n = padded / 2;
        out[n] = a0;
        out[n + 1] = a1;
        out[n + 2] = a2;
    }

    /// Combine the rendered line with the delay line into 8-bit RGB and store this line's
    /// chroma as the delay line for the next line of the other parity.
    fn final_rgb(&mut self, width: usize, parity: usize) {
        let parity = parity & 1;
        let prev = parity ^ 1;
        let use_prev = self.delay_valid[prev];

        for x in 0..width {
            let w = x >> 1;
            let l = x & 1;
            let y = lane(self.y_buf[w + 1], l);
            let u_cur = lane(self.u_buf[w + 5], l);
            let v_cur = lane(self.v_buf[w + 5], l);
            let (u_prev, v_prev) = if use_prev {
                (lane(self.delay_u[prev][w + 5], l), lane(self.delay_v[prev][w + 5], l))
            }
            else {
                (u_cur, v_cur)
            };
            let u = u_cur + u_prev;
            let v = v_cur + v_prev;

            let r = y + ((CO_VR_FX * v) >> MATRIX_SHIFT);
            let g = y + ((CO_UG_FX * u + CO_VG_FX * v) >> MATRIX_SHIFT);
            let b = y + ((CO_UB_FX * u) >> MATRIX_SHIFT);
            self.rgb[x] = [
                self.gamma_lut[to_level(r) as usize],
                self.gamma_lut[to_level(g) as usize],
                self.gamma_lut[to_level(b) as usize],
            ];
        }

        self.delay_u[parity] = self.u_buf;
        self.delay_v[parity] = self.v_buf;
        self.delay_valid[parity] = true;
    }

    /// Horizontal (1, 4, 1) / 6 blur of the final RGB line, edges replicated.
    fn blur_line(&mut self, width: usize) {
        if width == 0 {
            return;
        }
        for x in 0..width {
            let l = self.rgb[x.saturating_sub(1)];
            let c = self.rgb[x];
            let r = self.rgb[(x + 1).min(width - 1)];
            for i in 0..3 {
                self.blurred[x][i] = ((l[i] as u32 + 4 * c[i] as u32 + r[i] as u32 + 3) / 6) as u8;
            }
        }
    }

    /// Pack the last final line into `self.line`.
    fn pack_line(&mut self, width: usize, blur: bool) {
        let rgb = if blur { &self.blurred } else { &self.rgb };
        let format = self.format;
        for (d, c) in self.line[..width].iter_mut().zip(&rgb[..width]) {
            *d = format.pack(c[0], c[1], c[2]);
        }
    }

    fn render_row(&mut self, src: &[u8], parity: usize, blur: bool) -> usize {
        let width = self.render_line(src, parity);
        self.final_rgb(width, parity);
        if blur {
            self.blur_line(width);
        }
        self.pack_line(width, blur);
        width
    }

    /// Finish the line last passed to `render_line` into 16 bpp pixels.
    pub fn final16(&mut self, dest: &mut [u16], width: usize, parity: usize, blur: bool) {
        let width = width.min(self.delay_width).min(dest.len());
        self.final_rgb(width, parity);
        if blur {
            self.blur_line(width);
        }
        self.pack_line(width, blur);
        for (d, &p) in dest.iter_mut().zip(&self.line[..width]) {
            *d = p as u16;
        }
    }

    /// Finish the line last passed to `render_line` into 32 bpp pixels.
    pub fn final32(&mut self, dest: &mut [u32], width: usize, parity: usize, blur: bool) {
        let width = width.min(self.delay_width).min(dest.len());
        self.final_rgb(width, parity);
        if blur {
            self.blur_line(width);
        }
        self.pack_line(width, blur);
        dest[..width].copy_from_slice(&self.line[..width]);
    }

    fn blit_generic<T: Copy>(
        &mut self,
        dest: &mut [T],
        dest_pitch: usize,
        dest_w: usize,
        dest_h: usize,
        src: &[u8],
        src_pitch: usize,
        src_w: usize,
        src_h: usize,
        start_parity: usize,
        blur: bool,
        to_px: impl Fn(u32) -> T,
    ) {
        let src_w = src_w.min(MAX_LINE_WIDTH);
        let src_h = src_h.min(rows_available(src.len(), src_pitch, src_w));
        let dest_h = dest_h.min(rows_available(dest.len(), dest_pitch, dest_w));
        if src_h == 0 || dest_h == 0 {
            return;
        }

        let step_x = fixed_step(src_w, dest_w);
        let step_y = fixed_step(src_h, dest_h);
        let mut acc_y = 0;
        let mut dy = 0;

        // Every source row is rendered, in order, even when downscaling skips it, so the
        // delay line always holds the line directly above.
        for sy in 0..src_h {
            let row = &src[sy * src_pitch..sy * src_pitch + src_w];
            self.render_row(row, start_parity + sy, blur);

            while dy < dest_h && fixed_index(acc_y, src_h) == sy {
                let d = &mut dest[dy * dest_pitch..dy * dest_pitch + dest_w];
                let mut acc_x = 0;
                for px in d.iter_mut() {
                    *px = to_px(self.line[fixed_index(acc_x, src_w)]);
                    acc_x += step_x;
                }
                dy += 1;
                acc_y += step_y;
            }
        }
    }

    pub fn blit_high16(
        &mut self,
        dest: &mut [u16],
        dest_pitch: usize,
        src: &[u8],
        src_pitch: usize,
        w: usize,
        h: usize,
        start_parity: usize,
    ) {
        self.blit_generic(dest, dest_pitch, w, h, src, src_pitch, w, h, start_parity, false, |p| p as u16);
    }

    pub fn blit_high32(
        &mut self,
        dest: &mut [u32],
        dest_pitch: usize,
        src: &[u8],
        src_pitch: usize,
        w: usize,
        h: usize,
        start_parity: usize,
    ) {
        self.blit_generic(dest, dest_pitch, w, h, src, src_pitch, w, h, start_parity, false, |p| p);
    }

    pub fn blit_high_blur16(
        &mut self,
        dest: &mut [u16],
        dest_pitch: usize,
        src: &[u8],
        src_pitch: usize,
        w: usize,
        h: usize,
        start_parity: usize,
    ) {
        self.blit_generic(dest, dest_pitch, w, h, src, src_pitch, w, h, start_parity, true, |p| p as u16);
    }

    pub fn blit_high_blur32(
        &mut self,
        dest: &mut [u32],
        dest_pitch: usize,
        src: &[u8],
        src_pitch: usize,
        w: usize,
        h: usize,
        start_parity: usize,
    ) {
        self.blit_generic(dest, dest_pitch, w, h, src, src_pitch, w, h, start_parity, true, |p| p);
    }

    pub fn blit_high_scaled16(
        &mut self,
        dest: &mut [u16],
        dest_pitch: usize,
        dest_w: usize,
        dest_h: usize,
        src: &[u8],
        src_pitch: usize,
        src_w: usize,
        src_h: usize,
        start_parity: usize,
        blur: bool,
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
            blur,
            |p| p as u16,
        );
    }

    pub fn blit_high_scaled32(
        &mut self,
        dest: &mut [u32],
        dest_pitch: usize,
        dest_w: usize,
        dest_h: usize,
        src: &[u8],
        src_pitch: usize,
        src_w: usize,
        src_h: usize,
        start_parity: usize,
        blur: bool,
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
            blur,
            |p| p,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorDecoder;
    use a8_common::{PixelFormat, TvSystem};

    const W: usize = 64;

    fn new_engine() -> (ColorDecoder, PalHighEngine) {
        let decoder = ColorDecoder::new(TvSystem::Pal);
        let engine = PalHighEngine::new(&decoder, PixelFormat::XRGB8888);
        (decoder, engine)
    }

    fn line(engine: &mut PalHighEngine, color: u8, parity: usize) -> Vec<u32> {
        let src = [color; W];
        let mut out = vec![0u32; W];
        engine.render_line(&src, parity);
        engine.final32(&mut out, W, parity, false);
        out
    }

    fn close(a: u32, b: u32, tolerance: i32) -> bool {
        let (ar, ag, ab) = PixelFormat::XRGB8888.unpack(a);
        let (br, bg, bb) = PixelFormat::XRGB8888.unpack(b);
        [(ar, br), (ag, bg), (ab, bb)]
            .iter()
            .all(|&(x, y)| (x as i32 - y as i32).abs() <= tolerance)
    }

    #[test]
    fn black_line_is_black() {
        let (_, mut engine) = new_engine();
        assert!(line(&mut engine, 0, 0).iter().all(|&p| p == 0));
    }

    #[test]
    fn flat_grey_matches_palette() {
        let (decoder, mut engine) = new_engine();
        let out = line(&mut engine, 0x0A, 0);
        let (r, g, b) = decoder.rgb(0x0A);
        let expected = PixelFormat::XRGB8888.pack(r, g, b);
        for &p in &out[8..W - 8] {
            assert!(close(p, expected, 3), "{:06x} vs {:06x}", p, expected);
        }
    }

    #[test]
    fn flat_colour_averages_both_parities() {
        let (decoder, mut engine) = new_engine();
        line(&mut engine, 0x56, 0);
        let out = line(&mut engine, 0x56, 1);
        let (r, g, b) = decoder.rgb(0x56);
        let expected = PixelFormat::XRGB8888.pack(r, g, b);
        for &p in &out[8..W - 8] {
            assert!(close(p, expected, 3), "{:06x} vs {:06x}", p, expected);
        }
    }

    #[test]
    fn delay_line_carries_the_previous_line() {
        let (_, mut sequential) = new_engine();
        line(&mut sequential, 0x00, 0);
        let after_black = line(&mut sequential, 0xFF, 1);

        let (_, mut isolated) = new_engine();
        let alone = line(&mut isolated, 0xFF, 1);
        assert_ne!(after_black, alone);

        let (_, mut reset) = new_engine();
        line(&mut reset, 0x00, 0);
        reset.reset_delay();
        assert_eq!(line(&mut reset, 0xFF, 1), alone);
    }

    #[test]
    fn width_change_resets_delay() {
        let (_, mut engine) = new_engine();
        line(&mut engine, 0x00, 0);
        let mut out = vec![0u32; W / 2];
        engine.render_line(&[0xFFu8; W / 2], 1);
        engine.final32(&mut out, W / 2, 1, false);

        let (_, mut fresh) = new_engine();
        let mut expected = vec![0u32; W / 2];
        fresh.render_line(&[0xFFu8; W / 2], 1);
        fresh.final32(&mut expected, W / 2, 1, false);
        assert_eq!(out, expected);
    }

    #[test]
    fn overlong_lines_are_clamped() {
        let (_, mut engine) = new_engine();
        assert_eq!(engine.render_line(&[0x0F; 500], 0), MAX_LINE_WIDTH);
    }

    #[test]
    fn blur_smooths_an_edge() {
        let (_, mut engine) = new_engine();
        let mut src = [0u8; W];
        src[W / 2..].fill(0x0F);
        let mut sharp = vec![0u32; W];
        let mut soft = vec![0u32; W];
        engine.blit_high32(&mut sharp, W, &src, W, W, 1, 0);
        engine.reset_delay();
        engine.blit_high_blur32(&mut soft, W, &src, W, W, 1, 0);
        assert_ne!(sharp, soft);
        // Far from the edge the blur leaves flat areas alone.
        assert!(close(sharp[4], soft[4], 1));
        assert!(close(sharp[W - 8], soft[W - 8], 1));
    }

    #[test]
    fn vertical_upscale_repeats_rendered_rows() {
        let (_, mut engine) = new_engine();
        let src: Vec<u8> = (0..W * 2).map(|i| (i * 37 % 256) as u8).collect();
        let mut dest = vec![0u32; W * 4];
        engine.blit_high_scaled32(&mut dest, W, W, 4, &src, W, W, 2, 0, false);
        assert_eq!(dest[..W], dest[W..2 * W]);
        assert_eq!(dest[2 * W..3 * W], dest[3 * W..]);
        assert_ne!(dest[..W], dest[2 * W..3 * W]);
    }

    #[test]
    fn triple_scale_matches_unscaled_render() {
        let (_, mut engine) = new_engine();
        let src: Vec<u8> = (0..W * 2).map(|i| (i * 37 % 256) as u8).collect();
        let mut plain = vec![0u32; W * 2];
        engine.blit_high32(&mut plain, W, &src, W, W, 2, 0);

        engine.reset_delay();
        let dw = W * 3;
        let mut scaled = vec![0u32; dw * 6];
        engine.blit_high_scaled32(&mut scaled, dw, dw, 6, &src, W, W, 2, 0, false);
        for y in 0..6 {
            for x in 0..dw {
                assert_eq!(scaled[y * dw + x], plain[(y / 3) * W + x / 3], "x={} y={}", x, y);
            }
        }
    }

    #[test]
    fn downscale_renders_skipped_rows() {
        let colors = [0x56u8, 0x00, 0xFF, 0x34];
        let src: Vec<u8> = colors.iter().flat_map(|&c| [c; W]).collect();
        let (_, mut engine) = new_engine();
        let mut dest = vec![0u32; W * 2];
        engine.blit_high_scaled32(&mut dest, W, W, 2, &src, W, W, 4, 0, false);

        // Destination row 1 shows source row 2, decoded after rows 0 and 1 went through
        // the delay line.
        let (_, mut sequential) = new_engine();
        line(&mut sequential, colors[0], 0);
        line(&mut sequential, colors[1], 1);
        let expected = line(&mut sequential, colors[2], 0);
        assert_eq!(dest[W..], expected[..]);

        let (_, mut isolated) = new_engine();
        assert_ne!(dest[W..], line(&mut isolated, colors[2], 0)[..]);
        assert_eq!(dest[..W], line(&mut new_engine().1, colors[0], 0)[..]);
    }

    #[test]
    fn rgb565_output() {
        let decoder = ColorDecoder::new(TvSystem::Pal);
        let mut engine = PalHighEngine::new(&decoder, PixelFormat::RGB565);
        let src = [0x0Fu8; W];
        let mut dest = vec![0u16; W];
        engine.blit_high16(&mut dest, W, &src, W, W, 1, 0);
        assert!(dest[8..W - 8].iter().all(|&p| p == 0xFFFF));
    }

    #[test]
    fn stale_tables_rebuild_once() {
        let (mut decoder, mut engine) = new_engine();
        assert!(!engine.rebuild_if_stale(&decoder, PixelFormat::XRGB8888));
        let mut setup = *decoder.setup();
        setup.hue = 0.25;
        decoder.set_setup(setup);
        assert!(engine.rebuild_if_stale(&decoder, PixelFormat::XRGB8888));
        assert!(!engine.rebuild_if_stale(&decoder, PixelFormat::XRGB8888));
        engine.invalidate();
        assert!(engine.rebuild_if_stale(&decoder, PixelFormat::XRGB8888));
    }
}
