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

    a8_video_renderer::pal_high::mod.rs

    PAL high artifact engine.

    Simulates the composite decoding and delay line of a PAL television. Each
    scanline is rendered from precomputed per-colour tables into fixed-point
    Y/U/V buffers, the chroma of the previous scanline is added in from the delay
    buffer, and the result is converted to host pixels.
*/

pub mod kernel;
pub mod render;
pub mod tables;

use a8_common::PixelFormat;
use web_time::Instant;

use crate::{color::ColorDecoder, consts::MAX_LINE_WIDTH};
use tables::{ArtifactTables, CHROMA_TAPS, LUMA_TAPS, WORD_BIAS};

const LINE_WORDS: usize = MAX_LINE_WIDTH / 2;
/// Luma buffer word `i` holds output word `i - 1`.
pub(crate) const Y_BUF_WORDS: usize = LINE_WORDS + LUMA_TAPS - 1;
/// Chroma buffer word `i` holds output word `i - 5`.
pub(crate) const C_BUF_WORDS: usize = LINE_WORDS + CHROMA_TAPS - 1;

pub struct PalHighEngine {
    tables: ArtifactTables,
    built_for: Option<u64>,
    format: PixelFormat,
    gamma_lut: [u8; 256],

    src: [u8; MAX_LINE_WIDTH],
    y_buf: [u32; Y_BUF_WORDS],
    u_buf: [u32; C_BUF_WORDS],
    v_buf: [u32; C_BUF_WORDS],

    // Chroma of the last line of each parity.
    delay_u: [[u32; C_BUF_WORDS]; 2],
    delay_v: [[u32; C_BUF_WORDS]; 2],
    delay_valid: [bool; 2],
    delay_width: usize,

    rgb: [[u8; 3]; MAX_LINE_WIDTH],
    blurred: [[u8; 3]; MAX_LINE_WIDTH],
    line: [u32; MAX_LINE_WIDTH],
}

impl PalHighEngine {
    pub fn new(decoder: &ColorDecoder, format: PixelFormat) -> Self {
        let mut engine = Self {
            tables: ArtifactTables::build(decoder.yuv_table()),
            built_for: Some(decoder.generation()),
            format,
            gamma_lut: decoder.gamma_lut(),
            src: [0; MAX_LINE_WIDTH],
            y_buf: [WORD_BIAS; Y_BUF_WORDS],
            u_buf: [WORD_BIAS; C_BUF_WORDS],
            v_buf: [WORD_BIAS; C_BUF_WORDS],
            delay_u: [[WORD_BIAS; C_BUF_WORDS]; 2],
            delay_v: [[WORD_BIAS; C_BUF_WORDS]; 2],
            delay_valid: [false; 2],
            delay_width: 0,
            rgb: [[0; 3]; MAX_LINE_WIDTH],
            blurred: [[0; 3]; MAX_LINE_WIDTH],
            line: [0; MAX_LINE_WIDTH],
        };
        engine.reset_delay();
        engine
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn set_format(&mut self, format: PixelFormat) {
        self.format = format;
    }

    /// Force a table rebuild on the next `rebuild_if_stale`.
    pub fn invalidate(&mut self) {
        self.built_for = None;
    }

    /// Rebuild the tables if the decoder changed since they were built. A pixel format
    /// change only affects packing and never needs a rebuild. Returns true if a rebuild
    /// happened.
    pub fn rebuild_if_stale(&mut self, decoder: &ColorDecoder, format: PixelFormat) -> bool {
        self.format = format;
        if self.built_for == Some(decoder.generation()) {
            return false;
        }
        self.update_lookup(decoder);
        true
    }

    pub fn update_lookup(&mut self, decoder: &ColorDecoder) {
        let start = Instant::now();
        self.tables = ArtifactTables::build(decoder.yuv_table());
        self.gamma_lut = decoder.gamma_lut();
        self.built_for = Some(decoder.generation());
        self.reset_delay();
        log::debug!(
            "PalHighEngine: rebuilt tables for generation {} in {:?}",
            decoder.generation(),
            start.elapsed()
        );
    }

    /// Forget the previous scanlines. The next line of each parity blends with itself.
    pub fn reset_delay(&mut self) {
        for row in self.delay_u.iter_mut().chain(self.delay_v.iter_mut()) {
            row.fill(WORD_BIAS);
        }
        self.delay_valid = [false; 2];
    }
}
