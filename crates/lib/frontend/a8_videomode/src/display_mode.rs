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

    a8_videomode::display_mode.rs

    Fixed dimensions of each display mode, and the transforms between Atari pixels
    and the mode's native pixels.
*/

use a8_common::{DisplayMode, TvSystem};

use crate::settings::Columns80;

#[derive(Copy, Clone, Debug, PartialEq)]
enum WidthTransform {
    Identity,
    /// 4 Atari pixels become 7 native pixels.
    Ntsc,
}

/// Declared sizes of a display mode, in the mode's native pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DisplayModeSpec {
    pub mode: DisplayMode,
    pub min_w: u32,
    pub min_h: u32,
    pub narrow_w: u32,
    pub normal_w: u32,
    pub full_w: u32,
    pub short_h: u32,
    pub normal_h: u32,
    pub full_h: u32,
    /// Width of a native pixel relative to its height, before any TV correction.
    pub native_aspect: f64,
    transform: WidthTransform,
}

const NORMAL: DisplayModeSpec = DisplayModeSpec {
    mode: DisplayMode::Normal,
    min_w: 320,
    min_h: 200,
    narrow_w: 320,
    normal_w: 336,
    full_w: 384,
    short_h: 200,
    normal_h: 240,
    full_h: 240,
    native_aspect: 1.0,
    transform: WidthTransform::Identity,
};

const NTSC_FILTERED: DisplayModeSpec = DisplayModeSpec {
    mode: DisplayMode::NtscFiltered,
    min_w: 560,
    narrow_w: 560,
    normal_w: 588,
    full_w: 672,
    native_aspect: 4.0 / 7.0,
    transform: WidthTransform::Ntsc,
    ..NORMAL
};

const fn fixed(mode: DisplayMode, w: u32, h: u32, native_aspect: f64) -> DisplayModeSpec {
    DisplayModeSpec {
        mode,
        min_w: w,
        min_h: h,
        narrow_w: w,
        normal_w: w,
        full_w: w,
        short_h: h,
        normal_h: h,
        full_h: h,
        native_aspect,
        transform: WidthTransform::Identity,
    }
}

const XEP80: DisplayModeSpec = fixed(DisplayMode::Xep80, 560, 250, 0.625);
const PROTO80: DisplayModeSpec = fixed(DisplayMode::Proto80, 640, 192, 0.42);
const AF80: DisplayModeSpec = fixed(DisplayMode::Af80, 640, 250, 0.546875);

impl DisplayModeSpec {
    pub fn for_mode(mode: DisplayMode) -> &'static DisplayModeSpec {
        match mode {
            DisplayMode::Normal => &NORMAL,
            DisplayMode::NtscFiltered => &NTSC_FILTERED,
            DisplayMode::Xep80 => &XEP80,
            DisplayMode::Proto80 => &PROTO80,
            DisplayMode::Af80 => &AF80,
        }
    }

    /// Atari pixels to native pixels.
    pub fn upscale_w(&self, w: u32) -> u32 {
        match self.transform {
            WidthTransform::Identity => w,
            WidthTransform::Ntsc => w.div_ceil(4) * 7,
        }
    }

    /// Native pixels to Atari pixels.
    pub fn downscale_w(&self, w: u32) -> u32 {
        match self.transform {
            WidthTransform::Identity => w,
            WidthTransform::Ntsc => w / 7 * 4,
        }
    }

    /// Horizontal shift in Atari pixels to native pixels. Keeps the sign.
    pub fn upscale_offset(&self, offset: i32) -> i32 {
        match self.transform {
            WidthTransform::Identity => offset,
            WidthTransform::Ntsc => offset * 7 / 4,
        }
    }

    /// Minimum host size, transposed when the screen is rotated.
    pub fn min_size(&self, rotate90: bool) -> (u32, u32) {
        if rotate90 {
            (self.min_h, self.min_w)
        }
        else {
            (self.min_w, self.min_h)
        }
    }

    pub fn normal_size(&self, rotate90: bool) -> (u32, u32) {
        if rotate90 {
            (self.normal_h, self.normal_w)
        }
        else {
            (self.normal_w, self.normal_h)
        }
    }
}

/// An 80-column device takes precedence over the NTSC filter, which only applies to an NTSC
/// machine.
pub fn select_display_mode(columns80: Columns80, ntsc_filter: bool, tv: TvSystem) -> DisplayMode {
    match columns80 {
        Columns80::Xep80 => DisplayMode::Xep80,
        Columns80::Proto80 => DisplayMode::Proto80,
        Columns80::Af80 => DisplayMode::Af80,
        Columns80::None if ntsc_filter && tv == TvSystem::Ntsc => DisplayMode::NtscFiltered,
        Columns80::None => DisplayMode::Normal,
    }
}
