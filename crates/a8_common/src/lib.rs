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

    a8_common::lib.rs

    Common video library.
    Define types and constants shared by the renderer, the video mode
    negotiator, the display backends and the frontends.
*/

pub mod types;
pub mod util;

pub use crate::types::{
    display_mode::DisplayMode,
    geometry::{Resolution, VideoGeometry},
    pixel_format::{PixelFormat, PixelFormatError},
    tv_system::TvSystem,
};

/// Width in bytes of one line of the indexed frame produced by ANTIC/GTIA.
pub const SCREEN_WIDTH: usize = 384;
/// Number of lines in the indexed frame produced by ANTIC/GTIA.
pub const SCREEN_HEIGHT: usize = 240;
