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

    a8_video_renderer::lib.rs

    Module to convert the indexed frame produced by ANTIC/GTIA into host pixels.

    The renderer decodes GTIA colour indices into RGB, optionally emulates the
    analog artifacts of a PAL or NTSC television, and scales the result into a
    host framebuffer in the pixel format of the display backend.
*/

#![allow(clippy::too_many_arguments)]

pub mod blit;
pub mod color;
pub mod consts;
pub mod draw;
pub mod ntsc;
pub mod pal_blend;
pub mod pal_high;
pub mod palette;

pub use color::{ColorDecoder, ColorSetup, YuvEntry};
pub use draw::{RendererEvent, VideoRenderer};
pub use ntsc::NtscFilter;
pub use pal_blend::PalBlender;
pub use pal_high::PalHighEngine;
pub use palette::{ColorError, ExternalPalette};

use a8_common::DisplayMode;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// How the analog artifacts of a PAL television are emulated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum ArtifactMode {
    /// Plain palette lookup.
    #[default]
    #[strum(serialize = "NONE")]
    None,
    /// Average every pixel with the pixel above it, each decoded with its own line's palette.
    #[strum(serialize = "BLEND")]
    PalBlend,
    /// Full delay-line simulation through precomputed composite decoding kernels.
    #[strum(serialize = "HIGH")]
    PalHigh,
    /// As `PalHigh`, followed by a horizontal 1-4-1 blur.
    #[strum(serialize = "HIGH_BLUR")]
    PalHighBlur,
}

impl ArtifactMode {
    #[inline]
    pub fn is_pal_high(&self) -> bool {
        matches!(self, ArtifactMode::PalHigh | ArtifactMode::PalHighBlur)
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Destination buffer too small: need {needed} bytes, have {available}")]
    DestinationTooSmall { needed: usize, available: usize },
    #[error("Source frame too small: need {needed} bytes, have {available}")]
    FrameTooSmall { needed: usize, available: usize },
    #[error("Destination buffer is not aligned for {0} bpp pixels")]
    Misaligned(u32),
    #[error("{mode} display mode cannot be drawn at {bpp} bpp")]
    UnsupportedFormat { mode: DisplayMode, bpp: u32 },
}
