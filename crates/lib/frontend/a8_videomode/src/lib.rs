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

    a8_videomode::lib.rs

    Works out how the emulated screen is placed on the host display.

    Given the user's video mode settings and what the display backend offers, the
    negotiator picks a display mode and a host resolution, crops the source area,
    applies the stretch and aspect policies and hands the resulting geometry to the
    backend. A setting that cannot be satisfied is rolled back.
*/

pub mod display_mode;
pub mod geometry;
pub mod negotiator;
pub mod settings;

pub use display_mode::{select_display_mode, DisplayModeSpec};
pub use negotiator::VideoModeNegotiator;
pub use settings::{Columns80, HorizontalArea, HostAspect, KeepAspect, StretchMode, VerticalArea, VideoModeSettings};

use a8_common::{DisplayMode, Resolution};
use a8_display_backend::DisplayBackendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoModeError {
    #[error("No available resolution can display {0} mode")]
    NoResolution(DisplayMode),
    #[error("Resolution {resolution} is too small for {mode} mode (need {min_w}x{min_h})")]
    ResolutionTooSmall {
        resolution: Resolution,
        mode: DisplayMode,
        min_w: u32,
        min_h: u32,
    },
    #[error("Invalid display area: {0}")]
    InvalidArea(String),
    #[error("Invalid fullscreen resolution id: {0}")]
    InvalidResolutionId(usize),
    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(String),
    #[error("Invalid stretch: {0}")]
    InvalidStretch(String),
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
    #[error("Display backend error: {0}")]
    Backend(#[from] DisplayBackendError),
}
