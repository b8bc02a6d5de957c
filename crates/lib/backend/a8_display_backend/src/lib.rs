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

    a8_display_backend::lib.rs

    Defines a VideoBackend trait that host display backends implement so that the
    video mode negotiator can enumerate resolutions and set video modes without
    knowing anything about the windowing library underneath.
*/

pub mod memory;

pub use memory::MemoryBackend;

use a8_common::{DisplayMode, PixelFormat, Resolution, VideoGeometry};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DisplayBackendError {
    #[error("Initialization failed: {0}")]
    InitializationError(String),
    #[error("Unsupported video mode: {0}")]
    UnsupportedMode(String),
    #[error("Failed to set video mode: {0}")]
    ModeSetError(String),
}

/// Fullscreen resolutions offered by backends that cannot enumerate real display modes.
pub const STANDARD_RESOLUTIONS: &[Resolution] = &[
    Resolution::new(320, 200),
    Resolution::new(320, 240),
    Resolution::new(640, 400),
    Resolution::new(640, 480),
    Resolution::new(800, 600),
    Resolution::new(1024, 768),
    Resolution::new(1280, 720),
    Resolution::new(1280, 1024),
    Resolution::new(1920, 1080),
];

/// A complete description of the host video mode the negotiator wants.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VideoModeRequest {
    pub resolution: Resolution,
    pub windowed: bool,
    pub mode: DisplayMode,
    pub rotate90: bool,
    pub geometry: VideoGeometry,
}

pub trait VideoBackend {
    /// Resolutions available in fullscreen mode, in any order.
    fn fullscreen_resolutions(&self) -> Vec<Resolution>;

    /// The resolution of the host desktop. Used to derive the host aspect ratio when it is
    /// not configured explicitly.
    fn desktop_resolution(&self) -> Resolution;

    /// Whether the backend can present `mode`, optionally rotated by 90 degrees.
    fn supports_mode(&self, mode: DisplayMode, rotate90: bool) -> bool;

    /// Switch the host display to the requested mode. On error the backend must leave its
    /// previous mode in place.
    fn set_video_mode(&mut self, request: &VideoModeRequest) -> Result<(), DisplayBackendError>;

    /// Layout of the framebuffer pixels for the current mode.
    fn pixel_format(&self) -> PixelFormat;
}
