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

    a8_display_backend::memory.rs

    A VideoBackend that renders into a framebuffer held in memory. Used by the
    headless frontend and by tests.
*/

use crate::{DisplayBackendError, VideoBackend, VideoModeRequest, STANDARD_RESOLUTIONS};
use a8_common::{DisplayMode, PixelFormat, Resolution};

pub struct MemoryBackend {
    resolutions: Vec<Resolution>,
    desktop: Resolution,
    format: PixelFormat,
    allow_rotation: bool,
    fail_mode_sets: bool,
    current: Option<VideoModeRequest>,
    mode_sets: usize,
    // Backed by u32 so the buffer can be viewed as u16 or u32 pixels without alignment issues.
    buffer: Vec<u32>,
    pitch: usize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        MemoryBackend::new(STANDARD_RESOLUTIONS.to_vec(), Resolution::new(1920, 1080), PixelFormat::XRGB8888)
    }
}

impl MemoryBackend {
    pub fn new(resolutions: Vec<Resolution>, desktop: Resolution, format: PixelFormat) -> Self {
        Self {
            resolutions,
            desktop,
            format,
            allow_rotation: true,
            fail_mode_sets: false,
            current: None,
            mode_sets: 0,
            buffer: Vec::new(),
            pitch: 0,
        }
    }

    pub fn with_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    /// Make every following `set_video_mode` call fail, as a host refusing a mode would.
    pub fn set_failing(&mut self, fail: bool) {
        self.fail_mode_sets = fail;
    }

    pub fn current_mode(&self) -> Option<&VideoModeRequest> {
        self.current.as_ref()
    }

    pub fn mode_set_count(&self) -> usize {
        self.mode_sets
    }

    /// Framebuffer row length in bytes.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn framebuffer(&self) -> &[u8] {
        bytemuck::cast_slice(&self.buffer)
    }

    pub fn framebuffer_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.buffer)
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Convert the framebuffer to tightly packed RGBA8. Indexed framebuffers are resolved
    /// through `palette`, given as 0x00RRGGBB entries.
    pub fn to_rgba(&self, palette: Option<&[u32; 256]>) -> Vec<u8> {
        let Some(req) = self.current.as_ref()
        else {
            return Vec::new();
        };
        let (w, h) = (req.resolution.w as usize, req.resolution.h as usize);
        let bpp = self.format.bytes_per_pixel();
        let bytes = self.framebuffer();
        let mut out = Vec::with_capacity(w * h * 4);

        for y in 0..h {
            let row = &bytes[y * self.pitch..y * self.pitch + w * bpp];
            for x in 0..w {
                let (r, g, b) = match bpp {
                    1 => {
                        let rgb = palette.map(|p| p[row[x] as usize]).unwrap_or(0);
                        ((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
                    }
                    2 => self.format.unpack(u16::from_le_bytes([row[x * 2], row[x * 2 + 1]]) as u32),
                    _ => self.format.unpack(u32::from_le_bytes([
                        row[x * 4],
                        row[x * 4 + 1],
                        row[x * 4 + 2],
                        row[x * 4 + 3],
                    ])),
                };
                out.extend_from_slice(&[r, g, b, 0xFF]);
            }
        }
        out
    }
}

impl VideoBackend for MemoryBackend {
    fn fullscreen_resolutions(&self) -> Vec<Resolution> {
        self.resolutions.clone()
    }

    fn desktop_resolution(&self) -> Resolution {
        self.desktop
    }

    fn supports_mode(&self, mode: DisplayMode, rotate90: bool) -> bool {
        !rotate90 || (self.allow_rotation && mode == DisplayMode::Normal)
    }

    fn set_video_mode(&mut self, request: &VideoModeRequest) -> Result<(), DisplayBackendError> {
        if self.fail_mode_sets {
            return Err(DisplayBackendError::ModeSetError(format!(
                "host refused {} mode at {}",
                request.mode, request.resolution
            )));
        }
        if !self.supports_mode(request.mode, request.rotate90) {
            return Err(DisplayBackendError::UnsupportedMode(format!(
                "{} (rotate90: {})",
                request.mode, request.rotate90
            )));
        }

        let bpp = self.format.bytes_per_pixel();
        let pitch = request.resolution.w as usize * bpp;
        let len_bytes = pitch * request.resolution.h as usize;
        self.buffer.clear();
        self.buffer.resize((len_bytes + 3) / 4, 0);
        self.pitch = pitch;
        self.current = Some(*request);
        self.mode_sets += 1;
        log::debug!(
            "MemoryBackend: set {} mode {} ({} bytes, pitch {})",
            request.mode,
            request.resolution,
            len_bytes,
            pitch
        );
        Ok(())
    }

    fn pixel_format(&self) -> PixelFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a8_common::VideoGeometry;

    fn request(res: Resolution) -> VideoModeRequest {
        VideoModeRequest {
            resolution: res,
            windowed: false,
            mode: DisplayMode::Normal,
            rotate90: false,
            geometry: VideoGeometry::default(),
        }
    }

    #[test]
    fn set_video_mode_allocates_framebuffer() {
        let mut backend = MemoryBackend::default();
        backend.set_video_mode(&request(Resolution::new(640, 480))).unwrap();
        assert_eq!(backend.pitch(), 640 * 4);
        assert_eq!(backend.framebuffer().len(), 640 * 480 * 4);
        assert_eq!(backend.mode_set_count(), 1);
    }

    #[test]
    fn failing_backend_keeps_previous_mode() {
        let mut backend = MemoryBackend::default();
        backend.set_video_mode(&request(Resolution::new(640, 480))).unwrap();
        backend.set_failing(true);
        assert!(backend.set_video_mode(&request(Resolution::new(800, 600))).is_err());
        assert_eq!(backend.current_mode().unwrap().resolution, Resolution::new(640, 480));
    }

    #[test]
    fn rotation_only_in_normal_mode() {
        let backend = MemoryBackend::default();
        assert!(backend.supports_mode(DisplayMode::Normal, true));
        assert!(!backend.supports_mode(DisplayMode::Xep80, true));
        assert!(!MemoryBackend::default().with_rotation(false).supports_mode(DisplayMode::Normal, true));
    }

    #[test]
    fn to_rgba_565() {
        let mut backend = MemoryBackend::new(vec![Resolution::new(2, 1)], Resolution::new(2, 1), PixelFormat::RGB565);
        backend.set_video_mode(&request(Resolution::new(2, 1))).unwrap();
        backend.framebuffer_mut()[..4].copy_from_slice(&[0x00, 0xF8, 0x1F, 0x00]);
        assert_eq!(backend.to_rgba(None), vec![0xFF, 0, 0, 0xFF, 0, 0, 0xFF, 0xFF]);
    }
}
