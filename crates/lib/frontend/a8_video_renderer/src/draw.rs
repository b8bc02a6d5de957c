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

    a8_video_renderer::draw.rs

    Per-frame drawing: pick the artifact path for the display mode, pixel depth
    and rotation, and blit the visible source rectangle into the host framebuffer.
*/

use std::{collections::VecDeque, path::Path, time::Duration};

use a8_common::{DisplayMode, PixelFormat, TvSystem, VideoGeometry, SCREEN_WIDTH};
use anyhow::Context;
use web_time::Instant;

use crate::{
    blit,
    color::ColorDecoder,
    ntsc::NtscFilter,
    pal_blend::PalBlender,
    pal_high::PalHighEngine,
    ArtifactMode,
    RenderError,
};

/// Events that the renderer can return. These should be drained every frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RendererEvent {
    ScreenshotSaved,
    LookupRebuilt,
}

pub struct VideoRenderer {
    decoder: ColorDecoder,
    artifact_mode: ArtifactMode,
    last_effective: ArtifactMode,
    format: PixelFormat,

    packed: [u32; 256],
    packed_for: Option<(u64, PixelFormat)>,
    blender: PalBlender,
    high: Box<PalHighEngine>,
    ntsc: Box<NtscFilter>,

    last_render_time: Duration,
    event_queue: VecDeque<RendererEvent>,
}

impl VideoRenderer {
    pub fn new(tv: TvSystem, format: PixelFormat) -> Self {
        let decoder = ColorDecoder::new(tv);
        let high = Box::new(PalHighEngine::new(&decoder, format));
        let mut renderer = Self {
            decoder,
            artifact_mode: ArtifactMode::None,
            last_effective: ArtifactMode::None,
            format,
            packed: [0; 256],
            packed_for: None,
            blender: PalBlender::new(),
            high,
            ntsc: Box::new(NtscFilter::new()),
            last_render_time: Duration::ZERO,
            event_queue: VecDeque::new(),
        };
        renderer.update_lookup(format);
        renderer
    }

    pub fn get_event(&mut self) -> Option<RendererEvent> {
        self.event_queue.pop_front()
    }

    pub fn send_event(&mut self, event: RendererEvent) {
        self.event_queue.push_back(event);
    }

    pub fn get_last_render_time(&self) -> Duration {
        self.last_render_time
    }

    pub fn decoder(&self) -> &ColorDecoder {
        &self.decoder
    }

    /// Changes made through the returned decoder are picked up by the next `draw`.
    pub fn decoder_mut(&mut self) -> &mut ColorDecoder {
        &mut self.decoder
    }

    pub fn set_tv_system(&mut self, tv: TvSystem) {
        self.decoder.set_tv_system(tv);
    }

    pub fn artifact_mode(&self) -> ArtifactMode {
        self.artifact_mode
    }

    pub fn set_artifact_mode(&mut self, mode: ArtifactMode) {
        if mode != self.artifact_mode {
            log::debug!("Artifact mode: {} -> {}", self.artifact_mode, mode);
            self.artifact_mode = mode;
            self.high.reset_delay();
        }
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The plain palette packed in the current pixel format.
    pub fn packed_palette(&self) -> &[u32; 256] {
        &self.packed
    }

    /// Bring every lookup table up to date with the decoder and `format`.
    pub fn update_lookup(&mut self, format: PixelFormat) {
        self.format = format;
        let mut rebuilt = false;

        if self.packed_for != Some((self.decoder.generation(), format)) {
            for (i, p) in self.packed.iter_mut().enumerate() {
                let (r, g, b) = self.decoder.rgb(i as u8);
                *p = format.pack(r, g, b);
            }
            self.packed_for = Some((self.decoder.generation(), format));
            rebuilt = true;
        }
        if !format.is_indexed() {
            rebuilt |= self.blender.rebuild_if_stale(&self.decoder, format);
            rebuilt |= self.high.rebuild_if_stale(&self.decoder, format);
            rebuilt |= self.ntsc.rebuild_if_stale(&self.decoder, format);
        }
        if rebuilt {
            self.send_event(RendererEvent::LookupRebuilt);
        }
    }

    /// The artifact mode that will actually be used. The PAL modes need a PAL decoder, a 16 or
    /// 32 bpp surface, the normal display mode and no rotation.
    pub fn effective_artifact_mode(&self, mode: DisplayMode, rotate: bool, format: PixelFormat) -> ArtifactMode {
        let supported = self.decoder.tv_system() == TvSystem::Pal
            && !format.is_indexed()
            && mode == DisplayMode::Normal
            && !rotate;
        if supported {
            self.artifact_mode
        }
        else {
            ArtifactMode::None
        }
    }

    /// Draw the visible part of an indexed frame into `dest`, a host framebuffer laid out in
    /// `format` with `dest_pitch` bytes per row. `geometry` gives the source rectangle in the
    /// display mode's native pixels and the destination rectangle in host pixels.
    pub fn draw(
        &mut self,
        frame: &[u8],
        frame_pitch: usize,
        mode: DisplayMode,
        geometry: &VideoGeometry,
        rotate: bool,
        dest: &mut [u8],
        dest_pitch: usize,
        format: PixelFormat,
    ) -> Result<(), RenderError> {
        let render_start = Instant::now();

        if mode == DisplayMode::NtscFiltered && format.is_indexed() {
            return Err(RenderError::UnsupportedFormat { mode, bpp: format.bpp() });
        }
        let bytes_pp = format.bytes_per_pixel();
        if dest_pitch % bytes_pp != 0 {
            return Err(RenderError::Misaligned(format.bpp()));
        }
        let pitch = dest_pitch / bytes_pp;

        let (src_w, src_h) = (geometry.src_width as usize, geometry.src_height as usize);
        let (dest_w, dest_h) = (geometry.dest_width as usize, geometry.dest_height as usize);
        if src_w == 0 || src_h == 0 || dest_w == 0 || dest_h == 0 {
            return Ok(());
        }

        // The NTSC filter always consumes whole Atari rows; the other paths read only the crop.
        let ntsc_row = SCREEN_WIDTH.min(frame_pitch);
        let (src_left, src_top) = (geometry.src_offset_left as usize, geometry.src_offset_top as usize);
        let frame_needed = match mode {
            DisplayMode::NtscFiltered => (src_top + src_h - 1) * frame_pitch + ntsc_row,
            _ => (src_top + src_h - 1) * frame_pitch + src_left + src_w,
        };
        if frame.len() < frame_needed {
            return Err(RenderError::FrameTooSmall {
                needed: frame_needed,
                available: frame.len(),
            });
        }

        let dest_start = geometry.dest_offset_top as usize * pitch + geometry.dest_offset_left as usize;
        let dest_needed = (dest_start + (dest_h - 1) * pitch + dest_w) * bytes_pp;
        if dest.len() < dest_needed || dest_w + (geometry.dest_offset_left as usize) > pitch {
            return Err(RenderError::DestinationTooSmall {
                needed: dest_needed,
                available: dest.len(),
            });
        }

        self.update_lookup(format);

        let effective = self.effective_artifact_mode(mode, rotate, format);
        if effective != self.last_effective {
            if effective != self.artifact_mode {
                log::warn!(
                    "Artifact mode {} is unavailable for {} at {}bpp on {}; drawing without artifacts",
                    self.artifact_mode,
                    mode,
                    format.bpp(),
                    self.decoder.tv_system()
                );
            }
            self.last_effective = effective;
        }

        let src = &frame[src_top * frame_pitch + src_left..];
        let parity = src_top & 1;
        let scaled = geometry.is_scaled();
        if effective.is_pal_high() {
            self.high.reset_delay();
        }

        match format.bpp() {
            8 => {
                let d = &mut dest[dest_start..];
                if rotate {
                    blit::blit_rotated8(d, pitch, dest_w, dest_h, src, frame_pitch, src_w, src_h);
                }
                else if scaled {
                    blit::blit_scaled8(d, pitch, dest_w, dest_h, src, frame_pitch, src_w, src_h);
                }
                else {
                    blit::blit8(d, pitch, src, frame_pitch, src_w, src_h);
                }
            }
            16 => {
                let len = dest.len() / 2 * 2;
                let pixels: &mut [u16] =
                    bytemuck::try_cast_slice_mut(&mut dest[..len]).map_err(|_| RenderError::Misaligned(16))?;
                let d = &mut pixels[dest_start..];
                match (mode, effective) {
                    (DisplayMode::NtscFiltered, _) => self.ntsc.blit16(d, pitch, frame, frame_pitch, ntsc_row, geometry),
                    (_, ArtifactMode::PalBlend) if scaled => {
                        self.blender
                            .blit_scaled16(d, pitch, dest_w, dest_h, src, frame_pitch, src_w, src_h, parity)
                    }
                    (_, ArtifactMode::PalBlend) => self.blender.blit16(d, pitch, src, frame_pitch, src_w, src_h, parity),
                    (_, ArtifactMode::PalHigh | ArtifactMode::PalHighBlur) if scaled => self.high.blit_high_scaled16(
                        d,
                        pitch,
                        dest_w,
                        dest_h,
                        src,
                        frame_pitch,
                        src_w,
                        src_h,
                        parity,
                        effective == ArtifactMode::PalHighBlur,
                    ),
                    (_, ArtifactMode::PalHigh) => self.high.blit_high16(d, pitch, src, frame_pitch, src_w, src_h, parity),
                    (_, ArtifactMode::PalHighBlur) => {
                        self.high
                            .blit_high_blur16(d, pitch, src, frame_pitch, src_w, src_h, parity)
                    }
                    (_, ArtifactMode::None) if rotate => {
                        blit::blit_rotated16(d, pitch, dest_w, dest_h, src, frame_pitch, src_w, src_h, &self.packed)
                    }
                    (_, ArtifactMode::None) if scaled => {
                        blit::blit_scaled16(d, pitch, dest_w, dest_h, src, frame_pitch, src_w, src_h, &self.packed)
                    }
                    (_, ArtifactMode::None) => blit::blit16(d, pitch, src, frame_pitch, src_w, src_h, &self.packed),
                }
            }
            _ => {
                let len = dest.len() / 4 * 4;
                let pixels: &mut [u32] =
                    bytemuck::try_cast_slice_mut(&mut dest[..len]).map_err(|_| RenderError::Misaligned(32))?;
                let d = &mut pixels[dest_start..];
                match (mode, effective) {
                    (DisplayMode::NtscFiltered, _) => self.ntsc.blit32(d, pitch, frame, frame_pitch, ntsc_row, geometry),
                    (_, ArtifactMode::PalBlend) if scaled => {
                        self.blender
                            .blit_scaled32(d, pitch, dest_w, dest_h, src, frame_pitch, src_w, src_h, parity)
                    }
                    (_, ArtifactMode::PalBlend) => self.blender.blit32(d, pitch, src, frame_pitch, src_w, src_h, parity),
                    (_, ArtifactMode::PalHigh | ArtifactMode::PalHighBlur) if scaled => self.high.blit_high_scaled32(
                        d,
                        pitch,
                        dest_w,
                        dest_h,
                        src,
                        frame_pitch,
                        src_w,
                        src_h,
                        parity,
                        effective == ArtifactMode::PalHighBlur,
                    ),
                    (_, ArtifactMode::PalHigh) => self.high.blit_high32(d, pitch, src, frame_pitch, src_w, src_h, parity),
                    (_, ArtifactMode::PalHighBlur) => {
                        self.high
                            .blit_high_blur32(d, pitch, src, frame_pitch, src_w, src_h, parity)
                    }
                    (_, ArtifactMode::None) if rotate => {
                        blit::blit_rotated32(d, pitch, dest_w, dest_h, src, frame_pitch, src_w, src_h, &self.packed)
                    }
                    (_, ArtifactMode::None) if scaled => {
                        blit::blit_scaled32(d, pitch, dest_w, dest_h, src, frame_pitch, src_w, src_h, &self.packed)
                    }
                    (_, ArtifactMode::None) => blit::blit32(d, pitch, src, frame_pitch, src_w, src_h, &self.packed),
                }
            }
        }

        self.last_render_time = render_start.elapsed();
        Ok(())
    }

    /// Render the destination rectangle of `geometry` into a tightly packed RGBA image.
    pub fn render_rgba(
        &mut self,
        frame: &[u8],
        frame_pitch: usize,
        mode: DisplayMode,
        geometry: &VideoGeometry,
        rotate: bool,
    ) -> Result<Vec<u32>, RenderError> {
        let restore = self.format;
        let local = VideoGeometry {
            dest_offset_left: 0,
            dest_offset_top: 0,
            ..*geometry
        };
        let (w, h) = (local.dest_width as usize, local.dest_height as usize);
        let mut pixels = vec![0u32; w * h];
        let result = self.draw(
            frame,
            frame_pitch,
            mode,
            &local,
            rotate,
            bytemuck::cast_slice_mut(&mut pixels),
            w * 4,
            PixelFormat::XBGR8888,
        );
        self.update_lookup(restore);
        result?;

        for p in pixels.iter_mut() {
            *p |= 0xFF00_0000;
        }
        Ok(pixels)
    }

    /// Render the frame through the current pipeline and save it as a PNG file.
    pub fn save_screenshot(
        &mut self,
        frame: &[u8],
        frame_pitch: usize,
        mode: DisplayMode,
        geometry: &VideoGeometry,
        rotate: bool,
        path: &Path,
    ) -> anyhow::Result<()> {
        let pixels = self.render_rgba(frame, frame_pitch, mode, geometry, rotate)?;

        image::save_buffer(
            path,
            bytemuck::cast_slice(&pixels),
            geometry.dest_width,
            geometry.dest_height,
            image::ColorType::Rgba8,
        )
        .with_context(|| format!("Error writing screenshot: {}", path.display()))?;

        log::info!("Saved screenshot: {}", path.display());
        self.send_event(RendererEvent::ScreenshotSaved);
        Ok(())
    }
}
