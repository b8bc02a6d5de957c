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

    a8_headless::lib.rs

    A8Video headless frontend main library component.

    Negotiates a video mode against an in-memory backend, renders a test frame
    through the video pipeline and reports the resulting geometry.
*/

#![forbid(unsafe_code)]

pub mod cli;
pub mod pattern;

use a8_common::{util::format_duration, DisplayMode, PixelFormat, Resolution, VideoGeometry, SCREEN_HEIGHT, SCREEN_WIDTH};
use a8_config::{read_config_file, write_config_file, VideoConfig};
use a8_display_backend::{MemoryBackend, STANDARD_RESOLUTIONS};
use a8_video_renderer::{ArtifactMode, VideoRenderer};
use a8_videomode::{DisplayModeSpec, VideoModeNegotiator};
use anyhow::Context;
use serde::Serialize;

use crate::cli::{cli_args, CmdLineArgs};

pub const DESKTOP_RESOLUTION: Resolution = Resolution::new(1920, 1080);

/// What was rendered and where.
#[derive(Debug, Serialize)]
pub struct RenderReport {
    pub display_mode: DisplayMode,
    pub windowed: bool,
    pub rotate90: bool,
    pub bpp: u32,
    pub artifact: ArtifactMode,
    pub effective_artifact: ArtifactMode,
    pub render_time: String,
    pub resolution: Resolution,
    pub geometry: VideoGeometry,
}

/// Size of the indexed frame a display mode reads from.
pub fn frame_size(mode: DisplayMode) -> (usize, usize) {
    if mode.is_80_column() {
        let spec = DisplayModeSpec::for_mode(mode);
        (spec.full_w as usize, spec.full_h as usize)
    }
    else {
        (SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

fn pixel_format(bpp: u32) -> anyhow::Result<PixelFormat> {
    match bpp {
        8 => Ok(PixelFormat::INDEXED8),
        16 => Ok(PixelFormat::RGB565),
        32 => Ok(PixelFormat::XRGB8888),
        _ => anyhow::bail!("Unsupported framebuffer depth: {} bpp", bpp),
    }
}

/// Overlay the command line on top of the configuration file.
pub fn apply_args(config: &mut VideoConfig, args: &CmdLineArgs) {
    let vm = &mut config.videomode;
    if args.fullscreen {
        vm.windowed = false;
    }
    if let Some(res) = args.resolution {
        if vm.windowed {
            vm.window = res;
        }
        else {
            vm.fullscreen = Some(res);
        }
    }
    if let Some(tv) = args.tv {
        vm.tv_system = tv;
    }
    if args.ntsc_filter {
        vm.ntsc_filter = true;
    }
    if let Some(stretch) = args.stretch {
        vm.stretch = stretch;
    }
    if let Some(keep_aspect) = args.keep_aspect {
        vm.keep_aspect = keep_aspect;
    }
    if args.rotate {
        vm.rotate90 = true;
    }
    if let Some(artifact) = args.artifact {
        config.artifact_pal = artifact;
    }
}

pub fn run_with_args(args: &CmdLineArgs) -> anyhow::Result<RenderReport> {
    let mut config = match &args.config {
        Some(path) => read_config_file(path)?,
        None => VideoConfig::default(),
    };
    apply_args(&mut config, args);

    if let Some(path) = &args.save_config {
        write_config_file(path, &config)?;
    }

    let format = pixel_format(args.bpp)?;
    let backend = MemoryBackend::new(STANDARD_RESOLUTIONS.to_vec(), DESKTOP_RESOLUTION, format);
    let mut vm = VideoModeNegotiator::new(backend, config.videomode.clone()).context("No usable video mode")?;

    let mut renderer = VideoRenderer::new(config.videomode.tv_system, format);
    config.apply_colours(renderer.decoder_mut())?;
    renderer.set_artifact_mode(config.artifact_pal);

    let current = *vm.current();
    let (frame_w, frame_h) = frame_size(current.mode);
    let frame = pattern::generate(args.pattern, frame_w, frame_h);

    let pitch = vm.backend().pitch();
    renderer.draw(
        &frame,
        frame_w,
        current.mode,
        &current.geometry,
        current.rotate90,
        vm.backend_mut().framebuffer_mut(),
        pitch,
        format,
    )?;
    let render_time = renderer.get_last_render_time();
    log::debug!("Rendered {} frame in {}", current.mode, format_duration(render_time));

    if let Some(path) = &args.screenshot {
        renderer.save_screenshot(&frame, frame_w, current.mode, &current.geometry, current.rotate90, path)?;
    }
    if let Some(path) = &args.framebuffer {
        let rgba = vm.backend().to_rgba(Some(renderer.decoder().palette()));
        image::save_buffer(
            path,
            &rgba,
            current.resolution.w,
            current.resolution.h,
            image::ColorType::Rgba8,
        )
        .with_context(|| format!("Error writing framebuffer: {}", path.display()))?;
        log::info!("Saved framebuffer: {}", path.display());
    }

    Ok(RenderReport {
        display_mode: current.mode,
        windowed: current.windowed,
        rotate90: current.rotate90,
        bpp: format.bpp(),
        artifact: renderer.artifact_mode(),
        effective_artifact: renderer.effective_artifact_mode(current.mode, current.rotate90, format),
        render_time: format_duration(render_time),
        resolution: current.resolution,
        geometry: current.geometry,
    })
}

pub fn run() -> anyhow::Result<()> {
    env_logger::init();

    let args = cli_args().run();
    let report = run_with_args(&args)?;
    print!("{}", toml::to_string(&report)?);
    Ok(())
}
