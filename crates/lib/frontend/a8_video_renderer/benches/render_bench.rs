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

    benches::render_bench.rs

    Benchmarks for the frame renderer.
*/

use a8_common::{DisplayMode, PixelFormat, TvSystem, VideoGeometry, SCREEN_HEIGHT, SCREEN_WIDTH};
use a8_video_renderer::{ArtifactMode, VideoRenderer};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

const HOST_W: usize = 1024;
const HOST_H: usize = 768;

fn random_frame() -> Vec<u8> {
    let mut rng = rand::rng();
    (0..SCREEN_WIDTH * SCREEN_HEIGHT).map(|_| rng.random::<u8>()).collect()
}

fn geometry(scale: u32) -> VideoGeometry {
    VideoGeometry {
        src_offset_left: 24,
        src_offset_top: 0,
        src_width: 336,
        src_height: 240,
        dest_offset_left: 0,
        dest_offset_top: 0,
        dest_width: 336 * scale,
        dest_height: 240 * scale,
    }
}

fn bench_mode(c: &mut Criterion, name: &str, tv: TvSystem, artifact: ArtifactMode, mode: DisplayMode, g: VideoGeometry) {
    let frame = random_frame();
    let mut renderer = VideoRenderer::new(tv, PixelFormat::XRGB8888);
    renderer.set_artifact_mode(artifact);
    let mut dest = vec![0u8; HOST_W * HOST_H * 4];

    c.bench_function(name, |b| {
        b.iter(|| {
            renderer
                .draw(
                    black_box(&frame),
                    SCREEN_WIDTH,
                    mode,
                    &g,
                    false,
                    &mut dest,
                    HOST_W * 4,
                    PixelFormat::XRGB8888,
                )
                .ok();
        })
    });
}

pub fn render_plain_bench(c: &mut Criterion) {
    bench_mode(c, "render_plain_1x", TvSystem::Pal, ArtifactMode::None, DisplayMode::Normal, geometry(1));
    bench_mode(c, "render_plain_2x", TvSystem::Pal, ArtifactMode::None, DisplayMode::Normal, geometry(2));
}

pub fn render_pal_bench(c: &mut Criterion) {
    bench_mode(c, "render_pal_blend_2x", TvSystem::Pal, ArtifactMode::PalBlend, DisplayMode::Normal, geometry(2));
    bench_mode(c, "render_pal_high_1x", TvSystem::Pal, ArtifactMode::PalHigh, DisplayMode::Normal, geometry(1));
    bench_mode(c, "render_pal_high_blur_2x", TvSystem::Pal, ArtifactMode::PalHighBlur, DisplayMode::Normal, geometry(2));
}

pub fn render_ntsc_bench(c: &mut Criterion) {
    let g = VideoGeometry {
        src_offset_left: 42,
        src_width: 588,
        dest_width: 588,
        ..geometry(1)
    };
    bench_mode(c, "render_ntsc_filter", TvSystem::Ntsc, ArtifactMode::None, DisplayMode::NtscFiltered, g);
}

criterion_group!(benches, render_plain_bench, render_pal_bench, render_ntsc_bench);
criterion_main!(benches);
