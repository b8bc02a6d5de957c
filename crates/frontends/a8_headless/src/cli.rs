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

    a8_headless::cli.rs

    Command line arguments. Arguments override the configuration file.
*/

use std::path::PathBuf;

use a8_common::{Resolution, TvSystem};
use a8_video_renderer::ArtifactMode;
use a8_videomode::{KeepAspect, StretchMode};
use bpaf::Bpaf;

use crate::pattern::TestPattern;

#[derive(Debug, Clone, Default, Bpaf)]
#[bpaf(options, version, generate(cli_args))]
pub struct CmdLineArgs {
    /// Configuration file in KEY=VALUE format
    #[bpaf(long("config"), long("config_file"), argument("PATH"))]
    pub config: Option<PathBuf>,

    /// Host resolution as WIDTHxHEIGHT (window size, or fullscreen mode with --fullscreen)
    #[bpaf(long, argument("WxH"))]
    pub resolution: Option<Resolution>,

    /// Use a fullscreen video mode
    #[bpaf(long("fullscreen"), long("full_screen"), switch)]
    pub fullscreen: bool,

    /// Host framebuffer depth: 8, 16 or 32
    #[bpaf(long, argument("BPP"), fallback(32))]
    pub bpp: u32,

    /// Television system: PAL or NTSC
    #[bpaf(long, argument("TV"))]
    pub tv: Option<TvSystem>,

    /// PAL artifact mode: NONE, BLEND, HIGH or HIGH_BLUR
    #[bpaf(long, argument("MODE"))]
    pub artifact: Option<ArtifactMode>,

    /// Show NTSC machines through the composite filter
    #[bpaf(long("ntsc-filter"), switch)]
    pub ntsc_filter: bool,

    /// Stretch: NONE, INTEGER, FULL or a factor
    #[bpaf(long, argument("STRETCH"))]
    pub stretch: Option<StretchMode>,

    /// Keep aspect: NONE, 1TO1 or REAL
    #[bpaf(long("keep-aspect"), argument("ASPECT"))]
    pub keep_aspect: Option<KeepAspect>,

    /// Rotate the screen 90 degrees
    #[bpaf(long, switch)]
    pub rotate: bool,

    /// Test frame: BARS, HUES, STRIPES or CHECKER
    #[bpaf(long, argument("PATTERN"), fallback(TestPattern::Bars))]
    pub pattern: TestPattern,

    /// Save the rendered picture as a PNG file
    #[bpaf(long, argument("PATH"))]
    pub screenshot: Option<PathBuf>,

    /// Save the whole host framebuffer as a PNG file
    #[bpaf(long, argument("PATH"))]
    pub framebuffer: Option<PathBuf>,

    /// Write the effective configuration to a file
    #[bpaf(long("save-config"), argument("PATH"))]
    pub save_config: Option<PathBuf>,
}
