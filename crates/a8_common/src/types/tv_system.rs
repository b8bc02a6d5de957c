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

    a8_common::types::tv_system.rs

    Television standard of the emulated machine.
*/

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum TvSystem {
    #[default]
    #[strum(serialize = "PAL")]
    Pal,
    #[strum(serialize = "NTSC")]
    Ntsc,
}

impl TvSystem {
    /// Physical width/height ratio of one Atari hi-res pixel on a standard television.
    pub fn pixel_aspect(&self) -> f64 {
        match self {
            TvSystem::Pal => 14.75 / 14.187576,
            TvSystem::Ntsc => (12.0 + 3.0 / 11.0) / 14.31818,
        }
    }

    /// Default hue step between successive GTIA colours, in degrees.
    pub fn default_color_delay(&self) -> f64 {
        match self {
            TvSystem::Pal => 23.2,
            TvSystem::Ntsc => 26.8,
        }
    }
}
