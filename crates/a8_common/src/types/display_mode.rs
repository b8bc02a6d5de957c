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

    a8_common::types::display_mode.rs

    The closed set of display modes a frame can be presented in.
*/

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// What is being shown: the normal ANTIC/GTIA frame, the same frame widened by the NTSC
/// composite filter, or the screen of one of the 80-column devices.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum DisplayMode {
    #[default]
    #[strum(serialize = "NORMAL")]
    Normal,
    #[strum(serialize = "NTSC_FILTER")]
    NtscFiltered,
    #[strum(serialize = "XEP80")]
    Xep80,
    #[strum(serialize = "PROTO80")]
    Proto80,
    #[strum(serialize = "AF80")]
    Af80,
}

impl DisplayMode {
    #[inline]
    pub fn is_80_column(&self) -> bool {
        matches!(self, DisplayMode::Xep80 | DisplayMode::Proto80 | DisplayMode::Af80)
    }
}
