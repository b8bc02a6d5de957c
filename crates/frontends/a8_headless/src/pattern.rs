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

    a8_headless::pattern.rs

    Indexed test frames used in place of an emulated ANTIC/GTIA frame.
*/

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum TestPattern {
    /// 16 hue bars over a grey ramp.
    #[default]
    #[strum(serialize = "BARS")]
    Bars,
    /// Every colour index as a 16x16 grid.
    #[strum(serialize = "HUES")]
    Hues,
    /// Alternating white and black hi-res columns. Shows NTSC artifact colours.
    #[strum(serialize = "STRIPES")]
    Stripes,
    /// 8x8 checkerboard of two colours with different hues. Shows PAL delay-line blending.
    #[strum(serialize = "CHECKER")]
    Checker,
}

pub fn generate(pattern: TestPattern, width: usize, height: usize) -> Vec<u8> {
    let mut frame = vec![0u8; width * height];
    if width == 0 || height == 0 {
        return frame;
    }

    for (y, row) in frame.chunks_exact_mut(width).enumerate() {
        for (x, px) in row.iter_mut().enumerate() {
            *px = match pattern {
                TestPattern::Bars if y < height * 2 / 3 => (((x * 16 / width) as u8) << 4) | 0x08,
                TestPattern::Bars => ((x * 16 / width) as u8) & 0x0F,
                TestPattern::Hues => (((y * 16 / height) as u8) << 4) | ((x * 16 / width) as u8),
                TestPattern::Stripes if x % 2 == 0 => 0x0F,
                TestPattern::Stripes => 0x00,
                TestPattern::Checker if (x / 8 + y / 8) % 2 == 0 => 0x94,
                TestPattern::Checker => 0x36,
            };
        }
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_cover_every_hue_and_luma() {
        let frame = generate(TestPattern::Bars, 384, 240);
        assert_eq!(frame.len(), 384 * 240);
        assert_eq!(frame[0], 0x08);
        assert_eq!(frame[383], 0xF8);
        assert_eq!(frame[239 * 384], 0x00);
        assert_eq!(frame[239 * 384 + 383], 0x0F);
    }

    #[test]
    fn hues_grid_holds_all_indices() {
        let frame = generate(TestPattern::Hues, 384, 240);
        let mut seen = [false; 256];
        for &p in &frame {
            seen[p as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn stripes_and_checker() {
        let frame = generate(TestPattern::Stripes, 16, 2);
        assert_eq!(&frame[..4], &[0x0F, 0x00, 0x0F, 0x00]);
        let frame = generate(TestPattern::Checker, 16, 16);
        assert_eq!(frame[0], 0x94);
        assert_eq!(frame[8], 0x36);
        assert_eq!(frame[8 * 16 + 8], 0x94);
        assert!(generate(TestPattern::Checker, 0, 10).is_empty());
        assert_eq!("checker".parse::<TestPattern>().unwrap(), TestPattern::Checker);
    }
}
