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

    a8_common::types::geometry.rs

    Host resolutions and the source/destination rectangles of a video mode.
*/

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Resolution {
    pub w: u32,
    pub h: u32,
}

impl Resolution {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    #[inline]
    pub fn holds(&self, w: u32, h: u32) -> bool {
        self.w >= w && self.h >= h
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        if self.h == 0 {
            return 1.0;
        }
        self.w as f64 / self.h as f64
    }

    #[inline]
    pub fn transposed(&self) -> Self {
        Self { w: self.h, h: self.w }
    }
}

impl From<(u32, u32)> for Resolution {
    fn from(t: (u32, u32)) -> Self {
        Self { w: t.0, h: t.1 }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

impl FromStr for Resolution {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(|| format!("Invalid resolution '{}', expected WIDTHxHEIGHT", s))?;
        let w = w.trim().parse::<u32>().map_err(|e| format!("Invalid width '{}': {}", w, e))?;
        let h = h.trim().parse::<u32>().map_err(|e| format!("Invalid height '{}': {}", h, e))?;
        if w == 0 || h == 0 {
            return Err(format!("Invalid resolution '{}': dimensions must be non-zero", s));
        }
        Ok(Resolution { w, h })
    }
}

/// The rectangle cropped out of the display mode's full frame (`src_*`) and the rectangle
/// of the host framebuffer it is scaled into (`dest_*`). `src_*` is expressed in the
/// display mode's native pixels, before any rotation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoGeometry {
    pub src_offset_left: u32,
    pub src_offset_top: u32,
    pub src_width: u32,
    pub src_height: u32,
    pub dest_offset_left: u32,
    pub dest_offset_top: u32,
    pub dest_width: u32,
    pub dest_height: u32,
}

impl VideoGeometry {
    /// True if the source rectangle lies inside a `full_w` x `full_h` frame and the
    /// destination rectangle inside `res`.
    pub fn fits(&self, full_w: u32, full_h: u32, res: Resolution) -> bool {
        self.src_width > 0
            && self.src_height > 0
            && self.dest_width > 0
            && self.dest_height > 0
            && self.src_offset_left + self.src_width <= full_w
            && self.src_offset_top + self.src_height <= full_h
            && self.dest_offset_left + self.dest_width <= res.w
            && self.dest_offset_top + self.dest_height <= res.h
    }

    #[inline]
    pub fn is_scaled(&self) -> bool {
        self.src_width != self.dest_width || self.src_height != self.dest_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_from_str() {
        assert_eq!("640x480".parse::<Resolution>(), Ok(Resolution::new(640, 480)));
        assert_eq!(" 1920X1080 ".parse::<Resolution>(), Ok(Resolution::new(1920, 1080)));
        assert!("640".parse::<Resolution>().is_err());
        assert!("0x480".parse::<Resolution>().is_err());
        assert!("axb".parse::<Resolution>().is_err());
    }

    #[test]
    fn resolutions_order_by_width_then_height() {
        let mut list = vec![Resolution::new(800, 600), Resolution::new(640, 480), Resolution::new(640, 400)];
        list.sort();
        assert_eq!(list[0], Resolution::new(640, 400));
        assert_eq!(list[2], Resolution::new(800, 600));
    }
}
