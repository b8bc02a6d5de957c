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

    a8_common::types::pixel_format.rs

    Describes the layout of a host framebuffer pixel.
*/

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PixelFormatError {
    #[error("Unsupported bit depth: {0}")]
    UnsupportedDepth(u32),
    #[error("Channel mask {0:#x} is empty or not contiguous")]
    BadMask(u32),
    #[error("Channel mask {0:#x} does not fit in {1} bits")]
    TooWide(u32, u32),
    #[error("Channel masks overlap")]
    Overlap,
}

/// Host pixel layout: bit depth and the masks of the red, green and blue channels.
/// An 8 bpp format is palettized and carries no channel masks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelFormat {
    bpp: u32,
    r_mask: u32,
    g_mask: u32,
    b_mask: u32,
}

impl Default for PixelFormat {
    fn default() -> Self {
        PixelFormat::XRGB8888
    }
}

impl PixelFormat {
    pub const INDEXED8: PixelFormat = PixelFormat {
        bpp: 8,
        r_mask: 0,
        g_mask: 0,
        b_mask: 0,
    };
    pub const RGB565: PixelFormat = PixelFormat {
        bpp: 16,
        r_mask: 0xF800,
        g_mask: 0x07E0,
        b_mask: 0x001F,
    };
    pub const RGB555: PixelFormat = PixelFormat {
        bpp: 16,
        r_mask: 0x7C00,
        g_mask: 0x03E0,
        b_mask: 0x001F,
    };
    pub const XRGB8888: PixelFormat = PixelFormat {
        bpp: 32,
        r_mask: 0x00FF_0000,
        g_mask: 0x0000_FF00,
        b_mask: 0x0000_00FF,
    };
    /// Byte order R,G,B,X in memory on little-endian hosts.
    pub const XBGR8888: PixelFormat = PixelFormat {
        bpp: 32,
        r_mask: 0x0000_00FF,
        g_mask: 0x0000_FF00,
        b_mask: 0x00FF_0000,
    };

    pub fn new(bpp: u32, r_mask: u32, g_mask: u32, b_mask: u32) -> Result<Self, PixelFormatError> {
        match bpp {
            8 => return Ok(PixelFormat::INDEXED8),
            16 | 32 => {}
            _ => return Err(PixelFormatError::UnsupportedDepth(bpp)),
        }

        for mask in [r_mask, g_mask, b_mask] {
            if mask == 0 {
                return Err(PixelFormatError::BadMask(mask));
            }
            let m = mask >> mask.trailing_zeros();
            if m & m.wrapping_add(1) != 0 {
                return Err(PixelFormatError::BadMask(mask));
            }
            if bpp < 32 && (mask >> bpp) != 0 {
                return Err(PixelFormatError::TooWide(mask, bpp));
            }
        }

        if (r_mask & g_mask) | (r_mask & b_mask) | (g_mask & b_mask) != 0 {
            return Err(PixelFormatError::Overlap);
        }

        Ok(PixelFormat {
            bpp,
            r_mask,
            g_mask,
            b_mask,
        })
    }

    #[inline]
    pub fn bpp(&self) -> u32 {
        self.bpp
    }

    #[inline]
    pub fn masks(&self) -> (u32, u32, u32) {
        (self.r_mask, self.g_mask, self.b_mask)
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.bpp == 8
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        (self.bpp / 8) as usize
    }

    /// Mask applied to `a ^ b` before the shift in the carry-free average
    /// `(a & b) + (((a ^ b) & mask) >> 1)`. The lowest bit of each channel is cleared so
    /// that it cannot shift into the channel below it.
    pub fn average_mask(&self) -> u32 {
        let lsb = |m: u32| m & !(m << 1);
        (self.r_mask | self.g_mask | self.b_mask) & !(lsb(self.r_mask) | lsb(self.g_mask) | lsb(self.b_mask))
    }

    /// Pack 8-bit channel values into a pixel of this format.
    #[inline]
    pub fn pack(&self, r: u8, g: u8, b: u8) -> u32 {
        pack_channel(r, self.r_mask) | pack_channel(g, self.g_mask) | pack_channel(b, self.b_mask)
    }

    /// Unpack a pixel of this format into 8-bit channel values, replicating high bits into
    /// the low bits of narrow channels.
    #[inline]
    pub fn unpack(&self, pixel: u32) -> (u8, u8, u8) {
        (
            unpack_channel(pixel, self.r_mask),
            unpack_channel(pixel, self.g_mask),
            unpack_channel(pixel, self.b_mask),
        )
    }
}

#[inline]
fn pack_channel(v: u8, mask: u32) -> u32 {
    if mask == 0 {
        return 0;
    }
    let shift = mask.trailing_zeros();
    let bits = mask.count_ones();
    let v = if bits >= 8 {
        (v as u32) << (bits - 8)
    }
    else {
        (v as u32) >> (8 - bits)
    };
    (v << shift) & mask
}

#[inline]
fn unpack_channel(pixel: u32, mask: u32) -> u8 {
    if mask == 0 {
        return 0;
    }
    let bits = mask.count_ones();
    let v = (pixel & mask) >> mask.trailing_zeros();
    match bits {
        8.. => (v >> (bits - 8)) as u8,
        4..=7 => ((v << (8 - bits)) | (v >> (2 * bits - 8))) as u8,
        _ => (v << (8 - bits)) as u8,
    }
}
