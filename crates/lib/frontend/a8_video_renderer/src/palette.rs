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

    a8_video_renderer::palette.rs

    Loading and saving of external 256-colour palette files.

    Palette files are 768 bytes of RGB triplets in GTIA colour index order, the
    format produced by most Atari emulators and by Photoshop (.act).
*/

use std::path::Path;

use thiserror::Error;

pub const PALETTE_FILE_SIZE: usize = 256 * 3;

#[derive(Error, Debug)]
pub enum ColorError {
    #[error("Palette data too short: {0} bytes, expected at least {PALETTE_FILE_SIZE}")]
    TooShort(usize),
    #[error("Failed to read palette file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalPalette {
    colors: Box<[[u8; 3]; 256]>,
    adjust: bool,
}

impl ExternalPalette {
    /// Build a palette from raw triplets. Bytes past the first 768 are ignored, as some
    /// tools append a colour count or transparency index.
    /// With `adjust` set the colours go through the decoder's brightness, contrast,
    /// saturation and gamma adjustments; otherwise they are displayed as stored.
    pub fn from_bytes(data: &[u8], adjust: bool) -> Result<Self, ColorError> {
        if data.len() < PALETTE_FILE_SIZE {
            return Err(ColorError::TooShort(data.len()));
        }
        let mut colors = Box::new([[0u8; 3]; 256]);
        for (dst, src) in colors.iter_mut().zip(data.chunks_exact(3)) {
            dst.copy_from_slice(src);
        }
        Ok(Self { colors, adjust })
    }

    pub fn from_file(path: impl AsRef<Path>, adjust: bool) -> Result<Self, ColorError> {
        let data = std::fs::read(path.as_ref())?;
        log::debug!("Read {} byte palette from {}", data.len(), path.as_ref().display());
        Self::from_bytes(&data, adjust)
    }

    #[inline]
    pub fn rgb(&self, index: u8) -> [u8; 3] {
        self.colors[index as usize]
    }

    #[inline]
    pub fn adjust(&self) -> bool {
        self.adjust
    }

    pub fn set_adjust(&mut self, adjust: bool) {
        self.adjust = adjust;
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.colors.iter().flatten().copied().collect()
    }
}
