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

    a8_video_renderer::blit.rs

    Palette lookup blitters from an indexed frame into 8, 16 and 32 bpp surfaces.

    All pitches are measured in pixels of the destination slice type. Scaled
    blits step through the source with 16.16 fixed point accumulators, and the
    rotated blits turn the image 90 degrees clockwise. Sizes larger than the
    supplied slices are clamped rather than rejected.
*/

/// Number of whole `w` pixel rows available in a buffer of `len` pixels at `pitch`.
#[inline]
pub(crate) fn rows_available(len: usize, pitch: usize, w: usize) -> usize {
    if w == 0 || len < w {
        0
    }
    else if pitch == 0 {
        1
    }
    else {
        (len - w) / pitch + 1
    }
}

/// 16.16 step that walks `src` pixels across `dest` pixels. Rounded up so that exact integer
/// scales land every destination pixel on the source pixel it replicates.
#[inline]
pub(crate) fn fixed_step(src: usize, dest: usize) -> usize {
    if dest == 0 {
        return 0;
    }
    ((src << 16) + dest - 1) / dest
}

/// Source index for a 16.16 accumulator, clamped to the last of `len` pixels.
#[inline]
pub(crate) fn fixed_index(acc: usize, len: usize) -> usize {
    (acc >> 16).min(len.saturating_sub(1))
}

pub(crate) fn blit_generic<T: Copy>(
    dest: &mut [T],
    dest_pitch: usize,
    src: &[u8],
    src_pitch: usize,
    w: usize,
    h: usize,
    map: impl Fn(u8) -> T,
) {
    let h = h
        .min(rows_available(dest.len(), dest_pitch, w))
        .min(rows_available(src.len(), src_pitch, w));

    for y in 0..h {
        let s = &src[y * src_pitch..y * src_pitch + w];
        let d = &mut dest[y * dest_pitch..y * dest_pitch + w];
        for (d, &s) in d.iter_mut().zip(s) {
            *d = map(s);
        }
    }
}

pub(crate) fn scale_generic<T: Copy>(
    dest: &mut [T],
    dest_pitch: usize,
    dest_w: usize,
    dest_h: usize,
    src: &[u8],
    src_pitch: usize,
    src_w: usize,
    src_h: usize,
    map: impl Fn(u8) -> T,
) {
    let src_h = src_h.min(rows_available(src.len(), src_pitch, src_w));
    let dest_h = dest_h.min(rows_available(dest.len(), dest_pitch, dest_w));
    if src_h == 0 || dest_h == 0 {
        return;
    }

    let step_x = fixed_step(src_w, dest_w);
    let step_y = fixed_step(src_h, dest_h);
    let mut acc_y = 0;
    let mut last_sy = usize::MAX;

    for dy in 0..dest_h {
        let sy = fixed_index(acc_y, src_h);
        let d0 = dy * dest_pitch;
        if sy == last_sy {
            // Same source row as the line above, so copy it instead of scaling it again.
            let prev = d0 - dest_pitch;
            dest.copy_within(prev..prev + dest_w, d0);
        }
        else {
            let s = &src[sy * src_pitch..sy * src_pitch + src_w];
            let mut acc_x = 0;
            for d in &mut dest[d0..d0 + dest_w] {
                *d = map(s[fixed_index(acc_x, src_w)]);
                acc_x += step_x;
            }
        }
        last_sy = sy;
        acc_y += step_y;
    }
}

pub(crate) fn rotate_generic<T: Copy>(
    dest: &mut [T],
    dest_pitch: usize,
    dest_w: usize,
    dest_h: usize,
    src: &[u8],
    src_pitch: usize,
    src_w: usize,
    src_h: usize,
    map: impl Fn(u8) -> T,
) {
    let src_h = src_h.min(rows_available(src.len(), src_pitch, src_w));
    let dest_h = dest_h.min(rows_available(dest.len(), dest_pitch, dest_w));
    if src_h == 0 || src_w == 0 || dest_h == 0 {
        return;
    }

    // Destination columns walk the source rows bottom to top, destination rows walk the
    // source columns left to right.
    let step_col = fixed_step(src_h, dest_w);
    let step_row = fixed_step(src_w, dest_h);
    let mut acc_row = 0;

    for dy in 0..dest_h {
        let sx = fixed_index(acc_row, src_w);
        let d = &mut dest[dy * dest_pitch..dy * dest_pitch + dest_w];
        let mut acc_col = 0;
        for px in d.iter_mut() {
            let sy = src_h - 1 - fixed_index(acc_col, src_h);
            *px = map(src[sy * src_pitch + sx]);
            acc_col += step_col;
        }
        acc_row += step_row;
    }
}

/// Copy indexed pixels to an 8 bpp surface. The host palette must match the decoder's.
pub fn blit8(dest: &mut [u8], dest_pitch: usize, src: &[u8], src_pitch: usize, w: usize, h: usize) {
    blit_generic(dest, dest_pitch, src, src_pitch, w, h, |c| c);
}

pub fn blit16(
    dest: &mut [u16],
    dest_pitch: usize,
    src: &[u8],
    src_pitch: usize,
    w: usize,
    h: usize,
    palette: &[u32; 256],
) {
    blit_generic(dest, dest_pitch, src, src_pitch, w, h, |c| palette[c as usize] as u16);
}

pub fn blit32(
    dest: &mut [u32],
    dest_pitch: usize,
    src: &[u8],
    src_pitch: usize,
    w: usize,
    h: usize,
    palette: &[u32; 256],
) {
    blit_generic(dest, dest_pitch, src, src_pitch, w, h, |c| palette[c as usize]);
}

pub fn blit_scaled8(
    dest: &mut [u8],
    dest_pitch: usize,
    dest_w: usize,
    dest_h: usize,
    src: &[u8],
    src_pitch: usize,
    src_w: usize,
    src_h: usize,
) {
    scale_generic(dest, dest_pitch, dest_w, dest_h, src, src_pitch, src_w, src_h, |c| c);
}

pub fn blit_scaled16(
    dest: &mut [u16],
    dest_pitch: usize,
    dest_w: usize,
    dest_h: usize,
    src: &[u8],
    src_pitch: usize,
    src_w: usize,
    src_h: usize,
    palette: &[u32; 256],
) {
    scale_generic(dest, dest_pitch, dest_w, dest_h, src, src_pitch, src_w, src_h, |c| {
        palette[c as usize] as u16
    });
}

pub fn blit_scaled32(
    dest: &mut [u32],
    dest_pitch: usize,
    dest_w: usize,
    dest_h: usize,
    src: &[u8],
    src_pitch: usize,
    src_w: usize,
    src_h: usize,
    palette: &[u32; 256],
) {
    scale_generic(dest, dest_pitch, dest_w, dest_h, src, src_pitch, src_w, src_h, |c| {
        palette[c as usize]
    });
}

/// Scale and rotate 90 degrees clockwise. `dest_w` spans the source height.
pub fn blit_rotated8(
    dest: &mut [u8],
    dest_pitch: usize,
    dest_w: usize,
    dest_h: usize,
    src: &[u8],
    src_pitch: usize,
    src_w: usize,
    src_h: usize,
) {
    rotate_generic(dest, dest_pitch, dest_w, dest_h, src, src_pitch, src_w, src_h, |c| c);
}

pub fn blit_rotated16(
    dest: &mut [u16],
    dest_pitch: usize,
    dest_w: usize,
    dest_h: usize,
    src: &[u8],
    src_pitch: usize,
    src_w: usize,
    src_h: usize,
    palette: &[u32; 256],
) {
    rotate_generic(dest, dest_pitch, dest_w, dest_h, src, src_pitch, src_w, src_h, |c| {
        palette[c as usize] as u16
    });
}

pub fn blit_rotated32(
    dest: &mut [u32],
    dest_pitch: usize,
    dest_w: usize,
    dest_h: usize,
    src: &[u8],
    src_pitch: usize,
    src_w: usize,
    src_h: usize,
    palette: &[u32; 256],
) {
    rotate_generic(dest, dest_pitch, dest_w, dest_h, src, src_pitch, src_w, src_h, |c| {
        palette[c as usize]
    });
}
