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

    a8_video_renderer::consts.rs

    Constants shared by the colour decoder and the artifact engines.
*/

use a8_common::SCREEN_WIDTH;

/// Widest line any line renderer accepts. Longer lines are clamped.
pub const MAX_LINE_WIDTH: usize = SCREEN_WIDTH + 8;

// YUV to RGB matrix coefficients.
pub const CO_VR: f64 = 1.1402509;
pub const CO_VG: f64 = -0.5808092;
pub const CO_UG: f64 = -0.3947314;
pub const CO_UB: f64 = 2.0325203;

// Luma weights of the inverse transform.
pub const Y_R: f64 = 0.299;
pub const Y_G: f64 = 0.587;
pub const Y_B: f64 = 0.114;

/// Fractional bits of the fixed-point matrix used by the line renderers.
pub const MATRIX_SHIFT: u32 = 12;
pub const CO_VR_FX: i32 = (CO_VR * (1 << MATRIX_SHIFT) as f64) as i32;
pub const CO_VG_FX: i32 = (CO_VG * (1 << MATRIX_SHIFT) as f64) as i32;
pub const CO_UG_FX: i32 = (CO_UG * (1 << MATRIX_SHIFT) as f64) as i32;
pub const CO_UB_FX: i32 = (CO_UB * (1 << MATRIX_SHIFT) as f64) as i32;

/// Phase of the GTIA colour 1 on the U/V plane, in degrees, before the hue adjustment.
pub const HUE_START_DEG: f64 = 148.0;
/// Chroma amplitude at zero saturation adjustment.
pub const CHROMA_AMPLITUDE: f64 = 0.25;
/// The PAL GTIA hue step the even and odd line delays are centred around.
pub const PAL_NOMINAL_DELAY: f64 = 22.5;
/// Display gamma of the emulated television.
pub const CRT_GAMMA: f64 = 2.35;
