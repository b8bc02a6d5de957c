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

    a8_video_renderer::color.rs

    Decodes the 256 GTIA colour indices into YUV and RGB.

    A GTIA colour index holds a hue in the high nibble and a luminance in the low
    nibble. The decoder models how a television would display each index given the
    user's colour adjustments, producing a separate U/V pair for even and odd lines
    so that the PAL artifact engines can emulate the delay line.
*/

use a8_common::TvSystem;
use serde::{Deserialize, Serialize};

use crate::{consts::*, palette::ExternalPalette};

/// User colour adjustments for one television system. All adjustments are centred on 0.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorSetup {
    pub hue: f64,
    pub saturation: f64,
    pub contrast: f64,
    pub brightness: f64,
    pub gamma: f64,
    /// Hue step between successive GTIA colours in degrees.
    pub color_delay: f64,
}

impl ColorSetup {
    pub fn for_tv(tv: TvSystem) -> Self {
        Self {
            hue: 0.0,
            saturation: 0.0,
            contrast: 0.0,
            brightness: 0.0,
            gamma: 0.0,
            color_delay: tv.default_color_delay(),
        }
    }
}

impl Default for ColorSetup {
    fn default() -> Self {
        ColorSetup::for_tv(TvSystem::Pal)
    }
}

/// Luma and per-parity chroma of one colour index.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct YuvEntry {
    pub y: f64,
    pub u_even: f64,
    pub u_odd: f64,
    pub v_even: f64,
    pub v_odd: f64,
}

impl YuvEntry {
    #[inline]
    pub fn u(&self, parity: usize) -> f64 {
        if parity & 1 == 0 {
            self.u_even
        }
        else {
            self.u_odd
        }
    }

    #[inline]
    pub fn v(&self, parity: usize) -> f64 {
        if parity & 1 == 0 {
            self.v_even
        }
        else {
            self.v_odd
        }
    }

    /// The colour a television averaging both lines would show.
    #[inline]
    pub fn averaged(&self) -> (f64, f64, f64) {
        (self.y, (self.u_even + self.u_odd) * 0.5, (self.v_even + self.v_odd) * 0.5)
    }
}

#[inline]
pub fn yuv_to_rgb(y: f64, u: f64, v: f64) -> (f64, f64, f64) {
    (y + CO_VR * v, y + CO_UG * u + CO_VG * v, y + CO_UB * u)
}

#[inline]
pub fn rgb_to_yuv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let y = Y_R * r + Y_G * g + Y_B * b;
    (y, (b - y) / CO_UB, (r - y) / CO_VR)
}

#[inline]
pub fn gamma_to_linear(c: f64, gamma_adjust: f64) -> f64 {
    if c <= 0.0 {
        return 0.0;
    }
    c.powf(CRT_GAMMA + gamma_adjust)
}

#[inline]
pub fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    }
    else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
pub fn to_u8(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Compute the YUV table for `tv` from the colour adjustments, or from `external` if a
/// palette file is loaded.
pub fn compute_yuv_table(tv: TvSystem, setup: &ColorSetup, external: Option<&ExternalPalette>) -> [YuvEntry; 256] {
    let mut table = [YuvEntry::default(); 256];
    let black = 0.5 * setup.brightness;
    let white = 1.0 + 0.5 * setup.brightness + 0.5 * setup.contrast;
    let saturation = (1.0 + setup.saturation).max(0.0);

    if let Some(ext) = external {
        for (i, entry) in table.iter_mut().enumerate() {
            let [r, g, b] = ext.rgb(i as u8);
            let (mut y, mut u, mut v) = rgb_to_yuv(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
            if ext.adjust() {
                y = black + y * (white - black);
                u *= saturation;
                v *= saturation;
            }
            *entry = YuvEntry {
                y,
                u_even: u,
                u_odd: u,
                v_even: v,
                v_odd: v,
            };
        }
        return table;
    }

    let amplitude = CHROMA_AMPLITUDE * saturation;
    let start = HUE_START_DEG + setup.hue * 180.0;
    let (step_even, step_odd) = match tv {
        TvSystem::Pal => (setup.color_delay, 2.0 * PAL_NOMINAL_DELAY - setup.color_delay),
        TvSystem::Ntsc => (setup.color_delay, setup.color_delay),
    };

    for cr in 0..16 {
        for lm in 0..16 {
            let y = black + (white - black) * lm as f64 / 15.0;
            let entry = &mut table[cr * 16 + lm];
            entry.y = y;
            if cr == 0 {
                continue;
            }
            let even = (start - (cr - 1) as f64 * step_even).to_radians();
            let odd = (start - (cr - 1) as f64 * step_odd).to_radians();
            entry.u_even = amplitude * even.cos();
            entry.v_even = amplitude * even.sin();
            entry.u_odd = amplitude * odd.cos();
            entry.v_odd = amplitude * odd.sin();
        }
    }
    table
}

/// Owns the colour settings of both television systems and the derived tables for the
/// active one. Every change bumps `generation()`, which the artifact engines compare
/// against to decide when their own tables are stale.
#[derive(Clone, Debug)]
pub struct ColorDecoder {
    tv: TvSystem,
    setups: [ColorSetup; 2],
    external: [Option<ExternalPalette>; 2],
    generation: u64,
    yuv: [YuvEntry; 256],
    palette: [u32; 256],
}

impl Default for ColorDecoder {
    fn default() -> Self {
        ColorDecoder::new(TvSystem::Pal)
    }
}

#[inline]
fn tv_slot(tv: TvSystem) -> usize {
    match tv {
        TvSystem::Pal => 0,
        TvSystem::Ntsc => 1,
    }
}

impl ColorDecoder {
    pub fn new(tv: TvSystem) -> Self {
        let mut decoder = Self {
            tv,
            setups: [ColorSetup::for_tv(TvSystem::Pal), ColorSetup::for_tv(TvSystem::Ntsc)],
            external: [None, None],
            generation: 0,
            yuv: [YuvEntry::default(); 256],
            palette: [0; 256],
        };
        decoder.recalculate();
        decoder
    }

    #[inline]
    pub fn tv_system(&self) -> TvSystem {
        self.tv
    }

    pub fn set_tv_system(&mut self, tv: TvSystem) {
        if tv != self.tv {
            self.tv = tv;
            self.recalculate();
        }
    }

    /// Colour adjustments of the active television system.
    #[inline]
    pub fn setup(&self) -> &ColorSetup {
        &self.setups[tv_slot(self.tv)]
    }

    #[inline]
    pub fn setup_for(&self, tv: TvSystem) -> &ColorSetup {
        &self.setups[tv_slot(tv)]
    }

    pub fn set_setup(&mut self, setup: ColorSetup) {
        self.set_setup_for(self.tv, setup);
    }

    pub fn set_setup_for(&mut self, tv: TvSystem, setup: ColorSetup) {
        self.setups[tv_slot(tv)] = setup;
        if tv == self.tv {
            self.recalculate();
        }
    }

    pub fn external_palette(&self, tv: TvSystem) -> Option<&ExternalPalette> {
        self.external[tv_slot(tv)].as_ref()
    }

    pub fn set_external_palette(&mut self, tv: TvSystem, palette: Option<ExternalPalette>) {
        self.external[tv_slot(tv)] = palette;
        if tv == self.tv {
            self.recalculate();
        }
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn yuv_table(&self) -> &[YuvEntry; 256] {
        &self.yuv
    }

    /// The palette as 0x00RRGGBB entries, with gamma applied.
    #[inline]
    pub fn palette(&self) -> &[u32; 256] {
        &self.palette
    }

    #[inline]
    pub fn rgb(&self, index: u8) -> (u8, u8, u8) {
        let c = self.palette[index as usize];
        ((c >> 16) as u8, (c >> 8) as u8, c as u8)
    }

    /// Gamma correction runs for generated palettes and for external palettes that ask for
    /// adjustment.
    pub fn gamma_enabled(&self) -> bool {
        self.external[tv_slot(self.tv)]
            .as_ref()
            .map(|p| p.adjust())
            .unwrap_or(true)
    }

    #[inline]
    pub fn apply_gamma(&self, c: f64) -> f64 {
        let c = c.clamp(0.0, 1.0);
        if self.gamma_enabled() {
            linear_to_srgb(gamma_to_linear(c, self.setup().gamma))
        }
        else {
            c
        }
    }

    /// Convert a YUV triple to clamped, gamma corrected 8-bit RGB.
    pub fn to_rgb8(&self, y: f64, u: f64, v: f64) -> (u8, u8, u8) {
        let (r, g, b) = yuv_to_rgb(y, u, v);
        (
            to_u8(self.apply_gamma(r)),
            to_u8(self.apply_gamma(g)),
            to_u8(self.apply_gamma(b)),
        )
    }

    /// Gamma correction as an 8-bit lookup for line renderers that work in fixed point.
    pub fn gamma_lut(&self) -> [u8; 256] {
        let mut lut = [0u8; 256];
        for (i, out) in lut.iter_mut().enumerate() {
            *out = to_u8(self.apply_gamma(i as f64 / 255.0));
        }
        lut
    }

    /// Export the active palette in the 768-byte palette file format.
    pub fn export_palette(&self) -> Vec<u8> {
        (0..=255u8)
            .flat_map(|i| {
                let (r, g, b) = self.rgb(i);
                [r, g, b]
            })
            .collect()
    }

    fn recalculate(&mut self) {
        let slot = tv_slot(self.tv);
        let external = self.external[slot].as_ref();
        self.yuv = compute_yuv_table(self.tv, &self.setups[slot], external);

        for i in 0..256 {
            let (r, g, b) = match external {
                Some(ext) if !ext.adjust() => {
                    let [r, g, b] = ext.rgb(i as u8);
                    (r, g, b)
                }
                _ => {
                    let (y, u, v) = self.yuv[i].averaged();
                    self.to_rgb8(y, u, v)
                }
            };
            self.palette[i] = (r as u32) << 16 | (g as u32) << 8 | b as u32;
        }

        self.generation = self.generation.wrapping_add(1);
        log::debug!(
            "ColorDecoder: recalculated {} palette, generation {}",
            self.tv,
            self.generation
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_decodes_to_zero() {
        for tv in [TvSystem::Pal, TvSystem::Ntsc] {
            let decoder = ColorDecoder::new(tv);
            assert_eq!(decoder.rgb(0), (0, 0, 0));
            let e = decoder.yuv_table()[0];
            assert_eq!((e.y, e.u_even, e.v_odd), (0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn greys_have_no_chroma() {
        let decoder = ColorDecoder::default();
        for lm in 0..16 {
            let (r, g, b) = decoder.rgb(lm);
            assert_eq!(r, g);
            assert_eq!(g, b);
        }
        assert_eq!(decoder.rgb(15), (255, 255, 255));
    }

    #[test]
    fn yuv_round_trip_within_one_level() {
        let decoder = ColorDecoder::new(TvSystem::Ntsc);
        for (i, e) in decoder.yuv_table().iter().enumerate() {
            let (y, u, v) = e.averaged();
            let (r, g, b) = yuv_to_rgb(y, u, v);
            let (y2, u2, v2) = rgb_to_yuv(r, g, b);
            let (r2, g2, b2) = yuv_to_rgb(y2, u2, v2);
            for (a, b) in [(r, r2), (g, g2), (b, b2)] {
                let d = to_u8(a) as i32 - to_u8(b) as i32;
                assert!(d.abs() <= 1, "index {} drifted by {}", i, d);
            }
        }
    }

    #[test]
    fn unadjusted_external_palette_is_used_verbatim() {
        let data: Vec<u8> = (0..768).map(|i| (i * 7 % 256) as u8).collect();
        let pal = ExternalPalette::from_bytes(&data, false).unwrap();
        let mut decoder = ColorDecoder::default();
        decoder.set_external_palette(TvSystem::Pal, Some(pal));
        assert!(!decoder.gamma_enabled());
        assert_eq!(decoder.export_palette(), data);
    }

    #[test]
    fn external_palette_yuv_reproduces_rgb() {
        let data: Vec<u8> = (0..768).map(|i| (i * 13 % 256) as u8).collect();
        let pal = ExternalPalette::from_bytes(&data, false).unwrap();
        let mut decoder = ColorDecoder::default();
        decoder.set_external_palette(TvSystem::Pal, Some(pal.clone()));
        for (i, e) in decoder.yuv_table().iter().enumerate() {
            let (r, g, b) = yuv_to_rgb(e.y, e.u_even, e.v_even);
            let [er, eg, eb] = pal.rgb(i as u8);
            assert!((to_u8(r) as i32 - er as i32).abs() <= 1);
            assert!((to_u8(g) as i32 - eg as i32).abs() <= 1);
            assert!((to_u8(b) as i32 - eb as i32).abs() <= 1);
        }
    }

    #[test]
    fn pal_parities_differ_ntsc_parities_match() {
        let pal = ColorDecoder::new(TvSystem::Pal);
        let ntsc = ColorDecoder::new(TvSystem::Ntsc);
        let e = pal.yuv_table()[0x38];
        assert!((e.u_even - e.u_odd).abs() > 1e-3 || (e.v_even - e.v_odd).abs() > 1e-3);
        let e = ntsc.yuv_table()[0x38];
        assert_eq!((e.u_even, e.v_even), (e.u_odd, e.v_odd));
    }

    #[test]
    fn changes_bump_generation() {
        let mut decoder = ColorDecoder::default();
        let g0 = decoder.generation();
        let mut setup = *decoder.setup();
        setup.saturation = 0.5;
        decoder.set_setup(setup);
        assert!(decoder.generation() > g0);
        // Changing the inactive system leaves the active tables alone.
        let g1 = decoder.generation();
        decoder.set_setup_for(TvSystem::Ntsc, ColorSetup::for_tv(TvSystem::Ntsc));
        assert_eq!(decoder.generation(), g1);
    }

    #[test]
    fn gamma_lut_is_monotonic() {
        let lut = ColorDecoder::default().gamma_lut();
        assert_eq!(lut[0], 0);
        assert_eq!(lut[255], 255);
        assert!(lut.windows(2).all(|w| w[0] <= w[1]));
    }
}
