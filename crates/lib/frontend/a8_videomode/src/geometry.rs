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

    a8_videomode::geometry.rs

    Pure geometry calculations: source area, pixel aspect, stretch multipliers and
    the final placement of the source rectangle on the host resolution.
*/

use a8_common::{Resolution, VideoGeometry};

use crate::{
    display_mode::DisplayModeSpec,
    settings::{HorizontalArea, KeepAspect, StretchMode, VerticalArea, VideoModeSettings},
};

/// Width and height of the visible area in native pixels.
pub fn source_area(spec: &DisplayModeSpec, h_area: HorizontalArea, v_area: VerticalArea) -> (u32, u32) {
    let w = match h_area {
        HorizontalArea::Narrow => spec.narrow_w,
        HorizontalArea::Normal => spec.normal_w,
        HorizontalArea::Full => spec.full_w,
        HorizontalArea::Custom(w) => spec.upscale_w(w).clamp(spec.min_w, spec.full_w),
    };
    let h = match v_area {
        VerticalArea::Short => spec.short_h,
        VerticalArea::Normal => spec.normal_h,
        VerticalArea::Full => spec.full_h,
        VerticalArea::Custom(h) => h.clamp(spec.min_h, spec.full_h),
    };
    (w, h)
}

/// Width of a host pixel relative to its height. Windows are assumed to have square pixels;
/// in fullscreen the host aspect is spread over the resolution.
pub fn host_pixel_aspect(settings: &VideoModeSettings, res: Resolution, desktop: Resolution) -> f64 {
    if settings.windowed {
        1.0
    }
    else {
        settings.host_aspect.ratio(desktop) / res.aspect()
    }
}

/// The width a source pixel should have on the host, in host pixels, relative to its height.
/// `None` when the aspect ratio is not kept.
pub fn pixel_ratio(settings: &VideoModeSettings, spec: &DisplayModeSpec, host_par: f64) -> Option<f64> {
    match settings.keep_aspect {
        KeepAspect::None => None,
        KeepAspect::OneToOne => Some(spec.native_aspect),
        KeepAspect::Real => Some(spec.native_aspect * settings.tv_system.pixel_aspect() / host_par),
    }
}

fn unit_multipliers(ratio: Option<f64>) -> (f64, f64) {
    match ratio {
        None => (1.0, 1.0),
        Some(r) if r >= 1.0 => (r, 1.0),
        Some(r) => (1.0, 1.0 / r),
    }
}

/// The smallest multipliers the stretch mode can produce. Used to crop the source so
/// that it fits the resolution.
pub fn minimum_multipliers(stretch: StretchMode, ratio: Option<f64>) -> (f64, f64) {
    let (mx, my) = unit_multipliers(ratio);
    match stretch {
        StretchMode::Custom(factor) => (mx * factor, my * factor),
        _ => (mx, my),
    }
}

/// Crop the source so that it fits the resolution at the minimum multipliers. FULL stretch
/// scales down instead and never crops.
pub fn adjust_source_area(
    stretch: StretchMode,
    ratio: Option<f64>,
    src_w: u32,
    src_h: u32,
    res: Resolution,
) -> (u32, u32) {
    if stretch == StretchMode::Full {
        return (src_w, src_h);
    }
    let (mx, my) = minimum_multipliers(stretch, ratio);
    let crop = |src: u32, mult: f64, avail: u32| {
        if src as f64 * mult > avail as f64 {
            ((avail as f64 / mult).floor() as u32).clamp(1, src)
        }
        else {
            src
        }
    };
    (crop(src_w, mx, res.w), crop(src_h, my, res.h))
}

/// Horizontal and vertical scale factors from source to destination.
pub fn video_area_multipliers(
    stretch: StretchMode,
    ratio: Option<f64>,
    src_w: u32,
    src_h: u32,
    res: Resolution,
) -> (f64, f64) {
    let (fit_w, fit_h) = (res.w as f64 / src_w.max(1) as f64, res.h as f64 / src_h.max(1) as f64);
    match stretch {
        StretchMode::None => unit_multipliers(ratio),
        StretchMode::Custom(factor) => {
            let (mx, my) = unit_multipliers(ratio);
            (mx * factor, my * factor)
        }
        StretchMode::Integer => match ratio {
            None => (fit_w.floor().max(1.0), fit_h.floor().max(1.0)),
            Some(r) if r >= 1.0 => {
                let m = (fit_w / r).floor().min(fit_h.floor()).max(1.0);
                (m * r, m)
            }
            Some(r) => {
                let m = fit_w.floor().min((fit_h * r).floor()).max(1.0);
                (m, m / r)
            }
        },
        StretchMode::Full => match ratio {
            None => (fit_w, fit_h),
            Some(r) => {
                let s = (fit_w / r).min(fit_h);
                (s * r, s)
            }
        },
    }
}

/// Clamp `offset` applied to a centred window of `size` within `full`.
pub fn clamp_offset(full: u32, size: u32, offset: i32) -> u32 {
    let slack = full.saturating_sub(size) as i64;
    (slack / 2 + offset as i64).clamp(0, slack) as u32
}

/// Compute the complete geometry for a display mode shown at `res`. With `rotate90` the
/// source is laid out on the transposed resolution and the destination transposed back.
pub fn compute_geometry(
    settings: &VideoModeSettings,
    spec: &DisplayModeSpec,
    res: Resolution,
    desktop: Resolution,
    rotate90: bool,
) -> VideoGeometry {
    let (src_w, src_h) = source_area(spec, settings.horizontal_area, settings.vertical_area);

    let mut host_par = host_pixel_aspect(settings, res, desktop);
    let layout_res = if rotate90 {
        host_par = 1.0 / host_par;
        res.transposed()
    }
    else {
        res
    };
    let ratio = pixel_ratio(settings, spec, host_par);

    let (src_w, src_h) = adjust_source_area(settings.stretch, ratio, src_w, src_h, layout_res);
    let (mx, my) = video_area_multipliers(settings.stretch, ratio, src_w, src_h, layout_res);
    let dest_w = ((src_w as f64 * mx).round() as u32).clamp(1, layout_res.w.max(1));
    let dest_h = ((src_h as f64 * my).round() as u32).clamp(1, layout_res.h.max(1));
    let (dest_w, dest_h) = if rotate90 { (dest_h, dest_w) } else { (dest_w, dest_h) };

    let geometry = VideoGeometry {
        src_offset_left: clamp_offset(spec.full_w, src_w, spec.upscale_offset(settings.horizontal_offset)),
        src_offset_top: clamp_offset(spec.full_h, src_h, settings.vertical_offset),
        src_width: src_w,
        src_height: src_h,
        dest_offset_left: res.w.saturating_sub(dest_w) / 2,
        dest_offset_top: res.h.saturating_sub(dest_h) / 2,
        dest_width: dest_w,
        dest_height: dest_h,
    };
    log::debug!(
        "compute_geometry: {} at {}{}: ratio {:?}, multipliers {:.3}x{:.3}, {:?}",
        spec.mode,
        res,
        if rotate90 { " rotated" } else { "" },
        ratio,
        mx,
        my,
        geometry
    );
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use a8_common::{DisplayMode, TvSystem};

    fn normal() -> &'static DisplayModeSpec {
        DisplayModeSpec::for_mode(DisplayMode::Normal)
    }

    fn fullscreen(stretch: StretchMode, keep_aspect: KeepAspect) -> VideoModeSettings {
        VideoModeSettings {
            windowed: false,
            stretch,
            keep_aspect,
            ..Default::default()
        }
    }

    #[test]
    fn integer_one_to_one_at_640x480() {
        let settings = fullscreen(StretchMode::Integer, KeepAspect::OneToOne);
        let g = compute_geometry(
            &settings,
            normal(),
            Resolution::new(640, 480),
            Resolution::new(640, 480),
            false,
        );
        assert_eq!((g.src_width, g.src_height), (336, 240));
        assert_eq!((g.src_offset_left, g.src_offset_top), (24, 0));
        assert_eq!((g.dest_width, g.dest_height), (336, 240));
        assert_eq!((g.dest_offset_left, g.dest_offset_top), (152, 120));
    }

    #[test]
    fn integer_without_aspect_scales_axes_independently() {
        let (mx, my) = video_area_multipliers(StretchMode::Integer, None, 336, 240, Resolution::new(1024, 768));
        assert_eq!((mx, my), (3.0, 3.0));
        let (mx, my) = video_area_multipliers(StretchMode::Integer, None, 336, 240, Resolution::new(1280, 520));
        assert_eq!((mx, my), (3.0, 2.0));
        let (mx, my) = video_area_multipliers(StretchMode::Integer, Some(1.0), 336, 240, Resolution::new(1280, 520));
        assert_eq!((mx, my), (2.0, 2.0));
    }

    #[test]
    fn full_stretch_fills_the_limiting_axis() {
        let (mx, my) = video_area_multipliers(StretchMode::Full, Some(1.0), 336, 240, Resolution::new(1920, 1080));
        assert!((my - 4.5).abs() < 1e-9);
        assert!((mx - 4.5).abs() < 1e-9);
        let (mx, my) = video_area_multipliers(StretchMode::Full, None, 336, 240, Resolution::new(1920, 1080));
        assert!((mx - 1920.0 / 336.0).abs() < 1e-9);
        assert!((my - 4.5).abs() < 1e-9);
    }

    #[test]
    fn no_stretch_applies_only_the_ratio() {
        assert_eq!(
            video_area_multipliers(StretchMode::None, Some(2.0), 336, 240, Resolution::new(800, 600)),
            (2.0, 1.0)
        );
        assert_eq!(
            video_area_multipliers(StretchMode::None, Some(0.5), 336, 240, Resolution::new(800, 600)),
            (1.0, 2.0)
        );
        assert_eq!(
            video_area_multipliers(StretchMode::Custom(2.0), None, 336, 240, Resolution::new(800, 600)),
            (2.0, 2.0)
        );
    }

    #[test]
    fn small_resolutions_crop_the_source() {
        let settings = fullscreen(StretchMode::None, KeepAspect::OneToOne);
        let g = compute_geometry(
            &settings,
            normal(),
            Resolution::new(320, 200),
            Resolution::new(320, 200),
            false,
        );
        assert_eq!((g.src_width, g.src_height), (320, 200));
        assert_eq!((g.dest_width, g.dest_height), (320, 200));
        assert_eq!((g.src_offset_left, g.src_offset_top), (32, 20));
        assert_eq!((g.dest_offset_left, g.dest_offset_top), (0, 0));

        // FULL scales down instead.
        assert_eq!(
            adjust_source_area(StretchMode::Full, Some(1.0), 336, 240, Resolution::new(320, 200)),
            (336, 240)
        );
        // A custom factor crops to what fits at that factor.
        assert_eq!(
            adjust_source_area(StretchMode::Custom(2.0), None, 336, 240, Resolution::new(640, 400)),
            (320, 200)
        );
    }

    #[test]
    fn offsets_are_clamped_to_the_full_screen() {
        assert_eq!(clamp_offset(384, 336, 0), 24);
        assert_eq!(clamp_offset(384, 336, -100), 0);
        assert_eq!(clamp_offset(384, 336, 100), 48);
        assert_eq!(clamp_offset(384, 384, 10), 0);

        let settings = VideoModeSettings {
            horizontal_offset: 8,
            vertical_offset: -4,
            vertical_area: VerticalArea::Short,
            ..fullscreen(StretchMode::Integer, KeepAspect::OneToOne)
        };
        let g = compute_geometry(
            &settings,
            normal(),
            Resolution::new(800, 600),
            Resolution::new(800, 600),
            false,
        );
        assert_eq!((g.src_offset_left, g.src_offset_top), (32, 16));
    }

    #[test]
    fn real_aspect_uses_tv_pixel_aspect() {
        let settings = VideoModeSettings {
            tv_system: TvSystem::Pal,
            ..fullscreen(StretchMode::None, KeepAspect::Real)
        };
        let res = Resolution::new(1024, 768);
        let ratio = pixel_ratio(&settings, normal(), host_pixel_aspect(&settings, res, res)).unwrap();
        assert!((ratio - 14.75 / 14.187576).abs() < 1e-9);

        // A 4:3 screen driven at 1280x1024 has tall pixels.
        let settings = VideoModeSettings {
            host_aspect: crate::settings::HostAspect::Ratio(4.0, 3.0),
            ..settings
        };
        let par = host_pixel_aspect(&settings, Resolution::new(1280, 1024), Resolution::new(1920, 1080));
        assert!((par - (4.0 / 3.0) / 1.25).abs() < 1e-9);
    }

    #[test]
    fn ntsc_filtered_offsets_are_native() {
        let spec = DisplayModeSpec::for_mode(DisplayMode::NtscFiltered);
        let settings = VideoModeSettings {
            horizontal_offset: 4,
            horizontal_area: HorizontalArea::Custom(320),
            ..fullscreen(StretchMode::None, KeepAspect::None)
        };
        let g = compute_geometry(
            &settings,
            spec,
            Resolution::new(800, 600),
            Resolution::new(800, 600),
            false,
        );
        assert_eq!(g.src_width, 560);
        assert_eq!(g.src_offset_left, 56 + 7);
    }

    #[test]
    fn rotation_transposes_the_destination() {
        let settings = fullscreen(StretchMode::Integer, KeepAspect::OneToOne);
        let res = Resolution::new(1024, 768);
        let g = compute_geometry(&settings, normal(), res, res, true);
        assert_eq!((g.src_width, g.src_height), (336, 240));
        // 768 / 336 = 2, 1024 / 240 = 4.
        assert_eq!((g.dest_width, g.dest_height), (480, 672));
        assert_eq!((g.dest_offset_left, g.dest_offset_top), (272, 48));
        assert!(g.fits(384, 240, res));
    }
}
