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

    a8_videomode::negotiator.rs

    The video mode negotiator. Owns the display backend and the current settings,
    and keeps the backend's video mode in step with them.
*/

use a8_common::{DisplayMode, Resolution, TvSystem, VideoGeometry};
use a8_display_backend::{VideoBackend, VideoModeRequest};

use crate::{
    display_mode::{select_display_mode, DisplayModeSpec},
    geometry::compute_geometry,
    settings::{Columns80, HorizontalArea, HostAspect, KeepAspect, StretchMode, VerticalArea, VideoModeSettings},
    VideoModeError,
};

/// Choose the host resolution for a display mode.
///
/// In fullscreen a selected resolution is used as is. Without one, the smallest resolution
/// that holds the mode's normal area is taken, falling back to the largest that holds its
/// minimum. Windowed modes use the window size. The result must hold the mode's minimum size.
pub fn resolution_for_mode(
    settings: &VideoModeSettings,
    spec: &DisplayModeSpec,
    rotate90: bool,
    available: &[Resolution],
) -> Result<Resolution, VideoModeError> {
    let (min_w, min_h) = spec.min_size(rotate90);

    let res = match (settings.windowed, settings.fullscreen) {
        (true, _) => settings.window,
        (false, Some(res)) => res,
        (false, None) => {
            let (normal_w, normal_h) = spec.normal_size(rotate90);
            let area = |r: &&Resolution| r.w as u64 * r.h as u64;
            available
                .iter()
                .filter(|r| r.holds(normal_w, normal_h))
                .min_by_key(area)
                .or_else(|| available.iter().filter(|r| r.holds(min_w, min_h)).max_by_key(area))
                .copied()
                .ok_or(VideoModeError::NoResolution(spec.mode))?
        }
    };

    if !res.holds(min_w, min_h) {
        return Err(VideoModeError::ResolutionTooSmall {
            resolution: res,
            mode: spec.mode,
            min_w,
            min_h,
        });
    }
    Ok(res)
}

pub struct VideoModeNegotiator<B: VideoBackend> {
    backend: B,
    settings: VideoModeSettings,
    current: VideoModeRequest,
}

impl<B: VideoBackend> VideoModeNegotiator<B> {
    /// Set the initial video mode. Failing to find any usable mode here is fatal to the caller.
    pub fn new(mut backend: B, settings: VideoModeSettings) -> Result<Self, VideoModeError> {
        let result = settings
            .validate()
            .and_then(|_| Self::compute_request(&backend, &settings))
            .and_then(|request| {
                backend.set_video_mode(&request)?;
                Ok(request)
            });

        match result {
            Ok(current) => {
                log::debug!(
                    "Initial video mode: {} at {}, geometry {:?}",
                    current.mode,
                    current.resolution,
                    current.geometry
                );
                Ok(Self {
                    backend,
                    settings,
                    current,
                })
            }
            Err(e) => {
                log::error!("Could not set an initial video mode: {}", e);
                Err(e)
            }
        }
    }

    fn compute_request(backend: &B, settings: &VideoModeSettings) -> Result<VideoModeRequest, VideoModeError> {
        let mode = select_display_mode(settings.columns80, settings.ntsc_filter, settings.tv_system);
        let spec = DisplayModeSpec::for_mode(mode);

        let rotate90 = settings.rotate90 && mode == DisplayMode::Normal && backend.supports_mode(mode, true);
        if settings.rotate90 && !rotate90 {
            log::debug!("Rotation is not available for {} mode; showing unrotated", mode);
        }

        let resolution = resolution_for_mode(settings, spec, rotate90, &backend.fullscreen_resolutions())?;
        let geometry = compute_geometry(settings, spec, resolution, backend.desktop_resolution(), rotate90);

        Ok(VideoModeRequest {
            resolution,
            windowed: settings.windowed,
            mode,
            rotate90,
            geometry,
        })
    }

    /// Apply `change` to a copy of the settings and switch to the resulting mode. If the
    /// new settings cannot be shown, nothing changes and the error is returned.
    fn update_with(&mut self, change: impl FnOnce(&mut VideoModeSettings)) -> Result<(), VideoModeError> {
        let mut settings = self.settings.clone();
        change(&mut settings);

        let result = settings
            .validate()
            .and_then(|_| Self::compute_request(&self.backend, &settings))
            .and_then(|request| {
                self.backend.set_video_mode(&request)?;
                Ok(request)
            });

        match result {
            Ok(request) => {
                self.settings = settings;
                self.current = request;
                Ok(())
            }
            Err(e) => {
                log::warn!("Video mode change rejected, keeping {} at {}: {}", self.current.mode, self.current.resolution, e);
                Err(e)
            }
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn settings(&self) -> &VideoModeSettings {
        &self.settings
    }

    pub fn current(&self) -> &VideoModeRequest {
        &self.current
    }

    pub fn geometry(&self) -> &VideoGeometry {
        &self.current.geometry
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.current.mode
    }

    pub fn resolution(&self) -> Resolution {
        self.current.resolution
    }

    pub fn rotated(&self) -> bool {
        self.current.rotate90
    }

    pub fn fullscreen_resolutions(&self) -> Vec<Resolution> {
        self.backend.fullscreen_resolutions()
    }

    /// Position of the selected fullscreen resolution in the backend's list.
    pub fn fullscreen_resolution_id(&self) -> Option<usize> {
        let selected = self.settings.fullscreen?;
        self.backend.fullscreen_resolutions().iter().position(|r| *r == selected)
    }

    /// Recompute the mode from the current settings, e.g. after the desktop changed.
    pub fn update(&mut self) -> Result<(), VideoModeError> {
        self.update_with(|_| {})
    }

    /// Replace every setting at once.
    pub fn apply_settings(&mut self, settings: VideoModeSettings) -> Result<(), VideoModeError> {
        self.update_with(|s| *s = settings)
    }

    pub fn set_windowed(&mut self, windowed: bool) -> Result<(), VideoModeError> {
        self.update_with(|s| s.windowed = windowed)
    }

    pub fn toggle_windowed(&mut self) -> Result<(), VideoModeError> {
        let windowed = !self.settings.windowed;
        self.set_windowed(windowed)
    }

    pub fn set_window_size(&mut self, size: Resolution) -> Result<(), VideoModeError> {
        self.update_with(|s| s.window = size)
    }

    /// Select a fullscreen resolution by its position in `fullscreen_resolutions()`.
    pub fn set_fullscreen_resolution(&mut self, id: usize) -> Result<(), VideoModeError> {
        let Some(res) = self.backend.fullscreen_resolutions().get(id).copied()
        else {
            log::warn!("Fullscreen resolution id {} out of range", id);
            return Err(VideoModeError::InvalidResolutionId(id));
        };
        self.update_with(|s| s.fullscreen = Some(res))
    }

    /// Let the negotiator pick the fullscreen resolution.
    pub fn set_fullscreen_auto(&mut self) -> Result<(), VideoModeError> {
        self.update_with(|s| s.fullscreen = None)
    }

    pub fn set_horizontal_area(&mut self, area: HorizontalArea) -> Result<(), VideoModeError> {
        self.update_with(|s| s.horizontal_area = area)
    }

    pub fn set_vertical_area(&mut self, area: VerticalArea) -> Result<(), VideoModeError> {
        self.update_with(|s| s.vertical_area = area)
    }

    pub fn set_horizontal_offset(&mut self, offset: i32) -> Result<(), VideoModeError> {
        self.update_with(|s| s.horizontal_offset = offset)
    }

    pub fn set_vertical_offset(&mut self, offset: i32) -> Result<(), VideoModeError> {
        self.update_with(|s| s.vertical_offset = offset)
    }

    pub fn set_stretch(&mut self, stretch: StretchMode) -> Result<(), VideoModeError> {
        self.update_with(|s| s.stretch = stretch)
    }

    pub fn set_keep_aspect(&mut self, keep_aspect: KeepAspect) -> Result<(), VideoModeError> {
        self.update_with(|s| s.keep_aspect = keep_aspect)
    }

    pub fn set_rotate90(&mut self, rotate90: bool) -> Result<(), VideoModeError> {
        self.update_with(|s| s.rotate90 = rotate90)
    }

    pub fn set_host_aspect(&mut self, aspect: HostAspect) -> Result<(), VideoModeError> {
        self.update_with(|s| s.host_aspect = aspect)
    }

    pub fn set_80_column(&mut self, device: Columns80) -> Result<(), VideoModeError> {
        self.update_with(|s| s.columns80 = device)
    }

    pub fn set_ntsc_filter(&mut self, enabled: bool) -> Result<(), VideoModeError> {
        self.update_with(|s| s.ntsc_filter = enabled)
    }

    pub fn set_tv_system(&mut self, tv: TvSystem) -> Result<(), VideoModeError> {
        self.update_with(|s| s.tv_system = tv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a8_display_backend::MemoryBackend;
    use a8_common::PixelFormat;

    fn backend() -> MemoryBackend {
        MemoryBackend::default()
    }

    fn fullscreen_at(res: Resolution) -> VideoModeSettings {
        VideoModeSettings {
            windowed: false,
            fullscreen: Some(res),
            stretch: StretchMode::Integer,
            keep_aspect: KeepAspect::OneToOne,
            ..Default::default()
        }
    }

    #[test]
    fn scenario_640x480_integer_one_to_one() {
        let backend = MemoryBackend::new(
            vec![Resolution::new(640, 480)],
            Resolution::new(640, 480),
            PixelFormat::XRGB8888,
        );
        let vm = VideoModeNegotiator::new(backend, fullscreen_at(Resolution::new(640, 480))).unwrap();
        let g = vm.geometry();
        assert_eq!(vm.display_mode(), DisplayMode::Normal);
        assert_eq!((g.dest_width, g.dest_height), (336, 240));
        assert_eq!((g.dest_offset_left, g.dest_offset_top), (152, 120));
        assert_eq!(vm.backend().current_mode(), Some(vm.current()));
    }

    #[test]
    fn too_small_fullscreen_resolution_is_rolled_back() {
        let mut vm = VideoModeNegotiator::new(backend(), fullscreen_at(Resolution::new(640, 480))).unwrap();
        let before = *vm.geometry();
        let settings_before = vm.settings().clone();
        let sets = vm.backend().mode_set_count();

        vm.set_80_column(Columns80::Af80).unwrap();
        let af80 = *vm.geometry();
        assert_eq!(vm.display_mode(), DisplayMode::Af80);

        // 320x240 cannot hold the 640x250 AF80 screen.
        let err = vm.set_fullscreen_resolution(1).unwrap_err();
        assert!(matches!(err, VideoModeError::ResolutionTooSmall { .. }));
        assert_eq!(*vm.geometry(), af80);
        assert_eq!(vm.resolution(), Resolution::new(640, 480));

        vm.set_80_column(Columns80::None).unwrap();
        assert_eq!(*vm.geometry(), before);
        assert_eq!(*vm.settings(), settings_before);
        assert_eq!(vm.backend().mode_set_count(), sets + 2);
    }

    #[test]
    fn out_of_range_resolution_id() {
        let mut vm = VideoModeNegotiator::new(backend(), fullscreen_at(Resolution::new(640, 480))).unwrap();
        assert!(matches!(vm.set_fullscreen_resolution(99), Err(VideoModeError::InvalidResolutionId(99))));
        assert_eq!(vm.fullscreen_resolution_id(), Some(3));
    }

    #[test]
    fn backend_refusal_rolls_back() {
        let mut vm = VideoModeNegotiator::new(backend(), fullscreen_at(Resolution::new(640, 480))).unwrap();
        let before = *vm.current();
        vm.backend_mut().set_failing(true);
        assert!(matches!(vm.set_stretch(StretchMode::Full), Err(VideoModeError::Backend(_))));
        assert_eq!(*vm.current(), before);
        assert_eq!(vm.settings().stretch, StretchMode::Integer);

        vm.backend_mut().set_failing(false);
        vm.set_stretch(StretchMode::Full).unwrap();
        assert_eq!(vm.geometry().dest_width, 640);
    }

    #[test]
    fn invalid_values_are_rejected_before_the_backend() {
        let mut vm = VideoModeNegotiator::new(backend(), fullscreen_at(Resolution::new(800, 600))).unwrap();
        let sets = vm.backend().mode_set_count();
        assert!(matches!(
            vm.set_horizontal_area(HorizontalArea::Custom(1000)),
            Err(VideoModeError::InvalidArea(_))
        ));
        assert!(matches!(
            vm.set_stretch(StretchMode::Custom(0.25)),
            Err(VideoModeError::InvalidStretch(_))
        ));
        assert!(matches!(
            vm.set_host_aspect(HostAspect::Ratio(-4.0, 3.0)),
            Err(VideoModeError::InvalidAspectRatio(_))
        ));
        assert_eq!(vm.backend().mode_set_count(), sets);
    }

    #[test]
    fn automatic_fullscreen_picks_smallest_holding_normal_area() {
        let settings = VideoModeSettings {
            windowed: false,
            fullscreen: None,
            ..Default::default()
        };
        let vm = VideoModeNegotiator::new(backend(), settings).unwrap();
        assert_eq!(vm.resolution(), Resolution::new(640, 400));
        assert_eq!(vm.fullscreen_resolution_id(), None);

        let res = vec![Resolution::new(320, 200), Resolution::new(320, 220)];
        let settings = VideoModeSettings {
            windowed: false,
            ..Default::default()
        };
        let spec = DisplayModeSpec::for_mode(DisplayMode::Normal);
        assert_eq!(
            resolution_for_mode(&settings, spec, false, &res).unwrap(),
            Resolution::new(320, 220)
        );
        assert!(matches!(
            resolution_for_mode(&settings, spec, false, &[Resolution::new(300, 200)]),
            Err(VideoModeError::NoResolution(DisplayMode::Normal))
        ));
    }

    #[test]
    fn startup_without_a_usable_resolution_fails() {
        let backend = MemoryBackend::new(
            vec![Resolution::new(320, 200)],
            Resolution::new(320, 200),
            PixelFormat::XRGB8888,
        );
        let settings = VideoModeSettings {
            windowed: false,
            columns80: Columns80::Xep80,
            ..Default::default()
        };
        assert!(matches!(
            VideoModeNegotiator::new(backend, settings),
            Err(VideoModeError::NoResolution(DisplayMode::Xep80))
        ));
    }

    #[test]
    fn ntsc_filter_needs_ntsc_tv() {
        let mut vm = VideoModeNegotiator::new(backend(), fullscreen_at(Resolution::new(1280, 720))).unwrap();
        vm.set_ntsc_filter(true).unwrap();
        assert_eq!(vm.display_mode(), DisplayMode::Normal);
        vm.set_tv_system(TvSystem::Ntsc).unwrap();
        assert_eq!(vm.display_mode(), DisplayMode::NtscFiltered);
        assert_eq!(vm.geometry().src_width, 588);
        assert!(vm.geometry().fits(672, 240, vm.resolution()));
    }

    #[test]
    fn rotation_depends_on_backend_and_mode() {
        let mut vm = VideoModeNegotiator::new(backend(), fullscreen_at(Resolution::new(1024, 768))).unwrap();
        vm.set_rotate90(true).unwrap();
        assert!(vm.rotated());
        assert_eq!((vm.geometry().dest_width, vm.geometry().dest_height), (480, 672));

        vm.set_80_column(Columns80::Xep80).unwrap();
        assert!(!vm.rotated());

        let backend = MemoryBackend::default().with_rotation(false);
        let mut vm = VideoModeNegotiator::new(backend, fullscreen_at(Resolution::new(1024, 768))).unwrap();
        vm.set_rotate90(true).unwrap();
        assert!(!vm.rotated());
        assert!(vm.settings().rotate90);
    }

    #[test]
    fn windowed_mode_uses_window_size() {
        let mut vm = VideoModeNegotiator::new(backend(), VideoModeSettings::default()).unwrap();
        assert_eq!(vm.resolution(), crate::settings::DEFAULT_WINDOW);
        vm.set_window_size(Resolution::new(1000, 700)).unwrap();
        assert_eq!(vm.resolution(), Resolution::new(1000, 700));
        assert!(matches!(
            vm.set_window_size(Resolution::new(300, 200)),
            Err(VideoModeError::ResolutionTooSmall { .. })
        ));
        assert_eq!(vm.resolution(), Resolution::new(1000, 700));
        vm.toggle_windowed().unwrap();
        assert!(!vm.current().windowed);
    }
}
