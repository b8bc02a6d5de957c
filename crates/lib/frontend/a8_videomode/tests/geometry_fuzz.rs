use a8_common::{PixelFormat, Resolution, TvSystem};
use a8_display_backend::{MemoryBackend, STANDARD_RESOLUTIONS};
use a8_videomode::{
    Columns80,
    DisplayModeSpec,
    HorizontalArea,
    HostAspect,
    KeepAspect,
    StretchMode,
    VerticalArea,
    VideoModeNegotiator,
    VideoModeSettings,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_step(vm: &mut VideoModeNegotiator<MemoryBackend>, rng: &mut StdRng) -> bool {
    let ids = vm.fullscreen_resolutions().len();
    let result = match rng.random_range(0..14) {
        0 => vm.set_windowed(rng.random()),
        1 => vm.set_window_size(Resolution::new(rng.random_range(100..2000), rng.random_range(100..1200))),
        2 => vm.set_fullscreen_resolution(rng.random_range(0..ids + 1)),
        3 => vm.set_horizontal_area(match rng.random_range(0..4) {
            0 => HorizontalArea::Narrow,
            1 => HorizontalArea::Normal,
            2 => HorizontalArea::Full,
            _ => HorizontalArea::Custom(rng.random_range(300..400)),
        }),
        4 => vm.set_vertical_area(match rng.random_range(0..4) {
            0 => VerticalArea::Short,
            1 => VerticalArea::Normal,
            2 => VerticalArea::Full,
            _ => VerticalArea::Custom(rng.random_range(190..250)),
        }),
        5 => vm.set_horizontal_offset(rng.random_range(-400..400)),
        6 => vm.set_vertical_offset(rng.random_range(-250..250)),
        7 => vm.set_stretch(match rng.random_range(0..4) {
            0 => StretchMode::None,
            1 => StretchMode::Integer,
            2 => StretchMode::Full,
            _ => StretchMode::Custom(rng.random_range(0.5..4.0)),
        }),
        8 => vm.set_keep_aspect(match rng.random_range(0..3) {
            0 => KeepAspect::None,
            1 => KeepAspect::OneToOne,
            _ => KeepAspect::Real,
        }),
        9 => vm.set_rotate90(rng.random()),
        10 => vm.set_host_aspect(if rng.random() {
            HostAspect::Auto
        }
        else {
            HostAspect::Ratio(rng.random_range(1.0..21.0), rng.random_range(1.0..12.0))
        }),
        11 => vm.set_80_column(match rng.random_range(0..4) {
            0 => Columns80::None,
            1 => Columns80::Xep80,
            2 => Columns80::Proto80,
            _ => Columns80::Af80,
        }),
        12 => vm.set_ntsc_filter(rng.random()),
        _ => vm.set_tv_system(if rng.random() { TvSystem::Pal } else { TvSystem::Ntsc }),
    };
    result.is_ok()
}

#[test]
fn geometry_invariants_hold_under_random_setters() {
    let mut rng = StdRng::seed_from_u64(0xA800);

    for _ in 0..20 {
        let backend = MemoryBackend::new(
            STANDARD_RESOLUTIONS.to_vec(),
            Resolution::new(1920, 1080),
            PixelFormat::XRGB8888,
        );
        let mut vm = VideoModeNegotiator::new(backend, VideoModeSettings::default()).unwrap();

        for _ in 0..500 {
            let before = *vm.current();
            let settings_before = vm.settings().clone();
            let ok = random_step(&mut vm, &mut rng);

            if !ok {
                assert_eq!(*vm.current(), before);
                assert_eq!(*vm.settings(), settings_before);
            }

            let current = vm.current();
            let spec = DisplayModeSpec::for_mode(current.mode);
            assert!(
                current.geometry.fits(spec.full_w, spec.full_h, current.resolution),
                "{:?} does not fit {} at {}",
                current.geometry,
                current.mode,
                current.resolution
            );
            assert!(current.resolution.holds(
                spec.min_size(current.rotate90).0,
                spec.min_size(current.rotate90).1
            ));
            assert_eq!(vm.backend().current_mode(), Some(current));
        }
    }
}

#[test]
fn one_to_one_integer_keeps_square_pixels() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let res = Resolution::new(rng.random_range(336..2560), rng.random_range(240..1600));
        let settings = VideoModeSettings {
            windowed: true,
            window: res,
            stretch: StretchMode::Integer,
            keep_aspect: KeepAspect::OneToOne,
            ..Default::default()
        };
        let vm = VideoModeNegotiator::new(MemoryBackend::default(), settings).unwrap();
        let g = vm.geometry();
        assert_eq!(g.dest_width % g.src_width, 0);
        assert_eq!(g.dest_width / g.src_width, g.dest_height / g.src_height);
        assert_eq!(g.dest_height % g.src_height, 0);
    }
}
