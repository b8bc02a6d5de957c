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

    a8_config::lib.rs

    Reads and writes the video section of the emulator configuration file.

    The file is flat text with one KEY=VALUE setting per line. Lines starting with
    '#' and blank lines are ignored. A line that cannot be understood is reported
    and skipped, so an old or hand-edited file never stops the emulator starting.
*/

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
    str::FromStr,
};

use a8_common::{Resolution, TvSystem};
use a8_video_renderer::{ArtifactMode, ColorDecoder, ColorSetup, ExternalPalette};
use a8_videomode::{
    settings::{MAX_HORIZONTAL_OFFSET, MAX_VERTICAL_OFFSET},
    VideoModeSettings,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Expected KEY=VALUE, got '{0}'")]
    MissingSeparator(String),
    #[error("Unknown key '{0}'")]
    UnknownKey(String),
    #[error("Bad value '{value}' for {key}: {reason}")]
    InvalidValue { key: String, value: String, reason: String },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    pub path: Option<PathBuf>,
    /// Run the palette through the colour adjustments instead of using it verbatim.
    pub adjust: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColoursConfig {
    pub setup: ColorSetup,
    pub palette: PaletteConfig,
}

impl ColoursConfig {
    pub fn for_tv(tv: TvSystem) -> Self {
        Self {
            setup: ColorSetup::for_tv(tv),
            palette: Default::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    pub videomode: VideoModeSettings,
    pub colours_pal: ColoursConfig,
    pub colours_ntsc: ColoursConfig,
    pub artifact_pal: ArtifactMode,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            videomode: Default::default(),
            colours_pal: ColoursConfig::for_tv(TvSystem::Pal),
            colours_ntsc: ColoursConfig::for_tv(TvSystem::Ntsc),
            artifact_pal: Default::default(),
        }
    }
}

fn invalid(key: &str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: ToString,
{
    value.parse::<T>().map_err(|e| invalid(key, value, e))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_uppercase().as_str() {
        "1" | "YES" | "TRUE" | "ON" => Ok(true),
        "0" | "NO" | "FALSE" | "OFF" => Ok(false),
        _ => Err(invalid(key, value, "expected 1 or 0")),
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<u32, ConfigError> {
    match parse_value::<u32>(key, value)? {
        0 => Err(invalid(key, value, "must be non-zero")),
        v => Ok(v),
    }
}

fn parse_offset(key: &str, value: &str, max: i32) -> Result<i32, ConfigError> {
    let v = parse_value::<i32>(key, value)?;
    if v.abs() > max {
        return Err(invalid(key, value, format!("must be within -{}..={}", max, max)));
    }
    Ok(v)
}

fn flag(b: bool) -> u8 {
    b as u8
}

impl VideoConfig {
    /// Parse configuration text on top of the defaults. Bad lines are logged and skipped.
    pub fn parse_str(text: &str) -> Self {
        let mut config = VideoConfig::default();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Err(e) = config.apply_line(line) {
                log::warn!("Config line {}: {}", n + 1, e);
            }
        }

        if let Some(res) = config.videomode.fullscreen {
            if res.w == 0 || res.h == 0 {
                log::warn!("Config: fullscreen resolution needs both width and height; using automatic");
                config.videomode.fullscreen = None;
            }
        }
        config
    }

    /// Apply one `KEY=VALUE` line.
    pub fn apply_line(&mut self, line: &str) -> Result<(), ConfigError> {
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| ConfigError::MissingSeparator(line.to_string()))?;
        self.set(key.trim(), value.trim())
    }

    /// Set one configuration key. Nothing changes if the value is rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let vm = &mut self.videomode;
        match key {
            "VIDEOMODE_WINDOWED" => vm.windowed = parse_bool(key, value)?,
            "VIDEOMODE_WINDOW_WIDTH" => vm.window.w = parse_dimension(key, value)?,
            "VIDEOMODE_WINDOW_HEIGHT" => vm.window.h = parse_dimension(key, value)?,
            "VIDEOMODE_FULLSCREEN_WIDTH" => {
                let w = parse_dimension(key, value)?;
                vm.fullscreen = Some(Resolution {
                    w,
                    ..vm.fullscreen.unwrap_or_default()
                });
            }
            "VIDEOMODE_FULLSCREEN_HEIGHT" => {
                let h = parse_dimension(key, value)?;
                vm.fullscreen = Some(Resolution {
                    h,
                    ..vm.fullscreen.unwrap_or_default()
                });
            }
            "VIDEOMODE_HORIZONTAL_AREA" => vm.horizontal_area = parse_value(key, value)?,
            "VIDEOMODE_VERTICAL_AREA" => vm.vertical_area = parse_value(key, value)?,
            "VIDEOMODE_HORIZONTAL_SHIFT" => vm.horizontal_offset = parse_offset(key, value, MAX_HORIZONTAL_OFFSET)?,
            "VIDEOMODE_VERTICAL_SHIFT" => vm.vertical_offset = parse_offset(key, value, MAX_VERTICAL_OFFSET)?,
            "VIDEOMODE_STRETCH" => vm.stretch = parse_value(key, value)?,
            "VIDEOMODE_KEEP_ASPECT" => vm.keep_aspect = parse_value(key, value)?,
            "VIDEOMODE_ROTATE90" => vm.rotate90 = parse_bool(key, value)?,
            "VIDEOMODE_HOST_ASPECT_RATIO" => vm.host_aspect = parse_value(key, value)?,
            "VIDEOMODE_80_COLUMN" => vm.columns80 = parse_value(key, value)?,
            "VIDEOMODE_NTSC_FILTER" => vm.ntsc_filter = parse_bool(key, value)?,
            "TV_MODE" => vm.tv_system = parse_value(key, value)?,
            "ARTIFACT_PAL_MODE" => self.artifact_pal = parse_value(key, value)?,
            _ => {
                let (colours, field) = if let Some(field) = key.strip_prefix("COLOURS_PAL_") {
                    (&mut self.colours_pal, field)
                }
                else if let Some(field) = key.strip_prefix("COLOURS_NTSC_") {
                    (&mut self.colours_ntsc, field)
                }
                else {
                    return Err(ConfigError::UnknownKey(key.to_string()));
                };
                let setup = &mut colours.setup;
                match field {
                    "HUE" => setup.hue = parse_value(key, value)?,
                    "SATURATION" => setup.saturation = parse_value(key, value)?,
                    "CONTRAST" => setup.contrast = parse_value(key, value)?,
                    "BRIGHTNESS" => setup.brightness = parse_value(key, value)?,
                    "GAMMA" => setup.gamma = parse_value(key, value)?,
                    "COLOR_DELAY" => setup.color_delay = parse_value(key, value)?,
                    "EXTERNAL_PALETTE" => {
                        colours.palette.path = if value.is_empty() {
                            None
                        }
                        else {
                            Some(PathBuf::from(value))
                        }
                    }
                    "EXTERNAL_PALETTE_ADJUST" => colours.palette.adjust = parse_bool(key, value)?,
                    _ => return Err(ConfigError::UnknownKey(key.to_string())),
                }
            }
        }
        Ok(())
    }

    /// The configuration in file form. Parsing the result gives back the same configuration.
    pub fn to_config_string(&self) -> String {
        let vm = &self.videomode;
        let mut out = String::new();
        let mut line = |key: &str, value: &dyn std::fmt::Display| {
            let _ = writeln!(out, "{}={}", key, value);
        };

        line("VIDEOMODE_WINDOWED", &flag(vm.windowed));
        line("VIDEOMODE_WINDOW_WIDTH", &vm.window.w);
        line("VIDEOMODE_WINDOW_HEIGHT", &vm.window.h);
        if let Some(res) = vm.fullscreen {
            line("VIDEOMODE_FULLSCREEN_WIDTH", &res.w);
            line("VIDEOMODE_FULLSCREEN_HEIGHT", &res.h);
        }
        line("VIDEOMODE_HORIZONTAL_AREA", &vm.horizontal_area);
        line("VIDEOMODE_VERTICAL_AREA", &vm.vertical_area);
        line("VIDEOMODE_HORIZONTAL_SHIFT", &vm.horizontal_offset);
        line("VIDEOMODE_VERTICAL_SHIFT", &vm.vertical_offset);
        line("VIDEOMODE_STRETCH", &vm.stretch);
        line("VIDEOMODE_KEEP_ASPECT", &vm.keep_aspect);
        line("VIDEOMODE_ROTATE90", &flag(vm.rotate90));
        line("VIDEOMODE_HOST_ASPECT_RATIO", &vm.host_aspect);
        line("VIDEOMODE_80_COLUMN", &vm.columns80);
        line("VIDEOMODE_NTSC_FILTER", &flag(vm.ntsc_filter));
        line("TV_MODE", &vm.tv_system);

        for (prefix, colours) in [("COLOURS_PAL", &self.colours_pal), ("COLOURS_NTSC", &self.colours_ntsc)] {
            let s = &colours.setup;
            line(&format!("{}_HUE", prefix), &s.hue);
            line(&format!("{}_SATURATION", prefix), &s.saturation);
            line(&format!("{}_CONTRAST", prefix), &s.contrast);
            line(&format!("{}_BRIGHTNESS", prefix), &s.brightness);
            line(&format!("{}_GAMMA", prefix), &s.gamma);
            line(&format!("{}_COLOR_DELAY", prefix), &s.color_delay);
            let path = colours
                .palette
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            line(&format!("{}_EXTERNAL_PALETTE", prefix), &path);
            line(&format!("{}_EXTERNAL_PALETTE_ADJUST", prefix), &flag(colours.palette.adjust));
        }

        line("ARTIFACT_PAL_MODE", &self.artifact_pal);
        out
    }

    /// Push the colour settings of both television systems into `decoder`, loading any
    /// external palettes.
    pub fn apply_colours(&self, decoder: &mut ColorDecoder) -> anyhow::Result<()> {
        for (tv, colours) in [(TvSystem::Pal, &self.colours_pal), (TvSystem::Ntsc, &self.colours_ntsc)] {
            decoder.set_setup_for(tv, colours.setup);
            let palette = match &colours.palette.path {
                Some(path) => Some(
                    ExternalPalette::from_file(path, colours.palette.adjust)
                        .with_context(|| format!("Loading {} palette {}", tv, path.display()))?,
                ),
                None => None,
            };
            decoder.set_external_palette(tv, palette);
        }
        decoder.set_tv_system(self.videomode.tv_system);
        Ok(())
    }
}

pub fn read_config_file(path: impl AsRef<Path>) -> anyhow::Result<VideoConfig> {
    let path = path.as_ref();
    log::debug!("Reading config file {}", path.display());
    let text = std::fs::read_to_string(path).with_context(|| format!("Reading config file {}", path.display()))?;
    Ok(VideoConfig::parse_str(&text))
}

pub fn write_config_file(path: impl AsRef<Path>, config: &VideoConfig) -> anyhow::Result<()> {
    let path = path.as_ref();
    std::fs::write(path, config.to_config_string())
        .with_context(|| format!("Writing config file {}", path.display()))?;
    log::info!("Saved config file {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use a8_videomode::{Columns80, HorizontalArea, HostAspect, KeepAspect, StretchMode, VerticalArea};

    const SAMPLE: &str = "\
# Video settings
VIDEOMODE_WINDOWED=0
VIDEOMODE_FULLSCREEN_WIDTH=800
VIDEOMODE_FULLSCREEN_HEIGHT=600
VIDEOMODE_HORIZONTAL_AREA=FULL
VIDEOMODE_VERTICAL_AREA=220

VIDEOMODE_HORIZONTAL_SHIFT=-8
VIDEOMODE_STRETCH=1.5
VIDEOMODE_KEEP_ASPECT=REAL
VIDEOMODE_HOST_ASPECT_RATIO=16:10
VIDEOMODE_80_COLUMN=XEP80
TV_MODE=NTSC
COLOURS_NTSC_SATURATION=0.25
COLOURS_PAL_EXTERNAL_PALETTE=/tmp/altirra.pal
COLOURS_PAL_EXTERNAL_PALETTE_ADJUST=1
ARTIFACT_PAL_MODE=HIGH_BLUR
";

    #[test]
    fn parses_known_keys() {
        let config = VideoConfig::parse_str(SAMPLE);
        let vm = &config.videomode;
        assert!(!vm.windowed);
        assert_eq!(vm.fullscreen, Some(Resolution::new(800, 600)));
        assert_eq!(vm.horizontal_area, HorizontalArea::Full);
        assert_eq!(vm.vertical_area, VerticalArea::Custom(220));
        assert_eq!(vm.horizontal_offset, -8);
        assert_eq!(vm.stretch, StretchMode::Custom(1.5));
        assert_eq!(vm.keep_aspect, KeepAspect::Real);
        assert_eq!(vm.host_aspect, HostAspect::Ratio(16.0, 10.0));
        assert_eq!(vm.columns80, Columns80::Xep80);
        assert_eq!(vm.tv_system, TvSystem::Ntsc);
        assert_eq!(config.colours_ntsc.setup.saturation, 0.25);
        assert_eq!(config.colours_pal.palette.path, Some(PathBuf::from("/tmp/altirra.pal")));
        assert!(config.colours_pal.palette.adjust);
        assert_eq!(config.artifact_pal, ArtifactMode::PalHighBlur);
    }

    #[test]
    fn bad_lines_are_skipped() {
        let config = VideoConfig::parse_str("VIDEOMODE_STRETCH=SIDEWAYS\nFOO=1\nnot a setting\nVIDEOMODE_ROTATE90=1\n");
        assert_eq!(config.videomode.stretch, StretchMode::Integer);
        assert!(config.videomode.rotate90);

        let mut config = VideoConfig::default();
        assert_eq!(config.set("FOO", "1"), Err(ConfigError::UnknownKey("FOO".into())));
        assert_eq!(
            config.set("COLOURS_PAL_TINT", "1"),
            Err(ConfigError::UnknownKey("COLOURS_PAL_TINT".into()))
        );
        assert!(matches!(config.set("VIDEOMODE_WINDOW_WIDTH", "0"), Err(ConfigError::InvalidValue { .. })));
        assert!(matches!(config.set("VIDEOMODE_HORIZONTAL_SHIFT", "999"), Err(ConfigError::InvalidValue { .. })));
        assert!(matches!(config.apply_line("VIDEOMODE_WINDOWED"), Err(ConfigError::MissingSeparator(_))));
        assert_eq!(config, VideoConfig::default());
    }

    #[test]
    fn half_a_fullscreen_resolution_is_dropped() {
        let config = VideoConfig::parse_str("VIDEOMODE_FULLSCREEN_WIDTH=800\n");
        assert_eq!(config.videomode.fullscreen, None);
    }

    #[test]
    fn written_config_reads_back() {
        let config = VideoConfig::parse_str(SAMPLE);
        let text = config.to_config_string();
        assert!(text.contains("VIDEOMODE_KEEP_ASPECT=REAL\n"));
        assert!(text.contains("VIDEOMODE_HORIZONTAL_AREA=FULL\n"));
        assert_eq!(VideoConfig::parse_str(&text), config);
        assert_eq!(VideoConfig::parse_str(&VideoConfig::default().to_config_string()), VideoConfig::default());
    }

    #[test]
    fn colours_reach_the_decoder() {
        let mut config = VideoConfig::default();
        config.colours_ntsc.setup.hue = 0.1;
        config.videomode.tv_system = TvSystem::Ntsc;
        let mut decoder = ColorDecoder::new(TvSystem::Pal);
        config.apply_colours(&mut decoder).unwrap();
        assert_eq!(decoder.tv_system(), TvSystem::Ntsc);
        assert_eq!(decoder.setup().hue, 0.1);

        config.colours_pal.palette.path = Some(PathBuf::from("/nonexistent/a8video.pal"));
        assert!(config.apply_colours(&mut decoder).is_err());
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!("a8video_cfg_{}.cfg", std::process::id()));
        let config = VideoConfig::parse_str(SAMPLE);
        write_config_file(&path, &config).unwrap();
        assert_eq!(read_config_file(&path).unwrap(), config);
        let _ = std::fs::remove_file(&path);
        assert!(read_config_file(&path).is_err());
    }
}
