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

    a8_videomode::settings.rs

    User-facing video mode settings and their text forms, as used on the command
    line and in the configuration file.
*/

use std::{fmt, str::FromStr};

use a8_common::{Resolution, TvSystem};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::VideoModeError;

/// Custom areas are given in Atari pixels and must lie within the normal screen.
pub const MIN_HORIZONTAL_AREA: u32 = 320;
pub const MAX_HORIZONTAL_AREA: u32 = 384;
pub const MIN_VERTICAL_AREA: u32 = 200;
pub const MAX_VERTICAL_AREA: u32 = 240;
pub const MAX_HORIZONTAL_OFFSET: i32 = 384;
pub const MAX_VERTICAL_OFFSET: i32 = 240;
pub const MIN_CUSTOM_STRETCH: f64 = 1.0;

pub const DEFAULT_WINDOW: Resolution = Resolution::new(672, 480);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalArea {
    Narrow,
    #[default]
    Normal,
    Full,
    Custom(u32),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalArea {
    Short,
    #[default]
    Normal,
    Full,
    Custom(u32),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum StretchMode {
    None,
    #[default]
    Integer,
    Full,
    Custom(f64),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum KeepAspect {
    #[strum(serialize = "NONE")]
    None,
    #[default]
    #[strum(serialize = "1TO1")]
    OneToOne,
    #[strum(serialize = "REAL")]
    Real,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum HostAspect {
    /// Derived from the desktop resolution, assuming square desktop pixels.
    #[default]
    Auto,
    Ratio(f64, f64),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum Columns80 {
    #[default]
    #[strum(serialize = "NONE")]
    None,
    #[strum(serialize = "XEP80")]
    Xep80,
    #[strum(serialize = "PROTO80")]
    Proto80,
    #[strum(serialize = "AF80")]
    Af80,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoModeSettings {
    pub windowed: bool,
    pub window: Resolution,
    /// `None` picks the smallest fullscreen resolution that holds the normal screen.
    pub fullscreen: Option<Resolution>,
    pub horizontal_area: HorizontalArea,
    pub vertical_area: VerticalArea,
    /// Shift of the visible area in Atari pixels, clamped to the full screen.
    pub horizontal_offset: i32,
    pub vertical_offset: i32,
    pub stretch: StretchMode,
    pub keep_aspect: KeepAspect,
    pub rotate90: bool,
    pub host_aspect: HostAspect,
    pub columns80: Columns80,
    pub ntsc_filter: bool,
    pub tv_system: TvSystem,
}

impl Default for VideoModeSettings {
    fn default() -> Self {
        Self {
            windowed: true,
            window: DEFAULT_WINDOW,
            fullscreen: None,
            horizontal_area: Default::default(),
            vertical_area: Default::default(),
            horizontal_offset: 0,
            vertical_offset: 0,
            stretch: Default::default(),
            keep_aspect: Default::default(),
            rotate90: false,
            host_aspect: Default::default(),
            columns80: Default::default(),
            ntsc_filter: false,
            tv_system: Default::default(),
        }
    }
}

impl VideoModeSettings {
    /// Check the values that have fixed bounds regardless of display mode.
    pub fn validate(&self) -> Result<(), VideoModeError> {
        self.horizontal_area.validate()?;
        self.vertical_area.validate()?;
        self.stretch.validate()?;
        self.host_aspect.validate()?;
        if self.window.w == 0 || self.window.h == 0 {
            return Err(VideoModeError::InvalidArea(format!("window size {}", self.window)));
        }
        if self.horizontal_offset.abs() > MAX_HORIZONTAL_OFFSET || self.vertical_offset.abs() > MAX_VERTICAL_OFFSET {
            return Err(VideoModeError::InvalidArea(format!(
                "offset {},{}",
                self.horizontal_offset, self.vertical_offset
            )));
        }
        Ok(())
    }
}

impl HorizontalArea {
    pub fn validate(&self) -> Result<(), VideoModeError> {
        match *self {
            HorizontalArea::Custom(w) if !(MIN_HORIZONTAL_AREA..=MAX_HORIZONTAL_AREA).contains(&w) => {
                Err(VideoModeError::InvalidArea(format!(
                    "horizontal area {} outside {}..={}",
                    w, MIN_HORIZONTAL_AREA, MAX_HORIZONTAL_AREA
                )))
            }
            _ => Ok(()),
        }
    }
}

impl VerticalArea {
    pub fn validate(&self) -> Result<(), VideoModeError> {
        match *self {
            VerticalArea::Custom(h) if !(MIN_VERTICAL_AREA..=MAX_VERTICAL_AREA).contains(&h) => {
                Err(VideoModeError::InvalidArea(format!(
                    "vertical area {} outside {}..={}",
                    h, MIN_VERTICAL_AREA, MAX_VERTICAL_AREA
                )))
            }
            _ => Ok(()),
        }
    }
}

impl StretchMode {
    pub fn validate(&self) -> Result<(), VideoModeError> {
        match *self {
            StretchMode::Custom(f) if !f.is_finite() || f < MIN_CUSTOM_STRETCH => Err(VideoModeError::InvalidStretch(
                format!("factor {} must be at least {}", f, MIN_CUSTOM_STRETCH),
            )),
            _ => Ok(()),
        }
    }
}

impl HostAspect {
    pub fn validate(&self) -> Result<(), VideoModeError> {
        match *self {
            HostAspect::Ratio(w, h) if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) => {
                Err(VideoModeError::InvalidAspectRatio(format!("{}:{}", w, h)))
            }
            _ => Ok(()),
        }
    }

    /// Width over height of the host screen.
    pub fn ratio(&self, desktop: Resolution) -> f64 {
        match *self {
            HostAspect::Auto => desktop.aspect(),
            HostAspect::Ratio(w, h) => w / h,
        }
    }
}

impl fmt::Display for HorizontalArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HorizontalArea::Narrow => write!(f, "NARROW"),
            HorizontalArea::Normal => write!(f, "TV"),
            HorizontalArea::Full => write!(f, "FULL"),
            HorizontalArea::Custom(w) => write!(f, "{}", w),
        }
    }
}

impl FromStr for HorizontalArea {
    type Err = VideoModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let area = match s.trim().to_ascii_uppercase().as_str() {
            "NARROW" => HorizontalArea::Narrow,
            "TV" | "NORMAL" => HorizontalArea::Normal,
            "FULL" => HorizontalArea::Full,
            other => HorizontalArea::Custom(
                other
                    .parse::<u32>()
                    .map_err(|_| VideoModeError::InvalidArea(format!("'{}'", s)))?,
            ),
        };
        area.validate()?;
        Ok(area)
    }
}

impl fmt::Display for VerticalArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerticalArea::Short => write!(f, "SHORT"),
            VerticalArea::Normal => write!(f, "TV"),
            VerticalArea::Full => write!(f, "FULL"),
            VerticalArea::Custom(h) => write!(f, "{}", h),
        }
    }
}

impl FromStr for VerticalArea {
    type Err = VideoModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let area = match s.trim().to_ascii_uppercase().as_str() {
            "SHORT" => VerticalArea::Short,
            "TV" | "NORMAL" => VerticalArea::Normal,
            "FULL" => VerticalArea::Full,
            other => VerticalArea::Custom(
                other
                    .parse::<u32>()
                    .map_err(|_| VideoModeError::InvalidArea(format!("'{}'", s)))?,
            ),
        };
        area.validate()?;
        Ok(area)
    }
}

impl fmt::Display for StretchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StretchMode::None => write!(f, "NONE"),
            StretchMode::Integer => write!(f, "INTEGER"),
            StretchMode::Full => write!(f, "FULL"),
            StretchMode::Custom(factor) => write!(f, "{}", factor),
        }
    }
}

impl FromStr for StretchMode {
    type Err = VideoModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stretch = match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => StretchMode::None,
            "INTEGER" => StretchMode::Integer,
            "FULL" => StretchMode::Full,
            other => StretchMode::Custom(
                other
                    .parse::<f64>()
                    .map_err(|_| VideoModeError::InvalidStretch(format!("'{}'", s)))?,
            ),
        };
        stretch.validate()?;
        Ok(stretch)
    }
}

impl fmt::Display for HostAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostAspect::Auto => write!(f, "AUTO"),
            HostAspect::Ratio(w, h) => write!(f, "{}:{}", w, h),
        }
    }
}

impl FromStr for HostAspect {
    type Err = VideoModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("AUTO") {
            return Ok(HostAspect::Auto);
        }
        let bad = || VideoModeError::InvalidAspectRatio(format!("'{}', expected AUTO or W:H", s));
        let (w, h) = s.split_once(':').ok_or_else(bad)?;
        let w = w.trim().parse::<f64>().map_err(|_| bad())?;
        let h = h.trim().parse::<f64>().map_err(|_| bad())?;
        let aspect = HostAspect::Ratio(w, h);
        aspect.validate()?;
        Ok(aspect)
    }
}
