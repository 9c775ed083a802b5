use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ColorError, Result};

pub const CHART_BACKGROUND: HexColor = HexColor::new(0x1A, 0x23, 0x32);
pub const MIN_BACKGROUND_DISTANCE: f64 = 80.0;

const CONTRAST_FOR_WARM: HexColor = HexColor::new(0x17, 0xA2, 0xB8);
const CONTRAST_FOR_COOL: HexColor = HexColor::new(0xE7, 0x4C, 0x3C);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Accepts `#RRGGBB` or `RRGGBB` only.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidColorFormat(raw.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorError::InvalidColorFormat(raw.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn distance(&self, other: &HexColor) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }

    pub fn hue(&self) -> f64 {
        let (r, g, b) = (f64::from(self.r), f64::from(self.g), f64::from(self.b));
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = max - min;
        if diff == 0.0 {
            0.0
        } else if max == r {
            (60.0 * ((g - b) / diff) + 360.0) % 360.0
        } else if max == g {
            (60.0 * ((b - r) / diff) + 120.0) % 360.0
        } else {
            (60.0 * ((r - g) / diff) + 240.0) % 360.0
        }
    }

    pub fn is_warm(&self) -> bool {
        let hue = self.hue();
        hue < 60.0 || hue > 300.0
    }

    pub fn contrast_color(&self) -> HexColor {
        if self.is_warm() {
            CONTRAST_FOR_WARM
        } else {
            CONTRAST_FOR_COOL
        }
    }

    /// `factor` 0 keeps the color, 1 gives white.
    pub fn lighten(&self, factor: f64) -> HexColor {
        let f = factor.clamp(0.0, 1.0);
        let up = |c: u8| (f64::from(c) + (255.0 - f64::from(c)) * f) as u8;
        HexColor::new(up(self.r), up(self.g), up(self.b))
    }

    pub fn darken(&self, factor: f64) -> HexColor {
        let f = factor.clamp(0.0, 1.0);
        let down = |c: u8| (f64::from(c) * (1.0 - f)) as u8;
        HexColor::new(down(self.r), down(self.g), down(self.b))
    }

    // Lightens in 0.1 steps up to 0.7, then settles for 0.5.
    pub fn ensure_contrast_with(&self, background: &HexColor, min_distance: f64) -> HexColor {
        if self.distance(background) >= min_distance {
            return *self;
        }
        for step in 1..=7 {
            let candidate = self.lighten(f64::from(step) / 10.0);
            if candidate.distance(background) >= min_distance {
                return candidate;
            }
        }
        self.lighten(0.5)
    }

    pub fn ensure_contrast_with_background(&self) -> HexColor {
        self.ensure_contrast_with(&CHART_BACKGROUND, MIN_BACKGROUND_DISTANCE)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

pub fn hex_to_rgb(hex: &str) -> Result<(u8, u8, u8)> {
    HexColor::parse(hex).map(|c| c.rgb())
}

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    HexColor::new(r, g, b).to_string()
}

pub fn normalize_hex(hex: &str) -> Result<String> {
    HexColor::parse(hex).map(|c| c.to_string())
}

pub fn color_distance(a: &str, b: &str) -> Result<f64> {
    Ok(HexColor::parse(a)?.distance(&HexColor::parse(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_both_prefix_forms() {
        let a = HexColor::parse("#ef0107").unwrap();
        let b = HexColor::parse(" EF0107 ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "#EF0107");
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "#", "#FFF", "#GG0000", "red", "#FF00000", "##FF0000"] {
            let err = HexColor::parse(bad).unwrap_err();
            assert!(matches!(err, ColorError::InvalidColorFormat(_)), "{bad}");
        }
    }

    #[test]
    fn hex_rgb_round_trip_normalises() {
        for hex in ["#000000", "#ffffff", "6cabdd", "#DA291C", "#1a2332"] {
            let (r, g, b) = hex_to_rgb(hex).unwrap();
            assert_eq!(rgb_to_hex(r, g, b), normalize_hex(hex).unwrap());
        }
    }

    #[test]
    fn distance_is_zero_on_self_and_symmetric() {
        assert_eq!(color_distance("#DA291C", "#DA291C").unwrap(), 0.0);
        let ab = color_distance("#DA291C", "#6CABDD").unwrap();
        let ba = color_distance("#6CABDD", "#DA291C").unwrap();
        assert_eq!(ab, ba);
        let full = color_distance("#000000", "#FFFFFF").unwrap();
        assert!((full - 441.672).abs() < 0.01);
    }

    #[test]
    fn warm_and_cool_contrast() {
        let arsenal = HexColor::parse("#EF0107").unwrap();
        let chelsea = HexColor::parse("#034694").unwrap();
        assert!(arsenal.is_warm());
        assert!(!chelsea.is_warm());
        assert_eq!(arsenal.contrast_color().to_string(), "#17A2B8");
        assert_eq!(chelsea.contrast_color().to_string(), "#E74C3C");
    }

    #[test]
    fn lighten_and_darken_extremes() {
        let c = HexColor::parse("#132257").unwrap();
        assert_eq!(c.lighten(0.0), c);
        assert_eq!(c.lighten(1.0).to_string(), "#FFFFFF");
        assert_eq!(c.darken(1.0).to_string(), "#000000");
    }

    #[test]
    fn dark_navy_is_lifted_off_background() {
        let spurs = HexColor::parse("#132257").unwrap();
        let lifted = spurs.ensure_contrast_with_background();
        assert_ne!(lifted, spurs);
        assert!(lifted.distance(&CHART_BACKGROUND) >= MIN_BACKGROUND_DISTANCE);

        let city = HexColor::parse("#6CABDD").unwrap();
        assert_eq!(city.ensure_contrast_with_background(), city);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let c = HexColor::parse("#fdb913").unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#FDB913\"");
        let back: HexColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert!(serde_json::from_str::<HexColor>("\"nope\"").is_err());
    }
}
