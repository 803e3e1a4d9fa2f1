//! Color parsing and blending helpers for track fills and strokes.

use anyhow::{anyhow, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(…)` and `rgba(…)`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        if text.starts_with("rgb") {
            return Self::parse_rgb_call(text);
        }
        Err(anyhow!("unrecognized color {text:?}"))
    }

    /// Lenient variant for host-supplied colors; malformed input degrades
    /// to the fallback instead of failing the render.
    pub fn parse_or(text: &str, fallback: Rgba) -> Self {
        match Self::parse(text) {
            Ok(color) => color,
            Err(e) => {
                log::warn!("{e}, using fallback");
                fallback
            }
        }
    }

    fn parse_hex(hex: &str) -> Result<Self> {
        let expand = |c: u8| -> u8 { (c << 4) | c };
        let nibble = |c: char| -> Result<u8> {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| anyhow!("invalid hex digit {c:?}"))
        };
        let digits: Vec<u8> = hex.chars().map(nibble).collect::<Result<_>>()?;
        match digits.len() {
            3 => Ok(Self::opaque(
                expand(digits[0]),
                expand(digits[1]),
                expand(digits[2]),
            )),
            6 => Ok(Self::opaque(
                (digits[0] << 4) | digits[1],
                (digits[2] << 4) | digits[3],
                (digits[4] << 4) | digits[5],
            )),
            8 => Ok(Self::with_alpha(
                (digits[0] << 4) | digits[1],
                (digits[2] << 4) | digits[3],
                (digits[4] << 4) | digits[5],
                (digits[6] << 4) | digits[7],
            )),
            n => Err(anyhow!("hex color must have 3, 6 or 8 digits, not {n}")),
        }
    }

    fn parse_rgb_call(text: &str) -> Result<Self> {
        let inner = text
            .split_once('(')
            .and_then(|(_, rest)| rest.strip_suffix(')'))
            .ok_or_else(|| anyhow!("malformed rgb() color {text:?}"))?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() < 3 || parts.len() > 4 {
            return Err(anyhow!("rgb() takes 3 or 4 components, got {}", parts.len()));
        }
        let channel = |s: &str| -> Result<u8> {
            s.parse::<u8>()
                .map_err(|_| anyhow!("invalid rgb() channel {s:?}"))
        };
        let alpha = match parts.get(3) {
            Some(s) => {
                let a: f32 = s
                    .parse()
                    .map_err(|_| anyhow!("invalid rgba() alpha {s:?}"))?;
                (a.clamp(0.0, 1.0) * 255.0).round() as u8
            }
            None => 255,
        };
        Ok(Self::with_alpha(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Linear interpolation toward `other`; `t` 0.0 keeps `self`, 1.0 gives `other`.
    pub fn blend(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 { (a as f32 + (b as f32 - a as f32) * t).round() as u8 };
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    #[inline(always)]
    pub fn lighten(self, t: f32) -> Rgba {
        self.blend(WHITE, t)
    }

    #[inline(always)]
    pub fn darken(self, t: f32) -> Rgba {
        self.blend(BLACK, t)
    }

    /// HSL lightness below 0.5; decides white-on-dark label text.
    pub fn is_dark(self) -> bool {
        let max = self.r.max(self.g).max(self.b) as f32 / 255.0;
        let min = self.r.min(self.g).min(self.b) as f32 / 255.0;
        (max + min) / 2.0 < 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgba::parse("#cc1f1f").unwrap(), Rgba::opaque(0xcc, 0x1f, 0x1f));
        assert_eq!(Rgba::parse("#f00").unwrap(), Rgba::opaque(255, 0, 0));
        assert_eq!(
            Rgba::parse("#11223344").unwrap(),
            Rgba::with_alpha(0x11, 0x22, 0x33, 0x44)
        );
        assert!(Rgba::parse("#12345").is_err());
    }

    #[test]
    fn test_parse_rgb_call() {
        assert_eq!(
            Rgba::parse("rgb(10, 20, 30)").unwrap(),
            Rgba::opaque(10, 20, 30)
        );
        assert_eq!(
            Rgba::parse("rgba(10, 20, 30, 0.5)").unwrap(),
            Rgba::with_alpha(10, 20, 30, 128)
        );
        assert!(Rgba::parse("rgb(10, 20)").is_err());
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(Rgba::parse_or("not-a-color", BLACK), BLACK);
        assert_eq!(Rgba::parse_or("#00ff00", BLACK), Rgba::opaque(0, 255, 0));
    }

    #[test]
    fn test_blend() {
        let mid = BLACK.blend(WHITE, 0.5);
        assert_eq!(mid, Rgba::opaque(128, 128, 128));
        assert_eq!(BLACK.lighten(1.0), WHITE);
        assert_eq!(WHITE.darken(1.0), BLACK);
    }

    #[test]
    fn test_is_dark() {
        assert!(Rgba::opaque(0x20, 0x20, 0x20).is_dark());
        assert!(!Rgba::opaque(0xf0, 0xf0, 0xd0).is_dark());
        assert!(Rgba::opaque(0xcc, 0x1f, 0x1f).is_dark());
    }

    #[test]
    fn test_to_hex_round_trip() {
        let c = Rgba::opaque(0xe1, 0x7f, 0x0f);
        assert_eq!(Rgba::parse(&c.to_hex()).unwrap(), c);
    }
}
