use serde::Deserialize;
use std::ops::{Add, AddAssign, Div, Mul};

/// An RGB color on the 0..=255 scale. Kept as floats because the shading
/// pipeline blends and scales channels repeatedly before the final clamp.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#RRGGBB` string. Returns `None` for anything else.
    pub fn from_hex(text: &str) -> Option<Self> {
        if text.len() != 7
            || !text.starts_with('#')
            || !text.chars().skip(1).all(|c: char| c.is_ascii_hexdigit())
        {
            return None;
        }
        let r = u8::from_str_radix(&text[1..3], 16).ok()?;
        let g = u8::from_str_radix(&text[3..5], 16).ok()?;
        let b = u8::from_str_radix(&text[5..7], 16).ok()?;
        Some(Self::new(f32::from(r), f32::from(g), f32::from(b)))
    }
}

impl Add for Color {
    type Output = Color;
    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
    }
}

impl Mul<f32> for Color {
    type Output = Color;
    fn mul(self, rhs: f32) -> Color {
        Color::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl Div<f32> for Color {
    type Output = Color;
    fn div(self, rhs: f32) -> Color {
        Color::new(self.r / rhs, self.g / rhs, self.b / rhs)
    }
}

/// Parses a color table literal. Panics on malformed input, which for the
/// static tables means a typo caught at first use.
pub fn hex_color(text: &str) -> Color {
    match Color::from_hex(text) {
        Some(color) => color,
        None => panic!("invalid hex color literal: {text}"),
    }
}

/// RGB (0..=255) to HSL, all components in 0..=1.
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let r = r / 255.0;
    let g = g / 255.0;
    let b = b / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h / 6.0, s, l)
}

/// HSL (0..=1) back to RGB on the 0..=255 scale.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    if s == 0.0 {
        return Color::new(l * 255.0, l * 255.0, l * 255.0);
    }

    fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Color::new(
        hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_rgb(p, q, h) * 255.0,
        hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
    )
}
