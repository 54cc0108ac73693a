/// RGBA color in linear space with values in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub const fn transparent() -> Self {
        Self::rgba(0.0, 0.0, 0.0, 0.0)
    }

    /// Color from 8-bit sRGB channels, converted to linear space
    pub const fn srgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            decode_srgb(r),
            decode_srgb(g),
            decode_srgb(b),
            a as f32 / 255.0,
        )
    }

    /// Color from a packed `0xRRGGBBAA` sRGB value
    pub const fn hex(rgba: u32) -> Self {
        let [r, g, b, a] = rgba.to_be_bytes();
        Self::srgba(r, g, b, a)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Linearly interpolate towards `other`
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// sRGB transfer function, cubic fit of `((x + 0.055) / 1.055)^2.4` above the
/// linear toe
const fn decode_srgb(channel: u8) -> f32 {
    let x = channel as f32 / 255.0;
    if x <= 0.04045 {
        return x / 12.92;
    }
    let t = (x + 0.055) / 1.055;
    t * t * (0.5870 * t + 0.4130)
}

impl Default for Color {
    fn default() -> Self {
        Self::transparent()
    }
}

/// Named colors used by the default style registry
pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::hex(0x000000ff);
    pub const WHITE: Color = Color::hex(0xffffffff);
    pub const BASE: Color = Color::hex(0x1e1e2eff);
    pub const SURFACE: Color = Color::hex(0x313244ff);
    pub const SURFACE_HIGHLIGHT: Color = Color::hex(0x45475aff);
    pub const TEXT: Color = Color::hex(0xcdd6f4ff);
    pub const ACCENT: Color = Color::hex(0x89b4faff);
    pub const ACCENT_MUTED: Color = Color::hex(0xb4befeff);
    pub const DANGER: Color = Color::hex(0xf38ba8ff);
}
